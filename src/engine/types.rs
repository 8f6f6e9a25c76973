/// Projection constants owned by one engine instance.
///
/// The projection width is also the field of view in maze angle units, so
/// it fixes the size of every angle table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    pub width: usize,
    pub height: usize,
    /// Player eye to projection plane, in world units.
    pub plane_distance: f32,
    pub wall_height: f32,
    pub prop_height: f32,
    /// World units per forward/backward step.
    pub player_speed: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            plane_distance: 277.0,
            wall_height: 64.0,
            prop_height: 64.0,
            player_speed: 16.0,
        }
    }
}

impl ViewConfig {
    pub fn screen(&self) -> Screen {
        Screen {
            w: self.width,
            h: self.height,
            half_w: (self.width >> 1) as i32,
            centre_row: (self.height >> 1) as i32,
        }
    }
}

/// Constants that depend on the *frame-buffer*, not on the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_w: i32,     // pre-derived for speed
    pub centre_row: i32, // pre-derived for speed
}
