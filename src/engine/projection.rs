use glam::Vec2;

use crate::{
    engine::hit::{ObjectHit, Sighting, WallHit},
    engine::types::Screen,
    world::{AngleTable, Maze, MazeAngle, TILE_SIZE},
};

/// Vertical extent of one projected wall or object column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slice {
    /// First screen row; may be negative when the slice is taller than the screen.
    pub top: i32,
    /// Clamped to the last screen row.
    pub bottom: i32,
    /// Unclamped projected height in rows.
    pub height: f32,
}

/// `height * plane / distance`, centred on the screen's middle row.
pub fn project_slice(screen: &Screen, height: f32, plane_distance: f32, distance: f32) -> Slice {
    let projected = height * plane_distance / distance;
    let h = screen.h as i32;
    let bottom = screen.centre_row + (projected * 0.5) as i32;
    let top = h - bottom;
    Slice {
        top,
        bottom: bottom.min(h - 1),
        height: projected,
    }
}

/// Column of a `TILE_SIZE` wide texture seen at the hit point, chosen so
/// texel 0 is on the viewer's left whichever face was struck.
pub fn wall_texture_column(hit: &WallHit) -> usize {
    let slice = (hit.intersection.floor() as i32).rem_euclid(TILE_SIZE);
    let col = if hit.side.is_mirrored() {
        TILE_SIZE - 1 - slice
    } else {
        slice
    };
    col as usize
}

/// Places object tiles on screen from their bearing, not from the ray
/// that crossed them.
pub struct ObjectProjector<'a> {
    tables: &'a AngleTable,
    half_w: i32,
}

impl<'a> ObjectProjector<'a> {
    pub fn new(tables: &'a AngleTable) -> Self {
        Self {
            tables,
            half_w: (tables.plane_width() >> 1) as i32,
        }
    }

    /// Fish-eye corrected distance and mid column of a point seen from
    /// `pos` facing `angle`.  `None` if the point is the player's own
    /// position or lies behind the player.
    pub fn project(&self, pos: Vec2, angle: MazeAngle, target: Vec2) -> Option<(f32, i32)> {
        let arcs = self.tables.arcs();
        let (x1, y1) = (pos.x, pos.y);
        let (x2, y2) = (target.x, target.y);
        let x_rel = x1 - x2;
        let y_rel = y1 - y2;

        let dist = if y_rel == 0.0 {
            x_rel.abs()
        } else {
            (x_rel * x_rel + y_rel * y_rel).sqrt().trunc()
        };

        let degrees: f64 = if y1 == y2 && x_rel < 0.0 {
            0.0
        } else if x1 == x2 && y_rel < 0.0 {
            90.0
        } else if y1 == y2 && x_rel > 0.0 {
            180.0
        } else if x1 == x2 && y_rel > 0.0 {
            270.0
        } else {
            // rotate atan's half-plane result into the right quadrant
            let supplement = match (x1 < x2, y1 < y2) {
                _ if x1 == x2 || y1 == y2 => return None,
                (true, true) => 0.0,
                (false, true) | (false, false) => 180.0,
                (true, false) => 360.0,
            };
            (y_rel as f64 / x_rel as f64).atan().to_degrees() + supplement
        };

        let mut object_angle = (degrees * arcs.a60 as f64 / 60.0) as MazeAngle;
        let mut player_angle = angle;
        // keep both on the same side of the 0/360 seam
        if player_angle > arcs.a270 && object_angle < arcs.a90 {
            player_angle -= arcs.a360;
        }
        if object_angle > arcs.a270 && player_angle < arcs.a90 {
            object_angle -= arcs.a360;
        }
        let mid = self.half_w - (player_angle - object_angle);

        let corrected = match self.tables.fish(mid).filter(|_| mid < self.half_w * 2) {
            Some(fish) => dist / fish,
            None => dist * self.tables.cos(self.tables.wrap(mid - arcs.a30)),
        };
        (corrected > 0.0).then_some((corrected, mid))
    }

    /// Project a sighted tile through its centre.
    pub fn project_sighting(
        &self,
        s: &Sighting,
        maze: &Maze,
        pos: Vec2,
        angle: MazeAngle,
    ) -> Option<ObjectHit> {
        let centre = maze.walls().tile_centre(s.tile);
        let (distance, mid_column) = self.project(pos, angle, centre)?;
        Some(ObjectHit {
            tile: s.tile,
            kind: s.kind,
            distance,
            mid_column,
        })
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
