/// One frame's worth of player commands, sampled from the keyboard.
///
/// Only the signs matter: the maze moves in whole steps and turns in
/// ten-degree clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1  (back / forward)
    pub turn: f32,    // –1 … +1  (right / left)
}

impl InputCmd {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.turn == 0.0
    }
}
