//! Tile-grid collision with axis fallback.
//!
//! A blocked diagonal step slides along the wall: first keep the new x,
//! then keep the new y.  A step that fails all three tries is absorbed.

use glam::Vec2;

use crate::world::Maze;

/// Which of the three tries succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Full,
    XOnly,
    YOnly,
    Blocked,
}

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    pub kind: MoveKind,
}

impl MoveResult {
    #[inline]
    pub fn moved(&self) -> bool {
        self.kind != MoveKind::Blocked
    }
}

/// Move from `from` towards `to`, sliding along walls.
pub fn try_move(maze: &Maze, from: Vec2, to: Vec2) -> MoveResult {
    let tries = [
        (to, MoveKind::Full),
        (Vec2::new(to.x, from.y), MoveKind::XOnly),
        (Vec2::new(from.x, to.y), MoveKind::YOnly),
    ];
    tries
        .into_iter()
        .find(|(p, _)| maze.is_open(*p))
        .map(|(pos, kind)| MoveResult { pos, kind })
        .unwrap_or(MoveResult {
            pos: from,
            kind: MoveKind::Blocked,
        })
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_floor_takes_the_full_step() {
        let m = Maze::demo();
        let r = try_move(&m, Vec2::new(96.0, 96.0), Vec2::new(110.0, 108.0));
        assert_eq!(r.kind, MoveKind::Full);
        assert_eq!(r.pos, Vec2::new(110.0, 108.0));
    }

    #[test]
    fn diagonal_into_a_wall_slides() {
        let m = Maze::demo();
        // north border is row 0: keep x, drop y
        let r = try_move(&m, Vec2::new(96.0, 70.0), Vec2::new(110.0, 60.0));
        assert_eq!(r.kind, MoveKind::XOnly);
        assert_eq!(r.pos, Vec2::new(110.0, 70.0));

        // west border is column 0: keep y, drop x
        let r = try_move(&m, Vec2::new(70.0, 96.0), Vec2::new(60.0, 110.0));
        assert_eq!(r.kind, MoveKind::YOnly);
        assert_eq!(r.pos, Vec2::new(70.0, 110.0));
    }

    #[test]
    fn corners_absorb_the_step() {
        let m = Maze::demo();
        let from = Vec2::new(70.0, 70.0);
        let r = try_move(&m, from, Vec2::new(60.0, 60.0));
        assert_eq!(r.kind, MoveKind::Blocked);
        assert_eq!(r.pos, from);
        assert!(!r.moved());
    }

    #[test]
    fn leaving_the_grid_is_blocked() {
        let m = Maze::new(
            crate::world::TileGrid::empty(16, 4).unwrap(),
            None,
            None,
            Default::default(),
        )
        .unwrap();
        let from = Vec2::new(10.0, 10.0);
        let r = try_move(&m, from, Vec2::new(-6.0, -6.0));
        assert_eq!(r.kind, MoveKind::Blocked);
    }
}
