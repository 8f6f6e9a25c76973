use glam::Vec2;

use crate::world::{AngleTable, Maze, MazeAngle, TileIndex};

/// The viewer in world units and maze angle units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub angle: MazeAngle,
    /// Unit vector for `angle`, looked up from the tables.
    pub dir: Vec2,
    pub speed: f32,
}

impl Player {
    pub fn new(tables: &AngleTable, pos: Vec2, angle: MazeAngle, speed: f32) -> Self {
        let mut p = Self {
            pos,
            angle: 0,
            dir: Vec2::X,
            speed,
        };
        p.set_angle(tables, angle);
        p
    }

    /// Wrap `angle` into one turn and refresh `dir`.
    pub fn set_angle(&mut self, tables: &AngleTable, angle: MazeAngle) {
        self.angle = tables.wrap(angle);
        self.dir = Vec2::new(tables.cos(self.angle), tables.sin(self.angle));
    }

    #[inline]
    pub fn turn(&mut self, tables: &AngleTable, delta: MazeAngle) {
        self.set_angle(tables, self.angle + delta);
    }

    /// Position one step ahead (`sign = 1`) or behind (`sign = -1`).
    #[inline]
    pub fn step_target(&self, sign: f32) -> Vec2 {
        self.pos + self.dir * self.speed * sign
    }

    #[inline]
    pub fn tile(&self, maze: &Maze) -> Option<TileIndex> {
        maze.walls().tile_at(self.pos)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
