//! Grid-line ray search (DDA) against the wall layer.
//!
//! Each cast walks one family of grid lines outward from the player, one
//! tile per step, until it lands in a wall or leaves the map.  Prop and
//! quiz-marker tiles crossed on the way are recorded, not stopped at.

use glam::{DVec2, Vec2};

use crate::engine::hit::{Axis, ObjectKind, Side, Sightings, WallHit, closest};
use crate::world::{AngleTable, Maze, MazeAngle, QuestionId, TILE_SIZE, TileIndex};

const TILE: f64 = TILE_SIZE as f64;

pub struct RayCaster<'a> {
    tables: &'a AngleTable,
    maze: &'a Maze,
    pos: Vec2,
    active: Option<QuestionId>,
}

impl<'a> RayCaster<'a> {
    pub fn new(
        tables: &'a AngleTable,
        maze: &'a Maze,
        pos: Vec2,
        active: Option<QuestionId>,
    ) -> Self {
        Self {
            tables,
            maze,
            pos,
            active,
        }
    }

    /// Both families for `angle`, nearest wins.  `None` when both left the map.
    pub fn cast(&self, angle: MazeAngle, seen: &mut Sightings) -> Option<WallHit> {
        let h = self.cast_horizontal(angle, seen);
        let v = self.cast_vertical(angle, seen);
        closest(h, v)
    }

    /// Search the horizontal grid lines (constant y).
    pub fn cast_horizontal(&self, angle: MazeAngle, seen: &mut Sightings) -> WallHit {
        let t = self.tables;
        let arcs = t.arcs();
        let p: DVec2 = self.pos.as_dvec2();

        let facing_down = angle > 0 && angle < arcs.a180;
        let row_line = (p.y / TILE).floor() * TILE;
        let (mut grid_line, line_step) = if facing_down {
            (row_line + TILE, TILE)
        } else {
            (row_line, -TILE)
        };
        let mut ix = p.x + (grid_line - p.y) * t.inv_tan(angle);
        if !facing_down {
            // the line belongs to the tile above it
            grid_line -= 1.0;
        }

        let mut hit = WallHit {
            axis: Axis::Horizontal,
            grid_line: grid_line as f32,
            intersection: ix as f32,
            cast_angle: angle,
            tile: None,
            off_the_map: false,
            distance: f32::MAX,
            side: if facing_down { Side::Top } else { Side::Bottom },
        };

        // parallel to every horizontal line
        if angle == 0 || angle == arcs.a180 {
            return hit;
        }

        let x_step = t.x_step(angle);
        loop {
            let Some(idx) = self.tile_at(ix, grid_line) else {
                hit.off_the_map = true;
                break;
            };
            if self.maze.is_wall(idx) {
                hit.tile = Some(idx);
                hit.distance = ((ix - p.x) * t.inv_cos(angle)) as f32;
                break;
            }
            self.note_objects(idx, seen);
            ix += x_step;
            grid_line += line_step;
        }

        hit.grid_line = grid_line as f32;
        hit.intersection = ix as f32;
        hit
    }

    /// Search the vertical grid lines (constant x).
    pub fn cast_vertical(&self, angle: MazeAngle, seen: &mut Sightings) -> WallHit {
        let t = self.tables;
        let arcs = t.arcs();
        let p: DVec2 = self.pos.as_dvec2();

        let facing_right = angle < arcs.a90 || angle > arcs.a270;
        let col_line = (p.x / TILE).floor() * TILE;
        let (mut grid_line, line_step) = if facing_right {
            (col_line + TILE, TILE)
        } else {
            (col_line, -TILE)
        };
        let mut iy = p.y + (grid_line - p.x) * t.tan(angle);
        if !facing_right {
            // the line belongs to the tile left of it
            grid_line -= 1.0;
        }

        let mut hit = WallHit {
            axis: Axis::Vertical,
            grid_line: grid_line as f32,
            intersection: iy as f32,
            cast_angle: angle,
            tile: None,
            off_the_map: false,
            distance: f32::MAX,
            side: if facing_right { Side::Left } else { Side::Right },
        };

        // parallel to every vertical line
        if angle == arcs.a90 || angle == arcs.a270 {
            return hit;
        }

        let y_step = t.y_step(angle);
        loop {
            let Some(idx) = self.tile_at(grid_line, iy) else {
                hit.off_the_map = true;
                break;
            };
            if self.maze.is_wall(idx) {
                hit.tile = Some(idx);
                hit.distance = ((iy - p.y) * t.inv_sin(angle)) as f32;
                break;
            }
            self.note_objects(idx, seen);
            iy += y_step;
            grid_line += line_step;
        }

        hit.grid_line = grid_line as f32;
        hit.intersection = iy as f32;
        hit
    }

    #[inline]
    fn tile_at(&self, x: f64, y: f64) -> Option<TileIndex> {
        let col = (x / TILE).floor();
        let row = (y / TILE).floor();
        if !col.is_finite() || !row.is_finite() {
            return None;
        }
        self.maze.to_index(col as i32, row as i32)
    }

    /// Record a prop or a visible quiz marker on `idx`, once per frame.
    fn note_objects(&self, idx: TileIndex, seen: &mut Sightings) {
        if seen.contains(idx) {
            return;
        }
        if self.maze.is_prop(idx) {
            seen.record(idx, ObjectKind::Prop(self.maze.prop_code(idx)));
        } else if let Some(tag) = self.maze.question_type_at(idx, self.active) {
            seen.record(idx, ObjectKind::Question(tag));
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
