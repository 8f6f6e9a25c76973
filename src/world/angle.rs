//! Pre-computed trigonometry for the maze's native angle space.
//!
//! One *maze angle unit* is one projection-plane column, so the 60° field
//! of view spans exactly `plane_width` units and the full circle
//! `6 * plane_width`.  Every table is built once and never touched again.

use std::f64::consts::PI;

use crate::world::grid::TILE_SIZE;

/// Angle in maze units, normally kept in `[0, ANGLE360)`.
pub type MazeAngle = i32;

/// Added to every radian value before calling into `sin`/`cos`/`tan` so the
/// reciprocal tables never divide by an exact zero on the axes.
const RADIAN_BIAS: f64 = 0.0001;

/// The handful of named angles everything else is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arcs {
    pub a5: MazeAngle,
    pub a10: MazeAngle,
    pub a30: MazeAngle,
    pub a45: MazeAngle,
    pub a60: MazeAngle,
    pub a90: MazeAngle,
    pub a180: MazeAngle,
    pub a270: MazeAngle,
    pub a360: MazeAngle,
}

impl Arcs {
    fn for_plane_width(plane_width: usize) -> Self {
        let a60 = plane_width as MazeAngle;
        let a30 = (a60 as f64 / 2.0).round() as MazeAngle;
        let a90 = a30 * 3;
        let a5 = (a30 as f64 / 6.0).round() as MazeAngle;
        let a10 = a5 * 2;
        Self {
            a5,
            a10,
            a30,
            a45: a5 + a10 * 4,
            a60,
            a90,
            a180: a90 * 2,
            a270: a90 * 3,
            a360: a60 * 6,
        }
    }
}

/// Look-up tables indexed by [`MazeAngle`] (`0 ..= ANGLE360`), plus the
/// fish-eye table indexed by projection-plane column.
///
/// The tables feeding the grid search (`tan`, the reciprocals and the
/// steps) are read back in `f64`: near the axes a reciprocal is ~10⁴ and
/// multiplies a difference of two coordinates that can be 16384 units
/// from the origin.
#[derive(Clone, Debug)]
pub struct AngleTable {
    arcs: Arcs,
    plane_width: usize,
    sin: Vec<f64>,
    inv_sin: Vec<f64>,
    cos: Vec<f64>,
    inv_cos: Vec<f64>,
    tan: Vec<f64>,
    inv_tan: Vec<f64>,
    x_step: Vec<f64>,
    y_step: Vec<f64>,
    fish: Vec<f32>,
}

impl AngleTable {
    /// Build every table for a projection plane `plane_width` columns wide.
    pub fn new(plane_width: usize) -> Self {
        let arcs = Arcs::for_plane_width(plane_width);
        let len = arcs.a360 as usize + 1;
        let tile = TILE_SIZE as f64;

        let mut t = Self {
            arcs,
            plane_width,
            sin: Vec::with_capacity(len),
            inv_sin: Vec::with_capacity(len),
            cos: Vec::with_capacity(len),
            inv_cos: Vec::with_capacity(len),
            tan: Vec::with_capacity(len),
            inv_tan: Vec::with_capacity(len),
            x_step: Vec::with_capacity(len),
            y_step: Vec::with_capacity(len),
            fish: Vec::with_capacity(arcs.a60 as usize + 1),
        };

        for a in 0..=arcs.a360 {
            let rad = Self::radians(arcs, a) + RADIAN_BIAS;
            let (s, c, tn) = (rad.sin(), rad.cos(), rad.tan());

            t.sin.push(s);
            t.inv_sin.push(1.0 / s);
            t.cos.push(c);
            t.inv_cos.push(1.0 / c);
            t.tan.push(tn);
            t.inv_tan.push(1.0 / tn);

            // west half-plane walks towards decreasing x
            let xs = (tile / tn).abs();
            let xs = if a >= arcs.a90 && a < arcs.a270 { -xs } else { xs };
            t.x_step.push(xs);

            // south half-plane (screen y grows downwards) walks towards increasing y
            let ys = (tile * tn).abs();
            let ys = if a < arcs.a180 { ys } else { -ys };
            t.y_step.push(ys);
        }

        for rel in -arcs.a30..=arcs.a30 {
            t.fish.push((1.0 / Self::radians(arcs, rel).cos()) as f32);
        }

        t
    }

    #[inline]
    fn radians(arcs: Arcs, a: MazeAngle) -> f64 {
        a as f64 * PI / arcs.a180 as f64
    }

    /*──────────────────────── angle arithmetic ───────────────────────*/

    #[inline]
    pub fn arcs(&self) -> Arcs {
        self.arcs
    }

    /// Width of the projection plane these tables were built for.
    #[inline]
    pub fn plane_width(&self) -> usize {
        self.plane_width
    }

    /// `a * π / ANGLE180`, without the table bias.
    #[inline]
    pub fn to_radians(&self, a: MazeAngle) -> f32 {
        Self::radians(self.arcs, a) as f32
    }

    /// Fold any angle into `[0, ANGLE360)`.
    #[inline]
    pub fn wrap(&self, a: MazeAngle) -> MazeAngle {
        a.rem_euclid(self.arcs.a360)
    }

    /// `a + delta`, wrapped.
    #[inline]
    pub fn turn(&self, a: MazeAngle, delta: MazeAngle) -> MazeAngle {
        self.wrap(a + delta)
    }

    /// `floor(plane_width * degrees / 60)`.
    pub fn degrees_to_units(&self, degrees: i32) -> MazeAngle {
        (self.plane_width as i64 * degrees as i64).div_euclid(60) as MazeAngle
    }

    /// Inverse of [`degrees_to_units`](Self::degrees_to_units), rounded.
    pub fn units_to_degrees(&self, a: MazeAngle) -> i32 {
        (a as f64 * 60.0 / self.plane_width as f64).round() as i32
    }

    /*──────────────────────── table look-ups ─────────────────────────*/

    #[inline(always)]
    fn slot(&self, a: MazeAngle) -> usize {
        debug_assert!(
            (0..=self.arcs.a360).contains(&a),
            "angle {a} outside the table"
        );
        a as usize
    }

    #[inline]
    pub fn sin(&self, a: MazeAngle) -> f32 {
        self.sin[self.slot(a)] as f32
    }
    #[inline]
    pub fn inv_sin(&self, a: MazeAngle) -> f64 {
        self.inv_sin[self.slot(a)]
    }
    #[inline]
    pub fn cos(&self, a: MazeAngle) -> f32 {
        self.cos[self.slot(a)] as f32
    }
    #[inline]
    pub fn inv_cos(&self, a: MazeAngle) -> f64 {
        self.inv_cos[self.slot(a)]
    }
    #[inline]
    pub fn tan(&self, a: MazeAngle) -> f64 {
        self.tan[self.slot(a)]
    }
    #[inline]
    pub fn inv_tan(&self, a: MazeAngle) -> f64 {
        self.inv_tan[self.slot(a)]
    }

    /// Signed x distance between consecutive horizontal grid-line crossings.
    #[inline]
    pub fn x_step(&self, a: MazeAngle) -> f64 {
        self.x_step[self.slot(a)]
    }

    /// Signed y distance between consecutive vertical grid-line crossings.
    #[inline]
    pub fn y_step(&self, a: MazeAngle) -> f64 {
        self.y_step[self.slot(a)]
    }

    /// `1 / cos(column - ANGLE30)`; `None` off the projection plane.
    #[inline]
    pub fn fish(&self, column: i32) -> Option<f32> {
        usize::try_from(column)
            .ok()
            .and_then(|c| self.fish.get(c))
            .copied()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
