//! What a ray reports: the wall that stopped it and the objects it passed.

use crate::world::{MazeAngle, QuestionTag, TileCode, TileIndex};

/// Which family of grid lines the ray crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Lines of constant y; `intersection` is an x coordinate.
    Horizontal,
    /// Lines of constant x; `intersection` is a y coordinate.
    Vertical,
}

/// Face of the wall tile that was struck, seen from above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// With y growing downwards and angles turning clockwise, a top face
    /// is swept right-to-left in world x and a right face bottom-to-top in
    /// world y; those two run against the texture.
    #[inline]
    pub fn is_mirrored(self) -> bool {
        matches!(self, Side::Top | Side::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit {
    pub axis: Axis,
    /// Coordinate of the crossed grid line (y for horizontal, x for vertical).
    pub grid_line: f32,
    /// Where the ray crosses that line along the other axis.
    pub intersection: f32,
    pub cast_angle: MazeAngle,
    /// Wall tile that stopped the ray.
    pub tile: Option<TileIndex>,
    pub off_the_map: bool,
    /// Ray length to the hit, `f32::MAX` when nothing was hit.
    pub distance: f32,
    pub side: Side,
}

impl WallHit {
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.axis == Axis::Horizontal
    }
}

/// Nearer of the two families.  `None` when both rays left the map.
///
/// A ray that left the map loses to one that did not; equal distances go
/// to the horizontal hit.  Non-positive distances are forced to 1.
pub fn closest(horiz: WallHit, vert: WallHit) -> Option<WallHit> {
    let mut hit = match (horiz.off_the_map, vert.off_the_map) {
        (true, true) => return None,
        (false, true) => horiz,
        (true, false) => vert,
        (false, false) if horiz.distance <= vert.distance => horiz,
        (false, false) => vert,
    };
    if hit.distance <= 0.0 {
        hit.distance = 1.0;
    }
    Some(hit)
}

/// The two kinds of object layered over the walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Prop(TileCode),
    Question(QuestionTag),
}

/// An object tile crossed by some ray this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sighting {
    pub tile: TileIndex,
    pub kind: ObjectKind,
}

/// Per-frame list of sighted objects, unique by tile.
#[derive(Clone, Debug, Default)]
pub struct Sightings {
    items: Vec<Sighting>,
}

impl Sightings {
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, tile: TileIndex) -> bool {
        self.items.iter().any(|s| s.tile == tile)
    }

    /// Add unless the tile is already listed.  Returns whether it was added.
    pub fn record(&mut self, tile: TileIndex, kind: ObjectKind) -> bool {
        if self.contains(tile) {
            return false;
        }
        self.items.push(Sighting { tile, kind });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sighting> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A sighted object projected onto the screen, ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectHit {
    pub tile: TileIndex,
    pub kind: ObjectKind,
    /// Fish-eye corrected distance.
    pub distance: f32,
    pub mid_column: i32,
}

/// Painter's order: farthest first.
pub fn sort_far_to_near(hits: &mut [ObjectHit]) {
    hits.sort_by(|a, b| b.distance.total_cmp(&a.distance));
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn hit(axis: Axis, distance: f32, off: bool) -> WallHit {
        WallHit {
            axis,
            grid_line: 0.0,
            intersection: 0.0,
            cast_angle: 0,
            tile: (!off).then_some(1),
            off_the_map: off,
            distance,
            side: Side::Top,
        }
    }

    #[test]
    fn nearer_hit_wins_and_horizontal_takes_ties() {
        let h = hit(Axis::Horizontal, 100.0, false);
        let v = hit(Axis::Vertical, 90.0, false);
        assert_eq!(closest(h, v).unwrap().axis, Axis::Vertical);

        let v = hit(Axis::Vertical, 100.0, false);
        assert_eq!(closest(h, v).unwrap().axis, Axis::Horizontal);
    }

    #[test]
    fn off_map_rays_lose() {
        let h = hit(Axis::Horizontal, f32::MAX, true);
        let v = hit(Axis::Vertical, 500.0, false);
        assert_eq!(closest(h, v).unwrap().axis, Axis::Vertical);
        assert_eq!(closest(v, h).map(|w| w.distance), Some(500.0));
        assert!(closest(h, hit(Axis::Vertical, f32::MAX, true)).is_none());
    }

    #[test]
    fn degenerate_distance_is_clamped() {
        let h = hit(Axis::Horizontal, -0.0, false);
        let v = hit(Axis::Vertical, 10.0, false);
        assert_eq!(closest(h, v).unwrap().distance, 1.0);
    }

    #[test]
    fn sightings_are_unique_per_tile() {
        let mut s = Sightings::default();
        assert!(s.record(5, ObjectKind::Prop(b'1')));
        assert!(!s.record(5, ObjectKind::Question(QuestionTag::Mark)));
        assert!(s.record(6, ObjectKind::Question(QuestionTag::Mark)));
        assert_eq!(s.len(), 2);
        assert!(s.contains(6));
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn painter_order() {
        let mk = |d| ObjectHit {
            tile: 0,
            kind: ObjectKind::Prop(b'1'),
            distance: d,
            mid_column: 0,
        };
        let mut v = vec![mk(10.0), mk(300.0), mk(45.0)];
        sort_far_to_near(&mut v);
        let d: Vec<f32> = v.iter().map(|h| h.distance).collect();
        assert_eq!(d, vec![300.0, 45.0, 10.0]);
    }
}
