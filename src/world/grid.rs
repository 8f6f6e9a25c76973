use glam::Vec2;

/// Edge length of one tile in world units.
pub const TILE_SIZE: i32 = 64;
/// `log2(TILE_SIZE)`.
pub const TILE_SHIFT: u32 = 6;

/// Flat row-major index into a [`TileGrid`].
pub type TileIndex = usize;

/// One base-36 character: `'0'` is empty, anything else names an image.
pub type TileCode = u8;

pub const EMPTY: TileCode = b'0';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,

    #[error("grid width {0} is not a power of two")]
    WidthNotPowerOfTwo(usize),

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("expected {expected} cells, got {found}")]
    CellCount { expected: usize, found: usize },

    #[error("invalid tile code `{code}` at row {row}, column {col}")]
    BadCode { code: char, row: usize, col: usize },

    #[error("{layer} layer is {found:?}, wall layer is {expected:?}")]
    ShapeMismatch {
        layer: &'static str,
        found: (usize, usize),
        expected: (usize, usize),
    },
}

/// Aerial view of one layer of the maze (walls, props or question marks).
///
/// The width is a power of two, so index ↔ (row, col) conversion is a
/// shift and a mask.  Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    shift: u32,
    height: usize,
    cells: Vec<TileCode>,
}

impl TileGrid {
    /// Validate and wrap a flat cell vector.  Codes are lower-cased.
    pub fn new(width: usize, height: usize, mut cells: Vec<TileCode>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if !width.is_power_of_two() {
            return Err(GridError::WidthNotPowerOfTwo(width));
        }
        if cells.len() != width * height {
            return Err(GridError::CellCount {
                expected: width * height,
                found: cells.len(),
            });
        }
        for (i, c) in cells.iter_mut().enumerate() {
            c.make_ascii_lowercase();
            if base36_value(*c).is_none() {
                return Err(GridError::BadCode {
                    code: *c as char,
                    row: i / width,
                    col: i % width,
                });
            }
        }
        Ok(Self {
            width,
            shift: width.trailing_zeros(),
            height,
            cells,
        })
    }

    /// Build from text rows; the first row fixes the width.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let width = rows.first().ok_or(GridError::Empty)?.as_ref().len();
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    found: line.len(),
                    expected: width,
                });
            }
            cells.extend_from_slice(line.as_bytes());
        }
        Self::new(width, rows.len(), cells)
    }

    /// A grid with every tile empty.
    pub fn empty(width: usize, height: usize) -> Result<Self, GridError> {
        Self::new(width, height, vec![EMPTY; width * height])
    }

    /*──────────────────────── geometry ───────────────────────────────*/

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
    #[inline]
    pub fn width_shift(&self) -> u32 {
        self.shift
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if `other` has the same width and height.
    pub fn same_shape(&self, other: &TileGrid) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Tile index for grid coordinates, `None` off the grid.
    #[inline]
    pub fn index_of(&self, col: i32, row: i32) -> Option<TileIndex> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(((row as usize) << self.shift) | col as usize)
    }

    /// `(row, col)` of a tile index.
    #[inline]
    pub fn row_col(&self, idx: TileIndex) -> (usize, usize) {
        (idx >> self.shift, idx & (self.width - 1))
    }

    /// Tile containing the world-space point, `None` off the grid.
    #[inline]
    pub fn tile_at(&self, p: Vec2) -> Option<TileIndex> {
        let col = (p.x / TILE_SIZE as f32).floor() as i32;
        let row = (p.y / TILE_SIZE as f32).floor() as i32;
        self.index_of(col, row)
    }

    /// World-space centre of a tile.
    pub fn tile_centre(&self, idx: TileIndex) -> Vec2 {
        let (row, col) = self.row_col(idx);
        let half = (TILE_SIZE >> 1) as f32;
        Vec2::new(
            ((col as i32) << TILE_SHIFT) as f32 + half,
            ((row as i32) << TILE_SHIFT) as f32 + half,
        )
    }

    /*──────────────────────── contents ───────────────────────────────*/

    /// Code at `idx`; out-of-range indices read as empty.
    #[inline]
    pub fn code(&self, idx: TileIndex) -> TileCode {
        self.cells.get(idx).copied().unwrap_or(EMPTY)
    }

    #[inline]
    pub fn is_occupied(&self, idx: TileIndex) -> bool {
        self.code(idx) != EMPTY
    }

    /// Every non-empty tile with its code.
    pub fn occupied(&self) -> impl Iterator<Item = (TileIndex, TileCode)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != EMPTY)
            .map(|(i, &c)| (i, c))
    }

    /// Highest base-36 value present (the number of images the layer needs).
    pub fn highest_code_value(&self) -> u8 {
        self.cells
            .iter()
            .filter_map(|&c| base36_value(c))
            .max()
            .unwrap_or(0)
    }
}

/// `'0'..='9'` → 0..=9, `'a'..='z'` → 10..=35.
pub fn base36_value(code: TileCode) -> Option<u8> {
    match code {
        b'0'..=b'9' => Some(code - b'0'),
        b'a'..=b'z' => Some(code - b'a' + 10),
        _ => None,
    }
}

/// Inverse of [`base36_value`].
pub fn base36_code(value: u8) -> Option<TileCode> {
    match value {
        0..=9 => Some(b'0' + value),
        10..=35 => Some(b'a' + value - 10),
        _ => None,
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
