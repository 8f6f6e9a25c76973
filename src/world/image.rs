// Format-agnostic repository of decoded images.
// The engine and renderer interact through `ImageId` only.

use std::collections::HashMap;

use crate::renderer::Rgba;
use crate::world::grid::TileCode;
use crate::world::questions::QuestionTag;

/// Runtime handle for an image in an [`ImageBank`].
///
/// Stable for the lifetime of the bank.
pub type ImageId = u16;

/// `ImageId` whose pixels are the checkerboard fallback.
/// Always = 0 because `ImageBank::new()` inserts it first.
pub const NO_IMAGE: ImageId = 0;

/// Pack four channels into `0xAARRGGBB`.
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
pub const fn alpha(px: Rgba) -> u8 {
    (px >> 24) as u8
}

/// Alpha 0 means "do not draw".
#[inline]
pub const fn is_transparent(px: Rgba) -> bool {
    alpha(px) == 0
}

/// CPU-side RGBA image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

impl Image {
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, ImageError> {
        let name = name.into();
        if pixels.len() != w * h {
            return Err(ImageError::Size {
                name,
                expected: w * h,
                found: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /// Single-colour image.
    pub fn filled<S: Into<String>>(name: S, w: usize, h: usize, px: Rgba) -> Self {
        Self {
            name: name.into(),
            w,
            h,
            pixels: vec![px; w * h],
        }
    }

    /// Two-colour checkerboard with `cell`-pixel squares.
    pub fn checker<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        cell: usize,
        light: Rgba,
        dark: Rgba,
    ) -> Self {
        let cell = cell.max(1);
        let pixels = (0..w * h)
            .map(|i| {
                let (x, y) = (i % w / cell, i / w / cell);
                if (x ^ y) & 1 == 0 { light } else { dark }
            })
            .collect();
        Self {
            name: name.into(),
            w,
            h,
            pixels,
        }
    }

    /// Pixel at `(col, row)`, `None` outside the image.
    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> Option<Rgba> {
        if col >= self.w || row >= self.h {
            return None;
        }
        self.pixels.get(row * self.w + col).copied()
    }
}

/// Convenience checkerboard 64×64 (light/dark grey).
impl Default for Image {
    fn default() -> Self {
        Image::checker(
            "CHECKER",
            64,
            64,
            8,
            rgba(0xB0, 0xB0, 0xB0, 0xFF),
            rgba(0x50, 0x50, 0x50, 0xFF),
        )
    }
}

/// Things that can go wrong when building images or using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    /// Attempted to insert a second image with an existing name.
    #[error("image name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("image id {0} out of range")]
    BadId(ImageId),

    #[error("image `{name}` needs {expected} pixels, got {found}")]
    Size {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Cache of every image a maze uses.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
#[derive(Debug)]
pub struct ImageBank {
    by_name: HashMap<String, ImageId>,
    data: Vec<Image>,
}

impl Default for ImageBank {
    fn default() -> Self {
        Self::new(Image::default())
    }
}

impl ImageBank {
    /// Create a bank whose id 0 is `missing`, registered as `"MISSING"`.
    pub fn new(missing: Image) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_IMAGE);
        Self {
            by_name,
            data: vec![missing],
        }
    }

    /// Number of images stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    pub fn id(&self, name: &str) -> Option<ImageId> {
        self.by_name.get(name).copied()
    }

    pub fn image(&self, id: ImageId) -> Result<&Image, ImageError> {
        self.data.get(id as usize).ok_or(ImageError::BadId(id))
    }

    /// Insert an image under `name`; fails if the name already exists.
    pub fn insert<S: Into<String>>(&mut self, name: S, img: Image) -> Result<ImageId, ImageError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(ImageError::Duplicate(name));
        }
        let id = self.data.len() as ImageId;
        self.data.push(img);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/// Which image dresses each tile code.  Lookups that miss mean "draw nothing".
#[derive(Clone, Debug, Default)]
pub struct Skins {
    walls: HashMap<TileCode, ImageId>,
    props: HashMap<TileCode, ImageId>,
    questions: HashMap<QuestionTag, ImageId>,
}

impl Skins {
    pub fn set_wall(&mut self, code: TileCode, id: ImageId) {
        self.walls.insert(code, id);
    }
    pub fn set_prop(&mut self, code: TileCode, id: ImageId) {
        self.props.insert(code, id);
    }
    pub fn set_question(&mut self, tag: QuestionTag, id: ImageId) {
        self.questions.insert(tag, id);
    }

    #[inline]
    pub fn wall(&self, code: TileCode) -> Option<ImageId> {
        self.walls.get(&code).copied()
    }
    #[inline]
    pub fn prop(&self, code: TileCode) -> Option<ImageId> {
        self.props.get(&code).copied()
    }
    #[inline]
    pub fn question(&self, tag: QuestionTag) -> Option<ImageId> {
        self.questions.get(&tag).copied()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
