//! Full-screen layers behind and in front of the maze: the background
//! (gradient or image), the panoramic landscape strip and trap overlays.

use crate::renderer::Rgba;
use crate::world::angle::MazeAngle;
use crate::world::image::{Image, ImageId, is_transparent, rgba};

/// Sky/ground colour ramps, one colour step per screen row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    pub sky: [u8; 3],
    pub sky_step: [i8; 3],
    pub ground: [u8; 3],
    pub ground_step: [i8; 3],
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            sky: [40, 125, 225],
            sky_step: [2, 0, 0],
            ground: [100, 80, 40],
            ground_step: [1, 1, 1],
        }
    }
}

impl Gradient {
    /// Paint a `w × h` buffer: sky on the top half, ground below.
    pub fn paint(&self, w: usize, h: usize) -> Vec<Rgba> {
        let half = h >> 1;
        let mut out = Vec::with_capacity(w * h);
        Self::ramp(&mut out, w, half, self.sky, self.sky_step);
        Self::ramp(&mut out, w, h - half, self.ground, self.ground_step);
        out
    }

    fn ramp(out: &mut Vec<Rgba>, w: usize, rows: usize, start: [u8; 3], step: [i8; 3]) {
        let mut c = start.map(i32::from);
        for _ in 0..rows {
            let px = rgba(c[0] as u8, c[1] as u8, c[2] as u8, 0xFF);
            out.extend(std::iter::repeat_n(px, w));
            for (ch, st) in c.iter_mut().zip(step) {
                *ch = (*ch + st as i32).clamp(0, 255);
            }
        }
    }
}

/// The frame's starting pixels, always opaque and exactly screen sized.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    w: usize,
    h: usize,
    pixels: Vec<Rgba>,
}

impl Background {
    pub fn gradient(g: &Gradient, w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            pixels: g.paint(w, h),
        }
    }

    /// Copy the top-left `w × h` of `img`, forcing alpha to opaque.
    /// Anything the image does not cover is black.
    pub fn from_image(img: &Image, w: usize, h: usize) -> Self {
        let mut pixels = Vec::with_capacity(w * h);
        for row in 0..h {
            for col in 0..w {
                let px = img.pixel(col, row).unwrap_or(0);
                pixels.push(px | 0xFF00_0000);
            }
        }
        Self { w, h, pixels }
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }
}

/// A panorama image wrapped once around the full circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Landscape {
    pub image: ImageId,
    /// First screen row the panorama is drawn on.
    pub offset_from_top: i32,
    /// Maze angle that maps to the panorama's left edge.
    pub start_angle: MazeAngle,
}

impl Landscape {
    /// Image column seen along `angle` for an image `img_w` pixels wide.
    pub fn source_column(&self, angle: MazeAngle, angle360: MazeAngle, img_w: usize) -> usize {
        let rel = (angle - self.start_angle).rem_euclid(angle360) as usize;
        (rel * img_w / angle360 as usize).min(img_w.saturating_sub(1))
    }
}

/// Composite `overlay` onto a `w × h` buffer wherever it is not transparent.
pub fn overlay_onto(dst: &mut [Rgba], w: usize, h: usize, overlay: &Image) {
    for row in 0..h.min(overlay.h) {
        for col in 0..w.min(overlay.w) {
            let px = overlay.pixels[row * overlay.w + col];
            if !is_transparent(px) {
                dst[row * w + col] = px;
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
