//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Columns arrive left to right; walls first, then objects far to near,
//!   so a single clip distance per column is all the depth state needed.
//! * Source pixels with alpha 0 are never written.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{ColumnSpan, Renderer, Rgba},
    world::{backdrop::overlay_onto, image::Image, image::is_transparent},
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    /* nearest wall per column, reset every frame */
    clip: Vec<f32>,
    width: usize,
    height: usize,
}

impl Software {
    /// Clip distance currently stored for `col`.
    pub fn clip(&self, col: usize) -> f32 {
        self.clip.get(col).copied().unwrap_or(f32::MAX)
    }

    /// Scratch pixel, mainly for inspection in tools and tests.
    pub fn pixel(&self, col: usize, row: usize) -> Option<Rgba> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.scratch.get(row * self.width + col).copied()
    }

    /// Scale a source column onto the rows of `span`, skipping transparency.
    fn blit_column(&mut self, span: &ColumnSpan, img: &Image) {
        if span.col >= self.width || span.height <= 0.0 || img.w == 0 || img.h == 0 {
            return;
        }
        let h = self.height as i32;
        let first = span.top.max(0);
        let end = ((span.top as f32 + span.height).ceil() as i32).min(h);
        let ratio = img.h as f32 / span.height;
        let src_col = span.src_col.min(img.w - 1);

        for y in first..end {
            let src_row = (((y - span.top) as f32 * ratio) as usize).min(img.h - 1);
            let px = img.pixels[src_row * img.w + src_col];
            if !is_transparent(px) {
                self.scratch[y as usize * self.width + span.col] = px;
            }
        }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize, background: &[Rgba]) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.clip.resize(w, f32::MAX);
        }

        if background.len() == self.scratch.len() {
            self.scratch.copy_from_slice(background);
        } else {
            /* dark-grey clear */
            self.scratch.fill(0xFF_202020);
        }

        self.clip.fill(f32::MAX);
    }

    fn draw_landscape(&mut self, col: usize, src_col: usize, offset_from_top: i32, img: &Image) {
        if col >= self.width || src_col >= img.w {
            return;
        }
        let h = self.height as i32;
        for src_row in 0..img.h {
            let y = offset_from_top + src_row as i32;
            if y < 0 {
                continue;
            }
            if y >= h {
                break;
            }
            let px = img.pixels[src_row * img.w + src_col];
            if !is_transparent(px) {
                self.scratch[y as usize * self.width + col] = px;
            }
        }
    }

    fn draw_wall(&mut self, span: &ColumnSpan, img: Option<&Image>) {
        if let Some(c) = self.clip.get_mut(span.col) {
            *c = span.depth;
        }
        if let Some(img) = img {
            self.blit_column(span, img);
        }
    }

    fn draw_object(&mut self, span: &ColumnSpan, img: &Image) -> bool {
        if span.depth >= self.clip(span.col) {
            return false;
        }
        self.blit_column(span, img);
        true
    }

    fn draw_overlay(&mut self, img: &Image) {
        overlay_onto(&mut self.scratch, self.width, self.height, img);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
