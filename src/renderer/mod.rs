//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.*
//! It walks the screen column by column and hands textured column spans,
//! landscape strips and overlays to a type that implements [`Renderer`].
//! Occlusion of objects by nearer walls is the back-end's job: it keeps
//! the per-column clip distances written by [`Renderer::draw_wall`].

use crate::world::image::Image;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// One vertical slice of a projected wall or object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpan {
    pub col: usize,
    /// First screen row of the unclipped slice (may be negative).
    pub top: i32,
    /// Projected height in rows; the whole source column maps onto it.
    pub height: f32,
    pub src_col: usize,
    /// Fish-eye corrected distance of the slice.
    pub depth: f32,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate for the requested resolution, copy `background` into
    /// the scratch buffer and open every column's clip.
    fn begin_frame(&mut self, width: usize, height: usize, background: &[Rgba]);

    /// Copy source column `src_col` of a panorama 1:1 into screen column
    /// `col`, starting at screen row `offset_from_top`.
    fn draw_landscape(&mut self, col: usize, src_col: usize, offset_from_top: i32, img: &Image);

    /// Record `span.depth` as the column's clip distance and, if there is
    /// an image, draw the slice.
    fn draw_wall(&mut self, span: &ColumnSpan, img: Option<&Image>);

    /// Draw an object slice only if it is nearer than the column's wall.
    /// Returns whether anything was drawn.
    fn draw_object(&mut self, span: &ColumnSpan, img: &Image) -> bool;

    /// Composite a screen-sized image over everything drawn so far.
    fn draw_overlay(&mut self, img: &Image);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Window callers pass `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

pub mod software;

pub use software::Software;
