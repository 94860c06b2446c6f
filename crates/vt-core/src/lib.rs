//! Foundational buffers and geometry for raster-to-vector tracing.
//!
//! ## Pixel Buffers
//! Source images are `Image<[u8; 4]>` (RGBA, row-major). Edge maps and
//! preview canvases are `Image<u8>`. Storage is always contiguous; an
//! [`ImageView`] is a cheap `Copy` borrow of an image.
//!
//! ## Coordinates
//! An integer point `(x, y)` names pixel index `(x, y)`. Traced paths store
//! integral `Point2f` values; fitted curves may introduce half-pixel
//! midpoints. When drawn, the point sits at canvas position `(x, y)`, the
//! top-left corner of that pixel, which is how both the SVG writer and the
//! raster preview place it.
//!
//! ## Grayscale
//! Gray is the plain mean of R, G and B. Alpha never participates.

mod error;
mod geom;
mod image;

pub use error::Error;
pub use geom::{Point2f, Polyline2f, Vec2f};
pub use image::{Image, ImageView, Rgba, gray_of, pixel_buffer_from_rgba};
