//! Output side of the tracer: SVG serialization of strokes and polylines,
//! resolution rescaling of finished documents, and a raster preview surface.

pub mod render;
pub mod rescale;
pub mod write;

pub use render::{
    INK, LineCap, LineJoin, PAPER, RasterSurface, StrokeStyle, Surface, render_strokes,
};
pub use rescale::{RescaleError, Resolution, rescale, rescale_by, try_rescale};
pub use write::{polyline_path_data, polylines_to_svg, strokes_to_svg};
