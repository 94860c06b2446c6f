//! Quadratic stroke model, midpoint curve fitting and stroke consolidation.
//!
//! A [`Stroke`] is one quadratic Bezier segment plus a pen state. Fitting is
//! deliberately coarse: every consecutive pixel pair becomes one segment with
//! its control point at the midpoint, and a zero-length placement stroke
//! marks the pen going down at the path origin.

mod consolidate;
mod fit;
mod stroke;

pub use consolidate::{
    CURVE_SAMPLES, ConsolidateConfig, GRID_CELL, MERGE_DISTANCE, consolidate, merge_short,
    remove_redundant,
};
pub use fit::{STROKE_WIDTH, fit_path};
pub use stroke::{PenState, QuadraticCurve, Stroke, scale_strokes};
