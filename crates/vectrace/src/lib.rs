//! Raster sketch to SVG tracing.
//!
//! Two pipelines share the building blocks of the `vt-*` crates:
//! - [`trace`]: Sobel edges, greedy path walk, midpoint quadratic strokes,
//!   consolidation, stroke SVG.
//! - [`trace_to_svg`]: dark-pixel walk on a coarse grid, Douglas-Peucker,
//!   polyline SVG on a white background.
//!
//! Both are plain synchronous calls; [`TraceTask`] runs either one on a
//! worker thread.

pub mod config;
pub mod pipeline;
pub mod task;

pub use config::{
    DEFAULT_WINDOW_SIZE, DynamicWindow, EpsilonPolicy, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE,
    PolylineEpsilonPolicy, Resolution, StrokeEpsilonPolicy, TraceMode, TraceSettings,
};
pub use pipeline::{StrokeTrace, render, rescale, trace, trace_to_svg, vectorize};
pub use task::{JobKind, TaskOutput, TaskStatus, TraceJob, TraceTask};

pub use vt_core::*;
pub use vt_edge::{SobelConfig, SobelDetector, detect_edges};
pub use vt_stroke::{
    ConsolidateConfig, PenState, QuadraticCurve, Stroke, consolidate, fit_path, scale_strokes,
};
pub use vt_svg::{RasterSurface, StrokeStyle, Surface, polylines_to_svg, strokes_to_svg};
pub use vt_trace::{
    DarkForeground, EdgeForeground, Foreground, NeighborOrder, PathTracer, WalkConfig, simplify,
};
