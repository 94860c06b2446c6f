//! Pixel path walking and polyline simplification.
//!
//! The walker is a greedy single-pass trace: from each unvisited foreground
//! seed it steps to the first free foreground neighbor in a fixed priority
//! order until none is left. It is not a boundary or component tracer;
//! junctions yield several short paths.
//!
//! Two foreground tests are provided:
//! - [`EdgeForeground`]: binary edge map, value `> 128`.
//! - [`DarkForeground`]: RGBA pixels with mean RGB `< 50`.
//!
//! [`simplify`] is a plain Douglas-Peucker reduction against the infinite
//! chord line.

mod simplify;
mod walk;

pub use simplify::{perpendicular_distance, simplify, simplify_polyline};
pub use walk::{
    DarkForeground, EdgeForeground, Foreground, NeighborOrder, PathTracer, WalkConfig, WalkState,
    trace_paths,
};
