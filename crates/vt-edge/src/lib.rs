//! Binary edge maps from RGBA pixel buffers.
//!
//! Edge map pixel `(x, y)` is the Sobel response of source pixel `(x, y)`;
//! see the `vt-core` crate docs for how those indices map to canvas space.
//!
//! The detector is a plain 3x3 Sobel magnitude test against a fixed
//! threshold. There is no smoothing, non-maximum suppression or hysteresis;
//! every interior pixel whose gradient magnitude exceeds the threshold is
//! foreground (`255`), everything else, including the one-pixel border, is
//! background (`0`).

pub mod sobel;

pub use sobel::{EDGE_OFF, EDGE_ON, SobelConfig, SobelDetector, detect_edges};
