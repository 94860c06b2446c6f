//! 3x3 Sobel gradient thresholding.
//!
//! Kernels, with `N`/`S` the rows above/below and `W`/`E` the columns to the
//! left/right:
//! - `gx = -NW - 2W - SW + NE + 2E + SE`
//! - `gy = -NW - 2N - NE + SW + 2S + SE`
//!
//! The center pixel does not participate. Output is `EDGE_ON` iff
//! `sqrt(gx^2 + gy^2) > threshold`. Border pixels are never inspected, so no
//! padding mode exists here.

use vt_core::{Image, ImageView, Rgba, gray_of};

pub const EDGE_ON: u8 = 255;
pub const EDGE_OFF: u8 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct SobelConfig {
    pub threshold: f64,
}

impl Default for SobelConfig {
    fn default() -> Self {
        Self { threshold: 30.0 }
    }
}

#[derive(Debug, Clone)]
pub struct SobelDetector {
    gray: Image<f64>,
}

impl SobelDetector {
    pub fn new() -> Self {
        Self {
            gray: Image::new_fill(0, 0, 0.0),
        }
    }

    pub fn detect_rgba(&mut self, img: &ImageView<'_, Rgba>, cfg: &SobelConfig) -> Image<u8> {
        self.ensure_dims(img.width(), img.height());
        copy_rgba_to_gray(img, self.gray.data_mut(), img.width());
        self.threshold_magnitude(cfg)
    }

    fn ensure_dims(&mut self, w: usize, h: usize) {
        if self.gray.width() != w || self.gray.height() != h {
            self.gray = Image::new_fill(w, h, 0.0);
        }
    }

    fn threshold_magnitude(&self, cfg: &SobelConfig) -> Image<u8> {
        let w = self.gray.width();
        let h = self.gray.height();
        let mut out = Image::new_fill(w, h, EDGE_OFF);
        if w < 3 || h < 3 {
            return out;
        }

        let src = self.gray.data();
        let dst = out.data_mut();

        for y in 1..(h - 1) {
            let r0 = (y - 1) * w;
            let r1 = y * w;
            let r2 = (y + 1) * w;
            for x in 1..(w - 1) {
                let nw = src[r0 + x - 1];
                let n = src[r0 + x];
                let ne = src[r0 + x + 1];
                let west = src[r1 + x - 1];
                let east = src[r1 + x + 1];
                let sw = src[r2 + x - 1];
                let s = src[r2 + x];
                let se = src[r2 + x + 1];

                let gx = (ne + 2.0 * east + se) - (nw + 2.0 * west + sw);
                let gy = (sw + 2.0 * s + se) - (nw + 2.0 * n + ne);

                if (gx * gx + gy * gy).sqrt() > cfg.threshold {
                    dst[r1 + x] = EDGE_ON;
                }
            }
        }

        out
    }
}

impl Default for SobelDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot edge map with a throwaway detector.
pub fn detect_edges(img: &ImageView<'_, Rgba>, cfg: &SobelConfig) -> Image<u8> {
    SobelDetector::new().detect_rgba(img, cfg)
}

fn copy_rgba_to_gray(src: &ImageView<'_, Rgba>, dst: &mut [f64], dst_w: usize) {
    for y in 0..src.height() {
        let s = src.row(y);
        let d = &mut dst[y * dst_w..(y + 1) * dst_w];
        for (dv, sv) in d.iter_mut().zip(s.iter()) {
            *dv = gray_of(sv);
        }
    }
}
