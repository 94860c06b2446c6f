//! Stroke list cleanup: occupancy-grid dedup, then endpoint merging.
//!
//! Both passes are single, order-dependent sweeps. Strokes accepted early
//! bias what follows; neither pass aims for a minimal cover or a re-fit.

use std::collections::HashSet;

use vt_core::Point2f;

use crate::stroke::{PenState, QuadraticCurve, Stroke};

pub const GRID_CELL: i64 = 5;
pub const CURVE_SAMPLES: usize = 10;
pub const MERGE_DISTANCE: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidateConfig {
    /// Carried for callers that persist it; neither pass reads it.
    pub regularization_weight: f32,
}

impl Default for ConsolidateConfig {
    fn default() -> Self {
        Self {
            regularization_weight: 0.1,
        }
    }
}

/// Runs [`remove_redundant`] then [`merge_short`]. Lists of two strokes or
/// fewer are returned as they are.
pub fn consolidate(strokes: &[Stroke], _cfg: &ConsolidateConfig) -> Vec<Stroke> {
    if strokes.len() <= 2 {
        return strokes.to_vec();
    }

    let deduped = remove_redundant(strokes);
    let merged = merge_short(&deduped);

    tracing::debug!(
        input = strokes.len(),
        deduped = deduped.len(),
        merged = merged.len(),
        "consolidated strokes"
    );

    merged
}

/// Drops pen-down strokes whose sampled cells are all occupied already.
pub fn remove_redundant(strokes: &[Stroke]) -> Vec<Stroke> {
    let mut occupied: HashSet<(i64, i64)> = HashSet::new();
    let mut out = Vec::with_capacity(strokes.len());
    let mut cells = Vec::with_capacity(CURVE_SAMPLES + 1);

    for stroke in strokes {
        if stroke.pen == PenState::Up {
            out.push(*stroke);
            continue;
        }

        cells.clear();
        cells.extend(sample_cells(&stroke.curve));
        if cells.iter().all(|c| occupied.contains(c)) {
            continue;
        }

        occupied.extend(cells.iter().copied());
        out.push(*stroke);
    }

    out
}

/// Folds a pen-down stroke into the previously kept pen-down stroke when the
/// previous end is closer than [`MERGE_DISTANCE`] to the current start. The
/// merged curve keeps the previous `p0`/`p1` and takes the current `p2`.
pub fn merge_short(strokes: &[Stroke]) -> Vec<Stroke> {
    if strokes.len() <= 2 {
        return strokes.to_vec();
    }

    let mut out: Vec<Stroke> = Vec::with_capacity(strokes.len());
    out.push(strokes[0]);

    for cur in &strokes[1..] {
        let Some(prev) = out.last_mut() else {
            continue;
        };

        if prev.is_down() && cur.is_down() && prev.end().distance(cur.start()) < MERGE_DISTANCE {
            *prev = Stroke {
                curve: QuadraticCurve {
                    p0: prev.curve.p0,
                    p1: prev.curve.p1,
                    p2: cur.curve.p2,
                    width0: prev.curve.width0,
                    width2: cur.curve.width2,
                },
                pen: PenState::Down,
            };
        } else {
            out.push(*cur);
        }
    }

    out
}

fn sample_cells(curve: &QuadraticCurve) -> impl Iterator<Item = (i64, i64)> + '_ {
    (0..=CURVE_SAMPLES).map(move |i| {
        let t = i as f32 / CURVE_SAMPLES as f32;
        grid_cell(curve.point_at(t))
    })
}

#[inline]
fn grid_cell(p: Point2f) -> (i64, i64) {
    let x = p.x.round() as i64;
    let y = p.y.round() as i64;
    (x.div_euclid(GRID_CELL), y.div_euclid(GRID_CELL))
}
