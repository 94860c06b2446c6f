use vt_core::Point2f;

use crate::stroke::{PenState, QuadraticCurve, Stroke};

pub const STROKE_WIDTH: f32 = 2.0;

/// One quadratic stroke per consecutive point pair, control point at the
/// midpoint, preceded by a zero-length placement stroke at the first point.
///
/// Fewer than two points produce nothing.
pub fn fit_path(points: &[Point2f]) -> Vec<Stroke> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut strokes = Vec::with_capacity(points.len());
    let origin = points[0];
    strokes.push(pen_down(origin, origin, origin));

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        strokes.push(pen_down(a, a.midpoint(b), b));
    }

    strokes
}

fn pen_down(p0: Point2f, p1: Point2f, p2: Point2f) -> Stroke {
    Stroke {
        curve: QuadraticCurve {
            p0,
            p1,
            p2,
            width0: STROKE_WIDTH,
            width2: STROKE_WIDTH,
        },
        pen: PenState::Down,
    }
}

#[cfg(test)]
mod tests {
    use vt_core::Point2f;

    use crate::fit::{STROKE_WIDTH, fit_path};
    use crate::stroke::PenState;

    #[test]
    fn short_paths_yield_no_strokes() {
        assert!(fit_path(&[]).is_empty());
        assert!(fit_path(&[Point2f::new(3.0, 3.0)]).is_empty());
    }

    #[test]
    fn placement_stroke_then_one_per_segment() {
        let pts = [
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(2.0, 1.0),
        ];
        let strokes = fit_path(&pts);
        assert_eq!(strokes.len(), 3);

        let placement = strokes[0].curve;
        assert_eq!(placement.p0, pts[0]);
        assert_eq!(placement.p1, pts[0]);
        assert_eq!(placement.p2, pts[0]);

        assert_eq!(strokes[1].curve.p0, pts[0]);
        assert_eq!(strokes[1].curve.p1, Point2f::new(0.5, 0.0));
        assert_eq!(strokes[1].curve.p2, pts[1]);
        assert_eq!(strokes[2].curve.p1, Point2f::new(1.5, 0.5));
        assert_eq!(strokes[2].curve.p2, pts[2]);

        for s in &strokes {
            assert_eq!(s.pen, PenState::Down);
            assert_eq!(s.curve.width0, STROKE_WIDTH);
            assert_eq!(s.curve.width2, STROKE_WIDTH);
        }
    }
}
