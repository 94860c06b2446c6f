use vt_core::{Point2f, Polyline2f};

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// A degenerate line (`a == b`) measures the plain distance to `a`.
pub fn perpendicular_distance(p: Point2f, a: Point2f, b: Point2f) -> f32 {
    let d = b - a;
    let len_sq = d.norm_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }

    let t = (p - a).dot(d) / len_sq;
    p.distance(a + d * t)
}

/// Douglas-Peucker reduction.
///
/// Inputs of two points or fewer come back unchanged. Otherwise the interior
/// point farthest from the chord splits the run when its distance exceeds
/// `epsilon` (first maximum wins on ties); the halves are simplified
/// recursively and joined without repeating the split point.
pub fn simplify(points: &[Point2f], epsilon: f32) -> Vec<Point2f> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    simplify_into(points, epsilon, &mut out);
    out
}

pub fn simplify_polyline(line: &Polyline2f, epsilon: f32) -> Polyline2f {
    Polyline2f {
        points: simplify(&line.points, epsilon),
    }
}

fn simplify_into(points: &[Point2f], epsilon: f32, out: &mut Vec<Point2f>) {
    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_d = 0.0f32;
    let mut split = 0usize;
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance(p, first, last);
        if d > max_d {
            max_d = d;
            split = i;
        }
    }

    if max_d > epsilon {
        simplify_into(&points[..=split], epsilon, out);
        // shared split point already emitted as the last point of the left half
        out.pop();
        simplify_into(&points[split..], epsilon, out);
    } else {
        out.push(first);
        out.push(last);
    }
}
