use vt_core::Point2f;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCurve {
    pub p0: Point2f,
    pub p1: Point2f,
    pub p2: Point2f,
    pub width0: f32,
    pub width2: f32,
}

impl QuadraticCurve {
    /// `(1-t)^2 p0 + 2(1-t)t p1 + t^2 p2`
    pub fn point_at(&self, t: f32) -> Point2f {
        let u = 1.0 - t;
        let a = u * u;
        let b = 2.0 * u * t;
        let c = t * t;
        Point2f {
            x: a * self.p0.x + b * self.p1.x + c * self.p2.x,
            y: a * self.p0.y + b * self.p1.y + c * self.p2.y,
        }
    }

    /// Widths are never interpolated along the curve; consumers use the mean.
    pub fn mean_width(&self) -> f32 {
        (self.width0 + self.width2) / 2.0
    }

    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            p0: self.p0.scaled(sx, sy),
            p1: self.p1.scaled(sx, sy),
            p2: self.p2.scaled(sx, sy),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Down,
    /// Pen-lift marker; kept in place, never drawn.
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub curve: QuadraticCurve,
    pub pen: PenState,
}

impl Stroke {
    pub fn is_down(&self) -> bool {
        self.pen == PenState::Down
    }

    pub fn start(&self) -> Point2f {
        self.curve.p0
    }

    pub fn end(&self) -> Point2f {
        self.curve.p2
    }
}

/// Rescales control points only. Widths are left as they are.
pub fn scale_strokes(strokes: &[Stroke], sx: f32, sy: f32) -> Vec<Stroke> {
    strokes
        .iter()
        .map(|s| Stroke {
            curve: s.curve.scaled(sx, sy),
            pen: s.pen,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use vt_core::Point2f;

    use crate::stroke::{PenState, QuadraticCurve, Stroke, scale_strokes};

    fn curve() -> QuadraticCurve {
        QuadraticCurve {
            p0: Point2f::new(0.0, 0.0),
            p1: Point2f::new(5.0, 10.0),
            p2: Point2f::new(10.0, 0.0),
            width0: 1.0,
            width2: 3.0,
        }
    }

    #[test]
    fn bezier_point_hits_endpoints_and_apex() {
        let c = curve();
        assert_eq!(c.point_at(0.0), c.p0);
        assert_eq!(c.point_at(1.0), c.p2);
        assert_eq!(c.point_at(0.5), Point2f::new(5.0, 5.0));
        assert_eq!(c.mean_width(), 2.0);
    }

    #[test]
    fn scaling_keeps_pen_and_widths() {
        let strokes = [
            Stroke {
                curve: curve(),
                pen: PenState::Down,
            },
            Stroke {
                curve: curve(),
                pen: PenState::Up,
            },
        ];
        let scaled = scale_strokes(&strokes, 2.0, 0.5);

        assert_eq!(scaled.len(), 2);
        assert_eq!(scaled[0].curve.p1, Point2f::new(10.0, 5.0));
        assert_eq!(scaled[0].end(), Point2f::new(20.0, 0.0));
        assert_eq!(scaled[0].curve.width2, 3.0);
        assert_eq!(scaled[1].pen, PenState::Up);
        assert!(scaled[0].is_down());
    }
}
