//! Raster redraw of traced strokes.
//!
//! A stroke point `(x, y)` lands at canvas position `(x, y)`, the top-left
//! corner of pixel `(x, y)`, exactly as in the SVG output. Pixel `(x, y)`
//! covers `[x, x + 1) x [y, y + 1)`.

use tiny_skia::{
    Color, FillRule, LineCap as SkiaLineCap, LineJoin as SkiaLineJoin, Paint as SkiaPaint,
    PathBuilder, Pixmap, Stroke as SkiaStroke, Transform,
};
use vt_core::{Image, Point2f};
use vt_stroke::Stroke;

pub const PAPER: u8 = 255;
pub const INK: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub ink: u8,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
            ink: INK,
        }
    }
}

/// Drawing target for [`render_strokes`].
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn clear(&mut self);
    fn stroke_quadratic(&mut self, p0: Point2f, p1: Point2f, p2: Point2f, style: &StrokeStyle);
}

/// Clears the surface, then draws every pen-down stroke with its mean width.
pub fn render_strokes<S: Surface + ?Sized>(strokes: &[Stroke], surface: &mut S) {
    surface.clear();

    let mut drawn = 0usize;
    for stroke in strokes.iter().filter(|s| s.is_down()) {
        let c = &stroke.curve;
        let style = StrokeStyle {
            width: c.mean_width(),
            ..StrokeStyle::default()
        };
        surface.stroke_quadratic(c.p0, c.p1, c.p2, &style);
        drawn += 1;
    }

    tracing::debug!(
        strokes = strokes.len(),
        drawn,
        width = surface.width(),
        height = surface.height(),
        "rendered strokes"
    );
}

fn to_skia_line_cap(cap: LineCap) -> SkiaLineCap {
    match cap {
        LineCap::Butt => SkiaLineCap::Butt,
        LineCap::Round => SkiaLineCap::Round,
    }
}

fn to_skia_line_join(join: LineJoin) -> SkiaLineJoin {
    match join {
        LineJoin::Miter => SkiaLineJoin::Miter,
        LineJoin::Round => SkiaLineJoin::Round,
    }
}

fn to_skia_paint(ink: u8) -> SkiaPaint<'static> {
    let mut paint = SkiaPaint::default();
    paint.set_color(Color::from_rgba8(ink, ink, ink, 255));
    // binary output: a pixel is inked iff its center is covered
    paint.anti_alias = false;
    paint
}

/// Grayscale canvas backed by a `tiny_skia::Pixmap`.
///
/// Strokes are stroked as real quadratic paths, so the requested cap and join
/// are honored and the cost does not depend on how far a curve reaches past
/// the canvas. A zero-area canvas has no pixmap and ignores drawing.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    pixmap: Option<Pixmap>,
}

impl RasterSurface {
    pub fn new(width: usize, height: usize) -> Self {
        let pixmap = u32::try_from(width)
            .ok()
            .zip(u32::try_from(height).ok())
            .and_then(|(w, h)| Pixmap::new(w, h))
            .map(|mut p| {
                p.fill(Color::WHITE);
                p
            });
        if pixmap.is_none() && width > 0 && height > 0 {
            tracing::warn!(width, height, "canvas too large, preview stays blank");
        }

        Self {
            width,
            height,
            pixmap,
        }
    }

    /// Grayscale copy of the canvas.
    pub fn image(&self) -> Image<u8> {
        let mut out = Image::new_fill(self.width, self.height, PAPER);
        if let Some(pixmap) = &self.pixmap {
            for (dst, px) in out.data_mut().iter_mut().zip(pixmap.pixels()) {
                *dst = px.red();
            }
        }
        out
    }

    pub fn into_image(self) -> Image<u8> {
        self.image()
    }

    /// False when the curve hull, grown by the stroke radius, misses the
    /// canvas or is not finite.
    fn may_touch_canvas(&self, pts: [Point2f; 3], radius: f32) -> bool {
        if pts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return false;
        }
        let min_x = pts.iter().map(|p| p.x).fold(f32::INFINITY, f32::min) - radius;
        let max_x = pts.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max) + radius;
        let min_y = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min) - radius;
        let max_y = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max) + radius;

        max_x >= 0.0 && max_y >= 0.0 && min_x <= self.width as f32 && min_y <= self.height as f32
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::WHITE);
        }
    }

    fn stroke_quadratic(&mut self, p0: Point2f, p1: Point2f, p2: Point2f, style: &StrokeStyle) {
        let width = style.width.max(1.0);
        if !self.may_touch_canvas([p0, p1, p2], width / 2.0) {
            return;
        }
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let paint = to_skia_paint(style.ink);

        // a placement stroke has no direction; only a round cap leaves a mark
        if p0 == p1 && p1 == p2 {
            if style.cap == LineCap::Round {
                if let Some(dot) = PathBuilder::from_circle(p0.x, p0.y, width / 2.0) {
                    pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                }
            }
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(p0.x, p0.y);
        pb.quad_to(p1.x, p1.y, p2.x, p2.y);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = SkiaStroke {
            width,
            line_cap: to_skia_line_cap(style.cap),
            line_join: to_skia_line_join(style.join),
            ..SkiaStroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use vt_core::Point2f;
    use vt_stroke::{PenState, QuadraticCurve, Stroke};

    use crate::render::{INK, LineCap, PAPER, RasterSurface, StrokeStyle, Surface, render_strokes};

    fn stroke(a: (f32, f32), b: (f32, f32), w: (f32, f32), pen: PenState) -> Stroke {
        let p0 = Point2f::new(a.0, a.1);
        let p2 = Point2f::new(b.0, b.1);
        Stroke {
            curve: QuadraticCurve {
                p0,
                p1: p0.midpoint(p2),
                p2,
                width0: w.0,
                width2: w.1,
            },
            pen,
        }
    }

    fn line(surface: &mut RasterSurface, a: (f32, f32), b: (f32, f32), style: &StrokeStyle) {
        let p0 = Point2f::new(a.0, a.1);
        let p2 = Point2f::new(b.0, b.1);
        surface.stroke_quadratic(p0, p0.midpoint(p2), p2, style);
    }

    #[derive(Default)]
    struct Recorder {
        cleared: usize,
        calls: Vec<(Point2f, Point2f, f32)>,
    }

    impl Surface for Recorder {
        fn width(&self) -> usize {
            10
        }

        fn height(&self) -> usize {
            10
        }

        fn clear(&mut self) {
            self.cleared += 1;
        }

        fn stroke_quadratic(&mut self, p0: Point2f, _p1: Point2f, p2: Point2f, style: &StrokeStyle) {
            self.calls.push((p0, p2, style.width));
        }
    }

    #[test]
    fn only_pen_down_strokes_are_drawn_with_mean_width() {
        let strokes = [
            stroke((0.0, 0.0), (5.0, 0.0), (1.0, 3.0), PenState::Down),
            stroke((5.0, 0.0), (9.0, 9.0), (2.0, 2.0), PenState::Up),
            stroke((1.0, 1.0), (2.0, 2.0), (4.0, 4.0), PenState::Down),
        ];
        let mut rec = Recorder::default();
        render_strokes(&strokes, &mut rec);

        assert_eq!(rec.cleared, 1);
        assert_eq!(rec.calls.len(), 2);
        assert_eq!(rec.calls[0].2, 2.0);
        assert_eq!(rec.calls[1].0, Point2f::new(1.0, 1.0));
        assert_eq!(rec.calls[1].2, 4.0);
    }

    #[test]
    fn raster_line_is_inked_along_its_length_only() {
        let mut surface = RasterSurface::new(20, 12);
        let strokes = [stroke((2.0, 5.0), (12.0, 5.0), (2.0, 2.0), PenState::Down)];
        render_strokes(&strokes, &mut surface);

        let img = surface.image();
        let view = img.as_view();
        for x in 2..12 {
            assert_eq!(*view.get(x, 5).expect("in bounds"), INK, "x={x}");
            assert_eq!(*view.get(x, 4).expect("in bounds"), INK, "x={x}");
        }
        assert_eq!(*view.get(7, 0).expect("in bounds"), PAPER);
        assert_eq!(*view.get(7, 8).expect("in bounds"), PAPER);
        assert_eq!(*view.get(16, 5).expect("in bounds"), PAPER);
    }

    #[test]
    fn zero_length_stroke_leaves_a_dot() {
        let mut surface = RasterSurface::new(8, 8);
        let dot = stroke((4.0, 4.0), (4.0, 4.0), (2.0, 2.0), PenState::Down);
        render_strokes(&[dot], &mut surface);

        let inked = surface.image().data().iter().filter(|&&v| v == INK).count();
        assert_eq!(inked, 4);
    }

    #[test]
    fn butt_caps_stop_at_the_endpoints_and_round_caps_overhang() {
        let butt = StrokeStyle {
            width: 4.0,
            cap: LineCap::Butt,
            ..StrokeStyle::default()
        };
        let round = StrokeStyle {
            width: 4.0,
            cap: LineCap::Round,
            ..StrokeStyle::default()
        };

        let mut surface = RasterSurface::new(16, 10);
        line(&mut surface, (3.0, 5.0), (10.0, 5.0), &butt);
        let img = surface.image();
        let view = img.as_view();
        assert_eq!(*view.get(3, 5).expect("in bounds"), INK);
        assert_eq!(*view.get(9, 5).expect("in bounds"), INK);
        assert_eq!(*view.get(2, 5).expect("in bounds"), PAPER);
        assert_eq!(*view.get(10, 5).expect("in bounds"), PAPER);

        surface.clear();
        line(&mut surface, (3.0, 5.0), (10.0, 5.0), &round);
        let img = surface.image();
        let view = img.as_view();
        assert_eq!(*view.get(2, 5).expect("in bounds"), INK);
        assert_eq!(*view.get(1, 5).expect("in bounds"), INK);
        assert_eq!(*view.get(10, 5).expect("in bounds"), INK);
        assert_eq!(*view.get(14, 5).expect("in bounds"), PAPER);

        // a placement dot only shows with a round cap
        let mut surface = RasterSurface::new(8, 8);
        line(&mut surface, (4.0, 4.0), (4.0, 4.0), &butt);
        assert!(surface.image().data().iter().all(|&v| v == PAPER));
    }

    #[test]
    fn far_off_canvas_coordinates_finish_without_stray_ink() {
        let style = StrokeStyle {
            width: 2.0,
            ..StrokeStyle::default()
        };
        let mut surface = RasterSurface::new(16, 10);

        line(&mut surface, (-1e30, 5.0), (1e30, 5.0), &style);
        line(&mut surface, (1e9, 1e9), (2e9, 3e9), &style);
        line(&mut surface, (f32::NEG_INFINITY, 2.0), (f32::INFINITY, 2.0), &style);
        line(&mut surface, (f32::NAN, 0.0), (4.0, 4.0), &style);
        let img = surface.image();
        for x in 0..16 {
            assert_eq!(*img.as_view().get(x, 0).expect("in bounds"), PAPER, "x={x}");
            assert_eq!(*img.as_view().get(x, 9).expect("in bounds"), PAPER, "x={x}");
        }

        surface.clear();
        line(&mut surface, (-1e4, 5.0), (1e4, 5.0), &style);
        let img = surface.image();
        assert_eq!(*img.as_view().get(8, 5).expect("in bounds"), INK);
        assert_eq!(*img.as_view().get(8, 0).expect("in bounds"), PAPER);
    }

    #[test]
    fn clear_resets_to_paper_and_edges_are_clipped() {
        let mut surface = RasterSurface::new(6, 6);
        let style = StrokeStyle {
            width: 6.0,
            ..StrokeStyle::default()
        };
        let corner = Point2f::new(-2.0, -2.0);
        surface.stroke_quadratic(corner, corner, Point2f::new(0.0, 0.0), &style);
        assert_eq!(*surface.image().as_view().get(0, 0).expect("in bounds"), INK);

        render_strokes(&[], &mut surface);
        assert!(surface.image().data().iter().all(|&v| v == PAPER));

        let mut empty = RasterSurface::new(0, 0);
        line(&mut empty, (0.0, 0.0), (3.0, 3.0), &style);
        assert!(empty.into_image().is_empty());
    }
}
