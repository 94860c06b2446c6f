use std::fmt::Write;

use vt_core::{Point2f, Polyline2f};
use vt_stroke::Stroke;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One `M x y Q cx cy, x y` path per pen-down stroke; transparent background.
pub fn strokes_to_svg(strokes: &[Stroke], width: usize, height: usize) -> String {
    let mut out = String::with_capacity(128 + strokes.len() * 160);
    let _ = write!(
        out,
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="{SVG_NS}">"#
    );

    for stroke in strokes.iter().filter(|s| s.is_down()) {
        let c = &stroke.curve;
        let _ = write!(
            out,
            r#"<path d="M {} {} Q {} {}, {} {}" stroke="black" stroke-width="{}" fill="none" stroke-linecap="round" stroke-linejoin="round" />"#,
            c.p0.x,
            c.p0.y,
            c.p1.x,
            c.p1.y,
            c.p2.x,
            c.p2.y,
            c.mean_width()
        );
    }

    out.push_str("</svg>");
    out
}

/// Path data `M x0,y0 L x1,y1 ...`; `None` for fewer than two points.
pub fn polyline_path_data(points: &[Point2f]) -> Option<String> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut d = String::with_capacity(points.len() * 12);
    let _ = write!(d, "M {},{}", first.x, first.y);
    for p in rest {
        let _ = write!(d, " L {},{}", p.x, p.y);
    }
    Some(d)
}

/// Standalone document with a white background and one path per polyline.
///
/// Zero paths still produce a valid document (background only).
pub fn polylines_to_svg(
    paths: &[Polyline2f],
    width: usize,
    height: usize,
    stroke_width: f32,
) -> String {
    let mut out = String::with_capacity(256 + paths.len() * 96);
    let _ = writeln!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#
    );
    let _ = writeln!(
        out,
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="{SVG_NS}" version="1.1">"#
    );
    let _ = writeln!(
        out,
        r#"<rect width="{width}" height="{height}" fill="white"/>"#
    );

    for d in paths.iter().filter_map(|p| polyline_path_data(&p.points)) {
        let _ = writeln!(
            out,
            r#"<path d="{d}" stroke="black" stroke-width="{stroke_width}" fill="none" stroke-linecap="round" stroke-linejoin="round"/>"#
        );
    }

    out.push_str("</svg>");
    out
}
