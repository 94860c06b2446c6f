use vt_core::{ImageView, Rgba};
use vt_edge::{SobelConfig, SobelDetector};
use vt_stroke::{ConsolidateConfig, Stroke, consolidate, fit_path};
use vt_svg::{Surface, polylines_to_svg, render_strokes, strokes_to_svg};
use vt_trace::{DarkForeground, EdgeForeground, PathTracer, WalkConfig, simplify_polyline};

use crate::config::{
    DynamicWindow, EpsilonPolicy, PolylineEpsilonPolicy, StrokeEpsilonPolicy, TraceSettings,
};

/// Output of one stroke-pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeTrace {
    pub strokes: Vec<Stroke>,
    pub svg: String,
    pub window: DynamicWindow,
}

/// Stroke pipeline: Sobel edges, greedy walk, midpoint curve fitting,
/// consolidation, SVG.
///
/// Returns `None` for a zero-sized buffer. An image without edges yields an
/// empty stroke list and a document without paths.
pub fn trace(image: &ImageView<'_, Rgba>, settings: &TraceSettings) -> Option<StrokeTrace> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        tracing::warn!(width = w, height = h, "empty pixel buffer, nothing to trace");
        return None;
    }

    let window = DynamicWindow::centered(w, h, settings.dynamic_window_size);

    let edges = SobelDetector::new().detect_rgba(image, &SobelConfig::default());
    let paths = PathTracer::new().trace(&EdgeForeground::new(edges.as_view()), &WalkConfig::greedy());

    let epsilon = settings
        .stroke_simplify
        .then(|| StrokeEpsilonPolicy.epsilon(settings.simplify_level));

    let mut fitted = Vec::new();
    for path in &paths {
        match epsilon {
            Some(eps) => fitted.extend(fit_path(&simplify_polyline(path, eps).points)),
            None => fitted.extend(fit_path(&path.points)),
        }
    }

    let cfg = ConsolidateConfig {
        regularization_weight: settings.regularization_weight,
    };
    let strokes = consolidate(&fitted, &cfg);
    if strokes.is_empty() {
        tracing::debug!(width = w, height = h, "no edges found");
    }

    tracing::debug!(
        paths = paths.len(),
        fitted = fitted.len(),
        strokes = strokes.len(),
        "stroke trace"
    );

    let svg = strokes_to_svg(&strokes, w, h);
    Some(StrokeTrace {
        strokes,
        svg,
        window,
    })
}

/// Polyline pipeline: stride-3 clockwise walk over dark pixels,
/// Douglas-Peucker, standalone SVG with a white background.
pub fn trace_to_svg(
    image: &ImageView<'_, Rgba>,
    line_thickness: u8,
    simplify_level: u8,
) -> Option<String> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        tracing::warn!(width = w, height = h, "empty pixel buffer, nothing to trace");
        return None;
    }

    let epsilon = PolylineEpsilonPolicy.epsilon(simplify_level);
    let paths: Vec<_> = PathTracer::new()
        .trace(&DarkForeground::new(*image), &WalkConfig::polyline())
        .iter()
        .map(|p| simplify_polyline(p, epsilon))
        .collect();

    let stroke_width = f32::from(line_thickness.clamp(1, 5));
    tracing::debug!(
        paths = paths.len(),
        epsilon,
        stroke_width,
        "polyline trace"
    );

    Some(polylines_to_svg(&paths, w, h, stroke_width))
}

/// [`trace_to_svg`] with the settings' thickness and simplify level, scaled
/// to the settings' output resolution.
pub fn vectorize(image: &ImageView<'_, Rgba>, settings: &TraceSettings) -> Option<String> {
    let svg = trace_to_svg(image, settings.line_thickness, settings.simplify_level)?;
    Some(vt_svg::rescale_by(
        &svg,
        settings.output_resolution,
        image.width() as f64,
        image.height() as f64,
    ))
}

/// Scales a finished document by resolution key. See [`vt_svg::rescale`].
pub fn rescale(svg: &str, key: &str, base_width: f64, base_height: f64) -> String {
    vt_svg::rescale(svg, key, base_width, base_height)
}

/// Redraws strokes onto a surface. See [`vt_svg::render_strokes`].
pub fn render<S: Surface + ?Sized>(strokes: &[Stroke], surface: &mut S) {
    render_strokes(strokes, surface);
}
