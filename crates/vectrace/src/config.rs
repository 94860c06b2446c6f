use serde::{Deserialize, Serialize};
use vt_core::Point2f;

pub use vt_svg::Resolution;

pub const MIN_WINDOW_SIZE: usize = 32;
pub const MAX_WINDOW_SIZE: usize = 512;
pub const DEFAULT_WINDOW_SIZE: usize = 128;

/// Drawing style label. Carried with the settings; no tracing stage
/// branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    #[default]
    Outline,
    Sketch,
    Detailed,
}

/// Per-call tracing settings.
///
/// `detail_level`, `enhance_edges`, `trace_mode`, `dynamic_window_size` and
/// `regularization_weight` are carried and reported but do not change the
/// traced geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceSettings {
    pub trace_mode: TraceMode,
    /// Polyline stroke width, 1..=5.
    pub line_thickness: u8,
    pub detail_level: u8,
    /// 0..=100, drives the simplification tolerance.
    pub simplify_level: u8,
    pub enhance_edges: bool,
    #[serde(with = "resolution_key")]
    pub output_resolution: Resolution,
    pub dynamic_window_size: usize,
    pub regularization_weight: f32,
    /// Run Douglas-Peucker on stroke-pipeline paths before fitting.
    pub stroke_simplify: bool,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            trace_mode: TraceMode::Outline,
            line_thickness: 2,
            detail_level: 14,
            simplify_level: 52,
            enhance_edges: true,
            output_resolution: Resolution::Xxxl,
            dynamic_window_size: DEFAULT_WINDOW_SIZE,
            regularization_weight: 0.1,
            stroke_simplify: false,
        }
    }
}

impl TraceSettings {
    /// `line_thickness` clamped to 1..=5.
    pub fn stroke_width(&self) -> f32 {
        f32::from(self.line_thickness.clamp(1, 5))
    }
}

/// Maps a 0..=100 simplify level to a Douglas-Peucker tolerance in pixels.
pub trait EpsilonPolicy {
    fn epsilon(&self, level: u8) -> f32;
}

/// `0.5 + level / 100 * 4.5`: tolerance of the polyline pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolylineEpsilonPolicy;

impl EpsilonPolicy for PolylineEpsilonPolicy {
    fn epsilon(&self, level: u8) -> f32 {
        0.5 + level_fraction(level) * 4.5
    }
}

/// `level / 100 * 2.0`: tolerance of the opt-in stroke simplification.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrokeEpsilonPolicy;

impl EpsilonPolicy for StrokeEpsilonPolicy {
    fn epsilon(&self, level: u8) -> f32 {
        level_fraction(level) * 2.0
    }
}

fn level_fraction(level: u8) -> f32 {
    f32::from(level.min(100)) / 100.0
}

/// Region-of-interest state reported with every stroke run.
///
/// Path generation never reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicWindow {
    pub position: Point2f,
    pub size: usize,
}

impl DynamicWindow {
    /// Window at the canvas center with `size` clamped to
    /// `MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE`.
    pub fn centered(width: usize, height: usize, size: usize) -> Self {
        Self {
            position: Point2f::new(width as f32 / 2.0, height as f32 / 2.0),
            size: size.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE),
        }
    }
}

/// Serializes [`Resolution`] as its lower-case key.
mod resolution_key {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Resolution;

    pub fn serialize<S: Serializer>(res: &Resolution, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(res.key())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Resolution, D::Error> {
        let key = String::deserialize(d)?;
        key.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use vt_core::Point2f;

    use crate::config::{
        DynamicWindow, EpsilonPolicy, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE, PolylineEpsilonPolicy,
        Resolution, StrokeEpsilonPolicy, TraceMode, TraceSettings,
    };

    #[test]
    fn defaults_match_the_application() {
        let s = TraceSettings::default();
        assert_eq!(s.line_thickness, 2);
        assert_eq!(s.detail_level, 14);
        assert_eq!(s.simplify_level, 52);
        assert!(s.enhance_edges);
        assert_eq!(s.trace_mode, TraceMode::Outline);
        assert_eq!(s.output_resolution, Resolution::Xxxl);
        assert_eq!(s.dynamic_window_size, 128);
        assert!(!s.stroke_simplify);
    }

    #[test]
    fn epsilon_policies_stay_distinct() {
        let poly = PolylineEpsilonPolicy;
        let stroke = StrokeEpsilonPolicy;

        assert_eq!(poly.epsilon(0), 0.5);
        assert_eq!(poly.epsilon(100), 5.0);
        assert_eq!(poly.epsilon(250), 5.0);
        assert_eq!(stroke.epsilon(0), 0.0);
        assert_eq!(stroke.epsilon(50), 1.0);
        assert_eq!(stroke.epsilon(200), 2.0);
    }

    #[test]
    fn window_is_centered_and_clamped() {
        let w = DynamicWindow::centered(100, 40, 8);
        assert_eq!(w.position, Point2f::new(50.0, 20.0));
        assert_eq!(w.size, MIN_WINDOW_SIZE);
        assert_eq!(DynamicWindow::centered(1, 1, 4096).size, MAX_WINDOW_SIZE);
        assert_eq!(DynamicWindow::centered(1, 1, 128).size, 128);
    }

    #[test]
    fn stroke_width_is_clamped() {
        let mut s = TraceSettings::default();
        s.line_thickness = 0;
        assert_eq!(s.stroke_width(), 1.0);
        s.line_thickness = 9;
        assert_eq!(s.stroke_width(), 5.0);
    }

    #[test]
    fn settings_load_from_partial_json() {
        let s: TraceSettings = serde_json::from_str(
            r#"{ "simplify_level": 100, "output_resolution": "xl", "trace_mode": "sketch" }"#,
        )
        .expect("valid settings");
        assert_eq!(s.simplify_level, 100);
        assert_eq!(s.output_resolution, Resolution::Xl);
        assert_eq!(s.trace_mode, TraceMode::Sketch);
        assert_eq!(s.line_thickness, 2);

        let json = serde_json::to_string(&s).expect("serializable");
        assert!(json.contains(r#""output_resolution":"xl""#));
        let back: TraceSettings = serde_json::from_str(&json).expect("round trip");
        assert_eq!(back, s);
    }

    #[test]
    fn unknown_resolution_key_is_rejected() {
        let err = serde_json::from_str::<TraceSettings>(r#"{ "output_resolution": "huge" }"#)
            .expect_err("unknown key");
        assert!(err.to_string().contains("huge"));
    }
}
