//! Resolution rescaling of a serialized SVG document.
//!
//! Only the root `<svg>` start tag is touched: `width`/`height` are multiplied
//! by the resolution factor and a `viewBox` spanning the pre-scale size is
//! inserted when missing, so the drawing scales with the canvas. Any document
//! that cannot be parsed comes back unchanged.

use core::fmt;
use std::str::FromStr;

use vt_core::Error;

/// Named output resolutions and their scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    Original,
    Medium,
    Large,
    Xl,
    Xxl,
    #[default]
    Xxxl,
    Max,
}

impl Resolution {
    pub const ALL: [Resolution; 7] = [
        Resolution::Original,
        Resolution::Medium,
        Resolution::Large,
        Resolution::Xl,
        Resolution::Xxl,
        Resolution::Xxxl,
        Resolution::Max,
    ];

    pub fn factor(self) -> f64 {
        match self {
            Self::Original => 1.0,
            Self::Medium => 0.75,
            Self::Large => 1.5,
            Self::Xl => 2.0,
            Self::Xxl => 2.5,
            Self::Xxxl => 3.0,
            Self::Max => 4.0,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xl => "xl",
            Self::Xxl => "xxl",
            Self::Xxxl => "xxxl",
            Self::Max => "max",
        }
    }

    /// `(round(w * factor), round(h * factor))`.
    pub fn scale_dims(self, width: f64, height: f64) -> (f64, f64) {
        let f = self.factor();
        ((width * f).round(), (height * f).round())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.key() == s)
            .ok_or_else(|| Error::UnknownResolution(s.to_owned()))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescaleError {
    MissingRoot,
    UnterminatedTag,
    MalformedAttribute { offset: usize },
    DuplicateAttribute(String),
    MissingClose,
}

impl fmt::Display for RescaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "no root <svg> element"),
            Self::UnterminatedTag => write!(f, "unterminated <svg> start tag"),
            Self::MalformedAttribute { offset } => {
                write!(f, "malformed attribute at byte {offset}")
            }
            Self::DuplicateAttribute(name) => write!(f, "duplicate attribute `{name}`"),
            Self::MissingClose => write!(f, "missing </svg>"),
        }
    }
}

impl std::error::Error for RescaleError {}

/// Rescales by resolution key; unknown keys use factor 1.0.
pub fn rescale(svg: &str, key: &str, base_width: f64, base_height: f64) -> String {
    let factor = match key.parse::<Resolution>() {
        Ok(res) => res.factor(),
        Err(err) => {
            tracing::warn!(%err, "using factor 1.0");
            1.0
        }
    };
    rescale_with_factor(svg, factor, base_width, base_height)
}

pub fn rescale_by(svg: &str, res: Resolution, base_width: f64, base_height: f64) -> String {
    rescale_with_factor(svg, res.factor(), base_width, base_height)
}

fn rescale_with_factor(svg: &str, factor: f64, base_width: f64, base_height: f64) -> String {
    if svg.is_empty() {
        return String::new();
    }
    match try_rescale(svg, factor, base_width, base_height) {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(%err, "svg left unscaled");
            svg.to_owned()
        }
    }
}

/// Fallible core of [`rescale`].
pub fn try_rescale(
    svg: &str,
    factor: f64,
    base_width: f64,
    base_height: f64,
) -> Result<String, RescaleError> {
    let root = parse_root(svg)?;

    let dim = |name: &str, base: f64| {
        root.attr(name)
            .and_then(|a| leading_number(a.value))
            .filter(|v| *v > 0.0)
            .unwrap_or(base)
    };
    let cur_w = dim("width", base_width);
    let cur_h = dim("height", base_height);
    let new_w = (cur_w * factor).round();
    let new_h = (cur_h * factor).round();

    // edits are applied back to front so earlier offsets stay valid
    let mut replace: Vec<(core::ops::Range<usize>, String)> = Vec::new();
    let mut insert = String::new();
    for (name, value) in [("width", new_w), ("height", new_h)] {
        match root.attr(name) {
            Some(a) => replace.push((a.value_range.clone(), value.to_string())),
            None => insert.push_str(&format!(r#" {name}="{value}""#)),
        }
    }
    if root.attr("viewBox").is_none() && cur_w > 0.0 && cur_h > 0.0 {
        insert.push_str(&format!(r#" viewBox="0 0 {cur_w} {cur_h}""#));
    }

    let mut out = svg.to_owned();
    replace.sort_by_key(|(r, _)| core::cmp::Reverse(r.start));
    for (range, value) in replace {
        out.replace_range(range, &value);
    }
    out.insert_str(root.name_end, &insert);

    tracing::debug!(factor, width = new_w, height = new_h, "rescaled svg");
    Ok(out)
}

struct Attr<'a> {
    name: &'a str,
    value: &'a str,
    value_range: core::ops::Range<usize>,
}

struct RootTag<'a> {
    /// Byte offset just past `<svg`.
    name_end: usize,
    attrs: Vec<Attr<'a>>,
}

impl<'a> RootTag<'a> {
    fn attr(&self, name: &str) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

fn parse_root(svg: &str) -> Result<RootTag<'_>, RescaleError> {
    let start = skip_prolog(svg)?;
    let rest = &svg[start..];
    let after_name = rest
        .strip_prefix("<svg")
        .filter(|r| r.starts_with(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/'))
        .ok_or(RescaleError::MissingRoot)?;

    let name_end = start + 4;
    let bytes = svg.as_bytes();
    let mut i = svg.len() - after_name.len();
    let mut attrs: Vec<Attr<'_>> = Vec::new();

    let self_closing = loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => return Err(RescaleError::UnterminatedTag),
            Some(b'>') => break false,
            Some(b'/') => {
                if bytes.get(i + 1) == Some(&b'>') {
                    break true;
                }
                return Err(RescaleError::MalformedAttribute { offset: i });
            }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len() && !matches!(bytes[i], b'=' | b'>' | b'/' | b'"' | b'\'')
            && !bytes[i].is_ascii_whitespace()
        {
            i += 1;
        }
        let name = &svg[name_start..i];
        if name.is_empty() {
            return Err(RescaleError::MalformedAttribute { offset: i });
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            return Err(RescaleError::MalformedAttribute { offset: i });
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let Some(&quote @ (b'"' | b'\'')) = bytes.get(i) else {
            return Err(RescaleError::MalformedAttribute { offset: i });
        };
        let value_start = i + 1;
        let Some(len) = svg[value_start..].find(quote as char) else {
            return Err(RescaleError::UnterminatedTag);
        };
        let value_end = value_start + len;

        if attrs.iter().any(|a| a.name == name) {
            return Err(RescaleError::DuplicateAttribute(name.to_owned()));
        }
        attrs.push(Attr {
            name,
            value: &svg[value_start..value_end],
            value_range: value_start..value_end,
        });
        i = value_end + 1;
    };

    if !self_closing && !svg[i..].contains("</svg>") {
        return Err(RescaleError::MissingClose);
    }

    Ok(RootTag { name_end, attrs })
}

/// Offset of the first element, past whitespace, `<?...?>`, comments and
/// `<!DOCTYPE ...>`.
fn skip_prolog(svg: &str) -> Result<usize, RescaleError> {
    let mut i = 0;
    loop {
        let rest = &svg[i..];
        let trimmed = rest.trim_start();
        i += rest.len() - trimmed.len();

        let (open, close) = if trimmed.starts_with("<?") {
            ("<?", "?>")
        } else if trimmed.starts_with("<!--") {
            ("<!--", "-->")
        } else if trimmed.starts_with("<!") {
            ("<!", ">")
        } else if trimmed.starts_with('<') {
            return Ok(i);
        } else {
            return Err(RescaleError::MissingRoot);
        };

        let Some(end) = trimmed[open.len()..].find(close) else {
            return Err(RescaleError::MissingRoot);
        };
        i += open.len() + end + close.len();
    }
}

/// Longest leading decimal number, after leading whitespace (`"100px"` -> 100).
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut i = 0;

    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while b.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while b.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse().ok()
}

#[cfg(test)]
mod tests {
    use crate::rescale::{
        RescaleError, Resolution, leading_number, rescale, rescale_by, try_rescale,
    };

    const DOC: &str = r#"<svg width="100" height="50" xmlns="http://www.w3.org/2000/svg"><path d="M 0 0"/></svg>"#;

    #[test]
    fn keys_round_trip_and_unknown_is_an_error() {
        for r in Resolution::ALL {
            assert_eq!(r.key().parse::<Resolution>().expect("known key"), r);
        }
        assert!("huge".parse::<Resolution>().is_err());
        assert_eq!(Resolution::default(), Resolution::Xxxl);
        assert_eq!(Resolution::Medium.scale_dims(101.0, 3.0), (76.0, 2.0));
    }

    #[test]
    fn original_keeps_size_and_adds_viewbox() {
        let out = rescale(DOC, "original", 10.0, 10.0);
        assert!(out.starts_with(
            r#"<svg viewBox="0 0 100 50" width="100" height="50" xmlns="#
        ));
        assert!(out.ends_with(r#"<path d="M 0 0"/></svg>"#));
    }

    #[test]
    fn xl_doubles_dimensions() {
        let out = rescale_by(DOC, Resolution::Xl, 10.0, 10.0);
        assert!(out.contains(r#"width="200""#));
        assert!(out.contains(r#"height="100""#));
        assert!(out.contains(r#"viewBox="0 0 100 50""#));
    }

    #[test]
    fn existing_viewbox_is_kept() {
        let doc = r#"<svg viewBox="0 0 7 7" width="100" height="50"></svg>"#;
        let out = rescale(doc, "xl", 1.0, 1.0);
        assert_eq!(
            out,
            r#"<svg viewBox="0 0 7 7" width="200" height="100"></svg>"#
        );
    }

    #[test]
    fn missing_or_unusable_dimensions_fall_back_to_base() {
        let doc = r#"<svg height="auto" xmlns="http://www.w3.org/2000/svg"></svg>"#;
        let out = rescale(doc, "large", 40.0, 20.0);
        assert!(out.contains(r#"height="30""#));
        assert!(out.contains(r#" width="60""#));
        assert!(out.contains(r#"viewBox="0 0 40 20""#));

        let zero = r#"<svg width="0" height="-3"></svg>"#;
        let out = rescale(zero, "original", 8.0, 6.0);
        assert!(out.contains(r#"width="8" height="6""#));
    }

    #[test]
    fn units_are_dropped_when_rewriting() {
        let doc = r#"<svg width="10.4px" height='20pt'></svg>"#;
        let out = rescale(doc, "xxl", 1.0, 1.0);
        assert_eq!(
            out,
            r#"<svg viewBox="0 0 10.4 20" width="26" height='50'></svg>"#
        );
    }

    #[test]
    fn prolog_and_comments_are_skipped() {
        let doc = "<?xml version=\"1.0\"?>\n<!-- sketch -->\n<svg width=\"4\" height=\"4\">\n</svg>";
        let out = rescale(doc, "max", 1.0, 1.0);
        assert!(out.contains(r#"<svg viewBox="0 0 4 4" width="16" height="16">"#));
        assert!(out.starts_with("<?xml"));
    }

    #[test]
    fn unknown_key_uses_unit_factor() {
        let out = rescale(DOC, "gigantic", 1.0, 1.0);
        assert!(out.contains(r#"width="100" height="50""#));
    }

    #[test]
    fn malformed_documents_come_back_unchanged() {
        let cases = [
            "not svg at all",
            "<html></html>",
            r#"<svg width="10" height="10">"#,
            r#"<svg width="10 height="10"></svg>"#,
            r#"<svg width=10></svg>"#,
            r#"<svg width="1" width="2"></svg>"#,
            "<svg",
        ];
        for doc in cases {
            assert_eq!(rescale(doc, "xl", 5.0, 5.0), doc);
        }
        assert_eq!(rescale("", "xl", 5.0, 5.0), "");
    }

    #[test]
    fn parse_errors_are_reported() {
        assert_eq!(
            try_rescale("<g/>", 2.0, 1.0, 1.0),
            Err(RescaleError::MissingRoot)
        );
        assert_eq!(
            try_rescale("<svg width=\"1\">", 2.0, 1.0, 1.0),
            Err(RescaleError::MissingClose)
        );
        assert_eq!(
            try_rescale("<svg width=\"1", 2.0, 1.0, 1.0),
            Err(RescaleError::UnterminatedTag)
        );
    }

    #[test]
    fn self_closing_root_needs_no_close_tag() {
        let out = try_rescale(r#"<svg width="3" height="3"/>"#, 2.0, 1.0, 1.0)
            .expect("self-closing root");
        assert_eq!(out, r#"<svg viewBox="0 0 3 3" width="6" height="6"/>"#);
    }

    #[test]
    fn leading_number_parses_like_a_lenient_float() {
        assert_eq!(leading_number("100"), Some(100.0));
        assert_eq!(leading_number("  12.5px"), Some(12.5));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("3."), Some(3.0));
        assert_eq!(leading_number("1e2em"), Some(100.0));
        assert_eq!(leading_number("2e"), Some(2.0));
        assert_eq!(leading_number("-4"), Some(-4.0));
        assert_eq!(leading_number("auto"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number(""), None);
    }
}
