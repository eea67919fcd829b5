// stroke-to-fill rewriting of SVG documents
//
// Each `path` element carrying a `stroke` is replaced by a path whose `d` is
// the outline of the original stroke, painted with `fill` in the old stroke
// colour. Documents without convertible paths are returned untouched.

use crate::document::{EventList, RawElement};
use crate::errors::Result;
use crate::outline::{LineCap, LineJoin, Outliner, StrokeOutliner};

/// Attributes which have no meaning once a stroke has become a fill.
pub const STROKE_ATTRS: [&str; 4] = ["stroke", "stroke-width", "stroke-linecap", "stroke-linejoin"];

/// Stroke styling read from a single `path` element.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStyle {
    pub d: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub fill: Option<String>,
}

impl PathStyle {
    /// Read the stroke style of `el`, or `None` if the element can't be
    /// converted (missing `d`/`stroke`/`stroke-width`, a zero or unparsable
    /// width, or `stroke="none"`).
    pub fn from_element(el: &RawElement) -> Option<Self> {
        let d = el.get_attr("d").filter(|d| !d.trim().is_empty())?;
        let stroke = el.get_attr("stroke").filter(|s| !s.trim().is_empty())?;
        if stroke.trim() == "none" {
            return None;
        }
        let stroke_width = el
            .get_attr("stroke-width")
            .and_then(strp_leading)
            .filter(|w| w.is_finite() && *w != 0.)?
            .abs();
        let cap = el
            .get_attr("stroke-linecap")
            .and_then(|c| c.parse().ok())
            .unwrap_or_default();
        let join = el
            .get_attr("stroke-linejoin")
            .and_then(|j| j.parse().ok())
            .unwrap_or_default();

        Some(Self {
            d: d.to_string(),
            stroke: stroke.to_string(),
            stroke_width,
            cap,
            join,
            fill: el.get_attr("fill").map(String::from),
        })
    }
}

/// Parse the leading number of `s`, ignoring any trailing unit (e.g. "2px").
fn strp_leading(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let (mut seen_digit, mut seen_dot, mut seen_exp) = (false, false, false);
    for (i, &c) in bytes.iter().enumerate() {
        match c {
            b'+' | b'-' if i == 0 || matches!(bytes[i - 1], b'e' | b'E') => {}
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end = i + 1;
    }
    // back off any dangling exponent or sign
    let mut num = &s[..end];
    while !num.is_empty() {
        if let Ok(value) = num.parse() {
            return Some(value);
        }
        num = &num[..num.len() - 1];
    }
    None
}

fn is_stroke_path(el: &RawElement) -> bool {
    el.name() == "path" && el.has_attr("stroke")
}

/// Build the filled replacement for a stroked path element.
fn stroke_to_fill<O: Outliner + ?Sized>(el: &RawElement, outliner: &O) -> Option<RawElement> {
    let Some(style) = PathStyle::from_element(el) else {
        log::debug!("Leaving <{el}> unconverted");
        return None;
    };
    let d = match outliner.outline(&style.d, style.stroke_width, style.join, style.cap) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Leaving <{el}> unconverted: {e}");
            return None;
        }
    };

    let mut el = el.clone();
    for attr in STROKE_ATTRS {
        el.remove_attr(attr);
    }
    // fill="none" would make the new outline invisible
    if style.fill.as_deref() == Some("none") {
        el.remove_attr("fill");
    }
    el.set_attr("d", &d);
    el.set_attr("fill", &style.stroke);
    Some(el)
}

/// Convert stroked paths in `content` to filled paths using `outliner`.
///
/// Returns `content` unchanged when no path is converted. Malformed
/// documents fail with `Error::Parse`; paths which can't be converted are
/// left as they are.
pub fn rewrite_asset_with<O: Outliner + ?Sized>(content: &str, outliner: &O) -> Result<String> {
    let events = EventList::parse(content)?;
    if !events.elements_named("path").any(|el| el.has_attr("stroke")) {
        return Ok(content.to_owned());
    }

    let mut converted = 0;
    let rewritten: EventList = events
        .into_iter()
        .map(|ev| {
            if !ev.element().is_some_and(is_stroke_path) {
                return ev;
            }
            ev.map_element(|el| match stroke_to_fill(&el, outliner) {
                Some(filled) => {
                    converted += 1;
                    filled
                }
                None => el,
            })
        })
        .collect();

    if converted == 0 {
        return Ok(content.to_owned());
    }
    rewritten.to_xml()
}

/// Convert stroked paths in `content` to filled paths.
pub fn rewrite_asset(content: &str) -> Result<String> {
    rewrite_asset_with(content, &StrokeOutliner::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use assertables::{assert_contains, assert_not_contains};

    /// Records its inputs in the output so conversions can be checked exactly.
    struct EchoOutliner;

    impl Outliner for EchoOutliner {
        fn outline(&self, d: &str, width: f64, join: LineJoin, cap: LineCap) -> Result<String> {
            Ok(format!("outline({d};{width};{join};{cap})"))
        }
    }

    struct FailingOutliner;

    impl Outliner for FailingOutliner {
        fn outline(&self, d: &str, _: f64, _: LineJoin, _: LineCap) -> Result<String> {
            Err(Error::Geometry(format!("cannot outline {d}")))
        }
    }

    fn rewrite(input: &str) -> String {
        rewrite_asset_with(input, &EchoOutliner).expect("rewrite failed")
    }

    #[test]
    fn test_no_stroke_identity() {
        let input = r##"<svg  ><path d='M0 0L10 10'   fill="#fff" /></svg>"##;
        assert_eq!(rewrite(input), input);
    }

    #[test]
    fn test_basic_conversion() {
        let input = r##"<svg><path d="M0 0L10 10" stroke="#000" stroke-width="2"/></svg>"##;
        let expected = r##"<svg><path d="outline(M0 0L10 10;2;miter;butt)" fill="#000"/></svg>"##;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_cap_and_join() {
        let input = r#"<svg><path d="M0 0L10 10" stroke="red" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="bevel"/></svg>"#;
        let expected = r#"<svg><path d="outline(M0 0L10 10;1.5;bevel;round)" fill="red"/></svg>"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_invalid_cap_and_join_default() {
        let input = r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="1" stroke-linecap="inherit" stroke-linejoin="arcs"/></svg>"#;
        let expected = r#"<svg><path d="outline(M0 0L1 1;1;miter;butt)" fill="red"/></svg>"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_fill_none_removed() {
        let input = r#"<svg><path fill="none" d="M0 0L1 1" stroke="red" stroke-width="1"/></svg>"#;
        let expected = r#"<svg><path d="outline(M0 0L1 1;1;miter;butt)" fill="red"/></svg>"#;
        let output = rewrite(input);
        assert_eq!(output, expected);
        assert_not_contains!(output, r#"fill="none""#);
    }

    #[test]
    fn test_existing_fill_replaced() {
        let input = r##"<svg><path fill="#fff" d="M0 0L1 1" stroke="red" stroke-width="1"/></svg>"##;
        let expected = r#"<svg><path fill="red" d="outline(M0 0L1 1;1;miter;butt)"/></svg>"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_skip_missing_data() {
        // nothing convertible, so the document is untouched
        for input in [
            r#"<svg><path stroke="red" stroke-width="1"/></svg>"#,
            r#"<svg><path d="M0 0L1 1" stroke="red"/></svg>"#,
            r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="0"/></svg>"#,
            r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="wide"/></svg>"#,
            r#"<svg><path d="M0 0L1 1" stroke="none" stroke-width="1"/></svg>"#,
            r#"<svg><path d="" stroke="red" stroke-width="1"/></svg>"#,
        ] {
            assert_eq!(rewrite(input), input);
        }
    }

    #[test]
    fn test_skip_keeps_stroke_beside_conversion() {
        let input = r#"<svg><path stroke="red"/><path d="M0 0L1 1" stroke="blue" stroke-width="1"/></svg>"#;
        let expected = r#"<svg><path stroke="red"/><path d="outline(M0 0L1 1;1;miter;butt)" fill="blue"/></svg>"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_width_with_unit() {
        let input = r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="2px"/></svg>"#;
        assert_contains!(rewrite(input), "outline(M0 0L1 1;2;miter;butt)");
        let input = r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="-3"/></svg>"#;
        assert_contains!(rewrite(input), "outline(M0 0L1 1;3;miter;butt)");
    }

    #[test]
    fn test_non_path_elements_untouched() {
        let input = r#"<svg><line x2="5" stroke="red" stroke-width="1"/><path d="M0 0L1 1" stroke="red" stroke-width="1"/></svg>"#;
        let expected = r#"<svg><line x2="5" stroke="red" stroke-width="1"/><path d="outline(M0 0L1 1;1;miter;butt)" fill="red"/></svg>"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_start_end_path() {
        let input = r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="1"><title>x</title></path></svg>"#;
        let expected = r#"<svg><path d="outline(M0 0L1 1;1;miter;butt)" fill="red"><title>x</title></path></svg>"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_document_structure_preserved() {
        let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <!-- arrow -->
  <path d="M0 0L1 1" stroke="red" stroke-width="1"/>
  <circle cx="12" cy="12" r="3"/>
</svg>
"#;
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <!-- arrow -->
  <path d="outline(M0 0L1 1;1;miter;butt)" fill="red"/>
  <circle cx="12" cy="12" r="3"/>
</svg>
"#;
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn test_malformed_document() {
        for input in [r#"<svg><path></svg>"#, r#"<svg><path d="M0 0"/>"#, "not svg"] {
            let err = rewrite_asset_with(input, &EchoOutliner).unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "{err:?}");
        }
    }

    #[test]
    fn test_outline_failure_skips_element() {
        let input = r#"<svg><path d="M0 0L1 1" stroke="red" stroke-width="1"/></svg>"#;
        let output = rewrite_asset_with(input, &FailingOutliner).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_path_style_from_element() {
        let el = RawElement(
            "path".into(),
            vec![
                ("d".into(), "M0 0L1 1".into()),
                ("stroke".into(), "red".into()),
                ("stroke-width".into(), "4".into()),
                ("stroke-linecap".into(), "square".into()),
                ("fill".into(), "none".into()),
            ],
        );
        assert_eq!(
            PathStyle::from_element(&el),
            Some(PathStyle {
                d: "M0 0L1 1".into(),
                stroke: "red".into(),
                stroke_width: 4.,
                cap: LineCap::Square,
                join: LineJoin::Miter,
                fill: Some("none".into()),
            })
        );
    }

    #[test]
    fn test_strp_leading() {
        assert_eq!(strp_leading("2"), Some(2.));
        assert_eq!(strp_leading(" 1.5px"), Some(1.5));
        assert_eq!(strp_leading(".5"), Some(0.5));
        assert_eq!(strp_leading("-2"), Some(-2.));
        assert_eq!(strp_leading("1e2"), Some(100.));
        assert_eq!(strp_leading("3em"), Some(3.));
        assert_eq!(strp_leading("px"), None);
        assert_eq!(strp_leading("-"), None);
        assert_eq!(strp_leading(""), None);
    }

    #[test]
    fn test_stroke_outliner_conversion() {
        let input = r##"<svg><path d="M0 0L10 10" stroke="#000" stroke-width="2"/></svg>"##;
        let output = rewrite_asset(input).unwrap();
        assert_contains!(output, r##"fill="#000""##);
        assert_not_contains!(output, "stroke");
        assert_not_contains!(output, r#"d="M0 0L10 10""#);
    }

    #[test]
    fn test_non_finite_geometry_keeps_stroke() {
        let input = r#"<svg><path d="M0 0L1e400 0" stroke="red" stroke-width="2"/></svg>"#;
        let output = rewrite_asset(input).unwrap();
        assert_eq!(output, input);
        assert_not_contains!(output, "NaN");
    }

    #[test]
    fn test_round_dot_converted() {
        let input = r#"<svg><path d="M5 5L5 5" stroke="red" stroke-width="2" stroke-linecap="round"/></svg>"#;
        let output = rewrite_asset(input).unwrap();
        assert_contains!(output, r#"fill="red""#);
        assert_not_contains!(output, "stroke");

        // butt caps paint nothing for a zero-length path
        let input = r#"<svg><path d="M5 5L5 5" stroke="red" stroke-width="2"/></svg>"#;
        assert_eq!(rewrite_asset(input).unwrap(), input);
    }
}
