// stroke outline geometry
//
// An `Outliner` turns the centerline of a stroked path into the boundary of
// the area the stroke paints, returned as a fillable path description.

use std::fmt;
use std::str::FromStr;

use kurbo::{BezPath, Cap, Circle, Join, PathEl, Point, Rect, Shape, Stroke, StrokeOpts};

use crate::errors::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl FromStr for LineCap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "butt" => Ok(Self::Butt),
            "round" => Ok(Self::Round),
            "square" => Ok(Self::Square),
            _ => Err(Error::Parse(format!(
                "Unknown stroke-linecap '{s}' (expected butt, round or square)"
            ))),
        }
    }
}

impl fmt::Display for LineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Butt => write!(f, "butt"),
            Self::Round => write!(f, "round"),
            Self::Square => write!(f, "square"),
        }
    }
}

impl From<LineCap> for Cap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => Cap::Butt,
            LineCap::Round => Cap::Round,
            LineCap::Square => Cap::Square,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl FromStr for LineJoin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "miter" => Ok(Self::Miter),
            "round" => Ok(Self::Round),
            "bevel" => Ok(Self::Bevel),
            _ => Err(Error::Parse(format!(
                "Unknown stroke-linejoin '{s}' (expected miter, round or bevel)"
            ))),
        }
    }
}

impl fmt::Display for LineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miter => write!(f, "miter"),
            Self::Round => write!(f, "round"),
            Self::Bevel => write!(f, "bevel"),
        }
    }
}

impl From<LineJoin> for Join {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => Join::Miter,
            LineJoin::Round => Join::Round,
            LineJoin::Bevel => Join::Bevel,
        }
    }
}

/// Computes the filled outline of a stroked path.
///
/// Implementations must be pure: the same inputs always give the same
/// path data, and no state is shared between calls.
pub trait Outliner {
    fn outline(&self, d: &str, width: f64, join: LineJoin, cap: LineCap) -> Result<String>;
}

impl<T: Outliner + ?Sized> Outliner for &T {
    fn outline(&self, d: &str, width: f64, join: LineJoin, cap: LineCap) -> Result<String> {
        (**self).outline(d, width, join, cap)
    }
}

/// `Outliner` backed by kurbo's stroke expansion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeOutliner {
    /// Maximum distance between the computed outline and the true offset curve
    pub tolerance: f64,
}

impl Default for StrokeOutliner {
    fn default() -> Self {
        Self { tolerance: 0.01 }
    }
}

impl Outliner for StrokeOutliner {
    fn outline(&self, d: &str, width: f64, join: LineJoin, cap: LineCap) -> Result<String> {
        let path = BezPath::from_svg(d)
            .map_err(|e| Error::Geometry(format!("invalid path data '{d}': {e}")))?;
        let style = Stroke::new(width).with_join(join.into()).with_caps(cap.into());
        let mut outline =
            kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), self.tolerance);
        outline.extend(
            dot_caps(&path, width, cap, self.tolerance)
                .elements()
                .iter()
                .copied(),
        );
        if outline.elements().is_empty() {
            return Err(Error::Geometry(format!("empty outline for '{d}'")));
        }
        if !outline.is_finite() {
            return Err(Error::Geometry(format!("non-finite outline for '{d}'")));
        }
        Ok(outline.to_svg())
    }
}

/// Cap shapes for zero-length subpaths, which stroke expansion drops.
///
/// A subpath with at least one segment but no extent still paints its caps:
/// a circle for round caps, an axis-aligned square for square caps.
fn dot_caps(path: &BezPath, width: f64, cap: LineCap, tolerance: f64) -> BezPath {
    let mut dots = BezPath::new();
    let mut add_dot = |p: Point| match cap {
        LineCap::Butt => {}
        LineCap::Round => dots.extend(Circle::new(p, width / 2.).path_elements(tolerance)),
        LineCap::Square => {
            dots.extend(Rect::from_center_size(p, (width, width)).path_elements(tolerance))
        }
    };

    // (subpath start, has a segment, all points at start)
    let mut current: Option<(Point, bool, bool)> = None;
    for el in path.elements() {
        let points = match *el {
            PathEl::MoveTo(p) => {
                if let Some((start, true, true)) = current {
                    add_dot(start);
                }
                current = Some((p, false, true));
                continue;
            }
            PathEl::LineTo(p) => [p, p, p],
            PathEl::QuadTo(p1, p2) => [p1, p2, p2],
            PathEl::CurveTo(p1, p2, p3) => [p1, p2, p3],
            PathEl::ClosePath => continue,
        };
        if let Some((start, has_segment, degenerate)) = current.as_mut() {
            *has_segment = true;
            *degenerate &= points.iter().all(|p| *p == *start);
        }
    }
    if let Some((start, true, true)) = current {
        add_dot(start);
    }
    dots
}
