//! Line, fill and marker attributes and their resolution into render styles.
//!
//! Plot objects carry raw attribute records. A [`StyleResolver`] turns those
//! into [`Stroke`], fill colors and [`MarkerStyle`]s; the resolver owns the
//! color table, painters never do.

use crate::color::{indexed_color, ColorRef, Rgba};
use crate::render::MarkerGenerator;

/// Line attributes as stored on a plot object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAttributes {
    /// Line color.
    pub color: ColorRef,
    /// Line width in pixels.
    pub width: f64,
    /// Line style (1 solid, 2 dashed, 3 dotted, 4 dash-dot, 0 invisible).
    pub style: u32,
    /// Side of the exclusion zone (+1 or -1), 0 when there is none.
    pub excl_side: i8,
    /// Width of the exclusion zone in pixels.
    pub excl_width: f64,
}

impl Default for LineAttributes {
    fn default() -> Self {
        Self { color: ColorRef::Index(1), width: 1.0, style: 1, excl_side: 0, excl_width: 0.0 }
    }
}

impl LineAttributes {
    /// Plain line attributes.
    #[must_use]
    pub fn new(color: ColorRef, width: f64) -> Self {
        Self { color, width, ..Self::default() }
    }

    /// Decode a stored width that may encode an exclusion zone.
    ///
    /// Widths beyond 99 pack the zone: the sign gives the side, the hundreds
    /// give the zone width in steps of 5 px and the remainder is the line width.
    #[must_use]
    pub fn from_encoded(color: ColorRef, encoded_width: i32, style: u32) -> Self {
        let abs = encoded_width.unsigned_abs();
        let (excl_side, excl_width, width) = if abs > 99 {
            (if encoded_width < 0 { -1 } else { 1 }, f64::from(abs / 100) * 5.0, abs % 100)
        } else {
            (0, 0.0, abs)
        };
        Self { color, width: f64::from(width), style, excl_side, excl_width }
    }

    /// Whether an exclusion zone is requested.
    #[must_use]
    pub fn has_exclusion(&self) -> bool {
        self.excl_side != 0 && self.excl_width > 0.0
    }
}

/// Fill attributes as stored on a plot object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillAttributes {
    /// Fill color.
    pub color: ColorRef,
    /// Fill style (0 hollow, 1001 solid, others patterns drawn solid).
    pub style: u32,
}

impl Default for FillAttributes {
    fn default() -> Self {
        Self { color: ColorRef::Index(0), style: 0 }
    }
}

impl FillAttributes {
    /// Solid fill.
    #[must_use]
    pub fn solid(color: ColorRef) -> Self {
        Self { color, style: 1001 }
    }

    /// Whether nothing would be filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.style == 0
    }
}

/// Marker attributes as stored on a plot object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerAttributes {
    /// Marker color.
    pub color: ColorRef,
    /// Marker style id.
    pub style: u32,
    /// Marker size (1 = 8 px).
    pub size: f64,
}

impl Default for MarkerAttributes {
    fn default() -> Self {
        Self { color: ColorRef::Index(1), style: 1, size: 1.0 }
    }
}

impl MarkerAttributes {
    /// Full marker extent in pixels.
    #[must_use]
    pub fn full_size(&self) -> f64 {
        MarkerGenerator::new(self.style, self.size).full_size()
    }
}

/// Line, fill and marker attributes of one object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    /// Line attributes.
    pub line: LineAttributes,
    /// Fill attributes.
    pub fill: FillAttributes,
    /// Marker attributes.
    pub marker: MarkerAttributes,
}

/// Render-ready stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub width: f64,
    /// SVG dash array, `None` for solid.
    pub dash: Option<&'static str>,
}

/// Render-ready style of one path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathStyle {
    /// Outline, if any.
    pub stroke: Option<Stroke>,
    /// Interior color, if any.
    pub fill: Option<Rgba>,
}

impl PathStyle {
    /// Outline only.
    #[must_use]
    pub fn stroked(stroke: Option<Stroke>) -> Self {
        Self { stroke, fill: None }
    }

    /// Interior only.
    #[must_use]
    pub fn filled(fill: Option<Rgba>) -> Self {
        Self { stroke: None, fill }
    }

    /// Whether the path would be invisible.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.stroke.is_none() && self.fill.is_none()
    }
}

/// Resolved marker drawing style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Shape generator.
    pub generator: MarkerGenerator,
    /// Path style for the marker series.
    pub style: PathStyle,
}

fn dash_array(style: u32) -> Option<&'static str> {
    match style {
        2 => Some("3,3"),
        3 => Some("1,2"),
        4 => Some("3,4,1,4"),
        _ => None,
    }
}

/// Turns stored attributes into render-ready styles.
pub trait StyleResolver {
    /// Resolve a stored color.
    fn color(&self, color: ColorRef) -> Option<Rgba>;

    /// Stroke for line attributes, `None` when the line is invisible.
    fn stroke(&self, line: &LineAttributes) -> Option<Stroke> {
        if line.width <= 0.0 || line.style == 0 {
            return None;
        }
        Some(Stroke { color: self.color(line.color)?, width: line.width, dash: dash_array(line.style) })
    }

    /// Fill color for fill attributes, `None` when hollow.
    fn fill(&self, fill: &FillAttributes) -> Option<Rgba> {
        if fill.is_empty() {
            return None;
        }
        self.color(fill.color)
    }

    /// Marker style for marker attributes.
    fn marker(&self, marker: &MarkerAttributes) -> MarkerStyle {
        let generator = MarkerGenerator::new(marker.style, marker.size);
        let color = self.color(marker.color);
        let style = if generator.is_filled() {
            PathStyle { stroke: None, fill: color }
        } else {
            PathStyle { stroke: color.map(|c| Stroke { color: c, width: 1.0, dash: None }), fill: None }
        };
        MarkerStyle { generator, style }
    }
}

/// Resolver backed by the base indexed color table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyleResolver;

impl StyleResolver for DefaultStyleResolver {
    fn color(&self, color: ColorRef) -> Option<Rgba> {
        match color {
            ColorRef::Rgba(c) => Some(c),
            ColorRef::Index(i) => {
                let resolved = indexed_color(i);
                if resolved.is_none() {
                    log::debug!("color index {i} not in table, using black");
                }
                Some(resolved.unwrap_or(Rgba::BLACK))
            }
        }
    }
}
