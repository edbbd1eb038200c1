//! Polar coordinate mapping and grid geometry.
//!
//! A [`PolarScale`] maps `(angle, radius)` to pixel offsets from the pad
//! centre. The radius runs through a linear scale onto the horizontal
//! half-size; the vertical half-size stretches it into an ellipse when the
//! pad is not square. Angles grow counter-clockwise from `axis_angle`.

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::render::TextAnchor;
use crate::scale::{nice_ticks, LinearScale, Scale};
use std::f64::consts::PI;

/// Result of [`PolarScale::translate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPosition {
    /// Horizontal offset from the centre.
    pub x: f64,
    /// Vertical offset from the centre.
    pub y: f64,
    /// Horizontal radius of the ring through the position.
    pub rx: f64,
    /// Vertical radius of the ring through the position.
    pub ry: f64,
}

/// Mapping of one polar frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarScale {
    center: Point,
    szx: f64,
    szy: f64,
    radius: LinearScale,
    angle: f64,
}

impl PolarScale {
    /// Polar frame centred in a pad, leaving `margin` (fraction of the pad) on
    /// each side, for radii in `[rmin, rmax]` and zero angle at `axis_angle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a non-positive pad size.
    pub fn new(width: f64, height: f64, margin: f64, rmin: f64, rmax: f64, axis_angle: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidDimensions { width, height });
        }
        let szx = ((0.5 - margin).max(0.1) * width).round();
        let szy = ((0.5 - margin).max(0.1) * height).round();
        let radius = match LinearScale::new((rmin, rmax), (0.0, szx)) {
            Ok(s) => s,
            Err(e) => {
                log::debug!("polar radius range unusable ({e}), padding by 1");
                LinearScale::new((rmin, rmin + 1.0), (0.0, szx))?
            }
        };
        Ok(Self {
            center: Point::new((width / 2.0).round(), (height / 2.0).round()),
            szx,
            szy,
            radius,
            angle: axis_angle,
        })
    }

    /// Pad position of the centre.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Horizontal and vertical half-sizes of the outer ring.
    #[must_use]
    pub fn half_sizes(&self) -> (f64, f64) {
        (self.szx, self.szy)
    }

    /// Radius range.
    #[must_use]
    pub fn radius_range(&self) -> (f64, f64) {
        self.radius.domain()
    }

    /// Rotation of the zero angle.
    #[must_use]
    pub fn axis_angle(&self) -> f64 {
        self.angle
    }

    /// Horizontal pixel radius of a data radius.
    #[must_use]
    pub fn r(&self, radius: f64) -> f64 {
        self.radius.scale(radius)
    }

    /// Offset from the centre of `(angle, radius)`, rounded unless `keep_float`.
    #[must_use]
    pub fn translate(&self, angle: f64, radius: f64, keep_float: bool) -> PolarPosition {
        let rx = self.r(radius);
        let ry = rx / self.szx * self.szy;
        let (mut x, mut y) = (rx * (-angle - self.angle).cos(), ry * (-angle - self.angle).sin());
        if !keep_float {
            x = x.round();
            y = y.round();
        }
        PolarPosition { x, y, rx, ry }
    }

    /// Pad position of `(angle, radius)`, rounded.
    #[must_use]
    pub fn to_pad(&self, angle: f64, radius: f64) -> Point {
        let pos = self.translate(angle, radius, false);
        self.center.offset(pos.x, pos.y)
    }
}

/// Ring radii and labels of the radial axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialTicks {
    /// Major tick radii; the outer radius is appended when no tick reaches it.
    pub values: Vec<f64>,
    /// Label per major tick; `None` for the appended outer radius.
    pub labels: Vec<Option<String>>,
    /// Decimal digits used for labels.
    pub digits: i32,
}

/// Format a radius label with `digits` decimals.
///
/// Whole numbers print without decimals; more than ten digits switches to
/// exponent notation.
#[must_use]
pub fn format_radius(radius: f64, digits: i32) -> String {
    if radius == radius.round() {
        return format!("{radius}");
    }
    if digits > 10 {
        return format!("{radius:.4e}");
    }
    format!("{radius:.prec$}", prec = digits.max(0) as usize)
}

/// Major radial ticks over `[rmin, rmax]`, with the smallest number of label
/// digits that keeps labels unique.
#[must_use]
pub fn radial_ticks(rmin: f64, rmax: f64) -> RadialTicks {
    let mut values = nice_ticks(rmin, rmax, 5);
    let range = (rmax - rmin).abs();
    let mut digits = if range <= 0.0 { -3 } else { (values.len() as f64 / range).log10().round() as i32 };

    loop {
        let labels: Vec<String> = values.iter().map(|&v| format_radius(v, digits)).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() == labels.len() || digits >= 10 {
            break;
        }
        digits += 1;
    }

    let mut labels: Vec<Option<String>> = values.iter().map(|&v| Some(format_radius(v, digits))).collect();
    if values.last().map_or(true, |&last| last < rmax) {
        values.push(rmax);
        labels.push(None);
    }
    RadialTicks { values, labels, digits }
}

/// Minor ring radii between major ticks.
///
/// `ndiv` packs divisions as `minor * 100 + major`; fewer than two minor
/// divisions means none.
#[must_use]
pub fn minor_rings(ticks: &RadialTicks, rmax: f64, ndiv: u32) -> Vec<f64> {
    let nminor = (ndiv % 10_000) / 100;
    if nminor < 2 || ticks.values.len() < 2 {
        return Vec::new();
    }
    let dr = (ticks.values[1] - ticks.values[0]) / f64::from(nminor);
    let mut rings = Vec::new();
    for (value, label) in ticks.values.iter().zip(&ticks.labels) {
        if label.is_none() {
            continue;
        }
        for k in 1..nminor {
            let r = value + dr * f64::from(k);
            if r > rmax {
                break;
            }
            rings.push(r);
        }
    }
    rings
}

/// Angular spoke with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Spoke {
    /// Screen angle of the spoke, radians (already rotated).
    pub angle: f64,
    /// Label text, empty for minor spokes.
    pub label: &'static str,
    /// Label alignment.
    pub anchor: TextAnchor,
}

const LABELS_8: [&str; 8] = ["0", "π/4", "π/2", "3π/4", "π", "5π/4", "3π/2", "7π/4"];
const LABELS_3: [&str; 3] = ["0", "2π/3", "4π/3"];

/// Major spokes: 8 or 3 sectors, anything else becomes 8.
#[must_use]
pub fn major_spokes(ndiv: u32, axis_angle: f64) -> Vec<Spoke> {
    let labels: &[&'static str] = if ndiv % 100 == 3 { &LABELS_3 } else { &LABELS_8 };
    let n = labels.len();
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let angle = -(i as f64) * 2.0 * PI / n as f64 - axis_angle;
            Spoke { angle, label, anchor: label_anchor(angle) }
        })
        .collect()
}

/// Minor spokes between the major ones.
#[must_use]
pub fn minor_spokes(ndiv: u32, axis_angle: f64) -> Vec<f64> {
    let nmajor = if ndiv % 100 == 3 { 3 } else { 8 };
    let nminor = (ndiv % 10_000) / 100;
    if nminor < 2 {
        return Vec::new();
    }
    let total = nmajor * nminor;
    (0..total)
        .filter(|n| n % nminor != 0)
        .map(|n| -f64::from(n) * 2.0 * PI / f64::from(total) - axis_angle)
        .collect()
}

/// Horizontal alignment of a spoke label so it sits outside the ring.
fn label_anchor(angle: f64) -> TextAnchor {
    let idx = ((16.0 - angle / PI * 4.0).round() as i64).rem_euclid(8);
    match idx {
        0 | 1 | 7 => TextAnchor::Start,
        2 | 6 => TextAnchor::Middle,
        _ => TextAnchor::End,
    }
}
