//! Pointer hit-testing against rendered series.
//!
//! [`locate`] finds the feature nearest to the pointer in a painter's
//! [`RenderedPoint`] arena. Painters turn the resulting [`HitCandidate`]
//! into a [`Tooltip`]; a [`TooltipTracker`] decides whether the tooltip
//! changed since the previous pointer event.

use crate::data::{DataPoint, RenderedPoint};
use crate::geometry::{Point, Rect};

/// Pointer position in pad pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Pixel x.
    pub x: f64,
    /// Pixel y.
    pub y: f64,
    /// Number of painters sharing this pointer event. Above one, only the
    /// x distance is compared.
    pub nproc: usize,
}

impl Pointer {
    /// Pointer handled by a single painter.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, nproc: 1 }
    }

    /// Mark the event as shared by `nproc` painters.
    #[must_use]
    pub fn shared(mut self, nproc: usize) -> Self {
        self.nproc = nproc;
        self
    }

    /// Pointer as a point.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// How a series was drawn, which decides the search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderKind {
    /// Nothing drawn.
    #[default]
    None,
    /// One continuous line path.
    Lines,
    /// One path (curve, fill or band).
    Path,
    /// Markers only.
    Mark,
    /// Per-point shapes (bars, error boxes, whiskers).
    Nodes,
}

/// Identity of the feature a tooltip reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureRef {
    /// Point of the series by derived index.
    Point(usize),
    /// Line segment starting at the given derived index.
    Segment(usize),
    /// Evaluation position of a continuous curve.
    Sample(f64),
    /// Spline knot.
    Knot(usize),
}

/// Pointer tolerance for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Stroke width of the series line.
    pub line_width: f64,
    /// Full marker size when markers are visible.
    pub marker_size: Option<f64>,
    /// Squared pixel distance past which a line falls back to segment search.
    pub snap_distance_sq: f64,
}

impl Tolerance {
    /// Tolerance for a line of the given width, without markers.
    #[must_use]
    pub fn new(line_width: f64, snap_distance_sq: f64) -> Self {
        Self { line_width, marker_size: None, snap_distance_sq }
    }

    /// Widen the tolerance for visible markers.
    #[must_use]
    pub fn with_markers(mut self, full_size: f64) -> Self {
        self.marker_size = Some(full_size);
        self
    }

    /// Tolerance radius in pixels.
    #[must_use]
    pub fn radius(&self) -> f64 {
        let r = (self.line_width + 3.0).max(4.0);
        match self.marker_size {
            Some(size) => r.max(size / 2.0),
            None => r,
        }
    }
}

/// Result of [`locate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    /// Index into the rendered series.
    pub index: usize,
    /// Reported feature.
    pub feature: FeatureRef,
    /// Pixel position of the feature (a point, or the foot on a segment).
    pub position: Point,
    /// Pixel distance from the pointer.
    pub distance: f64,
    /// Whether the hit is close enough to drive click actions.
    pub exact: bool,
    /// Hit rectangle for node hits.
    pub rect: Option<Rect>,
    /// Tolerance radius used.
    pub radius: f64,
}

/// Find the feature of `series` nearest to `pointer`.
#[must_use]
pub fn locate(pointer: &Pointer, series: &[RenderedPoint], kind: RenderKind, tol: &Tolerance) -> Option<HitCandidate> {
    match kind {
        RenderKind::None => None,
        RenderKind::Nodes => locate_node(pointer, series, tol),
        RenderKind::Lines | RenderKind::Path | RenderKind::Mark => locate_on_path(pointer, series, kind, tol),
    }
}

fn locate_node(pointer: &Pointer, series: &[RenderedPoint], tol: &Tolerance) -> Option<HitCandidate> {
    let pos = pointer.position();
    let shared = pointer.nproc > 1;
    let mut best: Option<(usize, f64, Rect, bool)> = None;
    for (i, p) in series.iter().enumerate() {
        let rect = p.absolute_hit_box();
        let (match_x, match_y) = (rect.contains_x(pointer.x), rect.contains_y(pointer.y));
        if !match_x || !(match_y || shared) {
            continue;
        }
        let c = rect.center();
        let dx = pointer.x - c.x;
        let dist = if shared { dx * dx } else { dx * dx + (pointer.y - c.y).powi(2) };
        if best.map_or(true, |(_, d, _, _)| dist < d) {
            best = Some((i, dist, rect, match_y));
        }
    }
    let (index, _, rect, exact) = best?;
    let p = &series[index];
    Some(HitCandidate {
        index,
        feature: FeatureRef::Point(p.source),
        position: p.position(),
        distance: p.position().distance(pos),
        exact,
        rect: Some(rect),
        radius: tol.radius(),
    })
}

fn locate_on_path(
    pointer: &Pointer,
    series: &[RenderedPoint],
    kind: RenderKind,
    tol: &Tolerance,
) -> Option<HitCandidate> {
    let pos = pointer.position();
    let radius = tol.radius();

    let mut nearest: Option<(usize, f64)> = None;
    for (i, p) in series.iter().enumerate() {
        let dist = p.position().distance_sq(pos);
        if nearest.map_or(true, |(_, d)| dist < d) {
            nearest = Some((i, dist));
        }
    }
    let (index, dist_sq) = nearest?;

    let is_lines = kind == RenderKind::Lines;
    let keep = if is_lines { dist_sq <= tol.snap_distance_sq } else { dist_sq.sqrt() <= radius };
    if keep {
        let p = &series[index];
        // A band point is matched at either band edge.
        let (g1, g2) = p.band.unwrap_or((p.gry, p.gry));
        let dx = (pointer.x - p.grx).abs();
        let dy = (pointer.y - g1).abs().min((pointer.y - g2).abs());
        return Some(HitCandidate {
            index,
            feature: FeatureRef::Point(p.source),
            position: p.position(),
            distance: dx.hypot(dy),
            exact: dx <= radius && dy <= radius,
            rect: None,
            radius,
        });
    }
    if !is_lines {
        return None;
    }

    let (seg, foot, dist) = nearest_segment(pos, series)?;
    if dist >= radius * 0.5 {
        return None;
    }
    Some(HitCandidate {
        index: seg,
        feature: FeatureRef::Segment(series[seg].source),
        position: foot,
        distance: dist,
        exact: true,
        rect: None,
        radius,
    })
}

/// Nearest point on any segment between consecutive points: segment start
/// index, perpendicular foot and distance.
fn nearest_segment(pos: Point, series: &[RenderedPoint]) -> Option<(usize, Point, f64)> {
    let mut best: Option<(usize, Point, f64)> = None;
    for (i, pair) in series.windows(2).enumerate() {
        let (a, b) = (pair[0].position(), pair[1].position());
        let (vx, vy) = (b.x - a.x, b.y - a.y);
        let len_sq = vx * vx + vy * vy;
        let t = if len_sq > 0.0 { (((pos.x - a.x) * vx + (pos.y - a.y) * vy) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
        let foot = a.lerp(b, t);
        let dist = foot.distance(pos);
        if best.map_or(true, |(_, _, d)| dist < d) {
            best = Some((i, foot, dist));
        }
    }
    best
}

// ============================================================================
// Tooltips
// ============================================================================

/// Tooltip record handed to the tooltip display.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Anchor x in pad pixels.
    pub x: f64,
    /// Anchor y in pad pixels.
    pub y: f64,
    /// Whether the hit may drive click actions.
    pub exact: bool,
    /// Whether the reported feature differs from the previous tooltip.
    pub changed: bool,
    /// Text lines.
    pub lines: Vec<String>,
    /// Pixel distance from the pointer.
    pub distance: f64,
    /// Reported feature.
    pub feature: FeatureRef,
    /// Highlight rectangle, for node hits.
    pub rect: Option<Rect>,
}

impl Tooltip {
    /// Tooltip at a hit candidate.
    #[must_use]
    pub fn from_hit(hit: &HitCandidate, lines: Vec<String>) -> Self {
        Self {
            x: hit.position.x,
            y: hit.position.y,
            exact: hit.exact,
            changed: true,
            lines,
            distance: hit.distance,
            feature: hit.feature,
            rect: hit.rect,
        }
    }
}

/// Remembers the last reported feature to flag unchanged tooltips.
#[derive(Debug, Clone, Default)]
pub struct TooltipTracker {
    last: Option<FeatureRef>,
}

impl TooltipTracker {
    /// Create a tracker with nothing reported.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `changed` on the tooltip and remember its feature. A miss clears
    /// the memory.
    pub fn track(&mut self, tooltip: Option<Tooltip>) -> Option<Tooltip> {
        match tooltip {
            Some(mut tip) => {
                tip.changed = self.last != Some(tip.feature);
                self.last = Some(tip.feature);
                Some(tip)
            }
            None => {
                self.last = None;
                None
            }
        }
    }

    /// Forget the last feature.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Format a number with `precision` significant digits, `%g` style.
#[must_use]
pub fn format_value(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let precision = precision.max(1);
    let exp = value.abs().log10().floor() as i32;
    if exp < -4 || exp >= precision as i32 {
        let s = format!("{:.*e}", precision - 1, value);
        return match s.split_once('e') {
            Some((mantissa, e)) => format!("{}e{e}", trim_zeros(mantissa)),
            None => s,
        };
    }
    let decimals = (precision as i32 - 1 - exp).max(0) as usize;
    trim_zeros(&format!("{value:.decimals$}")).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Tooltip lines of a data point: name, coordinates, non-zero errors.
#[must_use]
pub fn point_lines(name: &str, p: &DataPoint, digits: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(5);
    if !name.is_empty() {
        lines.push(name.to_string());
    }
    lines.push(format!("x = {}", format_value(p.x, digits)));
    lines.push(format!("y = {}", format_value(p.y, digits)));
    if p.has_x_error() {
        lines.push(format!("error x = -{}/+{}", format_value(p.exlow, digits), format_value(p.exhigh, digits)));
    }
    if p.has_y_error() {
        lines.push(format!("error y = -{}/+{}", format_value(p.eylow, digits), format_value(p.eyhigh, digits)));
    }
    lines
}
