//! Vector path synthesis.
//!
//! Paths use absolute commands separated by single spaces:
//! `M x,y`, `L x,y`, `C c1x,c1y c2x,c2y x,y`, `A rx,ry,rot,large,sweep,x,y`
//! and `Z`. Coordinates are rounded to a fixed number of decimals with
//! trailing zeros removed.
//!
//! # Smoothing
//!
//! The Bezier kind passes a cubic segment through every point. The tangent at
//! an interior point is half the chord between its neighbours; endpoints use
//! the one-sided difference. Control points sit one third of the tangent away
//! from each anchor.

use crate::geometry::Point;
use std::fmt::Write as FmtWrite;

/// Format a coordinate rounded to `digits` decimals.
#[must_use]
pub fn fmt_num(value: f64, digits: usize) -> String {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let mut text = format!("{rounded:.digits$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    text
}

/// Incremental writer for path strings.
#[derive(Debug, Clone, Default)]
pub struct PathWriter {
    buf: String,
    digits: usize,
}

impl PathWriter {
    /// Writer rounding coordinates to `digits` decimals.
    #[must_use]
    pub fn new(digits: usize) -> Self {
        Self { buf: String::new(), digits }
    }

    fn sep(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
    }

    fn pair(&mut self, x: f64, y: f64) {
        let (x, y) = (fmt_num(x, self.digits), fmt_num(y, self.digits));
        let _ = write!(self.buf, "{x},{y}");
    }

    /// `M x,y`
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.sep();
        self.buf.push_str("M ");
        self.pair(x, y);
        self
    }

    /// `L x,y`
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.sep();
        self.buf.push_str("L ");
        self.pair(x, y);
        self
    }

    /// `C c1x,c1y c2x,c2y x,y`
    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.sep();
        self.buf.push_str("C ");
        self.pair(c1.x, c1.y);
        self.buf.push(' ');
        self.pair(c2.x, c2.y);
        self.buf.push(' ');
        self.pair(end.x, end.y);
        self
    }

    /// `A rx,ry,rotation,large_arc,sweep,x,y`
    pub fn arc_to(
        &mut self,
        radii: (f64, f64),
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    ) -> &mut Self {
        self.sep();
        let d = self.digits;
        let _ = write!(
            self.buf,
            "A {},{},{},{},{},",
            fmt_num(radii.0, d),
            fmt_num(radii.1, d),
            fmt_num(rotation, d),
            u8::from(large_arc),
            u8::from(sweep)
        );
        self.pair(end.x, end.y);
        self
    }

    /// `Z`
    pub fn close(&mut self) -> &mut Self {
        self.sep();
        self.buf.push('Z');
        self
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish and return the path string.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Join path fragments with single spaces, skipping empty ones.
#[must_use]
pub fn join_paths(parts: &[&str]) -> String {
    parts.iter().filter(|p| !p.is_empty()).copied().collect::<Vec<_>>().join(" ")
}

/// Path construction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Straight segments through rounded points; duplicates skipped.
    Line,
    /// Straight segments that also report tangent deltas per point.
    LineCalc,
    /// Smoothed cubic curve through every point.
    Bezier,
}

impl PathKind {
    fn default_digits(self) -> usize {
        match self {
            Self::Line | Self::LineCalc => 0,
            Self::Bezier => 2,
        }
    }
}

/// Result of [`PathBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltPath {
    /// Path through the points.
    pub path: String,
    /// Segment sealing the path back to the baseline, empty without one.
    pub close: String,
    /// Tangent deltas (`dgrx`, `dgry`) per used point for calc and Bezier kinds.
    pub tangents: Vec<Point>,
}

/// Builds path strings from pixel-space point sequences.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    kind: PathKind,
    continued: bool,
    baseline: Option<f64>,
    start: usize,
    digits: usize,
}

impl PathBuilder {
    /// Create a builder for the given kind.
    #[must_use]
    pub fn new(kind: PathKind) -> Self {
        Self { kind, continued: false, baseline: None, start: 0, digits: kind.default_digits() }
    }

    /// Start with `L` instead of `M` so the path extends a previous one.
    #[must_use]
    pub fn continued(mut self, continued: bool) -> Self {
        self.continued = continued;
        self
    }

    /// Baseline pixel height used to produce the closing segment.
    #[must_use]
    pub fn baseline(mut self, baseline: f64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Skip the first `start` points.
    #[must_use]
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Decimal digits kept for coordinates.
    #[must_use]
    pub fn digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    /// Build the path.
    #[must_use]
    pub fn build(&self, points: &[Point]) -> BuiltPath {
        let pts = points.get(self.start..).unwrap_or(&[]);
        let Some(first) = pts.first() else {
            return BuiltPath::default();
        };

        let tangents = match self.kind {
            PathKind::Line => Vec::new(),
            PathKind::LineCalc | PathKind::Bezier => tangent_deltas(pts),
        };

        let mut w = PathWriter::new(self.digits);
        if self.continued {
            w.line_to(first.x, first.y);
        } else {
            w.move_to(first.x, first.y);
        }

        match self.kind {
            PathKind::Line | PathKind::LineCalc => {
                let mut last = (fmt_num(first.x, self.digits), fmt_num(first.y, self.digits));
                for p in &pts[1..] {
                    let cur = (fmt_num(p.x, self.digits), fmt_num(p.y, self.digits));
                    if cur != last {
                        w.line_to(p.x, p.y);
                        last = cur;
                    }
                }
            }
            PathKind::Bezier => {
                for i in 1..pts.len() {
                    let (prev, cur) = (pts[i - 1], pts[i]);
                    let (dp, dc) = (tangents[i - 1], tangents[i]);
                    w.curve_to(prev.offset(dp.x, dp.y), cur.offset(-dc.x, -dc.y), cur);
                }
            }
        }

        let close = match self.baseline {
            Some(base) => {
                let last = pts[pts.len() - 1];
                let mut c = PathWriter::new(self.digits);
                c.line_to(last.x, base).line_to(first.x, base).close();
                c.finish()
            }
            None => String::new(),
        };

        BuiltPath { path: w.finish(), close, tangents }
    }
}

/// Tangent deltas (one third of the neighbour-chord tangent) for each point.
///
/// Interior points use half the chord between their neighbours; the first
/// and last point use the full one-sided difference to their only neighbour.
fn tangent_deltas(pts: &[Point]) -> Vec<Point> {
    let n = pts.len();
    if n < 2 {
        return vec![Point::ORIGIN; n];
    }
    (0..n)
        .map(|i| {
            let (dx, dy) = if i == 0 {
                (pts[1].x - pts[0].x, pts[1].y - pts[0].y)
            } else if i == n - 1 {
                (pts[i].x - pts[i - 1].x, pts[i].y - pts[i - 1].y)
            } else {
                ((pts[i + 1].x - pts[i - 1].x) / 2.0, (pts[i + 1].y - pts[i - 1].y) / 2.0)
            };
            Point::new(dx / 3.0, dy / 3.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0, 2), "1");
        assert_eq!(fmt_num(1.256, 2), "1.26");
        assert_eq!(fmt_num(1.5, 0), "2");
        assert_eq!(fmt_num(-0.001, 2), "0");
        assert_eq!(fmt_num(10.10, 2), "10.1");
        assert_eq!(fmt_num(-3.25, 1), "-3.3");
    }

    #[test]
    fn test_line_path() {
        let built = PathBuilder::new(PathKind::Line).build(&pts(&[(0.0, 100.0), (50.0, 0.0), (100.0, 50.0)]));
        assert_eq!(built.path, "M 0,100 L 50,0 L 100,50");
        assert!(built.close.is_empty());
        assert!(built.tangents.is_empty());
    }

    #[test]
    fn test_line_skips_duplicate_rounded_points() {
        let built = PathBuilder::new(PathKind::Line).build(&pts(&[(0.0, 0.0), (0.2, 0.1), (5.0, 5.0)]));
        assert_eq!(built.path, "M 0,0 L 5,5");
    }

    #[test]
    fn test_continued_path_starts_with_line() {
        let built = PathBuilder::new(PathKind::Line)
            .continued(true)
            .build(&pts(&[(1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(built.path, "L 1,1 L 2,2");
    }

    #[test]
    fn test_close_to_baseline() {
        let built = PathBuilder::new(PathKind::Line)
            .baseline(100.0)
            .build(&pts(&[(10.0, 20.0), (30.0, 40.0)]));
        assert_eq!(built.close, "L 30,100 L 10,100 Z");
    }

    #[test]
    fn test_start_offset() {
        let built = PathBuilder::new(PathKind::Line)
            .start(1)
            .build(&pts(&[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]));
        assert_eq!(built.path, "M 10,10 L 20,0");
    }

    #[test]
    fn test_empty_and_single_point() {
        assert_eq!(PathBuilder::new(PathKind::Bezier).build(&[]), BuiltPath::default());
        let single = PathBuilder::new(PathKind::Bezier).build(&pts(&[(1.5, 2.5)]));
        assert_eq!(single.path, "M 1.5,2.5");
        assert_eq!(single.tangents, vec![Point::ORIGIN]);
    }

    #[test]
    fn test_bezier_tangents() {
        let built = PathBuilder::new(PathKind::Bezier).build(&pts(&[(0.0, 0.0), (3.0, 3.0), (6.0, 0.0)]));
        assert_eq!(built.tangents[0], Point::new(1.0, 1.0));
        assert_eq!(built.tangents[1], Point::new(1.0, 0.0));
        assert_eq!(built.tangents[2], Point::new(1.0, -1.0));
        assert_eq!(built.path, "M 0,0 C 1,1 2,3 3,3 C 4,3 5,1 6,0");
    }

    #[test]
    fn test_endpoint_tangents_are_one_sided() {
        let built = PathBuilder::new(PathKind::Bezier).build(&pts(&[(0.0, 0.0), (6.0, 0.0), (9.0, 6.0)]));
        assert_eq!(built.tangents[0], Point::new(2.0, 0.0));
        assert_eq!(built.tangents[1], Point::new(1.5, 1.0));
        assert_eq!(built.tangents[2], Point::new(1.0, 2.0));
        assert_eq!(built.path, "M 0,0 C 2,0 4.5,-1 6,0 C 7.5,1 8,4 9,6");
    }

    #[test]
    fn test_linecalc_reports_tangents() {
        let built = PathBuilder::new(PathKind::LineCalc).build(&pts(&[(0.0, 0.0), (3.0, 0.0)]));
        assert_eq!(built.path, "M 0,0 L 3,0");
        assert_eq!(built.tangents, vec![Point::new(1.0, 0.0), Point::new(1.0, 0.0)]);
    }

    #[test]
    fn test_path_writer_arc() {
        let mut w = PathWriter::new(1);
        w.move_to(0.0, 0.0).arc_to((5.0, 2.5), 0.0, false, true, Point::new(10.0, 0.0)).close();
        assert_eq!(w.finish(), "M 0,0 A 5,2.5,0,0,1,10,0 Z");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths(&["M 0,0", "", "L 1,1"]), "M 0,0 L 1,1");
    }
}
