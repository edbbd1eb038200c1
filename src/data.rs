//! Data-space points and their per-redraw pixel counterparts.
//!
//! [`DataPoint`]s are derived from plot objects and never carry pixel
//! positions. Each redraw produces a fresh arena of [`RenderedPoint`]s that
//! refer back to their source by index; the previous arena is dropped whole.

use crate::geometry::{Point, Rect};

/// Bent-error offsets: shifts of the error whisker ends along the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bend {
    /// Y shift of the low x error end.
    pub exlow: f64,
    /// Y shift of the high x error end.
    pub exhigh: f64,
    /// X shift of the low y error end.
    pub eylow: f64,
    /// X shift of the high y error end.
    pub eyhigh: f64,
}

/// One plottable sample in data space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataPoint {
    /// Position of the point in the source object.
    pub index: usize,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Low x error extent.
    pub exlow: f64,
    /// High x error extent.
    pub exhigh: f64,
    /// Low y error extent.
    pub eylow: f64,
    /// High y error extent.
    pub eyhigh: f64,
    /// Bent-error offsets, when the source carries them.
    pub bend: Option<Bend>,
}

impl DataPoint {
    /// Point without error extents.
    #[must_use]
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self { index, x, y, ..Self::default() }
    }

    /// Set asymmetric error extents.
    #[must_use]
    pub fn with_errors(mut self, exlow: f64, exhigh: f64, eylow: f64, eyhigh: f64) -> Self {
        self.exlow = exlow;
        self.exhigh = exhigh;
        self.eylow = eylow;
        self.eyhigh = eyhigh;
        self
    }

    /// Whether any x error is non-zero.
    #[must_use]
    pub fn has_x_error(&self) -> bool {
        self.exlow != 0.0 || self.exhigh != 0.0
    }

    /// Whether any y error is non-zero.
    #[must_use]
    pub fn has_y_error(&self) -> bool {
        self.eylow != 0.0 || self.eyhigh != 0.0
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Running data-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Smallest x.
    pub xmin: f64,
    /// Largest x.
    pub xmax: f64,
    /// Smallest y.
    pub ymin: f64,
    /// Largest y.
    pub ymax: f64,
}

impl Extent {
    /// Extent holding a single position.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { xmin: x, xmax: x, ymin: y, ymax: y }
    }

    /// Grow to include a position.
    pub fn include(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    /// Grow to include another extent.
    pub fn merge(&mut self, other: &Self) {
        self.include(other.xmin, other.ymin);
        self.include(other.xmax, other.ymax);
    }

    /// Extent of the points' positions, `None` for an empty slice.
    #[must_use]
    pub fn of_points(points: &[DataPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut ext = Self::at(first.x, first.y);
        for p in &points[1..] {
            ext.include(p.x, p.y);
        }
        Some(ext)
    }

    /// Extent of the points including their error extents.
    #[must_use]
    pub fn of_errors(points: &[DataPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut ext = Self::at(first.x, first.y);
        for p in points {
            ext.include(p.x - p.exlow, p.y - p.eylow);
            ext.include(p.x + p.exhigh, p.y + p.eyhigh);
        }
        Some(ext)
    }
}

/// Pixel-space record of one drawn point, rebuilt on every redraw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderedPoint {
    /// Index of the source [`DataPoint`] in the derived series.
    pub source: usize,
    /// Pixel x.
    pub grx: f64,
    /// Pixel y.
    pub gry: f64,
    /// Tangent delta at the point, when the path kind computes one.
    pub tangent: Point,
    /// Bar width in pixels.
    pub width: f64,
    /// Hit rectangle relative to (`grx`, `gry`).
    pub hit_box: Rect,
    /// Pixel y of the error band bounds, when a band is drawn.
    pub band: Option<(f64, f64)>,
}

impl RenderedPoint {
    /// Rendered point with the default ±5 px hit box.
    #[must_use]
    pub fn new(source: usize, grx: f64, gry: f64) -> Self {
        Self { source, grx, gry, hit_box: Rect::new(-5.0, -5.0, 10.0, 10.0), ..Self::default() }
    }

    /// Pixel position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.grx, self.gry)
    }

    /// Hit rectangle in pixel coordinates.
    #[must_use]
    pub fn absolute_hit_box(&self) -> Rect {
        Rect::new(self.grx + self.hit_box.x, self.gry + self.hit_box.y, self.hit_box.width, self.hit_box.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_errors() {
        let p = DataPoint::new(0, 1.0, 2.0);
        assert!(!p.has_x_error() && !p.has_y_error());
        let p = p.with_errors(0.0, 0.5, 0.1, 0.0);
        assert!(p.has_x_error());
        assert!(p.has_y_error());
    }

    #[test]
    fn test_extent_with_errors() {
        let pts = [
            DataPoint::new(0, 0.0, 0.0).with_errors(1.0, 1.0, 2.0, 2.0),
            DataPoint::new(1, 5.0, 3.0),
        ];
        let plain = Extent::of_points(&pts).expect("non-empty");
        assert_eq!((plain.xmin, plain.xmax, plain.ymin, plain.ymax), (0.0, 5.0, 0.0, 3.0));
        let wide = Extent::of_errors(&pts).expect("non-empty");
        assert_eq!((wide.xmin, wide.xmax, wide.ymin, wide.ymax), (-1.0, 5.0, -2.0, 3.0));
        assert!(Extent::of_points(&[]).is_none());
    }

    #[test]
    fn test_rendered_hit_box() {
        let mut rp = RenderedPoint::new(3, 100.0, 50.0);
        assert_eq!(rp.absolute_hit_box(), Rect::new(95.0, 45.0, 10.0, 10.0));
        rp.hit_box = Rect::new(-2.0, -8.0, 4.0, 16.0);
        assert!(rp.absolute_hit_box().contains(Point::new(101.0, 57.0)));
        assert!(!rp.absolute_hit_box().contains(Point::new(103.0, 50.0)));
    }
}
