//! Marker shape geometry.
//!
//! Markers are emitted as small path fragments so that a whole series of
//! markers becomes a single path. Shapes are keyed by the numeric marker style
//! stored on plot objects.

use super::path::PathWriter;
use crate::geometry::Point;

/// Geometric shape of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Small filled square of fixed pixel size.
    Dot,
    /// `+`
    Plus,
    /// `x`
    Mult,
    /// Plus and mult overlaid.
    Asterisk,
    /// Circle.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Triangle pointing up.
    TriangleUp,
    /// Triangle pointing down.
    TriangleDown,
    /// Diamond.
    Diamond,
    /// Twelve-vertex cross outline.
    Cross,
    /// Five-pointed star.
    Star,
}

impl MarkerShape {
    /// Whether the shape is made of strokes only.
    #[must_use]
    pub fn is_stroke_only(self) -> bool {
        matches!(self, Self::Plus | Self::Mult | Self::Asterisk)
    }
}

/// Map a marker style id to its shape and whether it is drawn filled.
#[must_use]
pub fn marker_shape(style: u32) -> (MarkerShape, bool) {
    match style {
        1 | 6 | 7 => (MarkerShape::Dot, true),
        2 => (MarkerShape::Plus, false),
        3 | 31 => (MarkerShape::Asterisk, false),
        4 | 24 => (MarkerShape::Circle, false),
        5 => (MarkerShape::Mult, false),
        8 | 20 => (MarkerShape::Circle, true),
        21 => (MarkerShape::Square, true),
        22 => (MarkerShape::TriangleUp, true),
        23 => (MarkerShape::TriangleDown, true),
        25 => (MarkerShape::Square, false),
        26 => (MarkerShape::TriangleUp, false),
        27 => (MarkerShape::Diamond, false),
        28 => (MarkerShape::Cross, false),
        29 => (MarkerShape::Star, true),
        30 => (MarkerShape::Star, false),
        32 => (MarkerShape::TriangleDown, false),
        33 => (MarkerShape::Diamond, true),
        34 => (MarkerShape::Cross, true),
        _ => (MarkerShape::Circle, true),
    }
}

/// Emits marker fragments for one marker style and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerGenerator {
    shape: MarkerShape,
    filled: bool,
    full_size: f64,
}

impl MarkerGenerator {
    /// Generator for a marker style and object marker size (1 = 8 px).
    #[must_use]
    pub fn new(style: u32, size: f64) -> Self {
        let (shape, filled) = marker_shape(style);
        let full_size = match style {
            1 => 1.0,
            6 => 2.0,
            7 => 3.0,
            _ => size * 8.0,
        };
        Self { shape, filled, full_size }
    }

    /// Shape drawn.
    #[must_use]
    pub fn shape(&self) -> MarkerShape {
        self.shape
    }

    /// Whether the marker interior is filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Full marker extent in pixels.
    #[must_use]
    pub fn full_size(&self) -> f64 {
        self.full_size
    }

    /// Append one marker centred at `(x, y)`.
    pub fn append(&self, w: &mut PathWriter, x: f64, y: f64) {
        let s = self.full_size / 2.0;
        match self.shape {
            MarkerShape::Dot => {
                let sz = self.full_size;
                let (x0, y0) = (x - (sz / 2.0).floor(), y - (sz / 2.0).floor());
                w.move_to(x0, y0)
                    .line_to(x0 + sz, y0)
                    .line_to(x0 + sz, y0 + sz)
                    .line_to(x0, y0 + sz)
                    .close();
            }
            MarkerShape::Plus => plus(w, x, y, s),
            MarkerShape::Mult => mult(w, x, y, s),
            MarkerShape::Asterisk => {
                plus(w, x, y, s);
                mult(w, x, y, s * std::f64::consts::FRAC_1_SQRT_2);
            }
            MarkerShape::Circle => {
                w.move_to(x - s, y)
                    .arc_to((s, s), 0.0, true, false, Point::new(x + s, y))
                    .arc_to((s, s), 0.0, true, false, Point::new(x - s, y))
                    .close();
            }
            MarkerShape::Square => polygon(w, x, y, &[(-s, -s), (s, -s), (s, s), (-s, s)]),
            MarkerShape::TriangleUp => polygon(w, x, y, &[(-s, s), (s, s), (0.0, -s)]),
            MarkerShape::TriangleDown => polygon(w, x, y, &[(-s, -s), (s, -s), (0.0, s)]),
            MarkerShape::Diamond => {
                let h = s / 2.0;
                polygon(w, x, y, &[(-h, 0.0), (0.0, -s), (h, 0.0), (0.0, s)]);
            }
            MarkerShape::Cross => {
                let a = s / 3.0;
                polygon(
                    w,
                    x,
                    y,
                    &[
                        (-a, -s),
                        (a, -s),
                        (a, -a),
                        (s, -a),
                        (s, a),
                        (a, a),
                        (a, s),
                        (-a, s),
                        (-a, a),
                        (-s, a),
                        (-s, -a),
                        (-a, -a),
                    ],
                );
            }
            MarkerShape::Star => {
                let inner = s * 0.382;
                let vertices: Vec<(f64, f64)> = (0..10)
                    .map(|k| {
                        let r = if k % 2 == 0 { s } else { inner };
                        let angle = -std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::PI / 5.0;
                        (r * angle.cos(), r * angle.sin())
                    })
                    .collect();
                polygon(w, x, y, &vertices);
            }
        }
    }

    /// Single path holding one marker per point.
    #[must_use]
    pub fn path<I>(&self, points: I) -> String
    where
        I: IntoIterator<Item = Point>,
    {
        let mut w = PathWriter::new(1);
        for p in points {
            self.append(&mut w, p.x, p.y);
        }
        w.finish()
    }
}

fn plus(w: &mut PathWriter, x: f64, y: f64, s: f64) {
    w.move_to(x - s, y).line_to(x + s, y).move_to(x, y - s).line_to(x, y + s);
}

fn mult(w: &mut PathWriter, x: f64, y: f64, s: f64) {
    w.move_to(x - s, y - s)
        .line_to(x + s, y + s)
        .move_to(x - s, y + s)
        .line_to(x + s, y - s);
}

fn polygon(w: &mut PathWriter, x: f64, y: f64, offsets: &[(f64, f64)]) {
    let mut iter = offsets.iter();
    if let Some(&(dx, dy)) = iter.next() {
        w.move_to(x + dx, y + dy);
        for &(dx, dy) in iter {
            w.line_to(x + dx, y + dy);
        }
        w.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_size_of_dots() {
        assert_eq!(MarkerGenerator::new(1, 3.0).full_size(), 1.0);
        assert_eq!(MarkerGenerator::new(6, 3.0).full_size(), 2.0);
        assert_eq!(MarkerGenerator::new(7, 3.0).full_size(), 3.0);
        assert_eq!(MarkerGenerator::new(20, 1.5).full_size(), 12.0);
    }

    #[test]
    fn test_style_table() {
        assert_eq!(marker_shape(24), (MarkerShape::Circle, false));
        assert_eq!(marker_shape(29), (MarkerShape::Star, true));
        assert_eq!(marker_shape(34), (MarkerShape::Cross, true));
        assert_eq!(marker_shape(999), (MarkerShape::Circle, true));
        assert!(MarkerShape::Plus.is_stroke_only());
        assert!(!MarkerShape::Square.is_stroke_only());
    }

    #[test]
    fn test_square_marker_path() {
        let gen = MarkerGenerator::new(21, 0.5);
        assert_eq!(gen.path([Point::new(10.0, 10.0)]), "M 8,8 L 12,8 L 12,12 L 8,12 Z");
    }

    #[test]
    fn test_circle_marker_path() {
        let gen = MarkerGenerator::new(20, 1.0);
        assert_eq!(
            gen.path([Point::new(10.0, 10.0)]),
            "M 6,10 A 4,4,0,1,0,14,10 A 4,4,0,1,0,6,10 Z"
        );
    }

    #[test]
    fn test_dot_marker_path() {
        let gen = MarkerGenerator::new(1, 1.0);
        assert_eq!(gen.path([Point::new(3.0, 4.0)]), "M 3,4 L 4,4 L 4,5 L 3,5 Z");
    }

    #[test]
    fn test_series_is_single_path() {
        let gen = MarkerGenerator::new(2, 1.0);
        let path = gen.path([Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert_eq!(path.matches('M').count(), 4);
    }

    #[test]
    fn test_star_has_ten_vertices() {
        let gen = MarkerGenerator::new(29, 2.0);
        let path = gen.path([Point::new(0.0, 0.0)]);
        assert_eq!(path.matches('L').count(), 9);
        assert!(path.starts_with("M 0,-8"));
    }
}
