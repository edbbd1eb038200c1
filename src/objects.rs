//! Plain records for the objects the painters draw.
//!
//! These mirror what an upstream object-model reader supplies. They are
//! assumed well formed; constructors only check what would otherwise make
//! indexing unsound.

use crate::error::{Error, Result};
use crate::style::{Attributes, LineAttributes};
use std::fmt;
use std::sync::Arc;

/// Shared evaluator of a one-dimensional function.
pub type Evaluator = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Table of precomputed function values.
///
/// Values are equidistant samples between `xmin` and `xmax` inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSamples {
    /// Sampled values.
    pub values: Vec<f64>,
    /// Abscissa of the first value.
    pub xmin: f64,
    /// Abscissa of the last value.
    pub xmax: f64,
}

impl SavedSamples {
    /// Split the stored layout (`values..., xmin, xmax`) into a table.
    #[must_use]
    pub fn from_stored(stored: &[f64]) -> Option<Self> {
        let n = stored.len().checked_sub(2)?;
        if n < 2 {
            return None;
        }
        Some(Self { values: stored[..n].to_vec(), xmin: stored[n], xmax: stored[n + 1] })
    }

    /// Distance between neighbouring samples.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.xmax - self.xmin) / (self.values.len() as f64 - 1.0)
    }
}

/// Evaluable function with domain bounds.
#[derive(Clone)]
pub struct FunctionObject {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Function evaluator.
    pub eval: Evaluator,
    /// Lower domain bound.
    pub xmin: f64,
    /// Upper domain bound.
    pub xmax: f64,
    /// Requested sample count.
    pub npx: usize,
    /// Precomputed samples, preferred over evaluation.
    pub saved: Option<SavedSamples>,
    /// Line and fill attributes.
    pub attributes: Attributes,
}

impl FunctionObject {
    /// Function over `[xmin, xmax]` with 100 requested samples.
    pub fn new(name: impl Into<String>, xmin: f64, xmax: f64, eval: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            eval: Arc::new(eval),
            xmin,
            xmax,
            npx: 100,
            saved: None,
            attributes: Attributes::default(),
        }
    }

    /// Set the requested sample count.
    #[must_use]
    pub fn npx(mut self, npx: usize) -> Self {
        self.npx = npx;
        self
    }

    /// Attach a saved sample table.
    #[must_use]
    pub fn saved(mut self, saved: SavedSamples) -> Self {
        self.saved = Some(saved);
        self
    }

    /// Evaluate at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        (self.eval)(x)
    }
}

impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionObject")
            .field("name", &self.name)
            .field("xmin", &self.xmin)
            .field("xmax", &self.xmax)
            .field("npx", &self.npx)
            .field("saved", &self.saved.as_ref().map(|s| s.values.len()))
            .finish_non_exhaustive()
    }
}

/// Low/high error arrays of a graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorArrays {
    /// Low x errors.
    pub exlow: Vec<f64>,
    /// High x errors.
    pub exhigh: Vec<f64>,
    /// Low y errors.
    pub eylow: Vec<f64>,
    /// High y errors.
    pub eyhigh: Vec<f64>,
}

/// Error information carried by a graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GraphErrors {
    /// Plain points.
    #[default]
    None,
    /// Symmetric errors.
    Symmetric {
        /// X errors.
        ex: Vec<f64>,
        /// Y errors.
        ey: Vec<f64>,
    },
    /// Asymmetric errors.
    Asymmetric(ErrorArrays),
    /// Asymmetric errors with bent whisker ends.
    Bent {
        /// Error extents.
        errors: ErrorArrays,
        /// Whisker end shifts, in the same layout as the extents.
        bend: ErrorArrays,
    },
}

impl GraphErrors {
    /// Whether any error arrays are present.
    #[must_use]
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Symmetric errors that are all below 1e-300.
    #[must_use]
    pub fn is_negligible(&self) -> bool {
        match self {
            Self::Symmetric { ex, ey } => ex.iter().chain(ey).all(|e| e.abs() < 1e-300),
            _ => false,
        }
    }

    fn arrays(&self) -> Vec<&Vec<f64>> {
        match self {
            Self::None => Vec::new(),
            Self::Symmetric { ex, ey } => vec![ex, ey],
            Self::Asymmetric(e) => vec![&e.exlow, &e.exhigh, &e.eylow, &e.eyhigh],
            Self::Bent { errors: e, bend: b } => vec![
                &e.exlow, &e.exhigh, &e.eylow, &e.eyhigh, &b.exlow, &b.exhigh, &b.eylow, &b.eyhigh,
            ],
        }
    }
}

/// A function attached to a graph, drawn after it.
#[derive(Debug, Clone)]
pub struct AttachedFunction {
    /// The function.
    pub function: FunctionObject,
    /// Its draw options.
    pub options: String,
}

/// Point graph with optional errors.
#[derive(Debug, Clone)]
pub struct GraphObject {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    x: Vec<f64>,
    y: Vec<f64>,
    errors: GraphErrors,
    /// Fixed lower y bound of the frame.
    pub minimum: Option<f64>,
    /// Fixed upper y bound of the frame.
    pub maximum: Option<f64>,
    /// Closed cut contour.
    pub cut: bool,
    /// Whether points may be moved interactively.
    pub editable: bool,
    /// Line, fill and marker attributes.
    pub attributes: Attributes,
    /// Functions drawn on top of the graph.
    pub functions: Vec<AttachedFunction>,
}

impl GraphObject {
    /// Graph from coordinate arrays of equal length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] when the arrays differ in length.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        Ok(Self {
            name: "Graph".to_string(),
            title: String::new(),
            x,
            y,
            errors: GraphErrors::None,
            minimum: None,
            maximum: None,
            cut: false,
            editable: true,
            attributes: Attributes::default(),
            functions: Vec::new(),
        })
    }

    /// Attach error arrays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] when an error array length differs
    /// from the point count.
    pub fn with_errors(mut self, errors: GraphErrors) -> Result<Self> {
        if let Some(bad) = errors.arrays().iter().find(|a| a.len() != self.x.len()) {
            return Err(Error::DataLengthMismatch { x_len: self.x.len(), y_len: bad.len() });
        }
        self.errors = errors;
        Ok(self)
    }

    /// Set the name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set line, fill and marker attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the graph has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// X coordinates.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y coordinates.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Error arrays.
    #[must_use]
    pub fn errors(&self) -> &GraphErrors {
        &self.errors
    }

    /// Move a point. Out-of-range indices are ignored.
    pub fn set_point(&mut self, index: usize, x: f64, y: f64) {
        if index < self.x.len() {
            self.x[index] = x;
            self.y[index] = y;
        }
    }

    /// Remove a point together with its errors. Out-of-range indices are ignored.
    pub fn remove_point(&mut self, index: usize) {
        if index >= self.x.len() {
            return;
        }
        self.x.remove(index);
        self.y.remove(index);
        match &mut self.errors {
            GraphErrors::None => {}
            GraphErrors::Symmetric { ex, ey } => {
                ex.remove(index);
                ey.remove(index);
            }
            GraphErrors::Asymmetric(e) => remove_errors(e, index),
            GraphErrors::Bent { errors, bend } => {
                remove_errors(errors, index);
                remove_errors(bend, index);
            }
        }
    }
}

fn remove_errors(e: &mut ErrorArrays, index: usize) {
    for v in [&mut e.exlow, &mut e.exhigh, &mut e.eylow, &mut e.eyhigh] {
        v.remove(index);
    }
}

/// One polynomial segment of a spline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Knot {
    /// Knot abscissa.
    pub x: f64,
    /// Value at the knot.
    pub y: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Quadratic coefficient.
    pub c: f64,
    /// Cubic coefficient.
    pub d: f64,
    /// Quartic and quintic coefficients of a fifth-order spline.
    pub quintic: Option<(f64, f64)>,
}

impl Knot {
    /// Evaluate the segment polynomial at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let dx = x - self.x;
        match self.quintic {
            Some((e, f)) => self.y + dx * (self.b + dx * (self.c + dx * (self.d + dx * (e + dx * f)))),
            None => self.y + dx * (self.b + dx * (self.c + dx * self.d)),
        }
    }
}

/// Piecewise polynomial spline.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineObject {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Knots in ascending x.
    pub knots: Vec<Knot>,
    /// Lower domain bound.
    pub xmin: f64,
    /// Upper domain bound.
    pub xmax: f64,
    /// Requested sample count.
    pub npx: usize,
    /// Knot spacing when knots are equidistant.
    pub delta: Option<f64>,
    /// Line and marker attributes.
    pub attributes: Attributes,
}

impl SplineObject {
    /// Spline over its knots' x range.
    #[must_use]
    pub fn new(name: impl Into<String>, knots: Vec<Knot>) -> Self {
        let xmin = knots.first().map_or(0.0, |k| k.x);
        let xmax = knots.last().map_or(1.0, |k| k.x);
        Self {
            name: name.into(),
            title: String::new(),
            knots,
            xmin,
            xmax,
            npx: 100,
            delta: None,
            attributes: Attributes::default(),
        }
    }

    /// Mark knots as equidistant with the given spacing.
    #[must_use]
    pub fn equidistant(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }
}

/// Graph in polar coordinates: x is the angle, y the radius.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarGraphObject {
    /// Object name.
    pub name: String,
    /// Angles in radians.
    pub angle: Vec<f64>,
    /// Radii.
    pub radius: Vec<f64>,
    /// Angle errors.
    pub angle_error: Vec<f64>,
    /// Radius errors.
    pub radius_error: Vec<f64>,
    /// Line, fill and marker attributes.
    pub attributes: Attributes,
    /// Explicit grid; one is derived from the data when absent.
    pub polargram: Option<Polargram>,
}

impl PolarGraphObject {
    /// Polar graph without errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] when the arrays differ in length.
    pub fn new(angle: Vec<f64>, radius: Vec<f64>) -> Result<Self> {
        if angle.len() != radius.len() {
            return Err(Error::DataLengthMismatch { x_len: angle.len(), y_len: radius.len() });
        }
        let n = angle.len();
        Ok(Self {
            name: "Graph".to_string(),
            angle,
            radius,
            angle_error: vec![0.0; n],
            radius_error: vec![0.0; n],
            attributes: Attributes::default(),
            polargram: None,
        })
    }

    /// Attach symmetric errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] when an error array length differs.
    pub fn with_errors(mut self, angle_error: Vec<f64>, radius_error: Vec<f64>) -> Result<Self> {
        for e in [&angle_error, &radius_error] {
            if e.len() != self.angle.len() {
                return Err(Error::DataLengthMismatch { x_len: self.angle.len(), y_len: e.len() });
            }
        }
        self.angle_error = angle_error;
        self.radius_error = radius_error;
        Ok(self)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.angle.len()
    }

    /// Whether there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.angle.is_empty()
    }
}

/// Polar grid description.
#[derive(Debug, Clone, PartialEq)]
pub struct Polargram {
    /// Radius at the centre.
    pub rmin: f64,
    /// Radius at the outer ring.
    pub rmax: f64,
    /// Rotation of the zero angle, radians.
    pub axis_angle: f64,
    /// Radial divisions (`minor * 100 + major`).
    pub ndiv_rad: u32,
    /// Angular divisions (`minor * 100 + major`).
    pub ndiv_pol: u32,
    /// Grid line attributes.
    pub line: LineAttributes,
    /// Radial label size relative to the pad height.
    pub radial_text_size: f64,
    /// Angular label size relative to the pad height.
    pub polar_text_size: f64,
}

impl Polargram {
    /// Grid spanning `[rmin, rmax]` with default divisions.
    #[must_use]
    pub fn new(rmin: f64, rmax: f64) -> Self {
        Self {
            rmin,
            rmax,
            axis_angle: 0.0,
            ndiv_rad: 508,
            ndiv_pol: 508,
            line: LineAttributes::default(),
            radial_text_size: 0.035,
            polar_text_size: 0.04,
        }
    }
}

/// Container of graphs drawn on a shared frame.
#[derive(Debug, Clone, Default)]
pub struct MultiGraphObject {
    /// Object title.
    pub title: String,
    /// Child graphs with their own option strings (empty to inherit).
    pub graphs: Vec<(GraphObject, String)>,
    /// Functions drawn after all graphs.
    pub functions: Vec<AttachedFunction>,
    /// Fixed lower y bound.
    pub minimum: Option<f64>,
    /// Fixed upper y bound.
    pub maximum: Option<f64>,
}

/// One operation of a shape stream.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Switch the active attributes.
    Attr(Attributes),
    /// Named operation consuming numbers from the buffer. `count` is the
    /// point count for length-prefixed operations, the text for `text`.
    Shape {
        /// Operation name such as `rect` or `polylinendc`.
        name: String,
        /// Point count of poly operations.
        count: usize,
        /// Text of text operations.
        text: String,
    },
}

impl PaintOp {
    /// Fixed-size operation.
    #[must_use]
    pub fn op(name: &str) -> Self {
        Self::Shape { name: name.to_string(), count: 0, text: String::new() }
    }

    /// Length-prefixed operation.
    #[must_use]
    pub fn poly(name: &str, count: usize) -> Self {
        Self::Shape { name: name.to_string(), count, text: String::new() }
    }

    /// Text operation.
    #[must_use]
    pub fn text(name: &str, text: impl Into<String>) -> Self {
        Self::Shape { name: name.to_string(), count: 0, text: text.into() }
    }
}

/// Flat numeric buffer interpreted by an operation list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintingObject {
    /// Operations in draw order.
    pub ops: Vec<PaintOp>,
    /// Coordinates consumed by the operations.
    pub buffer: Vec<f64>,
}

/// One drawable inside a time step or a pad.
#[derive(Debug, Clone)]
pub enum PlotObject {
    /// Function.
    Function(FunctionObject),
    /// Graph.
    Graph(GraphObject),
    /// Spline.
    Spline(SplineObject),
    /// Shape stream.
    Painting(PaintingObject),
}

/// Sequence of steps replayed as an animation over a fixed frame.
#[derive(Debug, Clone)]
pub struct GraphTimeObject {
    /// Object title.
    pub title: String,
    /// Objects with options drawn in each step.
    pub steps: Vec<Vec<(PlotObject, String)>>,
    /// Pause between steps in milliseconds.
    pub sleep_ms: u64,
    /// Frame x range.
    pub x_range: (f64, f64),
    /// Frame y range.
    pub y_range: (f64, f64),
}

/// Passed and total counts over a binned axis.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyObject {
    /// Object name.
    pub name: String,
    /// Bin edges, one more than the bin count.
    pub edges: Vec<f64>,
    /// Total entries per bin.
    pub total: Vec<f64>,
    /// Passed entries per bin.
    pub passed: Vec<f64>,
    /// Confidence level of the error band.
    pub confidence: f64,
    /// Line, fill and marker attributes.
    pub attributes: Attributes,
}

impl EfficiencyObject {
    /// Efficiency over bins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] when `total` and `passed` differ
    /// in length or `edges` is not one longer.
    pub fn new(edges: Vec<f64>, total: Vec<f64>, passed: Vec<f64>) -> Result<Self> {
        if total.len() != passed.len() {
            return Err(Error::DataLengthMismatch { x_len: total.len(), y_len: passed.len() });
        }
        if edges.len() != total.len() + 1 {
            return Err(Error::DataLengthMismatch { x_len: edges.len(), y_len: total.len() + 1 });
        }
        Ok(Self {
            name: "eff_graph".to_string(),
            edges,
            total,
            passed,
            confidence: 0.683,
            attributes: Attributes::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_samples_layout() {
        let saved = SavedSamples::from_stored(&[1.0, 2.0, 3.0, 0.0, 1.0]).expect("valid table");
        assert_eq!(saved.values, vec![1.0, 2.0, 3.0]);
        assert_eq!(saved.step(), 0.5);
        assert!(SavedSamples::from_stored(&[1.0, 0.0, 1.0]).is_none());
    }

    #[test]
    fn test_graph_length_mismatch() {
        assert!(GraphObject::new(vec![1.0], vec![1.0, 2.0]).is_err());
        let g = GraphObject::new(vec![1.0, 2.0], vec![1.0, 2.0]).expect("equal lengths");
        let err = g.with_errors(GraphErrors::Symmetric { ex: vec![0.1], ey: vec![0.1, 0.2] });
        assert!(matches!(err, Err(Error::DataLengthMismatch { x_len: 2, y_len: 1 })));
    }

    #[test]
    fn test_graph_edit_points() {
        let mut g = GraphObject::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0])
            .expect("equal lengths")
            .with_errors(GraphErrors::Symmetric { ex: vec![0.1, 0.2, 0.3], ey: vec![1.0, 2.0, 3.0] })
            .expect("matching errors");
        g.set_point(1, 2.5, 7.0);
        assert_eq!(g.y()[1], 7.0);
        g.remove_point(0);
        assert_eq!(g.x(), &[2.5, 3.0]);
        assert!(matches!(g.errors(), GraphErrors::Symmetric { ex, .. } if ex == &vec![0.2, 0.3]));
        g.remove_point(9);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_negligible_errors() {
        let e = GraphErrors::Symmetric { ex: vec![0.0], ey: vec![1e-320] };
        assert!(e.is_negligible());
        assert!(!GraphErrors::Symmetric { ex: vec![0.0], ey: vec![0.1] }.is_negligible());
        assert!(!GraphErrors::None.is_negligible());
    }

    #[test]
    fn test_knot_eval() {
        let k = Knot { x: 1.0, y: 2.0, b: 1.0, c: 0.5, d: 0.0, quintic: None };
        assert_eq!(k.eval(3.0), 2.0 + 2.0 + 2.0);
        let k5 = Knot { quintic: Some((0.0, 1.0)), ..k };
        assert_eq!(k5.eval(2.0), 2.0 + 1.0 + 0.5 + 1.0);
    }

    #[test]
    fn test_efficiency_shape_checked() {
        assert!(EfficiencyObject::new(vec![0.0, 1.0], vec![1.0], vec![1.0]).is_ok());
        assert!(EfficiencyObject::new(vec![0.0, 1.0], vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(EfficiencyObject::new(vec![0.0], vec![1.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_function_debug_hides_evaluator() {
        let f = FunctionObject::new("f", 0.0, 1.0, |x| x);
        let text = format!("{f:?}");
        assert!(text.contains("FunctionObject"));
        assert_eq!(f.evaluate(0.5), 0.5);
    }
}
