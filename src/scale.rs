//! Coordinate scales: data space to pixel space.
//!
//! [`LinearScale`] and [`LogScale`] are the axis primitives. [`FrameScale`]
//! combines two of them into the per-frame mapping consumed by painters
//! through the [`ScaleProvider`] trait. Pixel y grows downward, so the y axis
//! of a frame is inverted.

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max or a bound is not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Logarithmic scale for continuous-to-continuous mapping.
///
/// Values outside the positive half-line are not guarded: they map to a
/// non-finite pixel which callers filter out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
    base: f64,
}

impl LogScale {
    /// Create a new logarithmic scale with base 10.
    ///
    /// # Errors
    ///
    /// Returns an error if domain contains non-positive values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        Self::with_base(domain, range, 10.0)
    }

    /// Create a logarithmic scale with a custom base.
    ///
    /// # Errors
    ///
    /// Returns an error if domain contains non-positive values or base is invalid.
    pub fn with_base(domain: (f64, f64), range: (f64, f64), base: f64) -> Result<Self> {
        if domain.0 <= 0.0 || domain.1 <= 0.0 || !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Log scale domain must be positive".to_string()));
        }
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }
        if base <= 0.0 || (base - 1.0).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain(
                "Log scale base must be positive and not 1".to_string(),
            ));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
            base,
        })
    }

    fn log(&self, value: f64) -> f64 {
        value.ln() / self.base.ln()
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let log_min = self.log(self.domain_min);
        let log_max = self.log(self.domain_max);
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.base.powf(log_min + t * (log_max - log_min))
    }
}

impl Scale<f64, f64> for LogScale {
    fn scale(&self, value: f64) -> f64 {
        let log_min = self.log(self.domain_min);
        let log_max = self.log(self.domain_max);
        let t = (self.log(value) - log_min) / (log_max - log_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Scale of one frame axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisScale {
    /// Affine mapping.
    Linear(LinearScale),
    /// Base-10 logarithmic mapping.
    Log(LogScale),
}

impl AxisScale {
    /// Map a data value to pixels.
    #[must_use]
    pub fn to_pixel(&self, value: f64) -> f64 {
        match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value),
        }
    }

    /// Map a pixel back to data space.
    #[must_use]
    pub fn to_data(&self, pixel: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(pixel),
            Self::Log(s) => s.invert(pixel),
        }
    }

    /// Whether this axis is logarithmic.
    #[must_use]
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log(_))
    }

    /// Visible data range.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Log(s) => s.domain(),
        }
    }

    /// Build an axis over `domain` onto `range`, recovering from invalid domains.
    ///
    /// A degenerate domain is widened to `[min, min + 1]`. A log request over a
    /// non-positive domain falls back to a linear axis.
    fn recovering(domain: (f64, f64), range: (f64, f64), logarithmic: bool) -> Result<Self> {
        let (mut lo, mut hi) = domain;
        if !lo.is_finite() || !hi.is_finite() {
            log::debug!("non-finite axis domain [{lo}, {hi}], using [0, 1]");
            lo = 0.0;
            hi = 1.0;
        }
        if hi <= lo {
            log::debug!("degenerate axis domain [{lo}, {hi}], padding by 1");
            hi = lo + 1f64.max(lo.abs() * 1e-9);
        }
        if logarithmic {
            match LogScale::new((lo, hi), range) {
                Ok(scale) => return Ok(Self::Log(scale)),
                Err(e) => log::debug!("log axis unavailable ({e}), falling back to linear"),
            }
        }
        LinearScale::new((lo, hi), range).map(Self::Linear)
    }
}

/// One of the two cartesian axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Read-only coordinate services of the enclosing frame.
///
/// Painters only ever see a frame through this trait; the frame itself is
/// owned by the axis-drawing collaborator.
pub trait ScaleProvider {
    /// Data x to frame pixel x.
    fn grx(&self, x: f64) -> f64;
    /// Data y to frame pixel y (inverted).
    fn gry(&self, y: f64) -> f64;
    /// Frame pixel x back to data x.
    fn revert_x(&self, px: f64) -> f64;
    /// Frame pixel y back to data y.
    fn revert_y(&self, py: f64) -> f64;
    /// Frame width in pixels.
    fn width(&self) -> f64;
    /// Frame height in pixels.
    fn height(&self) -> f64;
    /// Whether the x axis is logarithmic.
    fn logx(&self) -> bool;
    /// Whether the y axis is logarithmic.
    fn logy(&self) -> bool;
    /// Visible x range.
    fn x_range(&self) -> (f64, f64);
    /// Visible y range.
    fn y_range(&self) -> (f64, f64);
    /// Current x zoom window, if the user zoomed.
    fn zoom_x(&self) -> Option<(f64, f64)>;

    /// Size of the enclosing pad in pixels.
    fn pad_size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    /// Position of the frame's top-left corner inside the pad.
    fn frame_origin(&self) -> Point {
        Point::ORIGIN
    }

    /// Map a value to pad pixels, either through the axis or as a pad fraction.
    ///
    /// Normalized y runs bottom to top.
    fn axis_to_pad(&self, axis: Axis, value: f64, ndc: bool) -> f64 {
        let (pad_w, pad_h) = self.pad_size();
        let origin = self.frame_origin();
        match (axis, ndc) {
            (Axis::X, true) => value * pad_w,
            (Axis::Y, true) => (1.0 - value) * pad_h,
            (Axis::X, false) => origin.x + self.grx(value),
            (Axis::Y, false) => origin.y + self.gry(value),
        }
    }
}

/// Concrete cartesian frame mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameScale {
    x_axis: AxisScale,
    y_axis: AxisScale,
    width: f64,
    height: f64,
    zoom_x: Option<(f64, f64)>,
    pad_size: (f64, f64),
    origin: Point,
}

impl FrameScale {
    /// Start building a frame of the given pixel size.
    #[must_use]
    pub fn builder(width: f64, height: f64) -> FrameScaleBuilder {
        FrameScaleBuilder::new(width, height)
    }

    /// The x axis scale.
    #[must_use]
    pub fn x_axis(&self) -> &AxisScale {
        &self.x_axis
    }

    /// The y axis scale.
    #[must_use]
    pub fn y_axis(&self) -> &AxisScale {
        &self.y_axis
    }
}

impl ScaleProvider for FrameScale {
    fn grx(&self, x: f64) -> f64 {
        self.x_axis.to_pixel(x)
    }

    fn gry(&self, y: f64) -> f64 {
        self.y_axis.to_pixel(y)
    }

    fn revert_x(&self, px: f64) -> f64 {
        self.x_axis.to_data(px)
    }

    fn revert_y(&self, py: f64) -> f64 {
        self.y_axis.to_data(py)
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn logx(&self) -> bool {
        self.x_axis.is_log()
    }

    fn logy(&self) -> bool {
        self.y_axis.is_log()
    }

    fn x_range(&self) -> (f64, f64) {
        self.x_axis.domain()
    }

    fn y_range(&self) -> (f64, f64) {
        self.y_axis.domain()
    }

    fn zoom_x(&self) -> Option<(f64, f64)> {
        self.zoom_x
    }

    fn pad_size(&self) -> (f64, f64) {
        self.pad_size
    }

    fn frame_origin(&self) -> Point {
        self.origin
    }
}

/// Builder for [`FrameScale`].
#[derive(Debug, Clone)]
pub struct FrameScaleBuilder {
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
    logx: bool,
    logy: bool,
    zoom_x: Option<(f64, f64)>,
    pad_size: Option<(f64, f64)>,
    origin: Point,
}

impl FrameScaleBuilder {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            logx: false,
            logy: false,
            zoom_x: None,
            pad_size: None,
            origin: Point::ORIGIN,
        }
    }

    /// Set the full x data range.
    #[must_use]
    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = (min, max);
        self
    }

    /// Set the full y data range.
    #[must_use]
    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = (min, max);
        self
    }

    /// Request a logarithmic x axis.
    #[must_use]
    pub fn logx(mut self, enabled: bool) -> Self {
        self.logx = enabled;
        self
    }

    /// Request a logarithmic y axis.
    #[must_use]
    pub fn logy(mut self, enabled: bool) -> Self {
        self.logy = enabled;
        self
    }

    /// Zoom the x axis to a sub-window. An empty window clears the zoom.
    #[must_use]
    pub fn zoom_x(mut self, min: f64, max: f64) -> Self {
        self.zoom_x = if min < max { Some((min, max)) } else { None };
        self
    }

    /// Place the frame inside a larger pad.
    #[must_use]
    pub fn pad(mut self, width: f64, height: f64, origin: Point) -> Self {
        self.pad_size = Some((width, height));
        self.origin = origin;
        self
    }

    /// Build the frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a non-positive pixel size. Domain
    /// problems are recovered, never reported.
    pub fn build(self) -> Result<FrameScale> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        let x_domain = self.zoom_x.unwrap_or(self.x_range);
        let x_axis = AxisScale::recovering(x_domain, (0.0, self.width), self.logx)?;
        let y_axis = AxisScale::recovering(self.y_range, (self.height, 0.0), self.logy)?;

        Ok(FrameScale {
            x_axis,
            y_axis,
            width: self.width,
            height: self.height,
            zoom_x: self.zoom_x,
            pad_size: self.pad_size.unwrap_or((self.width, self.height)),
            origin: self.origin,
        })
    }
}

/// Step between nice round ticks covering `[min, max]` with about `count` ticks.
#[must_use]
pub fn tick_step(min: f64, max: f64, count: usize) -> f64 {
    let raw = (max - min).abs() / count.max(1) as f64;
    if !(raw > 0.0) || !raw.is_finite() {
        return 0.0;
    }
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Nice round tick values inside `[min, max]`.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || count == 0 {
        return Vec::new();
    }
    if (max - min).abs() < f64::EPSILON {
        return vec![min];
    }
    let (lo, hi) = if min < max { (min, max) } else { (max, min) };
    let step = tick_step(lo, hi, count);
    if step <= 0.0 {
        return Vec::new();
    }

    // Dividing by the inverse step keeps decimal ticks exact.
    let inv = if step < 1.0 { (1.0 / step).round() } else { 0.0 };
    let (start, stop) = if inv > 0.0 {
        ((lo * inv).ceil(), (hi * inv).floor())
    } else {
        ((lo / step).ceil(), (hi / step).floor())
    };

    let n = (stop - start).max(-1.0) as i64 + 1;
    (0..n)
        .map(|k| {
            let i = start + k as f64;
            if inv > 0.0 {
                i / inv
            } else {
                i * step
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame() -> FrameScale {
        FrameScale::builder(200.0, 100.0)
            .x_range(0.0, 10.0)
            .y_range(0.0, 5.0)
            .build()
            .expect("frame should build")
    }

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0)).expect("operation should succeed");
        assert_relative_eq!(scale.scale(0.0), 0.0);
        assert_relative_eq!(scale.scale(50.0), 0.5);
        assert_relative_eq!(scale.scale(100.0), 1.0);
        assert_relative_eq!(scale.invert(0.5), 50.0);
    }

    #[test]
    fn test_linear_scale_equal_domain_error() {
        assert!(LinearScale::new((5.0, 5.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((f64::NAN, 5.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_log_scale() {
        let scale = LogScale::new((1.0, 1000.0), (0.0, 3.0)).expect("operation should succeed");
        assert_relative_eq!(scale.scale(10.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(scale.scale(100.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(scale.invert(2.0), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_log_scale_invalid_domain() {
        assert!(LogScale::new((-1.0, 100.0), (0.0, 1.0)).is_err());
        assert!(LogScale::new((0.0, 100.0), (0.0, 1.0)).is_err());
        assert!(LogScale::with_base((1.0, 100.0), (0.0, 1.0), 1.0).is_err());
    }

    #[test]
    fn test_log_scale_non_positive_value_is_not_finite() {
        let scale = LogScale::new((1.0, 100.0), (0.0, 1.0)).expect("operation should succeed");
        assert!(!scale.scale(0.0).is_finite());
        assert!(scale.scale(-3.0).is_nan());
    }

    #[test]
    fn test_frame_y_inverted() {
        let frame = frame();
        assert_relative_eq!(frame.grx(5.0), 100.0);
        assert_relative_eq!(frame.gry(0.0), 100.0);
        assert_relative_eq!(frame.gry(5.0), 0.0);
        assert_relative_eq!(frame.revert_y(50.0), 2.5);
    }

    #[test]
    fn test_frame_zoom_window() {
        let frame = FrameScale::builder(100.0, 100.0)
            .x_range(0.0, 10.0)
            .zoom_x(2.0, 4.0)
            .build()
            .expect("frame should build");
        assert_eq!(frame.zoom_x(), Some((2.0, 4.0)));
        assert_eq!(frame.x_range(), (2.0, 4.0));
        assert_relative_eq!(frame.grx(3.0), 50.0);
    }

    #[test]
    fn test_frame_log_fallback_to_linear() {
        let frame = FrameScale::builder(100.0, 100.0)
            .x_range(-1.0, 10.0)
            .logx(true)
            .build()
            .expect("frame should build");
        assert!(!frame.logx());
    }

    #[test]
    fn test_frame_log_axis() {
        let frame = FrameScale::builder(300.0, 100.0)
            .x_range(1.0, 1000.0)
            .logx(true)
            .build()
            .expect("frame should build");
        assert!(frame.logx());
        assert_relative_eq!(frame.grx(10.0), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_degenerate_domain_padded() {
        let frame = FrameScale::builder(100.0, 100.0)
            .x_range(3.0, 3.0)
            .build()
            .expect("frame should build");
        assert_eq!(frame.x_range(), (3.0, 4.0));
    }

    #[test]
    fn test_frame_invalid_dimensions() {
        let result = FrameScale::builder(0.0, 100.0).build();
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_axis_to_pad() {
        let frame = FrameScale::builder(100.0, 50.0)
            .x_range(0.0, 10.0)
            .y_range(0.0, 10.0)
            .pad(200.0, 100.0, Point::new(20.0, 10.0))
            .build()
            .expect("frame should build");
        assert_relative_eq!(frame.axis_to_pad(Axis::X, 0.25, true), 50.0);
        assert_relative_eq!(frame.axis_to_pad(Axis::Y, 0.25, true), 75.0);
        assert_relative_eq!(frame.axis_to_pad(Axis::X, 5.0, false), 70.0);
        assert_relative_eq!(frame.axis_to_pad(Axis::Y, 10.0, false), 10.0);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        let fine = nice_ticks(0.0, 0.35, 5);
        assert_eq!(fine.len(), 8);
        assert_relative_eq!(fine[1], 0.05);
        assert_relative_eq!(fine[7], 0.35);
        assert_eq!(nice_ticks(2.0, 2.0, 5), vec![2.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
    }
}
