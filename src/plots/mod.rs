//! Plot painters.
//!
//! Every drawable object kind has a painter implementing [`Paintable`]:
//! bin derivation, rendering into a [`RenderList`] and hit-testing against the
//! last rendering. [`Plot`] is the closed set of painters, dispatched by
//! variant. Containers ([`MultiGraphPainter`], [`GraphTimePainter`]) drive
//! their children through the pipeline instead of painting themselves.

mod function;
mod graph;
mod multigraph;
mod polar;
mod shapes;
mod spline;
mod timegraph;

pub use function::FunctionPainter;
pub use graph::GraphPainter;
pub use multigraph::MultiGraphPainter;
pub use polar::{PolarGraphPainter, PolargramPainter};
pub use shapes::ShapesPainter;
pub use spline::SplinePainter;
pub use timegraph::GraphTimePainter;

use crate::bins::FrameRange;
use crate::color::{ColorRef, Palette};
use crate::config::RenderConfig;
use crate::data::DataPoint;
use crate::error::{Error, Result};
use crate::hit::{Pointer, Tooltip};
use crate::objects::{PlotObject, Polargram};
use crate::options::AutoColors;
use crate::polar::PolarScale;
use crate::render::RenderList;
use crate::scale::{Axis, ScaleProvider};
use crate::style::{Attributes, DefaultStyleResolver, StyleResolver};

// ============================================================================
// Render context
// ============================================================================

/// Coordinate frame a plot is drawn into.
#[derive(Clone, Copy)]
pub enum Frame<'a> {
    /// Cartesian frame with axes.
    Cartesian(&'a dyn ScaleProvider),
    /// Polar frame of a polargram.
    Polar(&'a PolarScale),
}

impl<'a> Frame<'a> {
    /// The cartesian scale provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] for a polar frame.
    pub fn cartesian(&self) -> Result<&'a dyn ScaleProvider> {
        match *self {
            Self::Cartesian(s) => Ok(s),
            Self::Polar(_) => Err(Error::Precondition("plot needs a cartesian frame".to_string())),
        }
    }

    /// The polar scale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] for a cartesian frame.
    pub fn polar(&self) -> Result<&'a PolarScale> {
        match *self {
            Self::Polar(s) => Ok(s),
            Self::Cartesian(_) => Err(Error::Precondition("polar graph needs a polar frame".to_string())),
        }
    }
}

impl std::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cartesian(s) => f.debug_tuple("Cartesian").field(&(s.width(), s.height())).finish(),
            Self::Polar(s) => f.debug_tuple("Polar").field(s).finish(),
        }
    }
}

/// Frame a plot asks for when none exists yet.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameRequest {
    /// Cartesian frame over a range.
    Cartesian(FrameRange),
    /// Polar frame described by a polargram.
    Polar(Polargram),
}

/// Everything a painter reads while rendering or hit-testing.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Target frame.
    pub frame: Frame<'a>,
    /// Render settings.
    pub config: &'a RenderConfig,
    /// Attribute resolver.
    pub styles: &'a dyn StyleResolver,
    /// Palette for automatic colors.
    pub palette: Option<&'a dyn Palette>,
    /// Draw-order index of the plot among its siblings.
    pub index: usize,
    /// Number of colors the palette is split into.
    pub count: usize,
}

impl<'a> RenderContext<'a> {
    /// Context with the default style resolver and no palette.
    #[must_use]
    pub fn new(frame: Frame<'a>, config: &'a RenderConfig) -> Self {
        Self { frame, config, styles: &DefaultStyleResolver, palette: None, index: 0, count: 1 }
    }

    /// Use another style resolver.
    #[must_use]
    pub fn styles(mut self, styles: &'a dyn StyleResolver) -> Self {
        self.styles = styles;
        self
    }

    /// Palette for automatic colors.
    #[must_use]
    pub fn palette(mut self, palette: &'a dyn Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Draw-order position among `count` palette slots.
    #[must_use]
    pub fn position(mut self, index: usize, count: usize) -> Self {
        self.index = index;
        self.count = count.max(1);
        self
    }

    /// Attributes with the requested automatic colors applied.
    #[must_use]
    pub fn auto_colored(&self, attributes: &Attributes, auto: AutoColors) -> Attributes {
        let mut attrs = *attributes;
        let Some(palette) = self.palette.filter(|_| auto.any()) else {
            return attrs;
        };
        let color = ColorRef::Rgba(palette.calc_color(self.index, self.count));
        if auto.fill {
            attrs.fill.color = color;
        }
        if auto.line {
            attrs.line.color = color;
        }
        if auto.marker {
            attrs.marker.color = color;
        }
        attrs
    }
}

/// Capability shared by all painters.
pub trait Paintable {
    /// Object name shown in tooltips.
    fn name(&self) -> &str;

    /// Data-space series for the given frame (or none yet).
    fn derive_bins(&self, frame: Option<&Frame<'_>>, config: &RenderConfig) -> Vec<DataPoint>;

    /// Frame to create when drawing without one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] when the plot can only be overlaid.
    fn frame_request(&self, config: &RenderConfig) -> Result<FrameRequest>;

    /// Rebuild geometry for the context's frame, replacing the cached series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] when the frame kind does not fit.
    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList>;

    /// Tooltip for the pointer against the last rendering.
    fn hit_test(&self, pointer: &Pointer, ctx: &RenderContext<'_>) -> Option<Tooltip>;

    /// Whether zooming `axis` into `[min, max]` shows anything new.
    fn can_zoom_in(&self, _axis: Axis, _min: f64, _max: f64) -> bool {
        false
    }

    /// Drop the cached rendering.
    fn clear(&mut self);
}

// ============================================================================
// Plot variants
// ============================================================================

/// Closed set of single-object painters.
#[derive(Debug)]
pub enum Plot {
    /// Sampled function.
    Function(FunctionPainter),
    /// Point graph, including efficiencies.
    Graph(GraphPainter),
    /// Polynomial spline.
    Spline(SplinePainter),
    /// Graph in polar coordinates.
    PolarGraph(PolarGraphPainter),
    /// Polar frame grid.
    Polargram(PolargramPainter),
    /// Shape primitive stream.
    Shapes(ShapesPainter),
}

macro_rules! dispatch {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Plot::Function($p) => $body,
            Plot::Graph($p) => $body,
            Plot::Spline($p) => $body,
            Plot::PolarGraph($p) => $body,
            Plot::Polargram($p) => $body,
            Plot::Shapes($p) => $body,
        }
    };
}

impl Plot {
    /// Painter for a plot object with its draw options.
    #[must_use]
    pub fn from_object(object: PlotObject, opt: &str) -> Self {
        match object {
            PlotObject::Function(f) => Self::Function(FunctionPainter::new(f, opt)),
            PlotObject::Graph(g) => Self::Graph(GraphPainter::new(g, opt)),
            PlotObject::Spline(s) => Self::Spline(SplinePainter::new(s, opt)),
            PlotObject::Painting(p) => Self::Shapes(ShapesPainter::new(p)),
        }
    }
}

impl Paintable for Plot {
    fn name(&self) -> &str {
        dispatch!(self, p => p.name())
    }

    fn derive_bins(&self, frame: Option<&Frame<'_>>, config: &RenderConfig) -> Vec<DataPoint> {
        dispatch!(self, p => p.derive_bins(frame, config))
    }

    fn frame_request(&self, config: &RenderConfig) -> Result<FrameRequest> {
        dispatch!(self, p => p.frame_request(config))
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        dispatch!(self, p => p.render(ctx))
    }

    fn hit_test(&self, pointer: &Pointer, ctx: &RenderContext<'_>) -> Option<Tooltip> {
        dispatch!(self, p => p.hit_test(pointer, ctx))
    }

    fn can_zoom_in(&self, axis: Axis, min: f64, max: f64) -> bool {
        dispatch!(self, p => p.can_zoom_in(axis, min, max))
    }

    fn clear(&mut self) {
        dispatch!(self, p => p.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{GradientPalette, Rgba};
    use crate::scale::FrameScale;

    #[test]
    fn test_frame_kind_mismatch() {
        let frame = FrameScale::builder(100.0, 100.0).build().expect("frame");
        let polar = PolarScale::new(100.0, 100.0, 0.1, 0.0, 1.0, 0.0).expect("polar");
        assert!(Frame::Cartesian(&frame).polar().is_err());
        assert!(Frame::Polar(&polar).cartesian().is_err());
        assert!(Frame::Cartesian(&frame).cartesian().is_ok());
    }

    #[test]
    fn test_auto_colored() {
        let frame = FrameScale::builder(100.0, 100.0).build().expect("frame");
        let config = RenderConfig::default();
        let palette = GradientPalette::new(vec![Rgba::RED, Rgba::BLUE]).expect("palette");
        let attrs = Attributes::default();

        let ctx = RenderContext::new(Frame::Cartesian(&frame), &config);
        let auto = AutoColors { fill: false, line: true, marker: false };
        assert_eq!(ctx.auto_colored(&attrs, auto), attrs);

        let ctx = ctx.palette(&palette).position(0, 2);
        let colored = ctx.auto_colored(&attrs, auto);
        assert_eq!(colored.line.color, ColorRef::Rgba(palette.calc_color(0, 2)));
        assert_eq!(colored.fill, attrs.fill);
        assert_eq!(ctx.auto_colored(&attrs, AutoColors::default()), attrs);
    }
}
