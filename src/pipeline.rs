//! Per-plot render pipeline.
//!
//! A [`PlotPainter`] walks one plot through its life cycle:
//!
//! ```text
//! Uninitialized --draw(None)--> AxisPending --frame_ready--> Ready
//! Uninitialized --draw(Some)----------------------------->  Ready
//! Ready --redraw--> Redrawing --> Ready
//! any --dispose--> Disposed
//! ```
//!
//! Every render replaces the painter's surface group wholesale. Containers
//! draw their children one at a time through a [`DrawQueue`].

use crate::bins::FrameRange;
use crate::color::Palette;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::hit::{Pointer, Tooltip, TooltipTracker};
use crate::plots::{Frame, FrameRequest, Paintable, Plot, RenderContext};
use crate::polar::PolarScale;
use crate::render::{DrawingSurface, GroupId};
use crate::scale::{Axis, FrameScale, ScaleProvider};
use crate::style::{DefaultStyleResolver, StyleResolver};

/// Fraction of the pad left around a synthesized cartesian frame.
pub const FRAME_MARGIN: f64 = 0.1;

/// Fraction of the pad left around a polar frame.
pub const POLAR_MARGIN: f64 = 0.1;

// ============================================================================
// Pad and frames
// ============================================================================

/// Drawing area shared by the painters of one pad.
#[derive(Clone, Copy)]
pub struct Pad<'a> {
    /// Pad width in pixels.
    pub width: f64,
    /// Pad height in pixels.
    pub height: f64,
    /// Render settings.
    pub config: &'a RenderConfig,
    /// Attribute resolver.
    pub styles: &'a dyn StyleResolver,
    /// Palette for automatic colors.
    pub palette: Option<&'a dyn Palette>,
    /// Logarithmic x axis.
    pub logx: bool,
    /// Logarithmic y axis.
    pub logy: bool,
}

impl<'a> Pad<'a> {
    /// Pad with the default style resolver and no palette.
    #[must_use]
    pub fn new(width: f64, height: f64, config: &'a RenderConfig) -> Self {
        Self { width, height, config, styles: &DefaultStyleResolver, palette: None, logx: false, logy: false }
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

    /// Logarithmic axes for the frames of this pad.
    #[must_use]
    pub fn log_axes(mut self, logx: bool, logy: bool) -> Self {
        self.logx = logx;
        self.logy = logy;
        self
    }

    /// Frame satisfying a painter's request, as the frame collaborator would
    /// lay it out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for an empty pad.
    pub fn frame_for(&self, request: &FrameRequest) -> Result<PadFrame> {
        match request {
            FrameRequest::Cartesian(range) => self.cartesian_frame(*range),
            FrameRequest::Polar(pg) => Ok(PadFrame::Polar(PolarScale::new(
                self.width,
                self.height,
                POLAR_MARGIN,
                pg.rmin,
                pg.rmax,
                pg.axis_angle,
            )?)),
        }
    }

    /// Cartesian frame over `range`, inset by [`FRAME_MARGIN`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for an empty pad.
    pub fn cartesian_frame(&self, range: FrameRange) -> Result<PadFrame> {
        let origin = Point::new((self.width * FRAME_MARGIN).round(), (self.height * FRAME_MARGIN).round());
        let scale = FrameScale::builder(self.width - 2.0 * origin.x, self.height - 2.0 * origin.y)
            .x_range(range.xmin, range.xmax)
            .y_range(range.ymin, range.ymax)
            .logx(self.logx)
            .logy(self.logy)
            .pad(self.width, self.height, origin)
            .build()?;
        Ok(PadFrame::Cartesian(scale))
    }
}

impl std::fmt::Debug for Pad<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pad")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("config", self.config)
            .field("palette", &self.palette.is_some())
            .field("logx", &self.logx)
            .field("logy", &self.logy)
            .finish_non_exhaustive()
    }
}

/// A frame owned by the pipeline for one redraw cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PadFrame {
    /// Cartesian frame.
    Cartesian(FrameScale),
    /// Polar frame.
    Polar(PolarScale),
}

impl PadFrame {
    /// Borrowed view handed to painters.
    #[must_use]
    pub fn frame(&self) -> Frame<'_> {
        match self {
            Self::Cartesian(s) => Frame::Cartesian(s),
            Self::Polar(s) => Frame::Polar(s),
        }
    }

    /// Pad position of the coordinate system painters hit-test in.
    #[must_use]
    pub fn origin(&self) -> Point {
        match self {
            Self::Cartesian(s) => s.frame_origin(),
            Self::Polar(_) => Point::ORIGIN,
        }
    }
}

// ============================================================================
// Painter state machine
// ============================================================================

/// Life-cycle state of a [`PlotPainter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Nothing drawn yet.
    #[default]
    Uninitialized,
    /// Waiting for the frame collaborator to draw a requested frame.
    AxisPending,
    /// Drawn; hit-testing is live.
    Ready,
    /// Rebuilding geometry.
    Redrawing,
    /// Released; draws are no-ops and hit-tests miss.
    Disposed,
}

impl PipelineState {
    /// State name for diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::AxisPending => "AxisPending",
            Self::Ready => "Ready",
            Self::Redrawing => "Redrawing",
            Self::Disposed => "Disposed",
        }
    }
}

/// Outcome of [`PlotPainter::draw`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawStep {
    /// The plot was rendered into the surface.
    Drawn,
    /// A frame must be drawn first; call `frame_ready` once it exists.
    FramePending(FrameRequest),
}

/// Render context for a frame, pad and palette slot.
pub(crate) fn context<'a>(frame: &'a PadFrame, pad: &Pad<'a>, slot: (usize, usize)) -> RenderContext<'a> {
    let ctx = RenderContext::new(frame.frame(), pad.config).styles(pad.styles).position(slot.0, slot.1);
    match pad.palette {
        Some(p) => ctx.palette(p),
        None => ctx,
    }
}

/// Drives one painter through draw, redraw, hit-test and disposal.
#[derive(Debug)]
pub struct PlotPainter<P: Paintable = Plot> {
    plot: P,
    group: GroupId,
    state: PipelineState,
    frame: Option<PadFrame>,
    request: Option<FrameRequest>,
    slot: (usize, usize),
    tracker: TooltipTracker,
}

impl<P: Paintable> PlotPainter<P> {
    /// Painter drawing into `group`.
    #[must_use]
    pub fn new(plot: P, group: GroupId) -> Self {
        Self {
            plot,
            group,
            state: PipelineState::Uninitialized,
            frame: None,
            request: None,
            slot: (0, 1),
            tracker: TooltipTracker::new(),
        }
    }

    /// Palette slot `index` of `count`, the draw-order position among siblings.
    #[must_use]
    pub fn at_position(mut self, index: usize, count: usize) -> Self {
        self.slot = (index, count.max(1));
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The painted plot.
    #[must_use]
    pub fn plot(&self) -> &P {
        &self.plot
    }

    /// Mutable access for object updates; follow with [`Self::redraw`].
    pub fn plot_mut(&mut self) -> &mut P {
        &mut self.plot
    }

    /// Surface group of this painter.
    #[must_use]
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Frame of the last rendering.
    #[must_use]
    pub fn frame(&self) -> Option<&PadFrame> {
        self.frame.as_ref()
    }

    /// Frame requested while in `AxisPending`.
    #[must_use]
    pub fn pending_request(&self) -> Option<&FrameRequest> {
        self.request.as_ref()
    }

    fn transition_error(&self, to: PipelineState) -> Error {
        Error::InvalidTransition { from: self.state.name(), to: to.name() }
    }

    fn render_into(&mut self, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        let frame = self.frame.as_ref().ok_or_else(|| Error::Precondition("painter has no frame".to_string()))?;
        let list = self.plot.render(&context(frame, pad, self.slot))?;
        surface.replace_group(self.group, list);
        self.tracker.reset();
        Ok(())
    }

    /// First draw. Without a frame the plot's frame request is returned and
    /// the painter waits in `AxisPending`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] unless uninitialized; [`Error::Precondition`]
    /// when the plot cannot be drawn on its own or not on `frame`. The state is
    /// left unchanged on error.
    pub fn draw(&mut self, frame: Option<PadFrame>, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<DrawStep> {
        if self.state != PipelineState::Uninitialized {
            let to = if frame.is_some() { PipelineState::Ready } else { PipelineState::AxisPending };
            return Err(self.transition_error(to));
        }
        match frame {
            Some(frame) => {
                self.frame = Some(frame);
                if let Err(e) = self.render_into(pad, surface) {
                    self.frame = None;
                    return Err(e);
                }
                self.state = PipelineState::Ready;
                Ok(DrawStep::Drawn)
            }
            None => {
                let request = self.plot.frame_request(pad.config)?;
                log::debug!("{} requests a frame: {request:?}", self.plot.name());
                self.request = Some(request.clone());
                self.state = PipelineState::AxisPending;
                Ok(DrawStep::FramePending(request))
            }
        }
    }

    /// The requested frame has been drawn; render on it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] unless in `AxisPending`, or the render
    /// error. The state is left unchanged on error.
    pub fn frame_ready(&mut self, frame: PadFrame, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        if self.state != PipelineState::AxisPending {
            return Err(self.transition_error(PipelineState::Ready));
        }
        self.frame = Some(frame);
        if let Err(e) = self.render_into(pad, surface) {
            self.frame = None;
            return Err(e);
        }
        self.request = None;
        self.state = PipelineState::Ready;
        Ok(())
    }

    /// Rebuild after a zoom, resize or object update. A new `frame` replaces
    /// the current one. No-op once disposed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] unless ready, or the render error, after
    /// which the previous frame is kept.
    pub fn redraw(&mut self, frame: Option<PadFrame>, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        match self.state {
            PipelineState::Disposed => return Ok(()),
            PipelineState::Ready => {}
            _ => return Err(self.transition_error(PipelineState::Redrawing)),
        }
        self.state = PipelineState::Redrawing;
        let previous = frame.map(|f| self.frame.replace(f));
        let result = self.render_into(pad, surface);
        if result.is_err() {
            if let Some(previous) = previous {
                self.frame = previous;
            }
        }
        self.state = PipelineState::Ready;
        result
    }

    /// Release cached geometry and the surface group.
    pub fn dispose(&mut self, surface: &mut dyn DrawingSurface) {
        if self.state == PipelineState::Disposed {
            return;
        }
        self.plot.clear();
        self.frame = None;
        self.request = None;
        self.tracker.reset();
        surface.remove_group(self.group);
        self.state = PipelineState::Disposed;
    }

    /// Tooltip for a pointer in pad pixels. Misses unless ready.
    pub fn locate(&mut self, pointer: &Pointer, pad: &Pad<'_>) -> Option<Tooltip> {
        if self.state != PipelineState::Ready {
            return None;
        }
        let frame = self.frame.as_ref()?;
        let origin = frame.origin();
        let local = Pointer { x: pointer.x - origin.x, y: pointer.y - origin.y, ..*pointer };
        let tip = self.plot.hit_test(&local, &context(frame, pad, self.slot)).map(|mut tip| {
            tip.x += origin.x;
            tip.y += origin.y;
            if let Some(rect) = tip.rect.as_mut() {
                rect.x += origin.x;
                rect.y += origin.y;
            }
            tip
        });
        self.tracker.track(tip)
    }

    /// Whether zooming shows more detail; false unless ready.
    #[must_use]
    pub fn can_zoom_in(&self, axis: Axis, min: f64, max: f64) -> bool {
        self.state == PipelineState::Ready && self.plot.can_zoom_in(axis, min, max)
    }
}

// ============================================================================
// Sequential draw queue
// ============================================================================

/// Ordered task list consumed one task at a time.
///
/// Task `i + 1` is only handed out after task `i` completed, which keeps
/// automatic color assignment and z-order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawQueue {
    len: usize,
    next: usize,
    in_flight: Option<usize>,
}

impl DrawQueue {
    /// Queue of `len` tasks.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len, next: 0, in_flight: None }
    }

    /// Next task to start, `None` while one is in flight or when done.
    pub fn start_next(&mut self) -> Option<usize> {
        if self.in_flight.is_some() || self.next >= self.len {
            return None;
        }
        self.in_flight = Some(self.next);
        self.in_flight
    }

    /// Report task `index` as finished.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueOrder`] when `index` is not the task in flight.
    pub fn complete(&mut self, index: usize) -> Result<()> {
        if self.in_flight != Some(index) {
            return Err(Error::QueueOrder { expected: self.in_flight, got: index });
        }
        self.in_flight = None;
        self.next += 1;
        Ok(())
    }

    /// Whether all tasks completed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.next >= self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::FeatureRef;
    use crate::objects::{GraphObject, PlotObject, Polargram, PolarGraphObject};
    use crate::output::SvgSurface;
    use crate::plots::PolarGraphPainter;

    fn graph_plot() -> Plot {
        let graph = GraphObject::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 1.0]).expect("graph");
        Plot::from_object(PlotObject::Graph(graph), "L")
    }

    #[test]
    fn test_draw_without_frame_waits_for_axis() {
        let config = RenderConfig::default();
        let pad = Pad::new(400.0, 300.0, &config);
        let mut surface = SvgSurface::new(400, 300);
        let mut painter = PlotPainter::new(graph_plot(), GroupId(1));

        let request = match painter.draw(None, &pad, &mut surface).expect("draw") {
            DrawStep::FramePending(r) => r,
            DrawStep::Drawn => panic!("expected a frame request"),
        };
        assert_eq!(painter.state(), PipelineState::AxisPending);
        assert!(surface.group(GroupId(1)).is_none());
        assert!(painter.locate(&Pointer::new(40.0, 30.0), &pad).is_none());

        let frame = pad.frame_for(&request).expect("frame");
        painter.frame_ready(frame, &pad, &mut surface).expect("ready");
        assert_eq!(painter.state(), PipelineState::Ready);
        assert!(painter.pending_request().is_none());
        assert_eq!(surface.group(GroupId(1)).expect("group").origin(), Point::new(40.0, 30.0));
    }

    #[test]
    fn test_invalid_transitions_keep_state() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let mut painter = PlotPainter::new(graph_plot(), GroupId(1));

        let frame = pad.cartesian_frame(FrameRange::new(0.0, 2.0, 0.0, 2.0)).expect("frame");
        assert!(matches!(
            painter.frame_ready(frame.clone(), &pad, &mut surface),
            Err(Error::InvalidTransition { from: "Uninitialized", to: "Ready" })
        ));
        assert!(matches!(painter.redraw(None, &pad, &mut surface), Err(Error::InvalidTransition { .. })));
        assert_eq!(painter.state(), PipelineState::Uninitialized);

        painter.draw(Some(frame.clone()), &pad, &mut surface).expect("draw");
        assert!(matches!(painter.draw(Some(frame), &pad, &mut surface), Err(Error::InvalidTransition { .. })));
        assert_eq!(painter.state(), PipelineState::Ready);
    }

    #[test]
    fn test_precondition_leaves_painter_uninitialized() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let graph = PolarGraphObject::new(vec![0.0, 1.0], vec![1.0, 2.0]).expect("graph");
        let mut painter = PlotPainter::new(PolarGraphPainter::new(graph, ""), GroupId(7));

        let cartesian = pad.cartesian_frame(FrameRange::UNIT).expect("frame");
        assert!(matches!(painter.draw(Some(cartesian), &pad, &mut surface), Err(Error::Precondition(_))));
        assert_eq!(painter.state(), PipelineState::Uninitialized);
        assert!(painter.frame().is_none());
        assert!(surface.group(GroupId(7)).is_none());

        let polar = pad.frame_for(&FrameRequest::Polar(Polargram::new(0.0, 2.0))).expect("polar");
        assert_eq!(painter.draw(Some(polar), &pad, &mut surface).expect("draw"), DrawStep::Drawn);
    }

    #[test]
    fn test_redraw_replaces_group_and_dispose_releases() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let mut painter = PlotPainter::new(graph_plot(), GroupId(2));
        let frame = pad.cartesian_frame(FrameRange::new(0.0, 2.0, 0.0, 2.0)).expect("frame");
        painter.draw(Some(frame), &pad, &mut surface).expect("draw");
        let before = surface.group(GroupId(2)).expect("group").clone();

        let zoomed = pad.cartesian_frame(FrameRange::new(0.0, 1.0, 0.0, 2.0)).expect("frame");
        painter.redraw(Some(zoomed), &pad, &mut surface).expect("redraw");
        assert_eq!(painter.state(), PipelineState::Ready);
        assert_eq!(surface.group_ids().count(), 1);
        assert_ne!(surface.group(GroupId(2)).expect("group"), &before);

        painter.dispose(&mut surface);
        assert_eq!(painter.state(), PipelineState::Disposed);
        assert!(surface.group(GroupId(2)).is_none());
        painter.redraw(None, &pad, &mut surface).expect("no-op");
        assert!(surface.group(GroupId(2)).is_none());
        assert!(painter.locate(&Pointer::new(10.0, 90.0), &pad).is_none());
    }

    #[test]
    fn test_locate_in_pad_coordinates_with_identity_suppression() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let mut painter = PlotPainter::new(graph_plot(), GroupId(1));
        // frame 80x80 at (10,10): point (1,2) sits at pad (50,10)
        let frame = pad.cartesian_frame(FrameRange::new(0.0, 2.0, 0.0, 2.0)).expect("frame");
        painter.draw(Some(frame), &pad, &mut surface).expect("draw");

        let tip = painter.locate(&Pointer::new(51.0, 11.0), &pad).expect("hit");
        assert_eq!((tip.x, tip.y), (50.0, 10.0));
        assert_eq!(tip.feature, FeatureRef::Point(1));
        assert!(tip.changed);
        let again = painter.locate(&Pointer::new(50.0, 10.0), &pad).expect("hit");
        assert!(!again.changed);
    }

    #[test]
    fn test_draw_queue_is_sequential() {
        let mut queue = DrawQueue::new(2);
        assert_eq!(queue.start_next(), Some(0));
        assert_eq!(queue.start_next(), None);
        assert!(matches!(queue.complete(1), Err(Error::QueueOrder { expected: Some(0), got: 1 })));
        queue.complete(0).expect("in order");
        assert_eq!(queue.start_next(), Some(1));
        queue.complete(1).expect("in order");
        assert!(queue.is_done());
        assert_eq!(queue.start_next(), None);
        assert!(matches!(queue.complete(1), Err(Error::QueueOrder { expected: None, got: 1 })));
    }
}
