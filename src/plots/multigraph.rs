//! Multi-graph container.
//!
//! Children are graphs followed by their attached functions, then the
//! container's own functions. They are drawn strictly in order, so palette
//! slots and z-order follow the child list.

use super::{FrameRequest, FunctionPainter, GraphPainter, Plot};
use crate::bins::multigraph_range;
use crate::color::ColorRef;
use crate::error::{Error, Result};
use crate::hit::{Pointer, Tooltip};
use crate::objects::{GraphObject, MultiGraphObject};
use crate::options::{ObjectKind, OptionDecoder, RenderOptions};
use crate::pipeline::{DrawQueue, DrawStep, Pad, PadFrame, PlotPainter};
use crate::render::{DrawingSurface, GroupId};

/// Painter of a [`MultiGraphObject`].
#[derive(Debug)]
pub struct MultiGraphPainter {
    multigraph: MultiGraphObject,
    options: RenderOptions,
    first_group: GroupId,
    children: Vec<PlotPainter>,
    pending: Option<FrameRequest>,
}

impl MultiGraphPainter {
    /// Container painter; child `i` draws into group `first_group + i`.
    #[must_use]
    pub fn new(multigraph: MultiGraphObject, opt: &str, first_group: GroupId) -> Self {
        Self {
            multigraph,
            options: OptionDecoder::decode(opt, ObjectKind::MultiGraph),
            first_group,
            children: Vec::new(),
            pending: None,
        }
    }

    /// Decoded container options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Child painters in draw order.
    #[must_use]
    pub fn children(&self) -> &[PlotPainter] {
        &self.children
    }

    /// Frame covering every child graph, ranged for the pad's log axes.
    #[must_use]
    pub fn frame_request(&self, pad: &Pad<'_>) -> FrameRequest {
        FrameRequest::Cartesian(multigraph_range(&self.multigraph, pad.logx, pad.logy, pad.config.multigraph_padding))
    }

    fn graph_options<'a>(&'a self, own: &'a str) -> &'a str {
        if own.trim().is_empty() {
            &self.options.child_options
        } else {
            own
        }
    }

    fn build_children(&self, pad: &Pad<'_>) -> Vec<PlotPainter> {
        let graphs = &self.multigraph.graphs;
        let slots = graphs.len() + 1;
        let palette = pad.palette.filter(|_| self.options.auto_colors.any());
        let mut plots = Vec::new();

        for (i, (graph, opt)) in graphs.iter().enumerate() {
            let mut graph: GraphObject = graph.clone();
            if let Some(palette) = palette {
                let color = ColorRef::Rgba(palette.calc_color(i, slots));
                let auto = self.options.auto_colors;
                let attrs = &mut graph.attributes;
                if auto.line {
                    attrs.line.color = color;
                }
                if auto.fill {
                    attrs.fill.color = color;
                }
                if auto.marker {
                    attrs.marker.color = color;
                }
            }
            let functions = std::mem::take(&mut graph.functions);
            plots.push((Plot::Graph(GraphPainter::new(graph, self.graph_options(opt))), i));
            for f in functions {
                plots.push((Plot::Function(FunctionPainter::new(f.function, &f.options)), i));
            }
        }
        for f in &self.multigraph.functions {
            plots.push((Plot::Function(FunctionPainter::new(f.function.clone(), &f.options)), graphs.len()));
        }

        plots
            .into_iter()
            .enumerate()
            .map(|(n, (plot, slot))| {
                PlotPainter::new(plot, GroupId(self.first_group.0 + n as u64)).at_position(slot, slots)
            })
            .collect()
    }

    /// Draw all children. Without a frame, the covering frame is requested
    /// first; call [`Self::frame_ready`] once it exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueOrder`] if the child queue is driven out of order.
    /// Child failures are logged and skipped so siblings still draw.
    pub fn draw(&mut self, frame: Option<PadFrame>, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<DrawStep> {
        match frame {
            Some(frame) => {
                self.draw_children(&frame, pad, surface)?;
                Ok(DrawStep::Drawn)
            }
            None => {
                let request = self.frame_request(pad);
                self.pending = Some(request.clone());
                Ok(DrawStep::FramePending(request))
            }
        }
    }

    /// The requested frame has been drawn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] when no frame was requested.
    pub fn frame_ready(&mut self, frame: PadFrame, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        if self.pending.take().is_none() {
            return Err(Error::Precondition(format!("{} did not request a frame", self.multigraph.title)));
        }
        self.draw_children(&frame, pad, surface)
    }

    fn draw_children(&mut self, frame: &PadFrame, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        for child in &mut self.children {
            child.dispose(surface);
        }
        self.children = self.build_children(pad);

        let mut queue = DrawQueue::new(self.children.len());
        while let Some(i) = queue.start_next() {
            let child = &mut self.children[i];
            if let Err(e) = child.draw(Some(frame.clone()), pad, surface) {
                log::warn!("{}: skipping child {i}: {e}", self.multigraph.title);
            }
            queue.complete(i)?;
        }
        Ok(())
    }

    /// Redraw every child in order, optionally on a new frame.
    ///
    /// # Errors
    ///
    /// Returns the first child error once all children were tried; a failing
    /// child keeps its previous geometry and siblings still redraw.
    pub fn redraw(&mut self, frame: Option<&PadFrame>, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        let mut first_error = None;
        for (i, child) in self.children.iter_mut().enumerate() {
            if let Err(e) = child.redraw(frame.cloned(), pad, surface) {
                log::warn!("{}: child {i} not redrawn: {e}", self.multigraph.title);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Nearest tooltip among the children.
    pub fn locate(&mut self, pointer: &Pointer, pad: &Pad<'_>) -> Option<Tooltip> {
        self.children
            .iter_mut()
            .filter_map(|c| c.locate(pointer, pad))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Release every child.
    pub fn dispose(&mut self, surface: &mut dyn DrawingSurface) {
        for child in &mut self.children {
            child.dispose(surface);
        }
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{GradientPalette, Palette, Rgba};
    use crate::config::RenderConfig;
    use crate::polar::PolarScale;
    use approx::assert_relative_eq;
    use crate::objects::{AttachedFunction, FunctionObject};
    use crate::output::SvgSurface;
    use crate::pipeline::PipelineState;
    use crate::render::DrawCommand;

    fn two_graphs() -> MultiGraphObject {
        let a = GraphObject::new(vec![0.0, 1.0], vec![0.0, 1.0]).expect("graph");
        let b = GraphObject::new(vec![0.0, 1.0], vec![1.0, 0.0]).expect("graph");
        MultiGraphObject { title: "mg".to_string(), graphs: vec![(a, String::new()), (b, "P".to_string())], ..Default::default() }
    }

    fn stroke_color(surface: &SvgSurface, group: u64) -> Option<Rgba> {
        surface.group(GroupId(group))?.commands().iter().find_map(|c| match c {
            DrawCommand::Path { style, .. } => style.stroke.map(|s| s.color),
            _ => None,
        })
    }

    #[test]
    fn test_children_drawn_in_order_with_palette_slots() {
        let config = RenderConfig::default();
        let palette = GradientPalette::new(vec![Rgba::RED, Rgba::BLUE]).expect("palette");
        let pad = Pad::new(200.0, 200.0, &config).palette(&palette);
        let mut surface = SvgSurface::new(200, 200);
        let mut painter = MultiGraphPainter::new(two_graphs(), "PLC L", GroupId(10));

        let request = match painter.draw(None, &pad, &mut surface).expect("draw") {
            DrawStep::FramePending(r) => r,
            DrawStep::Drawn => panic!("expected a frame request"),
        };
        painter.frame_ready(pad.frame_for(&request).expect("frame"), &pad, &mut surface).expect("ready");

        assert_eq!(surface.group_ids().collect::<Vec<_>>(), vec![GroupId(10), GroupId(11)]);
        assert!(painter.children().iter().all(|c| c.state() == PipelineState::Ready));
        assert_eq!(stroke_color(&surface, 10), Some(palette.calc_color(0, 3)));
    }

    #[test]
    fn test_child_options_inherited_when_empty() {
        let config = RenderConfig::default();
        let pad = Pad::new(200.0, 200.0, &config);
        let mut surface = SvgSurface::new(200, 200);
        let mut painter = MultiGraphPainter::new(two_graphs(), "A L", GroupId(0));
        let frame = pad.frame_for(&painter.frame_request(&pad)).expect("frame");
        painter.draw(Some(frame), &pad, &mut surface).expect("draw");

        assert!(painter.options().draw_axis);
        match painter.children()[0].plot() {
            Plot::Graph(g) => assert!(g.options().line),
            other => panic!("unexpected child {other:?}"),
        }
        match painter.children()[1].plot() {
            Plot::Graph(g) => assert!(!g.options().line && g.options().mark.is_on()),
            other => panic!("unexpected child {other:?}"),
        }
    }

    #[test]
    fn test_functions_drawn_after_graphs() {
        let config = RenderConfig::default();
        let pad = Pad::new(200.0, 200.0, &config);
        let mut surface = SvgSurface::new(200, 200);
        let mut mg = two_graphs();
        mg.functions.push(AttachedFunction { function: FunctionObject::new("f", 0.0, 1.0, |x| x * 0.5), options: String::new() });
        let mut painter = MultiGraphPainter::new(mg, "", GroupId(0));
        let frame = pad.frame_for(&painter.frame_request(&pad)).expect("frame");
        painter.draw(Some(frame), &pad, &mut surface).expect("draw");

        assert_eq!(painter.children().len(), 3);
        assert!(matches!(painter.children()[2].plot(), Plot::Function(_)));
        assert_eq!(surface.group_ids().last(), Some(GroupId(2)));

        painter.dispose(&mut surface);
        assert_eq!(surface.group_ids().count(), 0);
    }

    #[test]
    fn test_frame_ready_without_request() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let mut painter = MultiGraphPainter::new(two_graphs(), "", GroupId(0));
        let frame = pad.frame_for(&painter.frame_request(&pad)).expect("frame");
        assert!(matches!(painter.frame_ready(frame, &pad, &mut surface), Err(Error::Precondition(_))));
    }

    #[test]
    fn test_log_pad_ranges_zero_values() {
        let config = RenderConfig::default();
        let g = GraphObject::new(vec![1.0, 2.0], vec![0.0, 10.0]).expect("graph");
        let mg = MultiGraphObject { graphs: vec![(g, "P".to_string())], ..Default::default() };
        let painter = MultiGraphPainter::new(mg, "", GroupId(0));

        let linear = Pad::new(200.0, 200.0, &config);
        let FrameRequest::Cartesian(range) = painter.frame_request(&linear) else { panic!("cartesian request expected") };
        assert_eq!(range.ymin, 0.0);

        // y = 0 is lifted to 0.001 * ymax, then three decades of headroom
        let log = Pad::new(200.0, 200.0, &config).log_axes(false, true);
        let request = painter.frame_request(&log);
        let FrameRequest::Cartesian(range) = &request else { panic!("cartesian request expected") };
        assert_relative_eq!(range.ymin, 0.01 / 2.5, epsilon = 1e-12);
        assert_relative_eq!(range.ymax, 16.0, epsilon = 1e-12);

        let PadFrame::Cartesian(scale) = log.frame_for(&request).expect("frame") else { panic!("cartesian frame expected") };
        assert!(scale.y_axis().is_log());
        assert!(!scale.x_axis().is_log());
    }

    #[test]
    fn test_redraw_failure_keeps_every_child() {
        let config = RenderConfig::default();
        let pad = Pad::new(200.0, 200.0, &config);
        let mut surface = SvgSurface::new(200, 200);
        let mut painter = MultiGraphPainter::new(two_graphs(), "L", GroupId(0));
        let frame = pad.frame_for(&painter.frame_request(&pad)).expect("frame");
        painter.draw(Some(frame.clone()), &pad, &mut surface).expect("draw");
        let before: Vec<_> = surface.group_ids().filter_map(|id| surface.group(id).cloned()).collect();

        let polar = PadFrame::Polar(PolarScale::new(200.0, 200.0, 0.1, 0.0, 1.0, 0.0).expect("polar"));
        assert!(matches!(painter.redraw(Some(&polar), &pad, &mut surface), Err(Error::Precondition(_))));
        assert!(painter.children().iter().all(|c| c.state() == PipelineState::Ready && c.frame() == Some(&frame)));
        let after: Vec<_> = surface.group_ids().filter_map(|id| surface.group(id).cloned()).collect();
        assert_eq!(before, after);

        painter.redraw(None, &pad, &mut surface).expect("redraw on kept frame");
    }
}
