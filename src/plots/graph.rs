//! Graph painter: lines, bands, bars, error whiskers and markers over a
//! point list.
//!
//! Draw order follows the layering of the option set: error band, line or
//! area (with an optional exclusion zone), per-point nodes (bars, error
//! rectangles, whiskers), then markers. The last layer that produced
//! per-point geometry decides how the series is hit-tested.

use super::{Frame, FrameRequest, Paintable, RenderContext};
use crate::bins::{decimate, efficiency_points, graph_extent, graph_points, graph_range};
use crate::config::RenderConfig;
use crate::data::{DataPoint, RenderedPoint};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::hit::{format_value, locate, point_lines, FeatureRef, Pointer, RenderKind, Tolerance, Tooltip};
use crate::objects::{EfficiencyObject, ErrorArrays, GraphErrors, GraphObject};
use crate::options::{BandMode, BarMode, GraphTraits, MarkerMode, ObjectKind, OptionDecoder, RectMode, RenderOptions};
use crate::render::{join_paths, DrawCommand, ErrorCaps, ErrorSide, PathBuilder, PathKind, PathWriter, RenderList};
use crate::scale::{Axis, ScaleProvider};
use crate::style::PathStyle;

/// Painter of a [`GraphObject`].
#[derive(Debug)]
pub struct GraphPainter {
    graph: GraphObject,
    options: RenderOptions,
    bins: Vec<DataPoint>,
    rendered: Vec<RenderedPoint>,
    draw_kind: RenderKind,
    marker_size: f64,
}

/// Pixel geometry of one node, relative to its rounded position.
#[derive(Debug, Clone, Copy, Default)]
struct Node {
    source: usize,
    grx1: f64,
    gry1: f64,
    grx0: f64,
    grx2: f64,
    gry0: f64,
    gry2: f64,
    grdx0: f64,
    grdx2: f64,
    grdy0: f64,
    grdy2: f64,
    width: f64,
    error: bool,
    rect: bool,
    bar: bool,
}

fn traits_of(graph: &GraphObject) -> GraphTraits {
    GraphTraits {
        has_errors: graph.errors().is_some(),
        negligible_errors: graph.errors().is_negligible(),
        marker_style: graph.attributes.marker.style,
    }
}

impl GraphPainter {
    /// Painter with decoded draw options.
    #[must_use]
    pub fn new(graph: GraphObject, opt: &str) -> Self {
        let options = OptionDecoder::decode(opt, ObjectKind::Graph(traits_of(&graph)));
        Self::with_options(graph, options)
    }

    /// Painter of an efficiency, drawn as a graph with asymmetric errors.
    ///
    /// # Errors
    ///
    /// Propagates construction errors of the converted graph.
    pub fn from_efficiency(eff: &EfficiencyObject, opt: &str) -> Result<Self> {
        let traits = GraphTraits { has_errors: true, negligible_errors: false, marker_style: eff.attributes.marker.style };
        let options = OptionDecoder::decode(opt, ObjectKind::Efficiency(traits));
        let points = efficiency_points(eff, options.zero_bins);

        let mut errors = ErrorArrays::default();
        for p in &points {
            errors.exlow.push(p.exlow);
            errors.exhigh.push(p.exhigh);
            errors.eylow.push(p.eylow);
            errors.eyhigh.push(p.eyhigh);
        }
        let graph = GraphObject::new(points.iter().map(|p| p.x).collect(), points.iter().map(|p| p.y).collect())?
            .with_errors(GraphErrors::Asymmetric(errors))?
            .named(eff.name.clone())
            .attributes(eff.attributes);
        Ok(Self::with_options(graph, options))
    }

    fn with_options(graph: GraphObject, options: RenderOptions) -> Self {
        let bins = graph_points(&graph);
        Self { graph, options, bins, rendered: Vec::new(), draw_kind: RenderKind::None, marker_size: 0.0 }
    }

    /// Replace the painted graph, keeping the draw options.
    pub fn update(&mut self, graph: GraphObject) {
        self.bins = graph_points(&graph);
        self.graph = graph;
    }

    /// Painted graph.
    #[must_use]
    pub fn graph(&self) -> &GraphObject {
        &self.graph
    }

    /// Decoded draw options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// How the last rendering is hit-tested.
    #[must_use]
    pub fn draw_kind(&self) -> RenderKind {
        self.draw_kind
    }

    /// Series of the last rendering.
    #[must_use]
    pub fn rendered(&self) -> &[RenderedPoint] {
        &self.rendered
    }

    fn path_points(&self, frame: &dyn ScaleProvider) -> Vec<RenderedPoint> {
        self.bins.iter().enumerate().map(|(i, b)| RenderedPoint::new(i, frame.grx(b.x), frame.gry(b.y))).collect()
    }

    fn nodes(&self, frame: &dyn ScaleProvider, config: &RenderConfig) -> Vec<Node> {
        let (w, h) = (frame.width(), frame.height());
        let opts = &self.options;
        let has_errors = self.graph.errors().is_some();
        let indexed: Vec<(usize, &DataPoint)> = self.bins.iter().enumerate().collect();

        let kept = decimate(&indexed, config.line_point_limit, config.optimize_draw, |(_, p), _| {
            if opts.bar != BarMode::None {
                return false;
            }
            let grx = frame.grx(p.x);
            if !(0.0..=w).contains(&grx) {
                return true;
            }
            let gry = frame.gry(p.y);
            !opts.out_range && !(0.0..=h).contains(&gry)
        });

        kept.into_iter()
            .map(|(i, p)| {
                let (grx, gry) = (frame.grx(p.x), frame.gry(p.y));
                let mut n = Node { source: i, grx1: grx.round(), gry1: gry.round(), ..Node::default() };
                if has_errors {
                    n.grx0 = (frame.grx(p.x - p.exlow) - grx).round();
                    n.grx2 = (frame.grx(p.x + p.exhigh) - grx).round();
                    n.gry0 = (frame.gry(p.y - p.eylow) - gry).round();
                    n.gry2 = (frame.gry(p.y + p.eyhigh) - gry).round();
                    if let Some(b) = p.bend {
                        n.grdx0 = (frame.gry(p.y + b.exlow) - gry).round();
                        n.grdx2 = (frame.gry(p.y + b.exhigh) - gry).round();
                        n.grdy0 = (frame.grx(p.x + b.eylow) - grx).round();
                        n.grdy2 = (frame.grx(p.x + b.eyhigh) - grx).round();
                    }
                }
                n
            })
            .collect()
    }
}

/// Bar widths from neighbour spacing.
fn bar_widths(nodes: &mut [Node], frame_width: f64) {
    let len = nodes.len();
    for i in 1..len.saturating_sub(1) {
        nodes[i].width = ((nodes[i + 1].grx1 - nodes[i - 1].grx1) / 2.0 - 2.0).max(2.0);
    }
    match len {
        0 => {}
        1 => nodes[0].width = frame_width / 4.0,
        2 => {
            let w = (nodes[1].grx1 - nodes[0].grx1) / 2.0;
            nodes[0].width = w;
            nodes[1].width = w;
        }
        _ => {
            nodes[0].width = nodes[1].width;
            nodes[len - 1].width = nodes[len - 2].width;
        }
    }
}

impl Paintable for GraphPainter {
    fn name(&self) -> &str {
        &self.graph.name
    }

    fn derive_bins(&self, _frame: Option<&Frame<'_>>, _config: &RenderConfig) -> Vec<DataPoint> {
        graph_points(&self.graph)
    }

    fn frame_request(&self, config: &RenderConfig) -> Result<FrameRequest> {
        let ext = graph_extent(&self.graph, &self.bins);
        Ok(FrameRequest::Cartesian(graph_range(ext, self.graph.minimum, self.graph.maximum, config.frame_padding)))
    }

    #[allow(clippy::too_many_lines)]
    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        let frame = ctx.frame.cartesian()?;
        let config = ctx.config;
        let (w, h) = (frame.width(), frame.height());
        let opts = self.options.clone();
        let attrs = ctx.auto_colored(&self.graph.attributes, opts.auto_colors);
        let stroke = ctx.styles.stroke(&attrs.line);
        let fill = ctx.styles.fill(&attrs.fill);

        let mut list = RenderList::at(frame.frame_origin());
        let mut kind = RenderKind::None;
        let mut band: Option<Vec<(f64, f64)>> = None;
        let mut line = opts.line;
        let mut fill_on = opts.fill || self.graph.cut;
        let mut excl = 0.0;
        if attrs.line.has_exclusion() {
            excl = attrs.line.excl_width * f64::from(attrs.line.excl_side);
            if attrs.line.width > 0.0 {
                line = true;
            }
        }

        if opts.band != BandMode::None {
            let pts = decimate(&self.bins, config.line_point_limit, config.optimize_draw, |_, _| false);
            let path_kind = if opts.band == BandMode::Smooth { PathKind::Bezier } else { PathKind::Line };
            let lower: Vec<Point> = pts.iter().map(|b| Point::new(frame.grx(b.x), frame.gry(b.y - b.eylow))).collect();
            let upper: Vec<Point> =
                pts.iter().rev().map(|b| Point::new(frame.grx(b.x), frame.gry(b.y + b.eyhigh))).collect();
            let path1 = PathBuilder::new(path_kind).build(&lower).path;
            let path2 = PathBuilder::new(path_kind).continued(true).build(&upper).path;
            list.push_path(join_paths(&[&path1, &path2, "Z"]), PathStyle::filled(fill));
            band = Some(self.bins.iter().map(|b| (frame.gry(b.y - b.eylow), frame.gry(b.y + b.eyhigh))).collect());
            kind = RenderKind::Lines;
        }

        if line || fill_on || excl != 0.0 {
            if fill_on {
                excl = 0.0;
            }
            let pts = decimate(&self.bins, config.line_point_limit, config.optimize_draw, |_, _| false);
            let px: Vec<Point> = pts.iter().map(|b| Point::new(frame.grx(b.x), frame.gry(b.y))).collect();
            let path_kind = if opts.curve {
                PathKind::Bezier
            } else if excl != 0.0 {
                PathKind::LineCalc
            } else {
                PathKind::Line
            };
            let built = PathBuilder::new(path_kind).build(&px);

            if excl != 0.0 {
                let shifted: Vec<Point> = px
                    .iter()
                    .zip(&built.tangents)
                    .rev()
                    .map(|(p, t)| {
                        let dlen = t.x.hypot(t.y);
                        if dlen > 0.0 {
                            Point::new(p.x + excl * t.y / dlen, p.y - excl * t.x / dlen)
                        } else {
                            *p
                        }
                    })
                    .collect();
                let back_kind = if opts.curve { PathKind::Bezier } else { PathKind::Line };
                let path2 = PathBuilder::new(back_kind).continued(true).build(&shifted).path;
                list.push_path(
                    join_paths(&[&built.path, &path2, "Z"]),
                    PathStyle::filled(fill.map(|c| c.with_opacity(0.75))),
                );
            }

            if line || fill_on {
                let d = if fill_on { join_paths(&[&built.path, "Z"]) } else { built.path };
                let style = PathStyle { stroke: if line { stroke } else { None }, fill: if fill_on { fill } else { None } };
                list.push_path(d, style);
            }
            kind = RenderKind::Lines;
        }

        let mut nodes: Option<Vec<Node>> = None;
        if opts.errors || opts.rect != RectMode::None || opts.bar != BarMode::None {
            nodes = Some(self.nodes(frame, config));
            kind = RenderKind::Nodes;
        }

        if let (Some(nodes), true) = (nodes.as_mut(), opts.bar != BarMode::None) {
            bar_widths(nodes, w);
            let yy0 = frame.gry(0.0).round();
            let style = PathStyle::filled(fill);
            for n in nodes.iter_mut() {
                n.bar = true;
                let (y, height) = if opts.bar == BarMode::Zero {
                    (if n.gry1 > yy0 { yy0 - n.gry1 } else { 0.0 }, (yy0 - n.gry1).abs())
                } else {
                    (0.0, if h > n.gry1 { h - n.gry1 } else { 0.0 })
                };
                if !style.is_invisible() {
                    let rect = Rect::new(n.grx1 + (-n.width / 2.0).round(), n.gry1 + y, n.width.round(), height);
                    list.push(DrawCommand::Rect { rect, style });
                }
            }
        }

        if let (Some(nodes), true) = (nodes.as_mut(), opts.rect != RectMode::None) {
            let outline = if opts.rect == RectMode::Outlined { stroke } else { None };
            let style = PathStyle { stroke: outline, fill };
            for n in nodes.iter_mut() {
                let p = &self.bins[n.source];
                if p.exlow > 0.0 && p.exhigh > 0.0 && p.eylow > 0.0 && p.eyhigh > 0.0 {
                    n.rect = true;
                    if !style.is_invisible() {
                        let rect = Rect::new(n.grx1 + n.grx0, n.gry1 + n.gry2, n.grx2 - n.grx0, n.gry0 - n.gry2);
                        list.push(DrawCommand::Rect { rect, style });
                    }
                }
            }
        }

        let mut error_size = 0.0;
        if let (Some(nodes), true) = (nodes.as_mut(), opts.errors) {
            let caps = ErrorCaps::new(opts.ends, opts.main_error, attrs.line.width, config.end_error_size, attrs.marker.size);
            error_size = caps.error_size();
            let mut wr = PathWriter::new(0);
            for n in nodes.iter_mut() {
                let p = &self.bins[n.source];
                if !(p.exlow > 0.0 || p.exhigh > 0.0 || p.eylow > 0.0 || p.eyhigh > 0.0) {
                    continue;
                }
                n.error = true;
                let center = Point::new(n.grx1, n.gry1);
                if p.exlow > 0.0 {
                    caps.append(&mut wr, center, center.offset(n.grx0, n.grdx0), ErrorSide::Left);
                }
                if p.exhigh > 0.0 {
                    caps.append(&mut wr, center, center.offset(n.grx2, n.grdx2), ErrorSide::Right);
                }
                if p.eylow > 0.0 {
                    caps.append(&mut wr, center, center.offset(n.grdy0, n.gry0), ErrorSide::Bottom);
                }
                if p.eyhigh > 0.0 {
                    caps.append(&mut wr, center, center.offset(n.grdy2, n.gry2), ErrorSide::Top);
                }
            }
            list.push_path(wr.finish(), PathStyle::stroked(stroke));
        }

        self.marker_size = 0.0;
        if opts.mark.is_on() {
            let mut marker = attrs.marker;
            if let MarkerMode::Style(style) = opts.mark {
                marker.style = style;
            }
            let resolved = ctx.styles.marker(&marker);
            let size = resolved.generator.full_size();
            self.marker_size = size;
            let visible = decimate(&self.bins, config.marker_point_limit, config.optimize_draw, |p, _| {
                let (grx, gry) = (frame.grx(p.x), frame.gry(p.y));
                !(grx > -size && grx < w + size && gry > -size && gry < h + size)
            });
            let path = resolved.generator.path(visible.iter().map(|p| Point::new(frame.grx(p.x), frame.gry(p.y))));
            if !path.is_empty() {
                list.push_path(path, resolved.style);
                if kind == RenderKind::None {
                    kind = if opts.mark == MarkerMode::Style(1) { RenderKind::Path } else { RenderKind::Mark };
                }
            }
        }

        self.rendered = match (&nodes, kind) {
            (Some(nodes), RenderKind::Nodes) => {
                let msize = if self.marker_size > 0.0 { (self.marker_size / 2.0 + 1.5).round() } else { 0.0 };
                let yy0 = frame.gry(0.0);
                nodes
                    .iter()
                    .map(|n| {
                        let mut rp = RenderedPoint::new(n.source, n.grx1, n.gry1);
                        rp.width = n.width;
                        if n.error || n.rect {
                            let x1 = (-error_size).min(n.grx0).min(-msize);
                            let x2 = error_size.max(n.grx2).max(msize);
                            let y1 = (-error_size).min(n.gry2).min(-msize);
                            let y2 = error_size.max(n.gry0).max(msize);
                            rp.hit_box = Rect::new(x1, y1, x2 - x1, y2 - y1);
                        } else if n.bar {
                            let (y1, y2) = if opts.bar == BarMode::Zero {
                                if n.gry1 > yy0 { (yy0 - n.gry1, 0.0) } else { (0.0, yy0 - n.gry1) }
                            } else {
                                (0.0, h - n.gry1)
                            };
                            rp.hit_box = Rect::new(-n.width / 2.0, y1, n.width, y2 - y1);
                        }
                        rp
                    })
                    .collect()
            }
            (_, RenderKind::None) => Vec::new(),
            _ => {
                let mut pts = self.path_points(frame);
                if let Some(band) = &band {
                    for (rp, b) in pts.iter_mut().zip(band) {
                        rp.band = Some(*b);
                    }
                }
                pts
            }
        };
        self.draw_kind = kind;
        Ok(list)
    }

    fn hit_test(&self, pointer: &Pointer, ctx: &RenderContext<'_>) -> Option<Tooltip> {
        let mut tol = Tolerance::new(self.graph.attributes.line.width, ctx.config.path_snap_distance_sq);
        if self.marker_size > 0.0 {
            tol = tol.with_markers(self.marker_size);
        }
        let hit = locate(pointer, &self.rendered, self.draw_kind, &tol)?;
        let digits = ctx.config.stat_digits;

        let lines = match hit.feature {
            FeatureRef::Segment(_) => {
                let frame = ctx.frame.cartesian().ok()?;
                let mut lines = Vec::with_capacity(3);
                if !self.graph.name.is_empty() {
                    lines.push(self.graph.name.clone());
                }
                lines.push(format!("x = {}", format_value(frame.revert_x(hit.position.x), digits)));
                lines.push(format!("y = {}", format_value(frame.revert_y(hit.position.y), digits)));
                lines
            }
            _ => point_lines(&self.graph.name, self.bins.get(self.rendered[hit.index].source)?, digits),
        };
        Some(Tooltip::from_hit(&hit, lines))
    }

    fn can_zoom_in(&self, axis: Axis, min: f64, max: f64) -> bool {
        axis == Axis::X && self.graph.x().iter().any(|&x| min < x && x < max)
    }

    fn clear(&mut self) {
        self.rendered = Vec::new();
        self.draw_kind = RenderKind::None;
        self.marker_size = 0.0;
    }
}
