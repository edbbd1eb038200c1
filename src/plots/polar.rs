//! Polar painters: the polargram grid and graphs drawn on it.
//!
//! Geometry is emitted in pad coordinates; the [`PolarScale`] of the frame
//! supplies the centre and the ring half-sizes.

use super::{Frame, FrameRequest, Paintable, RenderContext};
use crate::bins::polar_radius_range;
use crate::color::Rgba;
use crate::config::RenderConfig;
use crate::data::{DataPoint, RenderedPoint};
use crate::error::Result;
use crate::geometry::Point;
use crate::hit::{format_value, locate, Pointer, RenderKind, Tolerance, Tooltip};
use crate::objects::{PolarGraphObject, Polargram};
use crate::options::{ObjectKind, OptionDecoder, RenderOptions};
use crate::polar::{major_spokes, minor_rings, minor_spokes, radial_ticks, PolarScale};
use crate::render::{DrawCommand, PathBuilder, PathKind, PathWriter, RenderList, TextAnchor};
use crate::style::{LineAttributes, PathStyle};

/// Full ellipse around `center` as two half arcs.
fn append_ellipse(w: &mut PathWriter, center: Point, rx: f64, ry: f64) {
    w.move_to(center.x + rx, center.y)
        .arc_to((rx, ry), 0.0, false, true, Point::new(center.x - rx, center.y))
        .arc_to((rx, ry), 0.0, false, true, Point::new(center.x + rx, center.y))
        .close();
}

// ============================================================================
// Polargram
// ============================================================================

/// Painter of the polar grid. It is the main painter of a polar frame.
#[derive(Debug)]
pub struct PolargramPainter {
    polargram: Polargram,
}

impl PolargramPainter {
    /// Painter of a grid.
    #[must_use]
    pub fn new(polargram: Polargram) -> Self {
        Self { polargram }
    }

    /// Painted grid.
    #[must_use]
    pub fn polargram(&self) -> &Polargram {
        &self.polargram
    }

    /// Scale of the frame this grid spans in a pad.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDimensions`] for a non-positive pad size.
    pub fn scale(&self, width: f64, height: f64, margin: f64) -> Result<PolarScale> {
        let g = &self.polargram;
        PolarScale::new(width, height, margin, g.rmin, g.rmax, g.axis_angle)
    }
}

impl Paintable for PolargramPainter {
    fn name(&self) -> &str {
        "polargram"
    }

    fn derive_bins(&self, _frame: Option<&Frame<'_>>, _config: &RenderConfig) -> Vec<DataPoint> {
        Vec::new()
    }

    fn frame_request(&self, _config: &RenderConfig) -> Result<FrameRequest> {
        Ok(FrameRequest::Polar(self.polargram.clone()))
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        let scale = ctx.frame.polar()?;
        let g = &self.polargram;
        let center = scale.center();
        let (szx, szy) = scale.half_sizes();
        let (_, rmax) = scale.radius_range();

        let line = ctx.styles.stroke(&g.line);
        let grid = ctx.styles.stroke(&LineAttributes { style: 2, width: 1.0, ..g.line });
        let text_color = ctx.styles.color(g.line.color).unwrap_or(Rgba::BLACK);
        let mut list = RenderList::new();

        // Radial rings with labels.
        let ticks = radial_ticks(g.rmin, g.rmax);
        let mut rings = PathWriter::new(0);
        let radial_size = (g.radial_text_size * szy * 2.0).round();
        let mut labels = Vec::new();
        for (value, label) in ticks.values.iter().zip(&ticks.labels) {
            let rx = scale.r(*value);
            append_ellipse(&mut rings, center, rx.round(), (rx / szx * szy).round());
            if let Some(text) = label {
                labels.push(DrawCommand::Text {
                    position: center.offset(rx.round(), (g.radial_text_size * szy * 0.5).round()),
                    text: text.clone(),
                    color: text_color,
                    size: radial_size,
                    anchor: TextAnchor::Middle,
                });
            }
        }
        list.push_path(rings.finish(), PathStyle::stroked(line));

        let mut minor = PathWriter::new(0);
        for r in minor_rings(&ticks, rmax, g.ndiv_rad) {
            let rx = scale.r(r);
            append_ellipse(&mut minor, center, rx.round(), (rx / szx * szy).round());
        }
        list.push_path(minor.finish(), PathStyle::stroked(grid));
        for label in labels {
            list.push(label);
        }

        // Angular spokes with labels.
        let polar_size = (g.polar_text_size * szy * 2.0).round();
        let mut spokes = PathWriter::new(0);
        for spoke in major_spokes(g.ndiv_pol, g.axis_angle) {
            let (cos, sin) = (spoke.angle.cos(), spoke.angle.sin());
            let end = center.offset((szx * cos).round(), (szy * sin).round());
            spokes.move_to(center.x, center.y).line_to(end.x, end.y);
            list.push(DrawCommand::Text {
                position: center.offset(
                    ((szx + polar_size) * cos).round(),
                    ((szy + polar_size / szx * szy) * sin).round(),
                ),
                text: spoke.label.to_string(),
                color: text_color,
                size: polar_size,
                anchor: spoke.anchor,
            });
        }
        list.push_path(spokes.finish(), PathStyle::stroked(line));

        let mut minor = PathWriter::new(0);
        for angle in minor_spokes(g.ndiv_pol, g.axis_angle) {
            let end = center.offset((szx * angle.cos()).round(), (szy * angle.sin()).round());
            minor.move_to(center.x, center.y).line_to(end.x, end.y);
        }
        list.push_path(minor.finish(), PathStyle::stroked(grid));

        Ok(list)
    }

    fn hit_test(&self, _pointer: &Pointer, _ctx: &RenderContext<'_>) -> Option<Tooltip> {
        None
    }

    fn clear(&mut self) {}
}

// ============================================================================
// Polar graph
// ============================================================================

/// Painter of a [`PolarGraphObject`] over a polargram.
#[derive(Debug)]
pub struct PolarGraphPainter {
    graph: PolarGraphObject,
    options: RenderOptions,
    rendered: Vec<RenderedPoint>,
    draw_kind: RenderKind,
    marker_size: f64,
}

impl PolarGraphPainter {
    /// Painter with decoded draw options; an empty option draws a line.
    #[must_use]
    pub fn new(graph: PolarGraphObject, opt: &str) -> Self {
        Self {
            graph,
            options: OptionDecoder::decode(opt, ObjectKind::PolarGraph),
            rendered: Vec::new(),
            draw_kind: RenderKind::None,
            marker_size: 0.0,
        }
    }

    /// Painted graph.
    #[must_use]
    pub fn graph(&self) -> &PolarGraphObject {
        &self.graph
    }

    /// Grid to create when the graph is drawn without a polar frame: the
    /// graph's own, or one spanning its radii.
    #[must_use]
    pub fn polargram(&self) -> Polargram {
        self.graph.polargram.clone().unwrap_or_else(|| {
            let (rmin, rmax) = polar_radius_range(&self.graph);
            Polargram::new(rmin, rmax)
        })
    }

    fn error_path(&self, scale: &PolarScale) -> String {
        let g = &self.graph;
        let mut w = PathWriter::new(0);
        for i in 0..g.len() {
            let (a, r) = (g.angle[i], g.radius[i]);
            let (ea, er) = (g.angle_error[i], g.radius_error[i]);
            if er != 0.0 {
                let (p1, p2) = (scale.to_pad(a, r - er), scale.to_pad(a, r + er));
                w.move_to(p1.x, p1.y).line_to(p2.x, p2.y);
            }
            if ea != 0.0 {
                let p1 = scale.to_pad(a + ea, r);
                let p2 = scale.translate(a - ea, r, false);
                let end = scale.center().offset(p2.x, p2.y);
                w.move_to(p1.x, p1.y).arc_to((p2.rx, p2.ry), 0.0, false, true, end);
            }
        }
        w.finish()
    }
}

impl Paintable for PolarGraphPainter {
    fn name(&self) -> &str {
        &self.graph.name
    }

    /// Points with the angle as x and the radius as y.
    fn derive_bins(&self, _frame: Option<&Frame<'_>>, _config: &RenderConfig) -> Vec<DataPoint> {
        let g = &self.graph;
        (0..g.len())
            .map(|i| {
                let (ea, er) = (g.angle_error[i], g.radius_error[i]);
                DataPoint::new(i, g.angle[i], g.radius[i]).with_errors(ea, ea, er, er)
            })
            .collect()
    }

    fn frame_request(&self, _config: &RenderConfig) -> Result<FrameRequest> {
        Ok(FrameRequest::Polar(self.polargram()))
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        let scale = ctx.frame.polar()?;
        let opts = &self.options;
        let attrs = &self.graph.attributes;
        let stroke = ctx.styles.stroke(&attrs.line);
        let pts: Vec<Point> = self.graph.angle.iter().zip(&self.graph.radius).map(|(a, r)| scale.to_pad(*a, *r)).collect();

        let mut list = RenderList::new();
        let mut kind = RenderKind::None;
        let line_path = if opts.line || opts.fill { PathBuilder::new(PathKind::Line).build(&pts).path } else { String::new() };

        if opts.fill && !line_path.is_empty() {
            list.push_path(format!("{line_path} Z"), PathStyle::filled(ctx.styles.fill(&attrs.fill)));
            kind = RenderKind::Path;
        }
        if opts.line && !line_path.is_empty() {
            list.push_path(line_path, PathStyle::stroked(stroke));
            kind = RenderKind::Path;
        }
        if opts.curve && !pts.is_empty() {
            list.push_path(PathBuilder::new(PathKind::Bezier).build(&pts).path, PathStyle::stroked(stroke));
            kind = RenderKind::Path;
        }
        if opts.errors {
            list.push_path(self.error_path(scale), PathStyle::stroked(stroke));
        }

        self.marker_size = 0.0;
        if opts.mark.is_on() {
            let marker = ctx.styles.marker(&attrs.marker);
            self.marker_size = marker.generator.full_size();
            list.push_path(marker.generator.path(pts.iter().copied()), marker.style);
            if kind == RenderKind::None {
                kind = RenderKind::Mark;
            }
        }

        self.rendered = pts.iter().enumerate().map(|(i, p)| RenderedPoint::new(i, p.x, p.y)).collect();
        self.draw_kind = kind;
        Ok(list)
    }

    fn hit_test(&self, pointer: &Pointer, ctx: &RenderContext<'_>) -> Option<Tooltip> {
        let mut tol = Tolerance::new(self.graph.attributes.line.width, ctx.config.path_snap_distance_sq);
        if self.marker_size > 0.0 {
            tol = tol.with_markers(self.marker_size);
        }
        let hit = locate(pointer, &self.rendered, self.draw_kind, &tol)?;
        let i = self.rendered[hit.index].source;
        let digits = ctx.config.stat_digits;

        let mut lines = Vec::with_capacity(3);
        if !self.graph.name.is_empty() {
            lines.push(self.graph.name.clone());
        }
        lines.push(format!("angle = {}", format_value(self.graph.angle[i], digits)));
        lines.push(format!("radius = {}", format_value(self.graph.radius[i], digits)));
        Some(Tooltip::from_hit(&hit, lines))
    }

    fn clear(&mut self) {
        self.rendered = Vec::new();
        self.draw_kind = RenderKind::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRef;
    use crate::hit::FeatureRef;
    use crate::scale::FrameScale;
    use crate::style::FillAttributes;
    use std::f64::consts::PI;

    fn scale() -> PolarScale {
        PolarScale::new(400.0, 200.0, 0.1, 0.0, 10.0, 0.0).expect("polar frame")
    }

    fn two_points() -> PolarGraphObject {
        PolarGraphObject::new(vec![0.0, PI / 2.0], vec![10.0, 5.0]).expect("equal lengths")
    }

    #[test]
    fn test_grid_rings_spokes_and_labels() {
        let scale = scale();
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Polar(&scale), &config);
        let mut painter = PolargramPainter::new(Polargram::new(0.0, 10.0));
        let list = painter.render(&ctx).expect("render");

        let paths: Vec<&str> = list.paths().collect();
        assert_eq!(paths.len(), 4);
        assert!(paths[0].contains("M 360,100 A 160,80,0,0,1,40,100 A 160,80,0,0,1,360,100 Z"));
        assert!(paths[2].starts_with("M 200,100 L 360,100 M 200,100"));

        let ticks = radial_ticks(0.0, 10.0);
        let texts = list.commands().iter().filter(|c| matches!(c, DrawCommand::Text { .. })).count();
        assert_eq!(texts, ticks.labels.iter().flatten().count() + 8);
    }

    #[test]
    fn test_grid_needs_polar_frame() {
        let frame = FrameScale::builder(100.0, 100.0).build().expect("frame");
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Cartesian(&frame), &config);
        assert!(PolargramPainter::new(Polargram::new(0.0, 1.0)).render(&ctx).is_err());
        assert!(PolarGraphPainter::new(two_points(), "").render(&ctx).is_err());
    }

    #[test]
    fn test_graph_line_in_pad_pixels() {
        let scale = scale();
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Polar(&scale), &config);
        let mut painter = PolarGraphPainter::new(two_points(), "");
        let list = painter.render(&ctx).expect("render");
        assert_eq!(list.paths().collect::<Vec<_>>(), vec!["M 360,100 L 200,60"]);

        let tip = painter.hit_test(&Pointer::new(358.0, 101.0), &ctx).expect("near first point");
        assert_eq!(tip.feature, FeatureRef::Point(0));
        assert_eq!(tip.lines, vec!["Graph", "angle = 0", "radius = 10"]);
    }

    #[test]
    fn test_graph_errors_and_fill() {
        let scale = scale();
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Polar(&scale), &config);
        let mut graph = two_points().with_errors(vec![0.0, 0.0], vec![1.0, 0.0]).expect("lengths");
        graph.attributes.fill = FillAttributes::solid(ColorRef::Index(5));
        let mut painter = PolarGraphPainter::new(graph, "FE");
        let list = painter.render(&ctx).expect("render");
        let paths: Vec<&str> = list.paths().collect();
        assert_eq!(paths, vec!["M 360,100 L 200,60 Z", "M 344,100 L 376,100"]);
    }

    #[test]
    fn test_polargram_from_radii() {
        let graph = two_points().with_errors(vec![0.0, 0.0], vec![1.0, 0.0]).expect("lengths");
        let painter = PolarGraphPainter::new(graph, "");
        let config = RenderConfig::default();
        match painter.frame_request(&config).expect("request") {
            FrameRequest::Polar(p) => {
                approx::assert_relative_eq!(p.rmin, 4.4, epsilon = 1e-9);
                approx::assert_relative_eq!(p.rmax, 11.6, epsilon = 1e-9);
            }
            FrameRequest::Cartesian(_) => panic!("expected polar frame"),
        }
    }
}
