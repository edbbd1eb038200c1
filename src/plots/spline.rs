//! Spline painter: sampled polynomial segments with optional knot markers.

use super::{Frame, FrameRequest, Paintable, RenderContext};
use crate::bins::{find_knot, spline_points, spline_range, visible_window};
use crate::config::RenderConfig;
use crate::data::{DataPoint, RenderedPoint};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::hit::{format_value, FeatureRef, Pointer, Tooltip};
use crate::objects::SplineObject;
use crate::options::{ObjectKind, OptionDecoder, RenderOptions};
use crate::render::{PathBuilder, PathKind, RenderList};
use crate::scale::Axis;
use crate::style::PathStyle;

/// Painter of a [`SplineObject`].
#[derive(Debug)]
pub struct SplinePainter {
    spline: SplineObject,
    options: RenderOptions,
    rendered: Vec<RenderedPoint>,
    /// Pixel size of a knot for snapping; the marker size when markers are drawn.
    knot_size: f64,
}

impl SplinePainter {
    /// Painter with decoded draw options.
    #[must_use]
    pub fn new(spline: SplineObject, opt: &str) -> Self {
        Self {
            spline,
            options: OptionDecoder::decode(opt, ObjectKind::Spline),
            rendered: Vec::new(),
            knot_size: 0.0,
        }
    }

    /// Replace the painted spline.
    pub fn update(&mut self, spline: SplineObject) {
        self.spline = spline;
    }

    /// Painted spline.
    #[must_use]
    pub fn spline(&self) -> &SplineObject {
        &self.spline
    }

    /// Curve samples of the last rendering.
    #[must_use]
    pub fn rendered(&self) -> &[RenderedPoint] {
        &self.rendered
    }
}

impl Paintable for SplinePainter {
    fn name(&self) -> &str {
        &self.spline.name
    }

    fn derive_bins(&self, frame: Option<&Frame<'_>>, _config: &RenderConfig) -> Vec<DataPoint> {
        match frame.and_then(|f| f.cartesian().ok()) {
            Some(s) => spline_points(&self.spline, visible_window(s), s.logx()),
            None => spline_points(&self.spline, (self.spline.xmin, self.spline.xmax), false),
        }
    }

    fn frame_request(&self, config: &RenderConfig) -> Result<FrameRequest> {
        if self.options.same {
            return Err(Error::Precondition(format!("spline {} drawn with SAME needs a frame", self.spline.name)));
        }
        Ok(FrameRequest::Cartesian(spline_range(&self.spline, config.function_headroom)))
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        let frame = ctx.frame.cartesian()?;
        let (w, h) = (frame.width(), frame.height());
        let attrs = &self.spline.attributes;
        let mut list = RenderList::at(frame.frame_origin());
        self.knot_size = ctx.config.knot_size;
        self.rendered = Vec::new();

        if self.options.line || self.options.curve {
            let bins = self.derive_bins(Some(&ctx.frame), ctx.config);
            self.rendered =
                bins.iter().enumerate().map(|(i, b)| RenderedPoint::new(i, frame.grx(b.x), frame.gry(b.y))).collect();
            let pts: Vec<Point> = self.rendered.iter().map(RenderedPoint::position).collect();
            let built = PathBuilder::new(PathKind::Bezier).digits(2).build(&pts);
            for (rp, t) in self.rendered.iter_mut().zip(&built.tangents) {
                rp.tangent = *t;
            }
            list.push_path(built.path, PathStyle::stroked(ctx.styles.stroke(&attrs.line)));
        }

        if self.options.mark.is_on() {
            let marker = ctx.styles.marker(&attrs.marker);
            let size = marker.generator.full_size();
            self.knot_size = size;
            let knots = self.spline.knots.iter().map(|k| Point::new(frame.grx(k.x), frame.gry(k.y))).filter(|p| {
                p.x > -size && p.x < w + size && p.y > -size && p.y < h + size
            });
            list.push_path(marker.generator.path(knots), marker.style);
        }

        Ok(list)
    }

    fn hit_test(&self, pointer: &Pointer, ctx: &RenderContext<'_>) -> Option<Tooltip> {
        let frame = ctx.frame.cartesian().ok()?;
        let spline = &self.spline;
        let mut xx = frame.revert_x(pointer.x);
        let mut indx = find_knot(spline, xx);
        let mut knot = spline.knots.get(indx)?;
        let mut yy = knot.eval(xx);

        if let Some(next) = spline.knots.get(indx + 1) {
            if (next.x - xx).abs() < (xx - knot.x).abs() {
                indx += 1;
                knot = next;
            }
        }

        let snapped = (frame.grx(knot.x) - pointer.x).abs() < 0.5 * self.knot_size;
        if snapped {
            xx = knot.x;
            yy = knot.y;
        } else if xx < spline.xmin || xx > spline.xmax {
            return None;
        }

        let radius = spline.attributes.line.width + 3.0;
        let (x, y) = (frame.grx(xx), frame.gry(yy));
        let digits = ctx.config.stat_digits;

        let mut lines = Vec::with_capacity(9);
        if !spline.name.is_empty() {
            lines.push(spline.name.clone());
        }
        lines.push(format!("x = {}", format_value(xx, digits)));
        lines.push(format!("y = {}", format_value(yy, digits)));
        if snapped {
            lines.push(format!("knot = {indx}"));
            lines.push(format!("B = {}", format_value(knot.b, digits)));
            lines.push(format!("C = {}", format_value(knot.c, digits)));
            lines.push(format!("D = {}", format_value(knot.d, digits)));
            if let Some((e, f)) = knot.quintic {
                lines.push(format!("E = {}", format_value(e, digits)));
                lines.push(format!("F = {}", format_value(f, digits)));
            }
        }

        Some(Tooltip {
            x,
            y,
            exact: snapped || (y - pointer.y).abs() < radius,
            changed: true,
            lines,
            distance: (x - pointer.x).hypot(y - pointer.y),
            feature: if snapped { FeatureRef::Knot(indx) } else { FeatureRef::Sample(xx) },
            rect: None,
        })
    }

    fn can_zoom_in(&self, axis: Axis, _min: f64, _max: f64) -> bool {
        axis == Axis::X
    }

    fn clear(&mut self) {
        self.rendered = Vec::new();
    }
}
