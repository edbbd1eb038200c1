//! Function painter: a smoothed curve through sampled values.

use super::{Frame, FrameRequest, Paintable, RenderContext};
use crate::bins::{function_can_zoom, function_range, sample_function, visible_window};
use crate::config::RenderConfig;
use crate::data::{DataPoint, RenderedPoint};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::hit::{format_value, FeatureRef, Pointer, Tooltip};
use crate::objects::FunctionObject;
use crate::options::{ObjectKind, OptionDecoder, RenderOptions};
use crate::render::{join_paths, PathBuilder, PathKind, RenderList};
use crate::scale::Axis;
use crate::style::PathStyle;

/// Painter of a [`FunctionObject`].
#[derive(Debug)]
pub struct FunctionPainter {
    function: FunctionObject,
    options: RenderOptions,
    bins: Vec<DataPoint>,
    rendered: Vec<RenderedPoint>,
}

impl FunctionPainter {
    /// Painter with decoded draw options.
    #[must_use]
    pub fn new(function: FunctionObject, opt: &str) -> Self {
        Self { function, options: OptionDecoder::decode(opt, ObjectKind::Function), bins: Vec::new(), rendered: Vec::new() }
    }

    /// Replace the painted function; the next render resamples it.
    pub fn update(&mut self, function: FunctionObject) {
        self.function = function;
    }

    /// Painted function.
    #[must_use]
    pub fn function(&self) -> &FunctionObject {
        &self.function
    }

    /// Series of the last rendering.
    #[must_use]
    pub fn bins(&self) -> &[DataPoint] {
        &self.bins
    }
}

impl Paintable for FunctionPainter {
    fn name(&self) -> &str {
        &self.function.name
    }

    fn derive_bins(&self, frame: Option<&Frame<'_>>, config: &RenderConfig) -> Vec<DataPoint> {
        let (window, logx) = match frame.and_then(|f| f.cartesian().ok()) {
            Some(s) => (Some(visible_window(s)), s.logx()),
            None => (None, false),
        };
        sample_function(&self.function, window, logx, !self.options.no_saved, config.min_function_samples)
    }

    fn frame_request(&self, config: &RenderConfig) -> Result<FrameRequest> {
        if self.options.same {
            return Err(Error::Precondition(format!("function {} drawn with SAME needs a frame", self.function.name)));
        }
        Ok(FrameRequest::Cartesian(function_range(&self.derive_bins(None, config), config.function_headroom)))
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        let frame = ctx.frame.cartesian()?;
        let bins = self.derive_bins(Some(&ctx.frame), ctx.config);
        let mut rendered: Vec<RenderedPoint> =
            bins.iter().enumerate().map(|(i, b)| RenderedPoint::new(i, frame.grx(b.x), frame.gry(b.y))).collect();

        let mut list = RenderList::at(frame.frame_origin());
        if rendered.len() > 2 {
            let h = frame.height();
            let mut h0 = h;
            if frame.y_range().0 >= 0.0 {
                let zero = frame.gry(0.0).round();
                if (0.0..=h).contains(&zero) {
                    h0 = zero;
                }
            }

            let pts: Vec<Point> = rendered.iter().map(RenderedPoint::position).collect();
            let built = PathBuilder::new(PathKind::Bezier).digits(2).baseline(h0).build(&pts);
            for (rp, t) in rendered.iter_mut().zip(&built.tangents) {
                rp.tangent = *t;
            }

            let attrs = &self.function.attributes;
            list.push_path(built.path.clone(), PathStyle::stroked(ctx.styles.stroke(&attrs.line)));
            list.push_path(join_paths(&[&built.path, &built.close]), PathStyle::filled(ctx.styles.fill(&attrs.fill)));
        }

        self.bins = bins;
        self.rendered = rendered;
        Ok(list)
    }

    fn hit_test(&self, pointer: &Pointer, ctx: &RenderContext<'_>) -> Option<Tooltip> {
        let (first, last) = (self.rendered.first()?, self.rendered.last()?);
        if pointer.x < first.grx || pointer.x > last.grx {
            return None;
        }

        let mut best = 0;
        let mut min = f64::INFINITY;
        for (n, rp) in self.rendered.iter().enumerate() {
            let dist = (rp.grx - pointer.x).abs();
            if dist < min {
                min = dist;
                best = n;
            }
        }
        let rp = &self.rendered[best];
        let bin = self.bins.get(rp.source)?;

        let radius = self.function.attributes.line.width + 3.0;
        let (dx, dy) = (rp.grx - pointer.x, rp.gry - pointer.y);

        let digits = ctx.config.stat_digits;
        let mut lines = Vec::with_capacity(2);
        if !self.function.name.is_empty() {
            lines.push(self.function.name.clone());
        }
        lines.push(format!("x = {} y = {}", format_value(bin.x, digits), format_value(bin.y, digits)));

        Some(Tooltip {
            x: rp.grx,
            y: rp.gry,
            exact: dx.abs() < radius && dy.abs() < radius,
            changed: true,
            lines,
            distance: dx.hypot(dy),
            feature: FeatureRef::Point(best),
            rect: None,
        })
    }

    fn can_zoom_in(&self, axis: Axis, min: f64, max: f64) -> bool {
        axis == Axis::X && function_can_zoom(&self.function, min, max)
    }

    fn clear(&mut self) {
        self.bins = Vec::new();
        self.rendered = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorRef, Rgba};
    use crate::objects::SavedSamples;
    use crate::scale::FrameScale;
    use crate::style::FillAttributes;

    fn linear() -> FunctionObject {
        FunctionObject::new("lin", 0.0, 10.0, |x| x).npx(101)
    }

    #[test]
    fn test_render_line_only_without_fill() {
        let frame = FrameScale::builder(100.0, 100.0).x_range(0.0, 10.0).y_range(0.0, 10.0).build().expect("frame");
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Cartesian(&frame), &config);
        let mut painter = FunctionPainter::new(linear(), "");
        let list = painter.render(&ctx).expect("render");
        assert_eq!(list.len(), 1);
        let path = list.paths().next().expect("line path");
        assert!(path.starts_with("M 0,100 C"));
        assert!(path.ends_with("100,0"));
        assert_eq!(painter.bins().len(), 101);
    }

    #[test]
    fn test_render_area_closes_at_zero() {
        let frame = FrameScale::builder(100.0, 100.0).x_range(0.0, 10.0).y_range(0.0, 20.0).build().expect("frame");
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Cartesian(&frame), &config);
        let mut f = linear();
        f.attributes.fill = FillAttributes::solid(ColorRef::Rgba(Rgba::BLUE));
        let mut painter = FunctionPainter::new(f, "");
        let list = painter.render(&ctx).expect("render");
        let area = list.paths().nth(1).expect("area path");
        assert!(area.ends_with("L 100,100 L 0,100 Z"));
    }

    #[test]
    fn test_render_needs_cartesian_frame() {
        let polar = crate::polar::PolarScale::new(100.0, 100.0, 0.1, 0.0, 1.0, 0.0).expect("polar");
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Polar(&polar), &config);
        let mut painter = FunctionPainter::new(linear(), "");
        assert!(matches!(painter.render(&ctx), Err(Error::Precondition(_))));
    }

    #[test]
    fn test_frame_request_headroom() {
        let config = RenderConfig::default();
        let painter = FunctionPainter::new(linear(), "");
        match painter.frame_request(&config).expect("request") {
            FrameRequest::Cartesian(r) => {
                assert_eq!((r.xmin, r.xmax, r.ymin), (0.0, 10.0, 0.0));
                approx::assert_relative_eq!(r.ymax, 10.5, epsilon = 1e-9);
            }
            FrameRequest::Polar(_) => panic!("expected cartesian frame"),
        }
        let same = FunctionPainter::new(linear(), "same");
        assert!(same.frame_request(&config).is_err());
    }

    #[test]
    fn test_tooltip_nearest_sample() {
        let frame = FrameScale::builder(100.0, 100.0).x_range(0.0, 10.0).y_range(0.0, 10.0).build().expect("frame");
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Cartesian(&frame), &config);
        let mut painter = FunctionPainter::new(linear(), "");
        painter.render(&ctx).expect("render");

        let tip = painter.hit_test(&Pointer::new(50.4, 50.0), &ctx).expect("inside range");
        assert_eq!(tip.feature, FeatureRef::Point(50));
        assert!(tip.exact);
        assert_eq!(tip.lines, vec!["lin".to_string(), "x = 5 y = 5".to_string()]);

        let far = painter.hit_test(&Pointer::new(50.0, 10.0), &ctx).expect("inside range");
        assert!(!far.exact);
        assert!(painter.hit_test(&Pointer::new(120.0, 50.0), &ctx).is_none());
    }

    #[test]
    fn test_zoom_capability() {
        let painter = FunctionPainter::new(linear(), "");
        assert!(painter.can_zoom_in(Axis::X, 1.0, 1.001));
        assert!(!painter.can_zoom_in(Axis::Y, 1.0, 2.0));

        let saved = SavedSamples::from_stored(&[0.0, 1.0, 2.0, 0.0, 2.0]).expect("table");
        let painter = FunctionPainter::new(FunctionObject::new("s", 0.0, 2.0, |x| x).npx(2).saved(saved), "");
        assert!(painter.can_zoom_in(Axis::X, 0.0, 1.5));
        assert!(!painter.can_zoom_in(Axis::X, 0.0, 0.5));
    }
}
