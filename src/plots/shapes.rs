//! Shape stream painter.
//!
//! A [`PaintingObject`] is a flat coordinate buffer read by an operation
//! list. Each operation consumes a fixed number of values, or two per point
//! for the length-prefixed ones:
//!
//! | operation | values |
//! |---|---|
//! | `rect`, `box` | `x1 y1 x2 y2` |
//! | `line`, `linendc` | `x1 y1 x2 y2` |
//! | `polyline[ndc]`, `fillarea[ndc]`, `polymarker` | `x y` per point |
//! | `text`, `textndc` | `x y size` |
//! | `ellipse` | `x y r1 r2 phimin phimax theta` |
//! | `arrow` | `x1 y1 x2 y2 size angle` |
//!
//! Operations ending in `ndc` take pad fractions instead of axis values.
//! `Attr` operations switch the attributes used by everything after them.

use super::{Frame, FrameRequest, Paintable, RenderContext};
use crate::bins::FrameRange;
use crate::color::Rgba;
use crate::config::RenderConfig;
use crate::data::DataPoint;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::hit::{Pointer, Tooltip};
use crate::objects::{PaintOp, PaintingObject};
use crate::render::{DrawCommand, PathWriter, RenderList, TextAnchor};
use crate::scale::{Axis, ScaleProvider};
use crate::style::{Attributes, PathStyle, StyleResolver};

/// Painter of a [`PaintingObject`].
#[derive(Debug)]
pub struct ShapesPainter {
    painting: PaintingObject,
}

/// Reads consecutive values from the shape buffer.
struct BufferCursor<'a> {
    buffer: &'a [f64],
    pos: usize,
}

impl<'a> BufferCursor<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [f64]> {
        let values = self.buffer.get(self.pos..self.pos + n)?;
        self.pos += n;
        Some(values)
    }
}

/// Converts buffer values to pad pixels.
struct PadMapper<'a> {
    frame: &'a dyn ScaleProvider,
    ndc: bool,
}

impl PadMapper<'_> {
    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(self.frame.axis_to_pad(Axis::X, x, self.ndc), self.frame.axis_to_pad(Axis::Y, y, self.ndc))
    }
}

/// Styles derived from the active attributes.
struct ShapeStyles<'a> {
    attrs: Attributes,
    resolver: &'a dyn StyleResolver,
}

impl ShapeStyles<'_> {
    fn line(&self) -> PathStyle {
        PathStyle::stroked(self.resolver.stroke(&self.attrs.line))
    }

    fn fill(&self) -> PathStyle {
        PathStyle::filled(self.resolver.fill(&self.attrs.fill))
    }

    fn both(&self) -> PathStyle {
        PathStyle { stroke: self.line().stroke, fill: self.fill().fill }
    }
}

impl ShapesPainter {
    /// Painter of a shape stream.
    #[must_use]
    pub fn new(painting: PaintingObject) -> Self {
        Self { painting }
    }

    /// Painted shape stream.
    #[must_use]
    pub fn painting(&self) -> &PaintingObject {
        &self.painting
    }
}

fn ellipse_path(center: Point, rx: f64, ry: f64, phimin: f64, phimax: f64, theta: f64) -> String {
    let mut w = PathWriter::new(0);
    if phimin == 0.0 && phimax == 360.0 && theta == 0.0 {
        w.move_to(center.x + rx, center.y)
            .arc_to((rx, ry), 0.0, false, true, Point::new(center.x - rx, center.y))
            .arc_to((rx, ry), 0.0, false, true, Point::new(center.x + rx, center.y))
            .close();
        return w.finish();
    }
    let (st, ct) = theta.to_radians().sin_cos();
    let rotate = |phi: f64| {
        let (dx, dy) = (rx * phi.to_radians().cos(), ry * phi.to_radians().sin());
        center.offset((dx * ct - dy * st).round(), (-dx * st - dy * ct).round())
    };
    let (p1, p2) = (rotate(phimin), rotate(phimax));
    w.move_to(center.x, center.y)
        .line_to(p1.x, p1.y)
        .arc_to((rx.round(), ry.round()), (-theta).round(), true, false, p2)
        .close();
    w.finish()
}

/// Arrow head with its tip at `tip`, pointing along `(ux, uy)`.
fn append_head(w: &mut PathWriter, tip: Point, (ux, uy): (f64, f64), wsize: f64, hsize: f64, closed: bool) {
    let back = tip.offset(-ux * wsize, -uy * wsize);
    let (b1, b2) = (back.offset(-uy * hsize, ux * hsize), back.offset(uy * hsize, -ux * hsize));
    w.move_to(b1.x, b1.y).line_to(tip.x, tip.y).line_to(b2.x, b2.y);
    if closed {
        w.close();
    }
}

/// Shaft and heads of an arrow. `option` places heads like `"<|-|>"`:
/// `<` or `<|` at the start, `>` or `|>` at the end, `->-`, `-|>-`, `-<-` or
/// `-<|-` at the middle; `|` closes a head.
fn arrow_paths(from: Point, to: Point, wsize: f64, hsize: f64, option: &str) -> (String, String, String) {
    let mut shaft = PathWriter::new(0);
    shaft.move_to(from.x, from.y).line_to(to.x, to.y);

    let len = from.distance(to);
    let mut open = PathWriter::new(0);
    let mut closed = PathWriter::new(0);
    if len > 0.0 {
        let dir = ((to.x - from.x) / len, (to.y - from.y) / len);
        let rev = (-dir.0, -dir.1);
        let mut head = |tip: Point, d: (f64, f64), is_closed: bool| {
            let w = if is_closed { &mut closed } else { &mut open };
            append_head(w, tip, d, wsize, hsize, is_closed);
        };
        if option.starts_with('<') {
            head(from, rev, option.starts_with("<|"));
        }
        let mid = from.lerp(to, 0.5).offset(dir.0 * wsize * 0.5, dir.1 * wsize * 0.5);
        if option.contains("->-") {
            head(mid, dir, false);
        } else if option.contains("-|>-") {
            head(mid, dir, true);
        } else if option.contains("-<-") {
            head(from.lerp(to, 0.5).offset(-dir.0 * wsize * 0.5, -dir.1 * wsize * 0.5), rev, false);
        } else if option.contains("-<|-") {
            head(from.lerp(to, 0.5).offset(-dir.0 * wsize * 0.5, -dir.1 * wsize * 0.5), rev, true);
        }
        if option.ends_with('>') {
            head(to, dir, option.ends_with("|>"));
        }
    }
    (shaft.finish(), open.finish(), closed.finish())
}

impl Paintable for ShapesPainter {
    fn name(&self) -> &str {
        "painting"
    }

    fn derive_bins(&self, _frame: Option<&Frame<'_>>, _config: &RenderConfig) -> Vec<DataPoint> {
        Vec::new()
    }

    /// Without a frame, axis values are pad fractions.
    fn frame_request(&self, _config: &RenderConfig) -> Result<FrameRequest> {
        Ok(FrameRequest::Cartesian(FrameRange::UNIT))
    }

    #[allow(clippy::too_many_lines)]
    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<RenderList> {
        let frame = ctx.frame.cartesian()?;
        let (pad_w, pad_h) = frame.pad_size();
        let mut list = RenderList::new();
        let mut cursor = BufferCursor { buffer: &self.painting.buffer, pos: 0 };
        let mut styles = ShapeStyles { attrs: Attributes::default(), resolver: ctx.styles };

        for op in &self.painting.ops {
            let (name, count, text) = match op {
                PaintOp::Attr(attrs) => {
                    styles.attrs = *attrs;
                    continue;
                }
                PaintOp::Shape { name, count, text } => (name.as_str(), *count, text.as_str()),
            };
            let map = PadMapper { frame, ndc: name.ends_with("ndc") };
            let needed = match name {
                "rect" | "box" | "line" | "linendc" => 4,
                "polyline" | "polylinendc" | "fillarea" | "fillareandc" | "polymarker" => 2 * count,
                "text" | "textndc" => 3,
                "ellipse" => 7,
                "arrow" => 6,
                other => {
                    log::warn!("unsupported shape operation '{other}'");
                    continue;
                }
            };
            let Some(v) = cursor.take(needed) else {
                log::warn!("shape buffer exhausted at operation '{name}'");
                break;
            };

            match name {
                "rect" | "box" => {
                    let (p1, p2) = (map.point(v[0], v[1]), map.point(v[2], v[3]));
                    let style = if name == "box" { styles.fill() } else { styles.line() };
                    if !style.is_invisible() {
                        list.push(DrawCommand::Rect { rect: Rect::from_corners(p1, p2), style });
                    }
                }
                "line" | "linendc" => {
                    let (p1, p2) = (map.point(v[0], v[1]), map.point(v[2], v[3]));
                    let mut w = PathWriter::new(0);
                    w.move_to(p1.x, p1.y).line_to(p2.x, p2.y);
                    list.push_path(w.finish(), styles.line());
                }
                "polyline" | "polylinendc" | "fillarea" | "fillareandc" => {
                    let mut w = PathWriter::new(0);
                    for (n, xy) in v.chunks_exact(2).enumerate() {
                        let p = map.point(xy[0], xy[1]);
                        if n == 0 {
                            w.move_to(p.x, p.y);
                        } else {
                            w.line_to(p.x, p.y);
                        }
                    }
                    if name.starts_with("fillarea") {
                        w.close();
                        list.push_path(w.finish(), styles.fill());
                    } else {
                        list.push_path(w.finish(), styles.line());
                    }
                }
                "polymarker" => {
                    let marker = ctx.styles.marker(&styles.attrs.marker);
                    let points = v.chunks_exact(2).map(|xy| map.point(xy[0], xy[1]));
                    list.push_path(marker.generator.path(points), marker.style);
                }
                "text" | "textndc" => {
                    let size = if v[2] > 1.0 { v[2] } else { (v[2] * pad_h).round() };
                    list.push(DrawCommand::Text {
                        position: map.point(v[0], v[1]),
                        text: text.to_string(),
                        color: ctx.styles.color(styles.attrs.line.color).unwrap_or(Rgba::BLACK),
                        size,
                        anchor: TextAnchor::Start,
                    });
                }
                "ellipse" => {
                    let center = map.point(v[0], v[1]);
                    let rx = map.point(v[0] + v[2], v[1]).x - center.x;
                    let ry = center.y - map.point(v[0], v[1] + v[3]).y;
                    list.push_path(ellipse_path(center, rx, ry, v[4], v[5], v[6]), styles.both());
                }
                "arrow" => {
                    let (p1, p2) = (map.point(v[0], v[1]), map.point(v[2], v[3]));
                    let wsize = (pad_w.max(pad_h) * v[4]).round().max(3.0);
                    let hsize = (wsize * (v[5] / 2.0).to_radians().tan()).round();
                    let (shaft, open, closed) = arrow_paths(p1, p2, wsize, hsize, text);
                    list.push_path(shaft, styles.line());
                    list.push_path(open, styles.line());
                    list.push_path(closed, styles.both());
                }
                _ => {}
            }
        }

        if cursor.pos < cursor.buffer.len() {
            log::debug!("{} shape buffer values left unused", cursor.buffer.len() - cursor.pos);
        }
        Ok(list)
    }

    fn hit_test(&self, _pointer: &Pointer, _ctx: &RenderContext<'_>) -> Option<Tooltip> {
        None
    }

    fn clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRef;
    use crate::scale::FrameScale;
    use crate::style::FillAttributes;

    fn unit_pad() -> FrameScale {
        FrameScale::builder(100.0, 100.0).build().expect("frame")
    }

    fn render(painting: PaintingObject) -> RenderList {
        let frame = unit_pad();
        let config = RenderConfig::default();
        let ctx = RenderContext::new(Frame::Cartesian(&frame), &config);
        ShapesPainter::new(painting).render(&ctx).expect("render")
    }

    fn filled() -> Attributes {
        Attributes { fill: FillAttributes::solid(ColorRef::Index(3)), ..Attributes::default() }
    }

    #[test]
    fn test_rect_outline_and_box_fill() {
        let list = render(PaintingObject {
            ops: vec![PaintOp::op("rect"), PaintOp::op("box"), PaintOp::Attr(filled()), PaintOp::op("box")],
            buffer: vec![0.1, 0.1, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.5, 0.5],
        });
        // the first box is hollow and skipped
        assert_eq!(list.len(), 2);
        match &list.commands()[0] {
            DrawCommand::Rect { rect, style } => {
                assert_eq!(*rect, Rect::new(10.0, 50.0, 40.0, 40.0));
                assert!(style.fill.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
        match &list.commands()[1] {
            DrawCommand::Rect { style, .. } => assert!(style.stroke.is_none() && style.fill.is_some()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_polyline_and_fillarea() {
        let list = render(PaintingObject {
            ops: vec![PaintOp::poly("polyline", 3), PaintOp::Attr(filled()), PaintOp::poly("fillareandc", 3)],
            buffer: vec![0.0, 0.0, 0.5, 1.0, 1.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 0.0],
        });
        assert_eq!(list.paths().collect::<Vec<_>>(), vec!["M 0,100 L 50,0 L 100,100", "M 0,100 L 50,0 L 100,100 Z"]);
    }

    #[test]
    fn test_text_size_from_pad() {
        let list = render(PaintingObject { ops: vec![PaintOp::text("textndc", "hello")], buffer: vec![0.5, 0.5, 0.05] });
        match &list.commands()[0] {
            DrawCommand::Text { position, text, size, .. } => {
                assert_eq!(*position, Point::new(50.0, 50.0));
                assert_eq!(text, "hello");
                assert_eq!(*size, 5.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_op_skipped_and_short_buffer_stops() {
        let list = render(PaintingObject {
            ops: vec![PaintOp::op("frobnicate"), PaintOp::op("linendc"), PaintOp::op("line")],
            buffer: vec![0.0, 0.0, 1.0, 1.0, 0.5],
        });
        assert_eq!(list.paths().collect::<Vec<_>>(), vec!["M 0,100 L 100,0"]);
    }

    #[test]
    fn test_full_ellipse_and_wedge() {
        let list = render(PaintingObject {
            ops: vec![PaintOp::Attr(filled()), PaintOp::op("ellipse"), PaintOp::op("ellipse")],
            buffer: vec![0.5, 0.5, 0.2, 0.1, 0.0, 360.0, 0.0, 0.5, 0.5, 0.2, 0.2, 0.0, 90.0, 0.0],
        });
        let paths: Vec<&str> = list.paths().collect();
        assert_eq!(paths[0], "M 70,50 A 20,10,0,0,1,30,50 A 20,10,0,0,1,70,50 Z");
        assert_eq!(paths[1], "M 50,50 L 70,50 A 20,20,0,1,0,50,30 Z");
    }

    #[test]
    fn test_arrow_heads() {
        let list = render(PaintingObject {
            ops: vec![PaintOp::text("arrow", "|>")],
            buffer: vec![0.0, 0.5, 1.0, 0.5, 0.05, 90.0],
        });
        let paths: Vec<&str> = list.paths().collect();
        assert_eq!(paths[0], "M 0,50 L 100,50");
        // head 5 px long and 5 px wide on each side, closed
        assert_eq!(paths[1], "M 95,55 L 100,50 L 95,45 Z");
    }
}
