//! Full pipeline runs into an SVG surface.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use plotpaint::objects::Knot;
use plotpaint::prelude::*;

fn draw(painter: &mut PlotPainter, pad: &Pad<'_>, surface: &mut SvgSurface) {
    if let DrawStep::FramePending(request) = painter.draw(None, pad, surface).expect("draw") {
        let frame = pad.frame_for(&request).expect("frame");
        painter.frame_ready(frame, pad, surface).expect("frame ready");
    }
    assert_eq!(painter.state(), PipelineState::Ready);
}

#[test]
fn test_pad_with_function_graph_and_spline() {
    let config = RenderConfig::default();
    let pad = Pad::new(400.0, 300.0, &config);
    let mut surface = SvgSurface::new(400, 300);

    let func = FunctionObject::new("parabola", -1.0, 1.0, |x| x * x);
    let mut first = PlotPainter::new(Plot::from_object(PlotObject::Function(func), ""), GroupId(0));
    draw(&mut first, &pad, &mut surface);
    let frame = first.frame().cloned().expect("frame");

    let graph = GraphObject::new(vec![-0.5, 0.0, 0.5], vec![0.25, 0.0, 0.25]).expect("graph");
    let mut overlay = PlotPainter::new(Plot::from_object(PlotObject::Graph(graph), "P"), GroupId(1));
    overlay.draw(Some(frame.clone()), &pad, &mut surface).expect("overlay");

    let knots = vec![Knot { x: -1.0, y: 1.0, b: -2.0, c: 1.0, ..Knot::default() }, Knot { x: 1.0, y: 1.0, ..Knot::default() }];
    let spline = SplineObject::new("spl", knots);
    let mut third = PlotPainter::new(Plot::from_object(PlotObject::Spline(spline), "SAME"), GroupId(2));
    third.draw(Some(frame), &pad, &mut surface).expect("spline on frame");

    let svg = surface.render();
    assert_eq!(surface.group_ids().collect::<Vec<_>>(), vec![GroupId(0), GroupId(1), GroupId(2)]);
    assert!(svg.contains(r#"<g id="group0" transform="translate(40,30)">"#));
    for id in [GroupId(0), GroupId(1), GroupId(2)] {
        assert!(surface.group(id).expect("group").paths().count() > 0);
    }
    assert!(svg.matches("<path").count() >= 3);

    first.dispose(&mut surface);
    assert!(!surface.render().contains("group0"));
}

#[test]
fn test_spline_same_without_frame_is_rejected() {
    let config = RenderConfig::default();
    let pad = Pad::new(400.0, 300.0, &config);
    let mut surface = SvgSurface::new(400, 300);
    let spline = SplineObject::new("spl", vec![Knot::default(), Knot { x: 1.0, ..Knot::default() }]);
    let mut painter = PlotPainter::new(Plot::from_object(PlotObject::Spline(spline), "SAME"), GroupId(0));

    assert!(matches!(painter.draw(None, &pad, &mut surface), Err(Error::Precondition(_))));
    assert_eq!(painter.state(), PipelineState::Uninitialized);
    assert_eq!(surface.group_ids().count(), 0);
}

#[test]
fn test_polar_graph_on_polargram() {
    let config = RenderConfig::default();
    let pad = Pad::new(400.0, 200.0, &config);
    let mut surface = SvgSurface::new(400, 200);

    let graph = PolarGraphObject::new(vec![0.0, std::f64::consts::FRAC_PI_2], vec![1.0, 2.0]).expect("graph");
    let painter = PolarGraphPainter::new(graph, "LP");
    let grid = PolargramPainter::new(painter.polargram());
    let mut grid = PlotPainter::new(Plot::Polargram(grid), GroupId(0));
    draw(&mut grid, &pad, &mut surface);
    let frame = grid.frame().cloned().expect("polar frame");
    assert!(matches!(frame, PadFrame::Polar(_)));

    let mut graph = PlotPainter::new(Plot::PolarGraph(painter), GroupId(1));
    graph.draw(Some(frame), &pad, &mut surface).expect("polar graph");

    let center = Pointer::new(200.0, 100.0);
    assert!(grid.locate(&center, &pad).is_none());
    assert_eq!(surface.group_ids().count(), 2);
}

#[test]
fn test_shape_stream_on_own_frame() {
    let config = RenderConfig::default();
    let pad = Pad::new(100.0, 100.0, &config);
    let mut surface = SvgSurface::new(100, 100);
    let painting = PaintingObject { ops: vec![PaintOp::op("linendc")], buffer: vec![0.0, 0.0, 1.0, 1.0] };
    let mut painter = PlotPainter::new(Plot::from_object(PlotObject::Painting(painting), ""), GroupId(5));
    draw(&mut painter, &pad, &mut surface);

    let list = surface.group(GroupId(5)).expect("group");
    assert_eq!(list.paths().collect::<Vec<_>>(), vec!["M 0,100 L 100,0"]);
    assert_eq!(list.origin(), Point::ORIGIN);
}

#[test]
fn test_multigraph_locate_picks_nearest_child() {
    let config = RenderConfig::default();
    let pad = Pad::new(200.0, 200.0, &config);
    let mut surface = SvgSurface::new(200, 200);
    let low = GraphObject::new(vec![0.0, 1.0], vec![0.0, 0.0]).expect("graph").named("low");
    let high = GraphObject::new(vec![0.0, 1.0], vec![1.0, 1.0]).expect("graph").named("high");
    let mg = MultiGraphObject { graphs: vec![(low, "P".to_string()), (high, "P".to_string())], ..Default::default() };
    let mut painter = MultiGraphPainter::new(mg, "", GroupId(0));

    let frame = pad.frame_for(&painter.frame_request(&pad)).expect("frame");
    painter.draw(Some(frame.clone()), &pad, &mut surface).expect("draw");

    let PadFrame::Cartesian(scale) = &frame else { panic!("cartesian frame expected") };
    let origin = scale.frame_origin();
    let target = Pointer::new(origin.x + scale.grx(1.0), origin.y + scale.gry(1.0));
    let tip = painter.locate(&target, &pad).expect("hit");
    assert_eq!(tip.lines[0], "high");
}
