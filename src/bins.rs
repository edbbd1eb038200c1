//! Bin derivation: turning plot objects into ordered data-space points.
//!
//! Three sources are supported:
//!
//! - **Sampled functions**: evaluated on an even grid (log-spaced on a log x
//!   axis), or read from a saved sample table kept two steps beyond the
//!   visible window so smoothing has context at the edges.
//! - **Point lists**: graph coordinates with their error extents.
//! - **Splines**: evaluated knot by knot across the visible window.
//!
//! [`decimate`] bounds the size of a series before path synthesis, and the
//! `*_range` functions compute the auto-ranged frame used when a plot is drawn
//! without an existing frame.

use crate::data::{Bend, DataPoint, Extent};
use crate::objects::{
    EfficiencyObject, ErrorArrays, FunctionObject, GraphErrors, GraphObject, MultiGraphObject, PolarGraphObject,
    SplineObject,
};
use crate::scale::ScaleProvider;

// ============================================================================
// Functions
// ============================================================================

/// Sample a function over the visible window.
///
/// `window` is the visible x range of the frame, `None` when sampling for a
/// frame that does not exist yet. A saved table is used unless `use_saved` is
/// false. Non-finite values are dropped.
#[must_use]
pub fn sample_function(
    func: &FunctionObject,
    window: Option<(f64, f64)>,
    logx: bool,
    use_saved: bool,
    min_samples: usize,
) -> Vec<DataPoint> {
    let window = window.filter(|(lo, hi)| lo != hi);

    if use_saved {
        if let Some(saved) = &func.saved {
            let dx = saved.step();
            let points: Vec<DataPoint> = saved
                .values
                .iter()
                .enumerate()
                .filter_map(|(n, &y)| {
                    let x = saved.xmin + dx * n as f64;
                    let outside = window.is_some_and(|(lo, hi)| x + 2.0 * dx < lo || x - 2.0 * dx > hi);
                    (!outside && y.is_finite()).then(|| DataPoint::new(n, x, y))
                })
                .collect();
            return reindex(points);
        }
    }

    let (mut xmin, mut xmax) = (func.xmin, func.xmax);
    if let Some((lo, hi)) = window {
        xmin = xmin.max(lo);
        xmax = xmax.min(hi);
    }

    let logx = logx && xmin > 0.0 && xmax > 0.0;
    if logx {
        xmin = xmin.ln();
        xmax = xmax.ln();
    }

    let np = func.npx.max(min_samples).max(2);
    let dx = (xmax - xmin) / (np - 1) as f64;
    let mut dropped = 0usize;
    let points: Vec<DataPoint> = (0..np)
        .filter_map(|n| {
            let mut x = xmin + n as f64 * dx;
            if logx {
                x = x.exp();
            }
            let y = func.evaluate(x);
            if y.is_finite() {
                Some(DataPoint::new(n, x, y))
            } else {
                dropped += 1;
                None
            }
        })
        .collect();
    if dropped > 0 {
        log::debug!("function {}: dropped {dropped} non-finite samples", func.name);
    }
    reindex(points)
}

fn reindex(mut points: Vec<DataPoint>) -> Vec<DataPoint> {
    for (i, p) in points.iter_mut().enumerate() {
        p.index = i;
    }
    points
}

/// Whether zooming a function into `[min, max]` shows anything new.
///
/// Evaluated functions can always be zoomed; saved tables only down to one
/// saved step.
#[must_use]
pub fn function_can_zoom(func: &FunctionObject, min: f64, max: f64) -> bool {
    match &func.saved {
        Some(saved) => (saved.xmax - saved.xmin).abs() / (func.npx.max(1) as f64) < (min - max).abs(),
        None => true,
    }
}

// ============================================================================
// Graphs
// ============================================================================

/// Copy graph points with their error extents.
///
/// A cut contour with more than three points repeats its first point at the
/// end; that closing point is dropped.
#[must_use]
pub fn graph_points(graph: &GraphObject) -> Vec<DataPoint> {
    let mut n = graph.len();
    if graph.cut && n > 3 {
        n -= 1;
    }
    let (x, y) = (graph.x(), graph.y());
    (0..n)
        .map(|i| {
            let p = DataPoint::new(i, x[i], y[i]);
            match graph.errors() {
                GraphErrors::None => p,
                GraphErrors::Symmetric { ex, ey } => p.with_errors(ex[i], ex[i], ey[i], ey[i]),
                GraphErrors::Asymmetric(e) => with_arrays(p, e, i),
                GraphErrors::Bent { errors, bend } => {
                    let mut p = with_arrays(p, errors, i);
                    p.bend = Some(Bend {
                        exlow: bend.exlow[i],
                        exhigh: bend.exhigh[i],
                        eylow: bend.eylow[i],
                        eyhigh: bend.eyhigh[i],
                    });
                    p
                }
            }
        })
        .collect()
}

fn with_arrays(p: DataPoint, e: &ErrorArrays, i: usize) -> DataPoint {
    p.with_errors(e.exlow[i], e.exhigh[i], e.eylow[i], e.eyhigh[i])
}

/// Extent of graph points, including error extents when the graph has errors.
#[must_use]
pub fn graph_extent(graph: &GraphObject, points: &[DataPoint]) -> Option<Extent> {
    if graph.errors().is_some() {
        Extent::of_errors(points)
    } else {
        Extent::of_points(points)
    }
}

/// Convert an efficiency into graph points with asymmetric errors.
///
/// Bins with no entries are skipped unless `zero_bins` is set. Errors are the
/// normal-approximation confidence bounds clamped to `[0, 1]`.
#[must_use]
pub fn efficiency_points(eff: &EfficiencyObject, zero_bins: bool) -> Vec<DataPoint> {
    let mut points = Vec::with_capacity(eff.total.len());
    for (bin, (&total, &passed)) in eff.total.iter().zip(&eff.passed).enumerate() {
        if total == 0.0 && !zero_bins {
            continue;
        }
        let (lo, hi) = (eff.edges[bin], eff.edges[bin + 1]);
        let center = (lo + hi) / 2.0;
        let value = if total != 0.0 { passed / total } else { 0.0 };
        let (low, up) = normal_interval(total, passed, eff.confidence);
        points.push(
            DataPoint::new(points.len(), center, value).with_errors(center - lo, hi - center, value - low, up - value),
        );
    }
    points
}

/// Lower and upper normal-approximation bounds of `passed / total`.
fn normal_interval(total: f64, passed: f64, level: f64) -> (f64, f64) {
    if total == 0.0 {
        return (0.0, 1.0);
    }
    let alpha = (1.0 - level) / 2.0;
    let average = passed / total;
    let sigma = (average * (1.0 - average) / total).sqrt();
    let delta = sigma * normal_quantile(1.0 - alpha);
    ((average - delta).max(0.0), (average + delta).min(1.0))
}

/// Standard normal quantile (Acklam's rational approximation).
#[must_use]
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const LOW: f64 = 0.024_25;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };
    if p < LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

// ============================================================================
// Decimation
// ============================================================================

/// Bound the size of a series by fixed-stride subsampling.
///
/// Points for which `reject` returns true are removed first, so the stride
/// only reflects visible data. Series of at most `limit` points, and all
/// series when `optimize` is off, are returned after filtering. Otherwise
/// every `max(2, ceil(len / limit))`-th point is kept, starting with the first.
pub fn decimate<T, F>(points: &[T], limit: usize, optimize: bool, mut reject: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, usize) -> bool,
{
    let selected: Vec<T> = points
        .iter()
        .enumerate()
        .filter(|(i, p)| !reject(p, *i))
        .map(|(_, p)| p.clone())
        .collect();

    if !optimize || selected.len() <= limit.max(1) {
        return selected;
    }
    let step = selected.len().div_ceil(limit.max(1)).max(2);
    log::debug!("decimating {} points with stride {step}", selected.len());
    selected.into_iter().step_by(step).collect()
}

// ============================================================================
// Splines
// ============================================================================

/// Index of the knot whose segment covers `x`.
#[must_use]
pub fn find_knot(spline: &SplineObject, x: f64) -> usize {
    let knots = &spline.knots;
    let last = knots.len().saturating_sub(1);
    if knots.is_empty() || x <= spline.xmin {
        return 0;
    }
    if x >= spline.xmax {
        return last;
    }

    match spline.delta {
        Some(delta) if delta > 0.0 => {
            let mut k = (((x - spline.xmin) / delta).round() as usize).min(last);
            if x < knots[k].x {
                k = k.saturating_sub(1);
            } else if k < last && x > knots[k + 1].x {
                k += 1;
            }
            k
        }
        _ => {
            let (mut lo, mut hi) = (0, last);
            while hi - lo > 1 {
                let mid = (lo + hi).div_ceil(2);
                if x > knots[mid].x {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            lo
        }
    }
}

/// Evaluate a spline at `x`, `None` for a spline without knots.
#[must_use]
pub fn eval_spline(spline: &SplineObject, x: f64) -> Option<f64> {
    spline.knots.get(find_knot(spline, x)).map(|k| k.eval(x))
}

/// Sample a spline across the visible part of its domain.
///
/// At least ten samples are taken, evenly spaced (log-spaced on a log axis)
/// from the lower to the upper visible bound.
#[must_use]
pub fn spline_points(spline: &SplineObject, window: (f64, f64), logx: bool) -> Vec<DataPoint> {
    if spline.knots.is_empty() {
        return Vec::new();
    }
    let mut xmin = window.0.max(spline.xmin);
    let mut xmax = window.1.min(spline.xmax);
    let logx = logx && xmin > 0.0 && xmax > 0.0;
    if logx {
        xmin = xmin.ln();
        xmax = xmax.ln();
    }

    let npx = spline.npx.max(10);
    let dx = (xmax - xmin) / (npx - 1) as f64;
    let mut knot = find_knot(spline, if logx { xmin.exp() } else { xmin });
    let last = spline.knots.len() - 1;

    (0..npx)
        .filter_map(|n| {
            let mut x = xmin + dx * n as f64;
            if logx {
                x = x.exp();
            }
            while knot < last && x > spline.knots[knot + 1].x {
                knot += 1;
            }
            let y = spline.knots[knot].eval(x);
            y.is_finite().then(|| DataPoint::new(n, x, y))
        })
        .collect()
}

// ============================================================================
// Auto-ranged frames
// ============================================================================

/// Data range of a frame synthesized for a plot drawn on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRange {
    /// Lower x bound.
    pub xmin: f64,
    /// Upper x bound.
    pub xmax: f64,
    /// Lower y bound.
    pub ymin: f64,
    /// Upper y bound.
    pub ymax: f64,
}

impl FrameRange {
    /// The unit square.
    pub const UNIT: Self = Self { xmin: 0.0, xmax: 1.0, ymin: 0.0, ymax: 1.0 };

    /// Range from bounds.
    #[must_use]
    pub const fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }
}

/// Range over sampled points with multiplicative y headroom.
///
/// `ymax` grows by `headroom` when positive, `ymin` when negative. No points
/// gives the unit square.
#[must_use]
pub fn function_range(points: &[DataPoint], headroom: f64) -> FrameRange {
    let Some(ext) = Extent::of_points(points) else {
        return FrameRange::UNIT;
    };
    let ymax = if ext.ymax > 0.0 { ext.ymax * headroom } else { ext.ymax };
    let ymin = if ext.ymin < 0.0 { ext.ymin * headroom } else { ext.ymin };
    FrameRange::new(ext.xmin, ext.xmax, ymin, ymax)
}

/// Range around a spline's knots.
#[must_use]
pub fn spline_range(spline: &SplineObject, headroom: f64) -> FrameRange {
    let points: Vec<DataPoint> =
        spline.knots.iter().enumerate().map(|(i, k)| DataPoint::new(i, k.x, k.y)).collect();
    function_range(&points, headroom)
}

/// Padded range around a graph extent.
///
/// Degenerate ranges grow by one; both axes are padded by `padding` of their
/// span without crossing zero for one-signed data. `minimum`/`maximum`
/// override the y bounds.
#[must_use]
pub fn graph_range(ext: Option<Extent>, minimum: Option<f64>, maximum: Option<f64>, padding: f64) -> FrameRange {
    let ext = ext.unwrap_or(Extent { xmin: 0.0, xmax: 1.0, ymin: 0.0, ymax: 1.0 });
    let (xmin, mut ymin) = (ext.xmin, ext.ymin);
    let xmax = if ext.xmin >= ext.xmax { ext.xmin + 1.0 } else { ext.xmax };
    let ymax = if ext.ymin >= ext.ymax { ext.ymin + 1.0 } else { ext.ymax };

    let (dx, dy) = ((xmax - xmin) * padding, (ymax - ymin) * padding);
    let mut uxmin = xmin - dx;
    let mut uxmax = xmax + dx;
    let mut lo = ymin - dy;
    let mut hi = ymax + dy;

    if uxmin < 0.0 && xmin >= 0.0 {
        uxmin = xmin * 0.9;
    }
    if uxmax > 0.0 && xmax <= 0.0 {
        uxmax = 0.0;
    }
    if let Some(m) = minimum {
        lo = m;
        ymin = m;
    }
    if let Some(m) = maximum {
        hi = m;
    }
    if lo < 0.0 && ymin >= 0.0 {
        lo = 0.9 * ymin;
    }
    FrameRange::new(uxmin, uxmax, lo, hi)
}

/// Range shared by all graphs of a container.
///
/// Uses `padding` of the span on each side, log-aware y headroom, and drops
/// a small positive lower bound to zero on a linear y axis.
#[must_use]
pub fn multigraph_range(mg: &MultiGraphObject, logx: bool, logy: bool, padding: f64) -> FrameRange {
    let mut ext: Option<Extent> = None;
    for (g, _) in &mg.graphs {
        if let Some(e) = Extent::of_points(&graph_points(g)) {
            match ext.as_mut() {
                Some(acc) => acc.merge(&e),
                None => ext = Some(e),
            }
        }
    }
    let mut rw = ext.unwrap_or(Extent { xmin: 0.0, xmax: 0.0, ymin: 0.0, ymax: 0.0 });

    if rw.xmin == rw.xmax {
        rw.xmax += 1.0;
    }
    if rw.ymin == rw.ymax {
        rw.ymax += 1.0;
    }
    let dx = padding * (rw.xmax - rw.xmin);
    let dy = padding * (rw.ymax - rw.ymin);
    let mut uxmin = rw.xmin - dx;
    let mut uxmax = rw.xmax + dx;

    let (mut minimum, mut maximum);
    if logy {
        if rw.ymin <= 0.0 {
            rw.ymin = 0.001 * rw.ymax;
        }
        let decades = (rw.ymax / rw.ymin).log10();
        minimum = rw.ymin / (1.0 + 0.5 * decades);
        maximum = rw.ymax * (1.0 + 0.2 * decades);
    } else {
        minimum = rw.ymin - dy;
        maximum = rw.ymax + dy;
    }
    if minimum < 0.0 && rw.ymin >= 0.0 {
        minimum = 0.0;
    }
    if maximum > 0.0 && rw.ymax <= 0.0 {
        maximum = 0.0;
    }

    if uxmin < 0.0 && rw.xmin >= 0.0 {
        uxmin = if logx { 0.9 * rw.xmin } else { 0.0 };
    }
    if uxmax > 0.0 && rw.xmax <= 0.0 {
        uxmax = if logx { 1.1 * rw.xmax } else { 0.0 };
    }

    if let Some(m) = mg.minimum {
        rw.ymin = m;
        minimum = m;
    }
    if let Some(m) = mg.maximum {
        rw.ymax = m;
        maximum = m;
    }

    if logy {
        if minimum < 0.0 && rw.ymin >= 0.0 {
            minimum = 0.9 * rw.ymin;
        }
        if maximum > 0.0 && rw.ymax <= 0.0 {
            maximum = 1.1 * rw.ymax;
        }
        if minimum <= 0.0 {
            minimum = 0.001 * maximum;
        }
    } else if minimum > 0.0 && minimum < 0.05 * maximum {
        minimum = 0.0;
    }
    if uxmin <= 0.0 && logx {
        uxmin = if uxmax > 1000.0 { 1.0 } else { 0.001 * uxmax };
    }
    FrameRange::new(uxmin, uxmax, minimum, maximum)
}

/// Radius range of a polar graph: `r ± er` padded by 10% on each side.
#[must_use]
pub fn polar_radius_range(graph: &PolarGraphObject) -> (f64, f64) {
    let first = graph.radius.first().copied().unwrap_or(0.0);
    let (mut rmin, mut rmax) = (first, first);
    for (r, er) in graph.radius.iter().zip(&graph.radius_error) {
        rmin = rmin.min(r - er);
        rmax = rmax.max(r + er);
    }
    let pad = (rmax - rmin) * 0.1;
    (rmin - pad, rmax + pad)
}

/// Visible x window of a frame.
#[must_use]
pub fn visible_window(frame: &dyn ScaleProvider) -> (f64, f64) {
    frame.zoom_x().unwrap_or_else(|| frame.x_range())
}
