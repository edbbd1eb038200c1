//! Draw option decoding.
//!
//! Option strings are case-insensitive bags of tokens such as `"AP"`, `"L[]"`
//! or `"B1"`. Each recognized token is consumed from the string, so longer
//! tokens are always checked before shorter ones they contain. Whatever is
//! left over is ignored.

/// Case-insensitive token scanner over a draw option string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOptions {
    text: String,
}

impl DrawOptions {
    /// Wrap an option string.
    #[must_use]
    pub fn new(opt: &str) -> Self {
        Self { text: opt.trim().to_uppercase() }
    }

    /// Consume the first occurrence of `token`, returning whether it was present.
    pub fn check(&mut self, token: &str) -> bool {
        let token = token.to_uppercase();
        match self.text.find(&token) {
            Some(pos) => {
                self.text.replace_range(pos..pos + token.len(), "");
                true
            }
            None => false,
        }
    }

    /// Whether nothing is left to consume.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Unconsumed part of the option string.
    #[must_use]
    pub fn remain(&self) -> &str {
        self.text.trim()
    }
}

/// Marker display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerMode {
    /// No markers.
    #[default]
    None,
    /// Markers with the object's own marker attributes.
    Object,
    /// Markers with a forced marker style.
    Style(u32),
}

impl MarkerMode {
    /// Whether markers are drawn.
    #[must_use]
    pub fn is_on(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// End-cap style of error whiskers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorEnds {
    /// Plain whisker.
    None,
    /// Short bar across the whisker end.
    #[default]
    Bar,
    /// Bracket opening toward the point.
    Bracket,
    /// Closed triangle.
    Triangle,
    /// Open arrow head.
    Arrow,
}

/// Bar chart mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    /// No bars.
    #[default]
    None,
    /// Bars from the bottom of the frame.
    Frame,
    /// Bars from the y = 0 baseline.
    Zero,
}

/// Error rectangle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectMode {
    /// No rectangles.
    #[default]
    None,
    /// Filled rectangles.
    Filled,
    /// Filled rectangles with outline.
    Outlined,
}

/// Error band mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandMode {
    /// No band.
    #[default]
    None,
    /// Band with straight boundaries.
    Straight,
    /// Band with smoothed boundaries.
    Smooth,
}

/// Replay mode of a time sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayMode {
    /// Play all steps once and stop.
    Once,
    /// Play all steps, pause, and start again.
    #[default]
    Repeat,
    /// Show only the first step.
    First,
}

/// Automatic coloring requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoColors {
    /// Fill color from the palette.
    pub fill: bool,
    /// Line color from the palette.
    pub line: bool,
    /// Marker color from the palette.
    pub marker: bool,
}

impl AutoColors {
    /// Whether any automatic color is requested.
    #[must_use]
    pub fn any(self) -> bool {
        self.fill || self.line || self.marker
    }
}

/// Properties of a graph object that influence default options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphTraits {
    /// The graph carries error arrays.
    pub has_errors: bool,
    /// The graph has symmetric errors that are all negligible.
    pub negligible_errors: bool,
    /// The object's marker style.
    pub marker_style: u32,
}

/// Kind of object an option string is decoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Evaluable function.
    Function,
    /// Point graph with optional errors.
    Graph(GraphTraits),
    /// Efficiency converted to an asymmetric-error graph.
    Efficiency(GraphTraits),
    /// Cubic or quintic spline.
    Spline,
    /// Graph in polar coordinates.
    PolarGraph,
    /// Container of graphs.
    MultiGraph,
    /// Time sequence of drawings.
    GraphTime,
}

/// Decoded drawing configuration, fixed for one draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Straight or smoothed line through the points.
    pub line: bool,
    /// Smooth the line.
    pub curve: bool,
    /// Fill the area under the line.
    pub fill: bool,
    /// Marker mode.
    pub mark: MarkerMode,
    /// Bar mode.
    pub bar: BarMode,
    /// Error rectangle mode.
    pub rect: RectMode,
    /// Error band mode.
    pub band: BandMode,
    /// Draw error whiskers.
    pub errors: bool,
    /// Draw the whisker line itself, not only the caps.
    pub main_error: bool,
    /// Whisker cap style.
    pub ends: ErrorEnds,
    /// Also draw points outside the frame.
    pub out_range: bool,
    /// Axis request forwarded to the frame collaborator.
    pub axis: String,
    /// Draw a frame before children (multi-graph `A`).
    pub draw_axis: bool,
    /// Automatic coloring.
    pub auto_colors: AutoColors,
    /// Overlay on an existing frame.
    pub same: bool,
    /// Ignore a function's saved sample table.
    pub no_saved: bool,
    /// Keep empty bins (efficiency `E0`).
    pub zero_bins: bool,
    /// Replay mode of time sequences.
    pub replay: ReplayMode,
    /// Options forwarded to children of a container.
    pub child_options: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line: false,
            curve: false,
            fill: false,
            mark: MarkerMode::None,
            bar: BarMode::None,
            rect: RectMode::None,
            band: BandMode::None,
            errors: false,
            main_error: true,
            ends: ErrorEnds::Bar,
            out_range: false,
            axis: "AXIS".to_string(),
            draw_axis: false,
            auto_colors: AutoColors::default(),
            same: false,
            no_saved: false,
            zero_bins: false,
            replay: ReplayMode::Repeat,
            child_options: String::new(),
        }
    }
}

/// Decodes option strings into [`RenderOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionDecoder;

impl OptionDecoder {
    /// Decode `opt` for an object of the given kind.
    #[must_use]
    pub fn decode(opt: &str, kind: ObjectKind) -> RenderOptions {
        let mut res = RenderOptions::default();
        let d = match kind {
            ObjectKind::Function => {
                let mut d = DrawOptions::new(opt);
                res.no_saved = d.check("NOSAVE");
                res.same = d.check("SAME");
                res.line = true;
                d
            }
            ObjectKind::Graph(traits) => decode_graph(DrawOptions::new(opt), traits, &mut res),
            ObjectKind::Efficiency(traits) => {
                let mut d = DrawOptions::new(opt);
                res.zero_bins = d.check("E0");
                decode_graph(d, traits, &mut res)
            }
            ObjectKind::Spline => {
                let mut d = DrawOptions::new(opt);
                res.same = d.check("SAME");
                res.line = d.check("L");
                res.curve = d.check("C");
                if d.check("P") {
                    res.mark = MarkerMode::Object;
                }
                if !res.line && !res.curve && !res.mark.is_on() && d.is_empty() {
                    res.curve = true;
                }
                d
            }
            ObjectKind::PolarGraph => {
                let mut d = DrawOptions::new(if opt.trim().is_empty() { "L" } else { opt });
                if d.check("P") {
                    res.mark = MarkerMode::Object;
                }
                res.errors = d.check("E");
                res.fill = d.check("F");
                res.line = d.check("L");
                res.curve = d.check("C");
                d
            }
            ObjectKind::MultiGraph => {
                let mut d = DrawOptions::new(opt);
                d.check("3D");
                d.check("FB");
                res.auto_colors = check_auto_colors(&mut d);
                res.draw_axis = d.check("A");
                res.child_options = d.remain().to_string();
                return res;
            }
            ObjectKind::GraphTime => {
                let mut d = DrawOptions::new(if opt.trim().is_empty() { "REPEAT" } else { opt });
                let once = d.check("ONCE");
                let repeat = d.check("REPEAT");
                let first = d.check("FIRST");
                res.replay = if first {
                    ReplayMode::First
                } else if once && !repeat {
                    ReplayMode::Once
                } else {
                    ReplayMode::Repeat
                };
                d
            }
        };

        if !d.is_empty() {
            log::debug!("ignoring unrecognized draw options '{}'", d.remain());
        }
        res
    }
}

fn check_auto_colors(d: &mut DrawOptions) -> AutoColors {
    AutoColors { fill: d.check("PFC"), line: d.check("PLC"), marker: d.check("PMC") }
}

fn decode_graph(mut d: DrawOptions, traits: GraphTraits, res: &mut RenderOptions) -> DrawOptions {
    res.errors = traits.has_errors;
    res.auto_colors = check_auto_colors(&mut d);

    if d.check("L") {
        res.line = true;
    }
    if d.check("F") {
        res.fill = true;
    }
    if d.check("IA") {
        res.axis = "A".to_string();
    } else if d.check("A") {
        res.axis = "AXIS".to_string();
    }
    if d.check("X+") {
        res.axis.push_str("X+");
    }
    if d.check("Y+") {
        res.axis.push_str("Y+");
    }
    if d.check("C") {
        res.curve = true;
        if !res.fill {
            res.line = true;
        }
    }
    if d.check("*") {
        res.mark = MarkerMode::Style(3);
    }
    if d.check("P0") {
        res.mark = MarkerMode::Style(4);
    }
    if d.check("P") {
        res.mark = MarkerMode::Object;
    }
    if d.check("B") {
        res.bar = BarMode::Frame;
        res.errors = false;
    }
    if d.check("Z") {
        res.errors = true;
        res.ends = ErrorEnds::None;
    }
    if d.check("||") {
        res.errors = true;
        res.main_error = false;
        res.ends = ErrorEnds::Bar;
    }
    if d.check("[]") {
        res.errors = true;
        res.main_error = false;
        res.ends = ErrorEnds::Bracket;
    }
    if d.check("|>") {
        res.errors = true;
        res.ends = ErrorEnds::Triangle;
    }
    if d.check(">") {
        res.errors = true;
        res.ends = ErrorEnds::Arrow;
    }
    if d.check("0") {
        res.mark = MarkerMode::Object;
        res.errors = true;
        res.out_range = true;
    }
    if d.check("1") && res.bar == BarMode::Frame {
        res.bar = BarMode::Zero;
    }
    if d.check("2") {
        res.rect = RectMode::Filled;
        res.line = false;
        res.errors = false;
    }
    if d.check("3") {
        res.band = BandMode::Straight;
        res.line = false;
        res.errors = false;
    }
    if d.check("4") {
        res.band = BandMode::Smooth;
        res.line = false;
        res.errors = false;
    }
    if d.check("5") {
        res.rect = RectMode::Outlined;
        res.line = false;
        res.errors = false;
    }
    if d.check("X") {
        res.errors = false;
    }

    // A dot marker is drawn as a pixel path regardless of size.
    if res.mark == MarkerMode::Object && traits.marker_style == 1 {
        res.mark = MarkerMode::Style(1);
    }

    let anything = res.line
        || res.fill
        || res.mark.is_on()
        || res.bar != BarMode::None
        || res.band != BandMode::None
        || res.rect != RectMode::None
        || res.errors;
    if !anything && d.is_empty() {
        res.line = true;
    }

    if traits.negligible_errors {
        res.errors = false;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(opt: &str) -> RenderOptions {
        OptionDecoder::decode(opt, ObjectKind::Graph(GraphTraits { marker_style: 20, ..Default::default() }))
    }

    fn error_graph(opt: &str) -> RenderOptions {
        OptionDecoder::decode(
            opt,
            ObjectKind::Graph(GraphTraits { has_errors: true, marker_style: 20, ..Default::default() }),
        )
    }

    #[test]
    fn test_draw_options_check_consumes() {
        let mut d = DrawOptions::new("ap");
        assert!(d.check("P"));
        assert!(!d.check("P"));
        assert_eq!(d.remain(), "A");
        assert!(d.check("a"));
        assert!(d.is_empty());
    }

    #[test]
    fn test_line_option() {
        let res = graph("L");
        assert!(res.line);
        assert!(!res.fill);
        assert!(!res.curve);
        assert_eq!(res.mark, MarkerMode::None);
        assert!(!res.errors);
    }

    #[test]
    fn test_empty_defaults_to_line() {
        assert!(graph("").line);
        assert!(graph("A").line);
        assert!(!graph("unknownQ").line);
    }

    #[test]
    fn test_error_graph_defaults_to_errors() {
        let res = error_graph("");
        assert!(res.errors);
        assert!(!res.line);
        assert_eq!(res.ends, ErrorEnds::Bar);
    }

    #[test]
    fn test_negligible_errors_suppressed() {
        let res = OptionDecoder::decode(
            "AP",
            ObjectKind::Graph(GraphTraits { has_errors: true, negligible_errors: true, marker_style: 20 }),
        );
        assert!(!res.errors);
        assert_eq!(res.mark, MarkerMode::Object);
    }

    #[test]
    fn test_curve_forces_line_without_fill() {
        let res = graph("C");
        assert!(res.curve && res.line);
        let filled = graph("FC");
        assert!(filled.curve && filled.fill && !filled.line);
    }

    #[test]
    fn test_multichar_tokens_before_single() {
        let res = error_graph("[]");
        assert_eq!(res.ends, ErrorEnds::Bracket);
        assert!(!res.main_error);

        let res = error_graph("|>");
        assert_eq!(res.ends, ErrorEnds::Triangle);
        assert!(res.main_error);

        let res = error_graph(">");
        assert_eq!(res.ends, ErrorEnds::Arrow);

        let res = graph("P0");
        assert_eq!(res.mark, MarkerMode::Style(4));
        assert!(!res.out_range);
    }

    #[test]
    fn test_numeric_modes_disable_line_and_errors() {
        let res = error_graph("L2");
        assert_eq!(res.rect, RectMode::Filled);
        assert!(!res.line && !res.errors);

        let res = error_graph("4");
        assert_eq!(res.band, BandMode::Smooth);

        let res = error_graph("5");
        assert_eq!(res.rect, RectMode::Outlined);
    }

    #[test]
    fn test_bars() {
        assert_eq!(graph("B").bar, BarMode::Frame);
        assert_eq!(graph("B1").bar, BarMode::Zero);
        assert_eq!(graph("1").bar, BarMode::None);
        assert!(!error_graph("B").errors);
    }

    #[test]
    fn test_out_range_and_axis() {
        let res = graph("IAX+0");
        assert_eq!(res.axis, "AX+");
        assert!(res.out_range && res.errors);
        assert_eq!(res.mark, MarkerMode::Object);
    }

    #[test]
    fn test_dot_marker_style_forced() {
        let res = OptionDecoder::decode("P", ObjectKind::Graph(GraphTraits { marker_style: 1, ..Default::default() }));
        assert_eq!(res.mark, MarkerMode::Style(1));
    }

    #[test]
    fn test_auto_colors() {
        let res = graph("PLC PMC");
        assert!(res.auto_colors.line && res.auto_colors.marker && !res.auto_colors.fill);
        assert_eq!(res.mark, MarkerMode::None);
    }

    #[test]
    fn test_polar_defaults_to_line() {
        let res = OptionDecoder::decode("", ObjectKind::PolarGraph);
        assert!(res.line);
        let res = OptionDecoder::decode("PE", ObjectKind::PolarGraph);
        assert!(!res.line && res.errors && res.mark.is_on());
    }

    #[test]
    fn test_spline_and_function() {
        let res = OptionDecoder::decode("same lp", ObjectKind::Spline);
        assert!(res.same && res.line && res.mark.is_on() && !res.curve);
        assert!(OptionDecoder::decode("", ObjectKind::Spline).curve);
        assert!(!OptionDecoder::decode("P", ObjectKind::Spline).curve);

        let res = OptionDecoder::decode("nosave", ObjectKind::Function);
        assert!(res.no_saved && res.line);
    }

    #[test]
    fn test_multigraph_remainder() {
        let res = OptionDecoder::decode("A PLC 3D LP", ObjectKind::MultiGraph);
        assert!(res.draw_axis);
        assert!(res.auto_colors.line);
        assert_eq!(res.child_options, "LP");
    }

    #[test]
    fn test_graph_time_modes() {
        assert_eq!(OptionDecoder::decode("", ObjectKind::GraphTime).replay, ReplayMode::Repeat);
        assert_eq!(OptionDecoder::decode("once", ObjectKind::GraphTime).replay, ReplayMode::Once);
        assert_eq!(OptionDecoder::decode("first", ObjectKind::GraphTime).replay, ReplayMode::First);
    }

    #[test]
    fn test_efficiency_zero_bins() {
        let res = OptionDecoder::decode("E0 P", ObjectKind::Efficiency(GraphTraits { has_errors: true, marker_style: 20, ..Default::default() }));
        assert!(res.zero_bins);
        assert!(res.errors);
    }
}
