//! Error whisker and end-cap geometry.

use super::path::PathWriter;
use crate::geometry::Point;
use crate::options::ErrorEnds;

/// Which error extent a whisker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSide {
    /// Low x error.
    Left,
    /// High x error.
    Right,
    /// Low y error (drawn below the point).
    Bottom,
    /// High y error (drawn above the point).
    Top,
}

/// Sizes and styles shared by all whiskers of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorCaps {
    ends: ErrorEnds,
    main: bool,
    /// Half-length of a cap across the whisker.
    half: f64,
    /// Depth of bracket and arrow caps along the whisker.
    depth: f64,
    /// Pull-back of the whisker end by half the line width.
    inset: f64,
}

impl ErrorCaps {
    /// Cap geometry for a line width, the extra end size and the marker size.
    #[must_use]
    pub fn new(ends: ErrorEnds, main: bool, line_width: f64, end_error_size: f64, marker_size: f64) -> Self {
        let mut half = line_width + end_error_size;
        let mut depth = 0.0;
        match ends {
            ErrorEnds::Bracket => {
                depth = (line_width + 1.0).max((half * 0.66).round());
            }
            ErrorEnds::Triangle | ErrorEnds::Arrow => {
                half = half.max((marker_size * 8.0 * 0.66).round());
                depth = (line_width + 1.0).max((half * 0.66).round());
            }
            ErrorEnds::None | ErrorEnds::Bar => {}
        }
        Self { ends, main, half, depth, inset: ((line_width - 1.0) / 2.0).floor().max(0.0) }
    }

    /// Extent of the caps, used as the error hit radius.
    #[must_use]
    pub fn error_size(&self) -> f64 {
        self.half
    }

    /// Append one whisker from `center` to `end`.
    pub fn append(&self, w: &mut PathWriter, center: Point, end: Point, side: ErrorSide) {
        let e = match side {
            ErrorSide::Left => end.offset(self.inset, 0.0),
            ErrorSide::Right => end.offset(-self.inset, 0.0),
            ErrorSide::Bottom => end.offset(0.0, -self.inset),
            ErrorSide::Top => end.offset(0.0, self.inset),
        };
        if self.main {
            w.move_to(center.x, center.y).line_to(e.x, e.y);
        }

        let (lw, bb) = (self.half, self.depth);
        // Sign pointing from the end back toward the centre.
        let inward = match side {
            ErrorSide::Left | ErrorSide::Top => 1.0,
            ErrorSide::Right | ErrorSide::Bottom => -1.0,
        };
        let vertical = matches!(side, ErrorSide::Left | ErrorSide::Right);
        // Side of the end on which bracket and arrow caps start.
        let first = if vertical { lw } else { -lw };

        // Offsets are (along, across) relative to the whisker direction.
        let at = |along: f64, across: f64| {
            if vertical {
                (e.x + along, e.y + across)
            } else {
                (e.x + across, e.y + along)
            }
        };

        match self.ends {
            ErrorEnds::None => {}
            ErrorEnds::Bar => {
                let (x0, y0) = at(0.0, lw);
                let (x1, y1) = at(0.0, -lw);
                w.move_to(x0, y0).line_to(x1, y1);
            }
            ErrorEnds::Bracket => {
                let pts = [
                    at(inward * bb, first),
                    at(0.0, first),
                    at(0.0, -first),
                    at(inward * bb, -first),
                ];
                w.move_to(pts[0].0, pts[0].1);
                for &(x, y) in &pts[1..] {
                    w.line_to(x, y);
                }
            }
            ErrorEnds::Triangle => {
                if !self.main {
                    w.move_to(e.x, e.y);
                }
                let (x0, y0) = at(inward * bb, first);
                let (x1, y1) = at(inward * bb, -first);
                w.line_to(x0, y0).line_to(x1, y1).line_to(e.x, e.y);
            }
            ErrorEnds::Arrow => {
                if !self.main {
                    w.move_to(e.x, e.y);
                }
                let (x0, y0) = at(inward * bb, first);
                let (x1, y1) = at(inward * bb, -first);
                w.line_to(x0, y0).move_to(x1, y1).line_to(e.x, e.y);
            }
        }
    }
}
