//! Render commands and the drawing-surface seam.
//!
//! Painters never touch an output device. They produce a [`RenderList`] per
//! redraw and hand it to a [`DrawingSurface`], which replaces the painter's
//! previous group wholesale.
//!
//! Path geometry lives in the submodules: [`PathBuilder`] for series,
//! [`MarkerGenerator`] for markers and [`ErrorCaps`] for error whiskers.

mod errors;
mod marker;
mod path;

pub use errors::{ErrorCaps, ErrorSide};
pub use marker::{marker_shape, MarkerGenerator, MarkerShape};
pub use path::{fmt_num, join_paths, BuiltPath, PathBuilder, PathKind, PathWriter};

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::style::PathStyle;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centred on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// One drawing instruction in pad pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Vector path.
    Path {
        /// Path data.
        d: String,
        /// Stroke and fill.
        style: PathStyle,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Rectangle bounds.
        rect: Rect,
        /// Stroke and fill.
        style: PathStyle,
    },
    /// Text label.
    Text {
        /// Anchor position.
        position: Point,
        /// Text content.
        text: String,
        /// Text color.
        color: Rgba,
        /// Font size in pixels.
        size: f64,
        /// Horizontal alignment.
        anchor: TextAnchor,
    },
}

/// Ordered draw commands of one painter.
///
/// Coordinates are relative to `origin`, the pad position of the layer the
/// painter draws in: the frame corner for cartesian plots, the pad corner
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderList {
    origin: Point,
    commands: Vec<DrawCommand>,
}

impl RenderList {
    /// Create an empty render list at the pad corner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty render list whose coordinates start at `origin`.
    #[must_use]
    pub fn at(origin: Point) -> Self {
        Self { origin, commands: Vec::new() }
    }

    /// Pad position of the list's coordinate origin.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Push a command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Push a path unless it is empty or would be invisible.
    pub fn push_path(&mut self, d: String, style: PathStyle) {
        if !d.is_empty() && !style.is_invisible() {
            self.commands.push(DrawCommand::Path { d, style });
        }
    }

    /// All commands in draw order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Path data of every path command, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Path { d, .. } => Some(d.as_str()),
            _ => None,
        })
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether there are no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Identifier of a painter's drawing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

/// Sink that performs actual output.
pub trait DrawingSurface {
    /// Replace the contents of a group, creating it on first use.
    fn replace_group(&mut self, group: GroupId, list: RenderList);

    /// Remove a group and everything drawn in it.
    fn remove_group(&mut self, group: GroupId);
}
