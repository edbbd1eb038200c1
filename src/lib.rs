//! # plotpaint
//!
//! Geometry core for scientific 2D plot painters.
//!
//! plotpaint turns functions, point graphs with errors, splines, polar graphs
//! and shape streams into vector path strings, and hit-tests pointer positions
//! against the geometry it produced. Output devices, object deserialization
//! and axis drawing stay with the embedding application, reached through the
//! [`render::DrawingSurface`], [`scale::ScaleProvider`] and
//! [`style::StyleResolver`] seams.
//!
//! ## Features
//!
//! - **Bin derivation**: function sampling, saved sample tables, error graphs,
//!   efficiencies and spline evaluation, with viewport filtering and decimation
//! - **Path synthesis**: line, Bezier-smoothed and closed area paths, error
//!   whiskers and marker series in the `M/L/C/A/Z` path language
//! - **Hit-testing**: nearest point, bar or segment with deterministic
//!   tie-breaking and tooltip change tracking
//! - **Render pipeline**: per-plot state machine, sequential draw of container
//!   children, cancellable time replay
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plotpaint::prelude::*;
//!
//! let config = RenderConfig::default();
//! let pad = Pad::new(400.0, 300.0, &config);
//! let mut surface = SvgSurface::new(400, 300);
//!
//! let graph = GraphObject::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 1.0])?;
//! let mut painter = PlotPainter::new(Plot::from_object(PlotObject::Graph(graph), "L"), GroupId(1));
//! if let DrawStep::FramePending(request) = painter.draw(None, &pad, &mut surface)? {
//!     painter.frame_ready(pad.frame_for(&request)?, &pad, &mut surface)?;
//! }
//! println!("{}", surface.render());
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Colors, indexed color table and palettes.
pub mod color;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Data-to-pixel mappings and the frame scale provider.
pub mod scale;

/// Polar frame mapping and grid layout.
pub mod polar;

/// Render configuration.
pub mod config;

// ============================================================================
// Data Modules
// ============================================================================

/// Inbound plot object records.
pub mod objects;

/// Data points and rendered points.
pub mod data;

/// Bin derivation, decimation and frame auto-ranging.
pub mod bins;

/// Draw option decoding.
pub mod options;

/// Attribute resolution into render styles.
pub mod style;

// ============================================================================
// Painting Modules
// ============================================================================

/// Path synthesis, markers and render commands.
pub mod render;

/// Plot painters.
pub mod plots;

/// Hit-testing and tooltips.
pub mod hit;

/// Per-plot render pipeline.
pub mod pipeline;

/// Time replay scheduling.
pub mod animation;

/// Drawing surfaces.
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for plotpaint operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use plotpaint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{ColorRef, GradientPalette, Palette, Rgba};
    pub use crate::config::RenderConfig;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Rect};
    pub use crate::hit::{FeatureRef, Pointer, Tooltip};
    pub use crate::objects::{
        EfficiencyObject, FunctionObject, GraphErrors, GraphObject, GraphTimeObject, Knot, MultiGraphObject, PaintOp,
        PaintingObject, PlotObject, PolarGraphObject, Polargram, SplineObject,
    };
    pub use crate::output::SvgSurface;
    pub use crate::pipeline::{DrawQueue, DrawStep, Pad, PadFrame, PipelineState, PlotPainter};
    pub use crate::plots::{
        FrameRequest, GraphTimePainter, MultiGraphPainter, Paintable, Plot, PolarGraphPainter, PolargramPainter,
    };
    pub use crate::render::{DrawCommand, DrawingSurface, GroupId, RenderList};
    pub use crate::scale::{Axis, FrameScale, ScaleProvider};
    pub use crate::style::{Attributes, DefaultStyleResolver, StyleResolver};
}
