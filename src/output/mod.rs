//! Drawing surfaces.

mod svg;

pub use svg::SvgSurface;
