//! SVG drawing surface.
//!
//! Keeps one `<g>` per painter group in first-drawn order, so later groups
//! paint on top. Replacing a group keeps its position.

use crate::color::Rgba;
use crate::error::Result;
use crate::render::{DrawCommand, DrawingSurface, GroupId, RenderList, TextAnchor};
use crate::style::PathStyle;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Drawing surface that accumulates groups and renders them as SVG text.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// Groups in z-order
    groups: Vec<(GroupId, RenderList)>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgSurface {
    /// Create an empty surface with the given pixel size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), groups: Vec::new() }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Group ids in z-order.
    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.iter().map(|(id, _)| *id)
    }

    /// Contents of a group.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&RenderList> {
        self.groups.iter().find(|(g, _)| *g == id).map(|(_, list)| list)
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }

        for (id, list) in &self.groups {
            let origin = list.origin();
            let _ = writeln!(svg, r#"  <g id="group{}" transform="translate({},{})">"#, id.0, origin.x, origin.y);
            for command in list.commands() {
                let _ = writeln!(svg, "    {}", command_to_svg(command));
            }
            svg.push_str("  </g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

impl DrawingSurface for SvgSurface {
    fn replace_group(&mut self, group: GroupId, list: RenderList) {
        match self.groups.iter_mut().find(|(g, _)| *g == group) {
            Some((_, existing)) => *existing = list,
            None => self.groups.push((group, list)),
        }
    }

    fn remove_group(&mut self, group: GroupId) {
        self.groups.retain(|(g, _)| *g != group);
    }
}

/// `fill` and `stroke` attributes of a path style.
fn style_attrs(style: &PathStyle) -> String {
    let mut attrs = match style.fill {
        Some(f) => format!(r#" fill="{}""#, f.to_css()),
        None => r#" fill="none""#.to_string(),
    };
    if let Some(s) = &style.stroke {
        let _ = write!(attrs, r#" stroke="{}" stroke-width="{}""#, s.color.to_css(), s.width);
        if let Some(dash) = s.dash {
            let _ = write!(attrs, r#" stroke-dasharray="{dash}""#);
        }
    }
    attrs
}

/// Convert a draw command to its SVG element.
fn command_to_svg(command: &DrawCommand) -> String {
    match command {
        DrawCommand::Path { d, style } => format!(r#"<path d="{d}"{}/>"#, style_attrs(style)),
        DrawCommand::Rect { rect, style } => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            style_attrs(style)
        ),
        DrawCommand::Text { position, text, color, size, anchor } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            // Escape XML special characters
            let escaped_text = text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
                .replace('"', "&quot;");
            format!(
                r#"<text x="{}" y="{}" font-size="{size}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif">{escaped_text}</text>"#,
                position.x,
                position.y,
                color.to_css()
            )
        }
    }
}
