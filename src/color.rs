//! Color types, indexed color references and draw-order palettes.
//!
//! Plot objects store colors as small integer indices into a classic
//! plotting color table; render-ready output uses [`Rgba`]. Palettes hand out
//! colors by draw order for automatic coloring of sibling plots.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Create a color with alpha given as an opacity in `[0, 1]`.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f64::from(self.r) * inv_t + f64::from(other.r) * t) as u8,
            (f64::from(self.g) * inv_t + f64::from(other.g) * t) as u8,
            (f64::from(self.b) * inv_t + f64::from(other.b) * t) as u8,
            (f64::from(self.a) * inv_t + f64::from(other.a) * t) as u8,
        )
    }

    /// CSS color string (`rgb(..)` when opaque, `rgba(..)` otherwise).
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }
}

/// A color as stored on a plot object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRef {
    /// Index into the indexed color table.
    Index(i32),
    /// Explicit color.
    Rgba(Rgba),
}

impl Default for ColorRef {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl From<Rgba> for ColorRef {
    fn from(color: Rgba) -> Self {
        Self::Rgba(color)
    }
}

/// Base entries of the indexed color table.
const BASE_COLORS: [Rgba; 10] = [
    Rgba::rgb(255, 255, 255),
    Rgba::rgb(0, 0, 0),
    Rgba::rgb(255, 0, 0),
    Rgba::rgb(0, 255, 0),
    Rgba::rgb(0, 0, 255),
    Rgba::rgb(255, 255, 0),
    Rgba::rgb(255, 0, 255),
    Rgba::rgb(0, 255, 255),
    Rgba::rgb(89, 212, 84),
    Rgba::rgb(89, 84, 217),
];

/// Look up an entry of the base indexed color table.
#[must_use]
pub fn indexed_color(index: i32) -> Option<Rgba> {
    usize::try_from(index).ok().and_then(|i| BASE_COLORS.get(i)).copied()
}

/// Source of automatic colors assigned by draw order.
pub trait Palette {
    /// Color for the `index`-th of `count` sibling plots.
    fn calc_color(&self, index: usize, count: usize) -> Rgba;
}

/// Palette interpolating between evenly spaced color stops.
#[derive(Debug, Clone)]
pub struct GradientPalette {
    stops: Vec<Rgba>,
}

impl GradientPalette {
    /// Create a palette from color stops. Returns `None` if `stops` is empty.
    #[must_use]
    pub fn new(stops: Vec<Rgba>) -> Option<Self> {
        if stops.is_empty() {
            None
        } else {
            Some(Self { stops })
        }
    }

    /// Viridis palette (perceptually uniform).
    #[must_use]
    pub fn viridis() -> Self {
        Self {
            stops: vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
        }
    }

    /// Color at fraction `t` of the gradient.
    #[must_use]
    pub fn at(&self, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        if self.stops.len() == 1 {
            return self.stops[0];
        }

        let segment_count = self.stops.len() - 1;
        let segment = ((t * segment_count as f64).floor() as usize).min(segment_count - 1);
        let local_t = t * segment_count as f64 - segment as f64;

        self.stops[segment].lerp(self.stops[segment + 1], local_t)
    }
}

impl Default for GradientPalette {
    fn default() -> Self {
        Self::viridis()
    }
}

impl Palette for GradientPalette {
    fn calc_color(&self, index: usize, count: usize) -> Rgba {
        if count <= 1 {
            return self.at(0.0);
        }
        self.at(index as f64 / (count - 1) as f64)
    }
}
