//! Colors and palettes for the compositor.
//!
//! Surface pixels are stored as [`Srgb`] triples in [0, 1] and blended
//! directly in that space, the way a 2D canvas context blends. A [`Palette`]
//! maps a scalar simulation value onto a gradient of color stops.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// RGB color with components in [0, 1].
///
/// Serializes as a `"#rrggbb"` hex string (8-bit quantized).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Neutral gray of the given level.
    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Parses `"#rrggbb"` or `"rrggbb"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("{hex:?}: {e}")))
        };
        Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as `"#rrggbb"`, clamping and rounding each channel.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Relative luminance with Rec. 709 weights.
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Linear interpolation toward `other` by `t`.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

const PALETTE_NAMES: &[&str] = &["ember", "ocean", "aurora", "ink", "mono"];

/// Evenly spaced color stops sampled by linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<Srgb>,
}

impl Palette {
    /// Requires at least one stop.
    pub fn new(stops: Vec<Srgb>) -> Result<Self, EngineError> {
        if stops.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    pub fn from_hex(hexes: &[&str]) -> Result<Self, EngineError> {
        let stops = hexes
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stops)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Samples at `t`, clamped to [0, 1]. NaN samples the first stop.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len();
        if n == 1 {
            return self.stops[0];
        }
        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;
        self.stops[idx].lerp(self.stops[idx + 1], frac)
    }

    /// Dark reds through orange to pale yellow.
    pub fn ember() -> Self {
        Self::from_hex(&["#1a0505", "#7a1c0c", "#d9541e", "#f7b538", "#fff3c4"])
            .expect("ember palette hex values are valid")
    }

    /// Deep blues to cyan.
    pub fn ocean() -> Self {
        Self::from_hex(&["#001f3f", "#003366", "#005f73", "#0a9396", "#94d2bd"])
            .expect("ocean palette hex values are valid")
    }

    /// Greens into violet.
    pub fn aurora() -> Self {
        Self::from_hex(&["#0b3d2e", "#1fab89", "#62d2a2", "#9d65c9", "#e0c3fc"])
            .expect("aurora palette hex values are valid")
    }

    /// Blue-black ink into paper white.
    pub fn ink() -> Self {
        Self::from_hex(&["#0d1b2a", "#415a77", "#e0e1dd"]).expect("ink palette hex values are valid")
    }

    /// Black to white.
    pub fn mono() -> Self {
        Self::from_hex(&["#000000", "#ffffff"]).expect("mono palette hex values are valid")
    }

    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "ember" => Ok(Self::ember()),
            "ocean" => Ok(Self::ocean()),
            "aurora" => Ok(Self::aurora()),
            "ink" => Ok(Self::ink()),
            "mono" => Ok(Self::mono()),
            other => Err(EngineError::InvalidPalette(format!(
                "unknown palette '{other}', expected one of: {}",
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }
}
