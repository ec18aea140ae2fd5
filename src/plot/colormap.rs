/// Named colormaps, coherence color scales and marker colors.
use std::str::FromStr;

use plotters::style::RGBColor;
use plotters::style::colors::colormaps::{ColorMap, DerivedColorMap, ViridisRGB};

/// Number of levels in a threshold-truncated colormap.
const TRUNCATE_LEVELS: usize = 200;

/// Color used for NaN values.
pub const NAN_COLOR: RGBColor = RGBColor(200, 200, 200);

const RDBU: [u32; 11] = [
    0x67_001f, 0xb2_182b, 0xd6_604d, 0xf4_a582, 0xfd_dbc7, 0xf7_f7f7, 0xd1_e5f0, 0x92_c5de,
    0x43_93c3, 0x21_66ac, 0x05_3061,
];
const JET: [u32; 9] = [
    0x00_0080, 0x00_00ff, 0x00_80ff, 0x00_ffff, 0x80_ff80, 0xff_ff00, 0xff_8000, 0xff_0000,
    0x80_0000,
];
const GRAY: [u32; 2] = [0x00_0000, 0xff_ffff];

const fn rgb(hex: u32) -> RGBColor {
    RGBColor((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// The underlying continuous map.
#[derive(Debug, Clone, PartialEq)]
enum Base {
    /// plotters' built-in viridis.
    Viridis,
    /// Evenly spaced stops, sampled through a `DerivedColorMap`.
    Stops(Vec<RGBColor>),
}

/// A named colormap, optionally reversed and split at a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    base: Base,
    reversed: bool,
    /// Levels (out of `TRUNCATE_LEVELS`) mapped into the low part of the map.
    truncate_below: Option<usize>,
}

impl Default for Colormap {
    fn default() -> Self {
        Self::from_stops("RdBu", RDBU.iter().copied().map(rgb).collect())
    }
}

impl Colormap {
    /// Build from explicit, evenly spaced stops.
    #[must_use]
    pub fn from_stops(name: &str, stops: Vec<RGBColor>) -> Self {
        let stops = if stops.is_empty() { vec![NAN_COLOR] } else { stops };
        Self {
            name: name.to_owned(),
            base: Base::Stops(stops),
            reversed: false,
            truncate_below: None,
        }
    }

    fn viridis(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            base: Base::Viridis,
            reversed: false,
            truncate_below: None,
        }
    }

    /// Colormap name, e.g. `RdBu` or `jet_r`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at position `t` in `[0, 1]`; out-of-range values are clamped.
    #[must_use]
    pub fn at(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = self.truncate_below.map_or(t, |below| truncated_position(t, below));
        let t = if self.reversed { 1.0 - t } else { t };
        match &self.base {
            Base::Viridis => ViridisRGB.get_color(t),
            Base::Stops(stops) if stops.len() == 1 => stops[0],
            Base::Stops(stops) => DerivedColorMap::new(stops).get_color_normalized(t, 0.0, 1.0),
        }
    }

    /// The same colormap, reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_owned(),
            None => format!("{}_r", self.name),
        };
        Self {
            name,
            reversed: !self.reversed,
            ..self.clone()
        }
    }

    /// Split the colormap at a coherence threshold.
    ///
    /// Values below `threshold` map into the low `[0, 0.3]` part of the map,
    /// values above it into the high `[0.6, 1]` part, so pairs on either side
    /// are visually separated.
    #[must_use]
    pub fn truncated(&self, threshold: f64, vmin: f64, vmax: f64) -> Self {
        let span = vmax - vmin;
        let below = if span > 0.0 {
            (TRUNCATE_LEVELS as f64 * (threshold - vmin) / span).ceil()
        } else {
            0.0
        };
        Self {
            name: format!("truncate_{}", self.name),
            truncate_below: Some((below.max(0.0) as usize).min(TRUNCATE_LEVELS)),
            ..self.clone()
        }
    }
}

/// Position in the full map of `t` on a map quantized to `TRUNCATE_LEVELS`
/// levels, the first `below` of which span `[0, 0.3]` and the rest `[0.6, 1]`.
fn truncated_position(t: f64, below: usize) -> f64 {
    let level = ((t * TRUNCATE_LEVELS as f64) as usize).min(TRUNCATE_LEVELS - 1);
    if level < below {
        linspace_at(0.0, 0.3, below, level)
    } else {
        linspace_at(0.6, 1.0, TRUNCATE_LEVELS - below, level - below)
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(base) = s.strip_suffix("_r") {
            return Ok(base.parse::<Self>()?.reversed());
        }
        let stops: &[u32] = match s.to_ascii_lowercase().as_str() {
            "rdbu" => &RDBU,
            "jet" => &JET,
            "viridis" => return Ok(Self::viridis(s)),
            "gray" | "grey" => &GRAY,
            _ => {
                return Err(format!(
                    "unknown colormap '{s}' (available: RdBu, jet, viridis, gray, with optional _r)"
                ));
            }
        };
        Ok(Self::from_stops(s, stops.iter().copied().map(rgb).collect()))
    }
}

/// The `i`-th of `n` evenly spaced values from `a` to `b` inclusive.
fn linspace_at(a: f64, b: f64, n: usize, i: usize) -> f64 {
    if n <= 1 {
        a
    } else {
        a + (b - a) * i as f64 / (n - 1) as f64
    }
}

/// Maps coherence values in `[vmin, vmax]` onto a colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    /// Colormap in use (already truncated when a threshold is set).
    pub cmap: Colormap,
    /// Value at the low end of the map.
    pub vmin: f64,
    /// Value at the high end of the map.
    pub vmax: f64,
}

impl ColorScale {
    /// Scale over `[vmin, vmax]`, truncated at `threshold` when given.
    #[must_use]
    pub fn new(cmap: &Colormap, vmin: f64, vmax: f64, threshold: Option<f64>) -> Self {
        let cmap = match threshold {
            Some(t) => cmap.truncated(t, vmin, vmax),
            None => cmap.clone(),
        };
        Self { cmap, vmin, vmax }
    }

    /// Color of a value; NaN maps to [`NAN_COLOR`].
    #[must_use]
    pub fn color(&self, value: f64) -> RGBColor {
        if value.is_nan() {
            return NAN_COLOR;
        }
        let span = self.vmax - self.vmin;
        let t = if span > 0.0 { (value - self.vmin) / span } else { 0.5 };
        self.cmap.at(t)
    }
}

/// Parse a marker color: a common color name or `#rrggbb`.
///
/// # Errors
///
/// Returns a message naming the unknown color.
pub fn parse_color(s: &str) -> Result<RGBColor, String> {
    if let Some(hex) = s.strip_prefix('#') {
        return u32::from_str_radix(hex, 16)
            .ok()
            .filter(|_| hex.len() == 6)
            .map(rgb)
            .ok_or_else(|| format!("invalid hex color '{s}'"));
    }
    let hex = match s.to_ascii_lowercase().as_str() {
        "orange" => 0xff_a500,
        "red" | "r" => 0xff_0000,
        "green" | "g" => 0x00_8000,
        "blue" | "b" => 0x00_00ff,
        "black" | "k" => 0x00_0000,
        "white" | "w" => 0xff_ffff,
        "gray" | "grey" => 0x80_8080,
        "yellow" | "y" => 0xff_ff00,
        "cyan" | "c" => 0x00_ffff,
        "magenta" | "m" => 0xff_00ff,
        "purple" => 0x80_0080,
        _ => return Err(format!("unknown color '{s}'")),
    };
    Ok(rgb(hex))
}
