use std::str::FromStr;

use palette::{Mix, Srgb};

/// Opaque 8-bit sRGB colour used by chart data.
pub type Rgb = Srgb<u8>;

/// Fallback for undefined cells (e.g. a correlation with a constant column).
pub const MISSING_COLOR: Rgb = Srgb::new(160, 160, 160);

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// A piecewise-linear colour scale over `[0, 1]`, interpolated in sRGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<Rgb>,
}

impl ColorScale {
    /// Sequential scale used for frequency encoding.
    pub fn viridis() -> Self {
        ColorScale {
            stops: vec![
                Srgb::new(68, 1, 84),
                Srgb::new(72, 40, 120),
                Srgb::new(62, 74, 137),
                Srgb::new(49, 104, 142),
                Srgb::new(38, 130, 142),
                Srgb::new(31, 158, 137),
                Srgb::new(53, 183, 121),
                Srgb::new(110, 206, 88),
                Srgb::new(181, 222, 43),
                Srgb::new(253, 231, 37),
            ],
        }
    }

    /// Diverging red → white → blue scale for correlation coefficients.
    pub fn rdbu() -> Self {
        ColorScale {
            stops: vec![
                Srgb::new(103, 0, 31),
                Srgb::new(178, 24, 43),
                Srgb::new(214, 96, 77),
                Srgb::new(244, 165, 130),
                Srgb::new(253, 219, 199),
                Srgb::new(247, 247, 247),
                Srgb::new(209, 229, 240),
                Srgb::new(146, 197, 222),
                Srgb::new(67, 147, 195),
                Srgb::new(33, 102, 172),
                Srgb::new(5, 48, 97),
            ],
        }
    }

    /// Colour at position `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Rgb {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return MISSING_COLOR;
        };
        if last == 0 || !t.is_finite() {
            return self.stops[0];
        }
        let pos = t.clamp(0.0, 1.0) as f32 * last as f32;
        let idx = (pos.floor() as usize).min(last - 1);
        let frac = pos - idx as f32;

        let a: Srgb<f32> = self.stops[idx].into_format();
        let b: Srgb<f32> = self.stops[idx + 1].into_format();
        a.mix(b, frac).into_format()
    }

    /// Colour for `value` placed linearly between `min` and `max`.
    /// A degenerate range maps to the top of the scale.
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Rgb {
        if max > min {
            self.sample((value - min) / (max - min))
        } else {
            self.sample(1.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parses `#rrggbb` / `rrggbb`, returning `None` on malformed input.
pub fn parse_hex(s: &str) -> Option<Rgb> {
    Srgb::<u8>::from_str(s.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_endpoints_match_stops() {
        let v = ColorScale::viridis();
        assert_eq!(v.sample(0.0), Srgb::new(68, 1, 84));
        assert_eq!(v.sample(1.0), Srgb::new(253, 231, 37));
        assert_eq!(v.sample(7.0), v.sample(1.0));
        assert_eq!(v.sample(-3.0), v.sample(0.0));
    }

    #[test]
    fn rdbu_midpoint_is_near_white() {
        let mid = ColorScale::rdbu().sample(0.5);
        assert_eq!(mid, Srgb::new(247, 247, 247));
    }

    #[test]
    fn degenerate_range_uses_top_colour() {
        let v = ColorScale::viridis();
        assert_eq!(v.sample_range(5.0, 5.0, 5.0), v.sample(1.0));
        assert_eq!(v.sample_range(0.0, 0.0, 10.0), v.sample(0.0));
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(parse_hex("#667eea"), Some(Srgb::new(0x66, 0x7e, 0xea)));
        assert_eq!(parse_hex("not a colour"), None);
    }
}
