use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

pub const DEFAULT_SYMBOLS: &[&str] = &[
    "🎮", "🎯", "🎲", "🎪", "🎨", "🎭", "🎬", "🎤", "🎸", "🎹", "🎺", "🎻", //
    "⚽", "🏀", "🏈", "⚾", "🎾", "🏐", "🏓", "🏸", "🥊", "🏆", "🥇", "🥈", //
    "🌟", "⭐", "✨", "💫", "🌙", "☀️", "🌈", "⚡", "🔥", "💎", "🎊", "🎉", //
    "🦄", "🐉", "🦋", "🌸", "🌺", "🌻", "🌷", "🌹", "🍀", "🌿", "🍃", "🌱", //
    "🎁", "🎈", "🎀", "💝", "💖", "💕", "💗", "💓", "💘", "💞", "💌", "💐", //
];

pub const CARD_SATURATION: f64 = 0.8;
pub const CARD_BRIGHTNESS: f64 = 0.9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Converts hue in degrees plus saturation and brightness in `0..=1`.
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let hue = ((hue % 360.0) + 360.0) % 360.0;
        let sector = hue / 60.0;
        // truncation picks the sector, hue is non-negative here
        let index = sector as u8;
        let fraction = sector - f64::from(index);

        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * fraction);
        let t = brightness * (1.0 - saturation * (1.0 - fraction));
        let v = brightness;

        let (r, g, b) = match index {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Symbol lookup table plus the hue wheel used to tell pairs apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    symbols: &'static [&'static str],
}

impl Palette {
    pub fn new(symbols: &'static [&'static str]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(GameError::EmptyPalette);
        }
        Ok(Self { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol_for(&self, pair_id: PairId) -> &'static str {
        self.symbols[usize::from(pair_id) % self.symbols.len()]
    }

    pub fn color_for(&self, pair_id: PairId, total_pairs: CardCount) -> Rgb {
        let hue = if total_pairs == 0 {
            0.0
        } else {
            f64::from(pair_id) / f64::from(total_pairs) * 360.0
        };
        Rgb::from_hsb(hue, CARD_SATURATION, CARD_BRIGHTNESS)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS,
        }
    }
}
