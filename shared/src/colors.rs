use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` at compile time. Panics on malformed input, which is
    /// only reachable from the palette constants below.
    pub const fn from_hex(hex: &str) -> Self {
        let b = hex.as_bytes();
        assert!(b.len() == 7 && b[0] == b'#', "expected #rrggbb");
        Self(
            hex_byte(b[1], b[2]),
            hex_byte(b[3], b[4]),
            hex_byte(b[5], b[6]),
        )
    }

    /// CSS hex notation, e.g. `#4393c3`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit"),
    }
}

const fn hex_byte(hi: u8, lo: u8) -> u8 {
    hex_nibble(hi) * 16 + hex_nibble(lo)
}

/// Diverging red/blue palette for net migration rate: strong emigration at the
/// red end, strong immigration at the blue end.
pub const RATE_PALETTE: [Rgb; 10] = [
    Rgb::from_hex("#67001f"),
    Rgb::from_hex("#b2182b"),
    Rgb::from_hex("#d6604d"),
    Rgb::from_hex("#f4a582"),
    Rgb::from_hex("#fddbc7"),
    Rgb::from_hex("#d1e5f0"),
    Rgb::from_hex("#92c5de"),
    Rgb::from_hex("#4393c3"),
    Rgb::from_hex("#2166ac"),
    Rgb::from_hex("#053061"),
];

/// Sequential palette for absolute flows; the first entry doubles as the
/// "no data / negligible" fill.
pub const FLOW_PALETTE: [Rgb; 10] = [
    Rgb::from_hex("#f7f7f7"),
    Rgb::from_hex("#ffffcc"),
    Rgb::from_hex("#ffeda0"),
    Rgb::from_hex("#fed976"),
    Rgb::from_hex("#feb24c"),
    Rgb::from_hex("#fd8d3c"),
    Rgb::from_hex("#fc4e2a"),
    Rgb::from_hex("#e31a1c"),
    Rgb::from_hex("#bd0026"),
    Rgb::from_hex("#800026"),
];

/// Categorical palette for selected countries.
pub const SELECTION_PALETTE: [Rgb; 10] = [
    Rgb::from_hex("#1f77b4"),
    Rgb::from_hex("#ff7f0e"),
    Rgb::from_hex("#2ca02c"),
    Rgb::from_hex("#d62728"),
    Rgb::from_hex("#9467bd"),
    Rgb::from_hex("#8c564b"),
    Rgb::from_hex("#e377c2"),
    Rgb::from_hex("#7f7f7f"),
    Rgb::from_hex("#bcbd22"),
    Rgb::from_hex("#17becf"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let c = Rgb::from_hex("#4393C3");
        assert_eq!(c, Rgb(0x43, 0x93, 0xc3));
        assert_eq!(c.to_hex(), "#4393c3");
        assert_eq!(c.to_string(), "#4393c3");
    }

    #[test]
    fn palettes_have_distinct_entries() {
        for palette in [&RATE_PALETTE, &FLOW_PALETTE, &SELECTION_PALETTE] {
            for (i, a) in palette.iter().enumerate() {
                for b in &palette[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }
}
