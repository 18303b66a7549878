use serde::{Deserialize, Serialize};

use crate::colors::{Rgb, SELECTION_PALETTE};
use crate::country::CountryId;

/// A selected country and the palette slot it was given when added.
///
/// Slots are assigned once and never re-indexed, so removing one country
/// does not shift the colors of the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: CountryId,
    pub slot: usize,
}

/// Maps the current selection to highlight colors by round-robin over a
/// fixed palette.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOverlay {
    palette: Vec<Rgb>,
}

impl Default for SelectionOverlay {
    fn default() -> Self {
        Self::new(SELECTION_PALETTE.to_vec())
    }
}

impl SelectionOverlay {
    /// An empty palette falls back to the default one.
    pub fn new(palette: Vec<Rgb>) -> Self {
        if palette.is_empty() {
            return Self::default();
        }
        Self { palette }
    }

    pub fn color_for_slot(&self, slot: usize) -> Rgb {
        self.palette[slot % self.palette.len()]
    }

    /// Highlight colors in selection order.
    pub fn highlights_for(&self, selected: &[Selection]) -> Vec<(CountryId, Rgb)> {
        selected
            .iter()
            .map(|s| (s.id.clone(), self.color_for_slot(s.slot)))
            .collect()
    }
}
