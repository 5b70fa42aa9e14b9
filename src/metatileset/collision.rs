//! Per-quadrant collision data in either of its two on-disk forms.

use crate::types::{Quadrant, MAX_METATILES, NUM_QUADRANTS};

/// Four collision labels, one per quadrant, as written in `tilecoll` lines.
pub type QuadrantLabels = [String; NUM_QUADRANTS];

/// Four raw collision bytes, one per quadrant.
pub type QuadrantBytes = [u8; NUM_QUADRANTS];

/// Collision data for all 256 metatile slots.
///
/// The text and binary forms cannot be converted into each other without the
/// project's collision constants, so whichever file was loaded last decides
/// the representation. Both variants always hold `MAX_METATILES` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collisions {
    Text(Vec<QuadrantLabels>),
    Binary(Vec<QuadrantBytes>),
}

impl Default for Collisions {
    fn default() -> Self {
        Self::text()
    }
}

impl Collisions {
    /// Empty labels for every slot.
    pub fn text() -> Self {
        Collisions::Text(vec![QuadrantLabels::default(); MAX_METATILES])
    }

    /// Zero bytes for every slot.
    pub fn binary() -> Self {
        Collisions::Binary(vec![[0; NUM_QUADRANTS]; MAX_METATILES])
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Collisions::Binary(_))
    }

    /// Label for a quadrant. Empty under the binary representation.
    pub fn label(&self, id: u8, quadrant: Quadrant) -> &str {
        match self {
            Collisions::Text(labels) => &labels[id as usize][quadrant.index()],
            Collisions::Binary(_) => "",
        }
    }

    /// Raw byte for a quadrant. Zero under the text representation.
    pub fn byte(&self, id: u8, quadrant: Quadrant) -> u8 {
        match self {
            Collisions::Text(_) => 0,
            Collisions::Binary(bytes) => bytes[id as usize][quadrant.index()],
        }
    }

    pub fn labels_mut(&mut self, id: u8) -> Option<&mut QuadrantLabels> {
        match self {
            Collisions::Text(labels) => Some(&mut labels[id as usize]),
            Collisions::Binary(_) => None,
        }
    }

    pub fn bytes_mut(&mut self, id: u8) -> Option<&mut QuadrantBytes> {
        match self {
            Collisions::Text(_) => None,
            Collisions::Binary(bytes) => Some(&mut bytes[id as usize]),
        }
    }

    /// Reset one slot, keeping the representation.
    pub fn clear_slot(&mut self, id: u8) {
        match self {
            Collisions::Text(labels) => labels[id as usize] = QuadrantLabels::default(),
            Collisions::Binary(bytes) => bytes[id as usize] = [0; NUM_QUADRANTS],
        }
    }

    /// Reset every slot, keeping the representation.
    pub fn clear(&mut self) {
        *self = if self.is_binary() {
            Self::binary()
        } else {
            Self::text()
        };
    }
}
