//! Name compression.
//!
//! When composing a message, every domain name suffix written is remembered
//! together with its position so that later names ending in the same suffix
//! can point to it instead. The map is only valid for a single message and
//! has to be cleared (or a new one created) before composing the next.

use super::wire::MAX_POINTER_OFFSET;
use std::collections::HashMap;
use std::vec::Vec;

//------------ CompressionMap ------------------------------------------------

/// A map from previously written name suffixes to their message offsets.
///
/// Suffixes are stored in canonical, i.e., lowercase form so that names
/// differing only in case share their suffixes. Only offsets reachable by a
/// compression pointer are ever recorded.
#[derive(Clone, Debug, Default)]
pub struct CompressionMap {
    map: HashMap<Vec<Vec<u8>>, usize>,
}

impl CompressionMap {
    /// Creates a new, empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the offset a suffix was first written at.
    pub fn get(&self, suffix: &[Vec<u8>]) -> Option<usize> {
        if suffix.is_empty() {
            return None;
        }
        self.map.get(&canonical(suffix)).copied()
    }

    /// Records that `suffix` was written at `offset`.
    ///
    /// Earlier positions for the same suffix are kept, as are suffixes
    /// written at offsets that a pointer cannot reach.
    pub fn insert(&mut self, suffix: &[Vec<u8>], offset: usize) {
        if suffix.is_empty() || offset > MAX_POINTER_OFFSET {
            return;
        }
        self.map.entry(canonical(suffix)).or_insert(offset);
    }

    /// Removes all entries, making the map ready for the next message.
    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// Returns the number of recorded suffixes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns whether no suffix has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn canonical(suffix: &[Vec<u8>]) -> Vec<Vec<u8>> {
    suffix.iter().map(|label| label.to_ascii_lowercase()).collect()
}

//============ Testing =======================================================
