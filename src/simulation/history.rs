use crate::core::bounds::RiskFactorBounds;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The bounds used by each simulation in a session, most recent first.
///
/// Only inputs are kept, never scenario tables. No deduplication and no
/// eviction: a session is expected to hold tens of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    entries: VecDeque<RiskFactorBounds>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `bounds`.
    pub fn record(&mut self, bounds: RiskFactorBounds) {
        self.entries.push_front(bounds);
    }

    /// All recorded bounds, most recent first.
    pub fn all(&self) -> Vec<RiskFactorBounds> {
        self.entries.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RiskFactorBounds> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&RiskFactorBounds> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
