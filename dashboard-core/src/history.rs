use std::collections::VecDeque;

use crate::model::ConversionResult;

/// Number of conversions kept.
pub const HISTORY_LIMIT: usize = 5;

/// Recent conversions, oldest first. Lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct ConversionHistory {
    entries: VecDeque<ConversionResult>,
}

impl ConversionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conversion, dropping the oldest once the limit is reached.
    pub fn push(&mut self, result: ConversionResult) {
        if self.entries.len() == HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(result);
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConversionResult> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ConversionResult> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
