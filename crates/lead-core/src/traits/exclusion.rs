//! Exclusion list trait, consulted by the pre-filter.

use crate::types::FxHashSet;

/// Item ids that must never be scored again (e.g. already saved in the CRM).
pub trait ExclusionList: Send + Sync {
    fn is_excluded(&self, item_id: &str) -> bool;
}

/// Excludes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusions;

impl ExclusionList for NoExclusions {
    fn is_excluded(&self, _item_id: &str) -> bool {
        false
    }
}

impl ExclusionList for FxHashSet<String> {
    fn is_excluded(&self, item_id: &str) -> bool {
        self.contains(item_id)
    }
}
