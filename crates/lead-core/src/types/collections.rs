//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec sized for per-rule hits in one dimension (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec sized for context multiplier factors (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
