//! Content fingerprints and the seen-set used to drop duplicates.

pub mod fingerprint;
pub mod store;

pub use fingerprint::{fingerprint_text, Fingerprinter};
pub use store::{is_duplicate, DeduplicationStore};
