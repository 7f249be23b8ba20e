//! Cheap filters that run before full scoring.

pub mod non_prospect;
pub mod prefilter;

pub use non_prospect::NonProspectDetector;
pub use prefilter::{PreFilter, Rejection};
