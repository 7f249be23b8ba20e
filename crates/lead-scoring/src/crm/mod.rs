//! In-memory reference CRM.
//!
//! Stores saved leads and the exclusion list the pre-filter consults, so a
//! lead saved in one run is never scored again in the next.

pub mod memory;

pub use memory::{CrmStats, InMemoryCrm};
