//! Collaborator interfaces.
//! The engine only talks to scrapers and CRMs through these traits.

pub mod content_source;
pub mod exclusion;
pub mod lead_sink;

pub use content_source::ContentSource;
pub use exclusion::{ExclusionList, NoExclusions};
pub use lead_sink::LeadSink;
