//! Error handling for the lead scoring engine.
//! One error enum per subsystem, `thiserror` only.

pub mod collaborator_error;
pub mod config_error;
pub mod error_code;
pub mod input_error;
pub mod pattern_error;
pub mod pipeline_error;
pub mod profile_error;

pub use collaborator_error::CollaboratorError;
pub use config_error::ConfigError;
pub use error_code::LeadErrorCode;
pub use input_error::InputError;
pub use pattern_error::PatternError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use profile_error::ProfileError;
