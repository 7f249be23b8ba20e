//! Error codes and aggregation across subsystems.

use lead_core::errors::{
    CollaboratorError, InputError, LeadErrorCode, PatternError, PipelineError, PipelineResult,
    ProfileError,
};

#[test]
fn test_subsystem_errors_carry_their_codes() {
    let input = InputError::MissingAuthor { id: "t3_x".into() };
    assert_eq!(input.error_code(), "MALFORMED_INPUT");
    assert_eq!(input.item_id(), Some("t3_x"));

    let pattern = PatternError::Compilation {
        set: "urgency".into(),
        rule: "asap".into(),
        message: "unclosed group".into(),
    };
    assert_eq!(pattern.error_code(), "PATTERN_ERROR");
    assert!(pattern.to_string().contains("urgency"));

    let profile = ProfileError::MissingWeight {
        profile: "general".into(),
        dimension: "budget".into(),
    };
    assert_eq!(profile.error_code(), "PROFILE_ERROR");
}

#[test]
fn test_pipeline_error_delegates_codes() {
    let err: PipelineError = InputError::MissingId.into();
    assert_eq!(err.error_code(), "MALFORMED_INPUT");

    let err: PipelineError = CollaboratorError::Source("timeout".into()).into();
    assert_eq!(err.error_code(), "SOURCE_ERROR");

    let err = PipelineError::UnknownProfile("nope".into());
    assert_eq!(err.coded_string(), "[UNKNOWN_PROFILE] Unknown scoring profile: nope");
}

#[test]
fn test_pipeline_result_collects_non_fatal_errors() {
    let mut result: PipelineResult<usize> = PipelineResult::new(3);
    assert!(result.is_clean());
    result.add_error(CollaboratorError::Sink("disk full".into()).into());
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.data, 3);
}
