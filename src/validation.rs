//! Validation and type inference for incoming events.
//!
//! A pure function returning a typed error enum, no I/O.

use thiserror::Error;

use crate::domain::{EventType, IncomingEvent};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required fields: event_id, source, student_id, class_id")]
    MissingFields,

    #[error("SUBMISSION_GRADED requires score")]
    GradedRequiresScore,

    #[error("unknown event type: {0}")]
    UnknownType(String),

    #[error("cannot infer type from payload")]
    CannotInferType,
}

/// Validate required fields and resolve the event's type.
///
/// Resolution order:
/// 1. A client-provided, recognized `type` wins, subject to the
///    SUBMISSION_GRADED-requires-score constraint.
/// 2. Otherwise infer from shape: graded (standards + score) before
///    created (assignment, no score, standards) before assigned
///    (assignment + standards).
pub fn validate_and_classify(incoming: &IncomingEvent) -> Result<EventType, ValidationError> {
    if incoming.event_id.is_empty()
        || incoming.source.is_empty()
        || incoming.student_id.is_empty()
        || incoming.class_id.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    if let Some(declared) = incoming.r#type.as_deref() {
        if let Some(resolved) = EventType::from_str(declared) {
            if resolved == EventType::SubmissionGraded && incoming.score.is_none() {
                return Err(ValidationError::GradedRequiresScore);
            }
            return Ok(resolved);
        }
        return Err(ValidationError::UnknownType(declared.to_string()));
    }

    if !incoming.standard_ids.is_empty() && incoming.score.is_some() {
        return Ok(EventType::SubmissionGraded);
    }
    if !incoming.assignment_id.is_empty()
        && incoming.score.is_none()
        && !incoming.standard_ids.is_empty()
    {
        return Ok(EventType::SubmissionCreated);
    }
    if !incoming.assignment_id.is_empty() && !incoming.standard_ids.is_empty() {
        return Ok(EventType::AssignmentAssigned);
    }

    Err(ValidationError::CannotInferType)
}

/// Canonical serialized form of the incoming event, stored as the event
/// row's payload and later deserialized back by the processor.
pub fn canonical_payload(incoming: &IncomingEvent) -> serde_json::Value {
    serde_json::to_value(incoming).expect("IncomingEvent always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn base() -> IncomingEvent {
        IncomingEvent {
            event_id: "e1".into(),
            source: "lms".into(),
            timestamp: Utc::now(),
            student_id: "st1".into(),
            class_id: "c1".into(),
            assignment_id: String::new(),
            standard_ids: vec![],
            score: None,
            rubric_tags: None,
            r#type: None,
        }
    }

    #[test]
    fn missing_required_field_is_invalid() {
        let mut e = base();
        e.student_id.clear();
        assert_eq!(
            validate_and_classify(&e),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn graded_wins_even_with_assignment_id_present() {
        // Classifier priority: standards + score
        // present must resolve to SUBMISSION_GRADED even if assignment_id
        // is also set, which would otherwise look like SUBMISSION_CREATED.
        let mut e = base();
        e.assignment_id = "a1".into();
        e.standard_ids = vec!["std1".into()];
        e.score = Some(80.0);
        assert_eq!(
            validate_and_classify(&e),
            Ok(EventType::SubmissionGraded)
        );
    }

    #[test]
    fn created_requires_assignment_no_score_and_standards() {
        let mut e = base();
        e.assignment_id = "a1".into();
        e.standard_ids = vec!["std1".into()];
        assert_eq!(
            validate_and_classify(&e),
            Ok(EventType::SubmissionCreated)
        );
    }

    #[test]
    fn assigned_is_reachable_only_via_declared_type() {
        // Shape-based inference alone can never resolve ASSIGNMENT_ASSIGNED:
        // an assignment_id + standard_ids pair with no score always matches
        // the SUBMISSION_CREATED inference rule first. The assigned path is
        // only reachable when the producer declares the type explicitly.
        let mut e = base();
        e.assignment_id = "a1".into();
        e.standard_ids = vec!["std1".into()];
        e.score = None;
        e.r#type = Some("ASSIGNMENT_ASSIGNED".to_string());
        assert_eq!(
            validate_and_classify(&e),
            Ok(EventType::AssignmentAssigned)
        );
    }

    #[test]
    fn cannot_infer_without_enough_shape() {
        let e = base();
        assert_eq!(
            validate_and_classify(&e),
            Err(ValidationError::CannotInferType)
        );
    }

    #[test]
    fn declared_graded_without_score_is_invalid() {
        let mut e = base();
        e.r#type = Some("SUBMISSION_GRADED".to_string());
        assert_eq!(
            validate_and_classify(&e),
            Err(ValidationError::GradedRequiresScore)
        );
    }

    #[test]
    fn declared_type_is_honored_over_inference() {
        let mut e = base();
        e.assignment_id = "a1".into();
        e.standard_ids = vec!["std1".into()];
        e.score = Some(90.0);
        e.r#type = Some("ASSIGNMENT_ASSIGNED".to_string());
        assert_eq!(
            validate_and_classify(&e),
            Ok(EventType::AssignmentAssigned)
        );
    }

    #[test]
    fn unknown_declared_type_is_invalid() {
        let mut e = base();
        e.r#type = Some("NOT_A_TYPE".to_string());
        assert_eq!(
            validate_and_classify(&e),
            Err(ValidationError::UnknownType("NOT_A_TYPE".to_string()))
        );
    }
}
