use super::*;

fn filled_controller() -> SubmissionController {
    let mut controller = SubmissionController::new(MoodScale::Bipolar);
    controller
        .set_field(DraftField::Narrative, "the sea folded into a letter")
        .expect("narrative");
    controller
}

fn created(id: &str) -> EntryCreated {
    EntryCreated {
        id: EntryId::new(id),
        created_at: None,
    }
}

#[test]
fn submit_sends_normalized_snapshot() {
    let mut controller = filled_controller();
    controller.set_field(DraftField::Mood, "").expect("mood");

    match controller.submit() {
        Some(BackendCommand::CreateDream { request }) => {
            assert_eq!(request.mood, None);
            assert_eq!(request.sleep_quality, None);
            assert_eq!(request.narrative, "the sea folded into a letter");
        }
        _ => panic!("expected a create command"),
    }
    assert!(controller.is_submitting());
}

#[test]
fn second_submit_while_pending_issues_nothing() {
    let mut controller = filled_controller();
    assert!(controller.submit().is_some());
    assert!(controller.submit().is_none());
    assert!(controller.submit().is_none());
    assert!(controller.is_submitting());

    controller.apply_create_outcome(Ok(created("d1")));
    assert!(!controller.is_submitting());
    assert!(controller.submit().is_some());
}

#[test]
fn success_records_id_and_keeps_draft() {
    let mut controller = filled_controller();
    controller.submit();

    let id = controller.apply_create_outcome(Ok(created("d1")));
    assert_eq!(id, Some(EntryId::new("d1")));
    assert_eq!(controller.last_entry_id(), Some(&EntryId::new("d1")));
    assert!(controller.last_error().is_none());
    assert_eq!(controller.draft().narrative, "the sea folded into a letter");
}

#[test]
fn server_error_sets_last_error_and_allows_retry() {
    let mut controller = filled_controller();
    controller.submit();

    let id = controller.apply_create_outcome(Err(ServiceError::request_failed(
        500,
        "Internal Server Error",
    )));
    assert_eq!(id, None);
    assert!(!controller.is_submitting());
    let err = controller.last_error().expect("error");
    assert_eq!(err.message(), "Internal Server Error");
    assert_eq!(err.context(), UiErrorContext::Submission);

    assert!(controller.submit().is_some());
    assert!(
        controller.last_error().is_none(),
        "a new attempt clears the previous error"
    );
}

#[test]
fn create_response_without_pending_submission_is_dropped() {
    let mut controller = filled_controller();
    assert_eq!(controller.apply_create_outcome(Ok(created("d9"))), None);
    assert!(controller.last_entry_id().is_none());
}
