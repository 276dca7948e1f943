use crate::workflows::placement::status::{ApplicationStatus, StatusAction, TransitionError};

#[test]
fn happy_path_reaches_offer_accepted() {
    let mut status = ApplicationStatus::Pending;
    for (action, expected) in [
        (StatusAction::Review, ApplicationStatus::UnderReview),
        (StatusAction::Forward, ApplicationStatus::Forwarded),
        (StatusAction::Shortlist, ApplicationStatus::Shortlisted),
        (StatusAction::Select, ApplicationStatus::Selected),
        (StatusAction::AcceptOffer, ApplicationStatus::OfferAccepted),
    ] {
        status = status.apply(action).expect("transition allowed");
        assert_eq!(status, expected);
    }
    assert!(status.is_terminal());
}

#[test]
fn pending_applications_can_skip_review() {
    assert_eq!(
        ApplicationStatus::Pending.apply(StatusAction::Forward),
        Ok(ApplicationStatus::Forwarded)
    );
}

#[test]
fn any_open_state_can_be_rejected() {
    for from in [
        ApplicationStatus::Pending,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Forwarded,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Selected,
    ] {
        assert_eq!(
            from.apply(StatusAction::Reject),
            Ok(ApplicationStatus::Rejected)
        );
    }
}

#[test]
fn terminal_states_refuse_every_action() {
    for from in [
        ApplicationStatus::Rejected,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::OfferDeclined,
    ] {
        for action in [StatusAction::Review, StatusAction::Reject, StatusAction::Forward] {
            match from.apply(action) {
                Err(TransitionError::NotPermitted { from: seen, .. }) => assert_eq!(seen, from),
                other => panic!("expected refusal from {from}, got {other:?}"),
            }
        }
    }
}

#[test]
fn steps_cannot_be_skipped() {
    let err = ApplicationStatus::Pending
        .apply(StatusAction::Shortlist)
        .expect_err("shortlisting needs a forwarded application");
    assert_eq!(
        err.to_string(),
        "cannot shortlist an application that is pending"
    );

    assert!(ApplicationStatus::Shortlisted
        .apply(StatusAction::AcceptOffer)
        .is_err());
    assert_eq!(
        ApplicationStatus::Selected.apply(StatusAction::DeclineOffer),
        Ok(ApplicationStatus::OfferDeclined)
    );
}
