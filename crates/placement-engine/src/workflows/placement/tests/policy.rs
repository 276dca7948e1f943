use std::sync::{Arc, Barrier};
use std::thread;

use super::common::*;
use crate::workflows::placement::domain::{Drive, OfferType, PlacementStatus, Student, StudentId};
use crate::workflows::placement::memory::InMemoryPlacementStore;
use crate::workflows::placement::policy::{
    OfferDecision, OfferDenial, OfferTerms, PlacementPolicy, PlacementPolicyEngine, PolicyError,
    APPROVED_REASON,
};
use crate::workflows::placement::repository::{RepositoryError, StudentRepository};

fn dream_drive() -> Drive {
    let mut drive = drive();
    drive.id.0 = "drive-dream".to_string();
    drive.package = 1_800_000;
    drive.is_dream_offer = true;
    drive
}

/// Student store whose reads wait until two callers have arrived.
struct GatedStudents {
    inner: Arc<InMemoryPlacementStore>,
    gate: Barrier,
}

impl StudentRepository for GatedStudents {
    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        let fetched = self.inner.fetch_student(id);
        self.gate.wait();
        fetched
    }

    fn save_student_if_offers(
        &self,
        student: Student,
        expected_offers: usize,
    ) -> Result<(), RepositoryError> {
        self.inner.save_student_if_offers(student, expected_offers)
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        self.inner.students()
    }
}

fn engine_with(
    students: Vec<Student>,
) -> (PlacementPolicyEngine<InMemoryPlacementStore>, Arc<InMemoryPlacementStore>) {
    let store = Arc::new(InMemoryPlacementStore::with_students(students));
    let engine = PlacementPolicyEngine::new(store.clone(), PlacementPolicy::new(2));
    (engine, store)
}

#[test]
fn unplaced_student_is_approved() {
    let decision = PlacementPolicy::new(2).decide(&student("stu-1", 8.0), &drive());

    assert!(decision.can_receive());
    assert_eq!(decision.reason(), APPROVED_REASON);
}

#[test]
fn dream_placed_student_is_always_denied() {
    let mut candidate = student("stu-1", 8.0);
    candidate.offers.push(offer("drive-a", OfferType::Dream));

    for target in [drive(), dream_drive()] {
        let decision = PlacementPolicy::new(2).decide(&candidate, &target);
        assert_eq!(decision, OfferDecision::Denied(OfferDenial::AlreadyDreamPlaced));
        assert_eq!(
            decision.reason(),
            "You already have a dream offer. You cannot apply for more positions."
        );
    }
}

#[test]
fn placed_student_may_only_take_dream_offers() {
    let mut candidate = student("stu-1", 8.0);
    candidate.offers.push(offer("drive-a", OfferType::NonDream));
    let policy = PlacementPolicy::new(2);

    let denied = policy.decide(&candidate, &drive());
    assert_eq!(denied, OfferDecision::Denied(OfferDenial::DreamOffersOnly));
    assert_eq!(
        denied.reason(),
        "You already have an offer. You can only apply for dream offers."
    );

    assert!(policy.decide(&candidate, &dream_drive()).can_receive());
}

#[test]
fn offer_cap_blocks_further_offers() {
    let mut candidate = student("stu-1", 8.0);
    candidate.offers.push(offer("drive-a", OfferType::NonDream));
    candidate.offers.push(offer("drive-b", OfferType::NonDream));

    let decision = PlacementPolicy::new(2).decide(&candidate, &dream_drive());

    assert_eq!(
        decision,
        OfferDecision::Denied(OfferDenial::OfferCapReached { max_offers: 2 })
    );
    assert_eq!(
        decision.reason(),
        "You have reached the maximum limit of 2 offers."
    );
}

#[test]
fn record_offer_derives_the_new_placement_status() {
    let (engine, store) = engine_with(vec![student("stu-1", 8.0)]);
    let id = StudentId("stu-1".to_string());

    let approval = match engine.can_receive_offer(&id, &drive()) {
        Ok(OfferDecision::Approved(approval)) => approval,
        other => panic!("expected approval, got {other:?}"),
    };
    assert_eq!(approval.student_id(), &id);

    let placed = engine
        .record_offer(approval, &id, OfferTerms::for_drive(&drive()))
        .expect("offer recorded");
    assert_eq!(placed.placement_status(), PlacementStatus::Placed);
    assert_eq!(placed.offers.len(), 1);
    assert_eq!(placed.offers[0].offer_type, OfferType::NonDream);
    assert_eq!(placed.offers[0].package, 600_000);

    let approval = match engine.can_receive_offer(&id, &dream_drive()) {
        Ok(OfferDecision::Approved(approval)) => approval,
        other => panic!("expected dream approval, got {other:?}"),
    };
    engine
        .record_offer(approval, &id, OfferTerms::for_drive(&dream_drive()))
        .expect("dream offer recorded");

    let stored = store
        .fetch_student(&id)
        .expect("fetch succeeds")
        .expect("student present");
    assert_eq!(stored.placement_status(), PlacementStatus::DreamPlaced);
    assert_eq!(stored.offers.len(), 2);
    assert!(stored.offers[0].accepted_at <= stored.offers[1].accepted_at);
}

#[test]
fn approval_goes_stale_once_offers_change() {
    let (engine, _store) = engine_with(vec![student("stu-1", 8.0)]);
    let id = StudentId("stu-1".to_string());

    let first = match engine.can_receive_offer(&id, &dream_drive()) {
        Ok(OfferDecision::Approved(approval)) => approval,
        other => panic!("expected approval, got {other:?}"),
    };
    let second = first.clone();

    engine
        .record_offer(first, &id, OfferTerms::for_drive(&dream_drive()))
        .expect("first offer recorded");

    match engine.record_offer(second, &id, OfferTerms::for_drive(&drive())) {
        Err(PolicyError::StaleApproval(stale)) => assert_eq!(stale, id),
        other => panic!("expected stale approval, got {other:?}"),
    }
}

#[test]
fn approval_is_bound_to_its_student() {
    let (engine, store) = engine_with(vec![student("stu-1", 8.0), student("stu-2", 8.0)]);
    let first = StudentId("stu-1".to_string());
    let second = StudentId("stu-2".to_string());

    let approval = match engine.can_receive_offer(&first, &drive()) {
        Ok(OfferDecision::Approved(approval)) => approval,
        other => panic!("expected approval, got {other:?}"),
    };

    match engine.record_offer(approval, &second, OfferTerms::for_drive(&drive())) {
        Err(PolicyError::ApprovalMismatch {
            approved,
            requested,
        }) => {
            assert_eq!(approved, first);
            assert_eq!(requested, second);
        }
        other => panic!("expected approval mismatch, got {other:?}"),
    }

    let untouched = store
        .fetch_student(&second)
        .expect("fetch succeeds")
        .expect("student present");
    assert!(untouched.offers.is_empty());
}

#[test]
fn unknown_student_is_reported() {
    let (engine, _store) = engine_with(Vec::new());

    match engine.can_receive_offer(&StudentId("ghost".to_string()), &drive()) {
        Err(PolicyError::StudentNotFound(id)) => assert_eq!(id.0, "ghost"),
        other => panic!("expected missing student, got {other:?}"),
    }
}

#[test]
fn racing_approvals_record_a_single_offer() {
    let (engine, store) = engine_with(vec![student("stu-1", 8.0)]);
    let id = StudentId("stu-1".to_string());
    let approval = match engine.can_receive_offer(&id, &dream_drive()) {
        Ok(OfferDecision::Approved(approval)) => approval,
        other => panic!("expected approval, got {other:?}"),
    };

    let gated = PlacementPolicyEngine::new(
        Arc::new(GatedStudents {
            inner: store.clone(),
            gate: Barrier::new(2),
        }),
        PlacementPolicy::new(2),
    );

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = [dream_drive(), drive()]
            .into_iter()
            .map(|target| {
                let (gated, id, approval) = (&gated, &id, approval.clone());
                scope.spawn(move || {
                    gated.record_offer(approval, id, OfferTerms::for_drive(&target))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread completes"))
            .collect()
    });

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    match results.iter().find(|result| result.is_err()) {
        Some(Err(PolicyError::StaleApproval(stale))) => assert_eq!(stale, &id),
        other => panic!("expected one stale approval, got {other:?}"),
    }

    let stored = store
        .fetch_student(&id)
        .expect("fetch succeeds")
        .expect("student present");
    assert_eq!(stored.offers.len(), 1);
}
