use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{Drive, DriveId, OfferRecord, OfferType, PlacementStatus, Student, StudentId};
use super::repository::{RepositoryError, StudentRepository};

pub const APPROVED_REASON: &str = "Student is eligible to receive offer";

/// Why a student may not take on another offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferDenial {
    AlreadyDreamPlaced,
    DreamOffersOnly,
    OfferCapReached { max_offers: usize },
}

impl OfferDenial {
    pub fn summary(&self) -> String {
        match self {
            OfferDenial::AlreadyDreamPlaced => {
                "You already have a dream offer. You cannot apply for more positions.".to_string()
            }
            OfferDenial::DreamOffersOnly => {
                "You already have an offer. You can only apply for dream offers.".to_string()
            }
            OfferDenial::OfferCapReached { max_offers } => {
                format!("You have reached the maximum limit of {max_offers} offers.")
            }
        }
    }
}

/// Proof that a student passed the offer policy.
///
/// Only the policy can mint one; it pins the offer count observed at check time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferApproval {
    student_id: StudentId,
    offers_seen: usize,
}

impl OfferApproval {
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferDecision {
    Approved(OfferApproval),
    Denied(OfferDenial),
}

impl OfferDecision {
    pub fn can_receive(&self) -> bool {
        matches!(self, OfferDecision::Approved(_))
    }

    pub fn reason(&self) -> String {
        match self {
            OfferDecision::Approved(_) => APPROVED_REASON.to_string(),
            OfferDecision::Denied(denial) => denial.summary(),
        }
    }
}

/// Offer details copied onto the student's record when an offer is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    pub drive_id: DriveId,
    pub company_name: String,
    pub package: u64,
    pub offer_type: OfferType,
}

impl OfferTerms {
    pub fn for_drive(drive: &Drive) -> Self {
        Self {
            drive_id: drive.id.clone(),
            company_name: drive.company_name.clone(),
            package: drive.package,
            offer_type: drive.offer_type(),
        }
    }
}

/// Dream-offer exclusivity and the global offer cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPolicy {
    max_offers: usize,
}

impl PlacementPolicy {
    pub fn new(max_offers: usize) -> Self {
        Self { max_offers }
    }

    pub fn max_offers(&self) -> usize {
        self.max_offers
    }

    pub fn decide(&self, student: &Student, drive: &Drive) -> OfferDecision {
        match student.placement_status() {
            PlacementStatus::DreamPlaced => {
                return OfferDecision::Denied(OfferDenial::AlreadyDreamPlaced)
            }
            PlacementStatus::Placed if !drive.is_dream_offer => {
                return OfferDecision::Denied(OfferDenial::DreamOffersOnly)
            }
            _ => {}
        }

        if student.offers.len() >= self.max_offers {
            return OfferDecision::Denied(OfferDenial::OfferCapReached {
                max_offers: self.max_offers,
            });
        }

        OfferDecision::Approved(OfferApproval {
            student_id: student.id.clone(),
            offers_seen: student.offers.len(),
        })
    }
}

/// Precondition faults raised while checking or recording offers.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("approval issued for student {approved} cannot record an offer for {requested}")]
    ApprovalMismatch {
        approved: StudentId,
        requested: StudentId,
    },
    #[error("offers for student {0} changed since the policy check; re-check before recording")]
    StaleApproval(StudentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Policy checks and offer bookkeeping against the student store.
pub struct PlacementPolicyEngine<S> {
    students: Arc<S>,
    policy: PlacementPolicy,
}

impl<S> PlacementPolicyEngine<S>
where
    S: StudentRepository + 'static,
{
    pub fn new(students: Arc<S>, policy: PlacementPolicy) -> Self {
        Self { students, policy }
    }

    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }

    pub fn can_receive_offer(
        &self,
        student_id: &StudentId,
        drive: &Drive,
    ) -> Result<OfferDecision, PolicyError> {
        let student = self.load(student_id)?;
        Ok(self.policy.decide(&student, drive))
    }

    /// Append an approved offer and persist the student's new placement standing.
    ///
    /// Policy rules are not re-run here; the approval must come from `can_receive_offer`
    /// and is rejected if the student's offers moved in between. The save is conditional on
    /// the offer count, so two approvals minted at the same count cannot both land.
    pub fn record_offer(
        &self,
        approval: OfferApproval,
        student_id: &StudentId,
        terms: OfferTerms,
    ) -> Result<Student, PolicyError> {
        if &approval.student_id != student_id {
            return Err(PolicyError::ApprovalMismatch {
                approved: approval.student_id,
                requested: student_id.clone(),
            });
        }

        let mut student = self.load(student_id)?;
        if student.offers.len() != approval.offers_seen {
            return Err(PolicyError::StaleApproval(student_id.clone()));
        }

        student.offers.push(OfferRecord {
            drive_id: terms.drive_id,
            company_name: terms.company_name,
            package: terms.package,
            offer_type: terms.offer_type,
            accepted_at: Utc::now(),
        });

        match self
            .students
            .save_student_if_offers(student.clone(), approval.offers_seen)
        {
            Ok(()) => Ok(student),
            Err(RepositoryError::Conflict) => Err(PolicyError::StaleApproval(student_id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    fn load(&self, student_id: &StudentId) -> Result<Student, PolicyError> {
        self.students
            .fetch_student(student_id)?
            .ok_or_else(|| PolicyError::StudentNotFound(student_id.clone()))
    }
}
