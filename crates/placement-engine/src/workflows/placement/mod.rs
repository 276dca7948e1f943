//! Campus placement automation: eligibility gating, scoring, drive ranking, and offer policy.
//!
//! Storage is reached through the repository traits; `memory` provides a process-local
//! implementation for demos and tests.

pub mod domain;
pub mod eligibility;
pub mod locks;
pub mod memory;
pub mod policy;
pub mod ranking;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod status;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, Drive, DriveDraft, DriveId, DriveStatus, DriveValidationError, Internship,
    OfferRecord, OfferType, PlacementStatus, Student, StudentId,
};
pub use eligibility::{EligibilityOutcome, IneligibilityReason};
pub use memory::InMemoryPlacementStore;
pub use policy::{
    OfferApproval, OfferDecision, OfferDenial, OfferTerms, PlacementPolicy, PlacementPolicyEngine,
    PolicyError,
};
pub use ranking::RankingService;
pub use repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatusView, DriveRepository,
    EligibilityStatus, RepositoryError, StudentRepository,
};
pub use scoring::{ScoreCard, Scoring, SkillGap, Weightage};
pub use service::{EligibilityPreview, OfferOutcome, PlacementService, PlacementServiceError};
pub use status::{ApplicationStatus, StatusAction, TransitionError};
pub use summary::{BranchStats, DriveOverview, PlacementAnalytics, PlacementSummary};
