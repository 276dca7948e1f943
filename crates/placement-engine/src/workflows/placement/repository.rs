use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, Drive, DriveId, Student, StudentId};
use super::eligibility::ELIGIBLE_REASON;
use super::scoring::ScoreCard;
use super::status::ApplicationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    Rejected,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "eligible",
            EligibilityStatus::Rejected => "rejected",
        }
    }
}

/// Stored application joining one student to one drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub drive_id: DriveId,
    pub eligibility: EligibilityStatus,
    pub rejection_reason: Option<String>,
    /// Frozen at submission; absent for ineligible applications.
    pub score_card: Option<ScoreCard>,
    /// 1-based position within the drive's eligible pool; 0 when unranked.
    pub rank: u32,
    pub percentile: f64,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn is_eligible(&self) -> bool {
        self.eligibility == EligibilityStatus::Eligible
    }

    pub fn final_score(&self) -> Option<f64> {
        self.score_card
            .as_ref()
            .map(|card| card.scoring.final_weighted_score)
    }

    pub fn decision_rationale(&self) -> String {
        match &self.rejection_reason {
            Some(reason) => reason.clone(),
            None => ELIGIBLE_REASON.to_string(),
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        let ranked = self.is_eligible() && self.rank > 0;
        ApplicationStatusView {
            application_id: self.id.clone(),
            status: self.status.label(),
            eligibility: self.eligibility.label(),
            decision_rationale: self.decision_rationale(),
            final_score: self.final_score(),
            rank: ranked.then_some(self.rank),
            percentile: ranked.then_some(self.percentile),
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub eligibility: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
}

/// Student storage; profile CRUD happens elsewhere, the engine only reads and records offers.
pub trait StudentRepository: Send + Sync {
    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    /// Save only if the stored student still holds `expected_offers` offers, else `Conflict`.
    fn save_student_if_offers(
        &self,
        student: Student,
        expected_offers: usize,
    ) -> Result<(), RepositoryError>;
    fn students(&self) -> Result<Vec<Student>, RepositoryError>;
}

pub trait DriveRepository: Send + Sync {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError>;
    fn update_drive(&self, drive: Drive) -> Result<(), RepositoryError>;
    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError>;
    fn drives(&self) -> Result<Vec<Drive>, RepositoryError>;
}

/// Application storage. Listings return records in submission order.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn find_for_student(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;

    fn eligible_for_drive(
        &self,
        drive_id: &DriveId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(self
            .for_drive(drive_id)?
            .into_iter()
            .filter(ApplicationRecord::is_eligible)
            .collect())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
