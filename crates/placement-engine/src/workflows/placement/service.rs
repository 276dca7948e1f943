use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlacementConfig;

use super::domain::{
    ApplicationId, Drive, DriveDraft, DriveId, DriveStatus, DriveValidationError, Student,
    StudentId,
};
use super::eligibility::{self, EligibilityOutcome};
use super::locks::PlacementLocks;
use super::policy::{
    OfferDecision, OfferDenial, OfferTerms, PlacementPolicy, PlacementPolicyEngine, PolicyError,
};
use super::ranking::RankingService;
use super::repository::{
    ApplicationRecord, ApplicationRepository, DriveRepository, EligibilityStatus,
    RepositoryError, StudentRepository,
};
use super::scoring::{self, ScoreCard};
use super::status::{ApplicationStatus, StatusAction, TransitionError};
use super::summary::{DriveOverview, PlacementAnalytics, PlacementSummary};

/// Service composing eligibility, scoring, ranking, and offer policy over the stores.
pub struct PlacementService<S, D, A> {
    students: Arc<S>,
    drives: Arc<D>,
    applications: Arc<A>,
    config: PlacementConfig,
    policy: PlacementPolicyEngine<S>,
    ranking: RankingService<A>,
    locks: Arc<PlacementLocks>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DRIVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_drive_id() -> DriveId {
    let id = DRIVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DriveId(format!("drive-{id:04}"))
}

/// Eligibility verdict plus the score a student would receive, without applying.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityPreview {
    pub eligible: bool,
    pub reason: String,
    pub outcome: EligibilityOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_card: Option<ScoreCard>,
}

/// Result of a student's attempt to accept a selection.
#[derive(Debug, Clone)]
pub enum OfferOutcome {
    Accepted {
        application: ApplicationRecord,
        student: Student,
    },
    Blocked {
        application: ApplicationRecord,
        denial: OfferDenial,
    },
}

impl<S, D, A> PlacementService<S, D, A>
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    A: ApplicationRepository + 'static,
{
    pub fn new(
        students: Arc<S>,
        drives: Arc<D>,
        applications: Arc<A>,
        config: PlacementConfig,
    ) -> Self {
        let locks = Arc::new(PlacementLocks::default());
        let policy =
            PlacementPolicyEngine::new(students.clone(), PlacementPolicy::new(config.max_offers));
        let ranking = RankingService::new(applications.clone(), locks.clone());

        Self {
            students,
            drives,
            applications,
            config,
            policy,
            ranking,
            locks,
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Resolve a draft into an open drive and store it.
    pub fn create_drive(&self, draft: DriveDraft) -> Result<Drive, PlacementServiceError> {
        let drive = draft.resolve(next_drive_id(), &self.config)?;
        let stored = self.drives.insert_drive(drive)?;
        info!(
            drive_id = %stored.id,
            company = %stored.company_name,
            dream_offer = stored.is_dream_offer,
            "drive created"
        );
        Ok(stored)
    }

    pub fn update_drive_status(
        &self,
        drive_id: &DriveId,
        status: DriveStatus,
    ) -> Result<Drive, PlacementServiceError> {
        self.locks
            .with_drive_lock(drive_id, || -> Result<_, PlacementServiceError> {
                let mut drive = self.load_drive(drive_id)?;
                drive.status = status;
                self.drives.update_drive(drive.clone())?;
                info!(drive_id = %drive.id, status = status.label(), "drive status updated");
                Ok(drive)
            })
    }

    /// Gate and score a student against a drive without persisting anything.
    pub fn check_eligibility(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
    ) -> Result<EligibilityPreview, PlacementServiceError> {
        let student = self.load_student(student_id)?;
        let drive = self.load_drive(drive_id)?;

        let outcome = eligibility::evaluate(&student, &drive);
        let score_card = outcome
            .is_eligible()
            .then(|| scoring::score(&student, &drive));

        Ok(EligibilityPreview {
            eligible: outcome.is_eligible(),
            reason: outcome.reason(),
            outcome,
            score_card,
        })
    }

    /// Submit an application: gate, score, store, and re-rank the drive.
    pub fn apply(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        let student = self.load_student(student_id)?;
        ensure_open(&self.load_drive(drive_id)?)?;

        self.locks
            .with_drive_lock(drive_id, || -> Result<_, PlacementServiceError> {
                // Status may have moved while waiting for the lock.
                let drive = self.load_drive(drive_id)?;
                ensure_open(&drive)?;

                if self
                    .applications
                    .find_for_student(&student.id, &drive.id)?
                    .is_some()
                {
                    return Err(PlacementServiceError::DuplicateApplication {
                        student_id: student.id.clone(),
                        drive_id: drive.id.clone(),
                    });
                }

                let mut record = ApplicationRecord {
                    id: next_application_id(),
                    student_id: student.id.clone(),
                    drive_id: drive.id.clone(),
                    eligibility: EligibilityStatus::Eligible,
                    rejection_reason: None,
                    score_card: None,
                    rank: 0,
                    percentile: 0.0,
                    status: ApplicationStatus::Pending,
                    applied_at: Utc::now(),
                };

                match eligibility::evaluate(&student, &drive) {
                    EligibilityOutcome::Ineligible(reason) => {
                        record.eligibility = EligibilityStatus::Rejected;
                        record.rejection_reason = Some(reason.summary());
                        record.status = ApplicationStatus::Rejected;

                        let stored = self.applications.insert(record)?;
                        info!(
                            application_id = %stored.id,
                            student_id = %stored.student_id,
                            drive_id = %stored.drive_id,
                            reason = stored.rejection_reason.as_deref().unwrap_or_default(),
                            "application rejected at eligibility gate"
                        );
                        Ok(stored)
                    }
                    EligibilityOutcome::Eligible => {
                        let card = scoring::score(&student, &drive);
                        let final_score = card.scoring.final_weighted_score;
                        record.score_card = Some(card);

                        let stored = self.applications.insert(record)?;
                        info!(
                            application_id = %stored.id,
                            student_id = %stored.student_id,
                            drive_id = %stored.drive_id,
                            final_score,
                            "application accepted for ranking"
                        );

                        let ranked = self.ranking.recompute(&drive.id)?;
                        Ok(ranked
                            .into_iter()
                            .find(|candidate| candidate.id == stored.id)
                            .unwrap_or(stored))
                    }
                }
            })
    }

    pub fn rank_drive(
        &self,
        drive_id: &DriveId,
    ) -> Result<Vec<ApplicationRecord>, PlacementServiceError> {
        let drive = self.load_drive(drive_id)?;
        Ok(self.ranking.rank_drive(&drive.id)?)
    }

    /// Move an application along its workflow. Offer acceptance goes through `accept_offer`.
    pub fn transition(
        &self,
        application_id: &ApplicationId,
        action: StatusAction,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        if action == StatusAction::AcceptOffer {
            return Err(TransitionError::RequiresPolicyCheck.into());
        }

        let drive_id = self.load_application(application_id)?.drive_id;
        self.locks
            .with_drive_lock(&drive_id, || -> Result<_, PlacementServiceError> {
                let mut record = self.load_application(application_id)?;
                record.status = record.status.apply(action).map_err(|err| {
                    warn!(application_id = %record.id, error = %err, "status transition refused");
                    err
                })?;
                self.applications.update(record.clone())?;
                info!(
                    application_id = %record.id,
                    status = record.status.label(),
                    "application status updated"
                );
                Ok(record)
            })
    }

    pub fn decline_offer(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        self.transition(application_id, StatusAction::DeclineOffer)
    }

    /// Forward a batch of a drive's eligible applications to the company.
    ///
    /// Ids that do not belong to the drive, are ineligible, or cannot be forwarded from their
    /// current state are skipped. Returns how many were forwarded.
    pub fn forward_applications(
        &self,
        drive_id: &DriveId,
        application_ids: &[ApplicationId],
    ) -> Result<usize, PlacementServiceError> {
        if application_ids.is_empty() {
            return Err(PlacementServiceError::EmptyBatch);
        }
        let drive = self.load_drive(drive_id)?;

        self.locks
            .with_drive_lock(&drive.id, || -> Result<_, PlacementServiceError> {
                let mut forwarded = 0;
                for id in application_ids {
                    let Some(mut record) = self.applications.fetch(id)? else {
                        continue;
                    };
                    if record.drive_id != drive.id || !record.is_eligible() {
                        continue;
                    }
                    let Ok(next) = record.status.apply(StatusAction::Forward) else {
                        continue;
                    };
                    record.status = next;
                    self.applications.update(record)?;
                    forwarded += 1;
                }

                info!(
                    drive_id = %drive.id,
                    requested = application_ids.len(),
                    forwarded,
                    "applications forwarded to company"
                );
                Ok(forwarded)
            })
    }

    pub fn can_receive_offer(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
    ) -> Result<OfferDecision, PlacementServiceError> {
        let drive = self.load_drive(drive_id)?;
        Ok(self.policy.can_receive_offer(student_id, &drive)?)
    }

    /// Accept a selection: policy check and offer recording happen under the student's lock.
    pub fn accept_offer(
        &self,
        application_id: &ApplicationId,
    ) -> Result<OfferOutcome, PlacementServiceError> {
        let snapshot = self.load_application(application_id)?;
        let drive = self.load_drive(&snapshot.drive_id)?;

        self.locks.with_student_lock(&snapshot.student_id, || {
            self.locks
                .with_drive_lock(&drive.id, || -> Result<_, PlacementServiceError> {
                    let mut application = self.load_application(application_id)?;
                    let next = application.status.apply(StatusAction::AcceptOffer)?;

                    match self
                        .policy
                        .can_receive_offer(&application.student_id, &drive)?
                    {
                        OfferDecision::Denied(denial) => {
                            warn!(
                                application_id = %application.id,
                                student_id = %application.student_id,
                                reason = %denial.summary(),
                                "offer acceptance blocked by placement policy"
                            );
                            Ok(OfferOutcome::Blocked {
                                application,
                                denial,
                            })
                        }
                        OfferDecision::Approved(approval) => {
                            // Marked accepted before the offer write; restored if the write fails.
                            let previous = application.status;
                            application.status = next;
                            self.applications.update(application.clone())?;

                            let recorded = self.policy.record_offer(
                                approval,
                                &application.student_id,
                                OfferTerms::for_drive(&drive),
                            );
                            let student = match recorded {
                                Ok(student) => student,
                                Err(err) => {
                                    application.status = previous;
                                    if let Err(revert) = self.applications.update(application)
                                    {
                                        warn!(
                                            application_id = %application_id,
                                            error = %revert,
                                            "failed to restore application after offer write error"
                                        );
                                    }
                                    return Err(err.into());
                                }
                            };
                            info!(
                                application_id = %application.id,
                                student_id = %student.id,
                                placement_status = student.placement_status().label(),
                                offers = student.offers.len(),
                                "offer accepted"
                            );
                            Ok(OfferOutcome::Accepted {
                                application,
                                student,
                            })
                        }
                    }
                })
        })
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        self.load_application(application_id)
    }

    pub fn drive_overview(
        &self,
        drive_id: &DriveId,
    ) -> Result<DriveOverview, PlacementServiceError> {
        let drive = self.load_drive(drive_id)?;
        let applications = self.applications.for_drive(&drive.id)?;
        Ok(DriveOverview::new(drive, applications))
    }

    pub fn placement_summary(&self) -> Result<PlacementSummary, PlacementServiceError> {
        let students = self.students.students()?;
        let drives = self.drives.drives()?;
        let applications = self.applications.all()?;
        Ok(PlacementSummary::from_records(
            &students,
            &drives,
            &applications,
        ))
    }

    pub fn placement_analytics(&self) -> Result<PlacementAnalytics, PlacementServiceError> {
        let students = self.students.students()?;
        Ok(PlacementAnalytics::from_students(&students))
    }

    fn load_student(&self, id: &StudentId) -> Result<Student, PlacementServiceError> {
        self.students
            .fetch_student(id)?
            .ok_or_else(|| PlacementServiceError::StudentNotFound(id.clone()))
    }

    fn load_drive(&self, id: &DriveId) -> Result<Drive, PlacementServiceError> {
        self.drives
            .fetch_drive(id)?
            .ok_or_else(|| PlacementServiceError::DriveNotFound(id.clone()))
    }

    fn load_application(
        &self,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, PlacementServiceError> {
        self.applications
            .fetch(id)?
            .ok_or_else(|| PlacementServiceError::ApplicationNotFound(id.clone()))
    }
}

fn ensure_open(drive: &Drive) -> Result<(), PlacementServiceError> {
    if drive.status == DriveStatus::Open {
        Ok(())
    } else {
        Err(PlacementServiceError::DriveNotAccepting {
            drive_id: drive.id.clone(),
            status: drive.status,
        })
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("drive {0} not found")]
    DriveNotFound(DriveId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("student {student_id} has already applied to drive {drive_id}")]
    DuplicateApplication {
        student_id: StudentId,
        drive_id: DriveId,
    },
    #[error("drive {drive_id} is {status} and not accepting applications")]
    DriveNotAccepting {
        drive_id: DriveId,
        status: DriveStatus,
    },
    #[error("no applications selected")]
    EmptyBatch,
    #[error(transparent)]
    InvalidDrive(#[from] DriveValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
