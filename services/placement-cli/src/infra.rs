use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use placement_engine::config::PlacementConfig;
use placement_engine::error::AppError;
use placement_engine::workflows::placement::{
    ApplicationId, ApplicationStatusView, DriveDraft, DriveId, DriveOverview,
    InMemoryPlacementStore, OfferOutcome, PlacementAnalytics, PlacementService,
    PlacementServiceError, PlacementSummary, StatusAction, Student, StudentId,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub(crate) type DemoService =
    PlacementService<InMemoryPlacementStore, InMemoryPlacementStore, InMemoryPlacementStore>;

pub(crate) fn build_service(students: Vec<Student>, config: PlacementConfig) -> DemoService {
    let store = Arc::new(InMemoryPlacementStore::with_students(students));
    PlacementService::new(store.clone(), store.clone(), store, config)
}

/// Scripted placement season: a cohort, the drives it applies to, and which selections to accept.
#[derive(Debug, Deserialize)]
pub(crate) struct Scenario {
    pub(crate) students: Vec<Student>,
    pub(crate) drives: Vec<ScenarioDrive>,
    #[serde(default)]
    pub(crate) applications: Vec<ScenarioStep>,
    #[serde(default)]
    pub(crate) offers: Vec<ScenarioStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScenarioDrive {
    /// Name used by steps to refer to this drive; ids are assigned on creation.
    pub(crate) key: String,
    #[serde(flatten)]
    pub(crate) draft: DriveDraft,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScenarioStep {
    pub(crate) student_id: StudentId,
    pub(crate) drive: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScenarioReport {
    pub(crate) drives: Vec<DriveOverview>,
    pub(crate) applications: Vec<ApplicationStatusView>,
    pub(crate) offers: Vec<OfferReport>,
    pub(crate) summary: PlacementSummary,
    pub(crate) analytics: PlacementAnalytics,
    pub(crate) skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OfferReport {
    pub(crate) student_id: StudentId,
    pub(crate) drive: String,
    pub(crate) accepted: bool,
    pub(crate) detail: String,
}

pub(crate) fn load_scenario(path: &Path) -> Result<Scenario, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn play_scenario(
    scenario: Scenario,
    config: PlacementConfig,
) -> Result<ScenarioReport, AppError> {
    let Scenario {
        students,
        drives,
        applications,
        offers,
    } = scenario;
    let service = build_service(students, config);

    let mut drive_ids: HashMap<String, DriveId> = HashMap::new();
    let mut drive_order = Vec::new();
    for ScenarioDrive { key, draft } in drives {
        let drive = service.create_drive(draft)?;
        drive_order.push(drive.id.clone());
        drive_ids.insert(key, drive.id);
    }

    let mut skipped = Vec::new();
    let mut submitted: Vec<(StudentId, String, ApplicationId)> = Vec::new();
    for step in applications {
        let Some(drive_id) = drive_ids.get(&step.drive) else {
            skipped.push(format!("{} -> {}: unknown drive", step.student_id, step.drive));
            continue;
        };
        match service.apply(&step.student_id, drive_id) {
            Ok(record) => submitted.push((step.student_id, step.drive, record.id)),
            Err(err) => {
                warn!(student_id = %step.student_id, drive = %step.drive, error = %err, "scenario application skipped");
                skipped.push(format!("{} -> {}: {err}", step.student_id, step.drive));
            }
        }
    }

    let mut offer_reports = Vec::new();
    for step in offers {
        let application_id = submitted
            .iter()
            .find(|(student_id, drive, _)| student_id == &step.student_id && drive == &step.drive)
            .map(|(_, _, id)| id.clone());
        let Some(application_id) = application_id else {
            skipped.push(format!(
                "{} -> {}: no application to accept",
                step.student_id, step.drive
            ));
            continue;
        };

        match select_and_accept(&service, &application_id) {
            Ok(OfferOutcome::Accepted { student, .. }) => {
                let detail = student
                    .offers
                    .last()
                    .map(|offer| {
                        format!("{} offer from {}", offer.offer_type.label(), offer.company_name)
                    })
                    .unwrap_or_default();
                offer_reports.push(OfferReport {
                    student_id: step.student_id,
                    drive: step.drive,
                    accepted: true,
                    detail,
                });
            }
            Ok(OfferOutcome::Blocked { denial, .. }) => offer_reports.push(OfferReport {
                student_id: step.student_id,
                drive: step.drive,
                accepted: false,
                detail: denial.summary(),
            }),
            Err(err) => {
                warn!(application_id = %application_id, error = %err, "scenario offer skipped");
                skipped.push(format!("{} -> {}: {err}", step.student_id, step.drive));
            }
        }
    }

    let applications = submitted
        .iter()
        .map(|(_, _, id)| service.get(id).map(|record| record.status_view()))
        .collect::<Result<Vec<_>, _>>()?;
    let drives = drive_order
        .iter()
        .map(|id| service.drive_overview(id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScenarioReport {
        drives,
        applications,
        offers: offer_reports,
        summary: service.placement_summary()?,
        analytics: service.placement_analytics()?,
        skipped,
    })
}

/// Move an application from pending through to selected, then accept the offer.
pub(crate) fn select_and_accept(
    service: &DemoService,
    id: &ApplicationId,
) -> Result<OfferOutcome, PlacementServiceError> {
    for action in [
        StatusAction::Forward,
        StatusAction::Shortlist,
        StatusAction::Select,
    ] {
        service.transition(id, action)?;
    }
    service.accept_offer(id)
}
