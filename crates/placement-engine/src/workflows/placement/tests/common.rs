use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::config::PlacementConfig;
use crate::workflows::placement::domain::{
    ApplicationId, Drive, DriveDraft, DriveId, DriveStatus, Internship, OfferRecord, OfferType,
    Student, StudentId,
};
use crate::workflows::placement::memory::InMemoryPlacementStore;
use crate::workflows::placement::repository::{
    ApplicationRecord, ApplicationRepository, DriveRepository, RepositoryError,
    StudentRepository,
};
use crate::workflows::placement::scoring::Weightage;
use crate::workflows::placement::service::PlacementService;
use crate::workflows::placement::status::{ApplicationStatus, StatusAction};

pub(super) type MemoryService =
    PlacementService<InMemoryPlacementStore, InMemoryPlacementStore, InMemoryPlacementStore>;

pub(super) fn skills(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn internship(months: u32) -> Internship {
    Internship {
        company: "Globex".to_string(),
        role: "Backend Intern".to_string(),
        duration_months: months,
        description: "Payments ledger service".to_string(),
    }
}

pub(super) fn student(id: &str, cgpa: f64) -> Student {
    Student {
        id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        cgpa,
        branch: "CSE".to_string(),
        skills: skills(&["java", "SQL"]),
        tenth_percentage: 80.0,
        twelfth_percentage: 90.0,
        diploma: None,
        active_backlogs: 0,
        total_backlogs: 0,
        current_year: 4,
        internships: vec![internship(6)],
        offers: Vec::new(),
    }
}

pub(super) fn offer(drive: &str, offer_type: OfferType) -> OfferRecord {
    OfferRecord {
        drive_id: DriveId(drive.to_string()),
        company_name: format!("{drive} Corp"),
        package: 800_000,
        offer_type,
        accepted_at: Utc
            .with_ymd_and_hms(2025, 3, 14, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn drive() -> Drive {
    Drive {
        id: DriveId("drive-test".to_string()),
        company_name: "Initech".to_string(),
        role: "Software Engineer".to_string(),
        required_skills: skills(&["Java", "Python", "SQL"]),
        min_cgpa: 7.0,
        eligible_branches: skills(&["CSE", "IT"]),
        min_tenth_percentage: 60.0,
        min_twelfth_percentage: 60.0,
        diploma_required: false,
        backlogs_allowed: false,
        max_backlogs_allowed: 0,
        eligible_years: vec![3, 4],
        weightage: Weightage::default(),
        package: 600_000,
        is_dream_offer: false,
        status: DriveStatus::Open,
    }
}

pub(super) fn draft(company: &str, package: u64) -> DriveDraft {
    DriveDraft {
        company_name: company.to_string(),
        role: "Software Engineer".to_string(),
        required_skills: skills(&["Java", "Python", "SQL"]),
        min_cgpa: 7.0,
        eligible_branches: skills(&["CSE", "IT"]),
        min_tenth_percentage: 60.0,
        min_twelfth_percentage: 60.0,
        diploma_required: false,
        backlogs_allowed: false,
        max_backlogs_allowed: 0,
        eligible_years: None,
        weightage: None,
        package,
        is_dream_offer: None,
    }
}

pub(super) fn service_with(students: Vec<Student>) -> (MemoryService, InMemoryPlacementStore) {
    service_with_config(students, PlacementConfig::default())
}

pub(super) fn service_with_config(
    students: Vec<Student>,
    config: PlacementConfig,
) -> (MemoryService, InMemoryPlacementStore) {
    let store = InMemoryPlacementStore::with_students(students);
    let shared = Arc::new(store.clone());
    let service = PlacementService::new(shared.clone(), shared.clone(), shared, config);
    (service, store)
}

/// Walk an application from pending to selected.
pub(super) fn select(service: &MemoryService, id: &ApplicationId) {
    for action in [
        StatusAction::Forward,
        StatusAction::Shortlist,
        StatusAction::Select,
    ] {
        service
            .transition(id, action)
            .expect("workflow transition succeeds");
    }
    let record = service.get(id).expect("application present");
    assert_eq!(record.status, ApplicationStatus::Selected);
}

/// Store whose every call fails, for exercising error propagation.
#[derive(Default)]
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl StudentRepository for UnavailableStore {
    fn fetch_student(&self, _id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        offline()
    }

    fn save_student_if_offers(
        &self,
        _student: Student,
        _expected_offers: usize,
    ) -> Result<(), RepositoryError> {
        offline()
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        offline()
    }
}

impl DriveRepository for UnavailableStore {
    fn insert_drive(&self, _drive: Drive) -> Result<Drive, RepositoryError> {
        offline()
    }

    fn update_drive(&self, _drive: Drive) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch_drive(&self, _id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        offline()
    }

    fn drives(&self) -> Result<Vec<Drive>, RepositoryError> {
        offline()
    }
}

impl ApplicationRepository for UnavailableStore {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        offline()
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        offline()
    }

    fn find_for_student(
        &self,
        _student_id: &StudentId,
        _drive_id: &DriveId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        offline()
    }

    fn for_drive(&self, _drive_id: &DriveId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        offline()
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        offline()
    }
}

/// Drive store that closes each drive right after handing out its first read.
pub(super) struct ClosingDriveStore {
    pub(super) inner: InMemoryPlacementStore,
    closed: AtomicBool,
}

impl ClosingDriveStore {
    pub(super) fn new(inner: InMemoryPlacementStore) -> Self {
        Self {
            inner,
            closed: AtomicBool::new(false),
        }
    }
}

impl DriveRepository for ClosingDriveStore {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        self.inner.insert_drive(drive)
    }

    fn update_drive(&self, drive: Drive) -> Result<(), RepositoryError> {
        self.inner.update_drive(drive)
    }

    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        let fetched = self.inner.fetch_drive(id)?;
        if let Some(open) = &fetched {
            if !self.closed.swap(true, Ordering::SeqCst) {
                let mut closed = open.clone();
                closed.status = DriveStatus::Closed;
                self.inner.update_drive(closed)?;
            }
        }
        Ok(fetched)
    }

    fn drives(&self) -> Result<Vec<Drive>, RepositoryError> {
        self.inner.drives()
    }
}

/// Student store that reads normally but refuses every offer write.
pub(super) struct RefusingOfferStore {
    pub(super) inner: InMemoryPlacementStore,
}

impl StudentRepository for RefusingOfferStore {
    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        self.inner.fetch_student(id)
    }

    fn save_student_if_offers(
        &self,
        _student: Student,
        _expected_offers: usize,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offer ledger offline".to_string()))
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        self.inner.students()
    }
}
