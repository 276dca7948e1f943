use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{ApplicationId, Drive, DriveId, Student, StudentId};
use super::repository::{
    ApplicationRecord, ApplicationRepository, DriveRepository, RepositoryError,
    StudentRepository,
};

/// Process-local store backing demos and tests.
#[derive(Default, Clone)]
pub struct InMemoryPlacementStore {
    students: Arc<Mutex<HashMap<StudentId, Student>>>,
    drives: Arc<Mutex<HashMap<DriveId, Drive>>>,
    applications: Arc<Mutex<Vec<ApplicationRecord>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

impl InMemoryPlacementStore {
    pub fn with_students(students: impl IntoIterator<Item = Student>) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.students.lock() {
            for student in students {
                guard.insert(student.id.clone(), student);
            }
        }
        store
    }
}

impl StudentRepository for InMemoryPlacementStore {
    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        Ok(lock(&self.students)?.get(id).cloned())
    }

    fn save_student_if_offers(
        &self,
        student: Student,
        expected_offers: usize,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.students)?;
        match guard.get_mut(&student.id) {
            Some(existing) if existing.offers.len() == expected_offers => {
                *existing = student;
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn students(&self) -> Result<Vec<Student>, RepositoryError> {
        Ok(lock(&self.students)?.values().cloned().collect())
    }
}

impl DriveRepository for InMemoryPlacementStore {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        let mut guard = lock(&self.drives)?;
        if guard.contains_key(&drive.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(drive.id.clone(), drive.clone());
        Ok(drive)
    }

    fn update_drive(&self, drive: Drive) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.drives)?;
        match guard.get_mut(&drive.id) {
            Some(existing) => {
                *existing = drive;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        Ok(lock(&self.drives)?.get(id).cloned())
    }

    fn drives(&self) -> Result<Vec<Drive>, RepositoryError> {
        Ok(lock(&self.drives)?.values().cloned().collect())
    }
}

impl ApplicationRepository for InMemoryPlacementStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = lock(&self.applications)?;
        let duplicate = guard.iter().any(|existing| {
            existing.id == record.id
                || (existing.student_id == record.student_id
                    && existing.drive_id == record.drive_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.applications)?;
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(lock(&self.applications)?
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }

    fn find_for_student(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(lock(&self.applications)?
            .iter()
            .find(|record| &record.student_id == student_id && &record.drive_id == drive_id)
            .cloned())
    }

    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(lock(&self.applications)?
            .iter()
            .filter(|record| &record.drive_id == drive_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(lock(&self.applications)?.clone())
    }
}
