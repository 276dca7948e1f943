use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Drive, DriveStatus, PlacementStatus, Student};
use super::repository::{ApplicationRecord, EligibilityStatus};

/// Placement-cell dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementSummary {
    pub total_students: usize,
    pub placed_students: usize,
    pub dream_placed_students: usize,
    pub unplaced_students: usize,
    pub total_drives: usize,
    /// Drives still open for applications.
    pub active_drives: usize,
    pub total_applications: usize,
    pub eligible_applications: usize,
    pub rejected_applications: usize,
    /// Share of students holding any offer, rounded to a whole percent.
    pub placement_percentage: u32,
}

impl PlacementSummary {
    pub fn from_records(
        students: &[Student],
        drives: &[Drive],
        applications: &[ApplicationRecord],
    ) -> Self {
        let mut placed_students = 0;
        let mut dream_placed_students = 0;
        for student in students {
            match student.placement_status() {
                PlacementStatus::Placed => placed_students += 1,
                PlacementStatus::DreamPlaced => dream_placed_students += 1,
                PlacementStatus::Unplaced => {}
            }
        }

        let total_students = students.len();
        let with_offers = placed_students + dream_placed_students;
        let placement_percentage = if total_students == 0 {
            0
        } else {
            (with_offers as f64 / total_students as f64 * 100.0).round() as u32
        };

        let eligible_applications = applications
            .iter()
            .filter(|record| record.eligibility == EligibilityStatus::Eligible)
            .count();

        Self {
            total_students,
            placed_students,
            dream_placed_students,
            unplaced_students: total_students - with_offers,
            total_drives: drives.len(),
            active_drives: drives
                .iter()
                .filter(|drive| drive.status == DriveStatus::Open)
                .count(),
            total_applications: applications.len(),
            eligible_applications,
            rejected_applications: applications.len() - eligible_applications,
            placement_percentage,
        }
    }
}

/// Per-branch head counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    pub total: usize,
    pub placed: usize,
}

/// Salary bands in lakhs per annum, lower bound inclusive.
pub const PACKAGE_BANDS: [(&str, u64); 5] = [
    ("0-3 LPA", 0),
    ("3-5 LPA", 3),
    ("5-7 LPA", 5),
    ("7-10 LPA", 7),
    ("10+ LPA", 10),
];

const RUPEES_PER_LAKH: u64 = 100_000;

/// Branch placement rates and the spread of each placed student's best offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementAnalytics {
    pub branch_stats: BTreeMap<String, BranchStats>,
    /// Student counts per band of `PACKAGE_BANDS`, in band order.
    pub package_ranges: Vec<(String, usize)>,
}

impl PlacementAnalytics {
    pub fn from_students(students: &[Student]) -> Self {
        let mut branch_stats: BTreeMap<String, BranchStats> = BTreeMap::new();
        let mut band_counts = [0usize; PACKAGE_BANDS.len()];

        for student in students {
            let stats = branch_stats.entry(student.branch.clone()).or_default();
            stats.total += 1;
            if student.placement_status() != PlacementStatus::Unplaced {
                stats.placed += 1;
            }

            if let Some(best) = student.offers.iter().map(|offer| offer.package).max() {
                band_counts[package_band(best)] += 1;
            }
        }

        let package_ranges = PACKAGE_BANDS
            .iter()
            .zip(band_counts)
            .map(|((label, _), count)| (label.to_string(), count))
            .collect();

        Self {
            branch_stats,
            package_ranges,
        }
    }
}

/// Index into `PACKAGE_BANDS` for a package in rupees.
pub fn package_band(package: u64) -> usize {
    let lakhs = package as f64 / RUPEES_PER_LAKH as f64;
    PACKAGE_BANDS
        .iter()
        .rposition(|(_, floor)| lakhs >= *floor as f64)
        .unwrap_or(0)
}

/// A drive together with its application counts and current ranking.
#[derive(Debug, Clone, Serialize)]
pub struct DriveOverview {
    pub drive: Drive,
    pub application_count: usize,
    pub eligible_count: usize,
    pub ranking: Vec<ApplicationRecord>,
}

impl DriveOverview {
    pub fn new(drive: Drive, applications: Vec<ApplicationRecord>) -> Self {
        let application_count = applications.len();
        let mut ranking: Vec<ApplicationRecord> = applications
            .into_iter()
            .filter(ApplicationRecord::is_eligible)
            .collect();
        ranking.sort_by_key(|record| record.rank);

        Self {
            drive,
            application_count,
            eligible_count: ranking.len(),
            ranking,
        }
    }
}
