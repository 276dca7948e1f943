use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;

use super::scoring::Weightage;

/// Identifier wrapper for registered students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for placement drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriveId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate profile as maintained by the placement cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Cumulative grade point average on a 0-10 scale.
    pub cgpa: f64,
    pub branch: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub tenth_percentage: f64,
    pub twelfth_percentage: f64,
    /// Diploma certificate reference, when the student holds one.
    #[serde(default)]
    pub diploma: Option<String>,
    #[serde(default)]
    pub active_backlogs: u32,
    #[serde(default)]
    pub total_backlogs: u32,
    pub current_year: u8,
    #[serde(default)]
    pub internships: Vec<Internship>,
    #[serde(default)]
    pub offers: Vec<OfferRecord>,
}

impl Student {
    /// Aggregate placement status, always derived from the accepted offers.
    pub fn placement_status(&self) -> PlacementStatus {
        PlacementStatus::from_offers(&self.offers)
    }

    pub fn has_diploma(&self) -> bool {
        self.diploma
            .as_deref()
            .map(|certificate| !certificate.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internship {
    pub company: String,
    pub role: String,
    pub duration_months: u32,
    #[serde(default)]
    pub description: String,
}

/// Accepted offer held by a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    pub drive_id: DriveId,
    pub company_name: String,
    pub package: u64,
    pub offer_type: OfferType,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferType {
    #[serde(rename = "dream")]
    Dream,
    #[serde(rename = "non-dream")]
    NonDream,
}

impl OfferType {
    pub const fn label(self) -> &'static str {
        match self {
            OfferType::Dream => "dream",
            OfferType::NonDream => "non-dream",
        }
    }
}

/// Placement standing of a student across all drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Unplaced,
    Placed,
    DreamPlaced,
}

impl PlacementStatus {
    pub fn from_offers(offers: &[OfferRecord]) -> Self {
        if offers
            .iter()
            .any(|offer| offer.offer_type == OfferType::Dream)
        {
            PlacementStatus::DreamPlaced
        } else if offers.is_empty() {
            PlacementStatus::Unplaced
        } else {
            PlacementStatus::Placed
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlacementStatus::Unplaced => "unplaced",
            PlacementStatus::Placed => "placed",
            PlacementStatus::DreamPlaced => "dream_placed",
        }
    }
}

/// Lifecycle of a drive as managed by the placement cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveStatus {
    Open,
    Closed,
    Shortlisting,
    Completed,
}

impl DriveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DriveStatus::Open => "open",
            DriveStatus::Closed => "closed",
            DriveStatus::Shortlisting => "shortlisting",
            DriveStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Job posting with its eligibility gate and ranking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub id: DriveId,
    pub company_name: String,
    pub role: String,
    pub required_skills: Vec<String>,
    pub min_cgpa: f64,
    /// Empty means every branch may apply.
    pub eligible_branches: Vec<String>,
    pub min_tenth_percentage: f64,
    pub min_twelfth_percentage: f64,
    pub diploma_required: bool,
    pub backlogs_allowed: bool,
    pub max_backlogs_allowed: u32,
    /// Empty means every year may apply.
    pub eligible_years: Vec<u8>,
    pub weightage: Weightage,
    pub package: u64,
    pub is_dream_offer: bool,
    pub status: DriveStatus,
}

impl Drive {
    pub fn offer_type(&self) -> OfferType {
        if self.is_dream_offer {
            OfferType::Dream
        } else {
            OfferType::NonDream
        }
    }
}

/// Drive as submitted by a company or admin, before defaults are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveDraft {
    pub company_name: String,
    #[serde(default)]
    pub role: String,
    pub required_skills: Vec<String>,
    pub min_cgpa: f64,
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    #[serde(default)]
    pub min_tenth_percentage: f64,
    #[serde(default)]
    pub min_twelfth_percentage: f64,
    #[serde(default)]
    pub diploma_required: bool,
    #[serde(default)]
    pub backlogs_allowed: bool,
    #[serde(default)]
    pub max_backlogs_allowed: u32,
    #[serde(default)]
    pub eligible_years: Option<Vec<u8>>,
    #[serde(default)]
    pub weightage: Option<Weightage>,
    pub package: u64,
    #[serde(default)]
    pub is_dream_offer: Option<bool>,
}

/// Reasons a drive draft cannot be turned into an open drive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriveValidationError {
    #[error("company name is required")]
    MissingCompany,
    #[error("{field} must be a finite, non-negative number (found {value})")]
    InvalidThreshold { field: &'static str, value: f64 },
    #[error("weightage {field} must be a finite, non-negative number (found {value})")]
    InvalidWeight { field: &'static str, value: f64 },
    #[error("weightage must sum to 100 (found {total})")]
    WeightageTotal { total: f64 },
}

impl DriveDraft {
    /// Resolve every optional setting once, so scoring never falls back to defaults later.
    pub fn resolve(
        self,
        id: DriveId,
        config: &PlacementConfig,
    ) -> Result<Drive, DriveValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(DriveValidationError::MissingCompany);
        }

        for (field, value) in [
            ("min_cgpa", self.min_cgpa),
            ("min_tenth_percentage", self.min_tenth_percentage),
            ("min_twelfth_percentage", self.min_twelfth_percentage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DriveValidationError::InvalidThreshold { field, value });
            }
        }

        let weightage = self.weightage.unwrap_or_default();
        weightage.validate()?;

        let is_dream_offer = self
            .is_dream_offer
            .unwrap_or(self.package >= config.dream_threshold);
        let eligible_years = self
            .eligible_years
            .unwrap_or_else(|| config.default_eligible_years.clone());

        Ok(Drive {
            id,
            company_name: self.company_name,
            role: self.role,
            required_skills: self.required_skills,
            min_cgpa: self.min_cgpa,
            eligible_branches: self.eligible_branches,
            min_tenth_percentage: self.min_tenth_percentage,
            min_twelfth_percentage: self.min_twelfth_percentage,
            diploma_required: self.diploma_required,
            backlogs_allowed: self.backlogs_allowed,
            max_backlogs_allowed: self.max_backlogs_allowed,
            eligible_years,
            weightage,
            package: self.package,
            is_dream_offer,
            status: DriveStatus::Open,
        })
    }
}
