use serde::{Deserialize, Serialize};

use super::super::domain::DriveValidationError;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Percentage allocation across the four ranking dimensions of a drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weightage {
    pub cgpa: f64,
    pub skills: f64,
    pub internships: f64,
    pub academics: f64,
}

impl Default for Weightage {
    fn default() -> Self {
        Self {
            cgpa: 40.0,
            skills: 35.0,
            internships: 15.0,
            academics: 10.0,
        }
    }
}

impl Weightage {
    pub fn total(&self) -> f64 {
        self.cgpa + self.skills + self.internships + self.academics
    }

    pub fn validate(&self) -> Result<(), DriveValidationError> {
        for (field, value) in [
            ("cgpa", self.cgpa),
            ("skills", self.skills),
            ("internships", self.internships),
            ("academics", self.academics),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DriveValidationError::InvalidWeight { field, value });
            }
        }

        let total = self.total();
        if (total - 100.0).abs() > WEIGHT_TOLERANCE {
            return Err(DriveValidationError::WeightageTotal { total });
        }

        Ok(())
    }
}
