use serde::{Deserialize, Serialize};

use super::domain::{Drive, Student};

pub const ELIGIBLE_REASON: &str = "All eligibility criteria met";

/// Result of gating a student against a drive's eligibility criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EligibilityOutcome {
    Eligible,
    Ineligible(IneligibilityReason),
}

impl EligibilityOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityOutcome::Eligible)
    }

    pub fn reason(&self) -> String {
        match self {
            EligibilityOutcome::Eligible => ELIGIBLE_REASON.to_string(),
            EligibilityOutcome::Ineligible(reason) => reason.summary(),
        }
    }
}

/// First failing criterion, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IneligibilityReason {
    CgpaBelowMinimum { actual: f64, required: f64 },
    BranchNotEligible { branch: String, allowed: Vec<String> },
    TenthBelowMinimum { actual: f64, required: f64 },
    TwelfthBelowMinimum { actual: f64, required: f64 },
    DiplomaRequired,
    BacklogsNotAllowed { active: u32 },
    BacklogsExceedLimit { active: u32, max: u32 },
    YearNotEligible { year: u8, allowed: Vec<u8> },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::CgpaBelowMinimum { actual, required } => format!(
                "CGPA {} is below minimum requirement of {}",
                grade(*actual),
                grade(*required)
            ),
            IneligibilityReason::BranchNotEligible { branch, allowed } => format!(
                "Branch {branch} is not eligible. Eligible branches: {}",
                allowed.join(", ")
            ),
            IneligibilityReason::TenthBelowMinimum { actual, required } => {
                format!("10th percentage {actual}% is below minimum {required}%")
            }
            IneligibilityReason::TwelfthBelowMinimum { actual, required } => {
                format!("12th percentage {actual}% is below minimum {required}%")
            }
            IneligibilityReason::DiplomaRequired => {
                "Diploma certificate is required for this drive".to_string()
            }
            IneligibilityReason::BacklogsNotAllowed { active } => {
                format!("Active backlogs ({active}) not allowed for this drive")
            }
            IneligibilityReason::BacklogsExceedLimit { active, max } => {
                format!("Active backlogs {active} exceed maximum allowed {max}")
            }
            IneligibilityReason::YearNotEligible { year, allowed } => {
                let allowed = allowed
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Current year {year} is not eligible. Eligible years: {allowed}")
            }
        }
    }
}

/// Grade points always carry a decimal place ("8.0", "7.5").
fn grade(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Run the drive's checks in order, stopping at the first failure.
pub fn evaluate(student: &Student, drive: &Drive) -> EligibilityOutcome {
    match first_failure(student, drive) {
        Some(reason) => EligibilityOutcome::Ineligible(reason),
        None => EligibilityOutcome::Eligible,
    }
}

fn first_failure(student: &Student, drive: &Drive) -> Option<IneligibilityReason> {
    if student.cgpa < drive.min_cgpa {
        return Some(IneligibilityReason::CgpaBelowMinimum {
            actual: student.cgpa,
            required: drive.min_cgpa,
        });
    }

    if !drive.eligible_branches.is_empty() && !drive.eligible_branches.contains(&student.branch) {
        return Some(IneligibilityReason::BranchNotEligible {
            branch: student.branch.clone(),
            allowed: drive.eligible_branches.clone(),
        });
    }

    if drive.min_tenth_percentage > 0.0 && student.tenth_percentage < drive.min_tenth_percentage {
        return Some(IneligibilityReason::TenthBelowMinimum {
            actual: student.tenth_percentage,
            required: drive.min_tenth_percentage,
        });
    }

    if drive.min_twelfth_percentage > 0.0
        && student.twelfth_percentage < drive.min_twelfth_percentage
    {
        return Some(IneligibilityReason::TwelfthBelowMinimum {
            actual: student.twelfth_percentage,
            required: drive.min_twelfth_percentage,
        });
    }

    if drive.diploma_required && !student.has_diploma() {
        return Some(IneligibilityReason::DiplomaRequired);
    }

    if !drive.backlogs_allowed {
        if student.active_backlogs > 0 {
            return Some(IneligibilityReason::BacklogsNotAllowed {
                active: student.active_backlogs,
            });
        }
    } else if student.active_backlogs > drive.max_backlogs_allowed {
        return Some(IneligibilityReason::BacklogsExceedLimit {
            active: student.active_backlogs,
            max: drive.max_backlogs_allowed,
        });
    }

    if !drive.eligible_years.is_empty() && !drive.eligible_years.contains(&student.current_year) {
        return Some(IneligibilityReason::YearNotEligible {
            year: student.current_year,
            allowed: drive.eligible_years.clone(),
        });
    }

    None
}
