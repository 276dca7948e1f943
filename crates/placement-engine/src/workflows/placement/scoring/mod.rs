mod rules;
mod weightage;

pub use weightage::Weightage;

use super::domain::{Drive, Student};
use serde::{Deserialize, Serialize};

/// Per-dimension scores for an application, every field on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub skill_match_percentage: f64,
    pub cgpa_score: f64,
    pub internship_score: f64,
    pub academic_score: f64,
    pub final_weighted_score: f64,
}

/// Which of the drive's required skills the student already holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Scoring output frozen onto an application at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub scoring: Scoring,
    pub skill_gap: SkillGap,
}

/// Score a student against a drive using the drive's resolved weightage.
pub fn score(student: &Student, drive: &Drive) -> ScoreCard {
    let skills = rules::skill_match(&student.skills, &drive.required_skills);
    let cgpa = rules::cgpa_score(student.cgpa);
    let internships = rules::internship_score(&student.internships);
    let academics = rules::academic_score(student.tenth_percentage, student.twelfth_percentage);

    let total = rules::weighted_total(
        &drive.weightage,
        cgpa,
        skills.percentage,
        internships,
        academics,
    );

    ScoreCard {
        scoring: Scoring {
            skill_match_percentage: rules::round2(skills.percentage),
            cgpa_score: rules::round2(cgpa),
            internship_score: rules::round2(internships),
            academic_score: rules::round2(academics),
            final_weighted_score: rules::round2(total),
        },
        skill_gap: SkillGap {
            matched_skills: skills.matched,
            missing_skills: skills.missing,
        },
    }
}

pub(crate) use rules::round2;
