use std::collections::HashSet;

use super::super::domain::Internship;
use super::weightage::Weightage;

const INTERNSHIP_BASE: u64 = 20;
const INTERNSHIP_PER_ENTRY: u64 = 15;
const INTERNSHIP_PER_MONTH: u64 = 2;
const INTERNSHIP_CAP: u64 = 100;

pub(crate) struct SkillMatch {
    pub percentage: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Case-insensitive exact-token match, preserving the order of the drive's required skills.
pub(crate) fn skill_match(student_skills: &[String], required_skills: &[String]) -> SkillMatch {
    if required_skills.is_empty() {
        return SkillMatch {
            percentage: 100.0,
            matched: Vec::new(),
            missing: required_skills.to_vec(),
        };
    }

    let held: HashSet<String> = student_skills
        .iter()
        .map(|skill| skill.to_lowercase())
        .collect();

    let (matched, missing): (Vec<String>, Vec<String>) = required_skills
        .iter()
        .cloned()
        .partition(|skill| held.contains(&skill.to_lowercase()));

    let percentage = matched.len() as f64 / required_skills.len() as f64 * 100.0;

    SkillMatch {
        percentage,
        matched,
        missing,
    }
}

/// Rescale a 0-10 CGPA to 0-100. Out-of-range inputs are passed through unclamped.
pub(crate) fn cgpa_score(cgpa: f64) -> f64 {
    cgpa / 10.0 * 100.0
}

pub(crate) fn internship_score(internships: &[Internship]) -> f64 {
    if internships.is_empty() {
        return 0.0;
    }

    let total_months: u64 = internships
        .iter()
        .map(|internship| u64::from(internship.duration_months))
        .sum();

    let score = INTERNSHIP_BASE
        .saturating_add(INTERNSHIP_PER_ENTRY.saturating_mul(internships.len() as u64))
        .saturating_add(INTERNSHIP_PER_MONTH.saturating_mul(total_months));

    score.min(INTERNSHIP_CAP) as f64
}

pub(crate) fn academic_score(tenth_percentage: f64, twelfth_percentage: f64) -> f64 {
    (tenth_percentage + twelfth_percentage) / 2.0
}

pub(crate) fn weighted_total(
    weightage: &Weightage,
    cgpa: f64,
    skills: f64,
    internships: f64,
    academics: f64,
) -> f64 {
    cgpa * weightage.cgpa / 100.0
        + skills * weightage.skills / 100.0
        + internships * weightage.internships / 100.0
        + academics * weightage.academics / 100.0
}

/// Round half-up on the second decimal.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn internship(months: u32) -> Internship {
        Internship {
            company: "Acme".to_string(),
            role: "Intern".to_string(),
            duration_months: months,
            description: String::new(),
        }
    }

    #[test]
    fn skill_match_ignores_case_and_keeps_required_order() {
        let result = skill_match(
            &skills(&["sql", "JAVA"]),
            &skills(&["Java", "Python", "SQL"]),
        );
        assert_eq!(result.matched, skills(&["Java", "SQL"]));
        assert_eq!(result.missing, skills(&["Python"]));
        assert_eq!(round2(result.percentage), 66.67);
    }

    #[test]
    fn skill_match_is_vacuous_without_requirements() {
        let result = skill_match(&skills(&["Rust"]), &[]);
        assert_eq!(result.percentage, 100.0);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn skill_match_grows_with_intersection() {
        let required = skills(&["Go", "Rust", "SQL", "Kafka"]);
        let mut held = Vec::new();
        let mut previous = -1.0;
        for skill in ["Go", "Docker", "Rust", "SQL", "Kafka"] {
            held.push(skill.to_string());
            let current = skill_match(&held, &required).percentage;
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn internship_score_follows_base_entry_and_duration_points() {
        assert_eq!(internship_score(&[]), 0.0);
        assert_eq!(internship_score(&[internship(6)]), 47.0);
        assert_eq!(internship_score(&[internship(0)]), 35.0);
        assert_eq!(internship_score(&[internship(3), internship(4)]), 64.0);
        assert_eq!(internship_score(&[internship(24), internship(12)]), 100.0);
    }

    #[test]
    fn cgpa_and_academics_are_unclamped_linear_scales() {
        assert_eq!(round2(cgpa_score(8.5)), 85.0);
        assert_eq!(round2(cgpa_score(11.0)), 110.0);
        assert_eq!(academic_score(80.0, 91.0), 85.5);
    }

    #[test]
    fn round2_rounds_half_up() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(75.0), 75.0);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn weighted_total_applies_percent_weights() {
        let total = weighted_total(&Weightage::default(), 80.0, 50.0, 47.0, 85.0);
        assert!((total - (32.0 + 17.5 + 7.05 + 8.5)).abs() < 1e-9);
    }
}
