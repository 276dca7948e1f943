use crate::infra::{build_service, load_scenario, play_scenario, DemoService};
use chrono::Local;
use clap::Args;
use placement_engine::config::AppConfig;
use placement_engine::error::AppError;
use placement_engine::workflows::placement::{
    ApplicationId, Drive, DriveDraft, DriveOverview, DriveStatus, Internship, OfferOutcome,
    PlacementAnalytics, PlacementSummary, StatusAction, Student, StudentId, Weightage,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop after ranking; skip forwarding, shortlisting, and the offer round.
    #[arg(long)]
    pub(crate) skip_offers: bool,
    /// Print every application's public status view as JSON at the end.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScenarioArgs {
    /// Scenario JSON file with students, drives, applications, and offers to accept
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Pretty-print the resulting report
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_scenario(config: &AppConfig, args: ScenarioArgs) -> Result<(), AppError> {
    let scenario = load_scenario(&args.file)?;
    let report = play_scenario(scenario, config.placement.clone())?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_offers, json } = args;

    println!("Campus placement demo ({})", Local::now().date_naive());
    let cohort = demo_cohort();
    let service = build_service(cohort.clone(), config.placement.clone());

    let platform = service.create_drive(platform_drive())?;
    let research = service.create_drive(research_drive())?;
    for drive in [&platform, &research] {
        render_drive(drive);
    }

    let preview = service.check_eligibility(&cohort[2].id, &research.id)?;
    println!(
        "\nEligibility preview: {} for {} -> {}",
        cohort[2].name, research.company_name, preview.reason
    );

    let mut submitted: Vec<ApplicationId> = Vec::new();
    for drive in [&platform, &research] {
        println!("\nApplications for {} ({})", drive.company_name, drive.role);
        for student in &cohort {
            match service.apply(&student.id, &drive.id) {
                Ok(record) => {
                    let view = record.status_view();
                    println!(
                        "  - {} -> {} ({})",
                        student.name, view.eligibility, view.decision_rationale
                    );
                    submitted.push(record.id);
                }
                Err(err) => println!("  - {}: {}", student.name, err),
            }
        }
        render_ranking(&service.drive_overview(&drive.id)?, &cohort);
    }

    if !skip_offers {
        println!("\nOffer round");
        for drive in [&platform, &research] {
            run_offer_round(&service, drive, &cohort)?;
        }
    }

    if json {
        println!("\nApplication status views");
        for id in &submitted {
            let view = service.get(id)?.status_view();
            println!("{}", serde_json::to_string(&view)?);
        }
    }

    render_summary(&service.placement_summary()?);
    render_analytics(&service.placement_analytics()?);
    Ok(())
}

fn run_offer_round(
    service: &DemoService,
    drive: &Drive,
    cohort: &[Student],
) -> Result<(), AppError> {
    let overview = service.drive_overview(&drive.id)?;
    let shortlist: Vec<ApplicationId> = overview
        .ranking
        .iter()
        .take(2)
        .map(|record| record.id.clone())
        .collect();
    if shortlist.is_empty() {
        println!("- {}: no eligible applications to forward", drive.company_name);
        return Ok(());
    }

    let forwarded = service.forward_applications(&drive.id, &shortlist)?;
    service.update_drive_status(&drive.id, DriveStatus::Shortlisting)?;
    println!(
        "- {}: forwarded {} of {} eligible applications",
        drive.company_name, forwarded, overview.eligible_count
    );

    for id in &shortlist {
        service.transition(id, StatusAction::Shortlist)?;
        service.transition(id, StatusAction::Select)?;
        match service.accept_offer(id)? {
            OfferOutcome::Accepted {
                application,
                student,
            } => println!(
                "  - {} accepted {} ({}) -> {}",
                student.name,
                drive.company_name,
                application.id,
                student.placement_status().label()
            ),
            OfferOutcome::Blocked {
                application,
                denial,
            } => println!(
                "  - {} blocked: {}",
                display_name(cohort, &application.student_id),
                denial.summary()
            ),
        }
    }

    service.update_drive_status(&drive.id, DriveStatus::Completed)?;
    Ok(())
}

fn render_drive(drive: &Drive) {
    let weights = drive.weightage;
    println!(
        "- Drive {} | {} {} | package {} ({}) | weights cgpa {} / skills {} / internships {} / academics {}",
        drive.id,
        drive.company_name,
        drive.role,
        drive.package,
        drive.offer_type().label(),
        weights.cgpa,
        weights.skills,
        weights.internships,
        weights.academics
    );
}

fn render_ranking(overview: &DriveOverview, cohort: &[Student]) {
    println!(
        "  Ranking ({} eligible of {} applications):",
        overview.eligible_count, overview.application_count
    );
    for record in &overview.ranking {
        let Some(card) = &record.score_card else {
            continue;
        };
        println!(
            "    #{} {} | score {:.2} | percentile {:.2} | skills {:.2}% (missing: {})",
            record.rank,
            display_name(cohort, &record.student_id),
            card.scoring.final_weighted_score,
            record.percentile,
            card.scoring.skill_match_percentage,
            if card.skill_gap.missing_skills.is_empty() {
                "none".to_string()
            } else {
                card.skill_gap.missing_skills.join(", ")
            }
        );
    }
}

fn render_summary(summary: &PlacementSummary) {
    println!("\nPlacement summary");
    println!(
        "- {} students | {} placed | {} dream placed | {} unplaced ({}% placed)",
        summary.total_students,
        summary.placed_students,
        summary.dream_placed_students,
        summary.unplaced_students,
        summary.placement_percentage
    );
    println!(
        "- {} applications | {} eligible | {} rejected at the gate",
        summary.total_applications, summary.eligible_applications, summary.rejected_applications
    );
    println!(
        "- {} drives | {} still open",
        summary.total_drives, summary.active_drives
    );
}

fn render_analytics(analytics: &PlacementAnalytics) {
    println!("\nBy branch");
    for (branch, stats) in &analytics.branch_stats {
        println!("- {branch}: {}/{} placed", stats.placed, stats.total);
    }
    println!("Best offer per placed student");
    for (band, count) in &analytics.package_ranges {
        println!("- {band}: {count}");
    }
}

fn display_name<'a>(cohort: &'a [Student], id: &'a StudentId) -> &'a str {
    cohort
        .iter()
        .find(|student| &student.id == id)
        .map(|student| student.name.as_str())
        .unwrap_or(id.0.as_str())
}

fn internship(company: &str, months: u32) -> Internship {
    Internship {
        company: company.to_string(),
        role: "Engineering Intern".to_string(),
        duration_months: months,
        description: String::new(),
    }
}

fn demo_student(
    id: &str,
    name: &str,
    cgpa: f64,
    branch: &str,
    skills: &[&str],
    internships: Vec<Internship>,
) -> Student {
    Student {
        id: StudentId(id.to_string()),
        name: name.to_string(),
        cgpa,
        branch: branch.to_string(),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        tenth_percentage: 88.0,
        twelfth_percentage: 85.0,
        diploma: None,
        active_backlogs: 0,
        total_backlogs: 0,
        current_year: 4,
        internships,
        offers: Vec::new(),
    }
}

fn demo_cohort() -> Vec<Student> {
    let mut backlog = demo_student(
        "stu-005",
        "Esha Rao",
        8.7,
        "CSE",
        &["Rust", "Go", "SQL"],
        vec![internship("Cloudburst", 2)],
    );
    backlog.active_backlogs = 1;
    backlog.total_backlogs = 1;

    vec![
        demo_student(
            "stu-001",
            "Aarav Shah",
            9.3,
            "CSE",
            &["Rust", "Kafka", "SQL", "Python"],
            vec![internship("Streamline", 6)],
        ),
        demo_student(
            "stu-002",
            "Bea Kurian",
            8.6,
            "IT",
            &["rust", "sql"],
            vec![internship("Paylink", 3), internship("Datumly", 2)],
        ),
        demo_student(
            "stu-003",
            "Chidi Okafor",
            7.4,
            "CSE",
            &["Python", "PyTorch"],
            Vec::new(),
        ),
        demo_student(
            "stu-004",
            "Dev Malhotra",
            8.9,
            "ECE",
            &["Python", "PyTorch", "CUDA"],
            vec![internship("Neuron Works", 4)],
        ),
        backlog,
    ]
}

fn platform_drive() -> DriveDraft {
    DriveDraft {
        company_name: "Initech".to_string(),
        role: "Platform Engineer".to_string(),
        required_skills: vec!["Rust".to_string(), "Kafka".to_string(), "SQL".to_string()],
        min_cgpa: 7.0,
        eligible_branches: vec!["CSE".to_string(), "IT".to_string()],
        min_tenth_percentage: 60.0,
        min_twelfth_percentage: 60.0,
        diploma_required: false,
        backlogs_allowed: false,
        max_backlogs_allowed: 0,
        eligible_years: None,
        weightage: None,
        package: 850_000,
        is_dream_offer: None,
    }
}

fn research_drive() -> DriveDraft {
    DriveDraft {
        company_name: "Hooli".to_string(),
        role: "Applied Scientist".to_string(),
        required_skills: vec!["Python".to_string(), "PyTorch".to_string()],
        min_cgpa: 8.0,
        eligible_branches: Vec::new(),
        min_tenth_percentage: 75.0,
        min_twelfth_percentage: 75.0,
        diploma_required: false,
        backlogs_allowed: true,
        max_backlogs_allowed: 1,
        eligible_years: Some(vec![4]),
        weightage: Some(Weightage {
            cgpa: 50.0,
            skills: 30.0,
            internships: 10.0,
            academics: 10.0,
        }),
        package: 2_200_000,
        is_dream_offer: None,
    }
}
