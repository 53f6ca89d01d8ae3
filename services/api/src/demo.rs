use crate::infra::{
    default_scoring_config, load_item_catalog, InMemoryAssessmentRepository, LocalArtifactStore,
};
use chrono::{Local, Months, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use milestone_dq::config::CatalogConfig;
use milestone_dq::error::AppError;
use milestone_dq::workflows::assessment::{
    AnswerEntry, AnswerSheet, AssessmentService, AssessmentSubmission, ChildId, ChildSnapshot,
    DevelopmentalDomain, DomainScores, RequesterIdentity, Role, StepDirection,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the sitting (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional item bank CSV export; defaults to the built-in sample.
    #[arg(long)]
    pub(crate) item_bank: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, item_bank } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let catalog = Arc::new(load_item_catalog(&CatalogConfig { item_bank })?);

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let artifacts = Arc::new(LocalArtifactStore);
    let service = AssessmentService::new(
        repository,
        artifacts,
        catalog.clone(),
        default_scoring_config(),
    );

    let examiner = RequesterIdentity {
        user_id: "t-100".to_string(),
        role: Role::Teacher,
    };
    let child = demo_child(today);

    println!("Milestone assessment demo");
    println!(
        "Evaluee: {} (born {}), sitting on {}",
        child.name, child.birth_date, today
    );

    let intake = match service.intake(&examiner, &child, today) {
        Ok(intake) => intake,
        Err(err) => {
            println!("  Intake unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "\nIntake: month age {} | baseline {:?}",
        intake.month_age, intake.baseline.0
    );

    println!("\nItem browser (gross motor)");
    for direction in [None, Some(StepDirection::Forward)] {
        match service.browse_items(
            &examiner,
            DevelopmentalDomain::GrossMotor,
            intake.month_age,
            direction,
        ) {
            Ok(view) => {
                println!("- bracket {}:", view.month_age);
                for item in &view.items {
                    println!("    {} ({})", item.name, item.pass_criterion);
                }
            }
            Err(err) => println!("- browsing failed: {err}"),
        }
    }

    let submission = demo_submission(&child, &catalog, intake.month_age);
    let record = match service.submit(&examiner, submission, today) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "\nScored assessment {} -> status {}",
        record.assessment_id,
        record.status().label()
    );

    let report = match service.report(&examiner, &record.assessment_id) {
        Ok(report) => report,
        Err(err) => {
            println!("  Report unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "Month age {} | test bracket {} | DQ {} | grade {}",
        report.month_age,
        report.test_age,
        report.quotient,
        report.grade.label()
    );
    println!("Domain breakdown:");
    for domain in &report.domains {
        println!(
            "- {}: mental age {} months, quotient {}",
            domain.domain.label(),
            domain.score,
            domain.quotient
        );
        for item in &domain.items {
            let mark = if item.passed { "pass" } else { "fail" };
            println!("    [{}] {}", mark, item.name);
        }
    }

    match serde_json::to_string_pretty(&record.status_view()) {
        Ok(json) => println!("\nStatus payload:\n{json}"),
        Err(err) => println!("\nStatus payload unavailable: {err}"),
    }

    Ok(())
}

/// A ten-month-old evaluee relative to the sitting date.
fn demo_child(today: NaiveDate) -> ChildSnapshot {
    let birth_date = today.checked_sub_months(Months::new(10)).unwrap_or(today);
    ChildSnapshot {
        child_id: ChildId("child-demo".to_string()),
        name: "Demo Child".to_string(),
        birth_date,
    }
}

/// Pass every item of the resolved bracket on top of a baseline one bracket
/// below it, mirroring how an examiner enters a typical sitting.
fn demo_submission(
    child: &ChildSnapshot,
    catalog: &milestone_dq::workflows::catalog::ItemCatalog,
    month_age: f64,
) -> AssessmentSubmission {
    let config = default_scoring_config();
    let bracket = config.schedule.resolve(month_age);
    let baseline = DomainScores([f64::from(bracket) - 1.0; 5]);

    let mut answers = AnswerSheet::default();
    for domain in DevelopmentalDomain::ALL {
        for item in catalog.items(domain, bracket) {
            answers.record(
                domain,
                AnswerEntry {
                    item_id: item.item_id,
                    month_age: bracket,
                    passed: true,
                },
            );
        }
    }

    AssessmentSubmission {
        child: child.clone(),
        baseline,
        answers,
    }
}
