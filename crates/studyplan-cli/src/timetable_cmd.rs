//! `studyplan timetable`: feasibility check, generation, and display.

use anyhow::{Context, Result};

use studyplan_core::feasibility::Feasibility;
use studyplan_core::generator::TextGenerator;
use studyplan_core::input::collect_timetable_input;
use studyplan_core::session::{FlowError, Session};
use studyplan_store::CredentialStore;

use crate::parse_cmd::{show_parsed, show_response_error};

pub struct TimetableOptions<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub input: &'a str,
    /// Generate even when the tasks do not fit the available hours.
    pub force: bool,
}

pub async fn run_timetable(
    store: &CredentialStore,
    generator: &dyn TextGenerator,
    opts: &TimetableOptions<'_>,
) -> Result<()> {
    let content = std::fs::read_to_string(opts.input)
        .with_context(|| format!("failed to read timetable input {}", opts.input))?;
    let collected = collect_timetable_input(&content)
        .with_context(|| format!("invalid timetable input in {}", opts.input))?;

    let mut session = Session::new();
    session.login(store, opts.username, opts.password)?;

    println!("Priority list:");
    for task in &collected.tasks {
        println!(
            "- {} (deadline: {}, time: {} hours)",
            task.description, task.deadline, task.expected_hours
        );
    }
    println!();

    session.submit_timetable_input(collected.tasks, collected.preferences)?;
    if let Feasibility::Fail {
        required,
        available,
        recommended_hours_per_day,
    } = session.check_feasibility()?
    {
        eprintln!(
            "Warning: not enough study hours to complete all tasks. \
             You need {required} hours but only have {available} hours available."
        );
        eprintln!(
            "Recommended: increase study hours to {recommended_hours_per_day} per day or add more study days."
        );
        if opts.force {
            eprintln!("--force given; generating anyway.");
        }
    }

    match session.generate_timetable(generator, opts.force).await {
        Ok(parsed) => {
            show_parsed(&parsed);
            Ok(())
        }
        Err(FlowError::Response(e)) => {
            show_response_error(&e);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
