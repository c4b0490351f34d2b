//! `studyplan exam`: allocate study pages ahead of each exam.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use studyplan_core::input::collect_exam_input;
use studyplan_core::session::Session;
use studyplan_store::CredentialStore;

use crate::present;

pub struct ExamOptions<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub input: &'a str,
    pub today: NaiveDate,
}

pub fn run_exam(store: &CredentialStore, opts: &ExamOptions<'_>) -> Result<()> {
    let content = std::fs::read_to_string(opts.input)
        .with_context(|| format!("failed to read exam input {}", opts.input))?;
    let exams = collect_exam_input(&content)
        .with_context(|| format!("invalid exam input in {}", opts.input))?;

    let mut session = Session::new();
    session.login(store, opts.username, opts.password)?;
    let schedule = session.plan_exams(exams, opts.today)?;

    for (name, _) in &schedule.skipped {
        eprintln!("Warning: Exam '{name}' is today, tomorrow, or in the past; skipped.");
    }

    match present::exam_plan_table(&schedule.plans) {
        Some(table) => println!("{table}"),
        None => println!("No exam schedules to display."),
    }
    Ok(())
}
