//! Exam preparation: deterministic day-by-day page allocation.
//!
//! Pages are split evenly over the days from today up to (not including)
//! the exam date. Integer division leaves a remainder, and the whole
//! remainder goes to the last study day, so the pages across an exam's
//! plans always sum to its total page count.

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::model::{Exam, StudyDayPlan};

/// Result of allocating a single exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamAllocation {
    Planned(Vec<StudyDayPlan>),
    /// The exam is today, tomorrow, or in the past; nothing was planned.
    Skipped {
        exam_name: String,
        days_until_exam: i64,
    },
}

/// Plans for several exams, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamSchedule {
    pub plans: Vec<StudyDayPlan>,
    /// `(exam_name, days_until_exam)` for every skipped exam.
    pub skipped: Vec<(String, i64)>,
}

/// Allocate one exam's pages across the days before it.
pub fn allocate_exam(exam: &Exam, today: NaiveDate) -> ExamAllocation {
    let days_until_exam = (exam.date - today).num_days();

    if days_until_exam <= 1 {
        warn!(
            exam = %exam.name,
            days_until_exam,
            "exam is today, tomorrow, or in the past; skipping"
        );
        return ExamAllocation::Skipped {
            exam_name: exam.name.clone(),
            days_until_exam,
        };
    }

    let days = days_until_exam as u64;
    let total_pages = exam.total_pages();
    let daily_pages = total_pages / days;
    let remainder = total_pages % days;

    debug!(
        exam = %exam.name,
        total_pages,
        days,
        daily_pages,
        remainder,
        "allocating exam pages"
    );

    let plans = (0..days)
        .map(|day| {
            let pages_to_study = if day == days - 1 {
                daily_pages + remainder
            } else {
                daily_pages
            };
            StudyDayPlan {
                exam_name: exam.name.clone(),
                date: today + Days::new(day),
                pages_to_study,
            }
        })
        .collect();

    ExamAllocation::Planned(plans)
}

/// Allocate every exam, concatenating plans in input order.
pub fn allocate_exams(exams: &[Exam], today: NaiveDate) -> ExamSchedule {
    let mut schedule = ExamSchedule::default();
    for exam in exams {
        match allocate_exam(exam, today) {
            ExamAllocation::Planned(plans) => schedule.plans.extend(plans),
            ExamAllocation::Skipped {
                exam_name,
                days_until_exam,
            } => schedule.skipped.push((exam_name, days_until_exam)),
        }
    }
    schedule
}
