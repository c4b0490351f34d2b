//! Input collection: TOML input documents and their validation.
//!
//! The raw `*Toml` types map directly onto the on-disk format. The
//! `collect_*` functions parse a document and turn it into validated
//! domain records, rejecting values the planners cannot work with:
//! - zero hours, zero pages, or an empty study-day set,
//! - difficulty outside `1..=5`,
//! - unknown weekday names or unparseable dates,
//! - documents with no tasks, no exams, or exams with no lessons.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Exam, Lesson, StudyDay, StudyPreferences, Task};

/// Errors that can occur while collecting input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("input must contain at least one task")]
    NoTasks,

    #[error("input must contain at least one exam")]
    NoExams,

    #[error("exam {exam:?} has no lessons")]
    NoLessons { exam: String },

    #[error("task {index} ({description:?}): expected_hours must be at least 1")]
    ZeroHours { index: usize, description: String },

    #[error("task {index}: invalid deadline {value:?} (expected YYYY-MM-DD)")]
    InvalidDeadline { index: usize, value: String },

    #[error("exam {exam:?}: invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidExamDate { exam: String, value: String },

    #[error("exam {exam:?}, lesson {lesson:?}: pages must be at least 1")]
    ZeroPages { exam: String, lesson: String },

    #[error("exam {exam:?}, lesson {lesson:?}: difficulty {value} is outside 1-5")]
    InvalidDifficulty {
        exam: String,
        lesson: String,
        value: u8,
    },

    #[error("invalid study day {0:?}")]
    InvalidStudyDay(String),

    #[error("at least one study day must be selected")]
    NoStudyDays,

    #[error("hours_per_day must be at least 1")]
    ZeroHoursPerDay,
}

// ---------------------------------------------------------------------------
// Raw TOML types
// ---------------------------------------------------------------------------

/// Top-level structure of a timetable input file.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableInputToml {
    pub preferences: PreferencesToml,
    #[serde(default)]
    pub tasks: Vec<TaskToml>,
}

/// A single `[[tasks]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskToml {
    #[serde(default)]
    pub description: String,
    /// Deadline as `YYYY-MM-DD`.
    pub deadline: String,
    pub expected_hours: u32,
}

/// The `[preferences]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesToml {
    #[serde(default)]
    pub days: Vec<String>,
    pub hours_per_day: u32,
    #[serde(default)]
    pub rest_hours: u32,
    #[serde(default)]
    pub preferred_times: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub distractions: String,
}

/// Top-level structure of an exam input file.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamInputToml {
    #[serde(default)]
    pub exams: Vec<ExamToml>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExamToml {
    pub name: String,
    /// Exam date as `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub lessons: Vec<LessonToml>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonToml {
    #[serde(default)]
    pub name: String,
    pub pages: u32,
    /// Self-rated difficulty, `1..=5`.
    pub difficulty: u8,
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Validated input for the timetable flow.
#[derive(Debug, Clone)]
pub struct TimetableInput {
    pub tasks: Vec<Task>,
    pub preferences: StudyPreferences,
}

/// Parse and validate a timetable input document.
pub fn collect_timetable_input(content: &str) -> Result<TimetableInput, InputError> {
    let raw: TimetableInputToml = toml::from_str(content)?;
    let tasks = collect_tasks(&raw.tasks)?;
    let preferences = collect_preferences(&raw.preferences)?;
    Ok(TimetableInput { tasks, preferences })
}

/// Parse and validate an exam input document.
pub fn collect_exam_input(content: &str) -> Result<Vec<Exam>, InputError> {
    let raw: ExamInputToml = toml::from_str(content)?;
    if raw.exams.is_empty() {
        return Err(InputError::NoExams);
    }
    raw.exams.iter().map(collect_exam).collect()
}

/// Validate raw task records. Indices in errors are 1-based.
pub fn collect_tasks(raw: &[TaskToml]) -> Result<Vec<Task>, InputError> {
    if raw.is_empty() {
        return Err(InputError::NoTasks);
    }

    raw.iter()
        .enumerate()
        .map(|(i, task)| {
            let index = i + 1;
            if task.expected_hours == 0 {
                return Err(InputError::ZeroHours {
                    index,
                    description: task.description.clone(),
                });
            }
            let deadline =
                parse_date(&task.deadline).ok_or_else(|| InputError::InvalidDeadline {
                    index,
                    value: task.deadline.clone(),
                })?;
            Ok(Task {
                description: task.description.trim().to_string(),
                deadline,
                expected_hours: task.expected_hours,
            })
        })
        .collect()
}

/// Validate the preferences table.
pub fn collect_preferences(raw: &PreferencesToml) -> Result<StudyPreferences, InputError> {
    let days = raw
        .days
        .iter()
        .map(|d| {
            d.parse::<StudyDay>()
                .map_err(|_| InputError::InvalidStudyDay(d.clone()))
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    if days.is_empty() {
        return Err(InputError::NoStudyDays);
    }
    if raw.hours_per_day == 0 {
        return Err(InputError::ZeroHoursPerDay);
    }

    Ok(StudyPreferences {
        days,
        hours_per_day: raw.hours_per_day,
        rest_hours: raw.rest_hours,
        preferred_times: raw.preferred_times.trim().to_string(),
        duration: raw.duration.trim().to_string(),
        distractions: raw.distractions.trim().to_string(),
    })
}

fn collect_exam(raw: &ExamToml) -> Result<Exam, InputError> {
    let date = parse_date(&raw.date).ok_or_else(|| InputError::InvalidExamDate {
        exam: raw.name.clone(),
        value: raw.date.clone(),
    })?;

    if raw.lessons.is_empty() {
        return Err(InputError::NoLessons {
            exam: raw.name.clone(),
        });
    }

    let lessons = raw
        .lessons
        .iter()
        .map(|lesson| {
            if lesson.pages == 0 {
                return Err(InputError::ZeroPages {
                    exam: raw.name.clone(),
                    lesson: lesson.name.clone(),
                });
            }
            if !(1..=5).contains(&lesson.difficulty) {
                return Err(InputError::InvalidDifficulty {
                    exam: raw.name.clone(),
                    lesson: lesson.name.clone(),
                    value: lesson.difficulty,
                });
            }
            Ok(Lesson {
                name: lesson.name.trim().to_string(),
                pages: lesson.pages,
                difficulty: lesson.difficulty,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Exam {
        name: raw.name.trim().to_string(),
        date,
        lessons,
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
