use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A day of the week on which the user is willing to study.
///
/// Ordered Monday first so a `BTreeSet<StudyDay>` lists days in calendar
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StudyDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl StudyDay {
    pub const ALL: [StudyDay; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for StudyDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyDay {
    type Err = StudyDayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let full = day.as_str().to_ascii_lowercase();
                lower == full || (lower.len() == 3 && full.starts_with(&lower))
            })
            .ok_or_else(|| StudyDayParseError(s.to_owned()))
    }
}

impl TryFrom<String> for StudyDay {
    type Error = StudyDayParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StudyDay> for String {
    fn from(day: StudyDay) -> Self {
        day.as_str().to_owned()
    }
}

/// Error returned when parsing an invalid [`StudyDay`] string.
#[derive(Debug, Clone)]
pub struct StudyDayParseError(pub String);

impl fmt::Display for StudyDayParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid study day: {:?}", self.0)
    }
}

impl std::error::Error for StudyDayParseError {}

// ---------------------------------------------------------------------------
// Timetable flow input
// ---------------------------------------------------------------------------

/// A piece of work the user wants scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub description: String,
    pub deadline: NaiveDate,
    /// Estimated effort in whole hours. Always at least 1.
    pub expected_hours: u32,
}

/// How and when the user wants to study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyPreferences {
    /// Selected study days. Never empty once validated.
    pub days: BTreeSet<StudyDay>,
    /// Study hours per selected day. Always at least 1.
    pub hours_per_day: u32,
    pub rest_hours: u32,
    pub preferred_times: String,
    pub duration: String,
    pub distractions: String,
}

// ---------------------------------------------------------------------------
// Exam flow input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    pub name: String,
    pub date: NaiveDate,
    pub lessons: Vec<Lesson>,
}

impl Exam {
    /// Sum of pages across all lessons.
    pub fn total_pages(&self) -> u64 {
        self.lessons.iter().map(|l| u64::from(l.pages)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub name: String,
    /// Always at least 1.
    pub pages: u32,
    /// Self-rated difficulty in `1..=5`. Collected and carried, but the
    /// allocator does not weight by it.
    pub difficulty: u8,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One row of a generated timetable. Values are kept verbatim from the
/// text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub date: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub tasks: Vec<String>,
}

/// Pages to read for one exam on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyDayPlan {
    pub exam_name: String,
    pub date: NaiveDate,
    pub pages_to_study: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_day_display_roundtrip() {
        for day in StudyDay::ALL {
            let parsed: StudyDay = day.to_string().parse().unwrap();
            assert_eq!(parsed, day);
        }
    }

    #[test]
    fn study_day_parse_is_lenient() {
        assert_eq!("monday".parse::<StudyDay>().unwrap(), StudyDay::Monday);
        assert_eq!(" FRIDAY ".parse::<StudyDay>().unwrap(), StudyDay::Friday);
        assert_eq!("Sat".parse::<StudyDay>().unwrap(), StudyDay::Saturday);
    }

    #[test]
    fn study_day_rejects_unknown() {
        let err = "Funday".parse::<StudyDay>().unwrap_err();
        assert!(err.to_string().contains("Funday"));
        assert!("Mo".parse::<StudyDay>().is_err());
    }

    #[test]
    fn study_days_sort_in_calendar_order() {
        let days: BTreeSet<StudyDay> = [StudyDay::Sunday, StudyDay::Monday, StudyDay::Wednesday]
            .into_iter()
            .collect();
        let ordered: Vec<StudyDay> = days.into_iter().collect();
        assert_eq!(
            ordered,
            vec![StudyDay::Monday, StudyDay::Wednesday, StudyDay::Sunday]
        );
    }

    #[test]
    fn exam_total_pages() {
        let exam = Exam {
            name: "Biology".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            lessons: vec![
                Lesson {
                    name: "Cells".to_string(),
                    pages: 4,
                    difficulty: 2,
                },
                Lesson {
                    name: "Genetics".to_string(),
                    pages: 6,
                    difficulty: 5,
                },
            ],
        };
        assert_eq!(exam.total_pages(), 10);
    }
}
