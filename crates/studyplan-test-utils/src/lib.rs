//! Shared test utilities for studyplan integration tests.
//!
//! Provides:
//! - [`ScriptedGenerator`]: a [`TextGenerator`] that replays canned answers
//!   and records every prompt it was sent.
//! - [`temp_store`]: a credential store in a fresh temp directory, with one
//!   registered user.
//! - Small builders for tasks, preferences and exams.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;

use studyplan_core::generator::TextGenerator;
use studyplan_core::model::{Exam, Lesson, StudyDay, StudyPreferences, Task};
use studyplan_store::{CredentialStore, StoreConfig};

/// Username registered by [`temp_store`].
pub const TEST_USER: &str = "alice";
/// Password registered by [`temp_store`].
pub const TEST_PASSWORD: &str = "secret";

/// A well-formed answer with two rows.
pub const STRICT_ANSWER: &str = r#"{"timetable": [
    {"date": "2026-10-19", "day": "Monday", "start_time": "09:00", "end_time": "11:00", "tasks": ["Essay draft"]},
    {"date": "2026-10-21", "day": "Wednesday", "start_time": "09:00", "end_time": "11:00", "tasks": ["Problem set", "Essay draft"]}
]}"#;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Nothing,
    Failure(String),
}

/// Replays [`Reply`] values in order. Once the script runs out, every call
/// fails.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator that answers once with `text`.
    pub fn answering(text: &str) -> Self {
        Self::new([Reply::Text(text.to_string())])
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(Some(text)),
            Some(Reply::Nothing) => Ok(None),
            Some(Reply::Failure(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("scripted generator has no replies left")),
        }
    }
}

/// A credential store in a fresh temp directory with [`TEST_USER`]
/// registered. Keep the `TempDir` alive for the duration of the test.
pub fn temp_store() -> (TempDir, CredentialStore) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = CredentialStore::open(&StoreConfig::new(dir.path().join("users.txt")));
    store
        .sign_up(TEST_USER, TEST_PASSWORD)
        .expect("failed to register test user");
    (dir, store)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("invalid test date")
}

pub fn task(description: &str, expected_hours: u32) -> Task {
    Task {
        description: description.to_string(),
        deadline: date(2026, 10, 30),
        expected_hours,
    }
}

pub fn preferences(days: &[StudyDay], hours_per_day: u32) -> StudyPreferences {
    StudyPreferences {
        days: days.iter().copied().collect::<BTreeSet<_>>(),
        hours_per_day,
        rest_hours: 1,
        preferred_times: "9:00 AM - 12:00 PM".to_string(),
        duration: "1 week".to_string(),
        distractions: "phone".to_string(),
    }
}

/// An exam with one lesson per entry in `pages`, all at difficulty 3.
pub fn exam(name: &str, on: NaiveDate, pages: &[u32]) -> Exam {
    Exam {
        name: name.to_string(),
        date: on,
        lessons: pages
            .iter()
            .enumerate()
            .map(|(i, p)| Lesson {
                name: format!("{name} lesson {}", i + 1),
                pages: *p,
                difficulty: 3,
            })
            .collect(),
    }
}
