//! Timetable prompt construction.
//!
//! Serializes the collected tasks and study preferences into the single
//! natural-language request sent to the text-generation service. Pure
//! formatting, no I/O.

use serde::Serialize;

use crate::model::{StudyPreferences, Task};

/// Required output schema, included verbatim in every request.
const OUTPUT_SCHEMA: &str = r#"The JSON should be formatted EXACTLY as follows, with no extra text:
{
    "timetable": [
        {"date": "YYYY-MM-DD", "day": "Day of week", "start_time": "HH:MM", "end_time": "HH:MM", "tasks": ["Task 1", "Task 2", ...]}
    ]
}
"#;

/// Task shape as shown to the model.
#[derive(Serialize)]
struct PromptTask<'a> {
    description: &'a str,
    deadline: String,
    expected_time: u32,
}

/// Build the timetable generation request.
pub fn build_timetable_prompt(tasks: &[Task], preferences: &StudyPreferences) -> String {
    let prompt_tasks: Vec<PromptTask<'_>> = tasks
        .iter()
        .map(|t| PromptTask {
            description: &t.description,
            deadline: t.deadline.format("%Y-%m-%d").to_string(),
            expected_time: t.expected_hours,
        })
        .collect();
    // Serializing plain strings and integers cannot fail.
    let tasks_json = serde_json::to_string(&prompt_tasks).unwrap_or_default();

    let days: Vec<&str> = preferences.days.iter().map(|d| d.as_str()).collect();
    let days_json = serde_json::to_string(&days).unwrap_or_default();

    let mut prompt = String::with_capacity(1024);
    prompt.push_str("Generate a study timetable in JSON format based on:\n");
    prompt.push_str(&format!("Tasks: {tasks_json}\n"));
    prompt.push_str(&format!("Study Days: {days_json}\n"));
    prompt.push_str(&format!(
        "Study Hours per Day: {}\n",
        preferences.hours_per_day
    ));
    prompt.push_str(&format!("Study Times: {}\n", preferences.preferred_times));
    prompt.push_str(&format!(
        "Potential Distractions: {}\n",
        preferences.distractions
    ));
    prompt.push_str(&format!("Rest Hours per Day: {}\n", preferences.rest_hours));
    prompt.push_str(&format!("Timetable Duration: {}\n\n", preferences.duration));

    prompt.push_str(OUTPUT_SCHEMA);
    prompt.push_str(&format!(
        "Ensure that the 'day' key value matches one of the study days given: {}.\n",
        days.join(", ")
    ));

    prompt
}
