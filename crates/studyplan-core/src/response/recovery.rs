//! Regex recovery for answers that are not valid JSON.
//!
//! Each field is scanned independently over the whole text. Row `i` is
//! assembled from the `i`-th match of every field, and the row count is the
//! smallest match count, so surplus matches of the other fields are
//! dropped.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::ScheduleEntry;

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""date":\s*"([^"]*)""#).unwrap())
}

fn day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""day":\s*"([^"]*)""#).unwrap())
}

fn start_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""start_time":\s*"([^"]*)""#).unwrap())
}

fn end_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""end_time":\s*"([^"]*)""#).unwrap())
}

fn tasks_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""tasks":\s*\[([^\]]*)\]"#).unwrap())
}

/// All first-group captures of `re` in `text`, in order.
fn captures<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Split the inside of a `[...]` task list into names.
///
/// Pieces are trimmed of whitespace, then of surrounding `"`. Empty pieces
/// are kept, so `[]` yields a single empty name.
pub fn split_task_list(inner: &str) -> Vec<String> {
    inner
        .split(',')
        .map(|piece| piece.trim().trim_matches('"').to_string())
        .collect()
}

/// Rebuild rows positionally from per-field matches.
///
/// Returns `None` when any field matched zero times.
pub fn recover_entries(text: &str) -> Option<Vec<ScheduleEntry>> {
    let dates = captures(date_regex(), text);
    let days = captures(day_regex(), text);
    let start_times = captures(start_time_regex(), text);
    let end_times = captures(end_time_regex(), text);
    let task_lists = captures(tasks_regex(), text);

    let rows = [
        dates.len(),
        days.len(),
        start_times.len(),
        end_times.len(),
        task_lists.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    if rows == 0 {
        return None;
    }

    Some(
        (0..rows)
            .map(|i| ScheduleEntry {
                date: dates[i].to_string(),
                day: days[i].to_string(),
                start_time: start_times[i].to_string(),
                end_time: end_times[i].to_string(),
                tasks: split_task_list(task_lists[i]),
            })
            .collect(),
    )
}
