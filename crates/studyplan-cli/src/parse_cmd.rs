//! `studyplan prompt` and `studyplan parse`: the two halves of the
//! timetable flow, runnable without a generator.

use std::io::Read;

use anyhow::{Context, Result};

use studyplan_core::input::collect_timetable_input;
use studyplan_core::prompt::build_timetable_prompt;
use studyplan_core::response::{ParseSource, ParsedTimetable, ResponseError, parse_response};

use crate::present;

/// Print the generation request for a timetable input file.
pub fn run_prompt(input: &str) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read timetable input {input}"))?;
    let collected = collect_timetable_input(&content)
        .with_context(|| format!("invalid timetable input in {input}"))?;
    print!(
        "{}",
        build_timetable_prompt(&collected.tasks, &collected.preferences)
    );
    Ok(())
}

/// Parse a saved answer (from `file`, or stdin) and print it as a table.
pub fn run_parse(file: Option<&str>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read response file {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read response from stdin")?;
            buf
        }
    };

    match parse_response(Some(&text)) {
        Ok(parsed) => {
            show_parsed(&parsed);
            Ok(())
        }
        Err(e) => {
            show_response_error(&e);
            Err(e.into())
        }
    }
}

/// Print parsed rows, noting when they came from the recovery path.
pub fn show_parsed(parsed: &ParsedTimetable) {
    if let ParseSource::Recovered { decode_error } = &parsed.source {
        eprintln!("Invalid JSON format from the model ({decode_error}); extracted data by pattern.");
    }
    match present::timetable_table(&parsed.entries) {
        Some(table) => println!("{table}"),
        None => println!("Generated timetable is empty."),
    }
}

/// Print a terminal parse error with the raw answer for manual reading.
pub fn show_response_error(err: &ResponseError) {
    eprintln!("Error: {err}");
    if let Some(raw) = err.raw_text() {
        eprintln!("--- raw response ---");
        eprintln!("{raw}");
        eprintln!("--------------------");
    }
}
