//! Table rendering for timetables and exam plans.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use studyplan_core::model::{ScheduleEntry, StudyDayPlan};

fn left(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Left)
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.iter().map(|h| left(h)).collect::<Vec<_>>());
    table
}

/// Render timetable rows, or `None` when there is nothing to show.
pub fn timetable_table(entries: &[ScheduleEntry]) -> Option<Table> {
    if entries.is_empty() {
        return None;
    }
    let mut table = new_table(&["date", "day", "start_time", "end_time", "tasks"]);
    for entry in entries {
        table.add_row(vec![
            left(&entry.date),
            left(&entry.day),
            left(&entry.start_time),
            left(&entry.end_time),
            left(entry.tasks.join(", ")),
        ]);
    }
    Some(table)
}

/// Render exam study plans, or `None` when there is nothing to show.
pub fn exam_plan_table(plans: &[StudyDayPlan]) -> Option<Table> {
    if plans.is_empty() {
        return None;
    }
    let mut table = new_table(&["Exam Name", "Date", "Pages to Study"]);
    for plan in plans {
        table.add_row(vec![
            left(&plan.exam_name),
            left(plan.date.format("%Y-%m-%d")),
            left(plan.pages_to_study),
        ]);
    }
    Some(table)
}
