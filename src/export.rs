//! Rendering of reported schedules.
use crate::model::Solution;
use crate::time::WeekTime;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::{self, Write};
use std::path::Path;

const WORKBOOK_COLUMNS: [&str; 8] = [
    "schedule",
    "course_id",
    "component",
    "kind",
    "starts",
    "ends",
    "start",
    "end",
];

pub fn write_solution(out: &mut impl Write, solution: &Solution) -> io::Result<()> {
    write!(out, "{solution}")
}

pub fn render_text(solutions: &[Solution]) -> String {
    solutions.iter().map(Solution::to_string).collect()
}

pub fn render_json(solutions: &[Solution]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(solutions)
}

/// Builds a workbook with one row per (schedule, meeting).
pub fn build_workbook(solutions: &[Solution]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Schedules")?;

    for (col, title) in WORKBOOK_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    let mut row = 1u32;
    for (number, solution) in solutions.iter().enumerate() {
        for meeting in &solution.meetings {
            sheet.write_number(row, 0, (number + 1) as f64)?;
            sheet.write_number(row, 1, meeting.course_id as f64)?;
            sheet.write_string(row, 2, &meeting.component_name)?;
            sheet.write_string(row, 3, meeting.kind.as_str())?;
            sheet.write_string(row, 4, WeekTime(meeting.start).to_string())?;
            sheet.write_string(row, 5, WeekTime(meeting.end).to_string())?;
            sheet.write_number(row, 6, meeting.start as f64)?;
            sheet.write_number(row, 7, meeting.end as f64)?;
            row += 1;
        }
    }
    sheet.autofit();
    Ok(workbook)
}

pub fn write_workbook(solutions: &[Solution], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = build_workbook(solutions)?;
    workbook.save(path)?;
    tracing::debug!(path = %path.display(), schedules = solutions.len(), "wrote workbook");
    Ok(())
}
