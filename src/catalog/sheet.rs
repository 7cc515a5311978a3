//! Spreadsheet catalogs: the first worksheet holds a header row followed by
//! one meeting per row, columns `start, end, meeting_id, course_id,
//! component_name, kind`.
use super::{Catalog, Meeting, MeetingKind};
use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;

pub const HEADER: [&str; 6] = ["start", "end", "meeting_id", "course_id", "component_name", "kind"];

pub fn read_catalog(path: &Path) -> Result<Catalog> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| anyhow!("failed to open workbook {}: {e:?}", path.display()))?;
    let sheet = book
        .get_sheet(&0)
        .ok_or_else(|| anyhow!("workbook {} has no worksheets", path.display()))?;

    let mut meetings = Vec::new();
    for row in 2..=sheet.get_highest_row() {
        let cell = |col: u32| sheet.get_value((col, row)).trim().to_string();
        if (1..=6).all(|col| cell(col).is_empty()) {
            continue;
        }
        let number = |col: u32| -> Result<u64> {
            let raw = cell(col);
            parse_number(&raw).with_context(|| format!("row {row}: column {:?} is not a whole number: {raw:?}", HEADER[col as usize - 1]))
        };
        let kind = cell(6).parse::<MeetingKind>().with_context(|| format!("row {row}"))?;
        meetings.push(Meeting::new(number(1)?, number(2)?, number(3)?, number(4)?, cell(5), kind));
    }

    tracing::debug!(path = %path.display(), rows = meetings.len(), "read catalog sheet");
    Catalog::new(meetings).with_context(|| format!("invalid catalog in {}", path.display()))
}

/// Spreadsheet cells may hold integers as floats (`135000` or `135000.0`).
fn parse_number(raw: &str) -> Result<u64> {
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    let value: f64 = raw.parse()?;
    if value < 0.0 || value.fract() != 0.0 {
        bail!("{raw} is not a non-negative integer");
    }
    Ok(value as u64)
}
