//! The meeting catalog: every timed lecture, lab, discussion and exam a
//! student could be placed in, validated once at load.

pub mod registrar;
pub mod sheet;
pub mod snapshot;

use crate::time::WeekTime;
use anyhow::{Context, bail};
use lazy_static::lazy_static;
use savefile_derive::Savefile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub type CourseId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Savefile)]
pub enum MeetingKind {
    Lecture,
    Lab,
    Discussion,
    Exam,
}

impl MeetingKind {
    pub const ALL: [MeetingKind; 4] = [
        MeetingKind::Lecture,
        MeetingKind::Lab,
        MeetingKind::Discussion,
        MeetingKind::Exam,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MeetingKind::Lecture => "Lecture",
            MeetingKind::Lab => "Lab",
            MeetingKind::Discussion => "Discussion",
            MeetingKind::Exam => "Exam",
        }
    }
}

impl fmt::Display for MeetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingKind {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Lecture" => Ok(MeetingKind::Lecture),
            "Lab" => Ok(MeetingKind::Lab),
            "Discussion" => Ok(MeetingKind::Discussion),
            "Exam" => Ok(MeetingKind::Exam),
            other => Err(CatalogError::UnknownKind(other.to_string())),
        }
    }
}

/// One timed occurrence of a course component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Savefile)]
pub struct Meeting {
    pub start: u64,
    pub end: u64,
    pub meeting_id: u64,
    pub course_id: CourseId,
    pub component_name: String,
    pub kind: MeetingKind,
}

impl Meeting {
    pub fn new(
        start: u64,
        end: u64,
        meeting_id: u64,
        course_id: CourseId,
        component_name: impl Into<String>,
        kind: MeetingKind,
    ) -> Self {
        Self {
            start,
            end,
            meeting_id,
            course_id,
            component_name: component_name.into(),
            kind,
        }
    }

    /// Half-open overlap: meetings that only share an endpoint do not conflict.
    pub fn overlaps(&self, other: &Meeting) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:<10} {} - {}",
            self.component_name,
            self.kind,
            WeekTime(self.start),
            WeekTime(self.end)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("meeting #{position} ({name}) ends at {end}, not after its start {start}")]
    InvertedInterval {
        position: usize,
        name: String,
        start: u64,
        end: u64,
    },
    #[error("course {0} has meetings but no lecture")]
    MissingLecture(CourseId),
    #[error("unknown meeting kind {0:?}")]
    UnknownKind(String),
}

/// A validated, immutable list of meetings. Positions in the list identify
/// meetings during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Savefile)]
pub struct Catalog {
    meetings: Vec<Meeting>,
}

impl Catalog {
    pub fn new(meetings: Vec<Meeting>) -> Result<Self, CatalogError> {
        for (position, meeting) in meetings.iter().enumerate() {
            if meeting.start >= meeting.end {
                return Err(CatalogError::InvertedInterval {
                    position,
                    name: meeting.component_name.clone(),
                    start: meeting.start,
                    end: meeting.end,
                });
            }
        }

        let mut has_lecture: BTreeMap<CourseId, bool> = BTreeMap::new();
        for meeting in &meetings {
            *has_lecture.entry(meeting.course_id).or_default() |= meeting.kind == MeetingKind::Lecture;
        }
        if let Some((&course, _)) = has_lecture.iter().find(|(_, lecture)| !**lecture) {
            return Err(CatalogError::MissingLecture(course));
        }

        tracing::debug!(meetings = meetings.len(), courses = has_lecture.len(), "catalog loaded");
        Ok(Self { meetings })
    }

    /// The hardcoded four-course sample catalog.
    pub fn sample() -> Self {
        SAMPLE_CATALOG.clone()
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn get(&self, position: usize) -> Option<&Meeting> {
        self.meetings.get(position)
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    pub fn course_ids(&self) -> BTreeSet<CourseId> {
        self.meetings.iter().map(|m| m.course_id).collect()
    }
}

/// Loads a catalog file, choosing the reader by extension: `.json`
/// registrar response, `.xlsx` sheet, `.bin` snapshot. `wanted` narrows a
/// registrar response to those lecture sections.
pub fn load_path(path: &Path, wanted: &[CourseId]) -> anyhow::Result<Catalog> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            registrar::load_feed(&raw, wanted).with_context(|| format!("in registrar response {}", path.display()))
        }
        Some("xlsx") => sheet::read_catalog(path),
        Some("bin") => snapshot::load_snapshot(path),
        other => bail!("unsupported catalog format {:?} for {}", other.unwrap_or(""), path.display()),
    }
}

type SampleRow = (u64, u64, u64, u64, &'static str, MeetingKind);

const SAMPLE_ROWS: [SampleRow; 19] = {
    use MeetingKind::*;
    [
        (135000, 139500, 2023337427, 2023337427, "CSE-185-01", Lecture),
        (140400, 144900, 2023337412, 2023337412, "CSE-150-01", Lecture),
        (226800, 231300, 2023336415, 2023336415, "CSE-168-01", Lecture),
        (237600, 247500, 2023337795, 2023337795, "CSE-175-01", Lecture),
        (243000, 253200, 2023337413, 2023337412, "CSE-150-03L", Lab),
        (297000, 307200, 2023336684, 2023336415, "CSE-168-03L", Lab),
        (307800, 312300, 2023337427, 2023337427, "CSE-185-01", Lecture),
        (313200, 317700, 2023337412, 2023337412, "CSE-150-01", Lecture),
        (329400, 339600, 2023337429, 2023337427, "CSE-185-04L", Lab),
        (399600, 404100, 2023336415, 2023336415, "CSE-168-01", Lecture),
        (459000, 468900, 2023337796, 2023337795, "CSE-175-02L", Lab),
        (469800, 479700, 2023337797, 2023337795, "CSE-175-03L", Lab),
        (480600, 490500, 2023337798, 2023337795, "CSE-175-04L", Lab),
        (491400, 501300, 2023337799, 2023337795, "CSE-175-05L", Lab),
        (491400, 501600, 2023337414, 2023337412, "CSE-150-04L", Lab),
        (892800, 903600, 2023337795, 2023337795, "CSE-175-01", Exam),
        (905400, 916200, 2023336415, 2023336415, "CSE-168-01", Exam),
        (991800, 1002600, 2023337412, 2023337412, "CSE-150-01", Exam),
        (1164600, 1175400, 2023337427, 2023337427, "CSE-185-01", Exam),
    ]
};

lazy_static! {
    static ref SAMPLE_CATALOG: Catalog = Catalog {
        meetings: SAMPLE_ROWS
            .iter()
            .map(|&(start, end, meeting_id, course_id, name, kind)| {
                Meeting::new(start, end, meeting_id, course_id, name, kind)
            })
            .collect(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_passes_validation() {
        let sample = Catalog::sample();
        assert_eq!(sample.len(), 19);
        assert_eq!(Catalog::new(sample.meetings().to_vec()), Ok(sample.clone()));
        assert_eq!(sample.course_ids().len(), 4);
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.course_ids().is_empty());
    }

    #[test]
    fn rejects_inverted_interval() {
        let err = Catalog::new(vec![Meeting::new(10, 10, 1, 1, "X-01", MeetingKind::Lecture)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvertedInterval { position: 0, .. }));
    }

    #[test]
    fn rejects_course_without_lecture() {
        let err = Catalog::new(vec![
            Meeting::new(0, 10, 1, 1, "X-01", MeetingKind::Lecture),
            Meeting::new(20, 30, 2, 2, "Y-02L", MeetingKind::Lab),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::MissingLecture(2));
    }

    #[test]
    fn touching_meetings_do_not_overlap() {
        let a = Meeting::new(0, 100, 1, 1, "A", MeetingKind::Lecture);
        let b = Meeting::new(100, 200, 2, 2, "B", MeetingKind::Lecture);
        let c = Meeting::new(99, 150, 3, 3, "C", MeetingKind::Lab);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn parses_kind_names() {
        assert_eq!("Lab".parse::<MeetingKind>(), Ok(MeetingKind::Lab));
        assert_eq!(" Exam ".parse::<MeetingKind>(), Ok(MeetingKind::Exam));
        assert!("Seminar".parse::<MeetingKind>().is_err());
    }

    #[test]
    fn load_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("catalog.bin");
        snapshot::save_snapshot(&Catalog::sample(), &snapshot).unwrap();
        assert_eq!(load_path(&snapshot, &[]).unwrap(), Catalog::sample());

        let unknown = dir.path().join("catalog.csv");
        std::fs::write(&unknown, "start,end").unwrap();
        assert!(load_path(&unknown, &[]).is_err());
    }

    #[test]
    fn display_shows_section_and_times() {
        let line = Catalog::sample().meetings()[0].to_string();
        assert!(line.starts_with("CSE-185-01"));
        assert!(line.ends_with("MON 1:30 PM - MON 2:45 PM"));
    }
}
