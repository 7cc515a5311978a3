//! Loads a catalog from a registrar class-search response.
//!
//! The response lists meeting type names by id and one node per class
//! section. A lecture section links to its lab/discussion sections through
//! `linkedSections`; every meeting of the lecture and of its linked sections
//! belongs to the lecture's course.
use super::{Catalog, CatalogError, CourseId, Meeting, MeetingKind};
use crate::time::{SECONDS_PER_DAY, SECONDS_PER_WEEK, parse_hhmm};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed registrar response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("section {0} is not in the registrar response")]
    UnknownSection(u64),
    #[error("section {section} references unknown meeting type {meeting_type}")]
    UnknownMeetingType { section: u64, meeting_type: u64 },
    #[error("section {section} has malformed clock time {raw:?}")]
    BadClock { section: u64, raw: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct Response {
    data: ResponseData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    meeting_types: Vec<MeetingTypeNode>,
    classes: ClassConnection,
}

#[derive(Debug, Deserialize)]
struct MeetingTypeNode {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ClassConnection {
    nodes: Vec<ClassNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassNode {
    id: u64,
    course_number: String,
    #[serde(default)]
    meetings: Vec<MeetingNode>,
    #[serde(default)]
    linked_sections: Vec<LinkedSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeetingNode {
    in_session: u64,
    meeting_type: u64,
    begin_time: String,
    end_time: String,
}

#[derive(Debug, Deserialize)]
struct LinkedSection {
    parent: u64,
}

/// Parsed registrar response, indexed by section id.
#[derive(Debug)]
pub struct RegistrarFeed {
    meeting_types: HashMap<u64, Option<MeetingKind>>,
    sections: HashMap<u64, ClassNode>,
    order: Vec<u64>,
}

impl RegistrarFeed {
    pub fn from_json(raw: &str) -> Result<Self, FeedError> {
        let response: Response = serde_json::from_str(raw)?;
        let meeting_types = response
            .data
            .meeting_types
            .into_iter()
            .map(|node| (node.id, node.name.parse::<MeetingKind>().ok()))
            .collect();
        let order = response.data.classes.nodes.iter().map(|node| node.id).collect();
        let sections = response
            .data
            .classes
            .nodes
            .into_iter()
            .map(|node| (node.id, node))
            .collect();
        Ok(Self {
            meeting_types,
            sections,
            order,
        })
    }

    /// Sections that own at least one lecture meeting, in response order.
    pub fn lecture_sections(&self) -> Vec<u64> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.sections[id].meetings.iter().any(|meeting| {
                    matches!(
                        self.meeting_types.get(&meeting.meeting_type),
                        Some(Some(MeetingKind::Lecture))
                    )
                })
            })
            .collect()
    }

    /// Expands the wanted lecture sections (or every lecture section when
    /// `wanted` is empty) into a validated catalog. Repeated ids are
    /// expanded once.
    pub fn catalog(&self, wanted: &[CourseId]) -> Result<Catalog, FeedError> {
        let lectures = if wanted.is_empty() {
            self.lecture_sections()
        } else {
            let mut seen = HashSet::new();
            wanted.iter().copied().filter(|id| seen.insert(*id)).collect()
        };

        let mut meetings = Vec::new();
        for &lecture in &lectures {
            let node = self.section(lecture)?;
            self.push_meetings(&mut meetings, lecture, node)?;
            for linked in &node.linked_sections {
                let linked_node = self.section(linked.parent)?;
                self.push_meetings(&mut meetings, lecture, linked_node)?;
            }
        }
        Ok(Catalog::new(meetings)?)
    }

    fn section(&self, id: u64) -> Result<&ClassNode, FeedError> {
        self.sections.get(&id).ok_or(FeedError::UnknownSection(id))
    }

    fn push_meetings(&self, meetings: &mut Vec<Meeting>, course: CourseId, node: &ClassNode) -> Result<(), FeedError> {
        for meeting in &node.meetings {
            let kind = match self.meeting_types.get(&meeting.meeting_type) {
                Some(Some(kind)) => *kind,
                Some(None) => {
                    tracing::debug!(section = node.id, meeting_type = meeting.meeting_type, "skipping unsupported meeting type");
                    continue;
                }
                None => {
                    return Err(FeedError::UnknownMeetingType {
                        section: node.id,
                        meeting_type: meeting.meeting_type,
                    });
                }
            };
            let clock = |raw: &str| {
                parse_hhmm(raw).ok_or_else(|| FeedError::BadClock {
                    section: node.id,
                    raw: raw.to_string(),
                })
            };
            let begin = clock(&meeting.begin_time)?;
            let end = clock(&meeting.end_time)?;
            let week_shift = if kind == MeetingKind::Exam { SECONDS_PER_WEEK } else { 0 };

            if meeting.in_session == 0 {
                tracing::warn!(section = node.id, "meeting has no session days");
            }
            for day in 0..7u64 {
                if meeting.in_session & (1 << day) == 0 {
                    continue;
                }
                let day_start = day * SECONDS_PER_DAY + week_shift;
                meetings.push(Meeting::new(
                    day_start + begin,
                    day_start + end,
                    node.id,
                    course,
                    node.course_number.clone(),
                    kind,
                ));
            }
        }
        Ok(())
    }
}

/// Convenience wrapper: parse a response and expand the wanted sections.
pub fn load_feed(raw: &str, wanted: &[CourseId]) -> Result<Catalog, FeedError> {
    RegistrarFeed::from_json(raw)?.catalog(wanted)
}
