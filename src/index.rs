//! Groups catalog meetings by course and component kind.
use crate::catalog::{Catalog, CourseId, MeetingKind};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("course {0} is not in the catalog")]
pub struct UnknownCourse(pub CourseId);

/// An index entry that does not name a meeting of its course and kind,
/// i.e. the index was built from another catalog.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("index entry {position} of course {course_id} does not match the catalog")]
pub struct ForeignIndex {
    pub course_id: CourseId,
    pub position: usize,
}

/// Candidate meetings of one course, as catalog positions in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCandidates {
    pub course_id: CourseId,
    /// Every lecture meeting; the block is always taken whole.
    pub lectures: Vec<usize>,
    pub labs: Vec<usize>,
    pub discussions: Vec<usize>,
    pub exams: Vec<usize>,
}

impl CourseCandidates {
    fn new(course_id: CourseId) -> Self {
        Self {
            course_id,
            ..Self::default()
        }
    }

    pub fn of_kind(&self, kind: MeetingKind) -> &[usize] {
        match kind {
            MeetingKind::Lecture => &self.lectures,
            MeetingKind::Lab => &self.labs,
            MeetingKind::Discussion => &self.discussions,
            MeetingKind::Exam => &self.exams,
        }
    }

    fn of_kind_mut(&mut self, kind: MeetingKind) -> &mut Vec<usize> {
        match kind {
            MeetingKind::Lecture => &mut self.lectures,
            MeetingKind::Lab => &mut self.labs,
            MeetingKind::Discussion => &mut self.discussions,
            MeetingKind::Exam => &mut self.exams,
        }
    }
}

/// Courses in search order (ascending id) with their candidates. Built once
/// before a search and never re-derived during it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    courses: Vec<CourseCandidates>,
}

impl CatalogIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut grouped: BTreeMap<CourseId, CourseCandidates> = BTreeMap::new();
        for (position, meeting) in catalog.meetings().iter().enumerate() {
            grouped
                .entry(meeting.course_id)
                .or_insert_with(|| CourseCandidates::new(meeting.course_id))
                .of_kind_mut(meeting.kind)
                .push(position);
        }
        Self {
            courses: grouped.into_values().collect(),
        }
    }

    /// Keeps only the listed courses, still in ascending id order.
    pub fn restrict(&self, wanted: &[CourseId]) -> Result<Self, UnknownCourse> {
        if let Some(&missing) = wanted.iter().find(|id| self.get(**id).is_none()) {
            return Err(UnknownCourse(missing));
        }
        Ok(Self {
            courses: self
                .courses
                .iter()
                .filter(|c| wanted.contains(&c.course_id))
                .cloned()
                .collect(),
        })
    }

    /// Checks that every candidate position names a meeting of the same
    /// course and kind in `catalog`.
    pub fn verify(&self, catalog: &Catalog) -> Result<(), ForeignIndex> {
        for course in &self.courses {
            for kind in MeetingKind::ALL {
                for &position in course.of_kind(kind) {
                    let belongs = catalog
                        .get(position)
                        .is_some_and(|m| m.course_id == course.course_id && m.kind == kind);
                    if !belongs {
                        return Err(ForeignIndex {
                            course_id: course.course_id,
                            position,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn courses(&self) -> &[CourseCandidates] {
        &self.courses
    }

    pub fn course_ids(&self) -> Vec<CourseId> {
        self.courses.iter().map(|c| c.course_id).collect()
    }

    pub fn get(&self, course_id: CourseId) -> Option<&CourseCandidates> {
        self.courses
            .binary_search_by_key(&course_id, |c| c.course_id)
            .ok()
            .map(|i| &self.courses[i])
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_sample_catalog() {
        let index = CatalogIndex::build(&Catalog::sample());
        assert_eq!(index.course_ids(), vec![2023336415, 2023337412, 2023337427, 2023337795]);

        let cse175 = index.get(2023337795).unwrap();
        assert_eq!(cse175.lectures, vec![3]);
        assert_eq!(cse175.labs, vec![10, 11, 12, 13]);
        assert_eq!(cse175.exams, vec![15]);
        assert!(cse175.discussions.is_empty());

        let cse150 = index.get(2023337412).unwrap();
        assert_eq!(cse150.lectures, vec![1, 7]);
        assert_eq!(cse150.of_kind(MeetingKind::Lab), &[4, 14]);
    }

    #[test]
    fn empty_catalog_has_no_courses() {
        assert!(CatalogIndex::build(&Catalog::default()).is_empty());
    }

    #[test]
    fn restrict_keeps_search_order() {
        let index = CatalogIndex::build(&Catalog::sample());
        let narrowed = index.restrict(&[2023337795, 2023336415]).unwrap();
        assert_eq!(narrowed.course_ids(), vec![2023336415, 2023337795]);
        assert_eq!(index.restrict(&[42]), Err(UnknownCourse(42)));
    }

    #[test]
    fn index_of_another_catalog_is_rejected() {
        let sample = Catalog::sample();
        let index = CatalogIndex::build(&sample);
        assert_eq!(index.verify(&sample), Ok(()));
        assert_eq!(index.restrict(&[2023337795]).unwrap().verify(&sample), Ok(()));

        let short = Catalog::new(sample.meetings()[..4].to_vec()).unwrap();
        assert!(index.verify(&short).is_err());

        let mut reordered = sample.meetings().to_vec();
        reordered.swap(0, 1);
        let reordered = Catalog::new(reordered).unwrap();
        assert_eq!(
            index.verify(&reordered),
            Err(ForeignIndex {
                course_id: 2023337412,
                position: 1,
            })
        );
    }
}
