//! Search options, results, and the mutable state threaded through one search.
use super::model_schedule::{Mark, Schedule};
use crate::catalog::{Catalog, CourseId, Meeting, MeetingKind};
use crate::index::CatalogIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;

/// Which completed branches get reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    /// Only schedules that take every course.
    #[default]
    Full,
    /// Schedules taking the largest number of courses any branch reached.
    Best,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    pub coverage: Coverage,
    /// Offered labs may be left out. By default a course that offers labs is
    /// only taken together with one of them.
    pub optional_labs: bool,
    pub optional_discussions: bool,
    pub optional_exams: bool,
    pub max_solutions: Option<usize>,
}

impl SearchOptions {
    pub fn is_optional(&self, kind: MeetingKind) -> bool {
        match kind {
            MeetingKind::Lecture => false,
            MeetingKind::Lab => self.optional_labs,
            MeetingKind::Discussion => self.optional_discussions,
            MeetingKind::Exam => self.optional_exams,
        }
    }
}

/// One reported schedule: the courses taken and every selected meeting in
/// start order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub courses: Vec<CourseId>,
    pub meetings: Vec<Meeting>,
}

impl fmt::Display for Solution {
    /// One meeting per line in start order, then a blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for meeting in &self.meetings {
            writeln!(f, "{meeting}")?;
        }
        writeln!(f)
    }
}

impl Solution {
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn meetings_of(&self, course: CourseId) -> impl Iterator<Item = &Meeting> {
        self.meetings.iter().filter(move |m| m.course_id == course)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub frames: u64,
    pub pruned: u64,
    pub dead_ends: u64,
    pub solutions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub solutions: Vec<Solution>,
    pub stats: SearchStats,
}

/// State of a running search: the shared schedule, the committed courses,
/// counters, and where solutions go.
pub(super) struct SearchContext<'a, F> {
    pub index: &'a CatalogIndex,
    pub options: &'a SearchOptions,
    pub schedule: Schedule<'a>,
    pub committed: Vec<CourseId>,
    pub stats: SearchStats,
    best: Option<(usize, Vec<Solution>)>,
    sink: F,
}

impl<'a, F> SearchContext<'a, F>
where
    F: FnMut(&Solution) -> ControlFlow<()>,
{
    pub fn new(catalog: &'a Catalog, index: &'a CatalogIndex, options: &'a SearchOptions, sink: F) -> Self {
        Self {
            index,
            options,
            schedule: Schedule::new(catalog),
            committed: Vec::with_capacity(index.len()),
            stats: SearchStats::default(),
            best: None,
            sink,
        }
    }

    /// Runs `inner` with `positions` added to the schedule and always removes
    /// them again before returning, whatever `inner` returned.
    pub fn with_meetings(
        &mut self,
        positions: &[usize],
        inner: impl FnOnce(&mut Self) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let mark: Mark = self.schedule.mark();
        for &position in positions {
            self.schedule.insert(position);
        }
        let flow = inner(self);
        self.schedule.rollback(mark);
        flow
    }

    /// Like [`Self::with_meetings`], also counting the course as committed.
    pub fn with_course(
        &mut self,
        course: CourseId,
        lectures: &[usize],
        inner: impl FnOnce(&mut Self) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        self.committed.push(course);
        let flow = self.with_meetings(lectures, inner);
        self.committed.pop();
        flow
    }

    fn snapshot(&self) -> Solution {
        Solution {
            courses: self.committed.clone(),
            meetings: self.schedule.meetings().cloned().collect(),
        }
    }

    /// Every course is committed.
    pub fn full_coverage(&mut self) -> ControlFlow<()> {
        match self.options.coverage {
            Coverage::Full => {
                let solution = self.snapshot();
                self.emit(solution)
            }
            Coverage::Best => {
                self.keep_if_best();
                ControlFlow::Continue(())
            }
        }
    }

    /// The course list ran out before every course was committed.
    pub fn dead_end(&mut self) -> ControlFlow<()> {
        self.stats.dead_ends += 1;
        if self.options.coverage == Coverage::Best {
            self.keep_if_best();
        }
        ControlFlow::Continue(())
    }

    fn keep_if_best(&mut self) {
        let count = self.committed.len();
        if self.best.as_ref().is_some_and(|(best, _)| count < *best) {
            return;
        }
        let solution = self.snapshot();
        if let Some((best, kept)) = &mut self.best {
            if *best == count {
                kept.push(solution);
                return;
            }
        }
        self.best = Some((count, vec![solution]));
    }

    fn limit_reached(&self) -> bool {
        self.options
            .max_solutions
            .is_some_and(|limit| self.stats.solutions >= limit as u64)
    }

    fn emit(&mut self, solution: Solution) -> ControlFlow<()> {
        if self.limit_reached() {
            return ControlFlow::Break(());
        }
        self.stats.solutions += 1;
        tracing::debug!(
            courses = solution.course_count(),
            meetings = solution.meetings.len(),
            "schedule found"
        );
        let flow = (self.sink)(&solution);
        if self.limit_reached() { ControlFlow::Break(()) } else { flow }
    }

    /// Hands the kept best-coverage schedules to the sink, in search order.
    pub fn flush_best(&mut self) {
        let Some((count, kept)) = self.best.take() else {
            return;
        };
        tracing::debug!(courses = count, schedules = kept.len(), "best coverage");
        for solution in kept {
            if self.emit(solution).is_break() {
                break;
            }
        }
    }
}
