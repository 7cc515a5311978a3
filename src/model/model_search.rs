//! Depth-first take/skip search over the courses of a catalog index.
use super::model_context::{Coverage, SearchContext, SearchOptions, SearchReport, SearchStats, Solution};
use crate::catalog::{Catalog, MeetingKind};
use crate::index::{CatalogIndex, CourseCandidates, ForeignIndex};
use std::ops::ControlFlow;

/// Components chosen after the lecture block, outermost first.
const COMPONENT_ORDER: [MeetingKind; 3] = [MeetingKind::Lab, MeetingKind::Discussion, MeetingKind::Exam];

/// Enumerates conflict-free schedules for the courses of `index`.
pub struct Solver<'a> {
    catalog: &'a Catalog,
    index: &'a CatalogIndex,
    options: SearchOptions,
}

impl<'a> Solver<'a> {
    /// Fails when `index` was not built from `catalog` (directly or through
    /// [`CatalogIndex::restrict`]).
    pub fn new(catalog: &'a Catalog, index: &'a CatalogIndex, options: SearchOptions) -> Result<Self, ForeignIndex> {
        index.verify(catalog)?;
        Ok(Self { catalog, index, options })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Runs the search to completion and collects every reported schedule.
    pub fn solve(&self) -> SearchReport {
        let mut solutions = Vec::new();
        let stats = self.solve_with(|solution| {
            solutions.push(solution.clone());
            ControlFlow::Continue(())
        });
        SearchReport { solutions, stats }
    }

    /// Runs the search, handing each schedule to `sink` as soon as it is
    /// complete. The sink may stop the search by returning `Break`.
    pub fn solve_with<F>(&self, sink: F) -> SearchStats
    where
        F: FnMut(&Solution) -> ControlFlow<()>,
    {
        let mut ctx = SearchContext::new(self.catalog, self.index, &self.options, sink);
        let flow = ctx.explore(0);
        if self.options.coverage == Coverage::Best && flow.is_continue() {
            ctx.flush_best();
        }
        tracing::info!(
            courses = self.index.len(),
            frames = ctx.stats.frames,
            pruned = ctx.stats.pruned,
            dead_ends = ctx.stats.dead_ends,
            solutions = ctx.stats.solutions,
            stopped_early = flow.is_break(),
            "search finished"
        );
        ctx.stats
    }
}

/// Indexes `catalog` and searches it with `options`.
pub fn solve_catalog(catalog: &Catalog, options: SearchOptions) -> SearchReport {
    let index = CatalogIndex::build(catalog);
    Solver {
        catalog,
        index: &index,
        options,
    }
    .solve()
}

impl<'a, F> SearchContext<'a, F>
where
    F: FnMut(&Solution) -> ControlFlow<()>,
{
    /// One frame: decide the course at `consider`, given what the ancestor
    /// frames committed.
    pub(super) fn explore(&mut self, consider: usize) -> ControlFlow<()> {
        self.stats.frames += 1;

        if !self.schedule.is_valid() {
            self.stats.pruned += 1;
            if let Some((a, b)) = self.schedule.first_conflict() {
                tracing::trace!(consider, first = %a.component_name, second = %b.component_name, "pruned");
            }
            return ControlFlow::Continue(());
        }

        if self.committed.len() == self.index.len() {
            return self.full_coverage();
        }

        let index = self.index;
        let Some(course) = index.courses().get(consider) else {
            return self.dead_end();
        };

        // take
        self.with_course(course.course_id, &course.lectures, |ctx| {
            ctx.choose_components(course, consider, 0)
        })?;

        // skip
        self.explore(consider + 1)
    }

    /// Picks one option of `COMPONENT_ORDER[stage]` (or none, when the course
    /// offers none or the kind is optional), then the later stages, then
    /// moves on to the next course.
    fn choose_components(&mut self, course: &'a CourseCandidates, consider: usize, stage: usize) -> ControlFlow<()> {
        let Some(&kind) = COMPONENT_ORDER.get(stage) else {
            return self.explore(consider + 1);
        };

        let offered = course.of_kind(kind);
        if offered.is_empty() || self.options.is_optional(kind) {
            self.choose_components(course, consider, stage + 1)?;
        }
        for &option in offered {
            self.with_meetings(&[option], |ctx| ctx.choose_components(course, consider, stage + 1))?;
        }
        ControlFlow::Continue(())
    }
}
