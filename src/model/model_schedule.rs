//! The working schedule of a search branch and its overlap check.
use crate::catalog::{Catalog, Meeting};
use std::collections::BTreeSet;

/// Sort-and-scan overlap check over an arbitrary set of meetings.
///
/// Meetings are half-open: one may start exactly when the previous one ends.
pub fn is_conflict_free<'m>(meetings: impl IntoIterator<Item = &'m Meeting>) -> bool {
    let mut sorted: Vec<&Meeting> = meetings.into_iter().collect();
    sorted.sort_by_key(|m| m.start);
    sorted.windows(2).all(|pair| pair[1].start >= pair[0].end)
}

/// Position in the insertion log to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Meetings selected by the ancestors of the current search frame, ordered
/// by `(start, catalog position)`.
///
/// Validity is kept incrementally: an insertion into a conflict-free
/// schedule only needs comparing against its two ordered neighbours.
#[derive(Debug, Clone)]
pub struct Schedule<'c> {
    meetings: &'c [Meeting],
    ordered: BTreeSet<(u64, usize)>,
    log: Vec<usize>,
    /// Log length at which the first conflicting meeting was inserted.
    conflict_at: Option<usize>,
}

impl<'c> Schedule<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            meetings: catalog.meetings(),
            ordered: BTreeSet::new(),
            log: Vec::new(),
            conflict_at: None,
        }
    }

    /// Adds the meeting at `position` in the catalog. Returns false if it was
    /// already selected.
    pub fn insert(&mut self, position: usize) -> bool {
        let key = (self.meetings[position].start, position);
        if self.ordered.contains(&key) {
            return false;
        }
        if self.conflict_at.is_none() && !self.admits(position) {
            self.conflict_at = Some(self.log.len());
        }
        self.ordered.insert(key);
        self.log.push(position);
        true
    }

    pub fn mark(&self) -> Mark {
        Mark(self.log.len())
    }

    /// Removes every meeting inserted since `mark`, newest first.
    pub fn rollback(&mut self, mark: Mark) {
        while self.log.len() > mark.0 {
            if let Some(position) = self.log.pop() {
                self.ordered.remove(&(self.meetings[position].start, position));
            }
        }
        if self.conflict_at.is_some_and(|at| at >= mark.0) {
            self.conflict_at = None;
        }
    }

    /// Whether the meeting at `position` fits without overlapping its
    /// neighbours. Only meaningful while the schedule is conflict-free.
    pub fn admits(&self, position: usize) -> bool {
        let candidate = &self.meetings[position];
        let key = (candidate.start, position);
        let before = self.ordered.range(..key).next_back();
        let after = self.ordered.range(key..).find(|(_, p)| *p != position);

        let clear_before = before.is_none_or(|&(_, p)| self.meetings[p].end <= candidate.start);
        let clear_after = after.is_none_or(|&(start, _)| candidate.end <= start);
        clear_before && clear_after
    }

    pub fn is_valid(&self) -> bool {
        self.conflict_at.is_none()
    }

    /// Full linear scan over the ordered meetings; agrees with [`Self::is_valid`].
    pub fn scan_valid(&self) -> bool {
        self.first_conflict().is_none()
    }

    /// The first adjacent pair, in start order, whose intervals overlap.
    pub fn first_conflict(&self) -> Option<(&'c Meeting, &'c Meeting)> {
        let meetings = self.meetings;
        let mut previous: Option<&'c Meeting> = None;
        for &(_, position) in &self.ordered {
            let current = &meetings[position];
            if let Some(prev) = previous {
                if current.start < prev.end {
                    return Some((prev, current));
                }
            }
            previous = Some(current);
        }
        None
    }

    /// Selected catalog positions in start order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.ordered.iter().map(|&(_, position)| position)
    }

    pub fn meetings(&self) -> impl Iterator<Item = &'c Meeting> + '_ {
        let meetings = self.meetings;
        self.ordered.iter().map(move |&(_, position)| &meetings[position])
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MeetingKind;
    use proptest::prelude::*;

    fn catalog(intervals: &[(u64, u64)]) -> Catalog {
        Catalog::new(
            intervals
                .iter()
                .enumerate()
                .map(|(i, &(start, end))| Meeting::new(start, end, i as u64, i as u64, format!("M-{i}"), MeetingKind::Lecture))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn empty_schedule_is_valid() {
        let catalog = catalog(&[]);
        let schedule = Schedule::new(&catalog);
        assert!(schedule.is_valid());
        assert!(schedule.scan_valid());
        assert!(is_conflict_free(catalog.meetings()));
    }

    #[test]
    fn touching_meetings_are_valid() {
        let catalog = catalog(&[(100, 200), (0, 100), (200, 300)]);
        let mut schedule = Schedule::new(&catalog);
        for position in 0..3 {
            schedule.insert(position);
        }
        assert!(schedule.is_valid());
        assert_eq!(schedule.positions().collect::<Vec<_>>(), vec![1, 0, 2]);
    }

    #[test]
    fn equal_starts_conflict() {
        // CSE-175-05L and CSE-150-04L in the sample catalog.
        let catalog = catalog(&[(491400, 501300), (491400, 501600)]);
        let mut schedule = Schedule::new(&catalog);
        schedule.insert(0);
        assert!(!schedule.admits(1));
        schedule.insert(1);
        assert!(!schedule.is_valid());
        let (a, b) = schedule.first_conflict().unwrap();
        assert_eq!((a.meeting_id, b.meeting_id), (0, 1));
    }

    #[test]
    fn rollback_clears_conflict() {
        let catalog = catalog(&[(0, 50), (40, 60), (60, 70)]);
        let mut schedule = Schedule::new(&catalog);
        schedule.insert(0);
        let mark = schedule.mark();
        schedule.insert(1);
        schedule.insert(2);
        assert!(!schedule.is_valid());
        schedule.rollback(mark);
        assert!(schedule.is_valid());
        assert_eq!(schedule.len(), 1);
        schedule.insert(2);
        assert!(schedule.is_valid());
    }

    #[test]
    fn long_meeting_covering_several_is_caught() {
        let catalog = catalog(&[(10, 20), (30, 40), (0, 100)]);
        let mut schedule = Schedule::new(&catalog);
        schedule.insert(0);
        schedule.insert(1);
        schedule.insert(2);
        assert!(!schedule.is_valid());
        assert!(!schedule.scan_valid());
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let catalog = catalog(&[(0, 10)]);
        let mut schedule = Schedule::new(&catalog);
        assert!(schedule.insert(0));
        assert!(!schedule.insert(0));
        assert!(schedule.is_valid());
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn validity_check_has_no_side_effects() {
        let catalog = catalog(&[(0, 10), (5, 15)]);
        let mut schedule = Schedule::new(&catalog);
        schedule.insert(0);
        schedule.insert(1);
        let first = (schedule.is_valid(), schedule.scan_valid());
        let second = (schedule.is_valid(), schedule.scan_valid());
        assert_eq!(first, second);
        assert_eq!(schedule.len(), 2);
    }

    proptest! {
        #[test]
        fn incremental_matches_scan(
            intervals in prop::collection::vec((0u64..500, 1u64..60), 1..12),
            ops in prop::collection::vec((any::<bool>(), 0usize..12), 0..40),
        ) {
            let intervals: Vec<(u64, u64)> = intervals.into_iter().map(|(s, d)| (s, s + d)).collect();
            let catalog = catalog(&intervals);
            let mut schedule = Schedule::new(&catalog);
            let mut marks = Vec::new();
            for (push, pick) in ops {
                if push || marks.is_empty() {
                    marks.push(schedule.mark());
                    schedule.insert(pick % intervals.len());
                } else if let Some(mark) = marks.pop() {
                    schedule.rollback(mark);
                }
                prop_assert_eq!(schedule.is_valid(), schedule.scan_valid());
                prop_assert_eq!(schedule.is_valid(), is_conflict_free(schedule.meetings()));
            }
        }
    }
}
