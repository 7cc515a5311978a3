//! Enumerates every conflict-free way to assemble a course schedule from a
//! catalog of timed meetings.
//!
//! A course is taken as its whole lecture block plus one of each offered
//! lab, discussion and exam option. The search tries taking and skipping
//! each course in ascending course-id order and reports the schedules that
//! reach full coverage (or, optionally, the largest coverage any branch
//! reached).
//!
//! ```no_run
//! use ross_sections::{Catalog, SearchOptions, solve_catalog};
//!
//! let report = solve_catalog(&Catalog::sample(), SearchOptions::default());
//! for solution in &report.solutions {
//!     for meeting in &solution.meetings {
//!         println!("{meeting}");
//!     }
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod export;
pub mod index;
pub mod model;
pub mod telemetry;
pub mod time;

pub use catalog::{Catalog, CatalogError, CourseId, Meeting, MeetingKind};
pub use index::{CatalogIndex, CourseCandidates, ForeignIndex, UnknownCourse};
pub use model::{Coverage, SearchOptions, SearchReport, SearchStats, Solution, Solver, solve_catalog};
