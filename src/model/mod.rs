//! Schedule state and the backtracking search over course choices.

mod model_context;
mod model_schedule;
mod model_search;

pub use model_context::{Coverage, SearchOptions, SearchReport, SearchStats, Solution};
pub use model_schedule::{Mark, Schedule, is_conflict_free};
pub use model_search::{Solver, solve_catalog};
