use ross_sections::catalog::{load_path, registrar::load_feed};
use ross_sections::{Catalog, Meeting, SearchOptions, solve_catalog};
use std::path::Path;

const FIXTURE: &str = include_str!("fixtures/registrar_sample.json");

fn sorted(catalog: &Catalog) -> Vec<Meeting> {
    let mut meetings = catalog.meetings().to_vec();
    meetings.sort_by(|a, b| (a.start, &a.component_name).cmp(&(b.start, &b.component_name)));
    meetings
}

#[test]
fn registrar_response_expands_to_the_sample_catalog() {
    let catalog = load_feed(FIXTURE, &[]).unwrap();
    assert_eq!(sorted(&catalog), sorted(&Catalog::sample()));
}

#[test]
fn registrar_catalog_yields_the_sample_schedules() {
    let from_feed = solve_catalog(&load_feed(FIXTURE, &[]).unwrap(), SearchOptions::default());
    let from_sample = solve_catalog(&Catalog::sample(), SearchOptions::default());
    assert_eq!(from_feed.solutions, from_sample.solutions);
}

#[test]
fn want_list_limits_the_courses() {
    let catalog = load_feed(FIXTURE, &[2023337795]).unwrap();
    assert_eq!(catalog.course_ids().into_iter().collect::<Vec<_>>(), vec![2023337795]);
    // Lecture, four labs, exam.
    assert_eq!(catalog.len(), 6);
}

#[test]
fn json_catalogs_load_by_path() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/registrar_sample.json");
    let catalog = load_path(&path, &[]).unwrap();
    assert_eq!(catalog.len(), Catalog::sample().len());
}

#[test]
fn repeated_want_still_schedules() {
    let once = load_feed(FIXTURE, &[2023337795]).unwrap();
    let twice = load_feed(FIXTURE, &[2023337795, 2023337795]).unwrap();
    assert_eq!(twice, once);
    assert_eq!(twice.len(), 6);
    assert_eq!(
        solve_catalog(&twice, SearchOptions::default()).solutions.len(),
        solve_catalog(&once, SearchOptions::default()).solutions.len()
    );
    assert!(!solve_catalog(&twice, SearchOptions::default()).solutions.is_empty());
}
