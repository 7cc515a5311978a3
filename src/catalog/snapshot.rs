//! Binary catalog snapshots, so a parsed registrar feed can be reused
//! without refetching the response.
use super::Catalog;
use anyhow::{Context, Result, anyhow};
use std::path::Path;

pub const SNAPSHOT_VERSION: u32 = 1;

pub fn save_snapshot(catalog: &Catalog, path: &Path) -> Result<()> {
    savefile::save_file(path, SNAPSHOT_VERSION, catalog)
        .map_err(|e| anyhow!("failed to write catalog snapshot {}: {e:?}", path.display()))
}

/// Loads a snapshot and re-validates it, since the file may have been
/// produced by another build.
pub fn load_snapshot(path: &Path) -> Result<Catalog> {
    let raw: Catalog = savefile::load_file(path, SNAPSHOT_VERSION)
        .map_err(|e| anyhow!("failed to read catalog snapshot {}: {e:?}", path.display()))?;
    Catalog::new(raw.meetings().to_vec()).context("catalog snapshot failed validation")
}
