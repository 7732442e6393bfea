pub mod indices;
pub mod scan;
pub mod summary;

use std::path::PathBuf;

use crate::error::Result;
use crate::models::IndexUniverse;

/// Built-in universe, or a custom one from --groups-file
fn load_universe(groups_file: Option<PathBuf>) -> Result<IndexUniverse> {
    match groups_file {
        Some(path) => IndexUniverse::from_file(path),
        None => Ok(IndexUniverse::builtin()),
    }
}
