//! JSON persistence of the harvested collections

use crate::model::{ProjectDetail, ProjectReference};
use crate::output::summary::OutputResult;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Writes `value` as pretty-printed UTF-8 JSON
///
/// Parent directories are created as needed. Non-ASCII text is written
/// verbatim, not as `\u` escapes.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Writes the discovered reference collection
pub fn write_references(references: &[ProjectReference], path: &Path) -> OutputResult<()> {
    write_json(references, path)
}

/// Writes the detail collection, failure records included
pub fn write_details(details: &[ProjectDetail], path: &Path) -> OutputResult<()> {
    write_json(details, path)
}
