pub mod data_store;
pub mod kv_store;
pub mod schema;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

/// Atomic file write: serialize to a sibling .tmp file, fsync, rename over
/// the target. A crash mid-save leaves the previous file intact.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    fs::rename(&tmp_path, path)?;
    Ok(())
}
