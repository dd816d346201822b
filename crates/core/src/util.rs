use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// 以臨時檔案搭配 rename 實現原子寫入。 / Writes data atomically through a uniquely
/// named sibling temporary file followed by a rename.
///
/// Concurrent writers each get their own temporary file, so readers only ever
/// see one complete version. The temporary file is removed if any step fails.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp_file = NamedTempFile::new_in(parent)?;
    tmp_file.write_all(data)?;
    tmp_file.as_file().sync_all()?;
    tmp_file.persist(path)?;
    Ok(())
}

/// 在既有路徑後附加副檔名（不取代原副檔名）。 / Appends `.extension` to the full
/// file name instead of replacing the current extension.
pub fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
