//! Disk I/O helpers: atomic record writes and directory reads.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use crate::paths::{RecordPaths, TMP_SUFFIX};
use std::fs::DirBuilder;
use std::path::{Path, PathBuf};

/// Permission bits for directories the store creates (rwxr-xr-x).
#[cfg(unix)]
pub const DIR_MODE: u32 = 0o755;

/// Write `bytes` to `paths.tmp_path` and then rename it over
/// `paths.final_path`. A failure before the rename leaves the previous
/// record untouched. A failed rename may leave the temp file behind.
pub fn atomic_write(paths: &RecordPaths, bytes: &[u8]) -> Result<()> {
    std::fs::write(&paths.tmp_path, bytes)
        .map_err(|e| Error::Io(format!("write {}: {e}", paths.tmp_path.display())))?;
    std::fs::rename(&paths.tmp_path, &paths.final_path)
        .map_err(|e| Error::Io(format!("rename into {}: {e}", paths.final_path.display())))
}

/// Create `dir` and any missing parents. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(dir)
        .map_err(|e| Error::Io(format!("create {}: {e}", dir.display())))
}

/// Read the whole file at `path`.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io_at(path, e))
}

/// Record files in `dir`, sorted by file name. Subdirectories and leftover
/// `*.<ext>.tmp` staging files are skipped.
pub fn list_records(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let staging = format!(".{ext}.{TMP_SUFFIX}");
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io_at(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io_at(dir, e))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().ends_with(&staging) {
            continue;
        }
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            // deleted since read_dir listed it
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io_at(&path, e)),
        }
    }
    files.sort();
    Ok(files)
}
