//! Mapping from (root, collection, resource) to paths on disk.
//!
//! Everything here except [`probe`] is pure: no I/O and no errors. Callers
//! validate names before resolving.

use std::ffi::OsString;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Suffix appended to a record path while it is being written.
pub const TMP_SUFFIX: &str = "tmp";

/// Final and temporary locations of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPaths {
    /// `root/collection/resource.ext`, where committed content lives.
    pub final_path: PathBuf,
    /// `final_path` + `.tmp`, the staging file renamed over `final_path`.
    pub tmp_path: PathBuf,
}

/// Directory holding every record of `collection`.
pub fn collection_dir(root: &Path, collection: &str) -> PathBuf {
    root.join(collection)
}

/// Resolve the final and temporary paths for a record.
pub fn resolve(root: &Path, collection: &str, resource: &str, ext: &str) -> RecordPaths {
    let bare = collection_dir(root, collection).join(resource);
    let final_path = with_suffix(&bare, ext);
    let tmp_path = with_suffix(&final_path, TMP_SUFFIX);
    RecordPaths {
        final_path,
        tmp_path,
    }
}

/// Append `.suffix` to the whole file name. Unlike `Path::with_extension`
/// this never replaces an existing dot-part, so `jim.halpert` stays intact.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}

/// Stat `path` as given, then `path.ext`. Returns the first path that exists
/// together with its metadata, so callers can pass a resource name with or
/// without its extension and tell files from directories.
pub fn probe(path: &Path, ext: &str) -> io::Result<(PathBuf, Metadata)> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok((path.to_path_buf(), meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let with_ext = with_suffix(path, ext);
            let meta = std::fs::metadata(&with_ext)?;
            Ok((with_ext, meta))
        }
        Err(e) => Err(e),
    }
}

/// Lexically clean a root path: drop `.` segments and fold `..` into the
/// preceding segment. An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_builds_final_and_tmp() {
        let p = resolve(Path::new("/db"), "users", "pam", "json");
        assert_eq!(p.final_path, PathBuf::from("/db/users/pam.json"));
        assert_eq!(p.tmp_path, PathBuf::from("/db/users/pam.json.tmp"));
    }

    #[test]
    fn resolve_keeps_dots_in_resource_names() {
        let p = resolve(Path::new("db"), "users", "jim.halpert", "json");
        assert_eq!(p.final_path, PathBuf::from("db/users/jim.halpert.json"));
    }

    #[test]
    fn normalize_cleans_segments() {
        assert_eq!(normalize(Path::new("./a/./b/../c/")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn probe_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dwight.json"), b"{}\n").unwrap();

        let (found, meta) = probe(&dir.path().join("dwight"), "json").unwrap();
        assert_eq!(found, dir.path().join("dwight.json"));
        assert!(meta.is_file());

        let (found, _) = probe(&dir.path().join("dwight.json"), "json").unwrap();
        assert_eq!(found, dir.path().join("dwight.json"));

        let err = probe(&dir.path().join("angela"), "json").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn probe_reports_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();
        let (_, meta) = probe(&dir.path().join("archive"), "json").unwrap();
        assert!(meta.is_dir());
    }
}
