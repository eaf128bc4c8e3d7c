//! Flat directory backup with timestamp collision handling.
//!
//! Copies every regular file from a source directory into a destination
//! directory, creating the destination when missing. Subdirectories are
//! skipped, not recursed into. When a file of the same name already exists
//! at the destination, the copy lands under a `name_YYYYmmdd_HHMMSS.ext`
//! variant instead of overwriting.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::core::errors::{CuaError, Result};

/// Outcome of one file within a backup run.
#[derive(Debug, Clone, Serialize)]
pub struct CopiedFile {
    /// File name within the source directory.
    pub name: String,
    /// Where the copy landed.
    pub dest: PathBuf,
    /// Whether a name clash forced a timestamped rename.
    pub renamed: bool,
}

/// Structured report from a backup run.
///
/// Per-file copy failures are recorded here rather than aborting the run;
/// only a missing source directory is fatal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackupReport {
    /// Files copied, in directory iteration order.
    pub copied: Vec<CopiedFile>,
    /// Entries skipped because they are directories.
    pub skipped_dirs: usize,
    /// Per-file failures as `(name, message)` pairs.
    pub failures: Vec<(String, String)>,
    /// Whether the destination directory had to be created.
    pub created_dest: bool,
}

/// Copy the regular files of `source` into `dest`.
pub fn backup_dir(source: &Path, dest: &Path) -> Result<BackupReport> {
    if !source.is_dir() {
        return Err(CuaError::InvalidConfig {
            details: format!("source directory '{}' does not exist", source.display()),
        });
    }

    let mut report = BackupReport::default();

    if !dest.exists() {
        std::fs::create_dir_all(dest).map_err(|source_err| CuaError::io(dest, source_err))?;
        report.created_dest = true;
    }

    let entries = std::fs::read_dir(source).map_err(|source_err| CuaError::io(source, source_err))?;
    for entry in entries {
        let entry = entry.map_err(|source_err| CuaError::io(source, source_err))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                report.failures.push((name, err.to_string()));
                continue;
            }
        };
        if file_type.is_dir() {
            report.skipped_dirs += 1;
            continue;
        }

        let mut dest_path = dest.join(&name);
        let mut renamed = false;
        if dest_path.exists() {
            let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
            dest_path = dest.join(timestamped_name(&name, &stamp));
            renamed = true;
        }

        match std::fs::copy(entry.path(), &dest_path) {
            Ok(_) => report.copied.push(CopiedFile {
                name,
                dest: dest_path,
                renamed,
            }),
            Err(err) => report.failures.push((name, err.to_string())),
        }
    }

    Ok(report)
}

/// Insert a timestamp suffix before the extension: `data.txt` with stamp
/// `20260830_120000` becomes `data_20260830_120000.txt`.
#[must_use]
pub fn timestamped_name(file_name: &str, stamp: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{stamp}.{ext}"),
        _ => format!("{file_name}_{stamp}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{backup_dir, timestamped_name};
    use std::fs;

    #[test]
    fn suffix_goes_before_the_extension() {
        assert_eq!(
            timestamped_name("notes.txt", "20260830_120000"),
            "notes_20260830_120000.txt"
        );
        assert_eq!(
            timestamped_name("archive.tar.gz", "20260830_120000"),
            "archive.tar_20260830_120000.gz"
        );
        assert_eq!(timestamped_name("README", "20260830_120000"), "README_20260830_120000");
        // Dotfiles have no stem to split on.
        assert_eq!(timestamped_name(".env", "20260830_120000"), ".env_20260830_120000");
    }

    #[test]
    fn copies_files_and_creates_missing_destination() {
        let source = tempfile::tempdir().expect("source dir");
        let dest_root = tempfile::tempdir().expect("dest root");
        let dest = dest_root.path().join("backups");

        fs::write(source.path().join("a.txt"), b"alpha").expect("write");
        fs::write(source.path().join("b.txt"), b"beta").expect("write");
        fs::create_dir(source.path().join("nested")).expect("mkdir");

        let report = backup_dir(source.path(), &dest).expect("backup");
        assert!(report.created_dest);
        assert_eq!(report.copied.len(), 2);
        assert_eq!(report.skipped_dirs, 1);
        assert!(report.failures.is_empty());
        assert_eq!(fs::read(dest.join("a.txt")).expect("read"), b"alpha");
    }

    #[test]
    fn name_clash_gets_a_timestamped_copy_instead_of_overwrite() {
        let source = tempfile::tempdir().expect("source dir");
        let dest = tempfile::tempdir().expect("dest dir");

        fs::write(source.path().join("report.csv"), b"new").expect("write");
        fs::write(dest.path().join("report.csv"), b"old").expect("write");

        let report = backup_dir(source.path(), dest.path()).expect("backup");
        assert_eq!(report.copied.len(), 1);
        assert!(report.copied[0].renamed);

        // Original untouched, timestamped copy carries the new contents.
        assert_eq!(fs::read(dest.path().join("report.csv")).expect("read"), b"old");
        assert_eq!(fs::read(&report.copied[0].dest).expect("read"), b"new");
        let copied_name = report.copied[0]
            .dest
            .file_name()
            .expect("file name")
            .to_string_lossy()
            .into_owned();
        assert!(copied_name.starts_with("report_"));
        assert!(copied_name.ends_with(".csv"));
    }

    #[test]
    fn missing_source_is_fatal() {
        let dest = tempfile::tempdir().expect("dest dir");
        let err = backup_dir(std::path::Path::new("/nonexistent/cua-src"), dest.path())
            .expect_err("missing source");
        assert_eq!(err.code(), "CUA-1001");
    }
}
