use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::core::config::ScanSettings;

/// Finds every file under `base/scan.root` with the configured extension,
/// minus anything matched by `scan.exclude`. The result is sorted.
///
/// Symlinks are followed. Entries the walk cannot read (permission denied,
/// symlink loops, files vanishing mid-walk) are logged and skipped; only a
/// missing root or a bad exclude glob is an error.
pub fn discover_files(base: &Path, scan: &ScanSettings) -> Result<Vec<PathBuf>> {
    let root = base.join(&scan.root);
    if !root.is_dir() {
        anyhow::bail!("Scan root {} is not a directory", root.display());
    }

    let excludes = build_excludes(&scan.exclude)?;
    let extension = scan.extension.trim_start_matches('.');

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let relative = path.strip_prefix(&root).unwrap_or(path);
        if excludes.is_match(relative) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid exclude glob: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("Failed to compile exclude globs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discovers_by_extension_and_skips_excludes() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(lib.join("screens")).unwrap();
        fs::create_dir_all(lib.join("generated")).unwrap();
        fs::write(lib.join("main.dart"), "").unwrap();
        fs::write(lib.join("screens").join("home.dart"), "").unwrap();
        fs::write(lib.join("generated").join("l10n.dart"), "").unwrap();
        fs::write(lib.join("notes.txt"), "").unwrap();

        let scan = ScanSettings {
            exclude: vec!["generated/**".to_string()],
            ..ScanSettings::default()
        };
        let files = discover_files(dir.path(), &scan).unwrap();
        assert_eq!(
            files,
            vec![lib.join("main.dart"), lib.join("screens").join("home.dart")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_errors_are_skipped() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(lib.join("nested")).unwrap();
        fs::write(lib.join("main.dart"), "").unwrap();
        fs::write(lib.join("nested").join("page.dart"), "").unwrap();
        // A loop back to an ancestor and a dangling link both make the walk yield errors.
        std::os::unix::fs::symlink(&lib, lib.join("nested").join("back")).unwrap();
        std::os::unix::fs::symlink(lib.join("gone.dart"), lib.join("dangling.dart")).unwrap();

        let files = discover_files(dir.path(), &ScanSettings::default()).unwrap();
        assert_eq!(
            files,
            vec![lib.join("main.dart"), lib.join("nested").join("page.dart")]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(discover_files(dir.path(), &ScanSettings::default()).is_err());
    }
}
