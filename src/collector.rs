//! Collecting per-subject stats files into one wide table.
//!
//! The stats files live in a FreeSurfer subjects directory, one directory per subject:
//! `<subjects_dir>/sub-1176_ses-newborn/stats/lh.aparc.stats`. They are found by a recursive
//! glob search, tagged with the subject identifier taken from their path, and stacked row-wise.

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, info};
use walkdir::WalkDir;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{FsTablesError, Result};
use crate::subject::{SubjectId, SUBJECT_COLUMN};
use crate::table::Table;

/// The glob for a per-subject stats file, relative to any directory of the search tree.
pub fn stats_pattern(stats_name: &str) -> String {
    format!("sub-*/stats/{}", stats_name)
}

fn build_matcher(pattern: &str) -> Result<GlobMatcher> {
    // Like a recursive glob: the pattern may match below any number of leading directories.
    let glob = GlobBuilder::new(&format!("**/{}", pattern))
        .literal_separator(true)
        .build()?;
    Ok(glob.compile_matcher())
}

/// Find all files below `dir` whose path relative to `dir` matches `pattern`, e.g. `sub-*/stats/brainvol.stats`.
///
/// `*` does not cross directory boundaries. The result is sorted, so the subject order of the
/// collected table does not depend on the file system. A directory that does not exist yields no files.
///
/// Entries that cannot be reached (unreadable directories, symlink loops, dangling links named
/// like a stats file) are errors. A dangling link that cannot be a stats file, like a broken
/// `fsaverage` link, is skipped.
pub fn find_stats_files<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let matcher = build_matcher(pattern)?;
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let is_match = |path: &Path| {
        path.strip_prefix(dir)
            .map(|rel| matcher.is_match(rel))
            .unwrap_or(false)
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let dangling = err.loop_ancestor().is_none()
                    && err.io_error().map(|e| e.kind() == ErrorKind::NotFound).unwrap_or(false);
                let unrelated = err.path().map(|path| !is_match(path)).unwrap_or(false);
                if dangling && unrelated {
                    debug!("Skipping dangling link {}", err.path().map(|p| p.display().to_string()).unwrap_or_default());
                    continue;
                }
                return Err(err.into());
            }
        };
        if entry.file_type().is_file() && is_match(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read one stats file and put its subject identifier into a new first column `study_id`.
pub fn read_subject_stats<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let subject = SubjectId::from_path(path)?;
    let mut table = Table::from_file(path)?;
    table.insert_constant(0, SUBJECT_COLUMN, subject.as_str())?;
    Ok(table)
}

/// Collect all stats files matching `pattern` below `dir` into one table with the subject
/// identifier in the first column.
///
/// Fails if no file matches, if a matched path does not contain exactly one `sub-*` segment, or
/// if a file cannot be read.
pub fn collect<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Table> {
    let dir = dir.as_ref();
    let files = find_stats_files(dir, pattern)?;
    if files.is_empty() {
        return Err(FsTablesError::NoStatsFiles(dir.to_path_buf(), pattern.to_string()));
    }

    let mut tables: Vec<Table> = Vec::with_capacity(files.len());
    for path in files.iter() {
        debug!("Reading {}", path.display());
        tables.push(read_subject_stats(path)?);
    }

    let dataset = Table::concat(tables);
    info!("Collected {} rows from {} '{}' files below {}.", dataset.num_rows(), files.len(), pattern, dir.display());
    Ok(dataset)
}
