//! Subject identifiers as used in BIDS-style directory names.
//!
//! A subject identifier has the form `sub-<id>`. In directory names it is usually followed by
//! further entities separated by underscores, e.g. `sub-1176_ses-newborn`. Parsing keeps only
//! the part before the first underscore.

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use crate::error::{FsTablesError, Result};

/// The prefix every subject identifier starts with.
pub const SUBJECT_PREFIX: &str = "sub-";

/// Name of the key column holding subject identifiers in all produced tables.
pub const SUBJECT_COLUMN: &str = "study_id";

/// A validated `sub-<id>` token, uniquely naming one participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(String);

impl SubjectId {

    /// Parse a label like `sub-1176_ses-newborn` into `sub-1176`.
    ///
    /// The label must start with `sub-` and the part before the first underscore must contain at
    /// least one character after the prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use fstables::SubjectId;
    /// let id = SubjectId::from_label("sub-1176_ses-newborn").unwrap();
    /// assert_eq!("sub-1176", id.as_str());
    /// ```
    pub fn from_label(label: &str) -> Result<SubjectId> {
        let head = label.split('_').next().unwrap_or("");
        match head.strip_prefix(SUBJECT_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(SubjectId(head.to_string())),
            _ => Err(FsTablesError::InvalidSubjectId(label.to_string())),
        }
    }

    /// Extract the subject identifier from a file path.
    ///
    /// Exactly one path segment must start with `sub-`. A path without such a segment, or with
    /// several of them, is rejected instead of guessing which one is meant.
    ///
    /// # Examples
    ///
    /// ```
    /// use fstables::SubjectId;
    /// let id = SubjectId::from_path("freesurfer/sub-1176_ses-newborn/stats/brainvol.stats").unwrap();
    /// assert_eq!("sub-1176", id.as_str());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SubjectId> {
        let path = path.as_ref();
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .filter(|part| part.starts_with(SUBJECT_PREFIX))
            .collect();

        match segments.len() {
            0 => Err(FsTablesError::MissingSubjectId(path.to_path_buf())),
            1 => SubjectId::from_label(&segments[0]),
            n => Err(FsTablesError::AmbiguousSubjectId(path.to_path_buf(), n)),
        }
    }

    /// Build an identifier from the bare participant number used in demographics sheets, e.g. `1176`.
    pub fn from_number(id: &str) -> Result<SubjectId> {
        let id = id.trim();
        if id.is_empty() || id.contains('_') {
            return Err(FsTablesError::InvalidSubjectId(id.to_string()));
        }
        if id.starts_with(SUBJECT_PREFIX) {
            return SubjectId::from_label(id);
        }
        Ok(SubjectId(format!("{}{}", SUBJECT_PREFIX, id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SubjectId {
    type Err = FsTablesError;

    fn from_str(s: &str) -> Result<SubjectId> {
        SubjectId::from_label(s)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn subject_id_is_extracted_from_stats_path() {
        let path = "/data/MRI/newborn/derivatives/Nibabies_auto/sourcedata/freesurfer/sub-1176_ses-newborn/stats/lh.aparc.stats";
        assert_eq!("sub-1176", SubjectId::from_path(path).unwrap().as_str());
    }

    #[test]
    fn subject_id_without_suffix_is_kept_whole() {
        assert_eq!("sub-42", SubjectId::from_path("fs/sub-42/stats/brainvol.stats").unwrap().as_str());
    }

    #[test]
    fn path_without_subject_segment_is_rejected() {
        let err = SubjectId::from_path("fs/fsaverage/stats/brainvol.stats").unwrap_err();
        assert!(matches!(err, FsTablesError::MissingSubjectId(_)));
    }

    #[test]
    fn path_with_two_subject_segments_is_rejected() {
        let err = SubjectId::from_path("sub-1_ses-a/freesurfer/sub-2_ses-a/stats/brainvol.stats").unwrap_err();
        assert!(matches!(err, FsTablesError::AmbiguousSubjectId(_, 2)));
    }

    #[test]
    fn segments_merely_containing_sub_are_ignored() {
        let id = SubjectId::from_path("my-sub-dir/sub-7_run-1/stats/brainvol.stats").unwrap();
        assert_eq!("sub-7", id.as_str());
    }

    #[test]
    fn empty_subject_label_is_invalid() {
        assert!(SubjectId::from_label("sub-_ses-newborn").is_err());
        assert!(SubjectId::from_label("subject1").is_err());
        assert!(SubjectId::from_path("fs/sub-_ses-newborn/stats/x.stats").is_err());
    }

    #[test]
    fn bare_numbers_get_the_prefix() {
        assert_eq!("sub-1176", SubjectId::from_number("1176").unwrap().as_str());
        assert_eq!("sub-1176", SubjectId::from_number("sub-1176").unwrap().as_str());
        assert!(SubjectId::from_number("").is_err());
    }
}
