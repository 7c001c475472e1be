//! Project path configuration.
//!
//! [`ProjectConfig`] holds every location the pipeline reads from or writes to. It is built once
//! at startup and passed explicitly to all I/O functions, so tests can point it at temporary
//! directories.

use std::path::PathBuf;

use crate::session::{Hemisphere, Session};

/// Relative path from a session directory to the FreeSurfer subjects directory produced by Nibabies.
pub const FREESURFER_SUBDIR: &str = "derivatives/Nibabies_auto/sourcedata/freesurfer";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Root of the MRI tree, containing one directory per session.
    pub mri_root: PathBuf,

    /// Directory receiving all produced tables. The subject list files for the external tool
    /// are expected here as well.
    pub output_dir: PathBuf,
}

impl ProjectConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(mri_root: P, output_dir: Q) -> ProjectConfig {
        ProjectConfig {
            mri_root: mri_root.into(),
            output_dir: output_dir.into(),
        }
    }

    /// The FreeSurfer subjects directory of a session, e.g. `<mri_root>/six_month/derivatives/Nibabies_auto/sourcedata/freesurfer`.
    pub fn subjects_dir(&self, session: Session) -> PathBuf {
        self.mri_root.join(session.dir_name()).join(FREESURFER_SUBDIR)
    }

    /// The qdec subject list passed to `asegstats2table`.
    pub fn subject_list_path(&self, session: Session) -> PathBuf {
        self.output_dir.join(format!("dec_{}.table.dat", session.label()))
    }

    /// The table written by `asegstats2table`.
    pub fn aseg_table_path(&self, session: Session) -> PathBuf {
        self.output_dir.join(format!("aseg_{}.table.txt", session.label()))
    }

    /// The wide brain volume table collected from all `brainvol.stats` files.
    pub fn brainvol_path(&self, session: Session) -> PathBuf {
        self.output_dir.join(format!("brainvol_{}.csv", session.label()))
    }

    /// The wide table collected from all `{lh,rh}.aparc.stats` files of one hemisphere.
    pub fn aparc_path(&self, session: Session, hemisphere: Hemisphere) -> PathBuf {
        self.output_dir.join(format!("aparc_{}_{}.csv", session.label(), hemisphere.label()))
    }

    /// Whether the MRI root exists. Useful to fail early with a clear message when the lab share is not mounted.
    pub fn mri_root_exists(&self) -> bool {
        self.mri_root.is_dir()
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn session_paths_follow_the_nibabies_layout() {
        let cfg = ProjectConfig::new("/mri", "/out");
        assert_eq!(
            PathBuf::from("/mri/six_month/derivatives/Nibabies_auto/sourcedata/freesurfer"),
            cfg.subjects_dir(Session::SixMonth)
        );
        assert_eq!(PathBuf::from("/out/dec_newborn.table.dat"), cfg.subject_list_path(Session::Newborn));
        assert_eq!(PathBuf::from("/out/aseg_sixmonth.table.txt"), cfg.aseg_table_path(Session::SixMonth));
        assert_eq!(PathBuf::from("/out/brainvol_newborn.csv"), cfg.brainvol_path(Session::Newborn));
        assert_eq!(PathBuf::from("/out/aparc_newborn_rh.csv"), cfg.aparc_path(Session::Newborn, Hemisphere::Rh));
    }

    #[test]
    fn missing_mri_root_is_detected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::new(tmp.path(), tmp.path()).mri_root_exists());
        assert!(!ProjectConfig::new(tmp.path().join("not-mounted"), tmp.path()).mri_root_exists());
    }
}
