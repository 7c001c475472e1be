//! Running FreeSurfer's `asegstats2table` to build the summary table of a session.
//!
//! See <https://surfer.nmr.mgh.harvard.edu/fswiki/asegstats2table>. The tool must be on `PATH`.
//! The subjects directory is passed to the child process in `SUBJECTS_DIR`; the environment of
//! the calling process is left untouched.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{FsTablesError, Result};
use crate::traits::StatsAggregator;

pub const ASEGSTATS2TABLE: &str = "asegstats2table";

/// The per-subject stats file summarised by the aseg run.
pub const BRAINVOL_STATS: &str = "brainvol.stats";

/// Invocation of `asegstats2table --qdec <list> --stats <name> --tablefile <out>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsegStats2Table {
    /// The executable to run. Defaults to `asegstats2table`.
    pub program: String,
}

impl Default for AsegStats2Table {
    fn default() -> AsegStats2Table {
        AsegStats2Table {
            program: String::from(ASEGSTATS2TABLE),
        }
    }
}

impl AsegStats2Table {

    /// Build the command line without running it.
    pub fn command(&self, subjects_dir: &Path, subject_list: &Path, stats_name: &str, table_file: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--qdec")
            .arg(subject_list)
            .arg("--stats")
            .arg(stats_name)
            .arg("--tablefile")
            .arg(table_file)
            .env("SUBJECTS_DIR", subjects_dir);
        cmd
    }
}

impl StatsAggregator for AsegStats2Table {

    /// Run the tool and wait for it. A non-zero exit status is an error.
    fn aggregate(&self, subjects_dir: &Path, subject_list: &Path, stats_name: &str, table_file: &Path) -> Result<()> {
        let mut cmd = self.command(subjects_dir, subject_list, stats_name, table_file);
        debug!("Running {:?} with SUBJECTS_DIR={}", cmd, subjects_dir.display());

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => FsTablesError::ToolNotFound(self.program.clone()),
            _ => FsTablesError::Io(e),
        })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} failed: {}", self.program, stderr.trim());
            Err(FsTablesError::ToolFailed(self.program.clone(), output.status.code()))
        }
    }
}
