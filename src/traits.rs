use std::path::Path;

use crate::error::Result;

/// Something that turns per-subject stats files into one summary table, like FreeSurfer's `asegstats2table`.
pub trait StatsAggregator {
    /// Aggregate the stats file `stats_name` of all subjects listed in `subject_list` below
    /// `subjects_dir` into `table_file`.
    fn aggregate(&self, subjects_dir: &Path, subject_list: &Path, stats_name: &str, table_file: &Path) -> Result<()>;
}
