//! The runs behind the command line: collect one metric of one session and write the table.

use tracing::info;

use std::fs;
use std::path::PathBuf;

use crate::aggregate::BRAINVOL_STATS;
use crate::collector::{collect, stats_pattern};
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::session::{Hemisphere, Metric, Session};
use crate::table::Table;
use crate::traits::StatsAggregator;

/// Run the aggregation tool for the volume table of a session, then collect all `brainvol.stats`
/// files of that session into `brainvol_<session>.csv`.
///
/// A failing aggregation tool stops the run before anything is collected.
pub fn run_aseg(cfg: &ProjectConfig, session: Session, aggregator: &dyn StatsAggregator) -> Result<(PathBuf, Table)> {
    let subjects_dir = cfg.subjects_dir(session);
    fs::create_dir_all(&cfg.output_dir)?;

    aggregator.aggregate(
        &subjects_dir,
        &cfg.subject_list_path(session),
        BRAINVOL_STATS,
        &cfg.aseg_table_path(session),
    )?;
    info!("Wrote {}", cfg.aseg_table_path(session).display());

    let dataset = collect(&subjects_dir, &stats_pattern(BRAINVOL_STATS))?;
    let out = cfg.brainvol_path(session);
    dataset.to_file(&out)?;
    info!("Wrote {} with {} subjects.", out.display(), dataset.num_rows());
    Ok((out, dataset))
}

/// Collect the `<hemi>.aparc.stats` files of all subjects of a session into `aparc_<session>_<hemi>.csv`.
pub fn run_aparc(cfg: &ProjectConfig, session: Session, hemisphere: Hemisphere) -> Result<(PathBuf, Table)> {
    let subjects_dir = cfg.subjects_dir(session);
    fs::create_dir_all(&cfg.output_dir)?;

    let dataset = collect(&subjects_dir, &stats_pattern(&hemisphere.aparc_stats_file()))?;
    let out = cfg.aparc_path(session, hemisphere);
    dataset.to_file(&out)?;
    info!("Wrote {} with {} rows.", out.display(), dataset.num_rows());
    Ok((out, dataset))
}

/// Dispatch on the metric. The hemisphere is only used for [`Metric::Aparc`].
pub fn run(cfg: &ProjectConfig, session: Session, metric: Metric, hemisphere: Hemisphere, aggregator: &dyn StatsAggregator) -> Result<PathBuf> {
    let (out, _dataset) = match metric {
        Metric::Aseg => run_aseg(cfg, session, aggregator)?,
        Metric::Aparc => run_aparc(cfg, session, hemisphere)?,
    };
    Ok(out)
}
