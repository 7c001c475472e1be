//! fstables - collect FreeSurfer stats of one session into a table.
//!
//! Finds the `sub-*/stats/*.stats` files written by FreeSurfer below a session's subjects
//! directory and stacks them into one CSV file in the output directory.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use std::path::PathBuf;

use fstables::{pipeline, AsegStats2Table, Hemisphere, Metric, ProjectConfig, Session};

/// Get FreeSurfer *.stats files from Nibabies/derivatives/sourcedata/freesurfer/sub-*
#[derive(Parser, Debug)]
#[command(name = "fstables", version)]
pub struct Cli {
    /// Scan session to collect
    #[arg(long, value_enum)]
    pub session: Session,

    /// Volumetric outputs (brainvol.stats, also runs asegstats2table) or surface outputs (aparc.stats)
    #[arg(long, value_enum, default_value_t = Metric::Aseg)]
    pub metric: Metric,

    /// If --metric is aparc, whether to collect lh.aparc.stats or rh.aparc.stats
    #[arg(long, visible_alias = "hemispheres", value_enum, default_value_t = Hemisphere::Lh)]
    pub hemisphere: Hemisphere,

    /// Root of the MRI tree holding one directory per session
    #[arg(long, env = "FSTABLES_MRI_ROOT")]
    pub mri_root: PathBuf,

    /// Directory for the produced tables and the qdec subject lists
    #[arg(long, env = "FSTABLES_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cfg = ProjectConfig::new(cli.mri_root, cli.output_dir);
    if !cfg.mri_root_exists() {
        bail!("MRI root '{}' does not exist, is the lab share mounted?", cfg.mri_root.display());
    }

    let out = pipeline::run(&cfg, cli.session, cli.metric, cli.hemisphere, &AsegStats2Table::default())
        .with_context(|| format!("Collecting {} stats for the {} session failed", cli.metric, cli.session))?;
    println!("{}", out.display());
    Ok(())
}
