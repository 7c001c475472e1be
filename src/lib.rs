//! Collect per-subject FreeSurfer stats files into tabular datasets.
//!
//! The focus of this package is on the stats files written by FreeSurfer (as run by Nibabies) for
//! infant MRI sessions: finding them below a subjects directory, tagging each with its subject
//! identifier, stacking them into wide tables, and reshaping those into long format for analysis.

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod reshape;
pub mod session;
pub mod subject;
pub mod table;
pub mod traits;
pub mod util;

pub use aggregate::AsegStats2Table;
pub use collector::{collect, find_stats_files, stats_pattern};
pub use config::ProjectConfig;
pub use dataset::{join_demographics, read_aparc_both_hemispheres, read_aparc_long, read_brainvol_long, read_demographics};
pub use error::{FsTablesError, Result};
pub use reshape::{melt, merge_hemispheres, zscore_columns};
pub use session::{Hemisphere, Metric, Session};
pub use subject::SubjectId;
pub use table::{Column, Table};
pub use traits::StatsAggregator;
