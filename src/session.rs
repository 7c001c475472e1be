//! The categorical selectors of a run: scan session, metric type and hemisphere.

use clap::ValueEnum;
use std::fmt;

/// One of the two scan timepoints of the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Session {
    /// The early-infancy scan.
    Newborn,
    /// The follow-up scan at six months.
    #[value(name = "sixmonth")]
    SixMonth,
}

impl Session {
    /// The name used in output file names, e.g. `brainvol_sixmonth.csv`.
    pub fn label(&self) -> &'static str {
        match self {
            Session::Newborn => "newborn",
            Session::SixMonth => "sixmonth",
        }
    }

    /// The name of the session directory below the MRI root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Session::Newborn => "newborn",
            Session::SixMonth => "six_month",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which kind of FreeSurfer stats to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Metric {
    /// Volumetric summary from `brainvol.stats`.
    Aseg,
    /// Surface parcellation stats from `{lh,rh}.aparc.stats`.
    Aparc,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::Aseg => write!(f, "aseg"),
            Metric::Aparc => write!(f, "aparc"),
        }
    }
}

/// A brain hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Hemisphere {
    Lh,
    Rh,
}

impl Hemisphere {
    pub fn label(&self) -> &'static str {
        match self {
            Hemisphere::Lh => "lh",
            Hemisphere::Rh => "rh",
        }
    }

    /// The tag FreeSurfer puts in front of structure names, e.g. `lh-` in `lh-insula`.
    pub fn struct_prefix(&self) -> &'static str {
        match self {
            Hemisphere::Lh => "lh-",
            Hemisphere::Rh => "rh-",
        }
    }

    /// The per-subject stats file name for this hemisphere, e.g. `lh.aparc.stats`.
    pub fn aparc_stats_file(&self) -> String {
        format!("{}.aparc.stats", self.label())
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
