//! Readers turning the produced tables into analysis-ready datasets.

use tracing::warn;

use std::path::Path;

use crate::error::Result;
use crate::reshape::{melt, merge_hemispheres, zscore_columns};
use crate::subject::{SubjectId, SUBJECT_COLUMN};
use crate::table::Table;

/// The first column of an `asegstats2table` volume table, holding the subject directory names.
pub const ASEG_ID_COLUMN: &str = "Measure:volume";

/// The brain volume measures kept in the long brain volume dataset.
pub const BRAIN_VOLUME_COLUMNS: [&str; 5] = [
    "BrainSegVolNotVent",
    "SubCortGrayVol",
    "CortexVol",
    "TotalGrayVol",
    "CerebralWhiteMatterVol",
];

/// Structure name column of the aparc stats tables.
pub const STRUCT_NAME_COLUMN: &str = "StructName";

/// Columns of the demographics sheet holding the scan age in weeks, with their canonical names.
pub const SCAN_AGE_COLUMNS: [(&str, &str); 2] = [
    ("1mo_scan_age_wks", "newborn_scan_age_weeks"),
    ("6mo_scan_age_wks", "sixmonth_scan_age_weeks"),
];

/// Read the demographics sheet with the scan ages of all subjects.
///
/// The bare participant numbers in `study_id` are turned into subject identifiers (`1176` becomes
/// `sub-1176`), and only the identifier and the two scan age columns are kept, renamed to
/// `newborn_scan_age_weeks` and `sixmonth_scan_age_weeks`. Rows with a blank `study_id` cannot be
/// matched to any subject and are dropped with a warning.
pub fn read_demographics<P: AsRef<Path>>(path: P) -> Result<Table> {
    let mut table = Table::from_file(path)?;
    let keep: Vec<bool> = table.cells(SUBJECT_COLUMN)?
        .iter()
        .map(|id| !id.trim().is_empty())
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        warn!("Dropping {} demographics rows without a study_id.", dropped);
        table.retain_rows(&keep);
    }
    table.try_map_cells(SUBJECT_COLUMN, |id| Ok(SubjectId::from_number(id)?.to_string()))?;

    let mut keep = vec![SUBJECT_COLUMN];
    keep.extend(SCAN_AGE_COLUMNS.iter().map(|(from, _)| *from));
    let mut table = table.select(&keep)?;
    for (from, to) in SCAN_AGE_COLUMNS.iter() {
        table.rename(from, to)?;
    }
    Ok(table)
}

/// Read the volume table written by `asegstats2table` into a long dataset.
///
/// The subject directory names in the first column are reduced to subject identifiers. With
/// `zscore`, each of the [`BRAIN_VOLUME_COLUMNS`] is standardized across subjects first. The result
/// has the columns `study_id`, `region` and `volume`.
pub fn read_brainvol_long<P: AsRef<Path>>(path: P, zscore: bool) -> Result<Table> {
    let mut table = Table::from_file(path)?;
    table.rename(ASEG_ID_COLUMN, SUBJECT_COLUMN)?;
    table.try_map_cells(SUBJECT_COLUMN, |label| Ok(SubjectId::from_label(label)?.to_string()))?;

    if zscore {
        zscore_columns(&mut table, &BRAIN_VOLUME_COLUMNS)?;
    }

    melt(&table, &[SUBJECT_COLUMN], Some(&BRAIN_VOLUME_COLUMNS[..]), "region", "volume")
}

/// Read a collected `aparc_<session>_<hemi>.csv` table into long format, with the columns
/// `study_id`, `StructName`, `metric` and `value`.
pub fn read_aparc_long<P: AsRef<Path>>(path: P) -> Result<Table> {
    let table = Table::from_file(path)?;
    melt(&table, &[SUBJECT_COLUMN, STRUCT_NAME_COLUMN], None, "metric", "value")
}

/// Read the collected aparc tables of both hemispheres into one long dataset.
///
/// Structure names lose their `lh-`/`rh-` prefix, and a `hemisphere` column tells the rows apart.
pub fn read_aparc_both_hemispheres<P: AsRef<Path>, Q: AsRef<Path>>(path_lh: P, path_rh: Q) -> Result<Table> {
    let lh = read_aparc_long(path_lh)?;
    let rh = read_aparc_long(path_rh)?;
    merge_hemispheres(lh, rh, STRUCT_NAME_COLUMN)
}

/// Add the scan ages from the demographics table to a dataset, matched on `study_id`.
///
/// All rows of `dataset` are kept in order. Subjects missing from the demographics get `NaN` ages.
pub fn join_demographics(dataset: &Table, demographics: &Table) -> Result<Table> {
    dataset.left_join(demographics, SUBJECT_COLUMN)
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::error::FsTablesError;

    const DEMOGRAPHICS_FILE: &str = "resources/csv/babies_demo_updated_with_ages.csv";
    const ASEG_TABLE_FILE: &str = "resources/output/aseg_newborn.table.txt";

    #[test]
    fn demographics_are_subset_and_renamed() {
        let demo = read_demographics(DEMOGRAPHICS_FILE).unwrap();

        assert_eq!(
            vec!["study_id", "newborn_scan_age_weeks", "sixmonth_scan_age_weeks"],
            demo.column_names().to_vec()
        );
        assert_eq!(3, demo.num_rows());
        assert_eq!(vec!["sub-1176", "sub-1180", "sub-1201"], demo.cells("study_id").unwrap());
    }

    #[test]
    fn brainvol_table_is_reshaped_to_long() {
        let long = read_brainvol_long(ASEG_TABLE_FILE, false).unwrap();

        assert_eq!(vec!["study_id", "region", "volume"], long.column_names().to_vec());
        assert_eq!(3 * BRAIN_VOLUME_COLUMNS.len(), long.num_rows());
        assert_eq!("sub-1176", long.cells("study_id").unwrap()[0]);
        assert_eq!("BrainSegVolNotVent", long.cells("region").unwrap()[0]);
        assert!(!long.cells("region").unwrap().contains(&String::from("Left-Lateral-Ventricle")));
    }

    #[test]
    fn zscored_brainvol_is_standardized_per_region() {
        let long = read_brainvol_long(ASEG_TABLE_FILE, true).unwrap();
        let regions = long.cells("region").unwrap();
        let volumes = long.numeric("volume").unwrap();

        for region in BRAIN_VOLUME_COLUMNS.iter() {
            let values: Vec<f64> = (0..long.num_rows())
                .filter(|&r| regions[r] == *region)
                .map(|r| volumes[r])
                .collect();
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            approx::assert_abs_diff_eq!(0.0, mean, epsilon = 1e-9);
            approx::assert_abs_diff_eq!(1.0, var.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn missing_demographics_file_is_reported() {
        let err = read_demographics("resources/csv/nope.csv").unwrap_err();
        assert!(matches!(err, FsTablesError::MissingInput(_)));
    }

    #[test]
    fn blank_demographics_ids_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demo.csv");
        std::fs::write(&path, "study_id,1mo_scan_age_wks,6mo_scan_age_wks\n1176,3.4,26.1\n,4.0,27.0\n1201,2.9,25.6\n").unwrap();

        let demo = read_demographics(&path).unwrap();

        assert_eq!(vec!["sub-1176", "sub-1201"], demo.cells("study_id").unwrap());
        assert_eq!(vec![26.1, 25.6], demo.numeric("sixmonth_scan_age_weeks").unwrap().to_vec());
    }

    #[test]
    fn brainvol_is_joined_with_scan_ages() {
        let long = read_brainvol_long(ASEG_TABLE_FILE, false).unwrap();
        let mut demo = read_demographics(DEMOGRAPHICS_FILE).unwrap();
        demo.retain_rows(&[true, true, false]);

        let joined = join_demographics(&long, &demo).unwrap();

        assert_eq!(long.num_rows(), joined.num_rows());
        assert_eq!(
            vec!["study_id", "region", "volume", "newborn_scan_age_weeks", "sixmonth_scan_age_weeks"],
            joined.column_names().to_vec()
        );
        let ids = joined.cells("study_id").unwrap();
        let ages = joined.numeric("newborn_scan_age_weeks").unwrap();
        for (row, id) in ids.iter().enumerate() {
            match id.as_str() {
                "sub-1176" => assert_eq!(3.4, ages[row]),
                "sub-1180" => assert_eq!(4.1, ages[row]),
                _ => assert!(ages[row].is_nan()),
            }
        }
    }
}
