//! Reshaping of collected stats tables: z-score standardization, wide to long conversion, and
//! merging of per-hemisphere tables.
//!
//! All functions here are pure: they take tables and return tables, and do no I/O.

use ndarray::Array1;
use ndarray_stats::SummaryStatisticsExt;
use tracing::warn;

use crate::error::{FsTablesError, Result};
use crate::session::Hemisphere;
use crate::table::{Column, Table};

/// Name of the column added by [`merge_hemispheres`].
pub const HEMISPHERE_COLUMN: &str = "hemisphere";

/// Z-score over all values: `(x - mean) / std`, with the population standard deviation (ddof = 0).
/// Returns `(mean, std)` used for normalisation.
///
/// A constant input has a standard deviation of zero and yields non-finite values. `NaN` inputs
/// propagate to all outputs. An empty input is left unchanged.
pub fn zscore_inplace(values: &mut Array1<f64>) -> (f64, f64) {
    let mean = match values.mean() {
        Some(m) => m,
        None => return (f64::NAN, f64::NAN),
    };
    let var = values.central_moment(2).unwrap_or(f64::NAN);
    let std = var.sqrt();
    values.mapv_inplace(|v| (v - mean) / std);
    (mean, std)
}

/// Z-score each of the given numeric columns independently, across all rows of the table.
pub fn zscore_columns(table: &mut Table, columns: &[&str]) -> Result<()> {
    for name in columns {
        let values = table.numeric_mut(name)?;
        let (_mean, std) = zscore_inplace(values);
        if std == 0.0 {
            warn!("Column '{}' is constant, its z-scores are not finite.", name);
        }
    }
    Ok(())
}

/// Repeat every cell of `column` `times` times in a row, e.g. `[a, b]` with 2 becomes `[a, a, b, b]`.
fn repeat_cells(column: &Column, times: usize) -> Column {
    match column {
        Column::Text(cells) => Column::Text(
            cells.iter().flat_map(|c| std::iter::repeat(c.clone()).take(times)).collect(),
        ),
        Column::Numeric(values) => Column::Numeric(
            values.iter().flat_map(|v| std::iter::repeat(*v).take(times)).collect(),
        ),
    }
}

/// Unpivot a wide table into long format.
///
/// Every row of `table` becomes one row per value column, holding the `id_vars` cells, the name of
/// the value column (in a new column `var_name`), and its value (in a new column `value_name`).
/// If `value_vars` is `None`, all columns not listed in `id_vars` are unpivoted. Rows are emitted
/// subject-major: all value columns of the first input row, then those of the second, and so on.
///
/// All value columns must be numeric.
///
/// # Examples
///
/// ```
/// use fstables::{melt, Table};
/// let wide = Table::from_reader("study_id,A,B\nsub-1,2,4\nsub-2,4,8\n".as_bytes(), b',').unwrap();
/// let long = melt(&wide, &["study_id"], None, "region", "volume").unwrap();
/// assert_eq!(4, long.num_rows());
/// assert_eq!(vec!["sub-1", "sub-1", "sub-2", "sub-2"], long.cells("study_id").unwrap());
/// assert_eq!(vec!["A", "B", "A", "B"], long.cells("region").unwrap());
/// ```
pub fn melt(table: &Table, id_vars: &[&str], value_vars: Option<&[&str]>, var_name: &str, value_name: &str) -> Result<Table> {
    for id in id_vars {
        if !table.has_column(id) {
            return Err(FsTablesError::MissingColumn(id.to_string()));
        }
    }

    let value_vars: Vec<&str> = match value_vars {
        Some(vars) => vars.to_vec(),
        None => table.column_names()
            .iter()
            .map(|n| n.as_str())
            .filter(|n| !id_vars.contains(n))
            .collect(),
    };

    let mut value_columns: Vec<&Array1<f64>> = Vec::with_capacity(value_vars.len());
    for name in value_vars.iter() {
        value_columns.push(table.numeric(name)?);
    }

    let n_vars = value_vars.len();
    let n_rows = table.num_rows() * n_vars;

    let mut columns: Vec<(String, Column)> = Vec::with_capacity(id_vars.len() + 2);
    for id in id_vars {
        columns.push((id.to_string(), repeat_cells(table.column(id)?, n_vars)));
    }

    let mut var_cells: Vec<String> = Vec::with_capacity(n_rows);
    let mut values: Vec<f64> = Vec::with_capacity(n_rows);
    for row in 0..table.num_rows() {
        for (name, column) in value_vars.iter().zip(value_columns.iter()) {
            var_cells.push(name.to_string());
            values.push(column[row]);
        }
    }
    columns.push((var_name.to_string(), Column::Text(var_cells)));
    columns.push((value_name.to_string(), Column::Numeric(Array1::from(values))));

    Table::from_columns(columns)
}

/// Strip the hemisphere tag from the structure names of a long table and add a hemisphere column.
///
/// Names that do not carry the expected prefix are kept unchanged and counted in a warning.
pub fn tag_hemisphere(mut table: Table, hemisphere: Hemisphere, struct_column: &str) -> Result<Table> {
    let prefix = hemisphere.struct_prefix();
    let mut untagged = 0usize;
    table.try_map_cells(struct_column, |name| {
        Ok(match name.strip_prefix(prefix) {
            Some(rest) => rest.to_string(),
            None => {
                untagged += 1;
                name.to_string()
            }
        })
    })?;
    if untagged > 0 {
        warn!("{} structure names in the {} table lack the '{}' prefix.", untagged, hemisphere, prefix);
    }
    table.insert_constant(table.num_columns(), HEMISPHERE_COLUMN, hemisphere.label())?;
    Ok(table)
}

/// Merge the long tables of the left and right hemisphere into one.
///
/// The hemisphere prefix is stripped from the values of `struct_column`, each row is tagged with
/// its hemisphere in a new `hemisphere` column, and the left rows are followed by the right ones.
pub fn merge_hemispheres(lh: Table, rh: Table, struct_column: &str) -> Result<Table> {
    let lh = tag_hemisphere(lh, Hemisphere::Lh, struct_column)?;
    let rh = tag_hemisphere(rh, Hemisphere::Rh, struct_column)?;
    Ok(Table::concat(vec![lh, rh]))
}
