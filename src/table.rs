//! A small column-oriented table for the delimited text files handled by this crate.
//!
//! FreeSurfer's tabular stats output, the tables we write from them, and the demographics sheet
//! all share the same shape: a header row followed by records, one column per measure. Each
//! column is either numeric (stored as an [`Array1<f64>`]) or text. The type is inferred when
//! reading: a column is numeric if every non-empty cell parses as a number. Empty numeric cells
//! become `NaN`.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use ndarray::Array1;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{FsTablesError, Result};
use crate::util::{format_number, read_text_file, sniff_delimiter};


/// A single table column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Numeric(Array1<f64>),
}

impl Column {

    /// Build a column from raw cells, inferring whether it is numeric.
    pub fn from_cells(cells: Vec<String>) -> Column {
        let mut values: Vec<f64> = Vec::with_capacity(cells.len());
        for cell in cells.iter() {
            if cell.is_empty() {
                values.push(f64::NAN);
            } else {
                match cell.parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) => return Column::Text(cells),
                }
            }
        }
        Column::Numeric(Array1::from(values))
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// The text representation of the cell at the given row, as written to output files.
    ///
    /// # Panics
    ///
    /// If `row` is out of range.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Text(v) => v[row].clone(),
            Column::Numeric(v) => format_number(v[row]),
        }
    }

    /// Convert to a text column. Numeric cells are formatted like in output files.
    pub fn into_text(self) -> Vec<String> {
        match self {
            Column::Text(v) => v,
            Column::Numeric(v) => v.iter().map(|x| format_number(*x)).collect(),
        }
    }

    /// Pick cells by row index; `None` gives a missing value (`NaN` or empty text).
    pub fn take(&self, rows: &[Option<usize>]) -> Column {
        match self {
            Column::Text(v) => Column::Text(
                rows.iter().map(|r| r.map(|i| v[i].clone()).unwrap_or_default()).collect(),
            ),
            Column::Numeric(v) => Column::Numeric(
                rows.iter().map(|r| r.map(|i| v[i]).unwrap_or(f64::NAN)).collect(),
            ),
        }
    }

    /// A column of `len` missing values: `NaN` if numeric, empty strings otherwise.
    fn missing(len: usize, numeric: bool) -> Column {
        if numeric {
            Column::Numeric(Array1::from_elem(len, f64::NAN))
        } else {
            Column::Text(vec![String::new(); len])
        }
    }

    /// Append the cells of `other`. The result is numeric only if both parts are.
    fn append(self, other: Column) -> Column {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => {
                let mut values = a.to_vec();
                values.extend(b.iter());
                Column::Numeric(Array1::from(values))
            }
            (a, b) => {
                let mut cells = a.into_text();
                cells.extend(b.into_text());
                Column::Text(cells)
            }
        }
    }
}


/// A table with named, equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {

    /// Create a table with no columns and no rows.
    pub fn new() -> Table {
        Table::default()
    }

    /// Create a table from named columns. All columns must have the same length and unique names.
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Table> {
        let mut table = Table::new();
        for (name, column) in columns {
            table.push_column(&name, column)?;
        }
        Ok(table)
    }

    /// Read a table from a delimited text file with a header row.
    ///
    /// The delimiter is guessed from the header line: tab if it contains one, comma otherwise.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Table> {
        let content = read_text_file(path)?;
        let delimiter = sniff_delimiter(content.as_bytes())?;
        Table::from_reader(content.as_bytes(), delimiter)
    }

    /// Read a table from delimited text with a header row. Leading and trailing whitespace of
    /// every field is removed.
    pub fn from_reader<R: Read>(input: R, delimiter: u8) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let names: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];

        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            if record.len() != names.len() {
                return Err(FsTablesError::RaggedTable(row + 1, names.len(), record.len()));
            }
            for (idx, field) in record.iter().enumerate() {
                cells[idx].push(field.to_string());
            }
        }

        let columns = names.into_iter()
            .zip(cells.into_iter().map(Column::from_cells))
            .collect();
        Table::from_columns(columns)
    }

    /// Write the table as comma-separated text with a header row. Missing numeric values are written as empty cells.
    pub fn to_writer<W: Write>(&self, output: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(b',').from_writer(output);
        wtr.write_record(&self.names)?;
        for row in 0..self.num_rows {
            wtr.write_record(self.columns.iter().map(|c| c.cell(row)))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the table to a CSV file, replacing it if it exists.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        self.to_writer(file)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.names.iter()
            .position(|n| n == name)
            .ok_or_else(|| FsTablesError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        Ok(&self.columns[self.position(name)?])
    }

    /// Get a numeric column by name. Fails if it does not exist or holds text.
    pub fn numeric(&self, name: &str) -> Result<&Array1<f64>> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Text(_) => Err(FsTablesError::NonNumericColumn(name.to_string())),
        }
    }

    pub fn numeric_mut(&mut self, name: &str) -> Result<&mut Array1<f64>> {
        let idx = self.position(name)?;
        match &mut self.columns[idx] {
            Column::Numeric(values) => Ok(values),
            Column::Text(_) => Err(FsTablesError::NonNumericColumn(name.to_string())),
        }
    }

    /// The text representation of all cells of a column, whatever its type.
    pub fn cells(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.column(name)?.clone().into_text())
    }

    /// Append a column at the end.
    pub fn push_column(&mut self, name: &str, column: Column) -> Result<()> {
        let idx = self.columns.len();
        self.insert_column(idx, name, column)
    }

    /// Insert a column at the given position. The first column of a table defines its row count.
    pub fn insert_column(&mut self, index: usize, name: &str, column: Column) -> Result<()> {
        if self.has_column(name) {
            return Err(FsTablesError::DuplicateColumn(name.to_string()));
        }
        if self.columns.is_empty() {
            self.num_rows = column.len();
        } else if column.len() != self.num_rows {
            return Err(FsTablesError::RaggedTable(self.columns.len(), self.num_rows, column.len()));
        }
        let index = index.min(self.columns.len());
        self.names.insert(index, name.to_string());
        self.columns.insert(index, column);
        Ok(())
    }

    /// Insert a text column holding the same value in every row.
    pub fn insert_constant(&mut self, index: usize, name: &str, value: &str) -> Result<()> {
        let column = Column::Text(vec![value.to_string(); self.num_rows]);
        self.insert_column(index, name, column)
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.position(from)?;
        if from != to && self.has_column(to) {
            return Err(FsTablesError::DuplicateColumn(to.to_string()));
        }
        self.names[idx] = to.to_string();
        Ok(())
    }

    /// A new table with only the given columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            columns.push((name.to_string(), self.column(name)?.clone()));
        }
        let mut table = Table::from_columns(columns)?;
        table.num_rows = self.num_rows;
        Ok(table)
    }

    /// Replace every cell of a column by the result of `f` applied to its text representation.
    /// The column becomes a text column.
    pub fn try_map_cells<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let idx = self.position(name)?;
        let cells = std::mem::replace(&mut self.columns[idx], Column::Text(Vec::new())).into_text();
        let mapped = cells.iter().map(|c| f(c)).collect::<Result<Vec<String>>>();
        match mapped {
            Ok(mapped) => {
                self.columns[idx] = Column::Text(mapped);
                Ok(())
            }
            Err(e) => {
                self.columns[idx] = Column::Text(cells);
                Err(e)
            }
        }
    }

    /// Keep only the rows for which `keep` is `true`.
    ///
    /// # Panics
    ///
    /// If `keep` does not have one entry per row.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        assert_eq!(self.num_rows, keep.len(), "row mask length does not match the table");
        let rows: Vec<Option<usize>> = keep.iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(i, _)| Some(i))
            .collect();
        self.columns = self.columns.iter().map(|c| c.take(&rows)).collect();
        self.num_rows = rows.len();
    }

    /// Left join on the text representation of column `key`.
    ///
    /// Every row of `self` is kept in order and gets the non-key columns of `other` appended, taken
    /// from the first row of `other` with the same key. Rows without a partner get missing values.
    pub fn left_join(&self, other: &Table, key: &str) -> Result<Table> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (row, cell) in other.cells(key)?.into_iter().enumerate() {
            index.entry(cell).or_insert(row);
        }
        let rows: Vec<Option<usize>> = self.cells(key)?
            .iter()
            .map(|cell| index.get(cell).copied())
            .collect();

        let mut joined = self.clone();
        for (name, column) in other.names.iter().zip(other.columns.iter()) {
            if name != key {
                joined.push_column(name, column.take(&rows))?;
            }
        }
        Ok(joined)
    }

    /// Stack tables row-wise.
    ///
    /// The result has the union of all columns, in the order they are first seen. Rows of a table
    /// lacking a column get missing values there (`NaN` or empty text). A column stays numeric
    /// only if it is numeric in every table that has it.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut names: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for table in tables.iter() {
            for name in table.names.iter() {
                if seen.insert(name.clone()) {
                    names.push(name.clone());
                }
            }
        }

        let numeric: Vec<bool> = names.iter()
            .map(|name| tables.iter()
                .filter_map(|t| t.column(name).ok())
                .all(|c| c.is_numeric()))
            .collect();

        let num_rows = tables.iter().map(|t| t.num_rows).sum();
        let mut columns: Vec<Column> = names.iter()
            .zip(numeric.iter())
            .map(|(_, &is_num)| Column::missing(0, is_num))
            .collect();

        for mut table in tables.into_iter() {
            for (idx, name) in names.iter().enumerate() {
                let part = match table.position(name) {
                    Ok(pos) => std::mem::replace(&mut table.columns[pos], Column::Text(Vec::new())),
                    Err(_) => Column::missing(table.num_rows, numeric[idx]),
                };
                let acc = std::mem::replace(&mut columns[idx], Column::Text(Vec::new()));
                columns[idx] = acc.append(part);
            }
        }

        Table { names, columns, num_rows }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Table with {} rows and {} columns.", self.num_rows, self.columns.len())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    const ASEG_TABLE: &str = "Measure:volume\tBrainSegVolNotVent\tCortexVol\n\
                              sub-1176_ses-newborn\t400000.5\t180000\n\
                              sub-1180_ses-newborn\t410000\t185000.25\n";

    #[test]
    fn tab_separated_text_is_read_with_types() {
        let table = Table::from_reader(ASEG_TABLE.as_bytes(), b'\t').unwrap();
        assert_eq!(2, table.num_rows());
        assert_eq!(3, table.num_columns());
        assert!(!table.column("Measure:volume").unwrap().is_numeric());
        assert_eq!(&array![180000.0, 185000.25], table.numeric("CortexVol").unwrap());
    }

    #[test]
    fn empty_cells_become_nan_in_numeric_columns() {
        let table = Table::from_reader("a,b\n1,x\n,y\n".as_bytes(), b',').unwrap();
        let a = table.numeric("a").unwrap();
        assert_eq!(1.0, a[0]);
        assert!(a[1].is_nan());
        assert!(table.numeric("b").is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::from_reader("a,b\n1,2\n3\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, FsTablesError::RaggedTable(2, 2, 1)));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = Table::from_reader("a,a\n1,2\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, FsTablesError::DuplicateColumn(_)));
    }

    #[test]
    fn written_csv_can_be_read_back() {
        let table = Table::from_reader(ASEG_TABLE.as_bytes(), b'\t').unwrap();
        let mut buf: Vec<u8> = Vec::new();
        table.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Measure:volume,BrainSegVolNotVent,CortexVol\n"));
        assert!(text.contains("sub-1176_ses-newborn,400000.5,180000\n"));
        assert_eq!(table, Table::from_reader(text.as_bytes(), b',').unwrap());
    }

    #[test]
    fn concat_fills_missing_columns() {
        let t1 = Table::from_reader("id,a\nx,1\n".as_bytes(), b',').unwrap();
        let t2 = Table::from_reader("id,b\ny,2\nz,3\n".as_bytes(), b',').unwrap();
        let all = Table::concat(vec![t1, t2]);

        assert_eq!(3, all.num_rows());
        assert_eq!(vec!["id", "a", "b"], all.column_names().to_vec());
        assert_eq!(vec!["x", "y", "z"], all.cells("id").unwrap());
        let a = all.numeric("a").unwrap();
        assert_eq!(1.0, a[0]);
        assert!(a[1].is_nan() && a[2].is_nan());
        assert!(all.numeric("b").unwrap()[0].is_nan());
    }

    #[test]
    fn concat_promotes_mixed_columns_to_text() {
        let t1 = Table::from_reader("v\n1\n".as_bytes(), b',').unwrap();
        let t2 = Table::from_reader("v\nn/a\n".as_bytes(), b',').unwrap();
        let all = Table::concat(vec![t1, t2]);
        assert_eq!(vec!["1", "n/a"], all.cells("v").unwrap());
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let all = Table::concat(Vec::new());
        assert!(all.is_empty());
        assert_eq!(0, all.num_columns());
    }

    #[test]
    fn columns_can_be_inserted_selected_and_renamed() {
        let mut table = Table::from_reader(ASEG_TABLE.as_bytes(), b'\t').unwrap();
        table.insert_constant(0, "session", "newborn").unwrap();
        table.rename("Measure:volume", "study_id").unwrap();
        let sel = table.select(&["study_id", "session"]).unwrap();

        assert_eq!(vec!["study_id", "session"], sel.column_names().to_vec());
        assert_eq!(vec!["newborn", "newborn"], sel.cells("session").unwrap());
        assert!(table.rename("CortexVol", "session").is_err());
        assert!(table.select(&["nope"]).is_err());
    }

    #[test]
    fn failed_cell_mapping_leaves_column_intact() {
        let mut table = Table::from_reader("id\n1\nbad\n".as_bytes(), b',').unwrap();
        let res = table.try_map_cells("id", |c| {
            c.parse::<i32>()
                .map(|v| format!("sub-{}", v))
                .map_err(|_| FsTablesError::InvalidSubjectId(c.to_string()))
        });
        assert!(res.is_err());
        assert_eq!(vec!["1", "bad"], table.cells("id").unwrap());
    }

    #[test]
    fn rows_can_be_filtered_by_mask() {
        let mut table = Table::from_reader("id,v\na,1\nb,2\nc,3\n".as_bytes(), b',').unwrap();
        table.retain_rows(&[true, false, true]);
        assert_eq!(2, table.num_rows());
        assert_eq!(vec!["a", "c"], table.cells("id").unwrap());
        assert_eq!(vec![1.0, 3.0], table.numeric("v").unwrap().to_vec());
    }

    #[test]
    fn left_join_keeps_all_left_rows() {
        let left = Table::from_reader("id,v\na,1\nb,2\na,3\n".as_bytes(), b',').unwrap();
        let right = Table::from_reader("id,w,note\na,10,x\nc,30,z\n".as_bytes(), b',').unwrap();

        let joined = left.left_join(&right, "id").unwrap();

        assert_eq!(vec!["id", "v", "w", "note"], joined.column_names().to_vec());
        assert_eq!(vec!["a", "b", "a"], joined.cells("id").unwrap());
        let w = joined.numeric("w").unwrap();
        assert_eq!(10.0, w[0]);
        assert!(w[1].is_nan());
        assert_eq!(10.0, w[2]);
        assert_eq!(vec!["x", "", "x"], joined.cells("note").unwrap());
        assert!(left.left_join(&right, "missing").is_err());
    }
}
