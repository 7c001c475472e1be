//! Utility functions used in all other fstables modules.

use flate2::read::GzDecoder;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{FsTablesError, Result};

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Read the whole content of a text file.
/// If the file's name ends with ".gz", the file is assumed to need GZip decoding. The stats files
/// written by FreeSurfer are plain text, but compressed copies are handy for archived datasets.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FsTablesError::MissingInput(path.to_path_buf()));
    }
    let gz = is_gz_file(path);
    let mut file = BufReader::new(File::open(path)?);
    let mut content = String::new();
    if gz {
        GzDecoder::new(file).read_to_string(&mut content)?;
    } else {
        file.read_to_string(&mut content)?;
    }
    Ok(content)
}

/// Guess the field delimiter from the header line: tab if it contains one, comma otherwise.
pub fn sniff_delimiter<R: BufRead>(mut input: R) -> Result<u8> {
    let mut header = String::new();
    input.read_line(&mut header)?;
    if header.contains('\t') {
        Ok(b'\t')
    } else {
        Ok(b',')
    }
}

/// Format a number the way it should appear in a text cell: integral values without a fraction.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else if value.is_nan() {
        String::new()
    } else {
        format!("{}", value)
    }
}
