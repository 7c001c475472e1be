use quick_error::quick_error;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum FsTablesError {
        /// No path segment starts with `sub-`.
        MissingSubjectId(path: PathBuf) {
            display("No 'sub-*' segment in path '{}'", path.display())
        }

        /// More than one path segment starts with `sub-`.
        AmbiguousSubjectId(path: PathBuf, count: usize) {
            display("Found {} 'sub-*' segments in path '{}', expected exactly 1", count, path.display())
        }

        /// A label that should hold a subject identifier does not.
        InvalidSubjectId(label: String) {
            display("Invalid subject identifier '{}'", label)
        }

        /// The recursive search found no stats files.
        NoStatsFiles(dir: PathBuf, pattern: String) {
            display("No files matching '{}' below '{}'", pattern, dir.display())
        }

        MissingColumn(name: String) {
            display("No column named '{}'", name)
        }

        NonNumericColumn(name: String) {
            display("Column '{}' is not numeric", name)
        }

        DuplicateColumn(name: String) {
            display("Column '{}' exists more than once", name)
        }

        /// A row has a different number of cells than the header.
        RaggedTable(row: usize, expected: usize, found: usize) {
            display("Row {} has {} cells, header has {}", row, found, expected)
        }

        /// A required input file does not exist.
        MissingInput(path: PathBuf) {
            display("Required input file '{}' does not exist", path.display())
        }

        /// The external tool could not be started.
        ToolNotFound(tool: String) {
            display("External tool '{}' not found on PATH", tool)
        }

        /// The external tool ran but reported failure.
        ToolFailed(tool: String, code: Option<i32>) {
            display("External tool '{}' failed with exit code {:?}", tool, code)
        }

        /// A directory entry below the search root could not be read.
        Walk(err: walkdir::Error) {
            display("Cannot read directory entry: {}", err)
            from()
            source(err)
        }

        Glob(err: globset::Error) {
            from()
            source(err)
        }

        Csv(err: csv::Error) {
            from()
            source(err)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, FsTablesError>;
