//! Header-addressed CSV tables.
//!
//! A thin layer over the `csv` crate that keeps every cell as text and
//! remembers where the table came from, so later parse failures can name
//! the file and line.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, DatasetResult};

/// An in-memory CSV table with a required header row.
#[derive(Debug, Clone)]
pub struct Table {
    source: PathBuf,
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Table {
    /// Read a table from a CSV file.
    pub fn read(path: &Path) -> DatasetResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|source| DatasetError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::collect(reader, path)
    }

    /// Read a table from any reader; `source` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> DatasetResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        Self::collect(reader, source)
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>, source: &Path) -> DatasetResult<Self> {
        let csv_error = |source_err: csv::Error| DatasetError::Csv {
            path: source.to_path_buf(),
            source: source_err,
        };

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            records.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!("Read {} rows from {:?}", records.len(), source);

        Ok(Self {
            source: source.to_path_buf(),
            headers,
            records,
        })
    }

    /// Build a table from parts (used for derived outputs).
    pub fn new(source: PathBuf, headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self {
            source,
            headers,
            records,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column, if present.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column that must be present.
    pub fn require_column(&self, name: &str) -> DatasetResult<usize> {
        self.find_column(name)
            .ok_or_else(|| DatasetError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// Source line of a record (the header is line 1).
    pub fn line_of(&self, record_index: usize) -> u64 {
        record_index as u64 + 2
    }

    /// Error for a cell that failed to parse.
    pub fn invalid_value(&self, record_index: usize, column: &str, value: &str) -> DatasetError {
        DatasetError::InvalidValue {
            path: self.source.clone(),
            line: self.line_of(record_index),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// Append a column, or overwrite it if a column of that name exists.
    ///
    /// `values` must have one entry per record.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.records.len());
        match self.find_column(name) {
            Some(idx) => {
                for (record, value) in self.records.iter_mut().zip(values) {
                    record[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (record, value) in self.records.iter_mut().zip(values) {
                    record.push(value);
                }
            }
        }
    }

    /// Write the table to a CSV file.
    pub fn write(&self, path: &Path) -> DatasetResult<()> {
        write_rows(path, &self.headers, self.records.iter().map(|r| r.as_slice()))
    }
}

/// Write a header row followed by records to a CSV file.
pub fn write_rows<'a, I>(path: &Path, headers: &[String], rows: I) -> DatasetResult<()>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let write_error = |source: csv::Error| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_record(headers).map_err(write_error)?;
    for row in rows {
        writer.write_record(row).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| write_error(csv::Error::from(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let data = "a,b\n1,x\n2,y\n";
        Table::from_reader(data.as_bytes(), Path::new("inline.csv")).unwrap()
    }

    #[test]
    fn reads_headers_and_records() {
        let table = sample();
        assert_eq!(table.headers(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1][1], "y");
    }

    #[test]
    fn header_whitespace_is_trimmed() {
        let table = Table::from_reader(" a , b\n1,2\n".as_bytes(), Path::new("t.csv")).unwrap();
        assert_eq!(table.find_column("b"), Some(1));
    }

    #[test]
    fn require_column_reports_missing() {
        let table = sample();
        let err = table.require_column("c").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column, .. } if column == "c"));
    }

    #[test]
    fn ragged_row_is_an_error() {
        let data = "a,b\n1,2\n3\n";
        let err = Table::from_reader(data.as_bytes(), Path::new("ragged.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Csv { .. }));
    }

    #[test]
    fn set_column_appends_then_overwrites() {
        let mut table = sample();
        table.set_column("c", vec!["p".into(), "q".into()]);
        assert_eq!(table.headers().len(), 3);
        table.set_column("a", vec!["9".into(), "8".into()]);
        assert_eq!(table.records()[0], vec!["9", "x", "p"]);
    }

    #[test]
    fn write_then_read_preserves_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            PathBuf::from("mem"),
            vec!["label".into(), "note".into()],
            vec![vec!["ride, bicycle".into(), "has \"quotes\"".into()]],
        );
        table.write(&path).unwrap();

        let back = Table::read(&path).unwrap();
        assert_eq!(back.records()[0][0], "ride, bicycle");
        assert_eq!(back.records()[0][1], "has \"quotes\"");
    }

    #[test]
    fn read_missing_file_is_open_error() {
        let err = Table::read(Path::new("/nonexistent/pool.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
