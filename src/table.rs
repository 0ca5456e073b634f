// Tabular dataset handling: CSV ingestion, validated column lookup, and
// ranked-CSV serialization.
//
// Cells are kept as raw strings so columns the model does not know about
// pass through to the output untouched. Metric columns are parsed to f64 on
// demand; a cell that does not parse becomes NaN, the same undefined-value
// marker the scoring math uses.

use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Identity column required in every uploaded dataset.
pub const PLAYER_COLUMN: &str = "Player";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A header row plus string-cell data rows. Column names are exact-match,
/// case-sensitive. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> &[String] {
        &self.rows[index]
    }

    /// Append a data row. The row is padded or truncated to the header width;
    /// rows of the wrong width only arise from ragged CSV input.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Index of the named column, or `None` if the dataset has no such
    /// column. This is the single lookup path; nothing indexes headers by
    /// name without going through it.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The named column parsed as f64, or `None` if the column is absent.
    ///
    /// Cells that do not parse as a number (including empty cells) become
    /// NaN with a warning, so one bad cell degrades that row's score rather
    /// than aborting the run.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        let values = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| match row[idx].trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    warn!(
                        "non-numeric value `{}` in column `{}` row {}; treating as undefined",
                        row[idx], name, row_idx
                    );
                    f64::NAN
                }
            })
            .collect();
        Some(values)
    }

    /// The named column as raw strings, or `None` if absent.
    pub fn string_column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Append a derived f64 column. Values are formatted with `Display`,
    /// which round-trips through `str::parse::<f64>` (NaN included).
    ///
    /// Panics in debug builds if the value count does not match the row
    /// count; derived columns are always computed over the full table.
    pub fn push_f64_column(&mut self, name: &str, values: &[f64]) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value.to_string());
        }
    }

    /// A new table with the same columns and rows permuted into `order`.
    /// Indices not listed in `order` are dropped; the scoring engine always
    /// passes a full permutation.
    pub fn permuted(&self, order: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: order.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    // -- CSV ingestion --

    /// Read a table from any CSV reader. Malformed rows are skipped with a
    /// warning rather than failing the whole load.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Table, csv::Error> {
        let mut reader = csv::Reader::from_reader(rdr);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = Table::new(headers);
        for result in reader.records() {
            match result {
                Ok(record) => {
                    table.push_row(record.iter().map(|c| c.to_string()).collect());
                }
                Err(e) => {
                    warn!("skipping malformed row: {}", e);
                }
            }
        }
        Ok(table)
    }

    /// Load a player dataset from a CSV file and validate it: there must be
    /// at least one data row and a `Player` column.
    pub fn from_csv_path(path: &Path) -> Result<Table, TableError> {
        let file = std::fs::File::open(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let table = Table::from_csv_reader(file).map_err(|e| TableError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;

        if table.is_empty() {
            return Err(TableError::Validation(format!(
                "{} produced zero player rows",
                path.display()
            )));
        }
        if table.column_index(PLAYER_COLUMN).is_none() {
            return Err(TableError::Validation(format!(
                "{} has no `{PLAYER_COLUMN}` column",
                path.display()
            )));
        }

        Ok(table)
    }

    // -- CSV serialization --

    /// Serialize the table to UTF-8, comma-delimited CSV bytes with a header
    /// row. This is the downloadable-artifact encoding.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
    }

    /// Write the table as CSV to the given path.
    pub fn write_csv_path(&self, path: &Path) -> Result<(), TableError> {
        let bytes = self.to_csv_bytes().map_err(|e| TableError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, bytes).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Basic CSV loading --

    #[test]
    fn csv_loading_preserves_columns_and_order() {
        let csv_data = "\
Player,SG: Approach,SG: Putting,Notes
Scottie Scheffler,1.2,0.3,favorite
Rory McIlroy,0.9,0.1,long off the tee";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(
            table.headers(),
            &["Player", "SG: Approach", "SG: Putting", "Notes"]
        );
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.row(0)[0], "Scottie Scheffler");
        assert_eq!(table.row(1)[3], "long off the tee");
    }

    #[test]
    fn headers_are_trimmed_cells_are_not() {
        let csv_data = "\
 Player , SG: Approach
  Scottie Scheffler  ,1.2";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["Player", "SG: Approach"]);
        // Cell whitespace is preserved in the table; numeric parsing trims.
        assert_eq!(table.row(0)[0], "  Scottie Scheffler  ");
    }

    // -- Column lookup --

    #[test]
    fn column_lookup_is_exact_and_case_sensitive() {
        let csv_data = "\
Player,SG: Approach
Scottie Scheffler,1.2";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        assert!(table.column_index("SG: Approach").is_some());
        assert!(table.column_index("sg: approach").is_none());
        assert!(table.column_index("SG: Approach ").is_none());
    }

    #[test]
    fn numeric_column_absent_is_none() {
        let csv_data = "\
Player,SG: Approach
Scottie Scheffler,1.2";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        assert!(table.numeric_column("SG: Putting").is_none());
    }

    #[test]
    fn numeric_column_parses_with_whitespace() {
        let csv_data = "\
Player,SG: Approach
Scottie Scheffler, 1.2
Rory McIlroy,-0.4";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        let col = table.numeric_column("SG: Approach").unwrap();
        assert!((col[0] - 1.2).abs() < f64::EPSILON);
        assert!((col[1] + 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_cell_becomes_nan() {
        let csv_data = "\
Player,SG: Approach
Scottie Scheffler,1.2
Rory McIlroy,n/a
Jon Rahm,";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        let col = table.numeric_column("SG: Approach").unwrap();
        assert!((col[0] - 1.2).abs() < f64::EPSILON);
        assert!(col[1].is_nan());
        assert!(col[2].is_nan());
    }

    // -- Ragged input --

    #[test]
    fn malformed_rows_skipped() {
        let csv_data = "\
Player,SG: Approach
Scottie Scheffler,1.2
Bad Row,0.5,extra,cells
Rory McIlroy,0.9";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.row(1)[0], "Rory McIlroy");
    }

    // -- Derived columns and permutation --

    #[test]
    fn push_f64_column_appends_header_and_cells() {
        let csv_data = "\
Player,SG: Approach
Scottie Scheffler,1.2
Rory McIlroy,0.9";

        let mut table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        table.push_f64_column("SG: Approach Z", &[0.5, -0.5]);

        assert_eq!(
            table.headers(),
            &["Player", "SG: Approach", "SG: Approach Z"]
        );
        let col = table.numeric_column("SG: Approach Z").unwrap();
        assert!((col[0] - 0.5).abs() < f64::EPSILON);
        assert!((col[1] + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn nan_cells_roundtrip_through_display_and_parse() {
        let mut table = Table::new(vec!["Player".into()]);
        table.push_row(vec!["A".into()]);
        table.push_f64_column("Z", &[f64::NAN]);

        let col = table.numeric_column("Z").unwrap();
        assert!(col[0].is_nan());
    }

    #[test]
    fn permuted_reorders_rows() {
        let csv_data = "\
Player,SG: Approach
A,1.0
B,2.0
C,3.0";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        let permuted = table.permuted(&[2, 0, 1]);
        assert_eq!(permuted.row(0)[0], "C");
        assert_eq!(permuted.row(1)[0], "A");
        assert_eq!(permuted.row(2)[0], "B");
        // Source table is untouched.
        assert_eq!(table.row(0)[0], "A");
    }

    // -- CSV round-trip --

    #[test]
    fn csv_roundtrip_preserves_values_and_row_order() {
        let csv_data = "\
Player,SG: Approach,Notes
Scottie Scheffler,1.2,favorite
Rory McIlroy,0.9,long off the tee";

        let table = Table::from_csv_reader(csv_data.as_bytes()).unwrap();
        let bytes = table.to_csv_bytes().unwrap();
        let reread = Table::from_csv_reader(bytes.as_slice()).unwrap();

        assert_eq!(reread, table);
    }

    #[test]
    fn csv_roundtrip_quotes_commas_in_cells() {
        let mut table = Table::new(vec!["Player".into(), "Notes".into()]);
        table.push_row(vec!["Scheffler, Scottie".into(), "world #1".into()]);

        let bytes = table.to_csv_bytes().unwrap();
        let reread = Table::from_csv_reader(bytes.as_slice()).unwrap();
        assert_eq!(reread.row(0)[0], "Scheffler, Scottie");
    }

    // -- Path-level validation --

    #[test]
    fn from_csv_path_rejects_header_only_file() {
        let tmp = std::env::temp_dir().join("golf_table_test_header_only.csv");
        std::fs::write(&tmp, "Player,SG: Approach\n").unwrap();

        let err = Table::from_csv_path(&tmp).unwrap_err();
        match &err {
            TableError::Validation(msg) => assert!(msg.contains("zero player rows")),
            other => panic!("expected Validation, got: {other}"),
        }

        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn from_csv_path_requires_player_column() {
        let tmp = std::env::temp_dir().join("golf_table_test_no_player.csv");
        std::fs::write(&tmp, "Name,SG: Approach\nScottie,1.2\n").unwrap();

        let err = Table::from_csv_path(&tmp).unwrap_err();
        match &err {
            TableError::Validation(msg) => assert!(msg.contains("Player")),
            other => panic!("expected Validation, got: {other}"),
        }

        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn from_csv_path_missing_file_is_io_error() {
        let err = Table::from_csv_path(Path::new("/nonexistent/players.csv")).unwrap_err();
        match &err {
            TableError::Io { path, .. } => assert!(path.contains("players.csv")),
            other => panic!("expected Io, got: {other}"),
        }
    }
}
