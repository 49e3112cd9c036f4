use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::RunError;

/// Rows of named columns, however they were parsed.
pub trait Rows {
    fn len(&self) -> usize;

    /// Cell of a row under the column with the given header.
    fn value(&self, row: usize, column: &str) -> Option<&str>;

    /// Cell of a row by column position.
    fn cell(&self, row: usize, index: usize) -> Option<&str>;

    fn header(&self, index: usize) -> Option<&str>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const MONTH_HEADER: &str = "month";
const MONTH_FALLBACK_COLUMN: usize = 1;

/// Name of the month the timesheet covers, taken from the first row.
pub fn month_name<R: Rows + ?Sized>(rows: &R) -> Option<&str> {
    let index = (0..)
        .map_while(|i| rows.header(i).map(|h| (i, h)))
        .find(|(_, h)| h.trim().eq_ignore_ascii_case(MONTH_HEADER))
        .map_or(MONTH_FALLBACK_COLUMN, |(i, _)| i);
    rows.cell(0, index).filter(|name| !name.trim().is_empty())
}

/// A tab separated timesheet export: one header line, then one line per
/// invoice recipient.
#[derive(Debug, PartialEq, Clone)]
pub struct Timesheet {
    headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

impl Timesheet {
    pub fn from_path(path: &Path) -> Result<Self, RunError> {
        let to_error = |source: csv::Error| RunError::Timesheet {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|e| to_error(e.into()))?;
        let timesheet = Self::from_reader(file).map_err(to_error)?;
        if timesheet.is_empty() {
            return Err(RunError::EmptyTimesheet {
                path: path.to_path_buf(),
            });
        }
        Ok(timesheet)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> =
            reader.headers()?.iter().map(String::from).collect();
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Rows for Timesheet {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = *self.columns.get(column)?;
        self.cell(row, index)
    }

    fn cell(&self, row: usize, index: usize) -> Option<&str> {
        self.rows.get(row)?.get(index)
    }

    fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(String::as_str)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use const_format::formatcp;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Name\tMonth\t1\t2\t3\t4\t5";
    const ALICE: &str = "Alice\tOctober\t8\t8\t4\t8\t0";
    const BOB: &str = "Bob\tOctober\t0\t8\t8\t8.0\t";

    pub const TIMESHEET: &str = formatcp!("{}\n{}\n{}\n", HEADER, ALICE, BOB);

    pub fn timesheet() -> Timesheet {
        Timesheet::from_reader(TIMESHEET.as_bytes()).unwrap()
    }

    #[test]
    fn parse_rows_and_columns() {
        let sheet = timesheet();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.headers()[1], "Month");
        assert_eq!(sheet.value(0, "1"), Some("8"));
        assert_eq!(sheet.value(0, "3"), Some("4"));
        assert_eq!(sheet.value(1, "5"), Some(""));
        assert_eq!(sheet.value(1, "31"), None);
        assert_eq!(sheet.cell(1, 0), Some("Bob"));
    }

    #[test]
    fn month_from_named_column() {
        let sheet = Timesheet::from_reader(
            "1\t2\tMONTH\n8\t8\tMarch\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(month_name(&sheet), Some("March"));
    }

    #[test]
    fn month_from_second_column() {
        let sheet =
            Timesheet::from_reader("Who\tWhen\t1\nAlice\tMay\t8\n".as_bytes())
                .unwrap();
        assert_eq!(month_name(&sheet), Some("May"));
    }

    #[test]
    fn no_month() {
        let sheet =
            Timesheet::from_reader("Who\tWhen\nAlice\t\n".as_bytes()).unwrap();
        assert_eq!(month_name(&sheet), None);
    }

    #[test]
    fn short_rows_are_accepted() {
        let sheet =
            Timesheet::from_reader("Name\tMonth\t1\t2\nAlice\tMay\n".as_bytes())
                .unwrap();
        assert_eq!(sheet.value(0, "2"), None);
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TIMESHEET.as_bytes()).unwrap();
        let sheet = Timesheet::from_path(file.path()).unwrap();
        assert_eq!(sheet, timesheet());
    }

    #[test]
    fn missing_file() {
        let error =
            Timesheet::from_path(Path::new("no/such/timesheet.tsv")).unwrap_err();
        assert!(matches!(error, RunError::Timesheet { .. }));
    }

    #[test]
    fn header_only() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        let error = Timesheet::from_path(file.path()).unwrap_err();
        assert!(matches!(error, RunError::EmptyTimesheet { .. }));
    }
}
