// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Name of the identifier column that must lead every speedup table.
pub const TEST_CASE: &str = "Test Case";

/// Speedup measurements for a set of test cases, one row per test case and
/// one column per thread count.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedupTable {
    path: PathBuf,
    threads: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Clone, Debug, PartialEq)]
struct Row {
    test_case: String,
    speedups: Vec<f64>,
}

/// The speedups of one test case paired with the thread count labels they
/// were measured at, in column order.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    label: String,
    points: Vec<(String, f64)>,
}

impl Series {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn threads(&self) -> Vec<String> {
        self.points.iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn speedups(&self) -> Vec<f64> {
        self.points.iter().map(|(_, s)| *s).collect()
    }

    /// Highest speedup and the thread count it was reached at. Ties go to
    /// the earliest column.
    pub fn peak(&self) -> Option<(&str, f64)> {
        let mut peak: Option<(&str, f64)> = None;
        for (threads, speedup) in &self.points {
            match peak {
                Some((_, best)) if *speedup <= best => {}
                _ => peak = Some((threads, *speedup)),
            }
        }
        peak
    }
}

impl SpeedupTable {
    /// Load a table from a CSV file whose header is
    /// `Test Case,<threads>,<threads>,...`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }

    /// Parse a table from any reader. `origin` is only used to label errors.
    pub fn from_reader<R: Read, P: AsRef<Path>>(reader: R, origin: P) -> Result<Self, Error> {
        let path = origin.as_ref().to_path_buf();
        let csv_error = |source| Error::Csv {
            path: path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let mut columns = headers.iter();
        if columns.next() != Some(TEST_CASE) {
            return Err(Error::MissingHeader { path: path.clone() });
        }
        let threads: Vec<String> = columns.map(|c| c.to_owned()).collect();
        if threads.is_empty() {
            return Err(Error::NoThreads { path: path.clone() });
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let test_case = record.get(0).unwrap_or_default().to_owned();

            let mut speedups = Vec::with_capacity(threads.len());
            for (value, column) in record.iter().skip(1).zip(threads.iter()) {
                let speedup = value.parse::<f64>().map_err(|_| Error::Parse {
                    path: path.clone(),
                    row: index + 1,
                    test_case: test_case.clone(),
                    threads: column.clone(),
                    value: value.to_owned(),
                })?;
                speedups.push(speedup);
            }

            rows.push(Row {
                test_case,
                speedups,
            });
        }

        trace!("loaded {} test cases from {}", rows.len(), path.display());

        Ok(Self {
            path,
            threads,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Thread count labels from the header, whitespace trimmed, in column order.
    pub fn threads(&self) -> &[String] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn test_cases(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.test_case.as_str())
    }

    /// Speedups for the named test case. When the name appears more than
    /// once the first row wins.
    pub fn speedups(&self, test_case: &str) -> Result<&[f64], Error> {
        self.rows
            .iter()
            .find(|r| r.test_case == test_case)
            .map(|r| r.speedups.as_slice())
            .ok_or_else(|| Error::UnknownTestCase(test_case.to_owned()))
    }

    pub fn series(&self, test_case: &str) -> Result<Series, Error> {
        let speedups = self.speedups(test_case)?;
        Ok(self.make_series(test_case, speedups))
    }

    /// One series per row, in row order. Rows sharing a name each keep
    /// their own values.
    pub fn rows(&self) -> impl Iterator<Item = Series> + '_ {
        self.rows
            .iter()
            .map(move |r| self.make_series(&r.test_case, &r.speedups))
    }

    /// Test case names that label more than one row.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = BTreeMap::new();
        for row in &self.rows {
            *seen.entry(row.test_case.as_str()).or_insert(0usize) += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect()
    }

    fn make_series(&self, label: &str, speedups: &[f64]) -> Series {
        Series {
            label: label.to_owned(),
            points: self
                .threads
                .iter()
                .cloned()
                .zip(speedups.iter().copied())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<SpeedupTable, Error> {
        SpeedupTable::from_reader(csv.as_bytes(), "speedup.csv")
    }

    #[test]
    fn extract_in_column_order() {
        let table = parse("Test Case,1,2,4\nA,1.0,2.0,4.0\n").unwrap();
        assert_eq!(table.threads(), &["1", "2", "4"]);
        assert_eq!(table.speedups("A").unwrap(), &[1.0, 2.0, 4.0]);

        let series = table.series("A").unwrap();
        assert_eq!(series.label(), "A");
        assert_eq!(series.threads(), vec!["1", "2", "4"]);
        assert_eq!(series.speedups(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn fields_are_trimmed() {
        let table = parse("Test Case, 8 ,2,16\nsort,3.0,1.5,4.5\n").unwrap();
        assert_eq!(table.threads(), &["8", "2", "16"]);
        assert_eq!(table.speedups("sort").unwrap(), &[3.0, 1.5, 4.5]);
    }

    #[test]
    fn unknown_test_case() {
        let table = parse("Test Case,1\nA,1.0\n").unwrap();
        match table.speedups("B") {
            Err(Error::UnknownTestCase(name)) => assert_eq!(name, "B"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn duplicates_first_match_wins() {
        let table = parse("Test Case,1,2\nA,1.0,2.0\nB,1.0,1.0\nA,1.0,3.0\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.test_cases().collect::<Vec<_>>(), vec!["A", "B", "A"]);
        assert_eq!(table.duplicates(), vec!["A"]);
        assert_eq!(table.speedups("A").unwrap(), &[1.0, 2.0]);

        let rows: Vec<Series> = table.rows().collect();
        assert_eq!(rows[0].speedups(), vec![1.0, 2.0]);
        assert_eq!(rows[2].speedups(), vec![1.0, 3.0]);
    }

    #[test]
    fn header_only() {
        let table = parse("Test Case,1,2,4\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.threads().len(), 3);
    }

    #[test]
    fn missing_identifier_header() {
        assert!(matches!(
            parse("Name,1,2\nA,1.0,2.0\n"),
            Err(Error::MissingHeader { .. })
        ));
    }

    #[test]
    fn no_thread_columns() {
        assert!(matches!(
            parse("Test Case\nA\n"),
            Err(Error::NoThreads { .. })
        ));
    }

    #[test]
    fn ragged_row() {
        assert!(matches!(
            parse("Test Case,1,2\nA,1.0\n"),
            Err(Error::Csv { .. })
        ));
    }

    #[test]
    fn non_numeric_speedup() {
        match parse("Test Case,1,2\nA,1.0,fast\n") {
            Err(Error::Parse {
                row,
                test_case,
                threads,
                value,
                ..
            }) => {
                assert_eq!(row, 1);
                assert_eq!(test_case, "A");
                assert_eq!(threads, "2");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        match SpeedupTable::load(dir.path().join("speedup_bsp.csv")) {
            Err(Error::Io { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn peak() {
        let table = parse("Test Case,1,2,4,8\nA,1.0,1.9,3.2,3.2\n").unwrap();
        assert_eq!(table.series("A").unwrap().peak(), Some(("4", 3.2)));
    }
}
