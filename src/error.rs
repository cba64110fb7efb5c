// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}: first column must be named \"Test Case\"", .path.display())]
    MissingHeader { path: PathBuf },
    #[error("{}: no thread count columns", .path.display())]
    NoThreads { path: PathBuf },
    #[error("{}: row {row} ({test_case}) has non-numeric speedup {value:?} for {threads} threads", .path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        test_case: String,
        threads: String,
        value: String,
    },
    #[error("no test case named {0:?}")]
    UnknownTestCase(String),
    #[error("line {label:?} does not fit the chart: {reason}")]
    Shape { label: String, reason: String },
    #[error("failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },
    #[error("bad config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
    #[error("bad value for --{name}: {value:?}")]
    Argument { name: &'static str, value: String },
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
