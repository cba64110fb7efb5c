// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

#[macro_use]
mod logger;

mod chart;
mod config;
mod error;
mod export;
mod table;

pub use crate::chart::{plot_table, Chart, Line, X_DESC, Y_DESC};
pub use crate::config::{Config, Dataset, NAME, VERSION};
pub use crate::error::Error;
pub use crate::export::{Bitmap, Export, DEFAULT_SIZE};
pub use crate::logger::Logger;
pub use crate::table::{Series, SpeedupTable, TEST_CASE};

/// Turns speedup tables into charts, one dataset at a time, on a single
/// reusable drawing surface.
pub struct Reporter<E> {
    chart: Chart,
    exporter: E,
}

impl<E: Export> Reporter<E> {
    pub fn new(exporter: E) -> Self {
        Self {
            chart: Chart::new(),
            exporter,
        }
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Load, plot and export one dataset. The surface is empty again when
    /// this returns, whatever the outcome.
    pub fn report(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let table = SpeedupTable::load(dataset.input())?;
        info!(
            "{}: {} test cases over {} thread counts",
            dataset.input().display(),
            table.len(),
            table.threads().len()
        );

        let result = match plot_table(&mut self.chart, &table, dataset.title()) {
            Ok(()) => self.exporter.export(&self.chart, dataset.output()),
            Err(e) => Err(e),
        };
        self.chart.clear();
        result?;

        info!("{}: wrote {}", dataset.title(), dataset.output().display());
        Ok(())
    }
}

/// Produce every chart named by the config, stopping at the first failure.
pub fn run(config: &Config) -> Result<(), Error> {
    let mut reporter = Reporter::new(Bitmap::new(config.size()));
    for dataset in config.datasets() {
        reporter.report(&dataset)?;
    }
    Ok(())
}
