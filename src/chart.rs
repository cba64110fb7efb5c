// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::table::SpeedupTable;
use crate::Error;

pub const X_DESC: &str = "Number of Threads";
pub const Y_DESC: &str = "Speedup";

/// A labeled line on a chart. Values line up with the chart's x ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    label: String,
    values: Vec<f64>,
}

impl Line {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Drawing surface that accumulates lines and decorations until it is
/// exported, then gets cleared for the next dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chart {
    title: String,
    x_desc: String,
    y_desc: String,
    legend: bool,
    x_ticks: Vec<String>,
    lines: Vec<Line>,
}

impl Chart {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a line. All lines on a chart share one set of x ticks, so the
    /// first line fixes them.
    pub fn add_line<L: AsRef<str>>(
        &mut self,
        x_ticks: &[String],
        values: &[f64],
        label: L,
    ) -> Result<&mut Self, Error> {
        let label = label.as_ref();
        if x_ticks.len() != values.len() {
            return Err(Error::Shape {
                label: label.to_owned(),
                reason: format!("{} ticks but {} values", x_ticks.len(), values.len()),
            });
        }
        if self.lines.is_empty() {
            self.x_ticks = x_ticks.to_vec();
        } else if self.x_ticks != x_ticks {
            return Err(Error::Shape {
                label: label.to_owned(),
                reason: format!("ticks {:?} differ from {:?}", x_ticks, self.x_ticks),
            });
        }
        self.lines.push(Line {
            label: label.to_owned(),
            values: values.to_vec(),
        });
        Ok(self)
    }

    pub fn title(&mut self, title: impl AsRef<str>) -> &mut Self {
        self.title = title.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn legend(&mut self, enabled: bool) -> &mut Self {
        self.legend = enabled;
        self
    }

    /// Drop every line and decoration.
    pub fn clear(&mut self) {
        *self = Default::default();
    }

    pub fn caption(&self) -> &str {
        &self.title
    }

    pub fn x_label(&self) -> &str {
        &self.x_desc
    }

    pub fn y_label(&self) -> &str {
        &self.y_desc
    }

    pub fn has_legend(&self) -> bool {
        self.legend
    }

    pub fn x_ticks(&self) -> &[String] {
        &self.x_ticks
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Vertical extent covering every value, anchored at zero with some
    /// headroom above the largest speedup.
    pub fn y_range(&self) -> (f64, f64) {
        let max = self
            .lines
            .iter()
            .flat_map(|l| l.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let min = self
            .lines
            .iter()
            .flat_map(|l| l.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::min);
        if max <= min {
            (min, min + 1.0)
        } else {
            (min, max * 1.1)
        }
    }
}

/// Draw one line per row of `table` onto `chart` and decorate it.
pub fn plot_table(chart: &mut Chart, table: &SpeedupTable, title: &str) -> Result<(), Error> {
    for name in table.duplicates() {
        warn!(
            "{}: test case {:?} appears more than once, each row is drawn",
            table.path().display(),
            name
        );
    }
    if table.is_empty() {
        warn!("{}: no test cases", table.path().display());
    }

    for series in table.rows() {
        if let Some((threads, speedup)) = series.peak() {
            debug!(
                "{}: peak speedup {:.2} at {} threads",
                series.label(),
                speedup,
                threads
            );
        }
        chart.add_line(table.threads(), &series.speedups(), series.label())?;
    }

    chart
        .title(title)
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .legend(true);

    Ok(())
}
