// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::chart::Chart;
use crate::Error;

use plotters::coord::ranged1d::{DiscreteRanged, SegmentValue, SegmentedCoord};
use plotters::coord::types::RangedCoordu32;
use plotters::prelude::*;

use std::path::Path;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0x1F77B4),
    hexcolour!(0xFF7F0E),
    hexcolour!(0x2CA02C),
    hexcolour!(0xD62728),
    hexcolour!(0x9467BD),
    hexcolour!(0x8C564B),
    hexcolour!(0xE377C2),
    hexcolour!(0x7F7F7F),
    hexcolour!(0xBCBD22),
    hexcolour!(0x17BECF),
];

const FONT: &str = "sans-serif";

pub const DEFAULT_SIZE: (u32, u32) = (640, 480);

/// Writes the current state of a chart somewhere.
pub trait Export {
    fn export(&mut self, chart: &Chart, path: &Path) -> Result<(), Error>;
}

/// PNG exporter backed by the plotters bitmap backend. Existing files are
/// overwritten.
pub struct Bitmap {
    size: (u32, u32),
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl Bitmap {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Export for Bitmap {
    fn export(&mut self, chart: &Chart, path: &Path) -> Result<(), Error> {
        draw(chart, path, self.size).map_err(|e| Error::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(
            "wrote {} lines to {} ({}x{})",
            chart.lines().len(),
            path.display(),
            self.size.0,
            self.size.1
        );
        Ok(())
    }
}

fn tick_label(ticks: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            ticks.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

/// One segment per thread count. Integer ranges are inclusive once
/// segmented, so the range ends at the last column index.
fn thread_axis(ticks: &[String]) -> SegmentedCoord<RangedCoordu32> {
    (0u32..ticks.len().saturating_sub(1) as u32).into_segmented()
}

fn draw(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn std::error::Error>> {
    let ticks = chart.x_ticks();
    let (low, high) = chart.y_range();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50);
    if !chart.caption().is_empty() {
        builder.caption(chart.caption(), (FONT, 24));
    }

    let mut context = builder.build_cartesian_2d(thread_axis(ticks), low..high)?;

    let formatter = |v: &SegmentValue<u32>| tick_label(ticks, v);
    context
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ticks.len() + 1)
        .x_label_formatter(&formatter)
        .x_desc(chart.x_label())
        .y_desc(chart.y_label())
        .label_style((FONT, 14))
        .draw()?;

    for (i, line) in chart.lines().iter().enumerate() {
        let colour = COLOURS[i % COLOURS.len()];
        let points = line
            .values()
            .iter()
            .enumerate()
            .map(|(x, y)| (SegmentValue::CenterOf(x as u32), *y));

        context
            .draw_series(LineSeries::new(points, colour.stroke_width(2)))?
            .label(line.label())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
            });
    }

    if chart.has_legend() && !chart.is_empty() {
        context
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.filled())
            .border_style(&BLACK)
            .label_font((FONT, 14))
            .draw()?;
    }

    root.present()?;

    Ok(())
}
