use anyhow::Error;
use serde::Serialize;
use serde_json::{json, Map, Value};
use slog::{debug, info, Logger};
use std::path::Path;
use thiserror::Error as ThisError;

use super::{bin_index, Bounds, Glyphs, BLANK};
use crate::{extremes, StationCollection, StationRecord, XAxis, YAxis};

#[derive(Debug, ThisError, PartialEq)]
pub enum ReportError {
    #[error("chart needs at least one row and one column, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
}

/// Everything one sounding chart needs besides the stations themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub width: usize,
    pub height: usize,
    pub y_axis: YAxis,
    pub x_axis: XAxis,
    pub y_bounds: Bounds,
    pub x_bounds: Bounds,
    pub glyphs: Glyphs,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            width: 66,
            height: 16,
            y_axis: YAxis::default(),
            x_axis: XAxis::default(),
            y_bounds: Bounds::default(),
            x_bounds: Bounds::default(),
            glyphs: Glyphs::default(),
        }
    }
}

/// Serialized form of a chart, keyed the way downstream tooling reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "x-axis")]
    pub x_axis: XAxis,
    #[serde(rename = "y-axis")]
    pub y_axis: YAxis,
    #[serde(rename = "x-min")]
    pub x_min: f64,
    #[serde(rename = "x-max")]
    pub x_max: f64,
    #[serde(rename = "y-min")]
    pub y_min: f64,
    #[serde(rename = "y-max")]
    pub y_max: f64,
    /// station id -> [y value, x value], in document order
    pub stations: Map<String, Value>,
    pub console_output: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundingReport {
    pub summary: ReportSummary,
    /// Station ids per Y bin, bin 0 holding the lowest Y values.
    pub y_bins: Vec<Vec<String>>,
}

impl SoundingReport {
    pub fn lines(&self) -> &[String] {
        &self.summary.console_output
    }

    pub fn render(&self) -> String {
        self.summary.console_output.join("\n")
    }

    pub fn write_json(&self, path: &Path) -> Result<(), Error> {
        let body = serde_json::to_vec(&self.summary)?;
        sounding_core::write_snapshot(path, &body)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Nothing survived pruning; no chart was drawn.
    NoData,
    Chart(SoundingReport),
}

/// Bins `collection` into a `height` x `width` character chart.
///
/// Stations lacking either axis value are pruned from `collection` first.
pub fn generate_report(
    collection: &mut StationCollection,
    options: &ReportOptions,
    logger: &Logger,
) -> Result<ReportOutcome, ReportError> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(ReportError::EmptyGrid { width, height });
    }

    let y_attr = options.y_axis.attribute();
    let x_attr = options.x_axis.attribute();
    let removed = collection.prune(y_attr) + collection.prune(x_attr);
    debug!(
        logger,
        "pruned {} stations lacking {} or {}, {} remain",
        removed,
        y_attr,
        x_attr,
        collection.len()
    );

    let (Some((y_natural_high, y_natural_low)), Some((x_natural_low, x_natural_high))) = (
        collection.attribute_range(y_attr),
        collection.temperature_range(x_attr),
    ) else {
        info!(logger, "No data available to display.");
        return Ok(ReportOutcome::NoData);
    };

    let (y_low, y_high) = options.y_bounds.clamp_range(y_natural_low, y_natural_high);
    let (x_low, x_high) = options
        .x_bounds
        .or_unbounded()
        .clamp_range(x_natural_low, x_natural_high);
    debug!(
        logger,
        "{} axis {}..{}, {} axis {}..{}", y_attr, y_low, y_high, x_attr, x_low, x_high
    );

    let mut bins: Vec<Vec<&StationRecord>> = vec![Vec::new(); height];
    let mut stations = Map::new();
    for station in collection.stations() {
        let (Some(y), Some(x)) = (y_attr.value(station), x_attr.value(station)) else {
            continue;
        };
        bins[bin_index(y, y_low, y_high, height)].push(station);
        stations.insert(station.station_id.clone(), json!([y, x]));
    }

    let x_bin = |value: f64| bin_index(value, x_low, x_high, width);
    let glyphs = &options.glyphs;
    let mut grid = vec![vec![BLANK; width]; height];
    for (row, members) in grid.iter_mut().zip(&bins) {
        let Some((coldest, warmest)) = extremes(members.iter().copied(), x_attr) else {
            continue;
        };
        // crossed x bounds flip the bin order
        let (start, stop) = {
            let (a, b) = (x_bin(coldest), x_bin(warmest));
            (a.min(b), a.max(b))
        };
        if start == stop {
            row[start] = glyphs.mean;
            continue;
        }

        let values: Vec<f64> = members.iter().filter_map(|s| x_attr.value(s)).collect();
        for value in &values {
            row[x_bin(*value)] = glyphs.data;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        row[x_bin(mean)] = glyphs.mean;
        row[start] = glyphs.start_stop;
        row[stop] = glyphs.start_stop;
        for cell in row[start + 1..stop].iter_mut().filter(|c| **c == BLANK) {
            *cell = glyphs.range;
        }
    }

    let mut lines: Vec<String> = grid
        .iter()
        .zip(&bins)
        .enumerate()
        .map(|(i, (row, members))| {
            let label = y_high + (y_low - y_high) * (height - i - 1) as f64 / height as f64;
            format!(
                "{:>4} |{}| n={}",
                label as i64,
                row.iter().collect::<String>(),
                members.len()
            )
        })
        .collect();
    if options.y_axis.is_elevation() {
        lines.reverse();
    }

    let title = format!("{} vs {}", options.y_axis, options.x_axis);
    lines.insert(0, format!("     +{:-^width$}+", title, width = width));
    lines.push(format!("     +{}+", "-".repeat(width)));
    lines.push(format!(
        "      {:<3}{}{:>3}",
        x_low as i64,
        " ".repeat(width.saturating_sub(5)),
        x_high as i64
    ));

    let y_bins = bins
        .iter()
        .map(|members| members.iter().map(|s| s.station_id.clone()).collect())
        .collect();

    info!(
        logger,
        "charted {} stations into {} rows", stations.len(), height
    );
    Ok(ReportOutcome::Chart(SoundingReport {
        summary: ReportSummary {
            x_axis: options.x_axis,
            y_axis: options.y_axis,
            x_min: x_low,
            x_max: x_high,
            y_min: y_low,
            y_max: y_high,
            stations,
            console_output: lines,
        },
        y_bins,
    }))
}
