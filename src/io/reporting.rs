// src/io/reporting.rs

use crate::error::ReportError;
use crate::simulation::comparison::{Comparison, StrategySummary};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One product on one day of one strategy, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Strategy")]
    pub strategy: String,
    #[serde(rename = "Day")]
    pub day: usize,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Stock Level")]
    pub stock_level: u32,
    #[serde(rename = "Demand")]
    pub demand: u32,
    #[serde(rename = "Restock Action")]
    pub restock_action: u32,
    #[serde(rename = "Stockouts")]
    pub stockouts: u32,
    // Money is exported with two decimals.
    #[serde(rename = "Daily Cost")]
    pub daily_cost: String,
    #[serde(rename = "Daily Revenue")]
    pub daily_revenue: String,
}

fn summary_rows(summary: &StrategySummary, rows: &mut Vec<ExportRow>) {
    let strategy = summary.label.to_string();
    for day in &summary.results {
        for r in &day.product_results {
            rows.push(ExportRow {
                strategy: strategy.clone(),
                day: day.day,
                product: r.product_id.clone(),
                stock_level: r.stock_level,
                demand: r.demand,
                restock_action: r.restock_action,
                stockouts: r.stockout_units,
                daily_cost: format!("{:.2}", r.daily_cost),
                daily_revenue: format!("{:.2}", r.daily_revenue),
            });
        }
    }
}

/// Baseline rows first, then the learner's rows.
pub fn export_rows(comparison: &Comparison) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    summary_rows(&comparison.baseline, &mut rows);
    summary_rows(&comparison.rl, &mut rows);
    rows
}

/// Writes the comparison as CSV to any writer. Returns the number of data rows.
pub fn write_comparison<W: Write>(comparison: &Comparison, writer: W) -> Result<usize, ReportError> {
    let rows = export_rows(comparison);
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Creates (or truncates) `file_path` and writes both strategies' rows to it.
///
/// Returns the number of data rows written, header excluded.
pub fn write_comparison_csv<P: AsRef<Path>>(
    file_path: P,
    comparison: &Comparison,
) -> Result<usize, ReportError> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    let written = write_comparison(comparison, file)?;

    info!(rows = written, path = %path.display(), "exported comparison results");
    Ok(written)
}
