//! Export of fasting history and weight entries to CSV or JSON files.
//!
//! ## Output layout
//!
//! - `--data fasts` / `--data weights` write a single file.
//! - `--data all` writes one JSON document holding both lists, or two CSV
//!   files suffixed `_fasts` and `_weights`.
//!
//! Timestamps are written as RFC 3339 in UTC so the files sort and parse
//! the same everywhere.

use crate::libs::fast::CompletedFast;
use crate::libs::weight::WeightEntry;
use anyhow::Result;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    Fasts,
    Weights,
    All,
}

#[derive(Debug, Serialize)]
pub struct ExportFast {
    pub id: String,
    pub plan: String,
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
    pub planned_minutes: i64,
    pub paused_minutes: i64,
    pub reached_target: bool,
}

impl From<&CompletedFast> for ExportFast {
    fn from(fast: &CompletedFast) -> Self {
        Self {
            id: fast.id.clone(),
            plan: fast.plan.clone().unwrap_or_default(),
            start: rfc3339(fast.start_time),
            end: rfc3339(fast.end_time),
            duration_minutes: fast.duration().num_minutes(),
            planned_minutes: fast.planned_duration.num_minutes(),
            paused_minutes: fast.paused_total.num_minutes(),
            reached_target: fast.reached_target(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportWeight {
    pub id: String,
    pub date: String,
    pub weight: f64,
    pub unit: String,
    pub note: String,
    pub source: String,
}

impl From<&WeightEntry> for ExportWeight {
    fn from(entry: &WeightEntry) -> Self {
        Self {
            id: entry.id.clone(),
            date: rfc3339(entry.date),
            weight: entry.weight,
            unit: entry.unit.to_string(),
            note: entry.note.clone().unwrap_or_default(),
            source: entry.source.to_string(),
        }
    }
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "fastline_export_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });
        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes the requested data and returns the files created.
    pub fn export(&self, data: ExportData, fasts: &[CompletedFast], weights: &[WeightEntry]) -> Result<Vec<PathBuf>> {
        let fasts: Vec<ExportFast> = fasts.iter().map(ExportFast::from).collect();
        let weights: Vec<ExportWeight> = weights.iter().map(ExportWeight::from).collect();

        match (data, self.format) {
            (ExportData::Fasts, ExportFormat::Csv) => {
                write_csv(&self.output_path, &fasts)?;
                Ok(vec![self.output_path.clone()])
            }
            (ExportData::Weights, ExportFormat::Csv) => {
                write_csv(&self.output_path, &weights)?;
                Ok(vec![self.output_path.clone()])
            }
            (ExportData::All, ExportFormat::Csv) => {
                let fasts_path = self.suffixed("fasts");
                let weights_path = self.suffixed("weights");
                write_csv(&fasts_path, &fasts)?;
                write_csv(&weights_path, &weights)?;
                Ok(vec![fasts_path, weights_path])
            }
            (ExportData::Fasts, ExportFormat::Json) => {
                write_json(&self.output_path, &fasts)?;
                Ok(vec![self.output_path.clone()])
            }
            (ExportData::Weights, ExportFormat::Json) => {
                write_json(&self.output_path, &weights)?;
                Ok(vec![self.output_path.clone()])
            }
            (ExportData::All, ExportFormat::Json) => {
                let all = serde_json::json!({
                    "export_date": rfc3339(Utc::now()),
                    "fasts": fasts,
                    "weights": weights,
                });
                write_json(&self.output_path, &all)?;
                Ok(vec![self.output_path.clone()])
            }
        }
    }

    fn suffixed(&self, suffix: &str) -> PathBuf {
        let base = self
            .output_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "fastline_export".to_string());
        self.output_path
            .with_file_name(format!("{}_{}.{}", base, suffix, self.format.extension()))
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    File::create(path)?.write_all(json.as_bytes())?;
    Ok(())
}
