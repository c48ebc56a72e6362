use crate::{
    libs::{
        app::AppState,
        formatter::{format_local_datetime, format_weights},
        messages::Message,
        view::View,
        weight::{GoalPrediction, NewWeight, WeightGoal, WeightSource, WeightUnit},
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct WeightArgs {
    #[command(subcommand)]
    command: Option<WeightCommand>,
}

#[derive(Debug, Subcommand)]
enum WeightCommand {
    /// Record a weight measurement
    Add {
        weight: f64,
        /// Unit of the measurement (defaults to the preferred unit)
        #[arg(short, long, value_enum)]
        unit: Option<WeightUnit>,
        /// Date of the measurement: today or YYYY-MM-DD
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List recorded weights, most recent first
    List {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete a weight entry by id
    Delete { id: String },
    /// Set the weight goal
    Goal {
        target: f64,
        #[arg(short, long, value_enum)]
        unit: Option<WeightUnit>,
        /// Date to reach the goal by: YYYY-MM-DD
        #[arg(long)]
        by: Option<String>,
    },
    /// Remove the weight goal
    ClearGoal,
    /// Set the preferred display unit
    Unit {
        #[arg(value_enum)]
        unit: WeightUnit,
    },
    /// Show current weight, progress and trend
    Stats,
    /// Import measurements from a CSV file with columns date,weight,unit[,note]
    Import {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "apple-health")]
        source: WeightSource,
    },
}

pub fn cmd(args: WeightArgs) -> Result<()> {
    let mut app = AppState::open()?;

    match args.command {
        Some(WeightCommand::Add { weight, unit, date, note }) => {
            let unit = unit.unwrap_or(app.weight.unit());
            let entry = app.weight.add_entry(
                NewWeight {
                    weight,
                    unit,
                    date: parse_date(&date)?,
                    note,
                },
                WeightSource::Manual,
            )?;
            msg_success!(Message::WeightAdded(format!("{:.1} {}", entry.weight, entry.unit)));
        }
        Some(WeightCommand::List { limit }) => list(&app, limit),
        Some(WeightCommand::Delete { id }) => {
            let removed = app.weight.delete_entry(&id)?;
            msg_success!(Message::WeightDeleted(removed.id));
        }
        Some(WeightCommand::Goal { target, unit, by }) => {
            let unit = unit.unwrap_or(app.weight.unit());
            let target_date = by.as_deref().map(parse_date).transpose()?;
            app.weight.set_goal(WeightGoal {
                target_weight: target,
                unit,
                start_date: app.fasting.now(),
                target_date,
            })?;
            msg_success!(Message::WeightGoalSet(format!("{:.1} {}", target, unit)));
        }
        Some(WeightCommand::ClearGoal) => match app.weight.clear_goal() {
            Some(_) => msg_success!(Message::WeightGoalCleared),
            None => msg_info!(Message::NoWeightGoal),
        },
        Some(WeightCommand::Unit { unit }) => {
            app.weight.set_unit(unit);
            msg_success!(Message::WeightUnitSet(unit.to_string()));
        }
        Some(WeightCommand::Stats) | None => stats(&app),
        Some(WeightCommand::Import { file, source }) => import(&mut app, file, source)?,
    }

    Ok(())
}

fn list(app: &AppState, limit: Option<usize>) {
    let entries = app.weight.entries();
    if entries.is_empty() {
        msg_info!(Message::WeightsEmpty);
        return;
    }
    let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];
    View::weights(&format_weights(shown, app.weight.unit()));
}

fn stats(app: &AppState) {
    let store = &app.weight;
    let unit = store.unit();
    let Some(current) = store.current_weight() else {
        msg_info!(Message::WeightsEmpty);
        return;
    };

    let mut rows = vec![("Current", format!("{:.1} {}", current, unit))];
    if let Some(start) = store.start_weight() {
        rows.push(("Start", format!("{:.1} {}", start, unit)));
    }
    if let Some(change) = store.weight_change() {
        rows.push(("Change", format!("{:+.1} {}", change, unit)));
    }
    if let Some(weekly) = store.average_weekly_change() {
        rows.push(("Weekly trend", format!("{:+.2} {}/week", weekly, unit)));
    }
    match store.goal() {
        Some(goal) => {
            rows.push(("Goal", format!("{:.1} {}", goal.target_in(unit), unit)));
            if let Some(progress) = store.progress_percentage() {
                rows.push(("Progress", format!("{:.0}%", progress)));
            }
            if let Some(target_date) = goal.target_date {
                rows.push(("Target date", format_local_datetime(&target_date)));
            }
            let prediction = match store.predicted_goal_date() {
                Some(GoalPrediction::Reached) => Message::GoalReached.to_string(),
                Some(GoalPrediction::On(date)) => format_local_datetime(&date),
                None => "-".to_string(),
            };
            rows.push(("Expected", prediction));
        }
        None => rows.push(("Goal", "-".to_string())),
    }

    msg_print!(Message::WeightStatsHeader, true);
    View::summary(&rows);
}

fn import(app: &mut AppState, file: PathBuf, source: WeightSource) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_path(&file)?;
    let mut batch = Vec::new();
    let mut invalid = 0;

    for (index, record) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        match record.map_err(anyhow::Error::from).and_then(|record| parse_row(&record)) {
            Ok(new) => batch.push(new),
            Err(e) => {
                msg_warning!(Message::WeightImportRowInvalid(line, e.to_string()));
                invalid += 1;
            }
        }
    }

    let summary = app.weight.import_entries(batch, source);
    msg_success!(Message::WeightImported(summary.imported, summary.skipped + invalid));
    Ok(())
}

fn parse_row(record: &csv::StringRecord) -> Result<NewWeight> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    let weight: f64 = field(1).parse()?;
    let unit: WeightUnit = field(2).parse().map_err(anyhow::Error::msg)?;
    let note = Some(field(3).to_string()).filter(|note| !note.is_empty());

    Ok(NewWeight {
        weight,
        unit,
        date: parse_date(field(0))?,
        note,
    })
}

/// Parses `today` or `YYYY-MM-DD`; dates resolve to local midnight.
fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    if input.eq_ignore_ascii_case("today") {
        return Ok(Utc::now());
    }
    let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") else {
        msg_bail_anyhow!(Message::InvalidDate(input.to_string()));
    };
    match Local.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN)).earliest() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => msg_bail_anyhow!(Message::InvalidDate(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_and_rejects_garbage() {
        let date = parse_date("2024-03-01").unwrap();
        assert_eq!(date.with_timezone(&Local).date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(parse_date("03/01/2024").is_err());
    }

    #[test]
    fn parses_csv_rows() {
        let record = csv::StringRecord::from(vec!["2024-03-01", "72.5", "kg", "morning"]);
        let new = parse_row(&record).unwrap();
        assert_eq!(new.weight, 72.5);
        assert_eq!(new.unit, WeightUnit::Kg);
        assert_eq!(new.note.as_deref(), Some("morning"));

        let record = csv::StringRecord::from(vec!["2024-03-01", "heavy", "kg"]);
        assert!(parse_row(&record).is_err());
    }
}
