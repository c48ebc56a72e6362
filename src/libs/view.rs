use super::fast::FastingStats;
use super::formatter::{format_duration, format_local_datetime, FormattedFast, FormattedWeight};
use super::plan::FastingPlan;
use crate::db::outbox::OutboxItem;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn fasts(fasts: &[FormattedFast]) {
        let mut table = Table::new();

        table.add_row(row!["#", "PLAN", "START", "END", "DURATION", "TARGET", "REACHED"]);
        for fast in fasts {
            table.add_row(row![
                fast.id,
                fast.plan,
                fast.start,
                fast.end,
                fast.duration,
                fast.target,
                if fast.reached { "yes" } else { "no" }
            ]);
        }
        table.printstd();
    }

    pub fn weights(weights: &[FormattedWeight]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "WEIGHT", "NOTE", "SOURCE"]);
        for weight in weights {
            table.add_row(row![weight.id, weight.date, weight.weight, weight.note, weight.source]);
        }
        table.printstd();
    }

    /// The plan catalogue, marking the selected plan with `*`.
    pub fn plans(plans: &[FastingPlan], selected: &str) {
        let mut table = Table::new();

        table.add_row(row!["", "PLAN", "NAME", "FAST", "EAT", "DESCRIPTION"]);
        for plan in plans {
            table.add_row(row![
                if plan.id == selected { "*" } else { "" },
                plan.id,
                plan.name,
                format!("{}h", plan.fasting_hours),
                format!("{}h", plan.eating_hours),
                plan.description
            ]);
        }
        table.printstd();
    }

    pub fn stats(stats: &FastingStats) {
        let mut table = Table::new();

        table.add_row(row!["Total fasts", stats.total_fasts]);
        table.add_row(row!["Reached target", stats.reached_target]);
        table.add_row(row!["Longest", format_duration(&stats.longest)]);
        table.add_row(row!["Average", format_duration(&stats.average)]);
        table.add_row(row!["Total time", format_duration(&stats.total_time)]);
        table.add_row(row!["Current streak", format!("{} day(s)", stats.current_streak)]);
        table.printstd();
    }

    /// Label/value pairs, used for the weight summary.
    pub fn summary(rows: &[(&str, String)]) {
        let mut table = Table::new();
        for (label, value) in rows {
            table.add_row(row![label, value]);
        }
        table.printstd();
    }

    pub fn outbox(items: &[OutboxItem]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "KIND", "RECORD", "QUEUED", "ATTEMPTS", "LAST ERROR"]);
        for item in items {
            table.add_row(row![
                item.id,
                item.kind,
                item.record_id,
                format_local_datetime(&item.created_at),
                item.attempts,
                item.last_error.clone().unwrap_or_default()
            ]);
        }
        table.printstd();
    }
}
