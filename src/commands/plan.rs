use crate::{
    libs::{
        app::AppState,
        fasting::FastingStore,
        formatter::{format_duration, format_elapsed},
        messages::Message,
        plan::{hours_to_duration, validate_custom_hours, validate_plan, CUSTOM_PLAN},
    },
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::Duration;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[arg(help = "Plan to select, e.g. 18:6 or custom")]
    plan: Option<String>,

    #[arg(long, help = "Length of the custom plan in hours (selects the custom plan)")]
    hours: Option<f64>,

    #[arg(short, long, help = "Do not ask before discarding a fast in progress")]
    yes: bool,
}

pub fn cmd(args: PlanArgs) -> Result<()> {
    let mut app = AppState::open()?;

    let plan = match (args.plan, args.hours) {
        (Some(plan), _) => plan,
        (None, Some(_)) => CUSTOM_PLAN.to_string(),
        (None, None) => {
            let prefs = app.fasting.preferences();
            msg_info!(Message::CurrentPlan(prefs.selected_plan.clone(), format_duration(&prefs.planned_duration())));
            return Ok(());
        }
    };

    let yes = args.yes;
    let changed = change_plan(&mut app.fasting, &plan, args.hours, |elapsed| {
        msg_warning!(Message::PlanChangeDiscardsFast(format_elapsed(elapsed)));
        Ok(yes
            || Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDiscardFast.to_string())
                .default(false)
                .interact()?)
    })?;
    if !changed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    if let Some(hours) = args.hours {
        msg_success!(Message::CustomDurationSet(format_duration(&hours_to_duration(hours))));
    }
    let prefs = app.fasting.preferences();
    msg_success!(Message::PlanSelected(prefs.selected_plan.clone(), format_duration(&prefs.planned_duration())));
    Ok(())
}

/// Validates the request, asks `confirm` when a fast would be discarded and
/// only then writes the custom length and the plan. Returns `false` when the
/// change was declined.
fn change_plan<F>(store: &mut FastingStore, plan: &str, hours: Option<f64>, confirm: F) -> Result<bool>
where
    F: FnOnce(Duration) -> Result<bool>,
{
    validate_plan(plan)?;
    if let Some(hours) = hours {
        validate_custom_hours(hours)?;
    }

    if let Some(current) = store.current() {
        let elapsed = current.elapsed_at(store.now());
        if !confirm(elapsed)? {
            return Ok(false);
        }
    }

    if let Some(hours) = hours {
        store.set_custom_duration(hours)?;
    }
    store.update_plan(plan)?;
    Ok(true)
}
