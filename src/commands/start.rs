use crate::{
    libs::{
        app::AppState,
        fasting::FastTarget,
        formatter::{format_clock_time, format_duration, format_elapsed},
        messages::Message,
        plan::{hours_to_duration, validate_custom_hours, validate_plan},
    },
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StartArgs {
    #[arg(help = "Plan to fast on, e.g. 16:8 (defaults to the selected plan)")]
    plan: Option<String>,

    #[arg(long, help = "Planned length in hours, overrides the plan")]
    hours: Option<f64>,

    #[arg(short, long, help = "Discard a fast already in progress")]
    force: bool,
}

pub fn cmd(args: StartArgs) -> Result<()> {
    let mut app = AppState::open()?;

    let target = match (args.hours, args.plan) {
        (Some(hours), _) => FastTarget::Duration(hours_to_duration(validate_custom_hours(hours)?)),
        (None, Some(plan)) => FastTarget::Plan(validate_plan(&plan)?.to_string()),
        (None, None) => FastTarget::Selected,
    };

    let fast = if args.force {
        if let Some(current) = app.fasting.current() {
            let elapsed = current.elapsed_at(app.fasting.now());
            msg_warning!(Message::FastReplaced(format_elapsed(elapsed)));
        }
        app.fasting.replace_fast(target)
    } else {
        app.fasting.start_fast(target)?
    };

    let now = app.fasting.now();
    msg_success!(Message::FastStarted(
        fast.plan.clone().unwrap_or_default(),
        format_duration(&fast.planned_duration),
        format_clock_time(fast.target_time_at(now).timestamp_millis()),
    ));
    Ok(())
}
