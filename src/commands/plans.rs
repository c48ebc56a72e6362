use crate::{
    libs::{app::AppState, formatter::format_duration, messages::Message, plan::PLANS, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let app = AppState::open()?;
    let prefs = app.fasting.preferences();

    msg_print!(Message::PlansHeader, true);
    View::plans(PLANS, &prefs.selected_plan);
    msg_print!(Message::CurrentPlan(prefs.selected_plan.clone(), format_duration(&prefs.planned_duration())));
    Ok(())
}
