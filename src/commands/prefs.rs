use crate::{
    libs::{app::AppState, formatter::format_duration, messages::Message, plan::hours_to_duration, view::View},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::{builder::BoolishValueParser, Args};

#[derive(Debug, Args)]
pub struct PrefsArgs {
    #[arg(long, value_name = "on|off", value_parser = BoolishValueParser::new())]
    notifications: Option<bool>,

    #[arg(long, value_name = "on|off", value_parser = BoolishValueParser::new())]
    dark_mode: Option<bool>,

    #[arg(long, value_name = "on|off", value_parser = BoolishValueParser::new())]
    onboarding: Option<bool>,

    #[arg(long, value_name = "on|off", value_parser = BoolishValueParser::new())]
    premium: Option<bool>,
}

pub fn cmd(args: PrefsArgs) -> Result<()> {
    let mut app = AppState::open()?;
    let mut changed = false;

    if let Some(enabled) = args.notifications {
        app.fasting.set_notifications_enabled(enabled);
        changed = true;
    }
    if let Some(enabled) = args.dark_mode {
        app.fasting.set_dark_mode(enabled);
        changed = true;
    }
    if let Some(complete) = args.onboarding {
        app.fasting.set_onboarding_complete(complete);
        changed = true;
    }
    if let Some(premium) = args.premium {
        app.fasting.set_premium(premium);
        changed = true;
    }
    if changed {
        msg_success!(Message::PreferencesUpdated);
    }

    let prefs = app.fasting.preferences();
    msg_print!(Message::PreferencesHeader, true);
    View::summary(&[
        ("Selected plan", prefs.selected_plan.clone()),
        ("Custom length", format_duration(&hours_to_duration(prefs.custom_duration))),
        ("Notifications", on_off(prefs.notifications_enabled)),
        ("Dark mode", on_off(prefs.dark_mode)),
        ("Onboarding complete", on_off(prefs.onboarding_complete)),
        ("Premium", on_off(prefs.is_premium)),
    ]);
    Ok(())
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}
