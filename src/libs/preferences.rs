//! User preferences persisted alongside the fasting state.

use crate::libs::plan::{resolve_duration, DEFAULT_FASTING_HOURS, DEFAULT_PLAN};
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Plan identifier used when a fast is started without an explicit plan.
    pub selected_plan: String,
    /// Length of the custom plan, in fractional hours.
    pub custom_duration: f64,
    pub notifications_enabled: bool,
    pub dark_mode: bool,
    pub onboarding_complete: bool,
    pub is_premium: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_plan: DEFAULT_PLAN.to_string(),
            custom_duration: DEFAULT_FASTING_HOURS,
            notifications_enabled: true,
            dark_mode: false,
            onboarding_complete: false,
            is_premium: false,
        }
    }
}

impl Preferences {
    /// Planned duration of the currently selected plan.
    pub fn planned_duration(&self) -> Duration {
        resolve_duration(&self.selected_plan, Some(self.custom_duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"selectedPlan":"18:6","darkMode":true}"#).unwrap();
        assert_eq!(prefs.selected_plan, "18:6");
        assert!(prefs.dark_mode);
        assert!(prefs.notifications_enabled);
        assert_eq!(prefs.custom_duration, 16.0);
    }

    #[test]
    fn planned_duration_follows_selected_plan() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.planned_duration(), Duration::hours(16));
        prefs.selected_plan = "custom".to_string();
        prefs.custom_duration = 20.5;
        assert_eq!(prefs.planned_duration(), Duration::minutes(20 * 60 + 30));
    }
}
