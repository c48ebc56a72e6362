//! Application configuration.
//!
//! Configuration lives in `config.json` inside the application data
//! directory and is organized in optional modules:
//!
//! - **sync**: remote backend URL, token, timeout and batch size
//! - **timer**: tick interval, checkpoint cadence and milestone hours for `watch`
//!
//! A missing file, or a missing module, means defaults. Fasting preferences
//! (selected plan, notifications and so on) are not configuration: they are
//! part of the fasting state and change through the `plan` and `prefs`
//! commands.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastline::libs::config::Config;
//!
//! let config = Config::read()?;
//! let interval = config.timer_config().tick_interval();
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::api::SyncConfig;
use crate::libs::messages::Message;
use crate::libs::timer::TimerConfig;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// A configurable section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Key the wizard routes on
    pub key: String,
    /// Name shown in the module picker
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerConfig>,
}

impl Config {
    /// Loads the configuration, returning defaults when no file exists yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns `false` if there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    pub fn timer_config(&self) -> TimerConfig {
        self.timer.clone().unwrap_or_default()
    }

    pub fn sync_config(&self) -> Option<&SyncConfig> {
        self.sync.as_ref().filter(|sync| sync.is_configured())
    }

    /// Interactive setup wizard.
    ///
    /// Existing values are offered as defaults; modules the user does not
    /// pick are left untouched.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let node_descriptions = vec![
            SyncConfig::module(),
            ConfigModule {
                key: "timer".to_string(),
                name: "Timer".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "sync" => config.sync = Some(SyncConfig::init(&config.sync)?),
                "timer" => {
                    let default = config.timer.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTimer);
                    let milestones: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptTimerMilestones.to_string())
                        .default(format_milestones(&default.milestones))
                        .allow_empty(true)
                        .interact_text()?;
                    config.timer = Some(TimerConfig {
                        tick_interval_ms: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTimerTickInterval.to_string())
                            .default(default.tick_interval_ms)
                            .interact_text()?,
                        checkpoint_every: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTimerCheckpointEvery.to_string())
                            .default(default.checkpoint_every)
                            .interact_text()?,
                        milestones: parse_milestones(&milestones),
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn format_milestones(milestones: &[u32]) -> String {
    milestones.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}

/// Parses `"12, 16,18"` into sorted, de-duplicated hours; junk is ignored.
pub fn parse_milestones(input: &str) -> Vec<u32> {
    let mut hours: Vec<u32> = input
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .filter(|hours| *hours > 0)
        .collect();
    hours.sort_unstable();
    hours.dedup();
    hours
}
