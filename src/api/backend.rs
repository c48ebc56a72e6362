use crate::api::RemoteSync;
use crate::libs::config::ConfigModule;
use crate::libs::fast::CompletedFast;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const FASTS_URL: &str = "fasts";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    pub api_url: String,
    pub auth_token: String,
    pub timeout_secs: u64,
    /// Outbox items delivered per `sync` run.
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            auth_token: String::new(),
            timeout_secs: 30,
            batch_size: 20,
        }
    }
}

impl SyncConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "sync".to_string(),
            name: "Remote sync".to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty()
    }

    pub fn init(config: &Option<SyncConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleSync);
        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSyncApiUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            auth_token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSyncAuthToken.to_string())
                .default(config.auth_token)
                .allow_empty(true)
                .interact_text()?,
            timeout_secs: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSyncTimeout.to_string())
                .default(config.timeout_secs)
                .interact_text()?,
            batch_size: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSyncBatchSize.to_string())
                .default(config.batch_size)
                .interact_text()?,
        })
    }
}

/// Body of `PUT /fasts/{id}`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FastPayload<'a> {
    id: &'a str,
    #[serde(with = "ts_milliseconds")]
    start_time: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    end_time: DateTime<Utc>,
    planned_duration_ms: i64,
    paused_ms: i64,
    duration_ms: i64,
    plan: Option<&'a str>,
    reached_target: bool,
}

impl<'a> From<&'a CompletedFast> for FastPayload<'a> {
    fn from(fast: &'a CompletedFast) -> Self {
        Self {
            id: &fast.id,
            start_time: fast.start_time,
            end_time: fast.end_time,
            planned_duration_ms: fast.planned_duration.num_milliseconds(),
            paused_ms: fast.paused_total.num_milliseconds(),
            duration_ms: fast.duration().num_milliseconds(),
            plan: fast.plan.as_deref(),
            reached_target: fast.reached_target(),
        }
    }
}

pub struct BackendClient {
    client: Client,
    config: SyncConfig,
}

impl BackendClient {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(msg_error_anyhow!(Message::SyncNotConfigured));
        }
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs.max(1))).build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn fast_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.config.api_url.trim_end_matches('/'), FASTS_URL, id)
    }
}

impl RemoteSync for BackendClient {
    async fn upsert_fast(&self, fast: &CompletedFast) -> Result<()> {
        let url = self.fast_url(&fast.id);
        let mut request = self.client.put(&url).json(&FastPayload::from(fast));
        if !self.config.auth_token.is_empty() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", self.config.auth_token));
        }

        let res = request.send().await?;
        let status = res.status();
        debug!(%url, %status, "fast upload response");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(msg_error_anyhow!(Message::SyncUnauthorized)),
            s => Err(msg_error_anyhow!(Message::SyncRequestFailed(s.as_u16()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_api_url() {
        assert!(BackendClient::new(&SyncConfig::default()).is_err());
    }

    #[test]
    fn fast_url_joins_without_double_slash() {
        let config = SyncConfig {
            api_url: "https://api.example.com/v1/".to_string(),
            ..SyncConfig::default()
        };
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.fast_url("abc"), "https://api.example.com/v1/fasts/abc");
    }
}
