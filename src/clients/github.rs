// Alert delivery through GitHub issues (picked up by the mobile app)

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::clients::Notifier;
use crate::config::{NotifierConfig, ENV_GITHUB_REPOSITORY, ENV_GITHUB_TOKEN};
use crate::error::{MonitorError, MonitorResult};
use crate::types::Notification;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubIssueNotifier {
    client: reqwest::Client,
    api_url: String,
    repository: Option<String>,
    token: Option<String>,
}

impl GitHubIssueNotifier {
    /// Credentials may be absent here; they are only demanded when an
    /// alert is actually sent.
    pub fn from_config(config: &NotifierConfig) -> MonitorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            token: config.token.clone(),
        })
    }

    fn credentials(&self) -> MonitorResult<(&str, &str)> {
        let repository = self
            .repository
            .as_deref()
            .ok_or_else(|| MonitorError::ConfigMissing(ENV_GITHUB_REPOSITORY.to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| MonitorError::ConfigMissing(ENV_GITHUB_TOKEN.to_string()))?;
        Ok((repository, token))
    }
}

#[async_trait]
impl Notifier for GitHubIssueNotifier {
    async fn notify(&self, notification: &Notification) -> MonitorResult<u16> {
        let (repository, token) = self.credentials()?;
        let url = format!("{}/repos/{}/issues", self.api_url, repository);

        let response = self.client
            .post(&url)
            .header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github+json")
            .json(notification)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

/// Writes the alert to the log instead of sending it (`--dry-run`)
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> MonitorResult<u16> {
        info!("📝 [dry-run] {}", notification.title);
        for line in notification.body.lines() {
            info!("📝 [dry-run]   {}", line);
        }
        Ok(200)
    }
}
