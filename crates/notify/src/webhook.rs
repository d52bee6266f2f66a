//! Slack and Discord webhook channels.
use async_trait::async_trait;
use eyre::Result;
use reqwest::Client as HttpClient;
use serde_json::json;
use url::Url;

use crate::Notifier;

/// Slack incoming-webhook channel.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    http: HttpClient,
    url: Url,
}

impl SlackWebhook {
    /// Create a channel posting to the given incoming-webhook URL.
    pub fn new(url: Url) -> Self {
        Self { http: HttpClient::new(), url }
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    fn name(&self) -> &str {
        "slack"
    }

    async fn notify(&self, message: &str) -> Result<()> {
        self.http
            .post(self.url.clone())
            .json(&json!({ "text": message }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Discord webhook channel.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    http: HttpClient,
    url: Url,
}

impl DiscordWebhook {
    /// Create a channel posting to the given webhook URL.
    pub fn new(url: Url) -> Self {
        Self { http: HttpClient::new(), url }
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    fn name(&self) -> &str {
        "discord"
    }

    async fn notify(&self, message: &str) -> Result<()> {
        self.http
            .post(self.url.clone())
            .json(&json!({ "content": message }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slack_posts_text_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_body(mockito::Matcher::Json(json!({ "text": "service is down" })))
            .with_status(200)
            .create_async()
            .await;

        let channel = SlackWebhook::new(Url::parse(&format!("{}/hook", server.url())).unwrap());
        channel.notify("service is down").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn discord_posts_content_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_body(mockito::Matcher::Json(json!({ "content": "restored" })))
            .with_status(204)
            .create_async()
            .await;

        let channel = DiscordWebhook::new(Url::parse(&format!("{}/hook", server.url())).unwrap());
        channel.notify("restored").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_surfaces_as_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/hook").with_status(500).create_async().await;

        let channel = SlackWebhook::new(Url::parse(&format!("{}/hook", server.url())).unwrap());
        assert!(channel.notify("anything").await.is_err());
    }

    #[tokio::test]
    async fn broadcast_survives_failing_channel() {
        let mut server = mockito::Server::new_async().await;
        let _bad = server.mock("POST", "/bad").with_status(500).create_async().await;
        let good = server.mock("POST", "/good").with_status(200).create_async().await;

        let channels: Vec<Box<dyn Notifier>> = vec![
            Box::new(SlackWebhook::new(Url::parse(&format!("{}/bad", server.url())).unwrap())),
            Box::new(DiscordWebhook::new(Url::parse(&format!("{}/good", server.url())).unwrap())),
        ];
        crate::broadcast(&channels, "still delivered").await;
        good.assert_async().await;
    }
}
