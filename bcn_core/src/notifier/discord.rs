//! Discord webhook channel.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::{
    config::DiscordSettings,
    notifier::{ensure_success, DeliveryError, Notifier},
};

pub(crate) static NAME: &str = "Discord";
static USERNAME: &str = "Bin Collection Reminder";

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

/// Posts the message to a Discord webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook: String,
}

impl DiscordNotifier {
    pub fn new(client: Client, settings: DiscordSettings) -> Self {
        Self {
            client,
            webhook: settings.webhook,
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        debug!("posting to Discord webhook");
        let payload = WebhookPayload {
            content: message,
            username: USERNAME,
        };
        let response = self.client.post(&self.webhook).json(&payload).send().await?;
        ensure_success(response.status())
    }
}
