//! WhatsApp channel through the CallMeBot gateway.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use urlencoding::encode;

use crate::{
    config::WhatsappSettings,
    notifier::{ensure_success, DeliveryError, Notifier},
};

pub(crate) static NAME: &str = "WhatsApp";
static URL: &str = "https://api.callmebot.com/whatsapp.php";

/// Sends the message as a WhatsApp text via CallMeBot.
pub struct WhatsappNotifier {
    client: Client,
    url: String,
    phone: String,
    api_key: String,
}

impl WhatsappNotifier {
    pub fn new(client: Client, settings: WhatsappSettings) -> Self {
        Self {
            client,
            url: String::from(URL),
            phone: settings.phone,
            api_key: settings.api_key,
        }
    }

    /// Point the notifier at another gateway.
    pub(crate) fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// The gateway URL, every value percent-encoded.
    fn request_url(&self, message: &str) -> String {
        format!(
            "{}?phone={}&apikey={}&text={}",
            self.url,
            encode(&self.phone),
            encode(&self.api_key),
            encode(message)
        )
    }
}

#[async_trait]
impl Notifier for WhatsappNotifier {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        debug!("calling CallMeBot gateway");
        let response = self.client.get(self.request_url(message)).send().await?;
        ensure_success(response.status())
    }
}
