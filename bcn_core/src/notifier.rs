//! Notification channels and the dispatcher sending the reminder to each of them.

pub mod discord;
pub mod email;
pub mod whatsapp;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};

use crate::{
    collection::CollectionResult,
    config::{ChannelConfigError, NotifyConfig},
    notifier::{discord::DiscordNotifier, email::EmailNotifier, whatsapp::WhatsappNotifier},
};

/// Errors while delivering a single notification.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("invalid email: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// A channel a reminder can be sent to.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deliver the message once.
    async fn send(&self, message: &str) -> Result<(), DeliveryError>;
}

/// An enabled channel, usable or not.
pub enum Channel {
    Ready(Box<dyn Notifier>),
    Misconfigured {
        name: &'static str,
        error: ChannelConfigError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Sent,
    Failed(String),
    Skipped(String),
}

/// What happened on every enabled channel, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<(&'static str, ChannelOutcome)>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.sent() + self.failed()
    }

    pub fn sent(&self) -> usize {
        self.count(|outcome| matches!(outcome, ChannelOutcome::Sent))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ChannelOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ChannelOutcome::Skipped(_)))
    }

    fn count(&self, predicate: impl Fn(&ChannelOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}

/// Sends a collection reminder to every enabled channel.
pub struct Dispatcher {
    channels: Vec<Channel>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    /// Build the channels in their fixed order: Discord, WhatsApp, email.
    ///
    /// Disabled channels are left out.
    pub fn from_config(config: &NotifyConfig, client: &Client) -> Self {
        let channels = [
            resolve(config.discord.settings(), discord::NAME, |settings| {
                Box::new(DiscordNotifier::new(client.clone(), settings))
            }),
            resolve(config.whatsapp.settings(), whatsapp::NAME, |settings| {
                Box::new(WhatsappNotifier::new(client.clone(), settings))
            }),
            resolve(config.email.settings(), email::NAME, |settings| {
                Box::new(EmailNotifier::new(settings))
            }),
        ];
        Self::new(channels.into_iter().flatten().collect())
    }

    /// Format the reminder and send it to each channel in turn.
    ///
    /// A failing channel never stops the remaining ones.
    pub async fn dispatch(&self, result: &CollectionResult) -> DispatchReport {
        let message = result.message();
        let mut report = DispatchReport::default();
        if self.channels.is_empty() {
            info!("no notification channel enabled");
        }
        for channel in &self.channels {
            let outcome = match channel {
                Channel::Ready(notifier) => {
                    let name = notifier.name();
                    match notifier.send(&message).await {
                        Ok(()) => {
                            info!(channel = name, "notification sent");
                            (name, ChannelOutcome::Sent)
                        }
                        Err(err) => {
                            error!(channel = name, error = %err, "notification failed");
                            (name, ChannelOutcome::Failed(err.to_string()))
                        }
                    }
                }
                Channel::Misconfigured { name, error } => {
                    warn!(channel = *name, error = %error, "notification channel skipped");
                    (*name, ChannelOutcome::Skipped(error.to_string()))
                }
            };
            report.outcomes.push(outcome);
        }
        report
    }
}

fn resolve<S>(
    settings: Option<Result<S, ChannelConfigError>>,
    name: &'static str,
    build: impl FnOnce(S) -> Box<dyn Notifier>,
) -> Option<Channel> {
    Some(match settings? {
        Ok(settings) => Channel::Ready(build(settings)),
        Err(error) => Channel::Misconfigured { name, error },
    })
}

/// Treat every non-2xx status as a failed delivery.
pub(crate) fn ensure_success(status: StatusCode) -> Result<(), DeliveryError> {
    if status.is_success() {
        return Ok(());
    }
    Err(DeliveryError::Status(status))
}
