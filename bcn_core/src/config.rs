//! Configuration read once at startup from the environment.

use std::{env, path::PathBuf};

use tracing::{debug, warn};

static DEFAULT_SMTP_PORT: u16 = 587;

/// Errors which make a run impossible.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("UPRN environment variable not set")]
    MissingUprn,
}

/// Errors which disable a single notification channel.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ChannelConfigError {
    #[error("{channel} enabled but missing {}", .missing.join(", "))]
    Missing {
        channel: &'static str,
        missing: Vec<&'static str>,
    },
    #[error("invalid EMAIL_SMTP_PORT {0:?}")]
    InvalidPort(String),
}

/// The whole configuration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub uprn: String,
    pub notify: NotifyConfig,
}

/// The notification channels, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyConfig {
    pub discord: DiscordConfig,
    pub whatsapp: WhatsappConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscordConfig {
    pub enabled: bool,
    pub webhook: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhatsappConfig {
    pub enabled: bool,
    pub phone: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: Option<String>,
    /// The raw port, 587 when unset.
    pub smtp_port: Option<String>,
    pub sender: Option<String>,
    pub password: Option<String>,
    pub recipient: Option<String>,
}

/// Validated Discord settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordSettings {
    pub webhook: String,
}

/// Validated WhatsApp settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsappSettings {
    pub phone: String,
    pub api_key: String,
}

/// Validated email settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl Config {
    /// Load the configuration from the process environment and an optional `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env_file(dotenvy::dotenv()) {
            Ok(Some(path)) => debug!(path = %path.display(), "loaded .env file"),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration from any key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let flag = |key: &str| value(key).is_some_and(|value| value.eq_ignore_ascii_case("true"));
        let uprn = value("UPRN").ok_or(ConfigError::MissingUprn)?;
        Ok(Self {
            uprn,
            notify: NotifyConfig {
                discord: DiscordConfig {
                    enabled: flag("DISCORD_ENABLED"),
                    webhook: value("DISCORD_WEBHOOK"),
                },
                whatsapp: WhatsappConfig {
                    enabled: flag("WHATSAPP_ENABLED"),
                    phone: value("WHATSAPP_PHONE"),
                    api_key: value("WHATSAPP_APIKEY"),
                },
                email: EmailConfig {
                    enabled: flag("EMAIL_ENABLED"),
                    smtp_server: value("EMAIL_SMTP_SERVER"),
                    smtp_port: value("EMAIL_SMTP_PORT"),
                    sender: value("EMAIL_SENDER"),
                    password: value("EMAIL_PASSWORD"),
                    recipient: value("EMAIL_RECIPIENT"),
                },
            },
        })
    }
}

/// A missing `.env` file is not an error, any other failure is.
fn env_file(loaded: dotenvy::Result<PathBuf>) -> dotenvy::Result<Option<PathBuf>> {
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Name the unset settings of an enabled channel.
fn missing(
    channel: &'static str,
    required: &[(&'static str, &Option<String>)],
) -> ChannelConfigError {
    let missing = required
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    ChannelConfigError::Missing { channel, missing }
}

impl DiscordConfig {
    /// Validate the settings, `None` when the channel is disabled.
    pub fn settings(&self) -> Option<Result<DiscordSettings, ChannelConfigError>> {
        if !self.enabled {
            return None;
        }
        let Some(webhook) = &self.webhook else {
            return Some(Err(missing("Discord", &[("DISCORD_WEBHOOK", &self.webhook)])));
        };
        Some(Ok(DiscordSettings {
            webhook: webhook.clone(),
        }))
    }
}

impl WhatsappConfig {
    /// Validate the settings, `None` when the channel is disabled.
    pub fn settings(&self) -> Option<Result<WhatsappSettings, ChannelConfigError>> {
        if !self.enabled {
            return None;
        }
        let (Some(phone), Some(api_key)) = (&self.phone, &self.api_key) else {
            let required = [
                ("WHATSAPP_PHONE", &self.phone),
                ("WHATSAPP_APIKEY", &self.api_key),
            ];
            return Some(Err(missing("WhatsApp", &required)));
        };
        Some(Ok(WhatsappSettings {
            phone: phone.clone(),
            api_key: api_key.clone(),
        }))
    }
}

impl EmailConfig {
    /// Validate the settings, `None` when the channel is disabled.
    pub fn settings(&self) -> Option<Result<EmailSettings, ChannelConfigError>> {
        if !self.enabled {
            return None;
        }
        Some(self.validate())
    }

    fn validate(&self) -> Result<EmailSettings, ChannelConfigError> {
        let (Some(smtp_server), Some(sender), Some(password), Some(recipient)) =
            (&self.smtp_server, &self.sender, &self.password, &self.recipient)
        else {
            let required = [
                ("EMAIL_SMTP_SERVER", &self.smtp_server),
                ("EMAIL_SENDER", &self.sender),
                ("EMAIL_PASSWORD", &self.password),
                ("EMAIL_RECIPIENT", &self.recipient),
            ];
            return Err(missing("Email", &required));
        };
        let smtp_port = match &self.smtp_port {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ChannelConfigError::InvalidPort(port.clone()))?,
            None => DEFAULT_SMTP_PORT,
        };
        Ok(EmailSettings {
            smtp_server: smtp_server.clone(),
            smtp_port,
            sender: sender.clone(),
            password: password.clone(),
            recipient: recipient.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        io::{Error, ErrorKind},
        path::PathBuf,
    };

    use crate::config::{env_file, ChannelConfigError, Config, ConfigError, EmailSettings};

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_uprn() {
        assert_eq!(config(&[]), Err(ConfigError::MissingUprn));
        assert_eq!(config(&[("UPRN", "")]), Err(ConfigError::MissingUprn));
    }

    #[test]
    fn test_channels_disabled_by_default() {
        let config = config(&[("UPRN", "123"), ("DISCORD_WEBHOOK", "https://example.com")])
            .unwrap();
        assert_eq!(config.uprn, "123");
        assert!(config.notify.discord.settings().is_none());
        assert!(config.notify.whatsapp.settings().is_none());
        assert!(config.notify.email.settings().is_none());
    }

    #[test]
    fn test_enabled_flag_is_case_insensitive() {
        let config = config(&[
            ("UPRN", "123"),
            ("DISCORD_ENABLED", "TRUE"),
            ("DISCORD_WEBHOOK", "https://example.com/hook"),
            ("WHATSAPP_ENABLED", "yes"),
        ])
        .unwrap();
        let discord = config.notify.discord.settings().unwrap().unwrap();
        assert_eq!(discord.webhook, "https://example.com/hook");
        assert!(config.notify.whatsapp.settings().is_none());
    }

    #[test]
    fn test_whatsapp_missing_settings() {
        let config = config(&[
            ("UPRN", "123"),
            ("WHATSAPP_ENABLED", "true"),
            ("WHATSAPP_PHONE", "+447700900000"),
        ])
        .unwrap();
        let err = config.notify.whatsapp.settings().unwrap().unwrap_err();
        assert_eq!(
            err,
            ChannelConfigError::Missing {
                channel: "WhatsApp",
                missing: vec!["WHATSAPP_APIKEY"],
            }
        );
        assert_eq!(err.to_string(), "WhatsApp enabled but missing WHATSAPP_APIKEY");
    }

    #[test]
    fn test_email_default_port() {
        let config = config(&[
            ("UPRN", "123"),
            ("EMAIL_ENABLED", "true"),
            ("EMAIL_SMTP_SERVER", "smtp.example.com"),
            ("EMAIL_SENDER", "bins@example.com"),
            ("EMAIL_PASSWORD", "secret"),
            ("EMAIL_RECIPIENT", "home@example.com"),
        ])
        .unwrap();
        let email = config.notify.email.settings().unwrap().unwrap();
        assert_eq!(
            email,
            EmailSettings {
                smtp_server: String::from("smtp.example.com"),
                smtp_port: 587,
                sender: String::from("bins@example.com"),
                password: String::from("secret"),
                recipient: String::from("home@example.com"),
            }
        );
    }

    #[test]
    fn test_email_invalid_port() {
        let config = config(&[
            ("UPRN", "123"),
            ("EMAIL_ENABLED", "true"),
            ("EMAIL_SMTP_SERVER", "smtp.example.com"),
            ("EMAIL_SMTP_PORT", "smtp"),
            ("EMAIL_SENDER", "bins@example.com"),
            ("EMAIL_PASSWORD", "secret"),
            ("EMAIL_RECIPIENT", "home@example.com"),
        ])
        .unwrap();
        let err = config.notify.email.settings().unwrap().unwrap_err();
        assert_eq!(err, ChannelConfigError::InvalidPort(String::from("smtp")));
    }

    #[test]
    fn test_email_missing_settings() {
        let config = config(&[("UPRN", "123"), ("EMAIL_ENABLED", "true")]).unwrap();
        let err = config.notify.email.settings().unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            concat!(
                "Email enabled but missing ",
                "EMAIL_SMTP_SERVER, EMAIL_SENDER, EMAIL_PASSWORD, EMAIL_RECIPIENT",
            )
        );
    }

    #[test]
    fn test_env_file() {
        let path = PathBuf::from(".env");
        assert_eq!(env_file(Ok(path.clone())).unwrap(), Some(path));
        let not_found = dotenvy::Error::Io(Error::from(ErrorKind::NotFound));
        assert_eq!(env_file(Err(not_found)).unwrap(), None);
        let unparsable = dotenvy::Error::LineParse(String::from("UPRN 123"), 5);
        assert!(matches!(
            env_file(Err(unparsable)),
            Err(dotenvy::Error::LineParse(_, 5))
        ));
        let unreadable = dotenvy::Error::Io(Error::from(ErrorKind::PermissionDenied));
        assert!(env_file(Err(unreadable)).is_err());
    }
}
