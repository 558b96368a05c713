use std::path::PathBuf;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::dispatch::dispatcher::{BotMode, DispatchSettings};
use crate::filters::DEFAULT_BLUR_LEVEL;
use crate::image::codec::Quantize;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("TELEGRAM_TOKEN is not set")]
    MissingToken,
    #[error("TELEGRAM_APP_URL is not set")]
    MissingAppUrl,
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime configuration for the bot server.
///
/// Loaded from an optional JSON file, then overridden by environment
/// variables (see `apply_env`). Missing JSON fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot API token; also the secret webhook path segment.
    pub token: String,
    /// Public base URL the platform calls back (e.g. `https://bot.example.com`).
    pub app_url: String,
    /// Address the webhook server listens on.
    pub bind_addr: String,
    /// Directory downloaded and filtered photos are written to.
    pub photos_dir: PathBuf,
    pub mode: BotMode,
    pub blur_level: usize,
    pub quantize: Quantize,
    /// Request timeout for the `setWebhook` call, in seconds.
    pub webhook_timeout_secs: u64,
    /// Timeout for outgoing Bot API requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            token: String::new(),
            app_url: String::new(),
            bind_addr: "0.0.0.0:8443".to_owned(),
            photos_dir: PathBuf::from("downloads"),
            mode: BotMode::ImageProcessing,
            blur_level: DEFAULT_BLUR_LEVEL,
            quantize: Quantize::Stretch,
            webhook_timeout_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

impl BotConfig {
    /// Deserializes a config from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<BotConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Overrides fields from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overrides fields from `lookup`:
    ///
    /// - `TELEGRAM_TOKEN`, `TELEGRAM_APP_URL`
    /// - `POLYBOT_BIND`, `POLYBOT_PHOTOS_DIR`, `POLYBOT_MODE`, `POLYBOT_BLUR_LEVEL`
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TELEGRAM_TOKEN") {
            self.token = token;
        }
        if let Some(url) = lookup("TELEGRAM_APP_URL") {
            self.app_url = url;
        }
        if let Some(bind) = lookup("POLYBOT_BIND") {
            self.bind_addr = bind;
        }
        if let Some(dir) = lookup("POLYBOT_PHOTOS_DIR") {
            self.photos_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("POLYBOT_MODE") {
            self.mode = mode
                .parse()
                .map_err(|reason| ConfigError::Invalid { key: "POLYBOT_MODE", reason })?;
        }
        if let Some(level) = lookup("POLYBOT_BLUR_LEVEL") {
            self.blur_level = level.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid { key: "POLYBOT_BLUR_LEVEL", reason: e.to_string() }
            })?;
        }
        Ok(())
    }

    /// Checks the fields the server cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.app_url.trim().is_empty() {
            return Err(ConfigError::MissingAppUrl);
        }
        if self.blur_level == 0 {
            return Err(ConfigError::Invalid {
                key: "blur_level",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// `{app_url}/{token}/` — where the platform delivers updates.
    pub fn webhook_url(&self) -> String {
        format!("{}/{}/", self.app_url.trim_end_matches('/'), self.token)
    }

    /// `/{token}/` — the path the server accepts updates on.
    pub fn webhook_path(&self) -> String {
        format!("/{}/", self.token)
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            mode: self.mode,
            blur_level: self.blur_level,
            quantize: self.quantize,
        }
    }
}
