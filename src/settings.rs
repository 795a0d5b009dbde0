use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::mode::ScrapeMode;

const DEFAULT_BASE_URL: &str = "https://www.placement.iitbhu.ac.in";
const DEFAULT_LISTING_PATH: &str = "/forum/c/notice-board/2025-26/";
const DEFAULT_MAX_PAGES: u32 = 9;
const DEFAULT_BIND: &str = "0.0.0.0:5000";

const CONFIG_FILE: &str = "placement_tally";
const ENV_PREFIX: &str = "TALLY";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Forum origin; thread hrefs are appended to it.
    pub base_url: String,
    pub listing_path: String,
    /// Listing pages 1..=max_pages are scanned on every run.
    pub max_pages: u32,
    pub bind: String,
    pub internship_session_id: Option<String>,
    pub ppo_session_id: Option<String>,
}

impl Settings {
    /// Defaults, then `placement_tally.toml`, then `TALLY_*` env vars,
    /// then the unprefixed legacy variables.
    pub fn load() -> Result<Self> {
        let settings: Settings = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        Ok(settings.with_legacy_env(|key| std::env::var(key).ok()))
    }

    /// Fill gaps from `INTERNSHIP_SESSION_ID`, `PPO_SESSION_ID` and `PORT`.
    fn with_legacy_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.internship_session_id.is_none() {
            self.internship_session_id = lookup("INTERNSHIP_SESSION_ID");
        }
        if self.ppo_session_id.is_none() {
            self.ppo_session_id = lookup("PPO_SESSION_ID");
        }
        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            let host = self
                .bind
                .rsplit_once(':')
                .map(|(host, _)| host)
                .unwrap_or(self.bind.as_str());
            self.bind = format!("{}:{}", host, port.trim());
        }
        self
    }

    pub fn listing_url(&self, page: u32) -> String {
        format!(
            "{}{}?page={}",
            self.base_url.trim_end_matches('/'),
            self.listing_path,
            page
        )
    }

    pub fn session_for(&self, mode: ScrapeMode) -> Option<&str> {
        let id = match mode {
            ScrapeMode::Offers => self.internship_session_id.as_deref(),
            ScrapeMode::Ppos => self.ppo_session_id.as_deref(),
        };
        id.filter(|s| !s.is_empty())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("listing_path", DEFAULT_LISTING_PATH)?
        .set_default("max_pages", DEFAULT_MAX_PAGES)?
        .set_default("bind", DEFAULT_BIND)
}

// ── Tests ──
