use anyhow::{anyhow, Result};
use std::env;

const DEFAULT_DRAFT_STORE_URL: &str = "sqlite:./data/drafts.db";
const DEFAULT_SWEEP_SCHEDULE: &str = "0 * * * * *";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub api_url: String,
    pub draft_store_url: String,
    pub http_port: u16,
    pub sweep_schedule: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let api_url = env::var("API_URL")
            .map_err(|_| anyhow!("API_URL must be set"))?;
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(anyhow!("API_URL must be an http(s) URL"));
        }

        let draft_store_url = Self::draft_store_url_from_env();

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let sweep_schedule = env::var("SWEEP_SCHEDULE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SWEEP_SCHEDULE.to_string());

        Ok(Config {
            telegram_bot_token: token,
            api_url,
            draft_store_url,
            http_port,
            sweep_schedule,
        })
    }

    /// `DRAFT_STORE_URL` alone, for tools that never talk to the platform.
    pub fn draft_store_url_from_env() -> String {
        env::var("DRAFT_STORE_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_DRAFT_STORE_URL.to_string())
    }

    /// The draft store lives in process memory instead of SQLite.
    pub fn uses_memory_drafts(&self) -> bool {
        self.draft_store_url.starts_with("memory:")
    }
}
