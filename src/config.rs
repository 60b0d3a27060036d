use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::replies::DEFAULT_WEB_APP_URL;

/// Environment variable consulted when `telegram.bot_token` is empty
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub web_app: WebAppConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_username: String,
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebAppConfig {
    #[serde(default = "default_web_app_url")]
    pub url: String,
}

impl Default for WebAppConfig {
    fn default() -> Self {
        Self {
            url: default_web_app_url(),
        }
    }
}

fn default_web_app_url() -> String {
    DEFAULT_WEB_APP_URL.to_string()
}

impl Config {
    /// URL opened by the web app launch buttons
    pub fn web_app_url(&self) -> Result<Url> {
        Url::parse(&self.web_app.url)
            .with_context(|| format!("Invalid web_app.url: {}", self.web_app.url))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, std::env::var(TOKEN_ENV_VAR).ok())
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse TOML content; `env_token` fills in a missing `bot_token`
    pub fn parse(content: &str, env_token: Option<String>) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).context("Failed to parse config file")?;

        if config.telegram.bot_token.trim().is_empty() {
            match env_token.filter(|t| !t.trim().is_empty()) {
                Some(token) => config.telegram.bot_token = token,
                None => bail!(
                    "telegram.bot_token is not set and {} is not in the environment",
                    TOKEN_ENV_VAR
                ),
            }
        }

        if config.telegram.bot_username.trim().is_empty() {
            bail!("telegram.bot_username must not be empty");
        }

        // Accept "@name" as well as "name"
        config.telegram.bot_username = config
            .telegram
            .bot_username
            .trim()
            .trim_start_matches('@')
            .to_string();

        config.web_app_url()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_username = "demo_bot"
            bot_token = "123:abc"

            [web_app]
            url = "https://example.com/app/"
            "#,
            None,
        )
        .unwrap();

        assert_eq!(config.telegram.bot_username, "demo_bot");
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.web_app.url, "https://example.com/app/");
    }

    #[test]
    fn test_web_app_url_defaults() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_username = "demo_bot"
            bot_token = "123:abc"
            "#,
            None,
        )
        .unwrap();

        assert_eq!(config.web_app_url().unwrap().as_str(), DEFAULT_WEB_APP_URL);
    }

    #[test]
    fn test_token_from_env_when_missing() {
        let config = Config::parse(
            "[telegram]\nbot_username = \"demo_bot\"\n",
            Some("456:def".to_string()),
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token, "456:def");
    }

    #[test]
    fn test_file_token_wins_over_env() {
        let config = Config::parse(
            "[telegram]\nbot_username = \"demo_bot\"\nbot_token = \"123:abc\"\n",
            Some("456:def".to_string()),
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = Config::parse("[telegram]\nbot_username = \"demo_bot\"\n", None).unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_username_strips_at_sign() {
        let config = Config::parse(
            "[telegram]\nbot_username = \"@demo_bot\"\nbot_token = \"t\"\n",
            None,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_username, "demo_bot");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = Config::parse(
            "[telegram]\nbot_username = \"b\"\nbot_token = \"t\"\n[web_app]\nurl = \"not a url\"\n",
            None,
        );
        assert!(result.is_err());
    }
}
