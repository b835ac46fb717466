//! Environment-driven configuration
//!
//! All settings come from the process environment (a `.env` file is loaded
//! by the binary before this runs). Required variables fail loudly at
//! startup; everything else has a sensible default.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Discord user id of the distinguished owner identity.
    pub owner_id: u64,
    /// Restrict guild chatter to one channel; DMs are always allowed.
    pub allowed_channel_id: Option<u64>,
    /// Minimum seconds between accepted conversational turns per user.
    pub cooldown_secs: u64,
    /// Distinct answers that close a quiz round.
    pub quiz_round_cap: usize,
    /// External question catalog; the embedded one is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_model: optional("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            owner_id: parse_var("OWNER_ID", require("OWNER_ID")?.as_str())?,
            allowed_channel_id: optional("ALLOWED_CHANNEL_ID")
                .map(|raw| parse_var("ALLOWED_CHANNEL_ID", &raw))
                .transpose()?,
            cooldown_secs: optional("CHAT_COOLDOWN_SECS")
                .map(|raw| parse_var("CHAT_COOLDOWN_SECS", &raw))
                .transpose()?
                .unwrap_or(5),
            quiz_round_cap: optional("QUIZ_ROUND_CAP")
                .map(|raw| parse_var("QUIZ_ROUND_CAP", &raw))
                .transpose()?
                .unwrap_or(10),
            catalog_path: optional("QUIZ_CATALOG_PATH").map(PathBuf::from),
            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| anyhow!("required environment variable {name} is not set"))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("environment variable {name} has invalid value `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var::<u64>("X", " 42 ").unwrap(), 42);
        assert_eq!(parse_var::<usize>("X", "10").unwrap(), 10usize);

        let err = parse_var::<u64>("OWNER_ID", "not-a-number").unwrap_err();
        assert!(err.to_string().contains("OWNER_ID"));
    }

    // Environment access is process-global, so everything env-related lives
    // in this one test.
    #[test]
    fn test_from_env() {
        std::env::set_var("DISCORD_TOKEN", "token");
        std::env::set_var("OPENAI_API_KEY", "key");
        std::env::set_var("OWNER_ID", "1016316997086216222");
        std::env::remove_var("OPENAI_MODEL");
        std::env::remove_var("ALLOWED_CHANNEL_ID");
        std::env::remove_var("CHAT_COOLDOWN_SECS");
        std::env::remove_var("QUIZ_ROUND_CAP");
        std::env::remove_var("QUIZ_CATALOG_PATH");
        std::env::remove_var("LOG_LEVEL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.owner_id, 1016316997086216222);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.cooldown_secs, 5);
        assert_eq!(config.quiz_round_cap, 10);
        assert_eq!(config.allowed_channel_id, None);

        std::env::set_var("ALLOWED_CHANNEL_ID", "1374589955996778577");
        std::env::set_var("QUIZ_ROUND_CAP", "3");
        let config = Config::from_env().unwrap();
        assert_eq!(config.allowed_channel_id, Some(1374589955996778577));
        assert_eq!(config.quiz_round_cap, 3);

        std::env::set_var("QUIZ_ROUND_CAP", "three");
        assert!(Config::from_env().is_err());
        std::env::remove_var("QUIZ_ROUND_CAP");

        std::env::remove_var("OWNER_ID");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("OWNER_ID"));
    }
}
