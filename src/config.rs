// Runtime configuration, read from the environment (and `.env` via dotenv in main).
//
// Parsing goes through a lookup closure so it can be exercised without
// touching the process environment.

use crate::core::access::{AccessPolicy, DenialPolicy};
use crate::core::presence::PresenceState;
use crate::infra::status::DEFAULT_STATUS_WEBHOOK_URL;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_OWNER_ID: u64 = 1158155824548556873;
pub const DEFAULT_OWNERSHIP_ROLE_ID: u64 = 1442689932316381267;
pub const DEFAULT_MOD_ROLE_ID: u64 = 1442689963240984599;
pub const DEFAULT_LINK_URL: &str = "https://txrp-utilities.lovable.app/";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot token.")]
    Missing(&'static str),

    #[error("Invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// `None` disables the status webhook entirely.
    pub webhook_secret: Option<String>,
    pub webhook_url: String,
    pub access: AccessPolicy,
    pub data_dir: PathBuf,
    pub link_url: String,
    pub presence: PresenceState,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("TOKEN")
            .or_else(|| get("DISCORD_TOKEN"))
            .ok_or(ConfigError::Missing("TOKEN"))?;

        let defaults = PresenceState::default();
        let presence = PresenceState {
            activity_text: get("STATUS_TEXT").unwrap_or(defaults.activity_text),
            stream_url: get("STREAM_URL").unwrap_or(defaults.stream_url),
            status_mode: parse_or("STATUS_MODE", get("STATUS_MODE"), defaults.status_mode)?,
        };

        let access = AccessPolicy {
            owner_id: parse_or("OWNER_ID", get("OWNER_ID"), DEFAULT_OWNER_ID)?,
            ownership_role_id: parse_or(
                "OWNERSHIP_ROLE_ID",
                get("OWNERSHIP_ROLE_ID"),
                DEFAULT_OWNERSHIP_ROLE_ID,
            )?,
            mod_role_id: parse_or("MOD_ROLE_ID", get("MOD_ROLE_ID"), DEFAULT_MOD_ROLE_ID)?,
            denial: parse_or("DENIAL_POLICY", get("DENIAL_POLICY"), DenialPolicy::Reply)?,
        };

        Ok(Self {
            token,
            webhook_secret: get("WEBHOOK_SECRET"),
            webhook_url: get("WEBHOOK_URL").unwrap_or_else(|| DEFAULT_STATUS_WEBHOOK_URL.into()),
            access,
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            link_url: get("LINK_URL").unwrap_or_else(|| DEFAULT_LINK_URL.into()),
            presence,
        })
    }

    pub fn ledger_db_path(&self) -> PathBuf {
        self.data_dir.join("levels.db")
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
