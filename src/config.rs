use std::path::PathBuf;
use std::str::FromStr;

use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

use crate::scoring::{Ruleset, RulesetPreset};
use crate::storage::GitHubStoreConfig;

pub const DEFAULT_PLAYERS: [&str; 4] = ["Amber", "Mandeep", "Rav", "Simer"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Failed to load ruleset from {path}: {reason}")]
    RulesetFile { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Memory,
    File,
    GitHub,
    Postgres,
}

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub players: Vec<String>,
    pub ruleset: Ruleset,
    pub backend: StoreBackend,
    pub file_path: PathBuf,
    pub github: GitHubStoreConfig,
    pub database_url: Option<String>,
    /// Partitions rows in the hosted table; a fresh id starts a new season.
    pub session_id: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let players = match get("SEASON_PLAYERS") {
            Some(raw) => parse_players(&raw)?,
            None => DEFAULT_PLAYERS.iter().map(|p| p.to_string()).collect(),
        };

        let ruleset = match get("SEASON_RULESET_FILE") {
            Some(path) => load_ruleset_file(&path)?,
            None => {
                let name = get("SEASON_RULESET")
                    .unwrap_or_else(|| RulesetPreset::Championship2025.to_string());
                RulesetPreset::from_str(name.trim())
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "SEASON_RULESET",
                        value: name.clone(),
                    })?
                    .ruleset()
            }
        };

        let backend = match get("STORE_BACKEND") {
            Some(raw) => StoreBackend::from_str(raw.trim()).map_err(|_| {
                ConfigError::InvalidValue {
                    key: "STORE_BACKEND",
                    value: raw.clone(),
                }
            })?,
            None => StoreBackend::File,
        };

        let github_defaults = GitHubStoreConfig::default();

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            players,
            ruleset,
            backend,
            file_path: get("STORE_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/games.json")),
            github: GitHubStoreConfig {
                token: get("GITHUB_TOKEN"),
                repo: get("GITHUB_REPO"),
                path: get("GITHUB_PATH").unwrap_or(github_defaults.path),
                branch: get("GITHUB_BRANCH").unwrap_or(github_defaults.branch),
            },
            database_url: get("DATABASE_URL"),
            session_id: get("SESSION_ID").unwrap_or_else(|| Uuid::new_v4().to_string()),
        })
    }
}

fn parse_players(raw: &str) -> Result<Vec<String>, ConfigError> {
    let players: Vec<String> = raw
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let mut unique = players.clone();
    unique.sort();
    unique.dedup();
    if players.is_empty() || unique.len() != players.len() {
        return Err(ConfigError::InvalidValue {
            key: "SEASON_PLAYERS",
            value: raw.to_string(),
        });
    }
    Ok(players)
}

fn load_ruleset_file(path: &str) -> Result<Ruleset, ConfigError> {
    let to_error = |reason: String| ConfigError::RulesetFile {
        path: path.to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| to_error(e.to_string()))
}
