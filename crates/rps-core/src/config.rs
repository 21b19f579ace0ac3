//! Agent configuration.
//!
//! The judge identity players share their moves with is resolved once at
//! startup, in this order:
//! 1. an explicitly passed identity
//! 2. `judge_client_id` from a JSON config file
//!    (`judge-client-id.json` in the working directory unless a path is given)
//! 3. otherwise an error

use rps_store::ClientId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_JUDGE_CONFIG_PATH: &str = "judge-client-id.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No judge client ID: pass one explicitly or set judge_client_id in {path}")]
    MissingJudgeId { path: PathBuf },
}

/// Contents of the judge config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeConfig {
    pub judge_client_id: ClientId,
}

impl JudgeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve the judge identity: explicit argument > config file > error.
///
/// A missing default config file is just "not configured"; a config path that
/// was named explicitly must exist and parse.
pub fn resolve_judge_id(
    explicit: Option<ClientId>,
    config_path: Option<&Path>,
) -> Result<ClientId, ConfigError> {
    if let Some(id) = explicit.filter(|id| !id.is_empty()) {
        tracing::debug!(judge = %id, "using explicit judge client ID");
        return Ok(id);
    }

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_JUDGE_CONFIG_PATH));
    if config_path.is_none() && !path.exists() {
        return Err(ConfigError::MissingJudgeId {
            path: path.to_path_buf(),
        });
    }

    let config = JudgeConfig::load(path)?;
    if config.judge_client_id.is_empty() {
        return Err(ConfigError::MissingJudgeId {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(judge = %config.judge_client_id, path = %path.display(), "using configured judge client ID");
    Ok(config.judge_client_id)
}
