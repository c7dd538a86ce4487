//! The persisted lottery state and its JSON file format.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PoolConfig;
use crate::consolation::ConsolationList;
use crate::error::{LotteryError, LotteryResult};
use crate::history::History;
use crate::pool::PrizePool;

/// Default state file name.
pub const DEFAULT_STATE_FILE: &str = "game_state.json";

/// Everything the lottery owns: pool, counters, configuration, history and
/// consolation list. Serialized as one flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotteryState {
    /// Prizes and identifier counters.
    #[serde(flatten)]
    pub pool: PrizePool,
    /// Value of all fragments won so far.
    #[serde(default)]
    pub total_won_value: f64,
    /// Value of all vouchers credited so far.
    #[serde(default)]
    pub voucher_total: f64,
    /// Budget and policies.
    #[serde(flatten)]
    pub config: PoolConfig,
    /// Draw outcomes, oldest first.
    #[serde(rename = "draw_history", default)]
    pub history: History,
    /// Consolation rewards.
    #[serde(rename = "consolation_rewards", default)]
    pub consolation: ConsolationList,
}

/// How [`LotteryState::load_or_default`] obtained its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was read successfully.
    Loaded,
    /// No file existed; defaults were used.
    Missing,
    /// The file was unreadable; defaults were used. Holds the reason.
    Recovered(String),
}

impl LotteryState {
    /// Fresh state with the given configuration.
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse state from JSON, checking pool invariants.
    pub fn from_json(json: &str) -> LotteryResult<Self> {
        let state: Self =
            serde_json::from_str(json).map_err(|e| LotteryError::CorruptState(e.to_string()))?;
        state.pool.check_unique()?;
        if !state.total_won_value.is_finite() || !state.voucher_total.is_finite() {
            return Err(LotteryError::CorruptState(
                "running totals must be finite".to_string(),
            ));
        }
        Ok(state)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> LotteryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read state from a file. Fails with `CorruptState` if it does not parse.
    pub fn load(path: &Path) -> LotteryResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read state from a file, falling back to defaults when the file is
    /// missing or corrupt.
    pub fn load_or_default(path: &Path) -> (Self, LoadStatus) {
        match Self::load(path) {
            Ok(state) => (state, LoadStatus::Loaded),
            Err(LotteryError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no state file, starting fresh");
                (Self::default(), LoadStatus::Missing)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "state file unreadable, reinitializing"
                );
                (Self::default(), LoadStatus::Recovered(e.to_string()))
            }
        }
    }

    /// Rewrite the whole file. The new contents go to a sibling temporary file
    /// that is renamed over the target.
    pub fn save(&self, path: &Path) -> LotteryResult<()> {
        let json = self.to_json()?;
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
