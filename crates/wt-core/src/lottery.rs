//! Engine facade.
//!
//! [`Lottery`] owns the state, the random source and the optional file path.
//! Every mutating operation runs against a snapshot: the change is applied,
//! odds are recomputed and the file is rewritten. If any step fails the
//! in-memory state is restored and the error returned.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::{ConsolationPolicy, NoWinRule, OddsFormula, PoolConfig};
use crate::consolation::ConsolationList;
use crate::draw::{self, DrawOutcome};
use crate::error::{LotteryError, LotteryResult};
use crate::history::History;
use crate::odds::{self, OddsTable};
use crate::pool::PrizeUpdate;
use crate::prize::{Prize, PrizeId, PrizeLine};
use crate::state::{LoadStatus, LotteryState};

/// Per-item outcome of a batch operation, keyed by the input item.
pub type BatchResult<T> = Vec<(String, LotteryResult<T>)>;

/// Progress towards one prize, as shown in the fragment view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentHolding {
    /// Prize identifier.
    pub id: PrizeId,
    /// Prize name.
    pub name: String,
    /// Fragments collected of the current copy.
    pub collected: u32,
    /// Fragments per copy.
    pub total: u32,
    /// Value of the collected fragments.
    pub value: f64,
}

/// The lottery engine.
#[derive(Debug)]
pub struct Lottery {
    state: LotteryState,
    path: Option<PathBuf>,
    rng: StdRng,
    load_status: LoadStatus,
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

impl Lottery {
    /// Open the state file at `path`, falling back to defaults when it is
    /// missing or unreadable. Nothing is written until the first change.
    pub fn open(path: impl Into<PathBuf>, seed: Option<u64>) -> Self {
        let path = path.into();
        let (mut state, load_status) = LotteryState::load_or_default(&path);
        odds::recompute(&mut state.pool, &state.config, state.total_won_value);
        Self {
            state,
            path: Some(path),
            rng: rng_from(seed),
            load_status,
        }
    }

    /// An engine that never touches the filesystem.
    pub fn in_memory(config: PoolConfig, seed: Option<u64>) -> Self {
        let mut state = LotteryState::with_config(config);
        odds::recompute(&mut state.pool, &state.config, state.total_won_value);
        Self {
            state,
            path: None,
            rng: rng_from(seed),
            load_status: LoadStatus::Missing,
        }
    }

    /// How the state was obtained when the engine was opened.
    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The whole state.
    pub fn state(&self) -> &LotteryState {
        &self.state
    }

    /// Write the state file now.
    pub fn save(&self) -> LotteryResult<()> {
        match &self.path {
            Some(path) => self.state.save(path),
            None => Ok(()),
        }
    }

    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut LotteryState, &mut StdRng) -> LotteryResult<T>,
    ) -> LotteryResult<T> {
        let snapshot = self.state.clone();
        let result = op(&mut self.state, &mut self.rng).and_then(|value| {
            odds::recompute(
                &mut self.state.pool,
                &self.state.config,
                self.state.total_won_value,
            );
            self.save()?;
            Ok(value)
        });
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn prize(&self, id: &PrizeId) -> LotteryResult<Prize> {
        self.state
            .pool
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| LotteryError::NotFound(format!("prize {id}")))
    }

    // --- Prizes ---

    /// Add a prize. `limit` is the number of copies, `None` for unlimited.
    pub fn add_prize(&mut self, name: &str, value: f64, limit: Option<u32>) -> LotteryResult<Prize> {
        let id = self.commit(|state, _| Ok(state.pool.add(name, value, limit)?.id().clone()))?;
        tracing::info!(prize = %id, name, value, "prize added");
        self.prize(&id)
    }

    /// Add whitespace-separated `name,value[,limit]` items. Each item is
    /// committed on its own; bad items do not stop the rest.
    pub fn add_prizes(&mut self, text: &str) -> BatchResult<Prize> {
        text.split_whitespace()
            .map(|item| {
                let result = PrizeLine::parse(item)
                    .and_then(|line| self.add_prize(&line.name, line.value, line.limit));
                (item.to_string(), result)
            })
            .collect()
    }

    /// Remove a prize by identifier.
    pub fn remove_prize(&mut self, id: &str) -> LotteryResult<Prize> {
        let removed = self.commit(|state, _| state.pool.remove(id))?;
        tracing::info!(prize = %removed.id(), name = removed.name(), "prize removed");
        Ok(removed)
    }

    /// Remove several prizes. Unknown ids are reported and skipped.
    pub fn remove_prizes<S: AsRef<str>>(&mut self, ids: &[S]) -> BatchResult<Prize> {
        ids.iter()
            .map(|id| (id.as_ref().to_string(), self.remove_prize(id.as_ref())))
            .collect()
    }

    /// Apply a partial update to a prize.
    pub fn modify_prize(&mut self, id: &str, update: &PrizeUpdate) -> LotteryResult<Prize> {
        if update.is_empty() {
            return Err(LotteryError::InvalidInput("nothing to change".to_string()));
        }
        let id = self.commit(|state, _| Ok(state.pool.modify(id, update)?.id().clone()))?;
        tracing::info!(prize = %id, "prize modified");
        self.prize(&id)
    }

    /// Prizes in pool order.
    pub fn prizes(&self) -> &[Prize] {
        self.state.pool.list()
    }

    /// Current draw distribution.
    pub fn odds(&self) -> OddsTable {
        OddsTable::from_pool(&self.state.pool)
    }

    // --- Draws ---

    /// Draw once, dated today.
    pub fn draw(&mut self) -> LotteryResult<DrawOutcome> {
        self.draw_on(Local::now().date_naive())
    }

    /// Draw once with the given date on the history entry. An empty pool
    /// records and saves nothing.
    pub fn draw_on(&mut self, today: NaiveDate) -> LotteryResult<DrawOutcome> {
        if self.state.pool.is_empty() {
            tracing::info!("draw on empty pool");
            return Ok(DrawOutcome::EmptyPool);
        }
        self.commit(|state, rng| Ok(draw::run(state, rng, today)))
    }

    // --- Consolation ---

    /// Add a consolation reward.
    pub fn add_consolation(&mut self, reward: &str) -> LotteryResult<()> {
        self.commit(|state, _| state.consolation.add(reward))
    }

    /// Add several consolation rewards, each reporting its own result.
    pub fn add_consolations<S: AsRef<str>>(&mut self, rewards: &[S]) -> BatchResult<()> {
        rewards
            .iter()
            .map(|r| (r.as_ref().to_string(), self.add_consolation(r.as_ref())))
            .collect()
    }

    /// Replace the reward at a 1-based position, returning the old text.
    pub fn edit_consolation(&mut self, position: usize, reward: &str) -> LotteryResult<String> {
        self.commit(|state, _| state.consolation.edit(position, reward))
    }

    /// Remove the reward at a 1-based position.
    pub fn remove_consolation(&mut self, position: usize) -> LotteryResult<String> {
        self.commit(|state, _| state.consolation.remove(position))
    }

    /// Consolation rewards.
    pub fn consolations(&self) -> &ConsolationList {
        &self.state.consolation
    }

    // --- Settings ---

    /// Configuration in effect.
    pub fn config(&self) -> &PoolConfig {
        &self.state.config
    }

    /// Replace the whole configuration in one step. Nothing is stored if any
    /// setting is rejected.
    pub fn update_config(&mut self, config: PoolConfig) -> LotteryResult<()> {
        config.check_settings()?;
        self.commit(|state, _| {
            state.config = config;
            Ok(())
        })?;
        if let Err(e) = self.state.config.validate() {
            tracing::warn!(error = %e, "odds disabled until the configuration is fixed");
        }
        Ok(())
    }

    /// Set the cycle budget. Non-positive budgets are accepted and zero the
    /// odds; non-finite ones are rejected.
    pub fn set_budget(&mut self, budget: f64) -> LotteryResult<()> {
        self.update_config(self.state.config.clone().with_budget(budget))
    }

    /// Set the expected draws per day. Zero is accepted and zeroes the odds.
    pub fn set_draws_per_day(&mut self, draws: u32) -> LotteryResult<()> {
        self.update_config(self.state.config.clone().with_draws_per_day(draws))
    }

    /// Switch the probability formula.
    pub fn set_formula(&mut self, formula: OddsFormula) -> LotteryResult<()> {
        self.update_config(self.state.config.clone().with_formula(formula))
    }

    /// Switch the no-win mechanism.
    pub fn set_no_win_rule(&mut self, rule: NoWinRule) -> LotteryResult<()> {
        self.update_config(self.state.config.clone().with_no_win_rule(rule))
    }

    /// Switch the consolation policy.
    pub fn set_consolation_policy(&mut self, policy: ConsolationPolicy) -> LotteryResult<()> {
        self.update_config(self.state.config.clone().with_consolation(policy))
    }

    // --- Views ---

    /// Prizes with some fragments of the current copy collected.
    pub fn fragments(&self) -> Vec<FragmentHolding> {
        self.state
            .pool
            .list()
            .iter()
            .filter(|p| p.collected_fragments() > 0)
            .map(|p| FragmentHolding {
                id: p.id().clone(),
                name: p.name().to_string(),
                collected: p.collected_fragments(),
                total: p.total_fragments(),
                value: p.fragment_value() * f64::from(p.collected_fragments()),
            })
            .collect()
    }

    /// Value of all fragments won so far.
    pub fn total_won_value(&self) -> f64 {
        self.state.total_won_value
    }

    /// Value of all vouchers credited so far.
    pub fn voucher_total(&self) -> f64 {
        self.state.voucher_total
    }

    /// Expected value of one draw, or `None` if the configuration is invalid.
    pub fn expected_draw_value(&self) -> Option<f64> {
        self.state.config.expected_draw_value().ok()
    }

    /// Draw history.
    pub fn history(&self) -> &History {
        &self.state.history
    }
}
