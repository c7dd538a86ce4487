//! Probability model.
//!
//! Turns the pool and its configuration into one probability per prize and
//! an implicit no-win probability `max(0, 1 - sum)`. The probabilities stored
//! on each [`Prize`] are a cache; [`recompute`] rebuilds them from pool state
//! and configuration alone.

use serde::Serialize;

use crate::config::{OddsFormula, PoolConfig};
use crate::pool::PrizePool;
use crate::prize::{Prize, PrizeId};

/// Upper bound on a single prize's probability under [`OddsFormula::LogDamped`].
pub const PROBABILITY_CAP: f64 = 0.3;
/// Cooldown applied to a prize right after one of its fragments is won.
pub const WIN_COOLDOWN: f64 = 0.2;
/// Cooldown removed from every prize on each draw.
pub const COOLDOWN_STEP: f64 = 0.01;
/// Share of the budget already won that triggers the spend brake.
pub const SPEND_BRAKE_RATIO: f64 = 0.8;
/// Prizes worth more than this many expected draws are slowed by the brake.
pub const HIGH_VALUE_MULTIPLE: f64 = 5.0;

/// Probability of one prize in an [`OddsTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeOdds {
    /// Prize identifier.
    pub id: PrizeId,
    /// Prize name.
    pub name: String,
    /// Chance of landing on this prize in one draw.
    pub probability: f64,
}

/// Snapshot of the draw distribution, in pool order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsTable {
    /// Per-prize probabilities.
    pub prizes: Vec<PrizeOdds>,
    /// Chance of a no-win draw, in `[0, 1]`.
    pub no_win: f64,
}

impl OddsTable {
    /// Read the cached probabilities off the pool without recomputing.
    pub fn from_pool(pool: &PrizePool) -> Self {
        let prizes: Vec<PrizeOdds> = pool
            .list()
            .iter()
            .map(|p| PrizeOdds {
                id: p.id().clone(),
                name: p.name().to_string(),
                probability: p.probability(),
            })
            .collect();
        let no_win = no_win_probability(prizes.iter().map(|p| p.probability).sum());
        Self { prizes, no_win }
    }

    /// Sum of all prize probabilities (may exceed 1).
    pub fn total(&self) -> f64 {
        self.prizes.iter().map(|p| p.probability).sum()
    }

    /// Probabilities in pool order.
    pub fn weights(&self) -> Vec<f64> {
        self.prizes.iter().map(|p| p.probability).collect()
    }
}

/// `max(0, 1 - total)`, clamped into `[0, 1]`.
pub fn no_win_probability(total: f64) -> f64 {
    (1.0 - total).clamp(0.0, 1.0)
}

/// Recompute and cache every prize's probability.
///
/// An invalid configuration (non-positive budget, zero draws per day) yields
/// zero for every prize and a no-win probability of 1.
pub fn recompute(pool: &mut PrizePool, config: &PoolConfig, total_won_value: f64) -> OddsTable {
    let expected = match config.expected_draw_value() {
        Ok(ev) => ev,
        Err(e) => {
            tracing::debug!(error = %e, "odds degraded to zero");
            for prize in pool.prizes_mut() {
                prize.set_probability(0.0);
            }
            return OddsTable::from_pool(pool);
        }
    };

    let brake = config.odds_formula == OddsFormula::LogDamped
        && total_won_value > config.total_pool_value * SPEND_BRAKE_RATIO;

    for prize in pool.prizes_mut() {
        let mut p = base_probability(prize, config, expected);
        if brake && prize.total_value() > expected * HIGH_VALUE_MULTIPLE {
            p *= 0.5;
        }
        prize.set_probability(p);
    }

    let table = OddsTable::from_pool(pool);
    tracing::debug!(
        formula = %config.odds_formula,
        prizes = table.prizes.len(),
        no_win = table.no_win,
        "odds recomputed"
    );
    table
}

/// Probability of a single prize before the spend brake.
pub fn base_probability(prize: &Prize, config: &PoolConfig, expected_draw_value: f64) -> f64 {
    if prize.remaining_fragments() == 0 {
        return 0.0;
    }
    let p = match config.odds_formula {
        OddsFormula::Inverse => expected_draw_value / prize.total_value(),
        OddsFormula::ValueShare => prize.remaining_value() / config.total_pool_value,
        OddsFormula::LogDamped => {
            let damped = (expected_draw_value / prize.remaining_value() + 1.0).ln();
            (damped * (1.0 - prize.cooldown())).min(PROBABILITY_CAP)
        }
    };
    if p.is_finite() { p.max(0.0) } else { 0.0 }
}

/// Step every cooldown toward zero. Called once per draw.
pub fn decay_cooldowns(pool: &mut PrizePool) {
    for prize in pool.prizes_mut() {
        if prize.cooldown() > 0.0 {
            prize.set_cooldown((prize.cooldown() - COOLDOWN_STEP).max(0.0));
        }
    }
}
