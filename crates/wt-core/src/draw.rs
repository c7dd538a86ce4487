//! Draw executor.
//!
//! Prize bands are laid end to end in pool order: prize `i` covers
//! `[S(i-1), S(i))` where `S` is the running sum of probabilities, and the
//! no-win band covers `[sum, 1)`. A single uniform value picks the band.

use chrono::NaiveDate;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::{NoWinRule, OddsFormula};
use crate::consolation::{Consolation, console};
use crate::history::HistoryEntry;
use crate::odds::{self, WIN_COOLDOWN};
use crate::prize::{CopyStatus, PrizeId};
use crate::state::LotteryState;

/// A fragment won in a draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Win {
    /// Prize identifier.
    pub prize_id: PrizeId,
    /// Prize name.
    pub prize_name: String,
    /// Value of the fragment.
    pub fragment_value: f64,
    /// Fragments of the copy collected, including this one.
    pub collected: u32,
    /// Fragments per copy.
    pub total_fragments: u32,
    /// Set when this fragment completed a copy.
    pub completed: Option<Completion>,
}

/// What happened when a draw completed a copy of a prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// More copies remain; fragments were reset.
    Restocked,
    /// That was the last copy; the prize left the pool.
    Retired,
}

/// Result of one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DrawOutcome {
    /// The pool has no prizes; nothing happened.
    EmptyPool,
    /// A prize fragment was won.
    Win(Win),
    /// No prize this time.
    NoWin(Consolation),
}

impl std::fmt::Display for DrawOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPool => write!(f, "The prize pool is empty."),
            Self::Win(win) => {
                write!(
                    f,
                    "You won a fragment of {}! {}/{} collected.",
                    win.prize_name, win.collected, win.total_fragments
                )?;
                match win.completed {
                    Some(Completion::Restocked) => write!(f, " Copy complete; restocked."),
                    Some(Completion::Retired) => write!(f, " Copy complete; prize retired."),
                    None => Ok(()),
                }
            }
            Self::NoWin(consolation) => write!(f, "No win, {consolation}."),
        }
    }
}

/// Index of the band containing `u`, or `None` if `u` lies past every prize.
/// Zero-width bands are never selected.
pub fn pick_band(weights: &[f64], u: f64) -> Option<usize> {
    let mut upper = 0.0;
    for (i, w) in weights.iter().enumerate() {
        upper += w;
        if *w > 0.0 && u < upper {
            return Some(i);
        }
    }
    None
}

/// Sample a band with the configured no-win rule.
fn sample(weights: &[f64], rule: NoWinRule, rng: &mut StdRng) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    match rule {
        NoWinRule::Complement => {
            let u = rng.random::<f64>() * total.max(1.0);
            pick_band(weights, u)
        }
        NoWinRule::Gate { threshold } => {
            if rng.random::<f64>() < threshold || total <= 0.0 {
                return None;
            }
            pick_band(weights, rng.random::<f64>() * total)
        }
    }
}

/// Perform one draw against the state, appending to its history.
///
/// Does not persist. An empty pool returns [`DrawOutcome::EmptyPool`] and
/// leaves the state untouched.
pub fn run(state: &mut LotteryState, rng: &mut StdRng, today: NaiveDate) -> DrawOutcome {
    if state.pool.is_empty() {
        return DrawOutcome::EmptyPool;
    }

    if state.config.odds_formula == OddsFormula::LogDamped {
        odds::decay_cooldowns(&mut state.pool);
    }
    let table = odds::recompute(&mut state.pool, &state.config, state.total_won_value);
    let band = sample(&table.weights(), state.config.no_win_rule, rng);

    let outcome = match band.and_then(|i| claim_fragment(state, i)) {
        Some(win) => {
            state.history.append(HistoryEntry::Win {
                prize: win.prize_name.clone(),
                prize_id: Some(win.prize_id.clone()),
                fragment_won: win.collected,
                total_fragments: win.total_fragments,
                value: win.fragment_value,
                date: today,
            });
            DrawOutcome::Win(win)
        }
        None => {
            let consolation = console(
                state.config.consolation_policy,
                &state.consolation,
                &mut state.voucher_total,
                rng,
            );
            state.history.append(match &consolation {
                Consolation::Reward { reward } => HistoryEntry::Consolation {
                    consolation_reward: reward.clone(),
                    date: today,
                },
                Consolation::Voucher { amount, .. } => HistoryEntry::Voucher {
                    amount: *amount,
                    date: today,
                },
                Consolation::NotConfigured => HistoryEntry::NoConsolation { date: today },
            });
            DrawOutcome::NoWin(consolation)
        }
    };

    odds::recompute(&mut state.pool, &state.config, state.total_won_value);
    outcome
}

/// Take a fragment from the prize at `index`, retiring or restocking it when
/// the copy completes. `None` if the prize had no fragments left.
fn claim_fragment(state: &mut LotteryState, index: usize) -> Option<Win> {
    let log_damped = state.config.odds_formula == OddsFormula::LogDamped;
    let prize = &mut state.pool.prizes_mut()[index];
    if !prize.take_fragment() {
        return None;
    }
    if log_damped {
        prize.set_cooldown(WIN_COOLDOWN);
    }

    let collected = prize.collected_fragments();
    let mut win = Win {
        prize_id: prize.id().clone(),
        prize_name: prize.name().to_string(),
        fragment_value: prize.fragment_value(),
        collected,
        total_fragments: prize.total_fragments(),
        completed: None,
    };

    if prize.remaining_fragments() == 0 {
        win.completed = Some(match prize.finish_copy() {
            CopyStatus::Restocked => Completion::Restocked,
            CopyStatus::Retired => {
                state.pool.remove_at(index);
                Completion::Retired
            }
        });
    }
    state.total_won_value += win.fragment_value;

    tracing::info!(
        prize = %win.prize_id,
        collected = win.collected,
        total = win.total_fragments,
        completed = ?win.completed,
        "fragment won"
    );
    Some(win)
}
