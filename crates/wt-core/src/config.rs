//! Pool configuration: budget, draw rate, and the per-deployment policies.

use serde::{Deserialize, Serialize};

use crate::error::{LotteryError, LotteryResult};

/// Budget used when no state file exists yet.
pub const DEFAULT_BUDGET: f64 = 3000.0;
/// Draws per day used when no state file exists yet.
pub const DEFAULT_DRAWS_PER_DAY: u32 = 8;
/// Length of one budget cycle in days.
pub const DAYS_PER_CYCLE: f64 = 30.0;
/// Threshold of the fixed no-win pre-check.
pub const DEFAULT_GATE_THRESHOLD: f64 = 0.618;

/// How per-prize probabilities are derived from value and budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsFormula {
    /// `expected_draw_value / total_value`.
    #[default]
    Inverse,
    /// `(fragment_value * remaining_fragments) / total_pool_value`.
    ValueShare,
    /// `ln(expected_draw_value / remaining_value + 1)`, damped by cooldown and capped.
    LogDamped,
}

impl OddsFormula {
    /// Parse a formula name as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").trim() {
            "inverse" | "linear" => Some(Self::Inverse),
            "valueshare" | "share" => Some(Self::ValueShare),
            "logdamped" | "log" | "damped" => Some(Self::LogDamped),
            _ => None,
        }
    }
}

impl std::fmt::Display for OddsFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverse => write!(f, "inverse"),
            Self::ValueShare => write!(f, "value-share"),
            Self::LogDamped => write!(f, "log-damped"),
        }
    }
}

/// How the no-win branch of a draw is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoWinRule {
    /// The no-win band is whatever probability mass the prizes leave over.
    #[default]
    Complement,
    /// A separate uniform roll below `threshold` is a no-win before any prize is considered.
    Gate {
        /// Chance in `[0, 1]` that a draw skips the prize bands entirely.
        threshold: f64,
    },
}

impl NoWinRule {
    /// A pre-check gate. Fails with `InvalidInput` unless `threshold` lies in `[0, 1]`.
    pub fn gate(threshold: f64) -> LotteryResult<Self> {
        let rule = Self::Gate { threshold };
        rule.check()?;
        Ok(rule)
    }

    /// Reject a gate threshold outside `[0, 1]`.
    pub fn check(&self) -> LotteryResult<()> {
        match self {
            Self::Gate { threshold } if !(0.0..=1.0).contains(threshold) => {
                Err(LotteryError::InvalidInput(format!(
                    "gate threshold must lie in [0, 1], got {threshold}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for NoWinRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complement => write!(f, "complement"),
            Self::Gate { threshold } => write!(f, "gate {threshold}"),
        }
    }
}

/// What a non-winning draw hands out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsolationPolicy {
    /// Pick a free-text reward from the consolation list.
    #[default]
    Reward,
    /// Credit a fixed voucher amount to a running total.
    Voucher {
        /// Amount credited per non-winning draw.
        amount: f64,
    },
}

impl std::fmt::Display for ConsolationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reward => write!(f, "reward"),
            Self::Voucher { amount } => write!(f, "voucher {amount}"),
        }
    }
}

impl ConsolationPolicy {
    /// Reject a negative or non-finite voucher amount.
    pub fn check(&self) -> LotteryResult<()> {
        match self {
            Self::Voucher { amount } if !amount.is_finite() || *amount < 0.0 => {
                Err(LotteryError::InvalidInput(format!(
                    "voucher amount must be a non-negative number, got {amount}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Budget and policy settings for one prize pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Money budgeted for rewards over one cycle.
    #[serde(default = "default_budget")]
    pub total_pool_value: f64,
    /// Expected number of draws per day.
    #[serde(default = "default_draws_per_day")]
    pub draws_per_day: u32,
    /// Probability formula.
    #[serde(default)]
    pub odds_formula: OddsFormula,
    /// No-win mechanism.
    #[serde(default)]
    pub no_win_rule: NoWinRule,
    /// Consolation policy.
    #[serde(default)]
    pub consolation_policy: ConsolationPolicy,
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET
}

fn default_draws_per_day() -> u32 {
    DEFAULT_DRAWS_PER_DAY
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            total_pool_value: DEFAULT_BUDGET,
            draws_per_day: DEFAULT_DRAWS_PER_DAY,
            odds_formula: OddsFormula::default(),
            no_win_rule: NoWinRule::default(),
            consolation_policy: ConsolationPolicy::default(),
        }
    }
}

impl PoolConfig {
    /// Set the cycle budget.
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.total_pool_value = budget;
        self
    }

    /// Set the expected draws per day.
    pub fn with_draws_per_day(mut self, draws: u32) -> Self {
        self.draws_per_day = draws;
        self
    }

    /// Set the probability formula.
    pub fn with_formula(mut self, formula: OddsFormula) -> Self {
        self.odds_formula = formula;
        self
    }

    /// Set the no-win mechanism.
    pub fn with_no_win_rule(mut self, rule: NoWinRule) -> Self {
        self.no_win_rule = rule;
        self
    }

    /// Set the consolation policy.
    pub fn with_consolation(mut self, policy: ConsolationPolicy) -> Self {
        self.consolation_policy = policy;
        self
    }

    /// Check that the configuration can produce odds.
    pub fn validate(&self) -> LotteryResult<()> {
        if !self.total_pool_value.is_finite() || self.total_pool_value <= 0.0 {
            return Err(LotteryError::ConfigurationInvalid(format!(
                "budget must be positive, got {}",
                self.total_pool_value
            )));
        }
        if self.draws_per_day == 0 {
            return Err(LotteryError::ConfigurationInvalid(
                "draws per day must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that every setting is storable. Unlike [`validate`](Self::validate),
    /// a non-positive budget or zero draws pass here: they are kept and only
    /// switch the odds off.
    pub fn check_settings(&self) -> LotteryResult<()> {
        if !self.total_pool_value.is_finite() {
            return Err(LotteryError::InvalidInput(format!(
                "budget must be a finite number, got {}",
                self.total_pool_value
            )));
        }
        self.no_win_rule.check()?;
        self.consolation_policy.check()
    }

    /// Value one draw is expected to pay out: `budget / (30 * draws_per_day)`.
    pub fn expected_draw_value(&self) -> LotteryResult<f64> {
        self.validate()?;
        Ok(self.total_pool_value / (DAYS_PER_CYCLE * f64::from(self.draws_per_day)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.total_pool_value, 3000.0);
        assert_eq!(cfg.draws_per_day, 8);
        assert_eq!(cfg.odds_formula, OddsFormula::Inverse);
        assert_eq!(cfg.no_win_rule, NoWinRule::Complement);
        assert_eq!(cfg.consolation_policy, ConsolationPolicy::Reward);
    }

    #[test]
    fn expected_value_for_default_budget() {
        let ev = PoolConfig::default().expected_draw_value().unwrap();
        assert!((ev - 12.5).abs() < 1e-12);
    }

    #[test]
    fn non_positive_budget_is_invalid() {
        let cfg = PoolConfig::default().with_budget(0.0);
        assert!(matches!(
            cfg.expected_draw_value(),
            Err(LotteryError::ConfigurationInvalid(_))
        ));
        let cfg = PoolConfig::default().with_budget(-10.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_draws_is_invalid() {
        let cfg = PoolConfig::default().with_draws_per_day(0);
        assert!(matches!(
            cfg.validate(),
            Err(LotteryError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn gate_threshold_out_of_range_rejected() {
        assert_eq!(
            NoWinRule::gate(0.618).unwrap(),
            NoWinRule::Gate { threshold: 0.618 }
        );
        assert!(NoWinRule::gate(1.0).is_ok());
        for bad in [1.5, -0.2, f64::NAN] {
            assert!(matches!(
                NoWinRule::gate(bad),
                Err(LotteryError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn settings_check() {
        assert!(PoolConfig::default().check_settings().is_ok());
        assert!(PoolConfig::default().with_budget(-5.0).check_settings().is_ok());
        assert!(PoolConfig::default().with_draws_per_day(0).check_settings().is_ok());
        assert!(
            PoolConfig::default()
                .with_budget(f64::INFINITY)
                .check_settings()
                .is_err()
        );
        assert!(
            PoolConfig::default()
                .with_no_win_rule(NoWinRule::Gate { threshold: 2.0 })
                .check_settings()
                .is_err()
        );
        assert!(
            PoolConfig::default()
                .with_consolation(ConsolationPolicy::Voucher { amount: f64::NAN })
                .check_settings()
                .is_err()
        );
    }

    #[test]
    fn formula_parse() {
        assert_eq!(OddsFormula::parse("inverse"), Some(OddsFormula::Inverse));
        assert_eq!(
            OddsFormula::parse("value-share"),
            Some(OddsFormula::ValueShare)
        );
        assert_eq!(OddsFormula::parse("Log_Damped"), Some(OddsFormula::LogDamped));
        assert_eq!(OddsFormula::parse("quadratic"), None);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let cfg: PoolConfig = serde_json::from_str(r#"{"total_pool_value": 600}"#).unwrap();
        assert_eq!(cfg.total_pool_value, 600.0);
        assert_eq!(cfg.draws_per_day, 8);
        assert_eq!(cfg.odds_formula, OddsFormula::Inverse);
    }

    #[test]
    fn tagged_policies_serialize() {
        let cfg = PoolConfig::default()
            .with_no_win_rule(NoWinRule::gate(0.618).unwrap())
            .with_consolation(ConsolationPolicy::Voucher { amount: 2.0 });
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains(r#""kind":"gate""#));
        assert!(json.contains(r#""kind":"voucher""#));
        let back: PoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
