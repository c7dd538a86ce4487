//! Consolation rewards handed out on non-winning draws.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::ConsolationPolicy;
use crate::error::{LotteryError, LotteryResult};

/// What a non-winning draw produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Consolation {
    /// A reward picked from the list.
    Reward {
        /// The reward text.
        reward: String,
    },
    /// A voucher credited to the running total.
    Voucher {
        /// Amount credited by this draw.
        amount: f64,
        /// Running voucher total after crediting.
        total: f64,
    },
    /// The list is empty; nothing was handed out.
    NotConfigured,
}

impl std::fmt::Display for Consolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reward { reward } => write!(f, "consolation: {reward}"),
            Self::Voucher { amount, total } => {
                write!(f, "voucher {amount:.2} credited (total {total:.2})")
            }
            Self::NotConfigured => write!(f, "no consolation configured"),
        }
    }
}

/// Free-text consolation rewards, unique within the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolationList {
    rewards: Vec<String>,
}

impl ConsolationList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reward. Fails on empty text or a duplicate.
    pub fn add(&mut self, reward: &str) -> LotteryResult<()> {
        let reward = reward.trim();
        if reward.is_empty() {
            return Err(LotteryError::InvalidInput(
                "consolation reward must not be empty".to_string(),
            ));
        }
        if self.rewards.iter().any(|r| r == reward) {
            return Err(LotteryError::DuplicateName(reward.to_string()));
        }
        self.rewards.push(reward.to_string());
        Ok(())
    }

    /// Replace the reward at a 1-based position. Returns the old text.
    pub fn edit(&mut self, position: usize, reward: &str) -> LotteryResult<String> {
        let index = self.index_of(position)?;
        let reward = reward.trim();
        if reward.is_empty() {
            return Err(LotteryError::InvalidInput(
                "consolation reward must not be empty".to_string(),
            ));
        }
        if self
            .rewards
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r == reward)
        {
            return Err(LotteryError::DuplicateName(reward.to_string()));
        }
        Ok(std::mem::replace(
            &mut self.rewards[index],
            reward.to_string(),
        ))
    }

    /// Remove the reward at a 1-based position.
    pub fn remove(&mut self, position: usize) -> LotteryResult<String> {
        let index = self.index_of(position)?;
        Ok(self.rewards.remove(index))
    }

    /// All rewards in insertion order.
    pub fn list(&self) -> &[String] {
        &self.rewards
    }

    /// Number of rewards.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Whether no rewards are configured.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Pick a reward uniformly at random.
    pub fn pick(&self, rng: &mut StdRng) -> Option<&str> {
        if self.rewards.is_empty() {
            None
        } else {
            Some(&self.rewards[rng.random_range(0..self.rewards.len())])
        }
    }

    fn index_of(&self, position: usize) -> LotteryResult<usize> {
        if position == 0 || position > self.rewards.len() {
            return Err(LotteryError::NotFound(format!(
                "consolation reward #{position}"
            )));
        }
        Ok(position - 1)
    }
}

/// Hand out the consolation for a non-winning draw under the given policy.
/// The voucher policy adds to `voucher_total`.
pub fn console(
    policy: ConsolationPolicy,
    list: &ConsolationList,
    voucher_total: &mut f64,
    rng: &mut StdRng,
) -> Consolation {
    match policy {
        ConsolationPolicy::Reward => match list.pick(rng) {
            Some(reward) => Consolation::Reward {
                reward: reward.to_string(),
            },
            None => Consolation::NotConfigured,
        },
        ConsolationPolicy::Voucher { amount } => {
            *voucher_total += amount;
            Consolation::Voucher {
                amount,
                total: *voucher_total,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn list(items: &[&str]) -> ConsolationList {
        let mut l = ConsolationList::new();
        for item in items {
            l.add(item).unwrap();
        }
        l
    }

    #[test]
    fn add_rejects_duplicates_and_blanks() {
        let mut l = list(&["Yoga"]);
        assert!(matches!(l.add("Yoga"), Err(LotteryError::DuplicateName(_))));
        assert!(matches!(l.add("  "), Err(LotteryError::InvalidInput(_))));
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn edit_by_position() {
        let mut l = list(&["Yoga", "Walk"]);
        let old = l.edit(2, "Long walk").unwrap();
        assert_eq!(old, "Walk");
        assert_eq!(l.list(), ["Yoga", "Long walk"]);
        assert!(matches!(l.edit(3, "X"), Err(LotteryError::NotFound(_))));
        assert!(matches!(l.edit(1, "Long walk"), Err(LotteryError::DuplicateName(_))));
    }

    #[test]
    fn remove_by_position() {
        let mut l = list(&["Yoga", "Walk"]);
        assert!(matches!(l.remove(0), Err(LotteryError::NotFound(_))));
        assert_eq!(l.remove(1).unwrap(), "Yoga");
        assert_eq!(l.list(), ["Walk"]);
    }

    #[test]
    fn pick_from_list() {
        let l = list(&["Yoga", "Walk", "Tea"]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let r = l.pick(&mut rng).unwrap();
            assert!(l.list().iter().any(|x| x == r));
        }
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut total = 0.0;
        let c = console(
            ConsolationPolicy::Reward,
            &ConsolationList::new(),
            &mut total,
            &mut rng,
        );
        assert_eq!(c, Consolation::NotConfigured);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn voucher_policy_credits_total() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut total = 3.0;
        let c = console(
            ConsolationPolicy::Voucher { amount: 2.0 },
            &list(&["Yoga"]),
            &mut total,
            &mut rng,
        );
        assert_eq!(
            c,
            Consolation::Voucher {
                amount: 2.0,
                total: 5.0
            }
        );
        assert_eq!(total, 5.0);
    }
}
