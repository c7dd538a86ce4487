//! The prize pool: ordered prize records plus the identifier sequence.

use serde::{Deserialize, Serialize};

use crate::error::{LotteryError, LotteryResult};
use crate::prize::{IdGenerator, Prize, PrizeId, fragments_for_value};

/// Partial update applied by [`PrizePool::modify`]. Unset fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrizeUpdate {
    /// New name.
    pub name: Option<String>,
    /// New total value.
    pub total_value: Option<f64>,
    /// New fragment count.
    pub total_fragments: Option<u32>,
    /// New limit (`Some(None)` makes the prize unlimited).
    pub limit_value: Option<Option<u32>>,
}

impl PrizeUpdate {
    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the total value.
    pub fn total_value(mut self, value: f64) -> Self {
        self.total_value = Some(value);
        self
    }

    /// Set the fragment count.
    pub fn total_fragments(mut self, fragments: u32) -> Self {
        self.total_fragments = Some(fragments);
        self
    }

    /// Set the limit.
    pub fn limit_value(mut self, limit: Option<u32>) -> Self {
        self.limit_value = Some(limit);
        self
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.total_value.is_none()
            && self.total_fragments.is_none()
            && self.limit_value.is_none()
    }
}

/// Ordered collection of prizes. Iteration order is insertion order and
/// decides how draw bands are laid out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrizePool {
    #[serde(rename = "prize_pool", default)]
    prizes: Vec<Prize>,
    #[serde(flatten)]
    ids: IdGenerator,
}

impl PrizePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prize, splitting its value into fragments by value.
    pub fn add(&mut self, name: &str, value: f64, limit: Option<u32>) -> LotteryResult<&Prize> {
        let name = name.trim();
        if self.find_by_name(name).is_some() {
            return Err(LotteryError::DuplicateName(name.to_string()));
        }
        // Validate before taking an id: a rejected add must not consume one.
        let mut prize = Prize::new(
            PrizeId::from("?"),
            name,
            value,
            fragments_for_value(value),
            limit,
        )?;
        prize.assign_id(self.fresh_id());
        self.prizes.push(prize);
        Ok(&self.prizes[self.prizes.len() - 1])
    }

    /// Remove a prize by identifier.
    pub fn remove(&mut self, id: &str) -> LotteryResult<Prize> {
        let index = self
            .position(id)
            .ok_or_else(|| LotteryError::NotFound(format!("prize {id}")))?;
        Ok(self.prizes.remove(index))
    }

    /// Apply a partial update. All checks run before the record is touched.
    pub fn modify(&mut self, id: &str, update: &PrizeUpdate) -> LotteryResult<&Prize> {
        let index = self
            .position(id)
            .ok_or_else(|| LotteryError::NotFound(format!("prize {id}")))?;

        let mut updated = self.prizes[index].clone();
        if let Some(name) = &update.name {
            let clash = self
                .prizes
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && p.name() == name.trim());
            if clash {
                return Err(LotteryError::DuplicateName(name.trim().to_string()));
            }
            updated.rename(name);
        }
        if update.total_value.is_some() || update.total_fragments.is_some() {
            let value = update.total_value.unwrap_or(updated.total_value());
            let fragments = update
                .total_fragments
                .unwrap_or(updated.total_fragments());
            updated.reshape(value, fragments);
        }
        if let Some(limit) = update.limit_value {
            updated.set_limit(limit);
        }

        self.prizes[index] = updated.validated()?;
        Ok(&self.prizes[index])
    }

    /// Look up a prize by identifier.
    pub fn get(&self, id: &str) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id().as_str() == id)
    }

    /// Look up a prize by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.name() == name)
    }

    /// Ordered snapshot of all prizes.
    pub fn list(&self) -> &[Prize] {
        &self.prizes
    }

    /// Number of prizes.
    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    /// Whether the pool has no prizes.
    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// Identifier counters.
    pub fn id_counters(&self) -> &IdGenerator {
        &self.ids
    }

    /// Check that identifiers and names are unique, as loaded files are not
    /// guaranteed to be.
    pub fn check_unique(&self) -> LotteryResult<()> {
        for (i, prize) in self.prizes.iter().enumerate() {
            for other in &self.prizes[i + 1..] {
                if other.id() == prize.id() {
                    return Err(LotteryError::CorruptState(format!(
                        "duplicate prize id {}",
                        prize.id()
                    )));
                }
                if other.name() == prize.name() {
                    return Err(LotteryError::CorruptState(format!(
                        "duplicate prize name \"{}\"",
                        prize.name()
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn prizes_mut(&mut self) -> &mut [Prize] {
        &mut self.prizes
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Prize {
        self.prizes.remove(index)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.prizes.iter().position(|p| p.id().as_str() == id)
    }

    /// Next identifier not held by any prize. Skips ids a hand-edited file
    /// may already use with stale counters.
    fn fresh_id(&mut self) -> PrizeId {
        loop {
            let id = self.ids.next_id();
            if self.get(id.as_str()).is_none() {
                return id;
            }
        }
    }
}
