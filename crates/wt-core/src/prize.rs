//! Prize records, identifiers, and the batch input syntax.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LotteryError, LotteryResult};

/// Numbers handed out per identifier letter before rolling to the next one.
pub const IDS_PER_LETTER: u32 = 99;

/// Stable identifier of a prize, e.g. `A1`, `B17`, `AA3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeId(String);

impl PrizeId {
    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrizeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PrizeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Letter-plus-number identifier sequence. Counters only move forward, so an
/// identifier is never handed out twice even after its prize is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    /// Number part of the next identifier (1-based).
    #[serde(default = "first_number")]
    pub prize_id_counter: u32,
    /// Index of the letter part of the next identifier (0 = `A`).
    #[serde(default)]
    pub letter_counter: u32,
}

fn first_number() -> u32 {
    1
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            prize_id_counter: 1,
            letter_counter: 0,
        }
    }
}

impl IdGenerator {
    /// Produce the next identifier and advance the counters.
    pub fn next_id(&mut self) -> PrizeId {
        let number = self.prize_id_counter.clamp(1, IDS_PER_LETTER);
        let id = PrizeId(format!("{}{number}", letter_prefix(self.letter_counter)));
        if number >= IDS_PER_LETTER {
            self.prize_id_counter = 1;
            self.letter_counter += 1;
        } else {
            self.prize_id_counter = number + 1;
        }
        id
    }
}

/// Bijective base-26 letters: 0 → `A`, 25 → `Z`, 26 → `AA`, 27 → `AB`.
fn letter_prefix(mut index: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Number of fragments a prize of the given value is split into.
pub fn fragments_for_value(total_value: f64) -> u32 {
    if total_value <= 100.0 {
        1
    } else if total_value <= 500.0 {
        2
    } else if total_value <= 2000.0 {
        4
    } else {
        8
    }
}

/// A prize in the pool. Its value is split into equal fragments that are won
/// one draw at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PrizeRecord")]
pub struct Prize {
    id: PrizeId,
    name: String,
    total_value: f64,
    fragment_value: f64,
    total_fragments: u32,
    remaining_fragments: u32,
    limit_value: Option<u32>,
    probability: f64,
    cooldown: f64,
}

/// What happened to a prize after its last fragment was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// Another copy remains; fragments were reset to full.
    Restocked,
    /// No copies remain; the prize should leave the pool.
    Retired,
}

impl Prize {
    /// Create a prize with full fragments.
    ///
    /// `limit` is the number of copies (`None` for unlimited). Fails with
    /// `InvalidInput` for an empty name, a non-positive value, zero fragments,
    /// or a limit of zero.
    pub fn new(
        id: PrizeId,
        name: &str,
        total_value: f64,
        total_fragments: u32,
        limit: Option<u32>,
    ) -> LotteryResult<Self> {
        let prize = Self {
            id,
            name: name.trim().to_string(),
            total_value,
            fragment_value: 0.0,
            total_fragments,
            remaining_fragments: total_fragments,
            limit_value: limit,
            probability: 0.0,
            cooldown: 0.0,
        };
        prize.validated()
    }

    /// Check invariants and derive `fragment_value`.
    pub(crate) fn validated(mut self) -> LotteryResult<Self> {
        if self.name.is_empty() {
            return Err(LotteryError::InvalidInput(
                "prize name must not be empty".to_string(),
            ));
        }
        if !self.total_value.is_finite() || self.total_value <= 0.0 {
            return Err(LotteryError::InvalidInput(format!(
                "value of \"{}\" must be a positive number, got {}",
                self.name, self.total_value
            )));
        }
        if self.total_fragments == 0 {
            return Err(LotteryError::InvalidInput(format!(
                "\"{}\" needs at least one fragment",
                self.name
            )));
        }
        if self.remaining_fragments > self.total_fragments {
            return Err(LotteryError::InvalidInput(format!(
                "\"{}\" has {} of {} fragments remaining",
                self.name, self.remaining_fragments, self.total_fragments
            )));
        }
        if self.limit_value == Some(0) {
            return Err(LotteryError::InvalidInput(format!(
                "limit of \"{}\" must be at least 1",
                self.name
            )));
        }
        self.fragment_value = self.total_value / f64::from(self.total_fragments);
        if !self.cooldown.is_finite() {
            self.cooldown = 0.0;
        }
        self.cooldown = self.cooldown.clamp(0.0, 1.0);
        Ok(self)
    }

    /// Identifier.
    pub fn id(&self) -> &PrizeId {
        &self.id
    }

    /// Display name, unique within the pool.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full value of one copy.
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Value of a single fragment.
    pub fn fragment_value(&self) -> f64 {
        self.fragment_value
    }

    /// Fragments one copy is split into.
    pub fn total_fragments(&self) -> u32 {
        self.total_fragments
    }

    /// Fragments of the current copy still in the pool.
    pub fn remaining_fragments(&self) -> u32 {
        self.remaining_fragments
    }

    /// Fragments of the current copy already won.
    pub fn collected_fragments(&self) -> u32 {
        self.total_fragments - self.remaining_fragments
    }

    /// Value still to be won from the current copy.
    pub fn remaining_value(&self) -> f64 {
        self.fragment_value * f64::from(self.remaining_fragments)
    }

    /// Copies left, counting the one in progress. `None` means unlimited.
    pub fn limit_value(&self) -> Option<u32> {
        self.limit_value
    }

    /// Cached draw probability from the last recompute.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Cooldown level in `[0, 1]`.
    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub(crate) fn set_probability(&mut self, probability: f64) {
        self.probability = probability;
    }

    pub(crate) fn set_cooldown(&mut self, cooldown: f64) {
        self.cooldown = cooldown.clamp(0.0, 1.0);
    }

    pub(crate) fn assign_id(&mut self, id: PrizeId) {
        self.id = id;
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub(crate) fn reshape(&mut self, total_value: f64, total_fragments: u32) {
        self.total_value = total_value;
        self.total_fragments = total_fragments;
        self.remaining_fragments = total_fragments;
    }

    pub(crate) fn set_limit(&mut self, limit: Option<u32>) {
        self.limit_value = limit;
    }

    /// Take one fragment. Returns false if none were left.
    pub(crate) fn take_fragment(&mut self) -> bool {
        if self.remaining_fragments == 0 {
            return false;
        }
        self.remaining_fragments -= 1;
        true
    }

    /// Account for a fully collected copy: use up one unit of the limit and
    /// either restock the fragments or report the prize as retired.
    pub(crate) fn finish_copy(&mut self) -> CopyStatus {
        match self.limit_value {
            Some(left) => {
                let left = left.saturating_sub(1);
                self.limit_value = Some(left);
                if left > 0 {
                    self.remaining_fragments = self.total_fragments;
                    CopyStatus::Restocked
                } else {
                    CopyStatus::Retired
                }
            }
            None => {
                self.remaining_fragments = self.total_fragments;
                CopyStatus::Restocked
            }
        }
    }
}

/// On-disk shape of a prize. Older files lack `remaining_fragments`, the
/// limit, or store the limit as text; `fragment_value` is always re-derived.
#[derive(Deserialize)]
struct PrizeRecord {
    id: PrizeId,
    name: String,
    total_value: f64,
    total_fragments: u32,
    #[serde(default)]
    remaining_fragments: Option<u32>,
    #[serde(default = "single_copy")]
    limit_value: Option<LimitRecord>,
    #[serde(default)]
    probability: f64,
    #[serde(default)]
    cooldown: f64,
}

fn single_copy() -> Option<LimitRecord> {
    Some(LimitRecord::Count(1))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LimitRecord {
    Count(u32),
    Text(String),
}

impl TryFrom<PrizeRecord> for Prize {
    type Error = LotteryError;

    fn try_from(record: PrizeRecord) -> Result<Self, Self::Error> {
        let limit_value = match record.limit_value {
            None => None,
            // Older files can hold 0 for a copy still being collected: it is
            // the last one.
            Some(LimitRecord::Count(n)) => Some(n.max(1)),
            Some(LimitRecord::Text(text)) => parse_limit(&text)?,
        };
        Self {
            id: record.id,
            name: record.name,
            total_value: record.total_value,
            fragment_value: 0.0,
            total_fragments: record.total_fragments,
            remaining_fragments: record
                .remaining_fragments
                .unwrap_or(record.total_fragments),
            limit_value,
            probability: record.probability,
            cooldown: record.cooldown,
        }
        .validated()
    }
}

/// Parse a repeat limit: a positive count, or `unlimited` for no limit.
pub fn parse_limit(text: &str) -> LotteryResult<Option<u32>> {
    let text = text.trim();
    match text.to_lowercase().as_str() {
        "unlimited" | "inf" | "∞" | "无限" => Ok(None),
        other => match other.parse::<u32>() {
            Ok(0) | Err(_) => Err(LotteryError::InvalidInput(format!(
                "limit must be a positive number or \"unlimited\", got \"{text}\""
            ))),
            Ok(n) => Ok(Some(n)),
        },
    }
}

/// One item of batch prize input: `name,value[,limit]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeLine {
    /// Prize name.
    pub name: String,
    /// Full value.
    pub value: f64,
    /// Copies, `None` for unlimited.
    pub limit: Option<u32>,
}

impl PrizeLine {
    /// Parse `name,value[,limit]`. A missing limit means a single copy.
    pub fn parse(item: &str) -> LotteryResult<Self> {
        let parts: Vec<&str> = item.split(',').map(str::trim).collect();
        let (name, value, limit) = match parts.as_slice() {
            [name, value] => (*name, *value, None),
            [name, value, limit] => (*name, *value, Some(*limit)),
            _ => {
                return Err(LotteryError::InvalidInput(format!(
                    "expected name,value[,limit], got \"{item}\""
                )));
            }
        };
        if name.is_empty() {
            return Err(LotteryError::InvalidInput(format!(
                "missing prize name in \"{item}\""
            )));
        }
        let value: f64 = value.parse().map_err(|_| {
            LotteryError::InvalidInput(format!("value \"{value}\" is not a number"))
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(LotteryError::InvalidInput(format!(
                "value must be positive, got {value}"
            )));
        }
        let limit = match limit {
            Some(text) => parse_limit(text)?,
            None => Some(1),
        };
        Ok(Self {
            name: name.to_string(),
            value,
            limit,
        })
    }
}
