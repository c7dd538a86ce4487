//! Append-only draw history and its export.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::prize::PrizeId;

/// Outcome of one draw, as recorded in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A prize fragment was won.
    #[serde(alias = "中奖")]
    Win {
        /// Prize name at the time of the draw.
        prize: String,
        /// Prize identifier.
        #[serde(default)]
        prize_id: Option<PrizeId>,
        /// Fragments of the current copy collected after this draw.
        fragment_won: u32,
        /// Fragments per copy.
        total_fragments: u32,
        /// Value of the fragment won.
        value: f64,
        /// Day of the draw.
        date: NaiveDate,
    },
    /// No prize; a consolation reward was handed out.
    #[serde(alias = "未中奖")]
    Consolation {
        /// The reward text.
        consolation_reward: String,
        /// Day of the draw.
        date: NaiveDate,
    },
    /// No prize; a voucher amount was credited.
    Voucher {
        /// Amount credited.
        amount: f64,
        /// Day of the draw.
        date: NaiveDate,
    },
    /// No prize and no consolation configured.
    NoConsolation {
        /// Day of the draw.
        date: NaiveDate,
    },
}

impl HistoryEntry {
    /// Day of the draw.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Win { date, .. }
            | Self::Consolation { date, .. }
            | Self::Voucher { date, .. }
            | Self::NoConsolation { date } => *date,
        }
    }

    /// Whether the draw won a prize fragment.
    pub fn is_win(&self) -> bool {
        matches!(self, Self::Win { .. })
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win {
                prize,
                fragment_won,
                total_fragments,
                value,
                date,
                ..
            } => write!(
                f,
                "{date} - Win: {prize} ({fragment_won}/{total_fragments}, worth {value:.2})"
            ),
            Self::Consolation {
                consolation_reward,
                date,
            } => write!(f, "{date} - No win: {consolation_reward}"),
            Self::Voucher { amount, date } => write!(f, "{date} - No win: voucher {amount:.2}"),
            Self::NoConsolation { date } => write!(f, "{date} - No win"),
        }
    }
}

/// Chronological log of draw outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been drawn yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of winning draws.
    pub fn wins(&self) -> usize {
        self.entries.iter().filter(|e| e.is_win()).count()
    }

    /// Export the history as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Draw History\n\n");
        for entry in &self.entries {
            match entry {
                HistoryEntry::Win {
                    prize,
                    fragment_won,
                    total_fragments,
                    value,
                    date,
                    ..
                } => {
                    out.push_str(&format!(
                        "- {date} **{prize}**: fragment {fragment_won}/{total_fragments} ({value:.2})\n"
                    ));
                }
                HistoryEntry::Consolation {
                    consolation_reward,
                    date,
                } => {
                    out.push_str(&format!("- {date} *{consolation_reward}*\n"));
                }
                HistoryEntry::Voucher { amount, date } => {
                    out.push_str(&format!("- {date} *voucher {amount:.2}*\n"));
                }
                HistoryEntry::NoConsolation { date } => {
                    out.push_str(&format!("- {date} no win\n"));
                }
            }
        }
        out
    }

    /// Export the history as plain text, one line per draw.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Draw History\n============\n\n");
        for entry in &self.entries {
            out.push_str(&format!("{entry}\n"));
        }
        out
    }
}
