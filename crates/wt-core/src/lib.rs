//! Engine for Wunschtopf, a personal reward lottery.
//!
//! Prizes carry a monetary value and are split into fragments. A monthly
//! budget and an expected draw rate turn the pool into per-prize odds; each
//! draw either wins one fragment or hands out a consolation. All state lives
//! in one JSON file that is rewritten after every change.

pub mod config;
pub mod consolation;
pub mod draw;
pub mod error;
pub mod history;
pub mod lottery;
pub mod odds;
pub mod pool;
pub mod prize;
pub mod state;

pub use config::{ConsolationPolicy, NoWinRule, OddsFormula, PoolConfig};
pub use consolation::{Consolation, ConsolationList};
pub use draw::{Completion, DrawOutcome, Win};
pub use error::{LotteryError, LotteryResult};
pub use history::{History, HistoryEntry};
pub use lottery::{BatchResult, FragmentHolding, Lottery};
pub use odds::{OddsTable, PrizeOdds};
pub use pool::{PrizePool, PrizeUpdate};
pub use prize::{Prize, PrizeId, PrizeLine};
pub use state::{DEFAULT_STATE_FILE, LoadStatus, LotteryState};
