pub mod add;
pub mod config;
pub mod consolation;
pub mod draw;
pub mod fragments;
pub mod history;
pub mod list;
pub mod modify;
pub mod odds;
pub mod remove;
pub mod stats;

use std::path::Path;

use colored::Colorize;
use wt_core::{LoadStatus, Lottery, LotteryResult};

/// Open the state file, warning on stderr if it had to be reinitialized.
pub fn open(path: &Path, seed: Option<u64>) -> Lottery {
    let lottery = Lottery::open(path, seed);
    if let LoadStatus::Recovered(reason) = lottery.load_status() {
        eprintln!(
            "  {} {} could not be read ({reason}); starting from defaults",
            "warning:".yellow().bold(),
            path.display()
        );
    }
    lottery
}

/// `3` or `unlimited`.
fn limit_label(limit: Option<u32>) -> String {
    match limit {
        Some(n) => n.to_string(),
        None => "unlimited".to_string(),
    }
}

/// Print one line per batch item and fail if any item failed.
fn report_batch<T>(
    results: &[(String, LotteryResult<T>)],
    describe: impl Fn(&T) -> String,
) -> Result<(), String> {
    let mut failed = 0;
    for (item, result) in results {
        match result {
            Ok(value) => println!("  {} {}", "+".green(), describe(value)),
            Err(e) => {
                failed += 1;
                println!("  {} {item}: {e}", "x".red());
            }
        }
    }
    if failed > 0 {
        Err(format!("{failed} of {} items failed", results.len()))
    } else {
        Ok(())
    }
}
