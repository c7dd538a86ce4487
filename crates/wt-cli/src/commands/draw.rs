use colored::Colorize;
use wt_core::{Completion, Consolation, DrawOutcome, Lottery};

pub fn run(mut lottery: Lottery, times: u32) -> Result<(), String> {
    if times == 0 {
        return Err("number of draws must be at least 1".into());
    }

    for n in 1..=times {
        let outcome = lottery.draw().map_err(|e| e.to_string())?;
        let prefix = if times > 1 {
            format!("  [{n}] ")
        } else {
            "  ".to_string()
        };

        match outcome {
            DrawOutcome::EmptyPool => {
                println!("{prefix}The prize pool is empty. Add prizes with `wt add`.");
                break;
            }
            DrawOutcome::Win(win) => {
                println!(
                    "{prefix}{} a fragment of {} ({:.2}), {}/{} collected",
                    "Won".green().bold(),
                    win.prize_name.bold(),
                    win.fragment_value,
                    win.collected,
                    win.total_fragments,
                );
                match win.completed {
                    Some(Completion::Restocked) => {
                        println!("{prefix}{} Copy complete, restocked.", "*".yellow());
                    }
                    Some(Completion::Retired) => {
                        println!(
                            "{prefix}{} Copy complete, {} leaves the pool.",
                            "*".yellow(),
                            win.prize_name
                        );
                    }
                    None => {}
                }
            }
            DrawOutcome::NoWin(consolation) => match consolation {
                Consolation::Reward { reward } => {
                    println!("{prefix}No win. Consolation: {}", reward.cyan());
                }
                Consolation::Voucher { amount, total } => {
                    println!("{prefix}No win. Voucher {amount:.2} credited (total {total:.2}).");
                }
                Consolation::NotConfigured => {
                    println!("{prefix}No win. No consolation rewards configured.");
                }
            },
        }
    }

    Ok(())
}
