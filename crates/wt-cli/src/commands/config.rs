use colored::Colorize;
use wt_core::{ConsolationPolicy, Lottery, NoWinRule, OddsFormula};

/// Settings requested on the command line; unset fields stay as they are.
pub struct Changes {
    pub budget: Option<f64>,
    pub draws_per_day: Option<u32>,
    pub formula: Option<String>,
    pub no_win: Option<String>,
    pub consolation: Option<String>,
}

pub fn run(mut lottery: Lottery, changes: Changes) -> Result<(), String> {
    let mut config = lottery.config().clone();
    if let Some(budget) = changes.budget {
        config = config.with_budget(budget);
    }
    if let Some(draws) = changes.draws_per_day {
        config = config.with_draws_per_day(draws);
    }
    if let Some(formula) = changes.formula.as_deref() {
        config = config.with_formula(parse_formula(formula)?);
    }
    if let Some(rule) = changes.no_win.as_deref() {
        config = config.with_no_win_rule(parse_no_win(rule)?);
    }
    if let Some(policy) = changes.consolation.as_deref() {
        config = config.with_consolation(parse_consolation(policy)?);
    }

    // All flags land in one write, or none do.
    if config != *lottery.config() {
        lottery.update_config(config).map_err(|e| e.to_string())?;
    }

    let config = lottery.config();
    println!("  {}", "Configuration".bold());
    println!("  Budget:        {:.2}", config.total_pool_value);
    println!("  Draws per day: {}", config.draws_per_day);
    println!("  Formula:       {}", config.odds_formula);
    println!("  No-win rule:   {}", config.no_win_rule);
    println!("  Consolation:   {}", config.consolation_policy);
    match lottery.expected_draw_value() {
        Some(ev) => println!("  Expected value per draw: {ev:.2}"),
        None => {
            if let Err(e) = config.validate() {
                println!("  {} {e}", "warning:".yellow().bold());
            }
        }
    }
    Ok(())
}

fn parse_formula(s: &str) -> Result<OddsFormula, String> {
    OddsFormula::parse(s).ok_or_else(|| {
        format!("unknown formula: \"{s}\". Use: inverse, value-share, log-damped")
    })
}

fn parse_no_win(s: &str) -> Result<NoWinRule, String> {
    if s.eq_ignore_ascii_case("complement") {
        return Ok(NoWinRule::Complement);
    }
    let threshold: f64 = s
        .parse()
        .map_err(|_| format!("no-win rule must be \"complement\" or a threshold, got \"{s}\""))?;
    NoWinRule::gate(threshold).map_err(|e| e.to_string())
}

fn parse_consolation(s: &str) -> Result<ConsolationPolicy, String> {
    if s.eq_ignore_ascii_case("reward") {
        return Ok(ConsolationPolicy::Reward);
    }
    let amount: f64 = s.parse().map_err(|_| {
        format!("consolation must be \"reward\" or a voucher amount, got \"{s}\"")
    })?;
    let policy = ConsolationPolicy::Voucher { amount };
    policy.check().map_err(|e| e.to_string())?;
    Ok(policy)
}
