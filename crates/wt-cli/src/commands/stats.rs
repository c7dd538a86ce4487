use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use wt_core::{ConsolationPolicy, Lottery};

pub fn run(lottery: &Lottery) -> Result<(), String> {
    let config = lottery.config();
    let history = lottery.history();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let budget = config.total_pool_value;
    let won = lottery.total_won_value();
    let used = if budget > 0.0 {
        format!("{:.1}%", won / budget * 100.0)
    } else {
        "n/a".to_string()
    };

    table.add_row(vec!["Prizes in pool".to_string(), lottery.prizes().len().to_string()]);
    table.add_row(vec!["Budget".to_string(), format!("{budget:.2}")]);
    table.add_row(vec!["Value won".to_string(), format!("{won:.2} ({used})")]);
    table.add_row(vec![
        "Expected per draw".to_string(),
        match lottery.expected_draw_value() {
            Some(ev) => format!("{ev:.2}"),
            None => "n/a".to_string(),
        },
    ]);
    table.add_row(vec![
        "Draws / wins".to_string(),
        format!("{} / {}", history.len(), history.wins()),
    ]);
    if matches!(config.consolation_policy, ConsolationPolicy::Voucher { .. }) {
        table.add_row(vec![
            "Vouchers".to_string(),
            format!("{:.2}", lottery.voucher_total()),
        ]);
    }

    println!("  {}", "Lottery statistics".bold());
    println!("{table}");

    if let Err(e) = config.validate() {
        println!("  {} {e}", "warning:".yellow().bold());
    }
    Ok(())
}
