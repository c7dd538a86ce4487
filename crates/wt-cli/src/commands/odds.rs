use wt_core::{Lottery, OddsTable};

const BAR_WIDTH: usize = 40;

pub fn run(lottery: &Lottery) -> Result<(), String> {
    let table = lottery.odds();
    if table.prizes.is_empty() {
        println!("  The prize pool is empty.");
        return Ok(());
    }

    println!(
        "  Odds per draw ({} formula, budget {:.2}, {} draws/day)",
        lottery.config().odds_formula,
        lottery.config().total_pool_value,
        lottery.config().draws_per_day,
    );
    println!();
    print!("{}", render_chart(&table));
    Ok(())
}

/// Horizontal bars scaled to the largest entry, no-win last.
fn render_chart(table: &OddsTable) -> String {
    let mut rows: Vec<(String, f64)> = table
        .prizes
        .iter()
        .map(|p| (format!("{} {}", p.id, p.name), p.probability))
        .collect();
    rows.push(("No win".to_string(), table.no_win));

    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, p)| *p).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, p) in &rows {
        let len = if max > 0.0 {
            ((p / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {label:<label_width$} |{:<BAR_WIDTH$}| {:>6.2}%\n",
            "#".repeat(len),
            p * 100.0
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_core::PrizeOdds;

    #[test]
    fn longest_bar_fills_width() {
        let table = OddsTable {
            prizes: vec![PrizeOdds {
                id: "A1".into(),
                name: "Dinner".to_string(),
                probability: 0.125,
            }],
            no_win: 0.875,
        };
        let chart = render_chart(&table);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  A1 Dinner |######"));
        assert!(lines[0].ends_with(" 12.50%"));
        assert!(lines[1].contains(&"#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn all_zero_draws_no_bars() {
        let table = OddsTable {
            prizes: vec![],
            no_win: 0.0,
        };
        assert!(!render_chart(&table).contains('#'));
    }
}
