use colored::Colorize;
use wt_core::prize::parse_limit;
use wt_core::{Lottery, PrizeUpdate};

pub fn run(
    mut lottery: Lottery,
    id: &str,
    name: Option<String>,
    value: Option<f64>,
    fragments: Option<u32>,
    limit: Option<&str>,
) -> Result<(), String> {
    let mut update = PrizeUpdate::default();
    if let Some(name) = name {
        update = update.name(name);
    }
    if let Some(value) = value {
        update = update.total_value(value);
    }
    if let Some(fragments) = fragments {
        update = update.total_fragments(fragments);
    }
    if let Some(limit) = limit {
        update = update.limit_value(parse_limit(limit).map_err(|e| e.to_string())?);
    }
    if update.is_empty() {
        return Err("nothing to change; use --name, --value, --fragments or --limit".into());
    }

    let prize = lottery
        .modify_prize(id, &update)
        .map_err(|e| e.to_string())?;

    println!("  {} {} {}", "Updated".bold(), prize.id(), prize.name());
    println!(
        "  Value {:.2} in {} fragments of {:.2}, limit {}",
        prize.total_value(),
        prize.total_fragments(),
        prize.fragment_value(),
        super::limit_label(prize.limit_value()),
    );
    println!("  Chance per draw: {:.2}%", prize.probability() * 100.0);
    Ok(())
}
