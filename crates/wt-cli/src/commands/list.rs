use comfy_table::{ContentArrangement, Table};
use wt_core::Lottery;

pub fn run(lottery: &Lottery) -> Result<(), String> {
    let prizes = lottery.prizes();
    if prizes.is_empty() {
        println!("  The prize pool is empty. Add prizes with `wt add name,value`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID", "Name", "Value", "Fragments", "Fragment value", "Limit", "Chance",
    ]);

    for prize in prizes {
        table.add_row(vec![
            prize.id().to_string(),
            prize.name().to_string(),
            format!("{:.2}", prize.total_value()),
            format!("{}/{}", prize.remaining_fragments(), prize.total_fragments()),
            format!("{:.2}", prize.fragment_value()),
            super::limit_label(prize.limit_value()),
            format!("{:.2}%", prize.probability() * 100.0),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} prizes, no-win chance {:.2}%",
        prizes.len(),
        lottery.odds().no_win * 100.0
    );

    Ok(())
}
