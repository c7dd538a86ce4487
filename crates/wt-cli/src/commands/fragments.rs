use comfy_table::{ContentArrangement, Table};
use wt_core::Lottery;

pub fn run(lottery: &Lottery) -> Result<(), String> {
    let holdings = lottery.fragments();
    if holdings.is_empty() {
        println!("  No fragments collected yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Prize", "Collected", "Value"]);

    for h in &holdings {
        table.add_row(vec![
            h.id.to_string(),
            h.name.clone(),
            format!("{}/{}", h.collected, h.total),
            format!("{:.2}", h.value),
        ]);
    }

    println!("{table}");
    Ok(())
}
