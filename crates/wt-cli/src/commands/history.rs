use wt_core::{History, Lottery};

pub fn run(lottery: &Lottery, last: Option<usize>, format: &str) -> Result<(), String> {
    let history = lottery.history();
    let history = match last {
        Some(n) => {
            let mut recent = History::new();
            for entry in history.recent(n) {
                recent.append(entry.clone());
            }
            recent
        }
        None => history.clone(),
    };

    match format {
        "text" | "txt" => {
            if history.is_empty() {
                println!("  No draws yet.");
                return Ok(());
            }
            print!("{}", history.export_text());
            println!();
            println!(
                "  {} draws, {} wins",
                history.len(),
                history.wins()
            );
        }
        "markdown" | "md" => print!("{}", history.export_markdown()),
        "json" => {
            let json = serde_json::to_string_pretty(&history)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: text, markdown, json"
            ));
        }
    }

    Ok(())
}
