use wt_core::Lottery;

pub fn run(mut lottery: Lottery, items: &[String]) -> Result<(), String> {
    // Items are whitespace-separated, so a quoted argument may hold several.
    let results = lottery.add_prizes(&items.join(" "));
    if results.is_empty() {
        return Err("no prizes given; expected name,value[,limit]".into());
    }

    super::report_batch(&results, |prize| {
        format!(
            "{} {} ({:.2}, {} fragment{}, limit {}, {:.2}%)",
            prize.id(),
            prize.name(),
            prize.total_value(),
            prize.total_fragments(),
            if prize.total_fragments() == 1 { "" } else { "s" },
            super::limit_label(prize.limit_value()),
            prize.probability() * 100.0,
        )
    })
}
