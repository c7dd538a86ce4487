use wt_core::Lottery;

pub fn add(mut lottery: Lottery, rewards: &[String]) -> Result<(), String> {
    let results = lottery.add_consolations(rewards);
    let added: Vec<(String, _)> = results
        .into_iter()
        .map(|(item, result)| (item.clone(), result.map(|()| item)))
        .collect();
    super::report_batch(&added, |reward| format!("added \"{reward}\""))
}

pub fn edit(mut lottery: Lottery, index: usize, reward: &str) -> Result<(), String> {
    let old = lottery
        .edit_consolation(index, reward)
        .map_err(|e| e.to_string())?;
    println!("  #{index}: \"{old}\" -> \"{}\"", reward.trim());
    Ok(())
}

pub fn remove(mut lottery: Lottery, index: usize) -> Result<(), String> {
    let removed = lottery
        .remove_consolation(index)
        .map_err(|e| e.to_string())?;
    println!("  Removed #{index}: \"{removed}\"");
    Ok(())
}

pub fn list(lottery: &Lottery) -> Result<(), String> {
    let rewards = lottery.consolations().list();
    if rewards.is_empty() {
        println!("  No consolation rewards configured.");
        return Ok(());
    }
    for (i, reward) in rewards.iter().enumerate() {
        println!("  {:>3}. {reward}", i + 1);
    }
    Ok(())
}
