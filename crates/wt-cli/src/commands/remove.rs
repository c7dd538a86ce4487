use wt_core::Lottery;

pub fn run(mut lottery: Lottery, ids: &[String]) -> Result<(), String> {
    let results = lottery.remove_prizes(ids);
    super::report_batch(&results, |prize| {
        format!("removed {} {}", prize.id(), prize.name())
    })
}
