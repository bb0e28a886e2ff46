use super::open_store;
use crate::output::print_json;
use std::path::Path;
use wastewise_core::nudge::{generate_nudges, window_start};
use wastewise_core::types::DailyLogRecord;

pub fn run(root: &Path, email: &str, json: bool) -> anyhow::Result<()> {
    let (config, store) = open_store(root)?;
    let user = store.user_by_email(email)?;
    let since = window_start(chrono::Utc::now().date_naive(), config.nudges.window_days);
    let records: Vec<DailyLogRecord> = store
        .waste_logs_since(user.id, since)?
        .into_iter()
        .map(|l| l.record)
        .collect();
    let nudges = generate_nudges(&records);

    if json {
        return print_json(&serde_json::json!({ "nudges": nudges }));
    }
    for n in &nudges {
        println!("[{}] {}", n.kind.as_str(), n.text);
    }
    Ok(())
}
