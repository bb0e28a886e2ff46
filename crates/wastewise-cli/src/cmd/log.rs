use super::open_store;
use crate::output::{kg, print_json, print_table};
use chrono::NaiveDate;
use clap::Subcommand;
use std::path::Path;
use wastewise_core::types::WasteLog;
use wastewise_core::validate::{LogInput, WasteInput};

#[derive(Subcommand)]
pub enum LogSubcommand {
    /// Record one day of waste for a user
    Add {
        /// Email of the household
        #[arg(long)]
        user: String,
        /// Day being logged (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "0")]
        kitchen: f64,
        #[arg(long, default_value = "0")]
        plastic: f64,
        #[arg(long, default_value = "0")]
        paper: f64,
        #[arg(long, default_value = "0")]
        garden: f64,
    },
    /// List a user's logs, newest first
    List {
        #[arg(long)]
        user: String,
        /// Show at most N logs
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
}

pub fn run(root: &Path, subcmd: LogSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        LogSubcommand::Add {
            user,
            date,
            kitchen,
            plastic,
            paper,
            garden,
        } => {
            let input = LogInput {
                date,
                waste: WasteInput {
                    kitchen_kg: kitchen,
                    plastic_kg: plastic,
                    paper_kg: paper,
                    garden_kg: garden,
                },
            };
            add(root, &user, input, json)
        }
        LogSubcommand::List { user, limit } => list(root, &user, limit, json),
    }
}

fn add(root: &Path, email: &str, input: LogInput, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let user = store.user_by_email(email)?;
    let record = input.validate(chrono::Utc::now().date_naive())?;
    let log = WasteLog::new(user.id, record);
    store.insert_waste_log(&log)?;

    if json {
        return print_json(&log);
    }
    println!(
        "Logged {} kg for {} on {}",
        kg(log.record.total_kg),
        user.email,
        log.record.date
    );
    Ok(())
}

fn list(root: &Path, email: &str, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let user = store.user_by_email(email)?;
    let mut logs = store.waste_logs_for(user.id)?;
    if let Some(n) = limit {
        logs.truncate(n);
    }

    if json {
        return print_json(&logs);
    }
    if logs.is_empty() {
        println!("No logs for {}.", user.email);
        return Ok(());
    }
    let rows = logs
        .iter()
        .map(|l| {
            let r = &l.record;
            vec![
                r.date.to_string(),
                kg(r.kitchen_kg),
                kg(r.plastic_kg),
                kg(r.paper_kg),
                kg(r.garden_kg),
                kg(r.total_kg),
            ]
        })
        .collect();
    print_table(
        &["DATE", "KITCHEN", "PLASTIC", "PAPER", "GARDEN", "TOTAL"],
        rows,
    );
    Ok(())
}
