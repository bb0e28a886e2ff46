use super::open_store;
use crate::output::print_json;
use std::path::Path;

pub fn run(root: &Path, seed: u64, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let report = wastewise_core::seed::seed(&store, seed, chrono::Utc::now().date_naive())?;

    if json {
        return print_json(&report);
    }
    println!("Seeded demo data for {}:", report.user.email);
    println!("  logs:      {}", report.logs);
    println!("  locations: {}", report.locations);
    println!("  products:  {}", report.products);
    println!("\ntoken: {}", report.token);
    Ok(())
}
