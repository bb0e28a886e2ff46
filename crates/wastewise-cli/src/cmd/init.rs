use anyhow::Context;
use std::path::Path;
use wastewise_core::config::Config;
use wastewise_core::store::Store;
use wastewise_core::{io, paths};

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing WasteWise in: {}", root.display());

    let data_dir = paths::data_dir(root);
    io::ensure_dir(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let yaml = serde_yaml::to_string(&Config::default())?;
    if io::write_if_missing(&paths::config_path(root), yaml.as_bytes())
        .context("failed to write config.yaml")?
    {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let db_path = paths::database_path(root);
    let existed = db_path.exists();
    Store::open(&db_path).context("failed to create database")?;
    if existed {
        println!("  exists:  {}", paths::DATABASE_FILE);
    } else {
        println!("  created: {}", paths::DATABASE_FILE);
    }

    println!("\nNext: `wastewise user add --email you@example.com --name You` or `wastewise seed`.");
    Ok(())
}
