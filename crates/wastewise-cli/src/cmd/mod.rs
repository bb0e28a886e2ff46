pub mod calc;
pub mod config;
pub mod init;
pub mod location;
pub mod log;
pub mod nudges;
pub mod product;
pub mod seed;
pub mod serve;
pub mod user;

use anyhow::Context;
use std::path::Path;
use wastewise_core::config::Config;
use wastewise_core::store::Store;

/// Load the config (failing if the project was never initialized) and open
/// the database.
pub fn open_store(root: &Path) -> anyhow::Result<(Config, Store)> {
    let config = Config::load(root)?;
    let store = Store::open_root(root).context("failed to open database")?;
    Ok((config, store))
}
