use anyhow::Context;
use std::path::Path;
use wastewise_core::config::Config;

pub fn run(root: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let port = port.unwrap_or(config.server.port);

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    rt.block_on(wastewise_server::serve(root, port))
}
