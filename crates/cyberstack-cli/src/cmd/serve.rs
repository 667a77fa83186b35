use cyberstack_core::config::Config;
use std::path::Path;

/// `cyberstack serve` — run the HTTP API until interrupted.
pub fn run(root: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let port = port.unwrap_or(config.server.port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(cyberstack_server::serve(root.to_path_buf(), port))
}
