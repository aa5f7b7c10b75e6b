pub mod catalog;
pub mod config;
pub mod console;
pub mod credential;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod providers;
pub mod repl;
pub mod selection;
pub mod session;

use anyhow::{Context, Result};
use reqwest::Client;
use std::io;
use std::time::Duration;
use tracing::info;

use config::Config;
use console::Console;
use model_gateway::GroqGateway;
use repl::run_repl;

pub fn build_client(cfg: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = cfg.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to initialize HTTP client")
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cfg = Config::from_env();
    info!(
        api_base_url = %cfg.api_base_url,
        endpoint_mode = cfg.endpoint_mode.as_str(),
        request_timeout_secs = ?cfg.request_timeout_secs,
        excluded_positions = cfg.catalog_excluded_positions.len(),
        "loaded runtime configuration"
    );

    let client = build_client(&cfg)?;
    let gateway = GroqGateway::new(&client, &cfg);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    run_repl(&gateway, &mut console).await
}
