use anyhow::Context;
use cagpile::domain::config::ApiConfig;
use cagpile::kernel::config::load_config;
use cagpile_logger::{Logger, parse_level};
use cagpile_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig = load_config(std::env::args_os().nth(1))
        .context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg)?;

    Server::builder().config(cfg).build().await?.run().await
}

fn init_logger(cfg: &ApiConfig) -> anyhow::Result<Logger> {
    let logging = &cfg.logging;
    let mut builder = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&logging.level).context("Invalid logging.level")?);
    if let Some(filter) = &logging.filter {
        builder = builder.env_filter(filter.clone());
    }

    let logger = match &logging.path {
        Some(path) => builder.path(path).json(logging.json).init(),
        None => builder.init(),
    };
    logger.context("Failed to initialize logging")
}
