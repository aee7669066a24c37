use archgraph_api::Server;
use archgraph_core::{ConfigManager, LoggingConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_TARGETS: &[&str] = &[
    "archgraph_api",
    "archgraph_analysis",
    "archgraph_graph",
    "tower_http",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(ConfigManager::load()?);
    init_tracing(&config.config().logging);

    if let Some(path) = config.config_path() {
        info!(config_file = %path.display(), "Using configuration file");
    }

    let server = Server::new(config)?;
    server.run().await?;
    Ok(())
}

/// A bare level applies to the service targets only; a full directive string is used as is.
fn filter_directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format.as_str() {
        "compact" => registry.with(fmt::layer().compact()).init(),
        _ => registry.with(fmt::layer().pretty()).init(),
    }
}
