// src/main.rs
use anyhow::Result;
use clap::Parser;
use resume_generator::cli::ServerCli;
use resume_generator::environment::LogFormat;
use resume_generator::{start_web_server, ServiceConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resume_generator=info,rocket=warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
        LogFormat::Plain => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    let environment = cli.environment();

    let mut config = ServiceConfig::load(&cli.config, &environment)?;
    cli.apply_to(&mut config);
    config.resolve_paths()?;

    init_tracing(config.log_format);

    info!("Environment: {}", environment);
    if cli.config.exists() {
        info!("Configuration loaded from {}", cli.config.display());
    } else {
        info!("No config file at {}, using defaults", cli.config.display());
    }
    config.ensure_directories().await?;

    start_web_server(config).await
}
