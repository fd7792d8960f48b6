use anyhow::Result;
use clap::Parser;
use recruit_api::cli::{handle_decode_command, handle_shapes_command, Cli, Command};
use recruit_api::{logging, start_web_server, AppConfig};
use tracing::info;

fn log_resolved_config(config: &AppConfig) {
    match &config.source {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    info!(
        "Flag groups: {}",
        config
            .server
            .flag_groups_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Shapes) => handle_shapes_command(),
        Some(Command::Decode {
            shape,
            ref query,
            ref path,
        }) => {
            logging::init(None)?;
            let config = AppConfig::load()?;
            let taxonomy = cli.flag_taxonomy(&config)?;
            handle_decode_command(shape, query, path, &taxonomy)
        }
        Some(Command::Serve) | None => {
            let mut config = AppConfig::load()?;
            logging::init(config.server.log_file.as_deref())?;

            if let Some(path) = &cli.flag_groups {
                config.server.flag_groups_path = Some(path.clone());
            }
            log_resolved_config(&config);

            start_web_server(config).await
        }
    }
}
