use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use biodata_cli::cli::{Cli, Command};
use biodata_cli::commands;
use biodata_cli::config;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = commands::resolve_config_path(cli.config.as_deref())?;

    match cli.command {
        Command::Export(args) => {
            let config = config::load_or_default(&config_path)?;
            let outcome = commands::run_export(&args, &config).await?;
            match outcome.pages {
                Some(pages) => println!("saved {} ({pages} pages)", outcome.location),
                None => println!("saved {}", outcome.location),
            }
        }
        Command::Config(command) => {
            let mut stdout = std::io::stdout().lock();
            commands::run_config(command, &config_path, &mut stdout)?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
