use clap::Parser;
use tbeat::cli::{self, Cli, Command};
use tbeat::config::AppConfig;
use tbeat::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    match cli.command {
        Command::Ingest(args) => cli::ingest::run(args, &config).await,
        Command::LastStatus(args) => cli::last_status::run(args, &config).await,
    }
}
