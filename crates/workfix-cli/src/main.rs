mod audit;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::audit::AuditArgs;

#[derive(Debug, Parser)]
#[command(name = "workfix")]
#[command(about = "Estimate revenue leaked through unanswered Instagram comments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a leak audit for one handle
    Audit(AuditArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = workfix_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Audit(args)) => audit::run_audit(&config, &args).await?,
        None => println!("nothing to do; run `workfix audit --help` to start a leak audit"),
    }

    Ok(())
}
