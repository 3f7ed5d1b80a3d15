use anyhow::Result;
use clap::Parser;
use cotacao::client::format_bid;
use cotacao::core::{config::AppConfig, log::init_logging};

/// Fetches the USD-BRL quotation from the local service and writes it to a file
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = AppConfig::resolve(cli.config_path.as_deref()).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        eprintln!("Error: {e:#}");
    })?;

    match cotacao::client::run(&config.client).await {
        Ok(result) => {
            println!("File created successfully!");
            println!("{}", format_bid(&result.bid));
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Quotation client failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
