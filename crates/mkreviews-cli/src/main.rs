mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mkreviews_scraper::{ExportFormat, Site};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mkreviews")]
#[command(about = "Marketplace review extraction")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract reviews from a saved raw buffer into a table
    Convert {
        /// Marketplace the buffer was captured from (ozon, wildberries)
        #[arg(long)]
        site: Site,
        /// Raw markup file
        #[arg(long)]
        input: PathBuf,
        /// Destination table
        #[arg(long)]
        output: PathBuf,
        /// Output format: csv, tsv, or jsonl
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
    /// Drive a collection run against saved snapshots, then extract
    Collect {
        /// Marketplace to collect from (ozon, wildberries)
        #[arg(long)]
        site: Site,
        /// Product URL the run is addressed to
        #[arg(long)]
        url: String,
        /// Directory holding page-N.html or scroll-N.html snapshots
        #[arg(long)]
        replay_dir: PathBuf,
        /// Also persist the accumulated raw buffer here
        #[arg(long)]
        raw_out: Option<PathBuf>,
        /// Destination table
        #[arg(long)]
        output: PathBuf,
        /// Output format: csv, tsv, or jsonl
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("mkreviews: pass `convert` or `collect`; see --help");
        return Ok(());
    };

    // Loads `.env` before reading `MKREVIEWS_*`.
    let config = mkreviews_core::load_run_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Convert {
            site,
            input,
            output,
            format,
        } => {
            commands::run_convert(&config, site, &input, &output, format)?;
        }
        Commands::Collect {
            site,
            url,
            replay_dir,
            raw_out,
            output,
            format,
        } => {
            commands::run_collect(
                &config,
                site,
                &url,
                &replay_dir,
                raw_out.as_deref(),
                &output,
                format,
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
