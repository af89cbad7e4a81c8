use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use athena::cli::args::{Cli, Commands};
use athena::cli::{commands, load_config, Session};
use athena::logging;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let (paths, config) = load_config(cli.home, cli.api_url)?;
    logging::init(&config.logging.level, cli.verbose);

    let session = Session::open(&paths, config, cli.offline).await?;

    let output = match cli.command {
        Commands::Analyze(args) => commands::analyze(&session, args, format).await?,
        Commands::Feedback(args) => commands::feedback(&session, args, format).await?,
        Commands::History { limit } => commands::history(&session, limit, format).await?,
        Commands::Show { id } => commands::show(&session, &id, format).await?,
        Commands::Learn { category } => {
            commands::learn(&session, category.as_deref(), format).await?
        }
        Commands::Queue(args) => commands::queue(&session, args.command, format).await?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
