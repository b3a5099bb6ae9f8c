use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pointstracker", version, about = "Household points tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show scores, threshold and any pending challenge
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known carriers and their SMS gateways
    Carriers,
    /// Change scores and answer PIN challenges
    Points {
        #[command(subcommand)]
        action: commands::points::PointsAction,
    },
    /// Admin session and settings
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status { json } => commands::status::run(json).await,
        Commands::Carriers => commands::carriers::run(),
        Commands::Points { action } => commands::points::run(action).await,
        Commands::Admin { action } => commands::admin::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
