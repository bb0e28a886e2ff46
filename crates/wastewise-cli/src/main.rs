mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    calc::CalcArgs, config::ConfigSubcommand, location::LocationSubcommand, log::LogSubcommand,
    product::ProductSubcommand, user::UserSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wastewise",
    about = "Household waste tracking: biogas estimates, nudges, eco points and a local API server",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: auto-detect from .wastewise/)
    #[arg(long, global = true, env = "WASTEWISE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, default config and database
    Init,

    /// Run the HTTP API server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Estimate biogas, electricity, savings and CO₂ for one day of waste
    Calc {
        #[arg(long, default_value = "0")]
        kitchen: f64,
        #[arg(long, default_value = "0")]
        plastic: f64,
        #[arg(long, default_value = "0")]
        paper: f64,
        #[arg(long, default_value = "0")]
        garden: f64,
        /// Also print the four-week breakdown
        #[arg(long)]
        weekly: bool,
    },

    /// Show behavioural nudges for a user's recent logs
    Nudges {
        /// Email of the household
        #[arg(long)]
        user: String,
    },

    /// Manage users and API tokens
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Record and list daily waste logs
    Log {
        #[command(subcommand)]
        subcommand: LogSubcommand,
    },

    /// Manage the eco-store catalogue
    Product {
        #[command(subcommand)]
        subcommand: ProductSubcommand,
    },

    /// Manage community locations
    Location {
        #[command(subcommand)]
        subcommand: LocationSubcommand,
    },

    /// Inspect and validate the config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Load a demo household, locations and products
    Seed {
        /// RNG seed for the generated logs
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::Calc {
            kitchen,
            plastic,
            paper,
            garden,
            weekly,
        } => cmd::calc::run(
            CalcArgs {
                kitchen,
                plastic,
                paper,
                garden,
                weekly,
            },
            cli.json,
        ),
        Commands::Nudges { user } => cmd::nudges::run(&root, &user, cli.json),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, cli.json),
        Commands::Log { subcommand } => cmd::log::run(&root, subcommand, cli.json),
        Commands::Product { subcommand } => cmd::product::run(&root, subcommand, cli.json),
        Commands::Location { subcommand } => cmd::location::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Seed { seed } => cmd::seed::run(&root, seed, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
