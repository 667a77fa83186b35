mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{board::BoardSubcommand, team::TeamSubcommand, user::UserSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cyberstack",
    about = "Cybersecurity team operations — users, rosters, task board, chat, and AI flows",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .cyberstack/ or .git/)
    #[arg(long, global = true, env = "CYBERSTACK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a workspace: config, store, and fixed seed data
    Init,

    /// Start the HTTP API server
    Serve {
        /// Port to listen on (default: from config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show a store summary
    State,

    /// Seed any missing fixed teams, channels, and sample board data
    Seed,

    /// Manage platform users
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage team rosters
    Team {
        #[command(subcommand)]
        subcommand: TeamSubcommand,
    },

    /// Manage the Kanban board
    Board {
        #[command(subcommand)]
        subcommand: BoardSubcommand,
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
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Seed => cmd::seed::run(&root, cli.json),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, cli.json),
        Commands::Team { subcommand } => cmd::team::run(&root, subcommand, cli.json),
        Commands::Board { subcommand } => cmd::board::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
