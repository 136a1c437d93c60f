//! vocabquiz CLI: terminal vocabulary trainer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "vocabquiz", version, about = "Terminal vocabulary quiz trainer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a round of up to 15 questions
    Play {
        /// Player name; without it the round is not saved
        #[arg(long)]
        user: Option<String>,

        /// Password of a registered player
        #[arg(long, requires = "user")]
        password: Option<String>,

        /// Language (default from config)
        #[arg(long)]
        language: Option<String>,

        /// Level (default from config)
        #[arg(long)]
        level: Option<String>,

        /// Seed for a reproducible round
        #[arg(long)]
        seed: Option<u64>,

        /// Write a JSON report of the round to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show a player's stored score
    Score {
        #[arg(long)]
        user: String,
    },

    /// Set a player's stored score back to 0
    Reset {
        #[arg(long)]
        user: String,
    },

    /// List every stored score
    Scores {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Register a player with a password and e-mail address
    Register {
        #[arg(long)]
        user: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        email: String,
    },

    /// List available languages and levels
    List,

    /// Validate vocabulary files
    Validate {
        /// Word list file or directory (default: vocabulary_dir from config)
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },

    /// Create a starter config and sample word lists
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vocabquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Play {
            user,
            password,
            language,
            level,
            seed,
            report,
        } => {
            commands::play::execute(
                commands::play::PlayArgs {
                    user,
                    password,
                    language,
                    level,
                    seed,
                    report,
                },
                config,
            )
            .await
        }
        Commands::Score { user } => commands::score::execute(user, config),
        Commands::Reset { user } => commands::reset::execute(user, config),
        Commands::Scores { format } => commands::scores::execute(format, config),
        Commands::Register {
            user,
            password,
            email,
        } => commands::register::execute(user, password, email, config),
        Commands::List => commands::list::execute(config),
        Commands::Validate { vocabulary } => commands::validate::execute(vocabulary, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
