use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pantry::cli::commands::{self, SuggestOptions};
use pantry::config::TOKEN_ENV;
use pantry::logging;

#[derive(Parser)]
#[command(name = "pantry", about = "Recipe suggestions from the ingredients you have", version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank catalog recipes against an ingredient list
    Suggest {
        /// Ingredients, e.g. "egg, tomato and salt"
        ingredients: String,

        /// Recipe catalog (JSON or YAML)
        #[arg(short, long, default_value = "recipes.json")]
        catalog: PathBuf,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Show at most this many recipes
        #[arg(short, long)]
        limit: Option<usize>,

        /// Seed for the tie-break order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check that a recipe catalog loads
    Validate {
        /// Recipe catalog (JSON or YAML)
        #[arg(short, long, default_value = "recipes.json")]
        catalog: PathBuf,
    },

    /// Chat with the bot on the terminal
    Chat {
        /// Bot config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Recipe catalog, overriding the config
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Seed for suggestion order and random picks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Serve the bot over the Telegram Bot API
    Telegram {
        /// Bot config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Recipe catalog, overriding the config
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Bot token (default: $PANTRY_TELEGRAM_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Channel users must join, overriding the config
        #[arg(long)]
        channel: Option<String>,
    },
}

fn finish(result: Result<String, String>) {
    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Suggest {
            ingredients,
            catalog,
            format,
            limit,
            seed,
        }) => {
            let options = SuggestOptions {
                catalog,
                format,
                limit,
                seed,
            };
            finish(commands::run_suggest(&ingredients, &options));
        }
        Some(Commands::Validate { catalog }) => {
            finish(commands::run_validate(&catalog).map(|summary| summary + "\n"));
        }
        Some(Commands::Chat {
            config,
            catalog,
            seed,
        }) => {
            let result = commands::resolve_config(config.as_deref(), catalog, None).and_then(
                |config| {
                    let stdin = std::io::stdin();
                    let mut stdout = std::io::stdout();
                    commands::run_chat(&config, seed, stdin.lock(), &mut stdout)
                },
            );
            match result {
                Ok(summary) => eprintln!("{summary}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Telegram {
            config,
            catalog,
            token,
            channel,
        }) => {
            let Some(token) = token.or_else(|| std::env::var(TOKEN_ENV).ok()) else {
                eprintln!("error: no bot token (pass --token or set {TOKEN_ENV})");
                std::process::exit(1);
            };
            finish(
                commands::resolve_config(config.as_deref(), catalog, channel)
                    .and_then(|config| commands::run_telegram(&config, &token)),
            );
        }
        None => {
            // No subcommand: print help and exit
            Cli::parse_from(["pantry", "--help"]);
        }
    }
}
