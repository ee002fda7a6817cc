use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use libris_core::{AppConfig, ExitCode};

mod prompts;
mod render;
mod session;

use session::Session;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "libris",
    about = "Console library catalog and circulation manager",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command script through the console session.
    Run { script: String },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all config values.
    List,
    /// Get a specific config key.
    Get { key: String },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (honors LIBRIS_CONFIG if set)
    let config = AppConfig::load()?;

    match cli.command {
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut session = Session::new(config, stdin.lock(), stdout.lock());
            session.run()?;
        }

        Some(Commands::Run { script }) => {
            let path = Path::new(&script);
            if !path.exists() {
                eprintln!("Script not found: {script}");
                std::process::exit(ExitCode::FileSystemError as i32);
            }
            let reader = BufReader::new(File::open(path)?);
            let stdout = io::stdout();
            let mut session = Session::new(config, reader, stdout.lock());
            session.run()?;
        }

        Some(Commands::Config { action }) => {
            let kv = config_key_values(&config);
            match action {
                ConfigAction::List => {
                    for (key, value) in &kv {
                        println!("{key} = {value}");
                    }
                }
                ConfigAction::Get { key } => match kv.get(key.as_str()) {
                    Some(value) => println!("{value}"),
                    None => {
                        eprintln!("Unknown config key: {key}");
                        std::process::exit(ExitCode::NotFound as i32);
                    }
                },
            }
        }

        Some(Commands::Version) => {
            println!("libris v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn config_key_values(config: &AppConfig) -> HashMap<&'static str, String> {
    let mut map = HashMap::new();
    map.insert("library_name", config.library.name.clone());
    map.insert("banner", config.session.banner.to_string());
    map.insert("menu_after_action", config.session.menu_after_action.to_string());
    map.insert(
        "config_path",
        AppConfig::config_path().to_string_lossy().to_string(),
    );
    map
}
