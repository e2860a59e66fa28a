use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use preset_rename_history::ProfileType;
use preset_rename_history::RenameHistoryStore;
use preset_rename_history::config::Config;
use preset_rename_history::naming;
use preset_rename_history::storage::config::history_path;
use preset_rename_history::utils::configfile::ConfigFile;


#[derive(Parser)]
#[command(
    name = "preset-rename-history",
    about = "Inspect and extend the preset rename history"
)]
struct Cli {
    /// Config file (defaults to config.json next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Application data directory holding user/rename_history.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Maximum number of renames followed when resolving
    #[arg(long, global = true)]
    max_resolve_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every recorded rename, oldest first
    List,
    /// Print the current name of a preset
    Resolve {
        profile_type: ProfileType,
        name: String,
    },
    /// Record a rename after checking the new name
    Rename {
        profile_type: ProfileType,
        old_name: String,
        new_name: String,
    },
    /// Print the history file location
    Path,
}


fn init_logging() -> anyhow::Result<()> {
    let level = if let Ok(s) = std::env::var("LOG_LEVEL") {
        match s.as_str() {
            "TRACE" | "trace" => tracing::Level::TRACE,
            "DEBUG" | "debug" => tracing::Level::DEBUG,
            "INFO" | "info" => tracing::Level::INFO,
            "WARN" | "warn" => tracing::Level::WARN,
            "ERROR" | "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO
        }
    } else {
        tracing::Level::INFO
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}


fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let (cfg, _created): (ConfigFile<Config>, bool) = match &cli.config {
        Some(path) => ConfigFile::new(path)?,
        None => ConfigFile::new_nearby("config.json")?,
    };
    tracing::debug!("config @{:?}: {:?}", cfg.path(), cfg.data());
    let mut config = cfg.into_data();
    if let Some(data_dir) = &cli.data_dir {
        config.history.path = history_path(data_dir);
    }
    if let Some(depth) = cli.max_resolve_depth {
        config.history.max_resolve_depth = depth;
    }
    Ok(config)
}


fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = load_config(&cli)?;
    let mut store = RenameHistoryStore::open(&config.history);

    match cli.command {
        Commands::List => {
            for entry in store.entries() {
                println!("{}: {} -> {} ({})", entry.profile_type(), entry.old_name(), entry.new_name(), entry.timestamp());
            }
        }
        Commands::Resolve { profile_type, name } => {
            match store.resolve(profile_type, &name) {
                Some(current) => println!("{}", current),
                None => println!("{} (not renamed)", name),
            }
        }
        Commands::Rename { profile_type, old_name, new_name } => {
            let accepted = naming::rename_preset(&mut store, None, profile_type, &old_name, &new_name)?;
            println!("{}: {} -> {}", profile_type, old_name, accepted);
        }
        Commands::Path => {
            println!("{}", config.history.path.display());
        }
    }
    Ok(())
}
