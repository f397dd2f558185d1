pub mod persistence;

use std::{env, path::PathBuf};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".split_ledger";
const HOME_ENV: &str = "SPLIT_LEDGER_HOME";
const DEFAULT_DIRECTIVE: &str = "split_ledger=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins over `directive`.
pub fn init_tracing(directive: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = directive.unwrap_or(DEFAULT_DIRECTIVE);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // Another subscriber may already be installed by an embedding application.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the application data directory, defaulting to `~/.split_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
