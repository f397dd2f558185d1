use std::{env, process};

use split_ledger::{cli::run_cli, config::ConfigManager, init_with_filter};

fn main() {
    let config = match ConfigManager::from_env().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };
    init_with_filter(config.log_filter.as_deref());

    if let Err(err) = run_cli(env::args().skip(1), &config) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
