use std::process::ExitCode;

use clap::Parser;

use megagraph::cli::{effective_config, run, Cli};
use megagraph::config::load_config;
use megagraph::graph::store::GraphStore;
use megagraph::observability::{init_logging, DEFAULT_LOG_FILTER};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => effective_config(&cli, config),
        Err(e) => {
            init_logging(DEFAULT_LOG_FILTER);
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging.filter);

    let result = GraphStore::new(&config.database.path)
        .and_then(|store| run(&cli, &store, &config))
        .and_then(|value| serde_json::to_string_pretty(&value).map_err(Into::into));

    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
