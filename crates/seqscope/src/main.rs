//! seqscope: browse integer sequences and their factorizations.

use seqscope_lib::{app, config, errors};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = config::AppConfig::parse();

    // Initialize tracing
    let level = if config.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if let Err(err) = app::run(&config) {
        eprintln!("Error: {err:#}");
        std::process::exit(errors::exit_code(&err));
    }
}
