mod config;
mod db;
mod export;
mod history;
mod logging;
mod models;
mod run;
mod store;
mod summary;
mod ui;

use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::resolve()?;
    logging::init(&config.log_path)?;
    info!(version = env!("CARGO_PKG_VERSION"), db = %config.db_path.display(), "starting");

    let db = db::Database::open(&config.db_path)?;
    let mut store = store::TransactionStore::load(Box::new(db));

    match args.len() {
        1 => run::as_tui(&mut store, &config),
        2.. => run::as_cli(&args, &mut store, &config),
        _ => {
            eprintln!("Usage: expz [command]");
            Ok(())
        }
    }
}
