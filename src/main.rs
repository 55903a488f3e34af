use clap::Parser;

use crate::cli::{Cli, Command};
use crate::db::connection::{init_db, Database};
use crate::store::ArtifactStore;

mod cli;
mod dataset;
mod db;
mod domain;
mod errors;
mod pipeline;
mod profile;
mod spreadsheets;
mod store;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 1️⃣ Create the tracking database handle and apply the schema
    let db = Database::new(&cli.db);
    if let Err(e) = init_db(&db) {
        log::error!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 2️⃣ Open the artifact store
    let store = match ArtifactStore::new(db.clone(), &cli.store_root) {
        Ok(s) => s,
        Err(e) => {
            log::error!("❌ Artifact store init failed: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Dispatch the job
    let result = match &cli.command {
        Command::Fetch(args) => pipeline::run_fetch(&db, &store, args),
        Command::Profile(args) => pipeline::run_profile(&db, &store, args),
        Command::Clean(args) => pipeline::run_clean(&db, &store, args),
        Command::Runs(args) => pipeline::show_runs(&db, args.limit),
        Command::Artifacts => pipeline::show_artifacts(&store),
    };

    if let Err(e) = result {
        log::error!("❌ {e}");
        std::process::exit(1);
    }
}
