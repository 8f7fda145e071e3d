//! Question Hub - API server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use question_hub::{
    config::Args,
    db::{MemoryQuestionStore, MongoClient, MongoQuestionStore, QuestionStore},
    logging, seed, server, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.json_logs());

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Question Hub");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB: {} / {}", args.store.mongodb_uri, args.store.mongodb_db);
    info!("======================================");

    let store: Arc<dyn QuestionStore> =
        match MongoClient::new(&args.store.mongodb_uri, &args.store.mongodb_db).await {
            Ok(client) => {
                info!("MongoDB connected successfully");
                Arc::new(MongoQuestionStore::new(&client).await?)
            }
            Err(e) => {
                if args.dev_mode {
                    warn!(
                        "MongoDB connection failed (dev mode, using in-memory fixtures): {}",
                        e
                    );
                    Arc::new(MemoryQuestionStore::with_questions(seed::fixture_questions()).await)
                } else {
                    error!("MongoDB connection failed: {}", e);
                    std::process::exit(1);
                }
            }
        };

    if args.seed_on_start {
        let inserted = seed::seed_store(store.as_ref()).await?;
        info!("Seeded {} questions on start", inserted);
    }

    let state = Arc::new(AppState::new(args, store));
    server::run(state).await?;

    Ok(())
}
