//! Replace the question collection with fixture data

use clap::Parser;
use tracing::{error, info};

use question_hub::{
    config::StoreArgs,
    db::{MongoClient, MongoQuestionStore},
    logging, seed,
};

/// Seed the question collection
#[derive(Parser, Debug)]
#[command(name = "question-hub-seed")]
struct SeedArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = SeedArgs::parse();

    logging::init(&args.log_level, false);

    if let Err(e) = args.store.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let client = match MongoClient::new(&args.store.mongodb_uri, &args.store.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let store = MongoQuestionStore::new(&client).await?;
    let inserted = seed::seed_store(&store).await?;
    info!("Seeded {} questions into {}", inserted, client.db_name());

    Ok(())
}
