//! Bloglist - REST API for a list of blogs

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bloglist::{
    config::Args,
    db::MongoClient,
    repo::{BlogRepository, MemoryBlogRepository, MongoBlogRepository},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("bloglist={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Bloglist API");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB: {} (db: {})", args.mongodb_uri, args.mongodb_db);
    info!("======================================");

    // Connect to MongoDB (in-memory fallback in dev mode)
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            info!("MongoDB connected successfully");
            Some(client)
        }
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB connection failed (dev mode, using in-memory store): {}", e);
                None
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    let blogs: Arc<dyn BlogRepository> = match &mongo {
        Some(client) => Arc::new(MongoBlogRepository::new(client)),
        None => Arc::new(MemoryBlogRepository::new()),
    };

    let state = Arc::new(server::AppState::new(args, blogs));
    let result = server::run(state).await;

    if let Some(client) = mongo {
        client.close().await;
    }

    result?;
    info!("Bloglist stopped");
    Ok(())
}
