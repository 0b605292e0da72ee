use std::sync::Arc;

use chrono_tz::Tz;
use sqlx::postgres::PgPoolOptions;

use transit_server::realtime::{FeedConfig, RealtimeFeedCache, VendorFeedClient};
use transit_server::store::PgStore;
use transit_server::timetable::TimetableConfig;
use transit_server::web::{AppState, create_router};

/// Default bind address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8081";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("transit_server=info,tower_http=info")),
        )
        .init();

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let api_key = std::env::var("GTFSR_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("GTFSR_API_KEY not set; real-time feed requests will fail");
        String::new()
    });
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let timezone: Tz = match std::env::var("SERVICE_TZ") {
        Ok(name) => name.parse().expect("SERVICE_TZ is not a valid timezone"),
        Err(_) => chrono_tz::Europe::Dublin,
    };

    // Connect to the pre-loaded static dataset
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    let store = Arc::new(PgStore::new(pool));

    // Real-time feed client and its process-wide cache
    let feed_client =
        VendorFeedClient::new(FeedConfig::new(&api_key)).expect("failed to create feed client");
    let realtime = RealtimeFeedCache::new(feed_client);

    let state = AppState::new(store, realtime, TimetableConfig::default(), timezone);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("transit server listening on http://{bind_addr}");
    axum::serve(listener, app).await.expect("server error");
}
