use std::sync::Arc;

use cardledger_api::auth::UserRegistry;
use cardledger_api::services::CardService;
use cardledger_api::store::{CardStore, MemoryCardStore, PgCardStore};
use cardledger_api::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, CARD_USERS, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Cardledger API in {:?} mode", config.environment);

    let store: Arc<dyn CardStore> = match &config.database.url {
        Some(url) => {
            let store = PgCardStore::connect(url, config.database.max_connections)
                .await
                .unwrap_or_else(|e| panic!("failed to connect to card store: {}", e));
            Arc::new(store)
        }
        None if config.server.seed_demo_data => Arc::new(MemoryCardStore::with_demo_fixtures()),
        None => Arc::new(MemoryCardStore::new()),
    };

    let state = AppState {
        service: Arc::new(CardService::new(store, config.paging.clone())),
        users: Arc::new(UserRegistry::from_env()),
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Cardledger API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
