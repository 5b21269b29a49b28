use std::sync::Arc;

use tower_http::cors::CorsLayer;

use dqm_api::api;
use dqm_api::config::Config;
use dqm_api::db::Database;
use dqm_api::loader;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load();

    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    // One-shot offline load; the read surface starts only after it is done.
    if let Some(data_dir) = &config.data_dir {
        let report = loader::load_dir(&db, data_dir).await;
        tracing::info!("CSV load finished: {report}");
    }

    let app = api::router(db).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("Failed to bind port");

    tracing::info!("dqm-api listening on port {}", config.port);
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
