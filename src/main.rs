use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use quickpoll_api::config;
use quickpoll_api::database::postgres::PgPollStore;
use quickpoll_api::database::store::LoggingCache;
use quickpoll_api::handlers::{self, AppState};
use quickpoll_api::middleware::identity_middleware;
use quickpoll_api::services::PollService;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ADMIN_EMAILS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickpoll_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting quickpoll-api in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = quickpoll_api::database::create_pool(&database_url, &config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let service: AppState = Arc::new(PollService::new(
        PgPollStore::new(pool),
        LoggingCache,
        config.security.admin_emails.clone(),
    ));

    let app = app(service, config.server.enable_cors);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await.expect("server");
}

fn app(service: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/polls", get(handlers::polls::list))
        .route("/api/polls", post(handlers::polls::create))
        .route("/api/polls/:id", get(handlers::polls::get))
        .route("/api/polls/:id", put(handlers::polls::update))
        .route("/api/polls/:id", delete(handlers::polls::delete))
        .route("/api/polls/:id/vote", post(handlers::votes::cast))
        .with_state(service)
        .layer(middleware::from_fn(identity_middleware))
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}
