//! Server entrypoint: configuration, wiring, and the axum router.

use std::sync::Arc;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commons_backend::adapters::auth::{JwtConfig, JwtTokenVerifier};
use commons_backend::adapters::http::messaging::{
    conversation_routes, message_routes, MessagingHandlers,
};
use commons_backend::adapters::http::middleware::{auth_middleware, AuthState};
use commons_backend::adapters::postgres::{
    PostgresConversationRepository, PostgresMessageRepository,
};
use commons_backend::adapters::websocket::{websocket_router, InMemoryPresenceRegistry, WebSocketState};
use commons_backend::application::handlers::messaging::{
    ListConversationsHandler, ListMessagesHandler, MarkMessageReadHandler, SendMessageHandler,
    StartConversationHandler, UnreadCountHandler,
};
use commons_backend::application::EventDispatcher;
use commons_backend::config::AppConfig;
use commons_backend::ports::{ConversationRepository, MessageRepository, PresenceRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.server.log_level)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        "starting commons backend"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Ports and adapters.
    let conversations: Arc<dyn ConversationRepository> =
        Arc::new(PostgresConversationRepository::new(pool.clone()));
    let messages: Arc<dyn MessageRepository> = Arc::new(PostgresMessageRepository::new(pool));

    let registry: Arc<dyn PresenceRegistry> = Arc::new(InMemoryPresenceRegistry::new());
    let dispatcher = EventDispatcher::new(registry.clone());

    let mut jwt_config = JwtConfig::new(&config.auth.jwt_secret);
    if let Some(issuer) = &config.auth.jwt_issuer {
        jwt_config = jwt_config.with_issuer(issuer);
    }
    let auth_state: AuthState = Arc::new(JwtTokenVerifier::new(jwt_config));

    // Application handlers.
    let messaging_handlers = MessagingHandlers::new(
        Arc::new(StartConversationHandler::new(
            conversations.clone(),
            messages.clone(),
            dispatcher.clone(),
        )),
        Arc::new(SendMessageHandler::new(
            conversations.clone(),
            messages.clone(),
            dispatcher.clone(),
        )),
        Arc::new(ListMessagesHandler::new(
            conversations.clone(),
            messages.clone(),
        )),
        Arc::new(ListConversationsHandler::new(
            conversations.clone(),
            messages.clone(),
        )),
        Arc::new(MarkMessageReadHandler::new(messages.clone())),
        Arc::new(UnreadCountHandler::new(messages)),
    );

    let api = Router::new()
        .nest(
            "/api/conversations",
            conversation_routes(messaging_handlers.clone()),
        )
        .nest("/api/messages", message_routes(messaging_handlers))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    let ws = websocket_router().with_state(WebSocketState::new(registry));

    let app = Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(ws)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr();
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
