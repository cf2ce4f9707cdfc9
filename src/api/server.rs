//! HTTP server implementation

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::AllowOrigin;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::analysis::Aggregator;
use crate::analysis::FeedbackAnalyzer;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::api::timing;
use crate::api::timing::SlowRequestThreshold;
use crate::config::AppConfig;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::store::FeedbackStore;
use crate::Result;

/// Shared state built from configuration around an existing store
pub fn build_state(config: &AppConfig, store: Arc<dyn FeedbackStore>) -> AppState {
    let analyzer = Arc::new(FeedbackAnalyzer::from_config(&config.cache));
    let aggregator = Arc::new(Aggregator::new(analyzer, config.analysis.clone()));
    AppState::new(store, aggregator)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// The full application router: `/api` routes plus tracing, compression, timing and CORS
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(axum::middleware::from_fn_with_state(
            SlowRequestThreshold::from_millis(server.slow_request_ms),
            timing::process_time,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        );

    if server.enable_cors {
        app = app.layer(cors_layer(server));
    }
    app
}

/// Serve, then connect and prepare the database and caches in the background.
/// An unreachable database leaves the server up with `/api/health` reporting unhealthy.
pub async fn serve_api(config: &AppConfig) -> Result<()> {
    info!("🚀 Starting feedback analytics API server...");

    crate::analysis::initialize();
    let database = Arc::new(Database::connect_lazy(config)?);
    let state = build_state(config, database.clone());

    if config.analysis.warm_up_on_start {
        let aggregator = state.aggregator.clone();
        tokio::spawn(async move {
            prepare_database(&database).await;
            let report = aggregator.warm_up_store(database.as_ref()).await;
            info!("Startup cache warm-up finished: {:?}", report);
        });
    } else {
        tokio::spawn(async move { prepare_database(&database).await });
    }

    serve(config, state).await
}

/// Ping and ensure the schema; failures are logged and never stop the server
async fn prepare_database(database: &Database) {
    if let Err(e) = database.ping().await {
        error!("Failed to reach the database: {}", e);
        return;
    }
    info!("Successfully connected to the database");
    if let Err(e) = database.init_schema().await {
        error!("Failed to ensure feedback schema and indexes: {}", e);
    }
}

/// Bind and serve the router for `state` until the process stops
pub async fn serve(config: &AppConfig, state: AppState) -> Result<()> {
    let app = build_app(state, &config.server);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    if config.server.enable_cors {
        info!("✅ CORS enabled for {:?}", config.server.cors_origins);
    }
    info!("Available endpoints:");
    info!("  GET  /api/health                     - Health check");
    info!("  GET  /api/feedbacks                  - List feedback with analysis");
    info!("  GET  /api/feedbacks/:id              - Get feedback by id");
    info!("  GET  /api/analysis                   - Collection-wide analysis");
    info!("  GET  /api/services/:service/analysis - Per-service analysis");
    info!("  POST /api/admin/precompute-sentiment - Warm the analysis caches");
    info!("  GET  /api/admin/cache                - Cache statistics");

    axum::serve(listener, app).await?;

    Ok(())
}
