//! Stock Prediction API Server
//!
//! Read-only REST API over quarterly stock prediction records.

use std::sync::Arc;
use stock_prediction_api::api::create_router;
use stock_prediction_api::config::Config;
use stock_prediction_api::db::MongoStore;
use stock_prediction_api::state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use stock_prediction_api::error::ErrorResponse;
use stock_prediction_api::models::{DataListResponse, HelloResponse, Record, SymbolsResponse};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        stock_prediction_api::api::handlers::hello,
        stock_prediction_api::api::handlers::list_data,
        stock_prediction_api::api::handlers::list_symbols,
    ),
    components(
        schemas(
            HelloResponse,
            Record,
            DataListResponse,
            SymbolsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Predictions", description = "Quarterly stock prediction records"),
    ),
    info(
        title = "Stock Prediction API",
        version = "0.1.0",
        description = "Read-only REST API for quarterly stock prediction records",
        license(name = "MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenv::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Connect to the record store; failure here aborts startup.
    let store = MongoStore::connect(&config.store).await?;

    // Create application state
    let state = Arc::new(AppState::from_config(
        Arc::new(store),
        config.query.clone(),
        &config.cache,
    ));

    let host = &config.server.host;
    let port = config.server.port;

    info!("Starting Stock Prediction API on {}:{}", host, port);
    info!(
        "Symbol matching: data={:?}, symbols={:?}",
        config.query.data_match, config.query.symbols_match
    );
    info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
