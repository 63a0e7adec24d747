//! Restaurant ordering backend.
//!
//! A REST API over two Redis-backed collections: a dish catalog and the
//! orders placed against it. Order creation and wholesale item replacement
//! run through the pricing engine in [`pricing`], which snapshots each dish's
//! current price into the order's line items and computes the total; callers
//! never supply prices or totals. Failures of every kind funnel through the
//! [`error::AppError`] taxonomy for a uniform `{status, message}` response.

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod state;
pub mod store;

use config::Config;
use routes::{
    create_dish_handler, create_order_handler, delete_dish_handler, delete_order_handler,
    fallback_handler, get_dish_handler, get_order_handler, list_dishes_handler,
    list_orders_handler, root_handler, update_dish_handler, update_order_handler,
};
use state::AppState;

/// Builds the full router over the given state. Exposed so tests can drive
/// the real routes against in-memory stores.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/dishes", get(list_dishes_handler).post(create_dish_handler))
        .route(
            "/dishes/{id}",
            get(get_dish_handler)
                .put(update_dish_handler)
                .delete(delete_dish_handler),
        )
        .route("/orders", get(list_orders_handler).post(create_order_handler))
        .route(
            "/orders/{id}",
            get(get_order_handler)
                .put(update_order_handler)
                .delete(delete_order_handler),
        )
        .fallback(fallback_handler)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let config = Config::load();

    info!("Connecting stores...");
    let state = AppState::new(&config).await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = app(state).layer(cors);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}. The kitchen is open!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
