// Server module - HTTP server setup and routing
pub mod error;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, Method},
    routing::{get, MethodRouter},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use self::state::AppState;

pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// `/bar/<segment>` paths taken by a static route still answer GET and DELETE
/// the way `/bar/:key` does, so a neighbourhood named `update` stays reachable.
fn shadowed_key_routes(segment: &'static str) -> MethodRouter<AppState> {
    get(move |state: State<AppState>| {
        handlers::list_by_neighbourhood(state, Path(segment.to_string()))
    })
    .delete(move |state: State<AppState>| handlers::delete_bar(state, Path(segment.to_string())))
}

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::render_index))
        .route("/health", get(handlers::health_check))
        .route("/bar", get(handlers::list_bars).post(handlers::create_bar))
        .route(
            "/bar/add-many",
            shadowed_key_routes("add-many").post(handlers::add_many),
        )
        .route(
            "/bar/update",
            shadowed_key_routes("update").post(handlers::update_bar),
        )
        .route("/bar/all", get(handlers::render_all))
        .route("/bar/all/:neighbourhood", get(handlers::render_neighbourhood))
        .route("/bar/detail/:id", get(handlers::render_detail))
        // GET 依街區查詢、DELETE 依 id 刪除，共用同一個路徑參數
        .route(
            "/bar/:key",
            get(handlers::list_by_neighbourhood).delete(handlers::delete_bar),
        )
        .route("/bar/:key/json", get(handlers::get_bar_json))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Serve `app` on an already bound listener until Ctrl+C or SIGTERM.
pub async fn run_server(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!("Server listening on {}", address);
    info!("- Bars endpoint: http://{}/bar", address);
    info!("- Pages: http://{}/bar/all", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
