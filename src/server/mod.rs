use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::categories::CategoriesResource;
use crate::service::ExpenseService;

pub mod mcp;
pub mod routes;

/// Server state
pub struct AppState {
    pub service: ExpenseService,
    pub categories: CategoriesResource,
}

/// Build the HTTP router over the expense operations
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/expenses", get(routes::list_expenses).post(routes::add_expense))
        .route("/summary", get(routes::summarize))
        .route("/categories", get(routes::categories))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
