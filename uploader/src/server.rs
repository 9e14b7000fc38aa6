use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, response::Html, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{page::UploadPage, types::PageError};

/// Port the upload page is served on unless configured otherwise
pub const DEFAULT_PORT: u16 = 8765;

/// Every request, whatever its method or path, gets the rendered page
async fn render_page(State(page): State<Arc<UploadPage>>) -> Result<Html<String>, PageError> {
    page.render().await.map(Html)
}

/// Builds the single-handler router around `page`
#[must_use]
pub fn router(page: Arc<UploadPage>) -> Router {
    Router::new()
        .fallback(render_page)
        .with_state(page)
        .layer(TraceLayer::new_for_http())
}

/// Serves the upload page on an already bound listener until the process dies
///
/// # Errors
///
/// Returns an error if accepting connections fails
pub async fn serve(listener: TcpListener, page: Arc<UploadPage>) -> anyhow::Result<()> {
    axum::serve(listener, router(page))
        .await
        .map_err(anyhow::Error::from)
}

/// Binds all interfaces on `port` and serves the upload page
///
/// # Errors
///
/// Returns an error if the server fails to bind to the port
pub async fn start(port: u16, page: Arc<UploadPage>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Upload page served on http://{addr}");

    serve(listener, page).await
}
