use axum::{debug_handler, extract::Path, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
#[allow(unused)]
use tracing::{debug, error, info};

pub fn router() -> Router {
    Router::new()
        .route("/delay/ms/:delay_ms", get(delay))
        .route("/status/:code/delay/ms/:delay_ms", get(status))
        .route("/text/delay/ms/:delay_ms", get(text))
        .route("/hang", get(hang))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    serve(listener).await
}

/// Bind to an ephemeral local port and serve in the background.
pub async fn spawn() -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = serve(listener).await {
            error!("Mock service stopped: {err}");
        }
    });
    Ok(addr)
}

async fn serve(listener: TcpListener) -> std::io::Result<()> {
    info!("Mock service listening on {}", listener.local_addr()?);
    axum::serve(listener, router()).await
}

#[derive(Serialize)]
pub struct Reply {
    status: u16,
    delay_ms: u64,
}

#[debug_handler]
pub async fn delay(Path(delay_ms): Path<u64>) -> Json<Reply> {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Json(Reply {
        status: 200,
        delay_ms,
    })
}

#[debug_handler]
pub async fn status(
    Path((code, delay_ms)): Path<(u16, u64)>,
) -> Result<(StatusCode, Json<Reply>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    debug!("Replying {status} after {delay_ms}ms");
    Ok((
        status,
        Json(Reply {
            status: code,
            delay_ms,
        }),
    ))
}

/// 200 with a body that is not JSON.
#[debug_handler]
pub async fn text(Path(delay_ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    "definitely not json"
}

/// Accepts the request and never answers.
#[debug_handler]
pub async fn hang() -> StatusCode {
    std::future::pending::<()>().await;
    StatusCode::OK
}
