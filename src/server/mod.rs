//! HTTP Surface
//!
//! Thin transport layer over the cache façade: one http1 connection task per
//! accepted socket, routed by path prefix.
//!
//! # Routes
//!
//! - `/cache/clear/` - tear down and restart the cache actor
//! - `/cache/` - status snapshot (plain text, or JSON when asked)
//! - `/metrics` - prometheus exposition
//! - everything else - normalized and served through the cache

pub mod path;

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::cache::CacheHandle;
use crate::error::{Error, Result};

/// Bind and serve until the process exits.
pub async fn run_file_server(addr: SocketAddr, cache: CacheHandle) -> Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("failed to bind {}: {}", addr, e);
        Error::Io(e)
    })?;

    info!("file server listening on {}", addr);

    loop {
        let (stream, _) = listener.accept().await.map_err(Error::Io)?;

        let io = TokioIo::new(stream);
        let cache = cache.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| route(req, cache.clone()));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                error!("connection error: {}", e);
            }
        });
    }
}

async fn route(
    req: Request<Incoming>,
    cache: CacheHandle,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let req_path = req.uri().path().to_string();

    let response = if req_path.starts_with("/cache/clear") {
        handle_clear(&cache).await
    } else if req_path.starts_with("/cache") {
        let wants_json = req
            .headers()
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        handle_status(&cache, wants_json).await
    } else if req_path == "/metrics" {
        handle_metrics()
    } else {
        handle_file(&cache, &req_path).await
    };

    Ok(response)
}

/// Serve one file through the cache.
async fn handle_file(cache: &CacheHandle, raw_path: &str) -> Response<Full<Bytes>> {
    let filename = path::normalize(raw_path);

    match cache.get_file(&filename).await {
        Ok(data) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, path::content_type(&filename))
            .body(Full::new(data))
            .unwrap(),
        Err(e) => error_response(&e),
    }
}

/// Status snapshot, plain text or JSON.
async fn handle_status(cache: &CacheHandle, wants_json: bool) -> Response<Full<Bytes>> {
    match cache.status().await {
        Ok(snapshot) if wants_json => {
            let body = serde_json::to_vec(&snapshot).unwrap_or_default();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(body)))
                .unwrap()
        }
        Ok(snapshot) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Full::new(Bytes::from(format!("{snapshot}\n"))))
            .unwrap(),
        Err(e) => error_response(&e),
    }
}

/// Clear the cache and confirm.
async fn handle_clear(cache: &CacheHandle) -> Response<Full<Bytes>> {
    match cache.clear().await {
        Ok(()) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Full::new(Bytes::from_static(b"Cache cleared and restarted.\n")))
            .unwrap(),
        Err(e) => error_response(&e),
    }
}

/// Prometheus exposition.
fn handle_metrics() -> Response<Full<Bytes>> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("metrics encoding failed: {}", e);
        return error_response(&Error::Internal(format!("metrics encoding failed: {e}")));
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Full::new(Bytes::from(buffer)))
        .unwrap()
}

/// Map the two externally distinguishable failure kinds (and the plumbing
/// ones) to status codes.
fn error_response(error: &Error) -> Response<Full<Bytes>> {
    let status = match error {
        Error::ReadTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        Error::ReadFailed { .. } => StatusCode::NOT_FOUND,
        Error::CacheClosed => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from(format!("{error}\n"))))
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================
