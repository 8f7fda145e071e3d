//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Args;
use crate::db::QuestionStore;
use crate::routes;
use crate::types::HubError;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

const QUESTIONS_PREFIX: &str = "/api/questions/";

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub store: Arc<dyn QuestionStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn QuestionStore>) -> Self {
        Self {
            args,
            store,
            started_at: Instant::now(),
        }
    }
}

/// Bind `args.listen` and serve until Ctrl+C or SIGTERM
pub async fn run(state: Arc<AppState>) -> Result<(), HubError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Question hub listening on {} (store: {})",
        state.args.listen,
        state.store.backend()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - error details are exposed in responses");
    }

    serve(listener, state, shutdown_signal()).await
}

/// Accept connections on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), HubError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Server shutting down");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move { handle_request(state, addr, req).await }
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            debug!("Error serving connection from {}: {:?}", addr, err);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            }
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        (Method::GET, "/") => to_boxed(routes::health_check(Arc::clone(&state))),

        // CORS preflight
        (Method::OPTIONS, _) => to_boxed(preflight_response()),

        (Method::GET, "/api/categories") => {
            to_boxed(routes::list_categories(Arc::clone(&state)).await)
        }

        (Method::GET, p) if p.starts_with(QUESTIONS_PREFIX) => {
            let raw = &p[QUESTIONS_PREFIX.len()..];
            if raw.is_empty() || raw.contains('/') {
                to_boxed(not_found_response(&path))
            } else {
                match routes::parse_category_segment(raw) {
                    Ok(category) => to_boxed(
                        routes::list_questions_by_category(Arc::clone(&state), &category).await,
                    ),
                    Err(e) => to_boxed(error_response(&e)),
                }
            }
        }

        _ => to_boxed(not_found_response(&path)),
    };

    Ok(response)
}

/// Convert a Full<Bytes> body to BoxBody
fn to_boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    response
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    routes::json_response(
        StatusCode::NOT_FOUND,
        &StatusBody {
            status: "error",
            message: "Not Found",
            path: Some(path),
        },
    )
}

/// Response for errors raised before a handler runs
fn error_response(err: &HubError) -> Response<Full<Bytes>> {
    let message = err.to_string();
    routes::json_response(
        err.status_code(),
        &StatusBody {
            status: "error",
            message: &message,
            path: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_is_permissive() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("GET"));
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = not_found_response("/nope");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Not Found");
        assert_eq!(json["path"], "/nope");
    }

    #[test]
    fn test_bad_request_status() {
        let response = error_response(&HubError::BadRequest("bad".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
