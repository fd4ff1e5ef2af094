// Connection handling module
// Accepts a TCP connection, serves HTTP/1.1 on it and bridges hyper requests
// into the dispatcher

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Version};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use super::state::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::RouteRequest;

/// Admit a connection if under the configured limit and serve it on a local task
///
/// Must run inside a `LocalSet`.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = state.config.connection_timeout();

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { handle_request(req, peer_addr, &state).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Collect the body, run the dispatcher and write the access log line
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&parts, peer_addr));

    let max_body_size = state.config.http.max_body_size;
    let (mut response, stage) = if declared_length(&parts.headers) > Some(max_body_size) {
        logger::log_warning(&format!(
            "Request body too large for {} (max: {max_body_size})",
            parts.uri.path()
        ));
        (http::build_413_response(), "limits")
    } else {
        let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
        match Limited::new(body, limit).collect().await {
            Ok(collected) => {
                let route_req = RouteRequest::from_parts(parts, collected.to_bytes(), Some(peer_addr));
                state.dispatcher.handle_with_stage(&route_req).await
            }
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                (http::build_413_response(), "limits")
            }
            Err(e) => {
                logger::log_warning(&format!("Failed to read request body: {e}"));
                (http::build_text_response(400, "400 Bad Request"), "limits")
            }
        }
    };

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.stage = Some(stage.to_string());
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn access_entry(parts: &hyper::http::request::Parts, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = match parts.version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::Dispatcher;
    use hyper::Method;

    fn state(max_body_size: u64) -> AppState {
        let mut config = Config::load_from("/nonexistent/chorus-test").unwrap();
        config.logging.access_log = false;
        config.http.max_body_size = max_body_size;
        let dispatcher = Dispatcher::new("/nonexistent/root");
        dispatcher
            .route_fn("POST /echo", |req| async move {
                http::build_text_response(200, req.body)
            })
            .unwrap();
        AppState::new(config, dispatcher)
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn post(path: &str, body: &'static [u8], declared: Option<usize>) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method(Method::POST).uri(path);
        if let Some(len) = declared {
            builder = builder.header("content-length", len);
        }
        builder.body(Full::new(Bytes::from_static(body))).unwrap()
    }

    #[tokio::test]
    async fn test_body_reaches_handler() {
        let state = state(64);
        let resp = handle_request(post("/echo", b"hello", Some(5)), peer(), &state)
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[SERVER], "chorus");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_declared_length_over_limit() {
        let state = state(4);
        let resp = handle_request(post("/echo", b"too long", Some(8)), peer(), &state)
            .await
            .unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[tokio::test]
    async fn test_undeclared_body_over_limit() {
        let state = state(4);
        let resp = handle_request(post("/echo", b"too long", None), peer(), &state)
            .await
            .unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[tokio::test]
    async fn test_unmatched_request_is_404() {
        let state = state(64);
        let resp = handle_request(post("/nowhere", b"", None), peer(), &state)
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }
}
