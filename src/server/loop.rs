// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight ones

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use super::state::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Accept connections until `shutdown` is notified
///
/// Each connection is served on a local task, so this must run inside a `LocalSet`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = shutdown.notified() => {
                logger::log_info(&format!("[SHUTDOWN] Stopped accepting on {local_addr}"));
                return Ok(());
            }
        }
    }
}

/// Wait for in-flight connections to finish, giving up after `timeout`
///
/// Returns the number of connections still open when it stopped waiting.
pub async fn drain_connections(state: &AppState, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let remaining = state.connection_count();
        if remaining == 0 {
            logger::log_info("[SHUTDOWN] All connections closed");
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "[SHUTDOWN] Drain timeout, {remaining} connection(s) still open"
            ));
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::Dispatcher;
    use crate::http::build_text_response;
    use crate::server::listener::create_reusable_listener;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn send(addr: SocketAddr, method: &str, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>chorus</h1>").unwrap();

        let mut config = Config::load_from("/nonexistent/chorus-test").unwrap();
        config.logging.access_log = false;
        let dispatcher = Dispatcher::new(dir.path());
        dispatcher
            .route_fn("GET /health", |_req| async { build_text_response(200, "ok") })
            .unwrap();
        let state = Arc::new(AppState::new(config, dispatcher));
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&shutdown),
                ));

                let page = send(addr, "GET", "/index.html").await;
                assert!(page.starts_with("HTTP/1.1 200"), "{page}");
                assert!(page.contains("server: chorus"), "{page}");
                assert!(page.ends_with("<h1>chorus</h1>"), "{page}");

                let missing = send(addr, "GET", "/missing.html").await;
                assert!(missing.starts_with("HTTP/1.1 404"), "{missing}");

                let health = send(addr, "GET", "/health").await;
                assert!(health.starts_with("HTTP/1.1 200"), "{health}");
                assert!(health.ends_with("ok"), "{health}");

                let posted = send(addr, "POST", "/health").await;
                assert!(posted.starts_with("HTTP/1.1 404"), "{posted}");

                shutdown.notify_one();
                server.await.unwrap().unwrap();
                assert_eq!(drain_connections(&state, Duration::from_secs(2)).await, 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_times_out_with_open_connections() {
        let config = Config::load_from("/nonexistent/chorus-test").unwrap();
        let state = AppState::new(config, Dispatcher::new("/nonexistent/root"));
        state
            .active_connections
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        assert_eq!(drain_connections(&state, Duration::from_millis(150)).await, 1);
    }
}
