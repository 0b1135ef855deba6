// Server loop module
// Accepts connections until the shutdown future resolves, then drains

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long in-flight connections get to finish after shutdown
const DRAIN_GRACE: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Main accept loop
///
/// Accept errors are logged and never stop the loop; only `shutdown`
/// resolving does. After that the listener is closed and open connections
/// get [`DRAIN_GRACE`] to complete.
pub async fn run_server<S>(listener: TcpListener, state: Arc<AppState>, shutdown: S)
where
    S: Future<Output = &'static str>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    let reason = loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            reason = &mut shutdown => break reason,
        }
    };

    drop(listener);
    logger::log_shutdown(reason);
    drain_connections(&active_connections).await;
}

/// Wait for open connections to finish, up to the grace period
async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_GRACE;

    loop {
        let open = active_connections.load(Ordering::SeqCst);
        if open == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "{open} connection(s) still open after {}s, exiting anyway",
                DRAIN_GRACE.as_secs()
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};
    use crate::server::create_reusable_listener;
    use std::fs;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn raw_request(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    fn get(path: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let app1 = root.path().join("app1");
        fs::create_dir(&app1).unwrap();
        fs::write(app1.join("a.json"), r#"{"x":1}"#).unwrap();
        fs::create_dir(root.path().join("app2")).unwrap();

        let overrides = Overrides {
            root: Some(root.path().to_path_buf()),
            ..Overrides::default()
        };
        let mut cfg = Config::load_from(None, &overrides).unwrap();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::new(cfg));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(run_server(listener, state, async move {
            let _ = stop_rx.await;
            "test finished"
        }));

        let ok = raw_request(addr, &get("/app1")).await;
        assert!(ok.starts_with("HTTP/1.1 200 OK\r\n"), "{ok}");
        assert!(ok.to_ascii_lowercase().contains("content-type: application/json\r\n"));
        assert!(ok.ends_with("\r\n\r\n{\"x\":1}"), "{ok}");

        let empty = raw_request(addr, &get("/app2")).await;
        assert!(empty.starts_with("HTTP/1.1 404 Not Found\r\n"), "{empty}");
        assert!(empty.ends_with("No JSON file found in config directory"));

        let bad = raw_request(addr, &get("/")).await;
        assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{bad}");
        assert!(bad.ends_with("Path is required"));

        stop_tx.send(()).unwrap();
        server.await.unwrap();
    }
}
