//! Shared utilities for integration tests.

use axum::Router;
use od2k_proxy::{ForwardingProxy, HttpServer, ProxyConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `app` as a mock upstream on an ephemeral loopback port.
pub async fn start_upstream(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// How a raw upstream ends the connection after writing its bytes.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum AfterWrite {
    /// Keep the socket open without sending anything else.
    Stall,
    /// Close the socket.
    Close,
}

/// Start a raw TCP upstream that answers every request with `response` verbatim.
///
/// Used to produce truncated or stalled bodies a well-behaved server never sends.
#[allow(dead_code)]
pub async fn start_raw_upstream(response: &'static [u8], after: AfterWrite) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Drain the request head so closing does not reset the connection.
                        let mut head = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => head.extend_from_slice(&buf[..n]),
                            }
                        }

                        let _ = socket.write_all(response).await;
                        let _ = socket.flush().await;
                        match after {
                            AfterWrite::Stall => tokio::time::sleep(Duration::from_secs(10)).await,
                            AfterWrite::Close => {
                                let _ = socket.shutdown().await;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Settings with test credentials and the given timeout.
pub fn test_config(timeout_secs: u64) -> ProxyConfig {
    ProxyConfig {
        http_port: Some(8080),
        http_timeout: timeout_secs,
        username: "testuser".into(),
        password: "secret".into(),
    }
}

/// Proxy pointed at a mock upstream.
pub fn proxy_for(upstream: SocketAddr, timeout_secs: u64) -> ForwardingProxy {
    ForwardingProxy::with_base_url(&test_config(timeout_secs), format!("http://{}", upstream)).unwrap()
}

/// Run a full proxy server in the background and return its address.
#[allow(dead_code)]
pub async fn start_proxy(proxy: ForwardingProxy) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = HttpServer::new(proxy).into_router();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
