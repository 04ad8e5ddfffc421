//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;

use coi_serve::config::ServeConfig;
use coi_serve::lifecycle::Shutdown;
use coi_serve::net::Listener;
use coi_serve::{HttpServer, ServeError};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

pub const COEP_LINE: &str = "Cross-Origin-Embedder-Policy: require-corp";
pub const COOP_LINE: &str = "Cross-Origin-Opener-Policy: same-origin";

pub const INDEX_HTML: &str = "<!doctype html>\n<script src=\"worker.js\"></script>\n";

/// A server running on an ephemeral loopback port over a temporary directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub dir: TempDir,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), ServeError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server to drain.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle
            .await
            .expect("server task panicked")
            .expect("server returned an error");
    }
}

/// Loopback config on port 0 serving `root`.
pub fn loopback_config(root: &Path) -> ServeConfig {
    let mut config = ServeConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.files.root = root.to_path_buf();
    config
}

/// Start a server whose root holds `index.html` and `worker.js`.
///
/// The root is a `site/` subdirectory so tests can place files outside it.
pub async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("site");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(root.join("worker.js"), "onmessage = () => {};\n").unwrap();
    std::fs::write(dir.path().join("secret.txt"), "outside the root").unwrap();

    let config = loopback_config(&root);
    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        dir,
        shutdown,
        handle,
    }
}

/// HTTP client that never reuses connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Write a raw request and read until the server closes the connection.
pub async fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// A `GET` for `path` that asks the server to close afterwards.
pub fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
}

/// Header block lines of a raw response, status line excluded.
pub fn header_lines(response: &str) -> Vec<&str> {
    let head = response
        .split_once("\r\n\r\n")
        .map(|(head, _)| head)
        .expect("response has no header terminator");
    head.split("\r\n").skip(1).collect()
}

/// Assert both isolation headers appear exactly once, COEP directly before COOP,
/// and nothing but hop-by-hop `Connection` follows them.
pub fn assert_isolated_wire(response: &str) {
    let lines = header_lines(response);
    let coep: Vec<usize> = positions(&lines, COEP_LINE);
    let coop: Vec<usize> = positions(&lines, COOP_LINE);
    assert_eq!(coep.len(), 1, "COEP count in:\n{response}");
    assert_eq!(coop.len(), 1, "COOP count in:\n{response}");
    assert_eq!(coop[0], coep[0] + 1, "COOP should follow COEP in:\n{response}");
    for line in &lines[coop[0] + 1..] {
        assert!(
            line.starts_with("Connection:"),
            "{line:?} written after COOP in:\n{response}"
        );
    }
}

fn positions(lines: &[&str], wanted: &str) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| **line == wanted)
        .map(|(i, _)| i)
        .collect()
}
