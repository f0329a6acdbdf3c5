//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;

use spa_server::config::{ServerConfig, TlsConfig};
use spa_server::http::{HttpServer, ServerError};
use spa_server::lifecycle::Shutdown;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const INDEX: &str = "<!doctype html><main id=\"app\"></main>";
pub const NOT_FOUND: &str = "<h1>Not here</h1>";
pub const SCRIPT: &str = "console.log('app')";

/// A server running on an ephemeral port over a temporary public directory.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServerError>>,
    pub root: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Write a small site: index page, not-found page and one script.
pub fn write_site(root: &Path) {
    std::fs::write(root.join("index.html"), INDEX).unwrap();
    std::fs::write(root.join("404.html"), NOT_FOUND).unwrap();
    std::fs::create_dir_all(root.join("js")).unwrap();
    std::fs::write(root.join("js").join("app.js"), SCRIPT).unwrap();
}

/// Start a plain HTTP server. `configure` may adjust the config before startup.
pub async fn start_server<F>(configure: F) -> TestServer
where
    F: FnOnce(&mut ServerConfig),
{
    let root = tempfile::tempdir().unwrap();
    write_site(root.path());

    let mut config = ServerConfig::default();
    config.static_files.root = root.path().to_path_buf();
    configure(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.clone();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
        root,
    }
}

/// Client that neither follows redirects nor uses system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Client for the HTTPS listener. Trusts the self-signed test certificate.
#[allow(dead_code)]
pub fn tls_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap()
}

/// Write a self-signed certificate pair for `localhost` into `dir`.
#[allow(dead_code)]
pub fn self_signed(dir: &Path) -> TlsConfig {
    install_crypto_provider();

    let names = vec!["localhost".to_string(), "127.0.0.1".to_string()];
    let certified = rcgen::generate_simple_self_signed(names).unwrap();
    let cert_path = dir.join("certificate.crt");
    let key_path = dir.join("certificate.key");
    std::fs::write(&cert_path, certified.cert.pem()).unwrap();
    std::fs::write(&key_path, certified.key_pair.serialize_pem()).unwrap();

    TlsConfig {
        cert_path,
        key_path,
    }
}

/// Reserve a local port for a listener the server binds itself.
#[allow(dead_code)]
pub fn free_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Retry `url` until the listener behind it accepts connections.
#[allow(dead_code)]
pub async fn wait_for(client: &reqwest::Client, url: &str) -> reqwest::Response {
    for _ in 0..50 {
        if let Ok(res) = client.get(url).send().await {
            return res;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("{} never became reachable", url);
}

fn install_crypto_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}
