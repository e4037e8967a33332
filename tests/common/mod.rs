//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cert_gate::audit::AuditSink;
use cert_gate::config::GateConfig;
use cert_gate::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A gate running on an ephemeral local port.
pub struct RunningGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningGate {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gate auditing to the configured file.
#[allow(dead_code)]
pub async fn start_gate(config: GateConfig) -> RunningGate {
    let server = HttpServer::new(config).unwrap();
    serve(server).await
}

/// Start a gate auditing to the given sink.
#[allow(dead_code)]
pub async fn start_gate_with_sink(config: GateConfig, sink: Arc<dyn AuditSink>) -> RunningGate {
    let server = HttpServer::with_audit_sink(config, sink).unwrap();
    serve(server).await
}

async fn serve(server: HttpServer) -> RunningGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningGate { addr, shutdown }
}

/// HTTP client that never pools or goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
