//! Helpers for running real tiers on ephemeral ports

#![allow(dead_code)]

use axum::Router;
use chaoschain::api::{create_backend_server, create_frontend_server};
use chaoschain::metrics::{InMemorySink, Recorder, TIER_BACKEND, TIER_FRONTEND};
use chaoschain::proxy::{BackendClient, ProxyConfig};
use chaoschain::simulator::{LeakyBucket, Simulator, SimulatorConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub struct TestBackend {
    pub addr: SocketAddr,
    pub bucket: LeakyBucket,
    pub sink: Arc<InMemorySink>,
}

impl TestBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub struct TestFrontend {
    pub addr: SocketAddr,
    pub sink: Arc<InMemorySink>,
}

impl TestFrontend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Simulator settings that keep tests fast
pub fn fast_config() -> SimulatorConfig {
    SimulatorConfig {
        service_name: "integration-backend".to_string(),
        slow_delay: Duration::from_millis(20),
        block_size: 4 * 1024,
        memory_blocks: 20,
        memory_interval: Duration::from_millis(2),
        cpu_burn: Duration::from_millis(100),
    }
}

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

pub async fn spawn_backend(config: SimulatorConfig) -> TestBackend {
    let sink = Arc::new(InMemorySink::new());
    let bucket = LeakyBucket::new();
    let simulator = Simulator::with_bucket(
        config,
        bucket.clone(),
        Recorder::new(TIER_BACKEND, sink.clone()),
    );

    let addr = serve(create_backend_server(simulator)).await;
    TestBackend { addr, bucket, sink }
}

pub fn frontend_router(base_url: &str, timeout: Duration) -> (Router, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let client = BackendClient::new(ProxyConfig::new(base_url).with_timeout(timeout)).unwrap();
    let router = create_frontend_server(client, Recorder::new(TIER_FRONTEND, sink.clone()));
    (router, sink)
}

pub async fn spawn_frontend(base_url: &str, timeout: Duration) -> TestFrontend {
    let (router, sink) = frontend_router(base_url, timeout);
    let addr = serve(router).await;
    TestFrontend { addr, sink }
}

/// Poll until the bucket holds `expected` blocks or the deadline passes
pub async fn wait_for_blocks(bucket: &LeakyBucket, expected: usize, deadline: Duration) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if bucket.len() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    bucket.len() == expected
}
