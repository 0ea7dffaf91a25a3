//! Concurrent stress tests
//!
//! Many memory stresses and resets hitting the shared bucket at once

use super::support::{fast_config, spawn_backend, wait_for_blocks};
use chaoschain::metrics::{InMemorySink, Recorder, TIER_BACKEND};
use chaoschain::simulator::{Simulator, StressKind};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn simulator() -> Arc<Simulator> {
    let recorder = Recorder::new(TIER_BACKEND, Arc::new(InMemorySink::new()));
    Arc::new(Simulator::new(fast_config(), recorder))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_memory_stress_appends_every_block() {
    let simulator = simulator();
    let start = Instant::now();

    let handles: Vec<_> = (0..10)
        .map(|_| simulator.stress(&StressKind::Memory).unwrap().handle)
        .collect();

    for result in join_all(handles).await {
        result.unwrap();
    }

    println!("✓ 10 concurrent memory stresses in {:?}", start.elapsed());
    assert_eq!(simulator.bucket().len(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reset_after_any_sequence_empties_bucket() {
    let simulator = simulator();

    for round in 1..=3 {
        let handles: Vec<_> = (0..round)
            .map(|_| simulator.stress(&StressKind::Memory).unwrap().handle)
            .collect();
        join_all(handles).await;

        assert_eq!(simulator.bucket().len(), 20 * round);
        simulator.reset();
        assert!(simulator.bucket().is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reset_racing_memory_stress() {
    let simulator = simulator();

    let handles: Vec<_> = (0..4)
        .map(|_| simulator.stress(&StressKind::Memory).unwrap().handle)
        .collect();

    // Clear while appends are in flight; later appends land in the emptied bucket
    tokio::time::sleep(Duration::from_millis(10)).await;
    let released = simulator.reset();

    join_all(handles).await;
    let remaining = simulator.bucket().len();

    println!("✓ reset released {released} blocks, {remaining} appended afterwards");
    assert_eq!(released + remaining, 80);

    simulator.reset();
    assert!(simulator.bucket().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_server_stays_responsive_during_stress() {
    let backend = spawn_backend(fast_config()).await;
    let client = reqwest::Client::new();

    let requests = (0..8).map(|i| {
        let client = client.clone();
        let url = if i % 2 == 0 {
            format!("{}/stress/memory", backend.url())
        } else {
            format!("{}/stress/cpu", backend.url())
        };
        async move { client.post(url).send().await.unwrap().status() }
    });

    for status in join_all(requests).await {
        assert_eq!(status, reqwest::StatusCode::ACCEPTED);
    }

    let start = Instant::now();
    let health = client
        .get(format!("{}/health", backend.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    assert!(start.elapsed() < Duration::from_secs(1));

    assert!(wait_for_blocks(&backend.bucket, 80, Duration::from_secs(5)).await);
}
