mod utils;
#[allow(unused)]
use utils::*;

use reqwest::{Client, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use volley::prelude::*;
use volley::HttpExecutor;

#[tokio::test]
async fn batch_sizes_follow_concurrency() {
    let addr = init().await;

    let summary = volley::run(config(addr, "/delay/ms/1", 10, 3), NullSink)
        .await
        .unwrap();

    let sizes: Vec<_> = summary.batches.iter().map(|b| b.outcomes.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);
    assert!(summary.batches.iter().all(|b| !b.failed));
    assert_eq!(summary.status_counts.get(&200), Some(&10));
    assert_eq!(summary.error_rate, 0.);
}

#[tokio::test]
async fn error_statuses_are_recorded_as_is() {
    let addr = init().await;

    let summary = volley::run(config(addr, "/status/500/delay/ms/50", 5, 5), NullSink)
        .await
        .unwrap();

    assert_eq!(summary.batches.len(), 1);
    let outcomes = &summary.batches[0].outcomes;
    assert_eq!(outcomes.len(), 5);
    for outcome in outcomes {
        assert_eq!(outcome.status, 500);
        assert!(outcome.failure.is_none());
        assert!(outcome.elapsed >= Duration::from_millis(50));
        assert!(outcome.elapsed < Duration::from_secs(1));
    }
    assert!(summary.average_request_latency >= Duration::from_millis(50));
    assert!(summary.average_request_latency < Duration::from_secs(1));
    assert_eq!(summary.failed_requests, 0);
}

#[tokio::test]
async fn unresponsive_target_times_out() {
    let addr = init().await;
    let timeout = Duration::from_millis(100);

    let summary = volley::run(config(addr, "/hang", 2, 2).timeout(timeout), NullSink)
        .await
        .unwrap();

    assert_eq!(summary.batches.len(), 1);
    let batch = &summary.batches[0];
    assert!(!batch.failed);
    for outcome in &batch.outcomes {
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.elapsed, Duration::ZERO);
        assert_eq!(outcome.failure, Some(Failure::Timeout));
    }
    assert!(batch.duration >= timeout);
    assert!(batch.duration < Duration::from_secs(1));
    assert_eq!(summary.average_request_latency, Duration::ZERO);
    assert_eq!(summary.error_rate, 1.);
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let addr = init().await;

    let summary = volley::run(config(addr, "/text/delay/ms/20", 2, 1), NullSink)
        .await
        .unwrap();

    assert_eq!(summary.batches.len(), 2);
    for batch in &summary.batches {
        let outcome = &batch.outcomes[0];
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.failure, Some(Failure::Decode));
        assert!(outcome.elapsed >= Duration::from_millis(20));
    }
    assert_eq!(summary.failed_requests, 2);
}

#[tokio::test]
async fn refused_connection_is_a_transport_failure() {
    let _ = init().await;
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let summary = volley::run(config(addr, "/", 3, 3), NullSink)
        .await
        .unwrap();

    assert_eq!(summary.batches.len(), 1);
    for outcome in &summary.batches[0].outcomes {
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.elapsed, Duration::ZERO);
        assert_eq!(outcome.failure, Some(Failure::Transport));
        assert!(outcome.detail.is_some());
    }
}

#[tokio::test]
async fn timeout_only_affects_its_own_request() {
    let addr = init().await;
    let timeout = Duration::from_millis(200);
    let url = |path: &str| Url::parse(&format!("http://{addr}{path}")).unwrap();

    let client = Client::new();
    let hang = HttpExecutor::new(client.clone(), url("/hang"), timeout);
    let quick = HttpExecutor::new(client, url("/status/200/delay/ms/10"), timeout);

    // Every third request goes to the route that never answers.
    let counter = Arc::new(AtomicUsize::new(0));
    let request = move || {
        let executor = if counter.fetch_add(1, Ordering::SeqCst) % 3 == 0 {
            hang.clone()
        } else {
            quick.clone()
        };
        async move { executor.execute().await }
    };

    let config = config(addr, "/", 6, 3).timeout(timeout);
    let summary = Orchestrator::new(config, request)
        .unwrap()
        .run(NullSink)
        .await;

    assert_eq!(summary.batches.len(), 2);
    for batch in &summary.batches {
        assert!(!batch.failed);
        assert_eq!(batch.outcomes[0], RequestOutcome::timed_out());
        for outcome in &batch.outcomes[1..] {
            assert_eq!(outcome.status, 200);
            assert!(outcome.elapsed >= Duration::from_millis(10));
            assert!(outcome.elapsed < timeout);
        }
        assert!(batch.duration >= timeout);
        assert!(batch.duration < Duration::from_secs(1));
    }
    assert_eq!(summary.failed_requests, 2);
    assert_eq!(summary.status_counts.get(&200), Some(&4));
}

#[tokio::test]
async fn repeated_runs_have_same_structure() {
    let addr = init().await;
    let shape = |summary: &RunSummary| {
        summary
            .batches
            .iter()
            .map(|b| (b.size, b.failed, b.outcomes.iter().map(|o| o.status).collect()))
            .collect::<Vec<(usize, bool, Vec<u16>)>>()
    };

    let first = volley::run(config(addr, "/status/201/delay/ms/2", 7, 3), NullSink)
        .await
        .unwrap();
    let second = volley::run(config(addr, "/status/201/delay/ms/2", 7, 3), NullSink)
        .await
        .unwrap();

    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first.batches.len(), 3);
}

#[tokio::test]
async fn invalid_config_is_a_setup_error() {
    let addr = init().await;

    let res = volley::run(config(addr, "/delay/ms/1", 2, 5), NullSink).await;

    assert!(matches!(
        res,
        Err(volley::Error::Config(ConfigError::ConcurrencyExceedsTotal { .. }))
    ));
}
