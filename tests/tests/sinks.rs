mod utils;
#[allow(unused)]
use utils::*;

use serde_json::Value;
use volley::prelude::*;

#[tokio::test]
async fn summary_file_is_appended_per_run() {
    let addr = mock_service::spawn().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.json");

    for _ in 0..2 {
        let sink = CompositeSink::new()
            .with(LogSink::new().quiet())
            .with(JsonFileSink::create(&path).unwrap());
        volley::run(config(addr, "/status/200/delay/ms/5", 5, 2), sink)
            .await
            .unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let records: Vec<Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);

    for record in records {
        assert!(record["totalRunDuration"].as_u64().is_some());
        assert!(record["averageRequestLatency"].as_f64().unwrap() >= 5.);
        assert_eq!(record["failedRequests"], 0);
        assert_eq!(record["statusCounts"]["200"], 5);

        let batches = record["batches"].as_array().unwrap();
        let counts: Vec<_> = batches
            .iter()
            .map(|b| b["requestCount"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert_eq!(batches[2]["batchNumber"], 3);
        assert!(batches.iter().all(|b| b.get("error").is_none()));
    }
}

#[tracing_test::traced_test]
#[tokio::test]
async fn log_sink_reports_each_request() {
    let addr = mock_service::spawn().await.unwrap();

    volley::run(config(addr, "/status/404/delay/ms/1", 2, 2), LogSink::new())
        .await
        .unwrap();

    assert!(logs_contain("Batch 1 finished in"));
    assert!(logs_contain("Request 1, Status:404, time:"));
    assert!(logs_contain("Request 2, Status:404, time:"));
    assert!(logs_contain("Run complete."));
}
