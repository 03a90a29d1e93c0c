use reqwest::Url;
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;
use volley::RunConfig;

/// Install logging once per test binary and start a fresh mock service on this test's runtime.
#[allow(unused)]
pub async fn init() -> SocketAddr {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("volley=debug,mock_service=debug")
            .with_test_writer()
            .try_init();
    });

    mock_service::spawn().await.unwrap()
}

#[allow(unused)]
pub fn config(addr: SocketAddr, path: &str, total: usize, concurrency: usize) -> RunConfig {
    let url = Url::parse(&format!("http://{addr}{path}")).unwrap();
    RunConfig::new(url)
        .total_requests(total)
        .concurrency(concurrency)
        .timeout(Duration::from_secs(5))
}
