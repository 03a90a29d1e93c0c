use clap::Parser;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use volley::{
    CompositeSink, Error, JsonFileSink, LogSink, RunConfig, DEFAULT_CONCURRENCY,
    DEFAULT_TOTAL_REQUESTS,
};

const DEFAULT_FILTER: &str = "volley=info";

#[derive(Parser, Debug)]
#[command(version = "0.1", about = "Fire a fixed number of GET requests at a URL in bounded batches")]
struct VolleyCli {
    /// Target URL (http or https)
    #[arg(long, env = "VOLLEY_TARGET_URL")]
    url: Url,

    #[arg(short('n'), long, env = "VOLLEY_TOTAL_REQUESTS", default_value_t = DEFAULT_TOTAL_REQUESTS)]
    requests: usize,

    /// Maximum in-flight requests, and the size of every batch but the last
    #[arg(short, long, env = "VOLLEY_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout, e.g. `500ms` or `10s`
    #[arg(short, long, env = "VOLLEY_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// File the run summary is appended to
    #[arg(short('o'), long, env = "VOLLEY_SUMMARY_FILE", default_value = "./log.json")]
    summary: PathBuf,

    /// Also write logs to this file
    #[arg(long, env = "VOLLEY_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Only log batches and the summary
    #[arg(long)]
    quiet: bool,
}

impl VolleyCli {
    fn run_config(&self) -> RunConfig {
        RunConfig::new(self.url.clone())
            .total_requests(self.requests)
            .concurrency(self.concurrency)
            .timeout(self.timeout)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = VolleyCli::parse();

    // Held until exit so buffered file logs get flushed.
    let _guard = match init_logging(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Unable to initialize logging: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &VolleyCli) -> Result<(), Error> {
    let config = cli.run_config();
    config.validate()?;

    let log = if cli.quiet {
        LogSink::new().quiet()
    } else {
        LogSink::new()
    };
    let sink = CompositeSink::new()
        .with(log)
        .with(JsonFileSink::create(&cli.summary)?);

    let summary = volley::run(config, sink).await?;
    debug!(
        "Finished {} batches in {:?}",
        summary.batches.len(),
        summary.total_duration
    );

    Ok(())
}

fn init_logging(
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| format!("Invalid log file path: {}", path.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
