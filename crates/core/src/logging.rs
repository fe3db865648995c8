use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Where generation runs log to.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log directory; `~/.codemodel/logs` when unset.
    pub dir: Option<PathBuf>,
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
    /// Mirror events to stderr.
    pub to_stderr: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            dir: None,
            default_filter: "info".to_string(),
            to_stderr: false,
        }
    }
}

impl LogOptions {
    fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".codemodel").join("logs")
        })
    }
}

/// Install the global subscriber. Keep the returned guard alive for as long
/// as events should reach the log file.
pub fn init_logging(component: &str, options: &LogOptions) -> WorkerGuard {
    let log_dir = options.log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // One file per component and day, e.g. codemodel.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(&log_dir, format!("{component}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if options.to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .without_time();
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}
