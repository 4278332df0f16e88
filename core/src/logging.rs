//! tracing setup for the server and the REPL client.
//!
//! Each binary picks a [`LogPolicy`]. Logs always go to a size-rotated file
//! under the config dir; `RUST_LOG` replaces the policy's filter when set.

use std::path::{Path, PathBuf};

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use timer_sounds_types::APP_NAME;

const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Where and how much a binary logs
#[derive(Debug, Clone, Copy)]
pub struct LogPolicy {
    /// File stem of the log file
    pub name: &'static str,
    /// Mirror the file output on stdout
    pub stdout: bool,
    /// Filter used when `RUST_LOG` is unset
    pub directive: &'static str,
    /// Filter for the stderr fallback when no log file can be opened
    pub fallback_directive: &'static str,
}

impl LogPolicy {
    /// Request traces from tower-http are emitted at debug, so they are let through.
    pub const SERVER: Self = Self {
        name: "server",
        stdout: true,
        directive: "info,tower_http=debug",
        fallback_directive: "info,tower_http=debug",
    };

    /// The terminal belongs to the prompt. Audio decoding and HTTP internals
    /// are only interesting when something breaks.
    pub const CLIENT: Self = Self {
        name: "client",
        stdout: false,
        directive: "info,reqwest=warn,hyper_util=warn,symphonia=warn",
        fallback_directive: "warn",
    };

    fn filter(&self, directive: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit or
/// buffered lines are lost. `None` means the file could not be opened and
/// output went to stderr instead.
pub fn init(policy: LogPolicy) -> Option<WorkerGuard> {
    let (appender, log_path) = match open_log_file(policy.name) {
        Ok(opened) => opened,
        Err(reason) => {
            init_stderr(policy);
            tracing::warn!(%reason, "file logging unavailable");
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = policy.stdout.then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(policy.filter(policy.directive))
        .init();

    tracing::info!(log_file = %log_path.display(), "{} logging initialized", policy.name);
    Some(guard)
}

fn open_log_file(name: &str) -> Result<(BasicRollingFileAppender, PathBuf), String> {
    let dir = dirs::config_dir()
        .map(|config| config.join(APP_NAME))
        .ok_or("no config directory")?;
    std::fs::create_dir_all(&dir).map_err(|e| format!("{}: {e}", dir.display()))?;

    let path = log_path(&dir, name);
    let appender =
        BasicRollingFileAppender::new(&path, RollingConditionBasic::new().max_size(MAX_LOG_BYTES), 1)
            .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((appender, path))
}

fn log_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.log"))
}

fn init_stderr(policy: LogPolicy) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(policy.filter(policy.fallback_directive))
        .init();
}
