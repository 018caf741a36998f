use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;

/// Where log lines go for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink<'a> {
    /// The dashboard owns the terminal, so logs are written to a file.
    File(&'a Path),
    Stderr,
}

/// Picks the filter: `RUST_LOG` wins, then `--debug`, then `info`.
pub fn env_filter(debug: bool) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::new("info")
    }
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole run or buffered file output is lost on exit.
pub fn init_tracing(sink: LogSink<'_>, debug: bool) -> Option<WorkerGuard> {
    let filter = env_filter(debug);

    match sink {
        LogSink::File(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map_or_else(|| "chuva-alerta.log".into(), |name| name.to_os_string());

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let installed = tracing_subscriber::fmt()
                .with_target(true)
                .with_ansi(false)
                .with_env_filter(filter)
                .with_writer(writer)
                .try_init()
                .is_ok();

            installed.then_some(guard)
        }
        LogSink::Stderr => {
            // A second init (tests, embedding) keeps the existing subscriber
            tracing_subscriber::fmt()
                .with_target(true)
                .with_ansi(atty::is(atty::Stream::Stderr))
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .compact()
                .try_init()
                .ok();
            None
        }
    }
}
