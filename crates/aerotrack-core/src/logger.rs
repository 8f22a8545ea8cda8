//! Process-wide log setup for the sender and relay binaries.
//!
//! The command-line level is the default; `RUST_LOG` directives, when set,
//! override it per target. Lines carry the seconds since the logger was
//! installed so frame and datagram timing can be read off the log directly.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::LevelFilter;

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceLock<LevelFilter> = OnceLock::new();

fn builder(level: LevelFilter) -> env_logger::Builder {
    let started = Instant::now();
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:8.3}s {:>5} {}] {}",
                started.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            )
        });
    builder
}

/// Install the `env_logger` backend with `level` as the default filter.
///
/// Returns the level that is in effect: the first successful call wins and
/// later calls keep it.
pub fn init_with_level(level: LevelFilter) -> Result<LevelFilter, log::SetLoggerError> {
    if let Some(active) = INSTALLED.get() {
        return Ok(*active);
    }
    builder(level).try_init()?;
    Ok(*INSTALLED.get_or_init(|| level))
}

/// Install a `tracing` subscriber; spans from the instrumented pipeline and
/// relay stages are reported when they close.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let default = level.to_string().to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let events = FmtSpan::CLOSE;
    let installed = if json {
        fmt()
            .with_env_filter(filter)
            .with_span_events(events)
            .json()
            .flatten_event(true)
            .finish()
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_span_events(events)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
    if installed.is_err() {
        log::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_keeps_first_level() {
        let first = init_with_level(LevelFilter::Debug).unwrap();
        assert_eq!(first, LevelFilter::Debug);
        assert_eq!(init_with_level(LevelFilter::Error).unwrap(), LevelFilter::Debug);
        log::debug!(target: "aerotrack::test", "logger installed");
    }

    #[test]
    fn cli_level_is_the_default_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let mut builder = builder(LevelFilter::Info);
        builder.is_test(true);
        let logger = builder.build();
        assert_eq!(logger.filter(), LevelFilter::Info);
        assert!(logger.matches(
            &log::Record::builder()
                .level(log::Level::Info)
                .target("aerotrack_telemetry::relay")
                .build()
        ));
        assert!(!logger.matches(
            &log::Record::builder()
                .level(log::Level::Debug)
                .target("aerotrack_telemetry::relay")
                .build()
        ));
    }
}
