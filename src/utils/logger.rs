use chrono::Local;
use eyre::Result;
use fern::Dispatch;
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset or unreadable
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Parses a `RUST_LOG` value, falling back to [`DEFAULT_LEVEL`].
fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|level| level.trim().parse().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Sets up the application logger on stderr, leaving stdout to command output.
///
/// # Errors
/// * If a logger was already installed
pub fn setup_logger() -> Result<()> {
    Dispatch::new()
        .level(level_from(std::env::var("RUST_LOG").ok().as_deref()))
        .chain(std::io::stderr())
        // Format log messages with time and log level
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ));
        })
        .apply()?;
    Ok(())
}
