//! tracing subscriber setup.
//!
//! The filter honours `RUST_LOG` and falls back to the configured level.
//! Output goes to stderr unless a log file is configured; the TUI always
//! configures one so log lines do not land on the alternate screen.

use anyhow::{Context, Result};
use fk_protocol::{LogFormat, LoggingSettings};
use std::env;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter for `settings`, with `RUST_LOG` taking precedence.
pub fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    let directive = env::var("RUST_LOG").unwrap_or_else(|_| settings.level.clone());
    EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = build_filter(settings);
    let to_file = settings.file.is_some();

    let writer = match &settings.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);

    match settings.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(writer);
            registry.with(layer).try_init()?;
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(!to_file)
                .with_writer(writer);
            registry.with(layer).try_init()?;
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(!to_file)
                .with_writer(writer);
            registry.with(layer).try_init()?;
        }
    }

    info!(
        log.level = %settings.level,
        log.format = ?settings.format,
        log.file = ?settings.file,
        "logging initialized"
    );

    Ok(())
}
