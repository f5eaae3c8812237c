//! Logging and observability
//!
//! tracing-subscriber setup with either text or JSON formatting, selected
//! by CLI flag or the `ROLEBOX_LOG_FORMAT` environment variable. The filter
//! comes from `ROLEBOX_LOG`, falling back to `RUST_LOG`, then `info`.
//!
//! All logging output is directed to stderr: stdout belongs to the child
//! processes the tool drives and to command output.

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format specification.
///
/// Safe to call multiple times; subsequent calls are no-ops. Supported
/// formats: `"json"` for structured output, anything else for text.
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var("ROLEBOX_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter based on environment variables
fn create_env_filter() -> EnvFilter {
    if let Ok(spec) = std::env::var("ROLEBOX_LOG") {
        EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check if logging has been initialized
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
