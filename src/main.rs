//! Heartwise: terminal client for the heart disease risk assessment service.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartwise::adapters::redact::RedactingMakeWriter;
use heartwise::config::Settings;
use heartwise::tui::App;

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    // Logging to the terminal would corrupt the TUI (alternate screen), so an
    // interactive session logs to a file and a piped one logs to stdout.
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if settings.log_mode.use_file(interactive) {
        if let Some(parent) = settings.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Heartwise...");

    let mut app = App::new(&settings)?;
    app.run()?;

    tracing::info!("Heartwise shutdown complete.");
    Ok(())
}
