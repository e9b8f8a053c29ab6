mod bootstrap;
mod headless;

use anyhow::Result;
use clap::Parser;
use ride_core::settings::Settings;
use ride_runtime::driver::RideDriver;
use ride_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();
    let config = settings.ride_config()?;

    // The TUI owns the terminal, so it always logs to a file.
    let log_file = match (&settings.log_file, settings.headless) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => {
            bootstrap::ensure_directories()?;
            Some(bootstrap::default_log_file())
        }
        (None, true) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Ride simulator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        max_seconds = config.max_seconds,
        tick_interval_ms = config.tick_interval_ms,
        headless = settings.headless,
        "configuration loaded"
    );

    let (controller, mut rx, handle) = RideDriver::new(config).start();

    if settings.headless {
        let mut stdout = std::io::stdout().lock();
        let summary =
            headless::run_headless(&controller, &mut rx, settings.ride_seconds, &mut stdout)
                .await?;
        tracing::info!(points = summary.points, co2 = %summary.co2, "headless ride complete");
    } else {
        let app = App::new(&settings.theme, &config);

        // The loop exits on 'q' / Ctrl+C inside the TUI. Ctrl+C at the OS
        // level is handled too, for signals that arrive outside raw mode;
        // dropping the `run` future restores the terminal.
        tokio::select! {
            result = app.run(controller.clone(), rx) => {
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received; shutting down ride driver");
            }
        }
    }

    if controller.shutdown().await.is_err() {
        tracing::debug!("ride driver already stopped");
    }
    handle.join().await;

    Ok(())
}
