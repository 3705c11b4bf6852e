use anyhow::{Context, Result};
use inertia_config::AppConfig;
use inertia_core::capture;
use inertia_core::{FusionClient, TickOutput};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Log one observed output, in degrees, for watching a replay scroll by.
fn log_tick(tick: &TickOutput) {
    let euler = tick.relative_orientation.euler().to_degrees();
    debug!(
        index = tick.index,
        yaw = euler.yaw,
        pitch = euler.pitch,
        roll = euler.roll,
        zero_speed = tick.zero_speed_flag(),
        "Tick"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inertia=info,inertia_core=info".into()),
        )
        .init();

    info!("Inertia capture replay starting");

    // Load config.
    let config = inertia_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.replay.capture_path.clone())
        .context("usage: inertia <capture.json> (or set replay.capture_path in config.toml)")?;

    let contents = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading capture {}", path.display()))?;
    let capture = capture::parse_capture(&contents)?;
    info!(?path, samples = capture.samples.len(), missing = capture.missing, "Capture loaded");

    let client = FusionClient::spawn(&config.fusion)?;

    // Watch the stream the way a renderer would: latest value only.
    let mut updates = client.subscribe();
    let observer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            if let Some(tick) = *updates.borrow_and_update() {
                log_tick(&tick);
            }
        }
    });

    for sample in capture.samples {
        if config.replay.realtime && sample.interval > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(sample.interval)).await;
        }
        client.push(sample).await?;
    }

    let summary = client.finish().await?;
    observer.await?;

    match summary.last {
        Some(last) => {
            let euler = last.orientation.euler().to_degrees();
            info!(
                processed = summary.processed,
                rejected = summary.rejected,
                yaw = euler.yaw,
                pitch = euler.pitch,
                roll = euler.roll,
                velocity_x = last.velocity.x,
                velocity_y = last.velocity.y,
                velocity_z = last.velocity.z,
                zero_speed = last.zero_speed_flag(),
                "Replay finished"
            );
        }
        None => warn!(rejected = summary.rejected, "Replay produced no output"),
    }

    Ok(())
}
