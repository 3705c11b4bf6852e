pub mod capture;
pub mod filter;
pub mod fusion;
pub mod history;
pub mod math;
pub mod motion;
pub mod pipeline;
pub mod types;

pub use inertia_config::{ConfigError, FusionConfig};
pub use pipeline::MotionPipeline;
pub use types::{EulerAngles, MotionSample, Orientation, SampleError, TickOutput};

use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Samples buffered between the producer and the fusion task.
const SAMPLE_QUEUE_DEPTH: usize = 1024;

/// Messages consumed, in order, by the fusion task.
enum StreamEvent {
    Sample(MotionSample),
    SetZero,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Fusion task has stopped")]
    Closed,
    #[error("Fusion task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Totals reported when a stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamSummary {
    pub processed: u64,
    pub rejected: u64,
    pub last: Option<TickOutput>,
}

/// Client for one sensor stream.
///
/// Owns a background task running its own [`MotionPipeline`]. Samples are
/// processed strictly in push order and the latest output is published for
/// consumers that only care about the current value, such as a renderer.
pub struct FusionClient {
    event_tx: mpsc::Sender<StreamEvent>,
    output_rx: watch::Receiver<Option<TickOutput>>,
    task: tokio::task::JoinHandle<StreamSummary>,
}

impl FusionClient {
    /// Validate the config and start the fusion task.
    pub fn spawn(config: &FusionConfig) -> Result<Self, ConfigError> {
        let pipeline = MotionPipeline::new(config)?;
        let (event_tx, event_rx) = mpsc::channel(SAMPLE_QUEUE_DEPTH);
        let (output_tx, output_rx) = watch::channel(None);

        let task = tokio::spawn(fusion_loop(pipeline, event_rx, output_tx));
        tracing::info!(
            blend = config.complementary_blend_factor,
            window = config.history_window_capacity,
            "Fusion stream started"
        );

        Ok(Self {
            event_tx,
            output_rx,
            task,
        })
    }

    /// Queue a sample, waiting if the task is behind.
    pub async fn push(&self, sample: MotionSample) -> Result<(), ClientError> {
        self.event_tx
            .send(StreamEvent::Sample(sample))
            .await
            .map_err(|_| ClientError::Closed)
    }

    /// Set the orientation at this point in the stream as the zero reference.
    pub async fn set_zero(&self) -> Result<(), ClientError> {
        self.event_tx
            .send(StreamEvent::SetZero)
            .await
            .map_err(|_| ClientError::Closed)
    }

    /// Get the latest output (non-blocking).
    pub fn latest(&self) -> Option<TickOutput> {
        *self.output_rx.borrow()
    }

    /// Receiver notified on every published output.
    pub fn subscribe(&self) -> watch::Receiver<Option<TickOutput>> {
        self.output_rx.clone()
    }

    /// Close the stream and wait for every queued sample to be processed.
    pub async fn finish(self) -> Result<StreamSummary, ClientError> {
        drop(self.event_tx);
        Ok(self.task.await?)
    }
}

/// Background task: drain stream events, run the pipeline, publish outputs.
async fn fusion_loop(
    mut pipeline: MotionPipeline,
    mut event_rx: mpsc::Receiver<StreamEvent>,
    output_tx: watch::Sender<Option<TickOutput>>,
) -> StreamSummary {
    let mut summary = StreamSummary::default();

    while let Some(event) = event_rx.recv().await {
        match event {
            StreamEvent::Sample(sample) => match pipeline.advance(&sample) {
                Ok(output) => {
                    summary.processed += 1;
                    summary.last = Some(output);
                    output_tx.send_replace(Some(output));
                    if summary.processed % 1000 == 0 {
                        tracing::debug!(processed = summary.processed, "Motion samples processed");
                    }
                }
                Err(e) => {
                    summary.rejected += 1;
                    tracing::warn!(%e, rejected = summary.rejected, "Rejected motion sample");
                }
            },
            StreamEvent::SetZero => pipeline.set_zero(),
        }
    }

    tracing::info!(
        processed = summary.processed,
        rejected = summary.rejected,
        "Fusion stream closed"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{angle_between, Quaternion, Vector3};

    fn resting() -> MotionSample {
        MotionSample::new(Vector3::new(0.0, 0.0, 9.8), Vector3::ZERO, 1.0 / 60.0)
    }

    #[tokio::test]
    async fn summary_counts_processed_and_rejected() {
        let client = FusionClient::spawn(&FusionConfig::default()).unwrap();
        for _ in 0..10 {
            client.push(resting()).await.unwrap();
        }
        let bad = MotionSample::new(Vector3::new(f64::INFINITY, 0.0, 0.0), Vector3::ZERO, 0.0);
        client.push(bad).await.unwrap();
        client.push(resting()).await.unwrap();

        let summary = client.finish().await.unwrap();
        assert_eq!(summary.processed, 11);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.last.map(|tick| tick.index), Some(10));
    }

    #[tokio::test]
    async fn latest_output_is_published() {
        let client = FusionClient::spawn(&FusionConfig::default()).unwrap();
        let mut updates = client.subscribe();
        assert!(client.latest().is_none());

        client.push(resting()).await.unwrap();
        updates.changed().await.unwrap();
        let tick = updates.borrow_and_update().expect("output published");
        assert_eq!(tick.index, 0);
        assert_eq!(client.latest().map(|t| t.index), Some(0));
    }

    #[tokio::test]
    async fn set_zero_applies_in_stream_order() {
        let client = FusionClient::spawn(&FusionConfig::default()).unwrap();
        let tilted = MotionSample::new(Vector3::new(0.0, 6.0, 7.0), Vector3::ZERO, 1.0 / 60.0);
        client.push(tilted).await.unwrap();
        client.set_zero().await.unwrap();
        client.push(tilted).await.unwrap();

        let last = client.finish().await.unwrap().last.unwrap();
        assert!(angle_between(last.orientation.quaternion, Quaternion::IDENTITY) > 0.1);
        assert!(angle_between(last.relative_orientation.quaternion, Quaternion::IDENTITY) < 1e-6);
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let config = FusionConfig {
            high_pass_alpha: -0.1,
            ..FusionConfig::default()
        };
        assert!(matches!(
            FusionClient::spawn(&config),
            Err(ConfigError::CoefficientOutOfRange { name: "high_pass_alpha", .. })
        ));
    }
}
