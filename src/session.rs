//! The frame loop
//!
//! receive → observe → dispatch → render, one frame at a time, until the
//! user quits, a shutdown signal arrives, or the tracker goes away.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::TrackerConfig;
use crate::observer::Observer;
use crate::output::{DeviceSignal, Dispatcher, EventLog, NotificationSink, OverlaySink};
use crate::tracking::{LandmarkSource, TrackerMessage, TrackerSubprocess};

/// Loop behaviour taken from the tracker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub stop_on_capture_failure: bool,
    pub auto_restart: bool,
    pub restart_delay: Duration,
}

impl From<&TrackerConfig> for RunOptions {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            stop_on_capture_failure: config.stop_on_capture_failure,
            auto_restart: config.auto_restart,
            restart_delay: Duration::from_secs(config.restart_delay_secs),
        }
    }
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `q` pressed in the display window
    Quit,
    /// Ctrl+C / SIGTERM
    Signal,
    /// Camera read failed with `stop_on_capture_failure` set
    CaptureFailed,
    /// The tracker subprocess exited and is not restarted
    TrackerExited,
}

/// Run the frame loop.
///
/// On return the observer's open presence session (if any) has been closed
/// and its actions dispatched.
pub async fn run<Src, S, L, D, F>(
    source: &mut Src,
    observer: &mut Observer,
    dispatcher: &mut Dispatcher<S, L, D>,
    mut subprocess: Option<&mut TrackerSubprocess>,
    options: RunOptions,
    shutdown: F,
) -> StopReason
where
    Src: LandmarkSource + OverlaySink,
    S: NotificationSink,
    L: EventLog,
    D: DeviceSignal,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let reason = loop {
        let received = tokio::select! {
            biased;
            _ = &mut shutdown => break StopReason::Signal,
            received = source.next_message() => received,
        };

        match received {
            Ok(Some(TrackerMessage::Quit)) => {
                tracing::info!("Quit requested from the display window");
                break StopReason::Quit;
            }
            Ok(Some(TrackerMessage::Frame(frame))) => {
                if !frame.captured {
                    tracing::debug!("No frame captured (frame {})", frame.index);
                    if options.stop_on_capture_failure {
                        tracing::warn!("Camera read failed, stopping");
                        break StopReason::CaptureFailed;
                    }
                    continue;
                }

                let outcome = observer.observe(&frame, Instant::now());
                dispatcher.apply_all(outcome.actions).await;

                if let Err(e) = source.render(&outcome.overlay) {
                    tracing::debug!("Overlay not delivered: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Landmark receive error: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }

        // Check subprocess health and auto-restart if needed
        if let Some(sp) = subprocess.as_deref_mut() {
            if !sp.is_running() {
                if !options.auto_restart {
                    tracing::warn!("Tracker subprocess is not running");
                    break StopReason::TrackerExited;
                }
                tracing::info!(
                    "Tracker subprocess not running, restarting in {}s",
                    options.restart_delay.as_secs()
                );
                tokio::time::sleep(options.restart_delay).await;
                if let Err(e) = sp.start() {
                    tracing::error!("Failed to restart tracker: {}", e);
                    break StopReason::TrackerExited;
                }
            }
        }
    };

    let closing = observer.finish(Instant::now());
    dispatcher.apply_all(closing).await;

    reason
}
