//! Output module
//!
//! The observer's side effects: speech, the presence event log, the serial
//! LED and the overlay text. Actions are produced by the frame observer and
//! carried out here, one after another.

pub mod device;
pub mod event_log;
pub mod overlay;
pub mod speech;

pub use device::{DeviceSignal, Indicator, SerialIndicator};
pub use event_log::{CsvEventLog, EventKind, EventLog, LogRecord};
pub use overlay::{Overlay, OverlayLine, OverlaySink};
pub use speech::{NotificationSink, Speaker};

/// A side effect requested by the observer for one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Speak(String),
    Log(LogRecord),
    Signal(Indicator),
}

/// Applies actions to the external collaborators.
///
/// Failures are logged and swallowed: a broken speaker, log file or LED never
/// stops the frame loop.
pub struct Dispatcher<S, L, D> {
    speaker: S,
    log: L,
    device: D,
}

impl<S, L, D> Dispatcher<S, L, D>
where
    S: NotificationSink,
    L: EventLog,
    D: DeviceSignal,
{
    pub fn new(speaker: S, log: L, device: D) -> Self {
        Self {
            speaker,
            log,
            device,
        }
    }

    /// Apply one action, waiting for speech to finish
    pub async fn apply(&mut self, action: Action) {
        match action {
            Action::Speak(text) => {
                tracing::info!("Saying: {}", text);
                if let Err(e) = self.speaker.speak(&text).await {
                    tracing::error!("Speech failed: {}", e);
                }
            }
            Action::Log(record) => {
                if let Err(e) = self.log.append(&record) {
                    tracing::error!("Failed to log {:?}: {}", record.event, e);
                }
            }
            Action::Signal(indicator) => {
                if let Err(e) = self.device.set_indicator(indicator) {
                    tracing::warn!("Indicator update failed: {}", e);
                }
            }
        }
    }

    /// Apply actions in order
    pub async fn apply_all(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.apply(action).await;
        }
    }

    /// Switch the indicator off and hand the collaborators back
    pub fn shutdown(mut self) -> (S, L, D) {
        if let Err(e) = self.device.set_indicator(Indicator::Off) {
            tracing::warn!("Failed to switch indicator off: {}", e);
        }
        (self.speaker, self.log, self.device)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording collaborators for tests

    use super::*;
    use crate::error::{FacecueError, SpeechError};

    #[derive(Debug, Default)]
    pub struct RecordingSpeaker {
        pub spoken: Vec<String>,
        pub fail: bool,
    }

    impl NotificationSink for RecordingSpeaker {
        async fn speak(&mut self, text: &str) -> Result<(), FacecueError> {
            self.spoken.push(text.to_string());
            if self.fail {
                return Err(SpeechError::Failed("exit status: 1".to_string()).into());
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingLog {
        pub records: Vec<LogRecord>,
    }

    impl EventLog for RecordingLog {
        fn append(&mut self, record: &LogRecord) -> Result<(), FacecueError> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingDevice {
        pub signals: Vec<Indicator>,
    }

    impl DeviceSignal for RecordingDevice {
        fn set_indicator(&mut self, indicator: Indicator) -> Result<(), FacecueError> {
            self.signals.push(indicator);
            Ok(())
        }
    }
}
