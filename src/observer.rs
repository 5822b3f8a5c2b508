//! Per-frame observer
//!
//! Turns each validated [`Frame`] into the actions it triggers and the
//! overlay drawn on it. Holds everything that persists between frames:
//! presence state, the previous smile and the last gesture per hand. No I/O
//! happens here; the caller passes the clock in and dispatches the actions.

use chrono::Local;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::Instant;

use crate::classify::{recognize_gesture, ExpressionClassifier, Gesture};
use crate::config::Config;
use crate::output::overlay::{self, Overlay, OverlayLine};
use crate::output::{Action, EventKind, Indicator, LogRecord};
use crate::presence::{LeaveReason, PresenceEvent, PresenceTracker};
use crate::tracking::Frame;

/// Which behaviours are on, and what they say
#[derive(Debug, Clone)]
pub struct ObserverSettings {
    pub expression: bool,
    pub gesture: bool,
    pub presence: bool,
    pub smile_threshold: f32,
    pub smile_message: String,
    pub greetings: Vec<String>,
}

impl From<&Config> for ObserverSettings {
    fn from(config: &Config) -> Self {
        Self {
            expression: config.expression.enabled,
            gesture: config.gesture.enabled,
            presence: config.presence.enabled,
            smile_threshold: config.expression.smile_threshold,
            smile_message: config.expression.message.clone(),
            greetings: config.presence.messages.clone(),
        }
    }
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Result of observing one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Side effects, in the order they must run
    pub actions: Vec<Action>,
    pub overlay: Overlay,
}

pub struct Observer {
    settings: ObserverSettings,
    classifier: ExpressionClassifier,
    presence: PresenceTracker,
    previous_smile: bool,
    /// Last recognised gesture per hand; not cleared by gesture-less frames
    last_gestures: HashMap<String, Gesture>,
    rng: StdRng,
}

impl Observer {
    pub fn new(settings: ObserverSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: ObserverSettings, rng: StdRng) -> Self {
        Self {
            classifier: ExpressionClassifier::new(settings.smile_threshold),
            settings,
            presence: PresenceTracker::new(),
            previous_smile: false,
            last_gestures: HashMap::new(),
            rng,
        }
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Observe one frame at time `now`
    pub fn observe(&mut self, frame: &Frame, now: Instant) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            actions: Vec::new(),
            overlay: Overlay::new(frame.index),
        };

        // A failed camera read says nothing about who is in front of it
        if !frame.captured {
            return outcome;
        }

        if self.settings.presence {
            self.observe_presence(frame, now, &mut outcome);
        }
        if self.settings.expression {
            self.observe_expression(frame, &mut outcome);
        }
        if self.settings.gesture {
            self.observe_gestures(frame, &mut outcome);
        }

        outcome
    }

    /// Close an open presence session; called once at shutdown
    pub fn finish(&mut self, now: Instant) -> Vec<Action> {
        match self.presence.finish(now) {
            Some(event) => self.presence_actions(event),
            None => Vec::new(),
        }
    }

    fn observe_presence(&mut self, frame: &Frame, now: Instant, outcome: &mut FrameOutcome) {
        if let Some(event) = self.presence.update(frame.has_face(), now) {
            let actions = self.presence_actions(event);
            outcome.actions.extend(actions);
        }

        if let Some(elapsed) = self.presence.elapsed(now) {
            // The timer takes the top row when there is no smile banner
            let row = if self.settings.expression {
                overlay::TIMER_ROW
            } else {
                overlay::EXPRESSION_ROW
            };
            outcome.overlay.push(OverlayLine::new(
                format!("Time in Frame: {}s", elapsed.as_secs()),
                row,
                overlay::GREEN,
            ));
        }
    }

    fn presence_actions(&mut self, event: PresenceEvent) -> Vec<Action> {
        match event {
            PresenceEvent::Entered { .. } => {
                tracing::info!("Face detected, timer started");
                let mut actions = vec![Action::Signal(Indicator::Active)];
                if let Some(greeting) = self.settings.greetings.choose(&mut self.rng) {
                    actions.push(Action::Speak(greeting.clone()));
                }
                actions
            }
            PresenceEvent::Left {
                duration, reason, ..
            } => {
                let event = match reason {
                    LeaveReason::FaceLost => EventKind::FaceLeft,
                    LeaveReason::Shutdown => EventKind::TrackingEnded,
                };
                tracing::info!(
                    "{}, total time in frame: {}s",
                    event.label(),
                    duration.as_secs()
                );
                vec![
                    Action::Signal(Indicator::Off),
                    Action::Log(LogRecord {
                        timestamp: Local::now(),
                        event,
                        duration_secs: duration.as_secs(),
                    }),
                ]
            }
        }
    }

    fn observe_expression(&mut self, frame: &Frame, outcome: &mut FrameOutcome) {
        let Some(face) = frame.faces.first() else {
            return;
        };

        let smiling = self
            .classifier
            .is_smiling(face, frame.width as f32, frame.height as f32);

        if smiling {
            outcome.overlay.push(OverlayLine::new(
                "You look happy!",
                overlay::EXPRESSION_ROW,
                overlay::GREEN,
            ));
            if !self.previous_smile {
                outcome
                    .actions
                    .push(Action::Speak(self.settings.smile_message.clone()));
            }
        } else {
            outcome.overlay.push(OverlayLine::new(
                "Neutral expression",
                overlay::EXPRESSION_ROW,
                overlay::RED,
            ));
        }

        self.previous_smile = smiling;
    }

    fn observe_gestures(&mut self, frame: &Frame, outcome: &mut FrameOutcome) {
        let mut labels = Vec::new();

        for (i, hand) in frame.hands.iter().enumerate() {
            let Some(gesture) = recognize_gesture(hand) else {
                continue;
            };
            labels.push(gesture.label());

            let key = hand
                .handedness()
                .map(str::to_string)
                .unwrap_or_else(|| format!("hand{}", i));

            if self.last_gestures.insert(key, gesture) != Some(gesture) {
                tracing::debug!("Gesture changed to {} on hand {}", gesture, i);
                outcome
                    .actions
                    .push(Action::Speak(format!("{} detected!", gesture)));
            }
        }

        if !labels.is_empty() {
            outcome.overlay.push(OverlayLine::new(
                labels.join(", "),
                overlay::GESTURE_ROW,
                overlay::MAGENTA,
            ));
        }
    }
}
