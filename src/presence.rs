//! Face presence state machine
//!
//! Two states, ABSENT (initial) and PRESENT, driven once per frame by whether
//! the detector reported a face. Only the edges produce events; a `Left`
//! event always carries the `since` instant recorded by its `Entered`.

use std::time::{Duration, Instant};

/// Why a presence session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// The face was no longer detected
    FaceLost,
    /// The process shut down while a face was present
    Shutdown,
}

/// Edge emitted by [`PresenceTracker::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    Entered {
        at: Instant,
    },
    Left {
        since: Instant,
        at: Instant,
        duration: Duration,
        reason: LeaveReason,
    },
}

/// Presence state: `since` is `Some` exactly while a face is present
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    since: Option<Instant>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.since.is_some()
    }

    /// When the current session started
    pub fn since(&self) -> Option<Instant> {
        self.since
    }

    /// Time in frame for the current session, if any
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.since.map(|since| now.saturating_duration_since(since))
    }

    /// Feed one frame's detection result
    pub fn update(&mut self, face_present: bool, now: Instant) -> Option<PresenceEvent> {
        match (self.since, face_present) {
            (None, true) => {
                self.since = Some(now);
                Some(PresenceEvent::Entered { at: now })
            }
            (Some(_), false) => self.leave(now, LeaveReason::FaceLost),
            _ => None,
        }
    }

    /// Close an open session at shutdown
    pub fn finish(&mut self, now: Instant) -> Option<PresenceEvent> {
        self.leave(now, LeaveReason::Shutdown)
    }

    fn leave(&mut self, now: Instant, reason: LeaveReason) -> Option<PresenceEvent> {
        let since = self.since.take()?;
        Some(PresenceEvent::Left {
            since,
            at: now,
            duration: now.saturating_duration_since(since),
            reason,
        })
    }
}
