//! Hand gesture recognition
//!
//! Gestures are matched against an ordered rule table; the first rule whose
//! predicate holds wins. Several rules can hold for the same hand (a raised
//! thumb with the other fingers above the wrist is both a thumbs up and an
//! open hand), so the table order is the tie-break.

use crate::tracking::landmarks::{hand, HandLandmarks};

/// Recognized gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    ThumbsUp,
    OpenHand,
    PeaceSign,
}

impl Gesture {
    /// Label used for overlay text and speech
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "Thumbs Up",
            Self::OpenHand => "Open Hand",
            Self::PeaceSign => "Peace Sign",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

type Rule = (Gesture, fn(&HandLandmarks) -> bool);

/// Rules in priority order
const RULES: [Rule; 3] = [
    (Gesture::ThumbsUp, thumbs_up),
    (Gesture::OpenHand, open_hand),
    (Gesture::PeaceSign, peace_sign),
];

/// Classify one hand, or `None` if no rule matches
pub fn recognize_gesture(hand: &HandLandmarks) -> Option<Gesture> {
    RULES
        .iter()
        .find(|(_, matches)| matches(hand))
        .map(|(gesture, _)| *gesture)
}

/// Thumb tip above its IP joint, the four other tips below that joint
fn thumbs_up(h: &HandLandmarks) -> bool {
    let thumb_ip = h.thumb_ip().y;
    let [thumb, fingers @ ..] = h.fingertips();

    thumb.y < thumb_ip && fingers.iter().all(|tip| tip.y > thumb_ip)
}

/// All five tips above the wrist
fn open_hand(h: &HandLandmarks) -> bool {
    let wrist = h.wrist().y;
    h.fingertips().iter().all(|tip| tip.y < wrist)
}

/// Index and middle extended, ring and pinky curled
fn peace_sign(h: &HandLandmarks) -> bool {
    let extended = |tip: usize, knuckle: usize| h.point(tip).y < h.point(knuckle).y;
    let curled = |tip: usize, knuckle: usize| h.point(tip).y > h.point(knuckle).y;

    extended(hand::INDEX_TIP, hand::INDEX_MCP)
        && extended(hand::MIDDLE_TIP, hand::MIDDLE_MCP)
        && curled(hand::RING_TIP, hand::RING_MCP)
        && curled(hand::PINKY_TIP, hand::PINKY_MCP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmarks::LandmarkPoint;

    /// Build a hand from `(index, y)` overrides on top of a flat hand at y = 0.5
    fn hand_with(ys: &[(usize, f32)]) -> HandLandmarks {
        let mut points = [LandmarkPoint::new(0.5, 0.5); hand::POINTS];
        for &(i, y) in ys {
            points[i].y = y;
        }
        HandLandmarks::new(&points, None).unwrap()
    }

    /// Knuckles-up fist: every tip below its knuckle and below the wrist
    fn fist() -> HandLandmarks {
        hand_with(&[
            (hand::WRIST, 0.4),
            (hand::THUMB_IP, 0.50),
            (hand::THUMB_TIP, 0.55),
            (hand::INDEX_MCP, 0.45),
            (hand::INDEX_TIP, 0.48),
            (hand::MIDDLE_MCP, 0.45),
            (hand::MIDDLE_TIP, 0.48),
            (hand::RING_MCP, 0.45),
            (hand::RING_TIP, 0.48),
            (hand::PINKY_MCP, 0.45),
            (hand::PINKY_TIP, 0.48),
        ])
    }

    #[test]
    fn test_thumbs_up() {
        let h = hand_with(&[
            (hand::WRIST, 0.5),
            (hand::THUMB_IP, 0.4),
            (hand::THUMB_TIP, 0.3),
            (hand::INDEX_TIP, 0.6),
            (hand::MIDDLE_TIP, 0.6),
            (hand::RING_TIP, 0.6),
            (hand::PINKY_TIP, 0.6),
        ]);
        assert_eq!(recognize_gesture(&h), Some(Gesture::ThumbsUp));
    }

    #[test]
    fn test_thumbs_up_wins_over_open_hand() {
        // Curled fingers still sit above the wrist, so open hand also holds
        let h = hand_with(&[
            (hand::WRIST, 0.9),
            (hand::THUMB_IP, 0.4),
            (hand::THUMB_TIP, 0.3),
            (hand::INDEX_TIP, 0.6),
            (hand::MIDDLE_TIP, 0.6),
            (hand::RING_TIP, 0.6),
            (hand::PINKY_TIP, 0.6),
        ]);
        assert!(thumbs_up(&h));
        assert!(open_hand(&h));
        assert_eq!(recognize_gesture(&h), Some(Gesture::ThumbsUp));
    }

    #[test]
    fn test_open_hand() {
        let h = hand_with(&[
            (hand::WRIST, 0.9),
            (hand::THUMB_IP, 0.5),
            (hand::THUMB_TIP, 0.45),
            (hand::INDEX_TIP, 0.2),
            (hand::MIDDLE_TIP, 0.15),
            (hand::RING_TIP, 0.2),
            (hand::PINKY_TIP, 0.3),
        ]);
        assert!(!thumbs_up(&h));
        assert_eq!(recognize_gesture(&h), Some(Gesture::OpenHand));
    }

    #[test]
    fn test_peace_sign() {
        // Wrist above the tips so the open-hand rule cannot match
        let h = hand_with(&[
            (hand::WRIST, 0.1),
            (hand::THUMB_IP, 0.5),
            (hand::THUMB_TIP, 0.55),
            (hand::INDEX_MCP, 0.5),
            (hand::INDEX_TIP, 0.3),
            (hand::MIDDLE_MCP, 0.5),
            (hand::MIDDLE_TIP, 0.3),
            (hand::RING_MCP, 0.5),
            (hand::RING_TIP, 0.6),
            (hand::PINKY_MCP, 0.5),
            (hand::PINKY_TIP, 0.6),
        ]);
        assert_eq!(recognize_gesture(&h), Some(Gesture::PeaceSign));
    }

    #[test]
    fn test_fist_is_no_gesture() {
        assert_eq!(recognize_gesture(&fist()), None);
    }

    #[test]
    fn test_flat_hand_is_no_gesture() {
        // Every comparison is strict, so identical heights match nothing
        let h = hand_with(&[]);
        assert_eq!(recognize_gesture(&h), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Gesture::ThumbsUp.to_string(), "Thumbs Up");
        assert_eq!(Gesture::OpenHand.label(), "Open Hand");
        assert_eq!(Gesture::PeaceSign.label(), "Peace Sign");
    }
}
