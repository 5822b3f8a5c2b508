//! Landmark packet receiver
//!
//! Receives one JSON-over-UDP packet per camera frame from the
//! `scripts/landmark_tracker.py` helper, validates it into a [`Frame`], and
//! sends the overlay for that frame back to the helper for drawing.

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

use crate::config::TrackerConfig;
use crate::error::{FacecueError, TrackingError};
use crate::output::overlay::{Overlay, OverlaySink};
use crate::tracking::landmarks::{FaceLandmarks, HandLandmarks, LandmarkPoint};
use crate::tracking::{LandmarkSource, TrackerMessage};

/// A single JSON packet from the tracker helper
#[derive(Debug, Clone, Deserialize)]
pub struct LandmarkPacket {
    /// Frame counter assigned by the helper
    #[serde(default)]
    pub frame: u64,
    /// Frame width in pixels
    #[serde(default)]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default)]
    pub height: u32,
    /// False when the camera read failed for this frame
    #[serde(default = "default_true")]
    pub captured: bool,
    /// Set once when the user closes the display window
    #[serde(default)]
    pub quit: bool,
    /// Face meshes (the helper tracks at most one)
    #[serde(default)]
    pub faces: Vec<Vec<LandmarkPoint>>,
    /// Detected hands
    #[serde(default)]
    pub hands: Vec<HandPacket>,
}

fn default_true() -> bool {
    true
}

/// One hand inside a [`LandmarkPacket`]
#[derive(Debug, Clone, Deserialize)]
pub struct HandPacket {
    #[serde(default)]
    pub handedness: Option<String>,
    pub landmarks: Vec<LandmarkPoint>,
}

/// Validated detection result for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub captured: bool,
    pub faces: Vec<FaceLandmarks>,
    pub hands: Vec<HandLandmarks>,
}

impl Frame {
    /// An empty, successfully captured frame
    pub fn empty(index: u64, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
            captured: true,
            ..Default::default()
        }
    }

    pub fn has_face(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Validate a packet, dropping any landmark set of the wrong size
    pub fn from_packet(packet: LandmarkPacket) -> Self {
        let faces = packet
            .faces
            .into_iter()
            .filter_map(|points| {
                let len = points.len();
                let face = FaceLandmarks::new(points);
                if face.is_none() {
                    tracing::warn!("Dropping face with {} landmarks in frame {}", len, packet.frame);
                }
                face
            })
            .collect();

        let hands = packet
            .hands
            .into_iter()
            .filter_map(|h| {
                let hand = HandLandmarks::new(&h.landmarks, h.handedness);
                if hand.is_none() {
                    tracing::warn!(
                        "Dropping hand with {} landmarks in frame {}",
                        h.landmarks.len(),
                        packet.frame
                    );
                }
                hand
            })
            .collect();

        Self {
            index: packet.frame,
            width: packet.width,
            height: packet.height,
            captured: packet.captured,
            faces,
            hands,
        }
    }
}

/// Decode one datagram
pub fn parse_datagram(buf: &[u8]) -> Result<TrackerMessage, FacecueError> {
    let packet: LandmarkPacket = serde_json::from_slice(buf)
        .map_err(|e| TrackingError::Parse(format!("JSON parse error: {}", e)))?;

    if packet.quit {
        return Ok(TrackerMessage::Quit);
    }

    Ok(TrackerMessage::Frame(Frame::from_packet(packet)))
}

/// Landmark JSON-over-UDP receiver
pub struct LandmarkReceiver {
    config: TrackerConfig,
    socket: Option<UdpSocket>,
    /// Where the helper sends from; overlays go back there
    peer: Option<SocketAddr>,
    buf: Vec<u8>,
}

impl LandmarkReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
            peer: None,
            buf: vec![0u8; 65536],
        }
    }

    /// Bind the UDP socket
    pub async fn start(&mut self) -> Result<(), FacecueError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).await.map_err(|e| {
            TrackingError::Receiver(format!("Failed to bind to {}: {}", addr, e))
        })?;

        tracing::info!("Landmark receiver listening on {}", addr);
        self.socket = Some(socket);

        Ok(())
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Stop the receiver
    pub fn stop(&mut self) {
        self.socket = None;
        self.peer = None;
        tracing::info!("Landmark receiver stopped");
    }
}

impl LandmarkSource for LandmarkReceiver {
    async fn next_message(&mut self) -> Result<Option<TrackerMessage>, FacecueError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => return Ok(None),
        };

        let timeout = Duration::from_millis(self.config.recv_timeout_ms);
        let (size, peer) = match tokio::time::timeout(timeout, socket.recv_from(&mut self.buf)).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => {
                return Err(TrackingError::Receiver(format!("Receive error: {}", e)).into());
            }
            // No packet within the timeout
            Err(_) => return Ok(None),
        };

        self.peer = Some(peer);
        parse_datagram(&self.buf[..size]).map(Some)
    }
}

impl OverlaySink for LandmarkReceiver {
    fn render(&mut self, overlay: &Overlay) -> Result<(), FacecueError> {
        let (socket, peer) = match (&self.socket, self.peer) {
            (Some(s), Some(p)) => (s, p),
            _ => return Ok(()),
        };

        let bytes = serde_json::to_vec(overlay)
            .map_err(|e| TrackingError::Overlay(format!("Serialize error: {}", e)))?;

        match socket.try_send_to(&bytes, peer) {
            Ok(_) => Ok(()),
            // Socket buffer full; the next frame brings a fresh overlay
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(()),
            Err(e) => Err(TrackingError::Overlay(format!("Send to {} failed: {}", peer, e)).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::overlay::{OverlayLine, GREEN};

    fn points(n: usize) -> Vec<[f32; 2]> {
        vec![[0.5, 0.5]; n]
    }

    #[test]
    fn test_parse_frame() {
        let json = serde_json::json!({
            "frame": 7,
            "width": 640,
            "height": 480,
            "faces": [points(478)],
            "hands": [
                {"handedness": "Right", "landmarks": points(21)},
                {"landmarks": points(21)}
            ]
        })
        .to_string();

        match parse_datagram(json.as_bytes()).unwrap() {
            TrackerMessage::Frame(frame) => {
                assert_eq!(frame.index, 7);
                assert_eq!((frame.width, frame.height), (640, 480));
                assert!(frame.captured);
                assert!(frame.has_face());
                assert_eq!(frame.hands.len(), 2);
                assert_eq!(frame.hands[0].handedness(), Some("Right"));
                assert_eq!(frame.hands[1].handedness(), None);
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_frame() {
        let json = r#"{"frame":1,"width":640,"height":480}"#;
        match parse_datagram(json.as_bytes()).unwrap() {
            TrackerMessage::Frame(frame) => {
                assert!(frame.captured);
                assert!(!frame.has_face());
                assert!(frame.hands.is_empty());
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_capture_failure() {
        let json = r#"{"frame":3,"captured":false}"#;
        match parse_datagram(json.as_bytes()).unwrap() {
            TrackerMessage::Frame(frame) => assert!(!frame.captured),
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_quit() {
        let json = r#"{"frame":9,"quit":true}"#;
        assert!(matches!(
            parse_datagram(json.as_bytes()).unwrap(),
            TrackerMessage::Quit
        ));
    }

    #[test]
    fn test_malformed_sets_are_dropped() {
        let json = serde_json::json!({
            "frame": 2,
            "width": 640,
            "height": 480,
            "faces": [points(100)],
            "hands": [{"landmarks": points(20)}, {"landmarks": points(21)}]
        })
        .to_string();

        match parse_datagram(json.as_bytes()).unwrap() {
            TrackerMessage::Frame(frame) => {
                assert!(!frame.has_face());
                assert_eq!(frame.hands.len(), 1);
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_datagram(b"not json"),
            Err(FacecueError::Tracking(TrackingError::Parse(_)))
        ));
    }

    #[tokio::test]
    async fn test_receive_and_reply() {
        let config = TrackerConfig {
            port: 0,
            recv_timeout_ms: 1000,
            ..Default::default()
        };
        let mut receiver = LandmarkReceiver::new(&config);
        receiver.start().await.unwrap();
        let addr = receiver.local_addr().unwrap();

        let helper = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        helper
            .send_to(br#"{"frame":5,"width":320,"height":240}"#, addr)
            .await
            .unwrap();

        match receiver.next_message().await.unwrap() {
            Some(TrackerMessage::Frame(frame)) => assert_eq!(frame.index, 5),
            other => panic!("expected frame, got {:?}", other),
        }

        let overlay = Overlay {
            frame: 5,
            lines: vec![OverlayLine::new("hello", 50, GREEN)],
        };
        receiver.render(&overlay).unwrap();

        let mut buf = [0u8; 1024];
        let (size, _) = helper.recv_from(&mut buf).await.unwrap();
        let echoed: serde_json::Value = serde_json::from_slice(&buf[..size]).unwrap();
        assert_eq!(echoed["frame"], 5);
        assert_eq!(echoed["lines"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn test_receive_timeout_yields_none() {
        let config = TrackerConfig {
            port: 0,
            recv_timeout_ms: 20,
            ..Default::default()
        };
        let mut receiver = LandmarkReceiver::new(&config);
        receiver.start().await.unwrap();

        assert!(receiver.next_message().await.unwrap().is_none());
    }
}
