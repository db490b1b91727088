//! # QR Scan Session
//!
//! A scan session owns the camera from the moment it opens until it yields
//! one valid [`MatchDescriptor`] or is closed. Payloads decoded by the camera
//! are fed in with [`ScanSession::submit_payload`].
//!
//! ```text
//!   open ──▶ Scanning ──(valid payload)──▶ Closed  (camera released)
//!               │  ▲
//!               └──┘ invalid payload: error reported, still scanning
//! ```
//!
//! The camera is released on every exit path, including drop.

use touche_core::MatchDescriptor;

use crate::error::ScanError;

/// A camera producing decoded QR payloads.
pub trait PayloadSource {
    /// Whether a camera is present at all.
    fn has_camera(&self) -> bool;
    /// Start capturing.
    fn start(&mut self) -> Result<(), String>;
    /// Stop capturing and give the camera back.
    fn release(&mut self);
}

/// An open scanning session.
#[derive(Debug)]
pub struct ScanSession<P: PayloadSource> {
    source: Option<P>,
}

impl<P: PayloadSource> ScanSession<P> {
    /// Start scanning with `source`.
    pub fn open(mut source: P) -> Result<Self, ScanError> {
        if !source.has_camera() {
            tracing::warn!("scan requested but no camera is present");
            return Err(ScanError::CameraUnavailable);
        }
        if let Err(reason) = source.start() {
            source.release();
            return Err(ScanError::CameraFailed(reason));
        }
        tracing::debug!("scan session opened");
        Ok(Self {
            source: Some(source),
        })
    }

    /// Whether the session still accepts payloads.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Decode one payload.
    ///
    /// A valid descriptor closes the session. A malformed payload is
    /// returned as an error and the session stays open.
    pub fn submit_payload(&mut self, payload: &str) -> Result<MatchDescriptor, ScanError> {
        if self.source.is_none() {
            return Err(ScanError::Closed);
        }
        match MatchDescriptor::from_json(payload) {
            Ok(descriptor) => {
                tracing::info!(match_id = %descriptor.match_id, "match descriptor scanned");
                self.close();
                Ok(descriptor)
            }
            Err(e) => {
                tracing::warn!(error = %e, "invalid match descriptor scanned");
                Err(ScanError::Malformed(e))
            }
        }
    }

    /// Stop scanning and release the camera.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            tracing::debug!("scan session closed");
        }
    }
}

impl<P: PayloadSource> Drop for ScanSession<P> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct FakeCamera {
        missing: bool,
        broken: bool,
        released: Rc<Cell<u32>>,
    }

    impl PayloadSource for FakeCamera {
        fn has_camera(&self) -> bool {
            !self.missing
        }

        fn start(&mut self) -> Result<(), String> {
            if self.broken {
                Err("permission denied".to_string())
            } else {
                Ok(())
            }
        }

        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    const VALID: &str = r#"{
        "matchId": "m-1",
        "player1": "Kim",
        "player2": "Ada",
        "tournamentId": 3,
        "round": 1,
        "submitUrl": "https://t.example/api/matches/m-1/result"
    }"#;

    #[test]
    fn test_valid_payload_closes_and_releases() {
        let released = Rc::new(Cell::new(0));
        let mut scan = ScanSession::open(FakeCamera {
            released: released.clone(),
            ..Default::default()
        })
        .unwrap();

        let descriptor = scan.submit_payload(VALID).unwrap();
        assert_eq!(descriptor.player1, "Kim");
        assert!(!scan.is_open());
        assert_eq!(released.get(), 1);

        assert!(matches!(scan.submit_payload(VALID), Err(ScanError::Closed)));
        drop(scan);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_malformed_payload_keeps_session_open() {
        let released = Rc::new(Cell::new(0));
        let mut scan = ScanSession::open(FakeCamera {
            released: released.clone(),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            scan.submit_payload("not json"),
            Err(ScanError::Malformed(_))
        ));
        assert!(matches!(
            scan.submit_payload(r#"{"matchId":"m-1"}"#),
            Err(ScanError::Malformed(_))
        ));
        assert!(scan.is_open());
        assert_eq!(released.get(), 0);

        assert!(scan.submit_payload(VALID).is_ok());
    }

    #[test]
    fn test_no_camera() {
        let err = ScanSession::open(FakeCamera {
            missing: true,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ScanError::CameraUnavailable));
    }

    #[test]
    fn test_camera_start_failure_releases() {
        let released = Rc::new(Cell::new(0));
        let err = ScanSession::open(FakeCamera {
            broken: true,
            released: released.clone(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ScanError::CameraFailed(_)));
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_drop_releases_open_session() {
        let released = Rc::new(Cell::new(0));
        let scan = ScanSession::open(FakeCamera {
            released: released.clone(),
            ..Default::default()
        })
        .unwrap();
        drop(scan);
        assert_eq!(released.get(), 1);
    }
}
