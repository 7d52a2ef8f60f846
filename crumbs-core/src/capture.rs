use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A still frame encoded as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    /// MIME type embedded in the data URL, e.g. `image/jpeg`.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.data_url.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end])
    }

    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("camera access was denied: {0}")]
    PermissionDenied(String),
    #[error("camera is unavailable: {0}")]
    Unavailable(String),
    #[error("no live video frame to capture")]
    NoFrame,
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

/// Live camera feed that can produce stills on demand.
pub trait CaptureSurface {
    /// Begin streaming. Permission prompts may resolve later; a denial then
    /// shows up as an absent feed rather than an error here.
    ///
    /// # Errors
    ///
    /// Returns an error when no camera API is available at all.
    fn start_capture(&mut self) -> Result<(), CaptureError>;

    /// Grab the current frame.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoFrame`] when the feed has no frame yet.
    fn take_snapshot(&mut self) -> Result<Snapshot, CaptureError>;

    /// Stop every track of the feed. Harmless when not streaming.
    fn stop_capture(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Closed,
    Live,
    Captured(Snapshot),
}

/// Camera screen flow: preview, shutter, then retake or accept.
#[derive(Debug, Clone)]
pub struct CaptureFlow<S> {
    surface: S,
    state: CaptureState,
}

impl<S: CaptureSurface> CaptureFlow<S> {
    pub const fn new(surface: S) -> Self {
        Self {
            surface,
            state: CaptureState::Closed,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CaptureState {
        &self.state
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Start the preview. Does nothing if a preview or still is already showing.
    ///
    /// # Errors
    ///
    /// Propagates the surface error and stays closed.
    pub fn open(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Closed {
            return Ok(());
        }
        if let Err(err) = self.surface.start_capture() {
            log::error!("error accessing camera: {err}");
            return Err(err);
        }
        self.state = CaptureState::Live;
        Ok(())
    }

    /// Take a still and stop the feed.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoFrame`] when not previewing, or the surface error.
    pub fn shutter(&mut self) -> Result<Snapshot, CaptureError> {
        if self.state != CaptureState::Live {
            return Err(CaptureError::NoFrame);
        }
        let snapshot = self.surface.take_snapshot()?;
        self.surface.stop_capture();
        self.state = CaptureState::Captured(snapshot.clone());
        Ok(snapshot)
    }

    /// Discard the still and go back to the live preview.
    ///
    /// # Errors
    ///
    /// Propagates the surface error from restarting the feed.
    pub fn retake(&mut self) -> Result<(), CaptureError> {
        if matches!(self.state, CaptureState::Captured(_)) {
            self.state = CaptureState::Closed;
        }
        self.open()
    }

    /// Keep the still and close the camera.
    pub fn accept(&mut self) -> Option<Snapshot> {
        if !matches!(self.state, CaptureState::Captured(_)) {
            return None;
        }
        let CaptureState::Captured(snapshot) = std::mem::take(&mut self.state) else {
            return None;
        };
        self.surface.stop_capture();
        log::info!(
            "kept {}x{} snapshot ({})",
            snapshot.width,
            snapshot.height,
            snapshot.mime_type().unwrap_or("unknown")
        );
        Some(snapshot)
    }

    /// Leave the camera, dropping any still.
    pub fn close(&mut self) {
        self.surface.stop_capture();
        self.state = CaptureState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeSurface {
        deny: bool,
        streaming: bool,
        starts: u32,
        stops: u32,
    }

    impl CaptureSurface for FakeSurface {
        fn start_capture(&mut self) -> Result<(), CaptureError> {
            if self.deny {
                return Err(CaptureError::PermissionDenied("NotAllowedError".into()));
            }
            self.starts += 1;
            self.streaming = true;
            Ok(())
        }

        fn take_snapshot(&mut self) -> Result<Snapshot, CaptureError> {
            if !self.streaming {
                return Err(CaptureError::NoFrame);
            }
            Ok(Snapshot {
                data_url: "data:image/jpeg;base64,AAAA".into(),
                width: 1920,
                height: 1080,
            })
        }

        fn stop_capture(&mut self) {
            self.stops += 1;
            self.streaming = false;
        }
    }

    #[test]
    fn shutter_then_accept_stops_feed() {
        let mut flow = CaptureFlow::new(FakeSurface::default());
        flow.open().unwrap();
        assert_eq!(flow.state(), &CaptureState::Live);

        let still = flow.shutter().unwrap();
        assert_eq!(still.mime_type(), Some("image/jpeg"));
        assert!(!flow.surface().streaming);

        assert_eq!(flow.accept(), Some(still));
        assert_eq!(flow.state(), &CaptureState::Closed);
        assert_eq!(flow.accept(), None);
    }

    #[test]
    fn retake_restarts_stream() {
        let mut flow = CaptureFlow::new(FakeSurface::default());
        flow.open().unwrap();
        flow.shutter().unwrap();
        flow.retake().unwrap();
        assert_eq!(flow.state(), &CaptureState::Live);
        assert_eq!(flow.surface().starts, 2);
    }

    #[test]
    fn denied_camera_stays_closed() {
        let mut flow = CaptureFlow::new(FakeSurface {
            deny: true,
            ..FakeSurface::default()
        });
        assert!(matches!(flow.open(), Err(CaptureError::PermissionDenied(_))));
        assert_eq!(flow.state(), &CaptureState::Closed);
        assert_eq!(flow.shutter(), Err(CaptureError::NoFrame));
    }

    #[test]
    fn close_always_stops_feed() {
        let mut flow = CaptureFlow::new(FakeSurface::default());
        flow.open().unwrap();
        flow.close();
        assert_eq!(flow.surface().stops, 1);
        assert!(!flow.surface().streaming);
        assert_eq!(flow.state(), &CaptureState::Closed);
    }

    #[test]
    fn mime_type_parsing_handles_odd_urls() {
        let mut still = Snapshot {
            data_url: "data:image/png,xyz".into(),
            width: 1,
            height: 1,
        };
        assert_eq!(still.mime_type(), Some("image/png"));
        still.data_url = "blob:abc".into();
        assert_eq!(still.mime_type(), None);
        still.width = 0;
        assert!(still.is_blank());
    }
}
