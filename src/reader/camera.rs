use image::RgbaImage;
use tracing::debug;

use crate::common::error::QRResult;

// Camera
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

/// Requested stream properties. The device may pick the closest match.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct CameraConstraints {
    pub facing_mode: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self { facing_mode: FacingMode::Environment, ideal_width: 1280, ideal_height: 720 }
    }
}

/// Source of video streams. Opening prompts for permission where the platform asks for it;
/// a refusal or missing camera is reported as `QRError::CameraUnavailable`.
pub trait CameraDevice {
    type Stream: CaptureStream;

    fn open(&mut self, constraints: &CameraConstraints) -> QRResult<Self::Stream>;
}

/// An open video stream.
pub trait CaptureStream {
    /// Current frame, or None if no frame is ready yet.
    fn capture_frame(&mut self) -> Option<RgbaImage>;

    /// Releases the camera. Called exactly once by [`StreamGuard`].
    fn stop(&mut self);
}

/// Owns an open stream and stops it exactly once, on [`StreamGuard::stop`] or on drop.
#[derive(Debug)]
pub struct StreamGuard<S: CaptureStream> {
    stream: Option<S>,
}

impl<S: CaptureStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self { stream: Some(stream) }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn capture_frame(&mut self) -> Option<RgbaImage> {
        self.stream.as_mut()?.capture_frame()
    }

    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!("Stopping camera stream");
            stream.stop();
        }
    }
}

impl<S: CaptureStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod camera_tests {
    use super::{CameraConstraints, FacingMode, StreamGuard};
    use crate::reader::mock::{MockCamera, StreamStats};

    #[test]
    fn test_default_constraints() {
        let c = CameraConstraints::default();
        assert_eq!(c.facing_mode, FacingMode::Environment);
        assert_eq!((c.ideal_width, c.ideal_height), (1280, 720));
    }

    #[test]
    fn test_guard_stops_once() {
        let stats = StreamStats::default();
        let mut guard = StreamGuard::new(MockCamera::stream(&stats, 1));
        assert_eq!(stats.open(), 1);
        assert!(guard.capture_frame().is_some());

        guard.stop();
        guard.stop();
        assert!(!guard.is_active());
        assert!(guard.capture_frame().is_none());
        drop(guard);
        assert_eq!(stats.stops(), 1);
        assert_eq!(stats.open(), 0);
    }

    #[test]
    fn test_guard_stops_on_drop() {
        let stats = StreamStats::default();
        {
            let _guard = StreamGuard::new(MockCamera::stream(&stats, 1));
            assert_eq!(stats.open(), 1);
        }
        assert_eq!(stats.stops(), 1);
        assert_eq!(stats.open(), 0);
    }
}
