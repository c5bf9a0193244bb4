use std::{cell::Cell, rc::Rc};

use image::{Rgba, RgbaImage};

use super::{CameraConstraints, CameraDevice, CaptureStream};
use crate::common::error::{QRError, QRResult};

/// Counts opened and stopped streams, shared between a camera and its streams.
#[derive(Debug, Default, Clone)]
pub struct StreamStats {
    opened: Rc<Cell<usize>>,
    stopped: Rc<Cell<usize>>,
    frames: Rc<Cell<usize>>,
}

impl StreamStats {
    /// Streams currently open.
    pub fn open(&self) -> usize {
        self.opened.get() - self.stopped.get()
    }

    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    pub fn stops(&self) -> usize {
        self.stopped.get()
    }

    pub fn frames(&self) -> usize {
        self.frames.get()
    }
}

#[derive(Debug)]
pub struct MockStream {
    stats: StreamStats,
    size: u32,
    stopped: bool,
}

impl CaptureStream for MockStream {
    fn capture_frame(&mut self) -> Option<RgbaImage> {
        assert!(!self.stopped, "Frame captured from a stopped stream");
        self.stats.frames.set(self.stats.frames.get() + 1);
        Some(RgbaImage::from_pixel(self.size, self.size, Rgba([255, 255, 255, 255])))
    }

    fn stop(&mut self) {
        assert!(!self.stopped, "Stream stopped twice");
        self.stopped = true;
        self.stats.stopped.set(self.stats.stopped.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct MockCamera {
    pub stats: StreamStats,
    pub deny: bool,
    pub last_constraints: Option<CameraConstraints>,
}

impl MockCamera {
    pub fn denied() -> Self {
        Self { deny: true, ..Default::default() }
    }

    pub fn stream(stats: &StreamStats, size: u32) -> MockStream {
        stats.opened.set(stats.opened.get() + 1);
        MockStream { stats: stats.clone(), size, stopped: false }
    }
}

impl CameraDevice for MockCamera {
    type Stream = MockStream;

    fn open(&mut self, constraints: &CameraConstraints) -> QRResult<MockStream> {
        self.last_constraints = Some(*constraints);
        if self.deny {
            return Err(QRError::CameraUnavailable("Permission denied".to_string()));
        }
        Ok(Self::stream(&self.stats, 8))
    }
}
