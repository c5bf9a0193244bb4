use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use super::{CameraConstraints, CameraDevice, Decode, StreamGuard};

// Scan state
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub enum ScanState {
    #[default]
    Idle,
    RequestingPermission,
    PermissionDenied,
    Active,
    Found(String),
    Stopped,
}

/// Cancels a scan from anywhere, including from inside a running decode.
#[derive(Debug, Default, Clone)]
pub struct ScanHandle(Arc<AtomicBool>);

impl ScanHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// Frame clock
//------------------------------------------------------------------------------

/// Paces the capture loop, one call per display refresh. Returns false once the host
/// stops delivering frames.
pub trait FrameClock {
    fn next_frame(&mut self) -> bool;
}

/// Fixed rate clock that sleeps until the next frame is due.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    interval: Duration,
    last: Option<Instant>,
}

impl IntervalClock {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }
}

impl FrameClock for IntervalClock {
    fn next_frame(&mut self) -> bool {
        if let Some(last) = self.last {
            let due = last + self.interval;
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.last = Some(Instant::now());
        true
    }
}

// Scan session
//------------------------------------------------------------------------------

/// Capture/decode loop over a single camera stream.
///
/// `Idle -> RequestingPermission -> Active | PermissionDenied`, then `Active -> Found` on
/// the first decoded frame or `Active -> Stopped` on cancellation. The stream is stopped
/// exactly once whichever way the session ends.
pub struct ScanSession<C: CameraDevice, D: Decode> {
    camera: C,
    decoder: D,
    constraints: CameraConstraints,
    state: ScanState,
    stream: Option<StreamGuard<C::Stream>>,
    handle: ScanHandle,
    attempts: usize,
}

impl<C: CameraDevice, D: Decode> ScanSession<C, D> {
    pub fn new(camera: C, decoder: D) -> Self {
        Self {
            camera,
            decoder,
            constraints: CameraConstraints::default(),
            state: ScanState::Idle,
            stream: None,
            handle: ScanHandle::default(),
            attempts: 0,
        }
    }

    pub fn with_constraints(mut self, constraints: CameraConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_handle(mut self, handle: ScanHandle) -> Self {
        self.handle = handle;
        self
    }

    pub fn handle(&self) -> ScanHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Decode attempts since the last start.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn permission_denied(&self) -> bool {
        self.state == ScanState::PermissionDenied
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(StreamGuard::is_active)
    }

    pub fn result(&self) -> Option<&str> {
        match &self.state {
            ScanState::Found(text) => Some(text),
            _ => None,
        }
    }

    /// Opens the camera and enters Active, tearing down any running stream first.
    pub fn start(&mut self) -> &ScanState {
        if let Some(mut stream) = self.stream.take() {
            debug!("Restarting scan, tearing down current stream");
            stream.stop();
        }
        self.handle.reset();
        self.attempts = 0;

        debug!("Requesting camera {:?}...", self.constraints);
        self.state = ScanState::RequestingPermission;
        match self.camera.open(&self.constraints) {
            Ok(stream) => {
                self.stream = Some(StreamGuard::new(stream));
                self.state = ScanState::Active;
            }
            Err(err) => {
                warn!("Camera unavailable: {err}");
                self.state = ScanState::PermissionDenied;
            }
        }
        &self.state
    }

    /// One iteration of the loop: capture the current frame and try to decode it.
    pub fn tick(&mut self) -> &ScanState {
        if self.state != ScanState::Active {
            return &self.state;
        }
        if self.handle.is_cancelled() {
            self.stop();
            return &self.state;
        }

        let Some(frame) = self.stream.as_mut().and_then(StreamGuard::capture_frame) else {
            return &self.state;
        };
        self.attempts += 1;
        let res = self.decoder.decode(&frame);

        // Cancelled while decoding
        if self.handle.is_cancelled() {
            self.stop();
            return &self.state;
        }

        if let Some(text) = res {
            info!("Found QR code after {} attempts: {text:?}", self.attempts);
            self.release();
            self.state = ScanState::Found(text);
        }
        &self.state
    }

    /// Drives [`Self::tick`] from the clock until a code is found or the scan ends.
    pub fn run<F: FrameClock>(&mut self, clock: &mut F) -> Option<&str> {
        while self.state == ScanState::Active {
            if !clock.next_frame() {
                debug!("Frame clock ended");
                self.stop();
                break;
            }
            self.tick();
        }
        self.result()
    }

    /// Cancels the scan and releases the camera.
    pub fn stop(&mut self) {
        self.handle.cancel();
        self.release();
        if matches!(self.state, ScanState::Active | ScanState::RequestingPermission) {
            debug!("Scan stopped after {} attempts", self.attempts);
            self.state = ScanState::Stopped;
        }
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}

#[cfg(test)]
mod scan_tests {
    use std::time::{Duration, Instant};

    use image::RgbaImage;
    use test_case::test_case;

    use super::{FrameClock, IntervalClock, ScanHandle, ScanSession, ScanState};
    use crate::reader::{mock::MockCamera, CameraConstraints};

    // Delivers a fixed number of frames
    struct Frames(usize);

    impl FrameClock for Frames {
        fn next_frame(&mut self) -> bool {
            match self.0 {
                0 => false,
                _ => {
                    self.0 -= 1;
                    true
                }
            }
        }
    }

    fn found_after(k: usize) -> impl FnMut(&RgbaImage) -> Option<String> {
        let mut calls = 0;
        move |_: &RgbaImage| {
            calls += 1;
            (calls > k).then(|| "https://example.com".to_string())
        }
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(5)]
    fn test_found_after_attempts(k: usize) {
        let camera = MockCamera::default();
        let stats = camera.stats.clone();
        let mut session = ScanSession::new(camera, found_after(k));

        assert_eq!(*session.start(), ScanState::Active);
        let res = session.run(&mut Frames(100)).map(str::to_string);

        assert_eq!(res.as_deref(), Some("https://example.com"));
        assert_eq!(session.attempts(), k + 1);
        assert_eq!(*session.state(), ScanState::Found("https://example.com".to_string()));
        assert_eq!(stats.stops(), 1);
        assert_eq!(stats.open(), 0);
        assert!(!session.is_streaming());

        // Terminal
        session.tick();
        assert_eq!(session.attempts(), k + 1);
        drop(session);
        assert_eq!(stats.stops(), 1);
    }

    #[test]
    fn test_cancel_before_tick() {
        let camera = MockCamera::default();
        let stats = camera.stats.clone();
        let mut session = ScanSession::new(camera, found_after(0));
        session.start();

        session.handle().cancel();
        assert_eq!(*session.tick(), ScanState::Stopped);
        assert_eq!(session.attempts(), 0);
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.open(), 0);
    }

    #[test]
    fn test_cancel_with_decode_in_flight() {
        let camera = MockCamera::default();
        let stats = camera.stats.clone();
        let handle = ScanHandle::default();
        let in_flight = handle.clone();
        let decoder = move |_: &RgbaImage| {
            in_flight.cancel();
            Some("too late".to_string())
        };

        let mut session = ScanSession::new(camera, decoder).with_handle(handle);
        session.start();
        assert_eq!(stats.open(), 1);

        assert_eq!(*session.tick(), ScanState::Stopped);
        assert_eq!(session.result(), None);
        assert_eq!(stats.open(), 0);
        assert_eq!(stats.stops(), 1);
    }

    #[test]
    fn test_restart_tears_down_stream() {
        let camera = MockCamera::default();
        let stats = camera.stats.clone();
        let mut session = ScanSession::new(camera, found_after(usize::MAX));

        session.start();
        session.tick();
        assert_eq!(session.attempts(), 1);

        session.start();
        assert_eq!(stats.opened(), 2);
        assert_eq!(stats.stops(), 1);
        assert_eq!(stats.open(), 1);
        assert_eq!(session.attempts(), 0);

        drop(session);
        assert_eq!(stats.open(), 0);
        assert_eq!(stats.stops(), 2);
    }

    #[test]
    fn test_restart_after_cancel() {
        let mut session = ScanSession::new(MockCamera::default(), found_after(0));
        session.start();
        session.stop();
        assert_eq!(*session.state(), ScanState::Stopped);

        session.start();
        assert_eq!(*session.tick(), ScanState::Found("https://example.com".to_string()));
    }

    #[test]
    fn test_permission_denied() {
        let camera = MockCamera::denied();
        let stats = camera.stats.clone();
        let mut session = ScanSession::new(camera, found_after(0));

        assert_eq!(*session.start(), ScanState::PermissionDenied);
        assert!(session.permission_denied());
        assert_eq!(session.run(&mut Frames(10)), None);
        assert_eq!(session.attempts(), 0);
        assert_eq!(stats.opened(), 0);
    }

    #[test]
    fn test_not_found_is_not_denied() {
        let mut session = ScanSession::new(MockCamera::default(), found_after(usize::MAX));
        session.start();
        session.tick();
        assert!(!session.permission_denied());
        assert_eq!(*session.state(), ScanState::Active);
    }

    #[test]
    fn test_clock_end_stops_scan() {
        let camera = MockCamera::default();
        let stats = camera.stats.clone();
        let mut session = ScanSession::new(camera, found_after(usize::MAX));
        session.start();

        assert_eq!(session.run(&mut Frames(3)), None);
        assert_eq!(session.attempts(), 3);
        assert_eq!(*session.state(), ScanState::Stopped);
        assert_eq!(stats.open(), 0);
    }

    #[test]
    fn test_constraints_forwarded() {
        let constraints = CameraConstraints { ideal_width: 640, ideal_height: 480, ..Default::default() };
        let mut session = ScanSession::new(MockCamera::default(), found_after(0)).with_constraints(constraints);
        session.start();
        assert_eq!(session.camera.last_constraints, Some(constraints));
    }

    #[test]
    fn test_interval_clock() {
        let mut clock = IntervalClock::new(Duration::from_millis(5));
        let start = Instant::now();
        assert!(clock.next_frame());
        assert!(clock.next_frame());
        assert!(clock.next_frame());
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
