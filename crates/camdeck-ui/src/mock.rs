//! Scripted collaborators for tests and the desktop simulator.
//!
//! Every mock keeps its state behind an `Rc<RefCell<..>>` so a test can hold
//! a handle while the boxed mock lives inside [`Devices`].

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::devices::{
    AssistantError, AssistantService, Camera, CameraError, Devices, Frame, PhotoInfo, PhotoStore,
    Recorder, RecorderError, Recording, StorageError,
};
use crate::input::{Button, ButtonLevels, InputTracker};
use crate::mode::Mode;
use crate::test_display::TestDisplay;
use crate::ui::{Activity, Context};

/// Delay that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay that sums requested time, for asserting on blocking banners.
#[derive(Debug, Default, Clone)]
pub struct CountingDelay {
    pub total_ns: Rc<RefCell<u64>>,
}

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        *self.total_ns.borrow() / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }
}

// ── Camera ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CameraState {
    pub available: bool,
    pub fail_next_capture: bool,
    pub previews: usize,
    pub captures: usize,
}

#[derive(Debug, Clone)]
pub struct MockCamera(pub Rc<RefCell<CameraState>>);

impl MockCamera {
    pub fn new(available: bool) -> Self {
        Self(Rc::new(RefCell::new(CameraState {
            available,
            fail_next_capture: false,
            previews: 0,
            captures: 0,
        })))
    }
}

impl Camera for MockCamera {
    fn is_available(&self) -> bool {
        self.0.borrow().available
    }

    fn preview(&mut self) -> Result<Frame, CameraError> {
        let mut state = self.0.borrow_mut();
        if !state.available {
            return Err(CameraError::Unavailable);
        }
        state.previews += 1;
        let shade = (state.previews % 32) as u8;
        Ok(Frame::filled(128, 140, Rgb565::new(shade, 20, 10)))
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let mut state = self.0.borrow_mut();
        if !state.available {
            return Err(CameraError::Unavailable);
        }
        if state.fail_next_capture {
            state.fail_next_capture = false;
            return Err(CameraError::CaptureFailed("sensor timeout".to_string()));
        }
        state.captures += 1;
        let mut frame = Frame::filled(128, 140, Rgb565::GREEN);
        frame.encoded = format!("jpeg-{}", state.captures).into_bytes();
        Ok(frame)
    }
}

// ── Photo store ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct PhotoStoreState {
    pub mounted: bool,
    pub photos: Vec<(String, Vec<u8>)>,
    pub fail_saves: bool,
    pub loads: usize,
    pub status_logs: usize,
}

#[derive(Debug, Clone)]
pub struct MockPhotoStore(pub Rc<RefCell<PhotoStoreState>>);

impl MockPhotoStore {
    pub fn new(mounted: bool) -> Self {
        Self(Rc::new(RefCell::new(PhotoStoreState {
            mounted,
            photos: Vec::new(),
            fail_saves: false,
            loads: 0,
            status_logs: 0,
        })))
    }

    pub fn with_photos(count: usize) -> Self {
        let store = Self::new(true);
        for i in 0..count {
            store
                .0
                .borrow_mut()
                .photos
                .push((format!("IMG_{:04}.jpg", i + 1), alloc::vec![0xFF, 0xD8]));
        }
        store
    }

    pub fn names(&self) -> Vec<String> {
        self.0.borrow().photos.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl PhotoStore for MockPhotoStore {
    fn is_mounted(&self) -> bool {
        self.0.borrow().mounted
    }

    fn list(&mut self, limit: usize) -> Result<Vec<PhotoInfo>, StorageError> {
        let state = self.0.borrow();
        if !state.mounted {
            return Err(StorageError::NotMounted);
        }
        let mut photos: Vec<PhotoInfo> = state
            .photos
            .iter()
            .map(|(name, data)| PhotoInfo {
                name: name.clone(),
                size: data.len() as u64,
            })
            .collect();
        photos.sort_by(|a, b| a.name.cmp(&b.name));
        photos.truncate(limit);
        Ok(photos)
    }

    fn save(&mut self, frame: &Frame) -> Result<String, StorageError> {
        let mut state = self.0.borrow_mut();
        if !state.mounted {
            return Err(StorageError::NotMounted);
        }
        if state.fail_saves {
            return Err(StorageError::IoError("card full".to_string()));
        }
        let mut number = state.photos.len() + 1;
        let name = loop {
            let candidate = format!("IMG_{:04}.jpg", number);
            if !state.photos.iter().any(|(n, _)| *n == candidate) {
                break candidate;
            }
            number += 1;
        };
        state.photos.push((name.clone(), frame.encoded.clone()));
        Ok(name)
    }

    fn load(&mut self, name: &str) -> Result<Frame, StorageError> {
        let mut state = self.0.borrow_mut();
        if !state.mounted {
            return Err(StorageError::NotMounted);
        }
        if !state.photos.iter().any(|(n, _)| n == name) {
            return Err(StorageError::NotFound);
        }
        state.loads += 1;
        Ok(Frame::filled(96, 72, Rgb565::BLUE))
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let mut state = self.0.borrow_mut();
        let before = state.photos.len();
        state.photos.retain(|(n, _)| n != name);
        if state.photos.len() == before {
            Err(StorageError::NotFound)
        } else {
            Ok(())
        }
    }

    fn log_status(&mut self) {
        self.0.borrow_mut().status_logs += 1;
    }
}

// ── Recorder ────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RecorderState {
    pub recording: bool,
    pub polls: usize,
    /// Duration reported by the next `stop`.
    pub next_duration_secs: f32,
    pub fail_stop: bool,
    pub cancels: usize,
}

#[derive(Debug, Clone)]
pub struct MockRecorder(pub Rc<RefCell<RecorderState>>);

impl MockRecorder {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(RecorderState {
            recording: false,
            polls: 0,
            next_duration_secs: 1.5,
            fail_stop: false,
            cancels: 0,
        })))
    }
}

impl Default for MockRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder for MockRecorder {
    fn start(&mut self) -> Result<(), RecorderError> {
        let mut state = self.0.borrow_mut();
        state.recording = true;
        state.polls = 0;
        Ok(())
    }

    fn poll(&mut self) -> Result<(), RecorderError> {
        let mut state = self.0.borrow_mut();
        if !state.recording {
            return Err(RecorderError::NotRecording);
        }
        state.polls += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<Recording, RecorderError> {
        let mut state = self.0.borrow_mut();
        if !state.recording {
            return Err(RecorderError::NotRecording);
        }
        state.recording = false;
        if state.fail_stop {
            return Err(RecorderError::Io("i2s read failed".to_string()));
        }
        Ok(Recording {
            audio: alloc::vec![0u8; 44],
            duration_secs: state.next_duration_secs,
        })
    }

    fn cancel(&mut self) {
        let mut state = self.0.borrow_mut();
        if state.recording {
            state.cancels += 1;
        }
        state.recording = false;
    }

    fn is_recording(&self) -> bool {
        self.0.borrow().recording
    }
}

// ── Assistant ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AssistantState {
    pub connected: bool,
    /// Result of the next `connect` call.
    pub connect_succeeds: bool,
    pub transcripts: VecDeque<Result<String, AssistantError>>,
    pub completions: VecDeque<Result<String, AssistantError>>,
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MockAssistant(pub Rc<RefCell<AssistantState>>);

impl MockAssistant {
    pub fn new(connect_succeeds: bool) -> Self {
        Self(Rc::new(RefCell::new(AssistantState {
            connected: false,
            connect_succeeds,
            transcripts: VecDeque::new(),
            completions: VecDeque::new(),
            prompts: Vec::new(),
        })))
    }

    pub fn push_transcript(&self, result: Result<&str, AssistantError>) {
        self.0
            .borrow_mut()
            .transcripts
            .push_back(result.map(|s| s.to_string()));
    }

    pub fn push_completion(&self, result: Result<&str, AssistantError>) {
        self.0
            .borrow_mut()
            .completions
            .push_back(result.map(|s| s.to_string()));
    }
}

impl AssistantService for MockAssistant {
    fn connect(&mut self) -> bool {
        let mut state = self.0.borrow_mut();
        state.connected = state.connect_succeeds;
        state.connected
    }

    fn is_connected(&self) -> bool {
        self.0.borrow().connected
    }

    fn transcribe(&mut self, _audio: &[u8]) -> Result<String, AssistantError> {
        self.0
            .borrow_mut()
            .transcripts
            .pop_front()
            .unwrap_or_else(|| Ok("hello there".to_string()))
    }

    fn complete(&mut self, prompt: &str) -> Result<String, AssistantError> {
        let mut state = self.0.borrow_mut();
        state.prompts.push(prompt.to_string());
        state
            .completions
            .pop_front()
            .unwrap_or_else(|| Ok(format!("You said: {}", prompt)))
    }
}

/// Handles onto the mocks inside a [`Devices`] built by [`mock_devices`].
#[derive(Debug, Clone)]
pub struct MockHandles {
    pub camera: MockCamera,
    pub photos: MockPhotoStore,
    pub recorder: MockRecorder,
    pub assistant: MockAssistant,
}

impl MockHandles {
    pub fn new() -> Self {
        Self {
            camera: MockCamera::new(true),
            photos: MockPhotoStore::new(true),
            recorder: MockRecorder::new(),
            assistant: MockAssistant::new(true),
        }
    }

    pub fn devices(&self) -> Devices {
        Devices::new(
            Box::new(self.camera.clone()),
            Box::new(self.photos.clone()),
            Box::new(self.recorder.clone()),
            Box::new(self.assistant.clone()),
        )
    }
}

impl Default for MockHandles {
    fn default() -> Self {
        Self::new()
    }
}

/// Healthy mocks: camera present, empty mounted store, Wi-Fi reachable.
pub fn mock_devices() -> (Devices, MockHandles) {
    let handles = MockHandles::new();
    (handles.devices(), handles)
}

/// Drives a single activity the way the dispatcher would, on a
/// [`TestDisplay`] with mock devices and a fixed tick length.
pub struct ActivityRig {
    pub display: TestDisplay,
    pub tracker: InputTracker,
    pub devices: Devices,
    pub handles: MockHandles,
    pub config: Config,
    pub delay: CountingDelay,
    pub now_ms: u64,
    pub tick_ms: u64,
}

impl ActivityRig {
    pub fn new() -> Self {
        Self::with_handles(MockHandles::new())
    }

    pub fn with_handles(handles: MockHandles) -> Self {
        let config = Config::default();
        Self {
            display: TestDisplay::default_size(),
            tracker: InputTracker::new(config.long_press_ms),
            devices: handles.devices(),
            handles,
            config,
            delay: CountingDelay::default(),
            now_ms: 0,
            tick_ms: 50,
        }
    }

    /// First tick after a transition: `enter`, then `update` unless the
    /// activity already asked to leave.
    pub fn enter<A: Activity<TestDisplay> + ?Sized>(&mut self, activity: &mut A) -> Option<Mode> {
        self.run(activity, ButtonLevels::NONE, true)
    }

    /// Advance one tick with `levels` held.
    pub fn step<A: Activity<TestDisplay> + ?Sized>(
        &mut self,
        activity: &mut A,
        levels: ButtonLevels,
    ) -> Option<Mode> {
        self.now_ms += self.tick_ms;
        self.run(activity, levels, false)
    }

    /// One tick with nothing held.
    pub fn idle<A: Activity<TestDisplay> + ?Sized>(&mut self, activity: &mut A) -> Option<Mode> {
        self.step(activity, ButtonLevels::NONE)
    }

    /// Press and release `button` over two ticks.
    ///
    /// Returns the first transition requested on either tick.
    pub fn press<A: Activity<TestDisplay> + ?Sized>(
        &mut self,
        activity: &mut A,
        button: Button,
    ) -> Option<Mode> {
        self.step(activity, ButtonLevels::NONE.with(button))
            .or_else(|| self.idle(activity))
    }

    /// Idle until `ms` have passed or a transition is requested.
    pub fn idle_for<A: Activity<TestDisplay> + ?Sized>(
        &mut self,
        activity: &mut A,
        ms: u64,
    ) -> Option<Mode> {
        let until = self.now_ms + ms;
        while self.now_ms < until {
            if let Some(mode) = self.idle(activity) {
                return Some(mode);
            }
        }
        None
    }

    fn run<A: Activity<TestDisplay> + ?Sized>(
        &mut self,
        activity: &mut A,
        levels: ButtonLevels,
        entering: bool,
    ) -> Option<Mode> {
        let frame = self.tracker.sample(levels, self.now_ms);
        let mut ctx = Context::new(
            &mut self.display,
            &frame,
            self.now_ms,
            &mut self.delay,
            &mut self.devices,
            &self.config,
        );
        if entering {
            if let Err(never) = activity.enter(&mut ctx) {
                match never {}
            }
        }
        if ctx.pending_transition().is_none() {
            if let Err(never) = activity.update(&mut ctx) {
                match never {}
            }
        }
        let next = ctx.pending_transition();
        if next.is_some() {
            activity.exit(&mut self.devices);
        }
        next
    }
}

impl Default for ActivityRig {
    fn default() -> Self {
        Self::new()
    }
}
