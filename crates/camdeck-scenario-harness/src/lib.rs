//! Host-side scenario test harness for scripted UI flows.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};

use camdeck_ui::mock::{CountingDelay, MockHandles};
use camdeck_ui::test_display::TestDisplay;
use camdeck_ui::{App, Button, ButtonLevels, Config, Mode};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use png::{BitDepth, ColorType, Encoder};

/// Default tick length, close to the firmware loop period.
pub const TICK_MS: u64 = 20;

/// Couples the app, its mock collaborators, a display and a virtual clock.
pub struct ScenarioHarness {
    app: App<TestDisplay>,
    handles: MockHandles,
    display: TestDisplay,
    delay: CountingDelay,
    now_ms: u64,
    transitions: Vec<Mode>,
}

impl ScenarioHarness {
    /// Healthy mocks and the device configuration.
    pub fn new() -> Self {
        Self::with_handles(MockHandles::new(), Config::default())
    }

    /// Construct a harness with caller-provided mock state.
    pub fn with_handles(handles: MockHandles, config: Config) -> Self {
        Self {
            app: App::new(handles.devices(), config),
            handles,
            display: TestDisplay::default_size(),
            delay: CountingDelay::default(),
            now_ms: 0,
            transitions: Vec::new(),
        }
    }

    /// One main-loop pass with `levels` held.
    pub fn tick(&mut self, levels: ButtonLevels) -> Option<Mode> {
        self.now_ms += TICK_MS;
        let next = self
            .app
            .tick(&mut self.display, levels, self.now_ms, &mut self.delay);
        if let Some(mode) = next {
            self.transitions.push(mode);
        }
        next
    }

    /// One pass with nothing held.
    pub fn idle(&mut self) -> Option<Mode> {
        self.tick(ButtonLevels::NONE)
    }

    /// Idle for `ms` of virtual time. Returns the first transition seen.
    pub fn idle_for(&mut self, ms: u64) -> Option<Mode> {
        let until = self.now_ms + ms;
        let mut first = None;
        while self.now_ms < until {
            first = first.or(self.idle());
        }
        first
    }

    /// Press and release `button` over two ticks.
    pub fn press(&mut self, button: Button) -> Option<Mode> {
        let down = self.tick(ButtonLevels::NONE.with(button));
        let up = self.idle();
        down.or(up)
    }

    /// Hold `levels` for `ms`, then release.
    pub fn hold(&mut self, levels: ButtonLevels, ms: u64) -> Option<Mode> {
        let until = self.now_ms + ms;
        let mut first = None;
        while self.now_ms < until {
            first = first.or(self.tick(levels));
        }
        first.or(self.idle())
    }

    /// Boot tick plus `downs` presses of Down and a Select on the main menu.
    /// Idles once more so the target activity has been entered.
    pub fn open_from_menu(&mut self, downs: usize) -> Option<Mode> {
        assert_eq!(self.app.current_mode(), Mode::Menu, "not on the main menu");
        self.idle();
        for _ in 0..downs {
            self.press(Button::Down);
        }
        let target = self.press(Button::Select);
        self.idle();
        target
    }

    pub fn app(&self) -> &App<TestDisplay> {
        &self.app
    }

    pub fn mode(&self) -> Mode {
        self.app.current_mode()
    }

    pub fn display(&self) -> &TestDisplay {
        &self.display
    }

    pub fn handles(&self) -> &MockHandles {
        &self.handles
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Time spent inside blocking delays (banners, welcome screens).
    pub fn blocked_ms(&self) -> u64 {
        self.delay.total_ms()
    }

    /// Every mode switched to so far, in order.
    pub fn transitions(&self) -> &[Mode] {
        &self.transitions
    }

    /// Run one idle tick and return elapsed wall time.
    pub fn tick_timed(&mut self) -> Duration {
        let start = Instant::now();
        self.idle();
        start.elapsed()
    }

    /// Tick and assert a wall-time budget in milliseconds.
    pub fn assert_tick_budget_ms(&mut self, max_ms: u128, label: &str) {
        let elapsed = self.tick_timed();
        assert!(
            elapsed.as_millis() <= max_ms,
            "{} tick exceeded budget: {}ms > {}ms",
            label,
            elapsed.as_millis(),
            max_ms
        );
    }

    /// Save the current framebuffer to an 8-bit RGB PNG.
    pub fn save_screenshot_png(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let (width, height) = self.display.dimensions();
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in self.display.pixels() {
            data.extend_from_slice(&rgb888(*pixel));
        }

        let file = File::create(path).map_err(|e| e.to_string())?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, width, height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        let mut png_writer = encoder.write_header().map_err(|e| e.to_string())?;
        png_writer
            .write_image_data(&data)
            .map_err(|e| e.to_string())
    }
}

impl Default for ScenarioHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Widen 5/6/5-bit channels, replicating high bits into the low ones.
fn rgb888(color: Rgb565) -> [u8; 3] {
    let (r, g, b) = (color.r(), color.g(), color.b());
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}
