//! Desktop SDL simulator for the camdeck handheld.
//!
//! Runs the same `App` loop as the firmware against mock collaborators.

use std::thread;
use std::time::{Duration, Instant};

use camdeck_ui::mock::{MockHandles, MockPhotoStore};
use camdeck_ui::{App, Button, ButtonLevels, Config, InputSource, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use embedded_hal::delay::DelayNs;

const TICK: Duration = Duration::from_millis(20);

/// Keyboard state folded into button levels between ticks.
#[derive(Default)]
struct Keyboard {
    levels: ButtonLevels,
    quit: bool,
}

impl Keyboard {
    fn apply(&mut self, event: SimulatorEvent) {
        match event {
            SimulatorEvent::Quit => self.quit = true,
            SimulatorEvent::KeyDown { keycode, .. } if keycode == Keycode::Escape => {
                self.quit = true
            }
            SimulatorEvent::KeyDown { keycode, .. } => self.set(keycode, true),
            SimulatorEvent::KeyUp { keycode, .. } => self.set(keycode, false),
            _ => {}
        }
    }

    fn set(&mut self, keycode: Keycode, down: bool) {
        if let Some(button) = keycode_to_button(keycode) {
            self.levels.set(button, down);
        }
    }
}

impl InputSource for Keyboard {
    fn sample(&mut self) -> ButtonLevels {
        self.levels
    }
}

/// Blocking delay, so "Starting" banners hold the window like on the device.
struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let output_settings = OutputSettingsBuilder::new().scale(3).build();
    let mut display: SimulatorDisplay<Rgb565> =
        SimulatorDisplay::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
    let mut window = Window::new("camdeck", &output_settings);

    let handles = MockHandles {
        photos: MockPhotoStore::with_photos(8),
        ..MockHandles::new()
    };
    let mut app = App::new(handles.devices(), Config::default());
    let mut keyboard = Keyboard::default();
    let mut delay = SleepDelay;

    println!("camdeck simulator");
    println!("Controls:");
    println!("  Up / W          - Up");
    println!("  Down / S        - Down");
    println!("  Enter / Space   - Select");
    println!("  Backspace / A   - Back");
    println!("  Escape          - Quit");

    let start = Instant::now();
    window.update(&display);
    while !keyboard.quit {
        for event in window.events().collect::<Vec<_>>() {
            keyboard.apply(event);
        }
        let now_ms = start.elapsed().as_millis() as u64;
        let levels = keyboard.sample();
        if let Some(mode) = app.tick(&mut display, levels, now_ms, &mut delay) {
            log::debug!("now in {:?}", mode);
        }
        window.update(&display);
        thread::sleep(TICK);
    }
    Ok(())
}

fn keycode_to_button(keycode: Keycode) -> Option<Button> {
    match keycode {
        Keycode::Up | Keycode::W => Some(Button::Up),
        Keycode::Down | Keycode::S => Some(Button::Down),
        Keycode::Return | Keycode::Space => Some(Button::Select),
        Keycode::Backspace | Keycode::A => Some(Button::Back),
        _ => None,
    }
}
