//! Top-level application: input tracking plus the mode dispatcher.

use alloc::boxed::Box;
use core::fmt::Debug;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_hal::delay::DelayNs;

use crate::assistant_activity::AssistantActivity;
use crate::camera_activity::CameraActivity;
use crate::config::Config;
use crate::devices::Devices;
use crate::dispatcher::Dispatcher;
use crate::face_activity::{FaceMenuActivity, FaceStubActivity};
use crate::games::{Breakout, Flappy, GameActivity, Memory, Pong, Snake};
use crate::input::{ButtonLevels, InputTracker};
use crate::menu_activity::MenuActivity;
use crate::mode::Mode;
use crate::photos_activity::PhotosActivity;
use crate::placeholder_activity::PlaceholderActivity;
use crate::ui::{Activity, Context};

/// Everything that survives between ticks.
pub struct App<D: DrawTarget<Color = Rgb565>> {
    tracker: InputTracker,
    dispatcher: Dispatcher<D>,
    devices: Devices,
    config: Config,
}

impl<D> App<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    pub fn new(devices: Devices, config: Config) -> Self {
        let dispatcher = Dispatcher::new(|mode| build_activity(mode, &config));
        Self {
            tracker: InputTracker::new(config.long_press_ms),
            dispatcher,
            devices,
            config,
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.dispatcher.current_mode()
    }

    pub fn dispatcher(&self) -> &Dispatcher<D> {
        &self.dispatcher
    }

    /// One pass of the main loop: fold `levels` into this tick's input and
    /// dispatch it. Returns the mode switched to, if any.
    pub fn tick(
        &mut self,
        display: &mut D,
        levels: ButtonLevels,
        now_ms: u64,
        delay: &mut dyn DelayNs,
    ) -> Option<Mode> {
        let input = self.tracker.sample(levels, now_ms);
        let mut ctx = Context::new(
            display,
            &input,
            now_ms,
            delay,
            &mut self.devices,
            &self.config,
        );
        self.dispatcher.tick(&mut ctx)
    }
}

/// One activity per mode. The match is exhaustive so a new [`Mode`]
/// cannot be added without registering it.
fn build_activity<D: DrawTarget<Color = Rgb565>>(
    mode: Mode,
    config: &Config,
) -> Box<dyn Activity<D>> {
    match mode {
        Mode::Menu => Box::new(MenuActivity::main(config)),
        Mode::GameMenu => Box::new(MenuActivity::games(config)),
        Mode::FaceRecognitionMenu => Box::new(FaceMenuActivity::new(config.menu_visible_items)),
        Mode::FaceEnroll => Box::new(FaceStubActivity::enroll()),
        Mode::FaceRecognize => Box::new(FaceStubActivity::recognize()),
        Mode::Camera => Box::new(CameraActivity::new()),
        Mode::Photos => Box::new(PhotosActivity::new(config)),
        Mode::ObjectDetection => Box::new(PlaceholderActivity::new(Mode::ObjectDetection)),
        Mode::AiAssistant => Box::new(AssistantActivity::new()),
        Mode::Snake => Box::new(GameActivity::<Snake>::new()),
        Mode::Pong => Box::new(GameActivity::<Pong>::new()),
        Mode::Breakout => Box::new(GameActivity::<Breakout>::new()),
        Mode::FlappyBird => Box::new(GameActivity::<Flappy>::new()),
        Mode::Memory => Box::new(GameActivity::<Memory>::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use crate::mock::{mock_devices, MockHandles, NoopDelay};
    use crate::test_display::TestDisplay;

    struct Rig {
        app: App<TestDisplay>,
        display: TestDisplay,
        handles: MockHandles,
        now: u64,
    }

    impl Rig {
        fn new() -> Self {
            let (devices, handles) = mock_devices();
            Self {
                app: App::new(devices, Config::default()),
                display: TestDisplay::default_size(),
                handles,
                now: 0,
            }
        }

        fn tick(&mut self, levels: ButtonLevels) -> Option<Mode> {
            self.now += 50;
            self.app
                .tick(&mut self.display, levels, self.now, &mut NoopDelay)
        }

        fn press(&mut self, button: Button) -> Option<Mode> {
            let first = self.tick(ButtonLevels::NONE.with(button));
            let second = self.tick(ButtonLevels::NONE);
            first.or(second)
        }
    }

    #[test]
    fn boots_into_menu_and_draws_it() {
        let mut rig = Rig::new();
        assert_eq!(rig.app.current_mode(), Mode::Menu);
        rig.tick(ButtonLevels::NONE);
        assert!(rig.display.lit_pixel_count() > 0);
        assert!(!rig.app.dispatcher().entry_pending());
    }

    #[test]
    fn down_down_select_enters_face_menu() {
        let mut rig = Rig::new();
        rig.tick(ButtonLevels::NONE);
        rig.press(Button::Down);
        rig.press(Button::Down);
        assert_eq!(rig.press(Button::Select), Some(Mode::FaceRecognitionMenu));
        rig.tick(ButtonLevels::NONE);
        assert_eq!(rig.app.current_mode(), Mode::FaceRecognitionMenu);
        assert_eq!(rig.press(Button::Back), Some(Mode::Menu));
    }

    #[test]
    fn every_mode_is_reachable_and_returns() {
        for (downs, expected) in [
            (0, Mode::Camera),
            (1, Mode::Photos),
            (3, Mode::ObjectDetection),
        ] {
            let mut rig = Rig::new();
            rig.tick(ButtonLevels::NONE);
            for _ in 0..downs {
                rig.press(Button::Down);
            }
            assert_eq!(rig.press(Button::Select), Some(expected));
            rig.tick(ButtonLevels::NONE);
            assert_eq!(rig.press(Button::Back), Some(Mode::Menu));
        }
    }

    #[test]
    fn game_round_trip_through_game_menu() {
        let mut rig = Rig::new();
        rig.tick(ButtonLevels::NONE);
        rig.press(Button::Up);
        assert_eq!(rig.press(Button::Select), Some(Mode::GameMenu));
        rig.tick(ButtonLevels::NONE);
        rig.press(Button::Down);
        assert_eq!(rig.press(Button::Select), Some(Mode::Pong));
        rig.tick(ButtonLevels::NONE);
        assert_eq!(rig.press(Button::Back), Some(Mode::GameMenu));
        rig.tick(ButtonLevels::NONE);
        assert_eq!(rig.press(Button::Back), Some(Mode::Menu));
        assert_eq!(rig.app.dispatcher().transition_count(), 4);
    }

    #[test]
    fn back_from_every_screen_lands_on_its_parent() {
        use crate::mock::ActivityRig;

        let back = ButtonLevels::NONE.with(Button::Back);
        for mode in Mode::ALL.into_iter().filter(|mode| *mode != Mode::Menu) {
            let mut rig = ActivityRig::new();
            let mut activity = build_activity::<TestDisplay>(mode, &rig.config);
            assert_eq!(rig.enter(&mut *activity), None, "{mode:?}");
            // Snake steers with Back, so it only leaves on a long hold.
            let left = (0..200).find_map(|_| rig.step(&mut *activity, back));
            assert_eq!(left, Some(mode.parent()), "{mode:?}");
        }
    }

    #[test]
    fn assistant_exit_cancels_recording() {
        let mut rig = Rig::new();
        rig.tick(ButtonLevels::NONE);
        for _ in 0..4 {
            rig.press(Button::Down);
        }
        assert_eq!(rig.press(Button::Select), Some(Mode::AiAssistant));
        rig.tick(ButtonLevels::NONE);
        rig.tick(ButtonLevels::NONE.with(Button::Select));
        assert!(rig.handles.recorder.0.borrow().recording);
        let back = ButtonLevels::NONE.with(Button::Select).with(Button::Back);
        assert_eq!(rig.tick(back), Some(Mode::Menu));
        assert!(!rig.handles.recorder.0.borrow().recording);
    }
}
