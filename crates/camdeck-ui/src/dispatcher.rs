//! Mode dispatcher: owns the current mode and drives the activity lifecycle.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::mode::Mode;
use crate::ui::{Activity, Context};

/// Routes each tick to the activity registered for the current mode.
///
/// Transitions requested during a tick are committed after the activity
/// returns and take effect on the next tick, which starts with `enter`.
pub struct Dispatcher<D: DrawTarget<Color = Rgb565>> {
    activities: Vec<Box<dyn Activity<D>>>,
    current: Mode,
    entry_pending: bool,
    transitions: u32,
}

impl<D> Dispatcher<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    /// Build the registry by asking `factory` for one activity per mode.
    ///
    /// Boots into [`Mode::Menu`] with its entry armed.
    pub fn new(mut factory: impl FnMut(Mode) -> Box<dyn Activity<D>>) -> Self {
        let activities = Mode::ALL.iter().map(|mode| factory(*mode)).collect();
        Self {
            activities,
            current: Mode::Menu,
            entry_pending: true,
            transitions: 0,
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.current
    }

    /// True until the current mode's `enter` has run.
    pub fn entry_pending(&self) -> bool {
        self.entry_pending
    }

    /// Committed transitions since boot.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    /// Run one tick. Returns the mode switched to, if any.
    pub fn tick(&mut self, ctx: &mut Context<'_, D>) -> Option<Mode> {
        let mode = self.current;
        let Some(activity) = self.activities.get_mut(mode.index()) else {
            log::error!("No activity registered for {:?}", mode);
            return None;
        };

        if self.entry_pending {
            self.entry_pending = false;
            if let Err(err) = activity.enter(ctx) {
                log::warn!("{:?}: draw failed on enter: {:?}", mode, err);
            }
        }

        // An enter that already redirects skips its first update.
        if ctx.pending_transition().is_none() {
            if let Err(err) = activity.update(ctx) {
                log::warn!("{:?}: draw failed on update: {:?}", mode, err);
            }
        }

        let next = ctx.take_transition()?;
        activity.exit(ctx.devices);
        log::info!("Mode {:?} -> {:?}", mode, next);
        self.current = next;
        self.entry_pending = true;
        self.transitions = self.transitions.wrapping_add(1);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use crate::config::Config;
    use crate::input::InputFrame;
    use crate::mock::{mock_devices, NoopDelay};
    use crate::test_display::TestDisplay;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Enter(Mode),
        Update(Mode),
        Exit(Mode),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    /// Records lifecycle calls and follows a per-update script of requests.
    struct Probe {
        mode: Mode,
        log: Log,
        script: Rc<RefCell<Vec<(Mode, Vec<Mode>)>>>,
        redirect_on_enter: Option<Mode>,
    }

    impl Activity<TestDisplay> for Probe {
        fn enter(&mut self, ctx: &mut Context<'_, TestDisplay>) -> Result<(), core::convert::Infallible> {
            self.log.borrow_mut().push(Call::Enter(self.mode));
            if let Some(target) = self.redirect_on_enter {
                ctx.request_transition(target);
            }
            Ok(())
        }

        fn update(&mut self, ctx: &mut Context<'_, TestDisplay>) -> Result<(), core::convert::Infallible> {
            self.log.borrow_mut().push(Call::Update(self.mode));
            let mut script = self.script.borrow_mut();
            if let Some(pos) = script.iter().position(|(m, _)| *m == self.mode) {
                let (_, requests) = script.remove(pos);
                for target in requests {
                    ctx.request_transition(target);
                }
            }
            Ok(())
        }

        fn exit(&mut self, _devices: &mut crate::devices::Devices) {
            self.log.borrow_mut().push(Call::Exit(self.mode));
        }
    }

    struct Rig {
        dispatcher: Dispatcher<TestDisplay>,
        log: Log,
        script: Rc<RefCell<Vec<(Mode, Vec<Mode>)>>>,
        display: TestDisplay,
        devices: crate::devices::Devices,
        config: Config,
    }

    impl Rig {
        fn new(redirect: Option<(Mode, Mode)>) -> Self {
            let log: Log = Rc::new(RefCell::new(Vec::new()));
            let script = Rc::new(RefCell::new(Vec::new()));
            let dispatcher = Dispatcher::new(|mode| {
                Box::new(Probe {
                    mode,
                    log: log.clone(),
                    script: script.clone(),
                    redirect_on_enter: redirect.and_then(|(from, to)| (from == mode).then_some(to)),
                }) as Box<dyn Activity<TestDisplay>>
            });
            let (devices, _) = mock_devices();
            Self {
                dispatcher,
                log,
                script,
                display: TestDisplay::default_size(),
                devices,
                config: Config::default(),
            }
        }

        fn tick(&mut self) -> Option<Mode> {
            let input = InputFrame::default();
            let mut delay = NoopDelay;
            let mut ctx = Context::new(
                &mut self.display,
                &input,
                0,
                &mut delay,
                &mut self.devices,
                &self.config,
            );
            self.dispatcher.tick(&mut ctx)
        }

        fn on_update(&self, mode: Mode, requests: Vec<Mode>) {
            self.script.borrow_mut().push((mode, requests));
        }

        fn calls(&self) -> Vec<Call> {
            self.log.borrow_mut().drain(..).collect()
        }
    }

    #[test]
    fn boots_into_menu_with_entry_armed() {
        let rig = Rig::new(None);
        assert_eq!(rig.dispatcher.current_mode(), Mode::Menu);
        assert!(rig.dispatcher.entry_pending());
    }

    #[test]
    fn enter_runs_once_then_only_update() {
        let mut rig = Rig::new(None);
        rig.tick();
        rig.tick();
        rig.tick();
        assert_eq!(
            rig.calls(),
            vec![
                Call::Enter(Mode::Menu),
                Call::Update(Mode::Menu),
                Call::Update(Mode::Menu),
                Call::Update(Mode::Menu),
            ]
        );
    }

    #[test]
    fn transition_commits_after_update_and_enters_next_tick() {
        let mut rig = Rig::new(None);
        rig.tick();
        rig.calls();

        rig.on_update(Mode::Menu, vec![Mode::Camera]);
        assert_eq!(rig.tick(), Some(Mode::Camera));
        assert_eq!(rig.dispatcher.current_mode(), Mode::Camera);
        assert_eq!(
            rig.calls(),
            vec![Call::Update(Mode::Menu), Call::Exit(Mode::Menu)]
        );

        assert_eq!(rig.tick(), None);
        assert_eq!(
            rig.calls(),
            vec![Call::Enter(Mode::Camera), Call::Update(Mode::Camera)]
        );
    }

    #[test]
    fn last_request_in_a_tick_wins() {
        let mut rig = Rig::new(None);
        rig.on_update(Mode::Menu, vec![Mode::Camera, Mode::Photos, Mode::GameMenu]);
        assert_eq!(rig.tick(), Some(Mode::GameMenu));
        assert_eq!(rig.dispatcher.transition_count(), 1);
        rig.tick();
        assert!(rig.calls().contains(&Call::Enter(Mode::GameMenu)));
    }

    #[test]
    fn old_mode_receives_no_calls_after_leaving() {
        let mut rig = Rig::new(None);
        rig.on_update(Mode::Menu, vec![Mode::Snake]);
        rig.tick();
        rig.calls();
        for _ in 0..5 {
            rig.tick();
        }
        assert!(rig
            .calls()
            .iter()
            .all(|c| !matches!(c, Call::Update(Mode::Menu) | Call::Enter(Mode::Menu))));
    }

    #[test]
    fn redirect_during_enter_skips_update() {
        let mut rig = Rig::new(Some((Mode::Menu, Mode::Photos)));
        assert_eq!(rig.tick(), Some(Mode::Photos));
        assert_eq!(
            rig.calls(),
            vec![Call::Enter(Mode::Menu), Call::Exit(Mode::Menu)]
        );
    }

    #[test]
    fn returning_to_a_mode_enters_it_again() {
        let mut rig = Rig::new(None);
        rig.on_update(Mode::Menu, vec![Mode::Pong]);
        rig.tick();
        rig.on_update(Mode::Pong, vec![Mode::Menu]);
        rig.tick();
        rig.tick();
        let calls = rig.calls();
        let enters = calls
            .iter()
            .filter(|c| **c == Call::Enter(Mode::Menu))
            .count();
        assert_eq!(enters, 2);
    }
}
