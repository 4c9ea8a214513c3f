//! Main menu and game menu activities.
//!
//! Both wrap a [`MenuNavigator`]; a committed option shows a short
//! "Starting" banner and then requests the matching mode.

use core::fmt::Debug;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::Config;
use crate::input::{Button, InputFrame};
use crate::menu::{MenuAction, MenuNavigator, MenuOption};
use crate::mode::{GameOption, MainMenuOption, Mode};
use crate::ui::{palette, Activity, Banner, Context};

const DIAGNOSTICS_CHORD: [Button; 3] = [Button::Up, Button::Down, Button::Select];

/// A menu whose options each lead to one mode.
pub trait ModeMenuOption: MenuOption + Debug + 'static {
    fn target(self) -> Mode;
}

impl ModeMenuOption for MainMenuOption {
    fn target(self) -> Mode {
        MainMenuOption::target(self)
    }
}

impl ModeMenuOption for GameOption {
    fn target(self) -> Mode {
        GameOption::target(self)
    }
}

pub struct MenuActivity<T: ModeMenuOption> {
    navigator: MenuNavigator<T>,
    /// Where Back goes; the main menu has no parent.
    parent: Option<Mode>,
    diagnostics: bool,
}

impl MenuActivity<MainMenuOption> {
    pub fn main(config: &Config) -> Self {
        Self {
            navigator: MenuNavigator::new(
                "CAMDECK",
                &MainMenuOption::ALL,
                config.menu_visible_items,
            ),
            parent: None,
            diagnostics: true,
        }
    }
}

impl MenuActivity<GameOption> {
    pub fn games(config: &Config) -> Self {
        Self {
            navigator: MenuNavigator::new("GAMES", &GameOption::ALL, config.menu_visible_items),
            parent: Some(Mode::GameMenu.parent()),
            diagnostics: false,
        }
    }
}

impl<T: ModeMenuOption> MenuActivity<T> {
    pub fn navigator(&self) -> &MenuNavigator<T> {
        &self.navigator
    }
}

impl<T, D> Activity<D> for MenuActivity<T>
where
    T: ModeMenuOption,
    D: DrawTarget<Color = Rgb565>,
{
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        self.navigator.render(ctx.display)
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        if self.diagnostics
            && ctx
                .input
                .chord_held_for(&DIAGNOSTICS_CHORD, ctx.config.diagnostics_chord_ms)
        {
            log::info!("Diagnostics chord held");
            ctx.devices.photos.log_status();
            log::info!(
                "Camera available: {}, WiFi connected: {}",
                ctx.devices.camera.is_available(),
                ctx.devices.assistant.is_connected()
            );
            return Ok(());
        }
        // Buttons of the chord go down one at a time; once two of them are
        // held, the rest belong to the chord and must not navigate or commit.
        if self.diagnostics && chord_forming(ctx.input) {
            return Ok(());
        }

        let action = self.navigator.handle(ctx.input);
        match action {
            MenuAction::None => Ok(()),
            MenuAction::Moved { .. } => self.navigator.render_action(ctx.display, &action),
            MenuAction::Committed(option) => {
                let target = option.target();
                log::info!("{}: selected {:?}", self.navigator.title(), option);
                start_banner(ctx, option.label())?;
                ctx.request_transition(target);
                Ok(())
            }
            MenuAction::Back => {
                if let Some(parent) = self.parent {
                    ctx.request_transition(parent);
                }
                Ok(())
            }
        }
    }
}

fn chord_forming(input: &InputFrame) -> bool {
    DIAGNOSTICS_CHORD
        .iter()
        .filter(|button| input.is_down(**button))
        .count()
        >= 2
}

/// Show "Starting <label>" and hold it for the configured time.
pub(crate) fn start_banner<D: DrawTarget<Color = Rgb565>>(
    ctx: &mut Context<'_, D>,
    label: &str,
) -> Result<(), D::Error> {
    Banner::new("Starting", palette::SUCCESS)
        .detail(label)
        .render(ctx.display)?;
    ctx.delay.delay_ms(ctx.config.starting_banner_ms);
    Ok(())
}
