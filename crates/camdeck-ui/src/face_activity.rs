//! Face recognition menu and its two stub leaves.
//!
//! There is no recognizer on the device. The enroll and recognize leaves
//! only report that they are unavailable, so nothing ever adds a face: the
//! database screen always reads "Enrolled faces: 0" and Delete All confirms
//! and clears an empty count. The count lives on the menu so a real enroll
//! flow has one place to increment.

use alloc::format;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    text::{Alignment, Text},
};

use crate::input::Button;
use crate::menu::{MenuAction, MenuNavigator, MenuOption};
use crate::menu_activity::start_banner;
use crate::mode::{FaceMenuOption, Mode};
use crate::ui::theme::{layout, ui_font_body, ui_font_small};
use crate::ui::{palette, Activity, Banner, Context, Header};

/// In-place screens of the face menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMenuState {
    Browsing,
    ViewingDatabase,
    ConfirmDelete,
    /// "All faces deleted" shown since the given tick.
    Deleted { since_ms: u64 },
}

pub struct FaceMenuActivity {
    navigator: MenuNavigator<FaceMenuOption>,
    state: FaceMenuState,
    enrolled: usize,
}

impl FaceMenuActivity {
    pub fn new(visible_items: usize) -> Self {
        Self {
            navigator: MenuNavigator::new("FACE RECOGNITION", &FaceMenuOption::ALL, visible_items),
            state: FaceMenuState::Browsing,
            enrolled: 0,
        }
    }

    pub fn state(&self) -> FaceMenuState {
        self.state
    }

    pub fn enrolled(&self) -> usize {
        self.enrolled
    }

    fn show<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
        state: FaceMenuState,
    ) -> Result<(), D::Error> {
        self.state = state;
        match state {
            FaceMenuState::Browsing => self.navigator.render(display),
            FaceMenuState::ViewingDatabase => {
                display.clear(palette::BACKGROUND)?;
                Header::new("FACE DATABASE").render(display)?;
                let count = format!("Enrolled faces: {}", self.enrolled);
                Text::new(
                    &count,
                    Point::new(layout::MARGIN, 50),
                    MonoTextStyle::new(ui_font_small(), palette::TEXT),
                )
                .draw(display)?;
                footer(display, "BACK: return")
            }
            FaceMenuState::ConfirmDelete => {
                display.clear(palette::BACKGROUND)?;
                Header::new("DELETE ALL").color(palette::ERROR).render(display)?;
                let center_x = display.bounding_box().center().x;
                Text::with_alignment(
                    "Delete all faces?",
                    Point::new(center_x, 70),
                    MonoTextStyle::new(ui_font_body(), palette::WARNING),
                    Alignment::Center,
                )
                .draw(display)?;
                footer(display, "SELECT: yes  BACK: no")
            }
            FaceMenuState::Deleted { .. } => Banner::new("Deleted", palette::SUCCESS)
                .detail("All faces deleted")
                .render(display),
        }
    }
}

fn footer<D: DrawTarget<Color = Rgb565>>(display: &mut D, hint: &str) -> Result<(), D::Error> {
    let center_x = display.bounding_box().center().x;
    Text::with_alignment(
        hint,
        Point::new(center_x, layout::FOOTER_TEXT_Y),
        MonoTextStyle::new(ui_font_small(), palette::MUTED),
        Alignment::Center,
    )
    .draw(display)?;
    Ok(())
}

impl<D: DrawTarget<Color = Rgb565>> Activity<D> for FaceMenuActivity {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        self.show(ctx.display, FaceMenuState::Browsing)
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        match self.state {
            FaceMenuState::Browsing => {}
            FaceMenuState::ViewingDatabase => {
                if ctx.input.pressed(Button::Back) {
                    self.show(ctx.display, FaceMenuState::Browsing)?;
                }
                return Ok(());
            }
            FaceMenuState::ConfirmDelete => {
                if ctx.input.pressed(Button::Select) {
                    log::info!("Deleting {} enrolled faces", self.enrolled);
                    self.enrolled = 0;
                    self.show(ctx.display, FaceMenuState::Deleted { since_ms: ctx.now_ms })?;
                } else if ctx.input.pressed(Button::Back) {
                    self.show(ctx.display, FaceMenuState::Browsing)?;
                }
                return Ok(());
            }
            FaceMenuState::Deleted { since_ms } => {
                if ctx.now_ms.saturating_sub(since_ms) >= ctx.config.face_stub_ms {
                    self.show(ctx.display, FaceMenuState::Browsing)?;
                }
                return Ok(());
            }
        }

        let action = self.navigator.handle(ctx.input);
        match action {
            MenuAction::None => Ok(()),
            MenuAction::Moved { .. } => self.navigator.render_action(ctx.display, &action),
            MenuAction::Back | MenuAction::Committed(FaceMenuOption::Back) => {
                ctx.request_transition(Mode::FaceRecognitionMenu.parent());
                Ok(())
            }
            MenuAction::Committed(FaceMenuOption::ViewDatabase) => {
                self.show(ctx.display, FaceMenuState::ViewingDatabase)
            }
            MenuAction::Committed(FaceMenuOption::DeleteAll) => {
                self.show(ctx.display, FaceMenuState::ConfirmDelete)
            }
            MenuAction::Committed(option) => {
                if let Some(target) = option.target() {
                    start_banner(ctx, option.label())?;
                    ctx.request_transition(target);
                }
                Ok(())
            }
        }
    }
}

/// Enroll and Recognize: report unavailability, then return to the menu.
pub struct FaceStubActivity {
    mode: Mode,
    title: &'static str,
    entered_ms: u64,
}

impl FaceStubActivity {
    pub fn enroll() -> Self {
        Self {
            mode: Mode::FaceEnroll,
            title: "Enroll",
            entered_ms: 0,
        }
    }

    pub fn recognize() -> Self {
        Self {
            mode: Mode::FaceRecognize,
            title: "Recognize",
            entered_ms: 0,
        }
    }
}

impl<D: DrawTarget<Color = Rgb565>> Activity<D> for FaceStubActivity {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        self.entered_ms = ctx.now_ms;
        Banner::new(self.title, palette::WARNING)
            .detail("not available")
            .render(ctx.display)
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        let elapsed = ctx.now_ms.saturating_sub(self.entered_ms);
        if ctx.input.pressed(Button::Back) || elapsed >= ctx.config.face_stub_ms {
            ctx.request_transition(self.mode.parent());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ActivityRig;

    fn menu_at(rig: &mut ActivityRig, downs: usize) -> FaceMenuActivity {
        let mut menu = FaceMenuActivity::new(rig.config.menu_visible_items);
        rig.enter(&mut menu);
        for _ in 0..downs {
            rig.press(&mut menu, Button::Down);
        }
        menu
    }

    #[test]
    fn enroll_goes_through_starting_banner() {
        let mut rig = ActivityRig::new();
        let mut menu = menu_at(&mut rig, 0);
        assert_eq!(rig.press(&mut menu, Button::Select), Some(Mode::FaceEnroll));
        assert_eq!(rig.delay.total_ms(), 1500);
    }

    #[test]
    fn back_option_and_back_button_both_return_to_main_menu() {
        let mut rig = ActivityRig::new();
        let mut menu = menu_at(&mut rig, 4);
        assert_eq!(rig.press(&mut menu, Button::Select), Some(Mode::Menu));

        let mut menu = menu_at(&mut rig, 1);
        assert_eq!(rig.press(&mut menu, Button::Back), Some(Mode::Menu));
    }

    #[test]
    fn database_view_stays_in_place_until_back() {
        let mut rig = ActivityRig::new();
        let mut menu = menu_at(&mut rig, 2);
        assert_eq!(rig.press(&mut menu, Button::Select), None);
        assert_eq!(menu.state(), FaceMenuState::ViewingDatabase);
        assert_eq!(rig.idle_for(&mut menu, 5000), None);
        assert_eq!(rig.press(&mut menu, Button::Back), None);
        assert_eq!(menu.state(), FaceMenuState::Browsing);
    }

    #[test]
    fn delete_all_confirms_then_shows_message_for_two_seconds() {
        let mut rig = ActivityRig::new();
        let mut menu = menu_at(&mut rig, 3);
        rig.press(&mut menu, Button::Select);
        assert_eq!(menu.state(), FaceMenuState::ConfirmDelete);

        rig.press(&mut menu, Button::Select);
        assert!(matches!(menu.state(), FaceMenuState::Deleted { .. }));
        assert_eq!(menu.enrolled(), 0);

        rig.idle_for(&mut menu, 1800);
        assert!(matches!(menu.state(), FaceMenuState::Deleted { .. }));
        rig.idle_for(&mut menu, 300);
        assert_eq!(menu.state(), FaceMenuState::Browsing);
    }

    #[test]
    fn enrolling_through_the_stub_adds_no_face() {
        let mut rig = ActivityRig::new();
        let mut menu = menu_at(&mut rig, 0);
        assert_eq!(rig.press(&mut menu, Button::Select), Some(Mode::FaceEnroll));

        let mut stub = FaceStubActivity::enroll();
        rig.enter(&mut stub);
        assert_eq!(
            rig.idle_for(&mut stub, 2100),
            Some(Mode::FaceRecognitionMenu)
        );

        rig.enter(&mut menu);
        rig.press(&mut menu, Button::Down);
        rig.press(&mut menu, Button::Down);
        rig.press(&mut menu, Button::Select);
        assert_eq!(menu.state(), FaceMenuState::ViewingDatabase);
        assert_eq!(menu.enrolled(), 0);
    }

    #[test]
    fn delete_all_cancel_returns_to_menu_list() {
        let mut rig = ActivityRig::new();
        let mut menu = menu_at(&mut rig, 3);
        rig.press(&mut menu, Button::Select);
        assert_eq!(rig.press(&mut menu, Button::Back), None);
        assert_eq!(menu.state(), FaceMenuState::Browsing);
    }

    #[test]
    fn stub_returns_after_timeout() {
        let mut rig = ActivityRig::new();
        let mut stub = FaceStubActivity::recognize();
        assert_eq!(rig.enter(&mut stub), None);
        assert_eq!(rig.idle_for(&mut stub, 1900), None);
        assert_eq!(
            rig.idle_for(&mut stub, 200),
            Some(Mode::FaceRecognitionMenu)
        );
    }

    #[test]
    fn stub_back_returns_immediately() {
        let mut rig = ActivityRig::new();
        let mut stub = FaceStubActivity::enroll();
        rig.enter(&mut stub);
        assert_eq!(
            rig.press(&mut stub, Button::Back),
            Some(Mode::FaceRecognitionMenu)
        );
    }
}
