use camdeck_scenario_harness::ScenarioHarness;
use camdeck_ui::{Button, ButtonLevels, Mode};

const MAIN_MENU: [(usize, Mode); 6] = [
    (0, Mode::Camera),
    (1, Mode::Photos),
    (2, Mode::FaceRecognitionMenu),
    (3, Mode::ObjectDetection),
    (4, Mode::AiAssistant),
    (5, Mode::GameMenu),
];

#[test]
fn boot_lands_on_the_main_menu() {
    let mut harness = ScenarioHarness::new();
    assert_eq!(harness.mode(), Mode::Menu);
    assert_eq!(harness.idle(), None);
    assert!(harness.display().lit_pixel_count() > 0);
    assert!(!harness.app().dispatcher().entry_pending());
}

#[test]
fn every_main_menu_entry_opens_and_back_returns() {
    for (downs, expected) in MAIN_MENU {
        let mut harness = ScenarioHarness::new();
        assert_eq!(harness.open_from_menu(downs), Some(expected), "entry {downs}");
        assert_eq!(harness.mode(), expected);
        assert!(harness.display().lit_pixel_count() > 0);

        assert_eq!(harness.press(Button::Back), Some(Mode::Menu), "{expected:?}");
        harness.idle();
        assert_eq!(harness.mode(), Mode::Menu);
        assert_eq!(harness.transitions(), [expected, Mode::Menu]);
    }
}

#[test]
fn commit_shows_the_starting_banner_once() {
    let mut harness = ScenarioHarness::new();
    harness.open_from_menu(3);
    assert_eq!(harness.blocked_ms(), 1500);
    harness.press(Button::Back);
    assert_eq!(harness.blocked_ms(), 1500);
}

#[test]
fn up_from_the_top_wraps_to_games() {
    let mut harness = ScenarioHarness::new();
    harness.idle();
    assert_eq!(harness.press(Button::Up), None);
    assert_eq!(harness.press(Button::Select), Some(Mode::GameMenu));
}

#[test]
fn main_menu_remembers_the_selection() {
    let mut harness = ScenarioHarness::new();
    assert_eq!(harness.open_from_menu(1), Some(Mode::Photos));
    harness.press(Button::Back);
    harness.idle();
    assert_eq!(harness.press(Button::Select), Some(Mode::Photos));
}

#[test]
fn back_on_the_main_menu_goes_nowhere() {
    let mut harness = ScenarioHarness::new();
    harness.idle();
    assert_eq!(harness.press(Button::Back), None);
    assert_eq!(harness.mode(), Mode::Menu);
    assert!(harness.transitions().is_empty());
}

#[test]
fn diagnostics_chord_neither_navigates_nor_commits() {
    let mut harness = ScenarioHarness::new();
    harness.idle();
    let chord = ButtonLevels::NONE
        .with(Button::Up)
        .with(Button::Down)
        .with(Button::Select);
    assert_eq!(harness.hold(chord, 2500), None);
    assert_eq!(harness.mode(), Mode::Menu);
    assert!(harness.transitions().is_empty());
}

#[test]
fn staggered_diagnostics_chord_does_not_start_anything() {
    let mut harness = ScenarioHarness::new();
    harness.idle();
    let up = ButtonLevels::NONE.with(Button::Up);
    let up_down = up.with(Button::Down);
    harness.tick(up);
    harness.tick(up_down);
    assert_eq!(harness.hold(up_down.with(Button::Select), 2400), None);
    assert_eq!(harness.handles().photos.0.borrow().status_logs, 1);
    assert_eq!(harness.blocked_ms(), 0);
    assert!(harness.transitions().is_empty());
}

#[test]
fn every_game_opens_from_the_game_menu_and_exits() {
    let games = [Mode::Snake, Mode::Pong, Mode::Breakout, Mode::FlappyBird, Mode::Memory];
    for (downs, game) in games.into_iter().enumerate() {
        let mut harness = ScenarioHarness::new();
        assert_eq!(harness.open_from_menu(5), Some(Mode::GameMenu));
        for _ in 0..downs {
            harness.press(Button::Down);
        }
        assert_eq!(harness.press(Button::Select), Some(game));
        harness.idle();
        assert_eq!(harness.mode(), game);

        let exit = if game == Mode::Snake {
            // Snake steers with every button; only a long hold leaves.
            assert_eq!(harness.press(Button::Back), None);
            harness.hold(ButtonLevels::NONE.with(Button::Down), 2100)
        } else {
            harness.press(Button::Back)
        };
        assert_eq!(exit, Some(Mode::GameMenu), "{game:?}");
        harness.idle();
        assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
    }
}

#[test]
fn face_menu_database_and_delete_stay_in_place() {
    let mut harness = ScenarioHarness::new();
    assert_eq!(harness.open_from_menu(2), Some(Mode::FaceRecognitionMenu));

    // View Database, then Back to the list.
    harness.press(Button::Down);
    harness.press(Button::Down);
    assert_eq!(harness.press(Button::Select), None);
    assert_eq!(harness.press(Button::Back), None);
    assert_eq!(harness.mode(), Mode::FaceRecognitionMenu);

    // Delete All, confirm, then the notice times out.
    harness.press(Button::Down);
    assert_eq!(harness.press(Button::Select), None);
    assert_eq!(harness.press(Button::Select), None);
    assert_eq!(harness.idle_for(2100), None);
    assert_eq!(harness.mode(), Mode::FaceRecognitionMenu);

    // The Back entry is last.
    harness.press(Button::Down);
    assert_eq!(harness.press(Button::Select), Some(Mode::Menu));
}

#[test]
fn face_stubs_return_to_the_face_menu() {
    let mut harness = ScenarioHarness::new();
    harness.open_from_menu(2);
    assert_eq!(harness.press(Button::Select), Some(Mode::FaceEnroll));
    harness.idle();
    assert_eq!(harness.idle_for(2100), Some(Mode::FaceRecognitionMenu));
    harness.idle();

    harness.press(Button::Down);
    assert_eq!(harness.press(Button::Select), Some(Mode::FaceRecognize));
    harness.idle();
    assert_eq!(harness.press(Button::Back), Some(Mode::FaceRecognitionMenu));
    harness.idle();
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
}

#[test]
fn menu_tick_stays_within_budget() {
    let mut harness = ScenarioHarness::new();
    harness.idle();
    harness.assert_tick_budget_ms(50, "main menu");
}
