use std::path::PathBuf;

use camdeck_scenario_harness::ScenarioHarness;
use camdeck_ui::mock::{MockHandles, MockPhotoStore};
use camdeck_ui::{Button, Config, Mode};

fn screenshot_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("screenshots")
}

fn snap(harness: &ScenarioHarness, name: &str) {
    let path = screenshot_dir().join(name);
    harness
        .save_screenshot_png(&path)
        .unwrap_or_else(|e| panic!("Failed to save {name}: {e}"));
    assert!(path.exists());
}

#[test]
fn screenshot_main_menu_leaves() {
    let leaves = [
        (0, "02_camera.png"),
        (1, "03_photos.png"),
        (2, "04_face_menu.png"),
        (3, "05_object_detection.png"),
        (4, "06_assistant.png"),
        (5, "07_game_menu.png"),
    ];
    for (downs, name) in leaves {
        let handles = MockHandles {
            photos: MockPhotoStore::with_photos(7),
            ..MockHandles::new()
        };
        let mut harness = ScenarioHarness::with_handles(handles, Config::default());
        if downs == 0 {
            harness.idle();
            snap(&harness, "01_main_menu.png");
        }
        harness.open_from_menu(downs);
        snap(&harness, name);
    }
}

#[test]
fn screenshot_every_game() {
    let games = [
        (Mode::Snake, "10_snake.png"),
        (Mode::Pong, "11_pong.png"),
        (Mode::Breakout, "12_breakout.png"),
        (Mode::FlappyBird, "13_flappy.png"),
        (Mode::Memory, "14_memory.png"),
    ];
    for (downs, (game, name)) in games.into_iter().enumerate() {
        let mut harness = ScenarioHarness::new();
        harness.open_from_menu(5);
        for _ in 0..downs {
            harness.press(Button::Down);
        }
        assert_eq!(harness.press(Button::Select), Some(game));
        harness.idle_for(500);
        snap(&harness, name);
    }
}

#[test]
fn screenshot_is_a_valid_png() {
    let mut harness = ScenarioHarness::new();
    harness.idle();
    let path = screenshot_dir().join("signature_check.png");
    harness.save_screenshot_png(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
