use camdeck_scenario_harness::ScenarioHarness;
use camdeck_ui::mock::{MockCamera, MockHandles, MockPhotoStore};
use camdeck_ui::{Button, Config, Mode};

fn harness_with(handles: MockHandles) -> ScenarioHarness {
    ScenarioHarness::with_handles(handles, Config::default())
}

#[test]
fn captured_photo_can_be_viewed_and_deleted() {
    let mut harness = ScenarioHarness::new();
    assert_eq!(harness.open_from_menu(0), Some(Mode::Camera));
    assert!(harness.handles().camera.0.borrow().previews > 0);

    // Capture, then continue back to live view.
    assert_eq!(harness.press(Button::Up), None);
    assert_eq!(harness.handles().photos.names(), ["IMG_0001.jpg"]);
    assert_eq!(harness.press(Button::Up), None);
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
    harness.idle();

    // The menu still points at Camera; Photos is one below.
    harness.press(Button::Down);
    assert_eq!(harness.press(Button::Select), Some(Mode::Photos));
    harness.idle();

    // Open the viewer, ask to delete, confirm.
    assert_eq!(harness.press(Button::Select), None);
    assert_eq!(harness.handles().photos.0.borrow().loads, 1);
    assert_eq!(harness.press(Button::Up), None);
    assert_eq!(harness.press(Button::Up), None);
    assert!(harness.handles().photos.names().is_empty());

    // Empty list now; Back leaves Photos.
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
}

#[test]
fn viewer_cancel_keeps_the_photo() {
    let handles = MockHandles {
        photos: MockPhotoStore::with_photos(3),
        ..MockHandles::new()
    };
    let mut harness = harness_with(handles);
    harness.open_from_menu(1);

    harness.press(Button::Select);
    harness.press(Button::Down);
    assert_eq!(harness.handles().photos.0.borrow().loads, 2);
    harness.press(Button::Up);
    // Anything but Up cancels the delete.
    assert_eq!(harness.press(Button::Down), None);
    assert_eq!(harness.handles().photos.names().len(), 3);

    // Viewer Back returns to the grid, grid Back to the menu.
    assert_eq!(harness.press(Button::Back), None);
    assert_eq!(harness.mode(), Mode::Photos);
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
}

#[test]
fn missing_sd_card_shows_an_error_and_back_still_works() {
    let handles = MockHandles {
        photos: MockPhotoStore::new(false),
        ..MockHandles::new()
    };
    let mut harness = harness_with(handles);
    assert_eq!(harness.open_from_menu(1), Some(Mode::Photos));
    assert!(harness.display().lit_pixel_count() > 0);
    // Select retries the listing instead of opening anything.
    assert_eq!(harness.press(Button::Select), None);
    assert_eq!(harness.handles().photos.0.borrow().loads, 0);
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
}

#[test]
fn capture_survives_a_failed_save() {
    let handles = MockHandles::new();
    handles.photos.0.borrow_mut().fail_saves = true;
    let mut harness = harness_with(handles);
    harness.open_from_menu(0);

    assert_eq!(harness.press(Button::Up), None);
    assert_eq!(harness.handles().camera.0.borrow().captures, 1);
    assert!(harness.handles().photos.names().is_empty());
    assert_eq!(harness.mode(), Mode::Camera);
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
}

#[test]
fn unavailable_camera_still_lets_the_user_leave() {
    let handles = MockHandles {
        camera: MockCamera::new(false),
        ..MockHandles::new()
    };
    let mut harness = harness_with(handles);
    assert_eq!(harness.open_from_menu(0), Some(Mode::Camera));
    assert_eq!(harness.press(Button::Up), None);
    assert_eq!(harness.handles().camera.0.borrow().captures, 0);
    assert_eq!(harness.press(Button::Back), Some(Mode::Menu));
}
