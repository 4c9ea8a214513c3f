//! Mode dispatch and activities for the camdeck handheld.
//! Works on ESP32-S3 and on the desktop.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

pub mod app;
pub mod assistant_activity;
pub mod camera_activity;
pub mod config;
pub mod devices;
pub mod dispatcher;
pub mod face_activity;
pub mod games;
pub mod input;
pub mod menu;
pub mod menu_activity;
pub mod mode;
pub mod photos_activity;
pub mod placeholder_activity;
pub mod test_display;
pub mod ui;

#[cfg(any(test, feature = "std"))]
pub mod mock;

pub use app::App;
pub use assistant_activity::{AssistantActivity, AssistantState};
pub use camera_activity::{CameraActivity, CameraState};
pub use config::Config;
pub use devices::{
    AssistantError, AssistantService, Camera, CameraError, Devices, Frame, PhotoInfo, PhotoStore,
    Recorder, RecorderError, Recording, StorageError,
};
pub use dispatcher::Dispatcher;
pub use input::{Button, ButtonLevels, ButtonState, InputFrame, InputSource, InputTracker};
pub use menu::{MenuAction, MenuNavigator, MenuOption};
pub use mode::{FaceMenuOption, GameOption, MainMenuOption, Mode};
pub use photos_activity::{PhotosActivity, PhotosState};

/// Panel dimensions (portrait).
/// ST7735 is 128x160 in its native orientation.
pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 160;
