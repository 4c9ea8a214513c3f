//! Compile-time tunables shared by the dispatcher and activities.

/// Timing and sizing knobs. `Config::default()` matches the device.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Hold duration reported as `long_held` by the input tracker.
    pub long_press_ms: u64,
    /// "Starting <name>" banner shown after a menu commit.
    pub starting_banner_ms: u32,
    /// Items visible at once in every menu.
    pub menu_visible_items: usize,
    /// Chord hold (Up+Down+Select) that dumps diagnostics from the main menu.
    pub diagnostics_chord_ms: u64,
    pub assistant: AssistantTimings,
    pub games: GameTimings,
    /// Stub face screens return to their menu after this long.
    pub face_stub_ms: u64,
    /// Thumbnails per photo grid page.
    pub photos_per_page: usize,
    /// Upper bound on listed photos.
    pub max_photos: usize,
}

/// Voice assistant timeouts and animation cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantTimings {
    /// Recordings at or below this length are rejected.
    pub min_recording_secs: f32,
    pub transcription_display_ms: u64,
    pub result_timeout_ms: u64,
    pub error_timeout_ms: u64,
    pub welcome_ms: u32,
    pub waiting_frame_ms: u64,
    pub listening_frame_ms: u64,
    pub processing_frame_ms: u64,
    pub thinking_frame_ms: u64,
}

/// Fixed-timestep intervals per game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTimings {
    pub snake_step_ms: u64,
    pub pong_step_ms: u64,
    pub breakout_step_ms: u64,
    pub flappy_step_ms: u64,
    pub memory_flash_ms: u64,
    /// Result screen auto-return.
    pub game_over_ms: u64,
    /// Long-press on any button that leaves Snake.
    pub exit_hold_ms: u64,
}

impl Default for AssistantTimings {
    fn default() -> Self {
        Self {
            min_recording_secs: 0.4,
            transcription_display_ms: 3000,
            result_timeout_ms: 8000,
            error_timeout_ms: 3000,
            welcome_ms: 1000,
            waiting_frame_ms: 80,
            listening_frame_ms: 50,
            processing_frame_ms: 80,
            thinking_frame_ms: 100,
        }
    }
}

impl Default for GameTimings {
    fn default() -> Self {
        Self {
            snake_step_ms: 150,
            pong_step_ms: 50,
            breakout_step_ms: 50,
            flappy_step_ms: 80,
            memory_flash_ms: 800,
            game_over_ms: 3000,
            exit_hold_ms: 2000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            long_press_ms: 1000,
            starting_banner_ms: 1500,
            menu_visible_items: 5,
            diagnostics_chord_ms: 2000,
            assistant: AssistantTimings::default(),
            games: GameTimings::default(),
            face_stub_ms: 2000,
            photos_per_page: 6,
            max_photos: 50,
        }
    }
}
