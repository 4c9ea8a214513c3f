//! Board wiring and build-time settings.
//!
//! Peripherals driven through esp-idf-hal take typed pins in `main`:
//!
//! | Function            | GPIO |
//! |---------------------|------|
//! | Button Up           | 4    |
//! | Button Down         | 5    |
//! | Button Select       | 14   |
//! | Button Back         | 13   |
//! | TFT SCLK / MOSI     | 12 / 11 |
//! | TFT CS / DC / RST   | 10 / 3 / 9 |
//! | TFT backlight       | 46   |
//! | Mic SCK / WS / SD   | 17 / 47 / 48 |
//!
//! The raw pad numbers below feed the C drivers (SD-MMC, esp32-camera).

pub mod display {
    pub const SPI_HZ: u32 = 40_000_000;
}

/// SD-MMC, 1-bit bus.
pub mod sd {
    pub const CMD: i32 = 35;
    pub const CLK: i32 = 36;
    pub const D0: i32 = 37;
    pub const MOUNT_POINT: &str = "/sdcard";
    pub const PHOTO_DIR: &str = "/sdcard/photos";
    pub const MAX_OPEN_FILES: i32 = 5;
}

/// OV2640 on the DVP port. `-1` means not connected.
pub mod camera {
    pub const PWDN: i32 = -1;
    pub const RESET: i32 = -1;
    pub const XCLK: i32 = 15;
    pub const SIOD: i32 = 1;
    pub const SIOC: i32 = 2;
    pub const Y9: i32 = 38;
    pub const Y8: i32 = 16;
    pub const Y7: i32 = 18;
    pub const Y6: i32 = 21;
    pub const Y5: i32 = 42;
    pub const Y4: i32 = 41;
    pub const Y3: i32 = 40;
    pub const Y2: i32 = 39;
    pub const VSYNC: i32 = 6;
    pub const HREF: i32 = 7;
    pub const PCLK: i32 = 8;
    pub const XCLK_HZ: i32 = 24_000_000;
    /// Lower is better quality.
    pub const JPEG_QUALITY: i32 = 8;
}

/// INMP441-style I2S microphone.
pub mod mic {
    pub const SAMPLE_RATE: u32 = 16_000;
    /// Recordings are cut off here so a stuck button cannot fill the heap.
    pub const MAX_SECONDS: u32 = 10;
}

pub mod wifi {
    pub const SSID: &str = match option_env!("CAMDECK_WIFI_SSID") {
        Some(ssid) => ssid,
        None => "",
    };
    pub const PASSWORD: &str = match option_env!("CAMDECK_WIFI_PASSWORD") {
        Some(password) => password,
        None => "",
    };
    pub const CONNECT_ATTEMPTS: u32 = 20;
    pub const ATTEMPT_INTERVAL_MS: u32 = 500;
}

pub mod cloud {
    pub const DEEPGRAM_API_KEY: &str = match option_env!("CAMDECK_DEEPGRAM_API_KEY") {
        Some(key) => key,
        None => "",
    };
    pub const GEMINI_API_KEY: &str = match option_env!("CAMDECK_GEMINI_API_KEY") {
        Some(key) => key,
        None => "",
    };
    pub const DEEPGRAM_URL: &str =
        "https://api.deepgram.com/v1/listen?model=nova-2&smart_format=true&language=en";
    pub const GEMINI_URL: &str =
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
    pub const HTTP_TIMEOUT_MS: u64 = 20_000;
    pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;
}

/// Main loop period. Matches the tick used by the host scenario harness.
pub const LOOP_PERIOD_MS: u32 = 20;
