// ST7735 command definitions

// System
pub const SOFT_RESET: u8 = 0x01;
pub const SLEEP_IN: u8 = 0x10;
pub const SLEEP_OUT: u8 = 0x11;
pub const NORMAL_MODE_ON: u8 = 0x13;
pub const INVERSION_OFF: u8 = 0x20;
pub const INVERSION_ON: u8 = 0x21;
pub const DISPLAY_OFF: u8 = 0x28;
pub const DISPLAY_ON: u8 = 0x29;

// Memory access
pub const COLUMN_ADDRESS_SET: u8 = 0x2A;
pub const ROW_ADDRESS_SET: u8 = 0x2B;
pub const MEMORY_WRITE: u8 = 0x2C;
pub const MEMORY_ACCESS_CONTROL: u8 = 0x36; // MADCTL
pub const PIXEL_FORMAT: u8 = 0x3A; // COLMOD

// Panel tuning
pub const FRAME_RATE_NORMAL: u8 = 0xB1;
pub const FRAME_RATE_IDLE: u8 = 0xB2;
pub const FRAME_RATE_PARTIAL: u8 = 0xB3;
pub const INVERSION_CONTROL: u8 = 0xB4;
pub const POWER_CONTROL_1: u8 = 0xC0;
pub const POWER_CONTROL_2: u8 = 0xC1;
pub const POWER_CONTROL_3: u8 = 0xC2;
pub const POWER_CONTROL_4: u8 = 0xC3;
pub const POWER_CONTROL_5: u8 = 0xC4;
pub const VCOM_CONTROL: u8 = 0xC5;
pub const GAMMA_POSITIVE: u8 = 0xE0;
pub const GAMMA_NEGATIVE: u8 = 0xE1;

// MADCTL bits
pub const MADCTL_MY: u8 = 0x80; // Row address order
pub const MADCTL_MX: u8 = 0x40; // Column address order
pub const MADCTL_MV: u8 = 0x20; // Row/column exchange
pub const MADCTL_BGR: u8 = 0x08; // BGR colour filter panel

// COLMOD value for 16 bits per pixel
pub const PIXEL_FORMAT_16BIT: u8 = 0x05;
