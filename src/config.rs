//! Compile-time configuration: display geometry, glyph codes, cadence.

use crate::model::FontVariant;

/// Display geometry (20x4 character panel).
pub const LCD_COLUMNS: u8 = 20;
pub const LCD_ROWS: u8 = 4;
pub const LCD_FONT: FontVariant = FontVariant::Dots5x8;

/// PCF8574 backpack address. 0x3F on boards with the PCF8574A.
pub const LCD_I2C_ADDRESS: u8 = 0x27;

/// Column the numeric field starts at; column 0 holds the static icon.
pub const READING_COLUMN: u8 = 2;

/// Row the bar graph is drawn on.
pub const BAR_ROW: u8 = 3;

/// Tag character at the start of the bar graph row.
pub const BAR_LABEL: char = 'T';

/// Bar graph full scale in degrees Celsius.
pub const TEMP_FULL_SCALE_C: f32 = 45.0;

/// CGRAM slot holding the thermometer icon.
pub const THERMOMETER_GLYPH: u8 = 0;

/// 5x8 thermometer icon, one byte per pixel row.
pub const THERMOMETER_BITMAP: [u8; 8] = [
    0b00100, 0b01010, 0b01010, 0b01110, 0b01110, 0b11111, 0b11111, 0b01110,
];

/// Degree sign in the HD44780 A00 character ROM.
pub const DEGREE_GLYPH: u8 = 0xDF;

/// All-pixels-on block, used for bar graph fill.
pub const FULL_BLOCK_GLYPH: u8 = 0xFF;

/// Blank cell; erases leftovers from a previously longer value.
pub const BLANK_GLYPH: u8 = 0x20;

/// Chip-id signature expected from the sensor (MAX6675 fixed frame bits).
pub const EXPECTED_CHIP_ID: u16 = 0x0000;

/// Steady-state sampling cadence.
pub const SAMPLE_INTERVAL_MS: u64 = 1_000;

/// Delay between startup probe attempts.
pub const RETRY_DELAY_MS: u64 = 5_000;

/// Pause after the display confirmation, for visibility.
pub const DISPLAY_SETTLE_MS: u64 = 1_000;

/// Pause after the sensor confirmation.
pub const SENSOR_SETTLE_MS: u64 = 2_000;
