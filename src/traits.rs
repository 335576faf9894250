//! Hardware abstraction traits

use crate::model::{FontVariant, Reading};

/// Trait for the thermocouple digitizer.
pub trait TemperatureSensor {
    /// Initialize the sensor (flush the converter pipeline).
    fn init(&mut self) -> Result<(), &'static str>;

    /// Read the chip identifier, compared against a known-good constant
    /// at startup.
    fn chip_id(&mut self) -> Result<u16, &'static str>;

    /// Whether a thermocouple is physically attached. Advisory only.
    fn thermocouple_present(&mut self) -> Result<bool, &'static str>;

    /// Read one temperature sample. A bus failure is `Err`; an open
    /// thermocouple is `Ok(Reading::Fault)`.
    fn read_temperature(&mut self) -> Result<Reading, &'static str>;
}

/// Trait for cursor-addressed character displays.
pub trait CharacterDisplay {
    /// Initialize the display with the given geometry and font.
    fn init(&mut self, columns: u8, rows: u8, font: FontVariant) -> Result<(), &'static str>;

    /// Clear the display and home the cursor.
    fn clear(&mut self) -> Result<(), &'static str>;

    /// Move the cursor to (column, row), zero-based.
    fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), &'static str>;

    /// Write text at the current cursor position.
    fn write_text(&mut self, text: &str) -> Result<(), &'static str>;

    /// Write a single raw character code (ROM or CGRAM glyph).
    fn write_glyph(&mut self, code: u8) -> Result<(), &'static str>;

    /// Load an 8-byte bitmap into programmable glyph memory (slots 0-7).
    fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), &'static str>;
}
