//! HD44780 character LCD behind a PCF8574 I2C backpack.
//!
//! The expander drives the panel in 4-bit mode:
//!
//! ```text
//! P0 RS    P1 RW    P2 EN    P3 backlight    P4..P7 D4..D7
//! ```
//!
//! Every byte goes out as two nibbles, each latched by an EN pulse. RW is
//! held low; the busy flag is never read, fixed delays pace the controller
//! instead.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::model::FontVariant;
use crate::traits::CharacterDisplay;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment cursor, no display shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_CGRAM: u8 = 0x40;
const CMD_SET_DDRAM: u8 = 0x80;

const TWO_LINES: u8 = 0x08;
const FONT_5X10: u8 = 0x04;

/// DDRAM start address per row on 20-column panels.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    columns: u8,
    rows: u8,
}

impl<I2C: I2c, D: DelayNs> Lcd<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            columns: 0,
            rows: 0,
        }
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), &'static str> {
        self.i2c
            .write(self.address, &[bits | BACKLIGHT])
            .map_err(|_| "no ack from expander")
    }

    /// Latch four data bits (already in P4..P7 position) plus flags.
    fn write_nibble(&mut self, bits: u8) -> Result<(), &'static str> {
        self.expander_write(bits)?;
        self.expander_write(bits | EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits & !EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn send(&mut self, byte: u8, flags: u8) -> Result<(), &'static str> {
        self.write_nibble((byte & 0xF0) | flags)?;
        self.write_nibble((byte << 4) | flags)
    }

    fn command(&mut self, cmd: u8) -> Result<(), &'static str> {
        self.send(cmd, 0)
    }

    fn data(&mut self, byte: u8) -> Result<(), &'static str> {
        self.send(byte, RS)
    }
}

impl<I2C: I2c, D: DelayNs> CharacterDisplay for Lcd<I2C, D> {
    fn init(&mut self, columns: u8, rows: u8, font: FontVariant) -> Result<(), &'static str> {
        if rows as usize > ROW_OFFSETS.len() || rows == 0 || columns == 0 {
            return Err("unsupported geometry");
        }
        self.columns = columns;
        self.rows = rows;

        // Probe: a wrong address or pin mapping fails here, before the
        // controller sees anything.
        self.expander_write(0)?;
        self.delay.delay_ms(50);

        // Forced reset into 4-bit mode, HD44780 datasheet figure 24.
        self.write_nibble(0x30)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x30)?;
        self.delay.delay_us(150);
        self.write_nibble(0x30)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20)?;

        let mut function = CMD_FUNCTION_SET;
        if rows > 1 {
            function |= TWO_LINES;
        }
        if font == FontVariant::Dots5x10 && rows == 1 {
            function |= FONT_5X10;
        }
        self.command(function)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE)
    }

    fn clear(&mut self) -> Result<(), &'static str> {
        self.command(CMD_CLEAR)?;
        // Clear is the one slow instruction (1.52 ms busy).
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), &'static str> {
        if column >= self.columns || row >= self.rows {
            return Err("cursor out of range");
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row as usize] + column))
    }

    fn write_text(&mut self, text: &str) -> Result<(), &'static str> {
        for byte in text.bytes() {
            self.data(byte)?;
        }
        Ok(())
    }

    fn write_glyph(&mut self, code: u8) -> Result<(), &'static str> {
        self.data(code)
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), &'static str> {
        if slot > 7 {
            return Err("glyph slot out of range");
        }
        self.command(CMD_SET_CGRAM | (slot << 3))?;
        for row in bitmap {
            self.data(*row)?;
        }
        // Leave the address pointer back in display memory.
        self.command(CMD_SET_DDRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Default)]
    struct FakeI2c {
        writes: Vec<u8>,
        nack: bool,
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.extend_from_slice(*bytes);
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd() -> Lcd<FakeI2c, NoDelay> {
        let mut lcd = Lcd::new(FakeI2c::default(), NoDelay, 0x27);
        // Methods under test assume init-time geometry.
        lcd.columns = 20;
        lcd.rows = 4;
        lcd
    }

    /// Reassemble (rs, byte) pairs from the latched nibbles, skipping the
    /// first `skip` EN pulses (the init dance sends lone nibbles).
    fn sent(writes: &[u8], skip: usize) -> Vec<(bool, u8)> {
        let latched: Vec<u8> = writes.iter().copied().filter(|b| b & EN != 0).collect();
        latched[skip..]
            .chunks(2)
            .map(|pair| ((pair[0] & RS) != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    #[test]
    fn init_fails_when_the_expander_does_not_ack() {
        let mut lcd = Lcd::new(
            FakeI2c {
                nack: true,
                ..FakeI2c::default()
            },
            NoDelay,
            0x27,
        );
        assert!(lcd.init(20, 4, FontVariant::Dots5x8).is_err());
        assert!(lcd.i2c.writes.is_empty());
    }

    #[test]
    fn init_configures_a_four_row_panel() {
        let mut lcd = Lcd::new(FakeI2c::default(), NoDelay, 0x27);
        lcd.init(20, 4, FontVariant::Dots5x8).unwrap();

        // After the 4 reset pulses: function set (4-bit, 2 lines, 5x8),
        // display on, clear, entry mode.
        let bytes = sent(&lcd.i2c.writes, 4);
        assert_eq!(
            bytes,
            vec![(false, 0x28), (false, 0x0C), (false, 0x01), (false, 0x06)]
        );
    }

    #[test]
    fn init_rejects_impossible_geometry() {
        let mut lcd = Lcd::new(FakeI2c::default(), NoDelay, 0x27);
        assert!(lcd.init(20, 5, FontVariant::Dots5x8).is_err());
    }

    #[test]
    fn cursor_addressing_uses_the_row_offsets() {
        let mut lcd = lcd();
        lcd.set_cursor(2, 0).unwrap();
        lcd.set_cursor(0, 3).unwrap();
        assert_eq!(
            sent(&lcd.i2c.writes, 0),
            vec![(false, 0x82), (false, 0xD4)]
        );
    }

    #[test]
    fn cursor_out_of_range_is_rejected() {
        let mut lcd = lcd();
        assert!(lcd.set_cursor(20, 0).is_err());
        assert!(lcd.set_cursor(0, 4).is_err());
    }

    #[test]
    fn text_goes_out_as_data_writes() {
        let mut lcd = lcd();
        lcd.write_text("xx").unwrap();
        lcd.write_glyph(0xDF).unwrap();
        assert_eq!(
            sent(&lcd.i2c.writes, 0),
            vec![(true, b'x'), (true, b'x'), (true, 0xDF)]
        );
    }

    #[test]
    fn glyph_upload_targets_cgram_then_returns_to_ddram() {
        let mut lcd = lcd();
        let bitmap = crate::config::THERMOMETER_BITMAP;
        lcd.define_glyph(1, &bitmap).unwrap();

        let bytes = sent(&lcd.i2c.writes, 0);
        assert_eq!(bytes[0], (false, 0x48));
        for (i, row) in bitmap.iter().enumerate() {
            assert_eq!(bytes[1 + i], (true, *row));
        }
        assert_eq!(*bytes.last().unwrap(), (false, 0x80));
    }

    #[test]
    fn glyph_slot_is_bounded() {
        let mut lcd = lcd();
        assert!(lcd.define_glyph(8, &[0; 8]).is_err());
    }

    #[test]
    fn backlight_stays_on_for_every_write() {
        let mut lcd = lcd();
        lcd.write_glyph(b'A').unwrap();
        assert!(lcd.i2c.writes.iter().all(|b| b & BACKLIGHT != 0));
    }
}
