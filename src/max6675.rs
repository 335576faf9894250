//! MAX6675 thermocouple-to-digital converter (SPI, read-only).
//!
//! One 16-bit frame per transaction:
//!
//! ```text
//! D15      dummy sign bit, always 0
//! D14..D3  temperature counts, 0.25 degC per LSB
//! D2       open-thermocouple flag
//! D1       device id, always 0
//! D0       tri-state
//! ```
//!
//! The part has no id register, so [`Max6675::chip_id`] packs the frame's
//! datasheet-fixed bits (D15, D1) into a signature. A present, powered chip
//! reads 0x0000; a floating bus reads back all ones and fails the startup
//! check.

use embedded_hal::spi::SpiDevice;

use crate::model::Reading;
use crate::traits::TemperatureSensor;

/// Bits that the datasheet pins to zero on every frame.
const FIXED_BITS_MASK: u16 = 0x8002;

/// Open-thermocouple flag.
const OPEN_BIT: u16 = 0x0004;

const COUNTS_PER_CELSIUS: f32 = 4.0;

pub struct Max6675<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Max6675<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    fn read_frame(&mut self) -> Result<u16, &'static str> {
        let mut buf = [0u8; 2];
        self.spi.read(&mut buf).map_err(|_| "spi transfer failed")?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<SPI: SpiDevice> TemperatureSensor for Max6675<SPI> {
    fn init(&mut self) -> Result<(), &'static str> {
        // Reading a frame restarts the converter; the first result after
        // power-up is discarded.
        self.read_frame().map(|_| ())
    }

    fn chip_id(&mut self) -> Result<u16, &'static str> {
        Ok(self.read_frame()? & FIXED_BITS_MASK)
    }

    fn thermocouple_present(&mut self) -> Result<bool, &'static str> {
        Ok(self.read_frame()? & OPEN_BIT == 0)
    }

    fn read_temperature(&mut self) -> Result<Reading, &'static str> {
        let frame = self.read_frame()?;
        if frame & OPEN_BIT != 0 {
            return Ok(Reading::Fault);
        }
        let counts = (frame >> 3) & 0x0FFF;
        Ok(Reading::Celsius(counts as f32 / COUNTS_PER_CELSIUS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{ErrorType, Operation};

    /// SPI device that answers every read with a fixed frame.
    struct FakeSpi {
        frame: u16,
    }

    impl ErrorType for FakeSpi {
        type Error = core::convert::Infallible;
    }

    impl SpiDevice for FakeSpi {
        fn transaction(
            &mut self,
            operations: &mut [Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let Operation::Read(buf) = op {
                    buf.copy_from_slice(&self.frame.to_be_bytes());
                }
            }
            Ok(())
        }
    }

    fn sensor(frame: u16) -> Max6675<FakeSpi> {
        Max6675::new(FakeSpi { frame })
    }

    #[test]
    fn decodes_quarter_degree_counts() {
        // 100.0 degC = 400 counts, left-aligned into D14..D3.
        assert_eq!(
            sensor(400 << 3).read_temperature().unwrap(),
            Reading::Celsius(100.0)
        );
        assert_eq!(
            sensor(1 << 3).read_temperature().unwrap(),
            Reading::Celsius(0.25)
        );
        assert_eq!(sensor(0).read_temperature().unwrap(), Reading::Celsius(0.0));
    }

    #[test]
    fn open_thermocouple_reads_as_fault() {
        let mut s = sensor((400 << 3) | 0x0004);
        assert_eq!(s.read_temperature().unwrap(), Reading::Fault);
        assert_eq!(s.thermocouple_present().unwrap(), false);
    }

    #[test]
    fn healthy_frame_has_the_expected_chip_id() {
        assert_eq!(
            sensor(400 << 3).chip_id().unwrap(),
            crate::config::EXPECTED_CHIP_ID
        );
    }

    #[test]
    fn floating_bus_fails_the_chip_id_check() {
        assert_ne!(
            sensor(0xFFFF).chip_id().unwrap(),
            crate::config::EXPECTED_CHIP_ID
        );
    }
}
