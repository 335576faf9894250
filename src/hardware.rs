//! ESP32-S3 wiring for the two peripherals.
//!
//! Board pinout:
//! - MAX6675 on SPI2: SCK GPIO12, MISO (SO) GPIO11, CS GPIO10
//! - PCF8574 backpack on I2C0: SDA GPIO8, SCL GPIO9

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::gpio::AnyPin;
use esp_hal::{
    Blocking,
    delay::Delay,
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::{I2C0, SPI2},
    spi::master::{Config as SpiConfig, Spi},
    time::Rate,
};

use crate::config::LCD_I2C_ADDRESS;
use crate::lcd::Lcd;
use crate::max6675::Max6675;

/// MAX6675 tops out at 4.3 MHz; 1 MHz leaves margin on jumper wires.
const SPI_FREQ_MHZ: u32 = 1;

/// PCF8574 is a 100 kHz part.
const I2C_FREQ_KHZ: u32 = 100;

pub type Thermocouple<'a> = Max6675<ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, Delay>>;

pub type Panel<'a> = Lcd<I2c<'a, Blocking>, Delay>;

/// Wire SPI2 plus a chip-select into the thermocouple digitizer.
pub fn thermocouple<'a, SCK, MISO, CS>(
    spi_periph: SPI2<'a>,
    sck_gpio: SCK,
    miso_gpio: MISO,
    cs_gpio: CS,
) -> Thermocouple<'a>
where
    SCK: Into<AnyPin<'a>>,
    MISO: Into<AnyPin<'a>>,
    CS: Into<AnyPin<'a>>,
{
    let spi_bus = Spi::new(
        spi_periph,
        SpiConfig::default().with_frequency(Rate::from_mhz(SPI_FREQ_MHZ)),
    )
    .unwrap()
    .with_sck(sck_gpio.into())
    .with_miso(miso_gpio.into());

    let cs = Output::new(cs_gpio.into(), Level::High, OutputConfig::default());
    let spi = ExclusiveDevice::new(spi_bus, cs, Delay::new()).unwrap();

    Max6675::new(spi)
}

/// Wire I2C0 into the character panel driver.
pub fn panel<'a, SDA, SCL>(i2c_periph: I2C0<'a>, sda: SDA, scl: SCL) -> Panel<'a>
where
    SDA: Into<AnyPin<'a>>,
    SCL: Into<AnyPin<'a>>,
{
    let i2c = I2c::new(
        i2c_periph,
        I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQ_KHZ)),
    )
    .unwrap()
    .with_sda(sda.into())
    .with_scl(scl.into());

    Lcd::new(i2c, Delay::new(), LCD_I2C_ADDRESS)
}
