//! I2C bus scan.
//!
//! Finds the LCD backpack when the silkscreen lies about its address.
//! PCF8574 boards answer in 0x20..=0x27, the PCF8574A variant in
//! 0x38..=0x3F.
//!
//! Following pins are used:
//! - SDA => GPIO8
//! - SCL => GPIO9

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use embassy_executor::Spawner;
    use embassy_time::{Duration, Timer};
    use esp_backtrace as _;
    use esp_hal::{
        i2c::master::{Config, I2c},
        time::Rate,
        timer::timg::TimerGroup,
    };

    esp_bootloader_esp_idf::esp_app_desc!();

    #[esp_rtos::main]
    async fn main(_spawner: Spawner) {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timg0 = TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);

        let mut i2c0 = I2c::new(
            peripherals.I2C0,
            Config::default().with_frequency(Rate::from_khz(100)),
        )
        .unwrap()
        .with_sda(peripherals.GPIO8)
        .with_scl(peripherals.GPIO9)
        .into_async();

        esp_println::println!("I2C scan start");
        for address in 0x03..0x78u8 {
            let mut buf = [0u8; 1];
            if i2c0.write_read_async(address, &[], &mut buf).await.is_ok() {
                let hint = match address {
                    0x20..=0x27 => " (PCF8574, likely the LCD backpack)",
                    0x38..=0x3F => " (PCF8574A, likely the LCD backpack)",
                    _ => "",
                };
                esp_println::println!("Found device at address 0x{:02X}{}", address, hint);
            }
        }
        esp_println::println!("I2C scan done");

        loop {
            Timer::after(Duration::from_millis(100)).await;
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
