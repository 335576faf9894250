//! Thermoscope: a K-type thermocouple monitor.
//!
//! A MAX6675 thermocouple digitizer on SPI feeds a 20x4 HD44780 character
//! LCD behind a PCF8574 I2C backpack. One polling loop: read a sample,
//! render the numeric field and a bar graph, sleep, repeat.
//!
//! The core (`logic`, `model`, `traits`, plus both bus drivers) is
//! hardware-independent and unit-tested on the host; `hardware` wires the
//! ESP32-S3 peripherals in and only builds for the target.

#![cfg_attr(target_os = "none", no_std)]

pub mod config;
pub mod lcd;
pub mod logic;
pub mod max6675;
pub mod model;
pub mod traits;

#[cfg(target_os = "none")]
pub mod hardware;
