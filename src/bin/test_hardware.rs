#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

//! On-target smoke test: pure-core assertions first, then live probes of
//! the MAX6675 and the LCD with the real wiring.

#[cfg(target_os = "none")]
mod firmware {
    use embassy_executor::Spawner;
    use embassy_time::{Duration, Timer};
    use esp_backtrace as _;
    use esp_hal::timer::timg::TimerGroup;

    use thermoscope::config::{EXPECTED_CHIP_ID, LCD_COLUMNS, LCD_FONT, LCD_ROWS};
    use thermoscope::hardware;
    use thermoscope::logic::{bar_fill, format_reading, run_cycle};
    use thermoscope::model::Reading;
    use thermoscope::traits::{CharacterDisplay, TemperatureSensor};

    esp_bootloader_esp_idf::esp_app_desc!();

    // Test result tracking
    struct TestResults {
        passed: u32,
        failed: u32,
        total: u32,
    }

    impl TestResults {
        fn new() -> Self {
            Self {
                passed: 0,
                failed: 0,
                total: 0,
            }
        }

        fn assert(&mut self, condition: bool, test_name: &str) {
            self.total += 1;
            if condition {
                self.passed += 1;
                esp_println::println!("  ✓ {}", test_name);
            } else {
                self.failed += 1;
                esp_println::println!("  ✗ {} FAILED", test_name);
            }
        }

        fn assert_eq<T: PartialEq + core::fmt::Debug>(
            &mut self,
            left: T,
            right: T,
            test_name: &str,
        ) {
            self.total += 1;
            if left == right {
                self.passed += 1;
                esp_println::println!("  ✓ {}", test_name);
            } else {
                self.failed += 1;
                esp_println::println!("  ✗ {} FAILED: {:?} != {:?}", test_name, left, right);
            }
        }

        fn print_summary(&self) {
            esp_println::println!("\n==========================================");
            esp_println::println!("Test Summary:");
            esp_println::println!("  Total:  {}", self.total);
            esp_println::println!("  Passed: {}", self.passed);
            esp_println::println!("  Failed: {}", self.failed);
            if self.failed == 0 {
                esp_println::println!("\n✓ ALL TESTS PASSED!");
            } else {
                esp_println::println!("\n✗ SOME TESTS FAILED");
            }
            esp_println::println!("==========================================");
        }
    }

    fn test_core_logic(results: &mut TestResults) {
        esp_println::println!("\n[TEST] Core logic");

        results.assert_eq(
            format_reading(Reading::Celsius(23.46)).as_str(),
            "23.5",
            "one decimal place",
        );
        results.assert_eq(
            format_reading(Reading::Fault).as_str(),
            "xx",
            "fault placeholder",
        );
        results.assert_eq(bar_fill(0.0, 45.0, 19), 0, "empty bar at zero");
        results.assert_eq(bar_fill(45.0, 45.0, 19), 19, "full bar at full scale");
        results.assert(
            bar_fill(20.0, 45.0, 19) <= bar_fill(30.0, 45.0, 19),
            "bar fill monotonic",
        );
    }

    fn test_sensor<S: TemperatureSensor>(results: &mut TestResults, sensor: &mut S) {
        esp_println::println!("\n[TEST] MAX6675");

        results.assert(sensor.init().is_ok(), "sensor init");
        match sensor.chip_id() {
            Ok(id) => results.assert_eq(id, EXPECTED_CHIP_ID, "chip id signature"),
            Err(e) => {
                results.assert(false, "chip id readable");
                esp_println::println!("    ({})", e);
            }
        }
        match sensor.thermocouple_present() {
            Ok(present) => {
                esp_println::println!(
                    "  thermocouple {}",
                    if present { "detected" } else { "NOT connected" }
                );
                results.assert(true, "presence probe");
            }
            Err(_) => results.assert(false, "presence probe"),
        }
        match sensor.read_temperature() {
            Ok(Reading::Celsius(t)) => {
                esp_println::println!("  reading: {}", format_reading(Reading::Celsius(t)));
                results.assert(t >= -20.0 && t <= 1024.0, "reading in converter range");
            }
            Ok(Reading::Fault) => results.assert(true, "reading (open thermocouple)"),
            Err(_) => results.assert(false, "reading"),
        }
    }

    fn test_display<D: CharacterDisplay>(results: &mut TestResults, display: &mut D) {
        esp_println::println!("\n[TEST] LCD");

        results.assert(
            display.init(LCD_COLUMNS, LCD_ROWS, LCD_FONT).is_ok(),
            "display init",
        );
        results.assert(display.clear().is_ok(), "clear");
        results.assert(display.set_cursor(0, 0).is_ok(), "cursor home");
        results.assert(display.write_text("LCD self test").is_ok(), "text write");
        results.assert(
            display.set_cursor(LCD_COLUMNS, 0).is_err(),
            "cursor bounds enforced",
        );
    }

    fn test_one_cycle<S, D>(results: &mut TestResults, sensor: &mut S, display: &mut D)
    where
        S: TemperatureSensor,
        D: CharacterDisplay,
    {
        esp_println::println!("\n[TEST] Acquire-render cycle");
        results.assert(display.clear().is_ok(), "frame cleared");
        results.assert(run_cycle(sensor, display).is_ok(), "cycle renders");
    }

    #[esp_rtos::main]
    async fn main(_spawner: Spawner) {
        esp_println::logger::init_logger_from_env();
        let peripherals = esp_hal::init(esp_hal::Config::default());

        esp_println::println!("=== Thermoscope hardware test ===");

        let timg0 = TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);

        let mut sensor = hardware::thermocouple(
            peripherals.SPI2,
            peripherals.GPIO12,
            peripherals.GPIO11,
            peripherals.GPIO10,
        );
        let mut display = hardware::panel(peripherals.I2C0, peripherals.GPIO8, peripherals.GPIO9);

        let mut results = TestResults::new();

        test_core_logic(&mut results);
        test_display(&mut results, &mut display);

        // MAX6675 needs a conversion in flight before the first real read.
        Timer::after(Duration::from_millis(250)).await;
        test_sensor(&mut results, &mut sensor);
        test_one_cycle(&mut results, &mut sensor, &mut display);

        results.print_summary();

        loop {
            Timer::after(Duration::from_secs(1)).await;
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
