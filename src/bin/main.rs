#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use embassy_executor::Spawner;
    use embassy_time::{Duration, Timer};
    use esp_backtrace as _;
    use esp_hal::timer::timg::TimerGroup;
    use log::warn;

    use thermoscope::config::SAMPLE_INTERVAL_MS;
    use thermoscope::hardware;
    use thermoscope::logic::{RetryPolicy, StartupSequencer, StartupStep, run_cycle};

    esp_bootloader_esp_idf::esp_app_desc!();

    #[esp_rtos::main]
    async fn main(_spawner: Spawner) {
        esp_println::logger::init_logger_from_env();
        let peripherals = esp_hal::init(esp_hal::Config::default());

        esp_println::println!("=== Thermoscope ===");

        let timg0 = TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);

        // MAX6675 on SPI2, LCD backpack on I2C0.
        let mut sensor = hardware::thermocouple(
            peripherals.SPI2,
            peripherals.GPIO12,
            peripherals.GPIO11,
            peripherals.GPIO10,
        );
        let mut display = hardware::panel(peripherals.I2C0, peripherals.GPIO8, peripherals.GPIO9);

        // Fatal-but-retriable startup: the sequencer never advances past a
        // failed stage, and with the unbounded policy never aborts. All it
        // asks of us is to sleep between polls.
        let mut sequencer = StartupSequencer::new(RetryPolicy::Unbounded);
        loop {
            match sequencer.poll(&mut sensor, &mut display) {
                Ok(StartupStep::Ready) => break,
                Ok(StartupStep::Wait(ms)) => Timer::after(Duration::from_millis(ms)).await,
                Ok(StartupStep::GaveUp) => {
                    // Not reachable with the unbounded policy; keep probing.
                    Timer::after(Duration::from_secs(5)).await;
                }
                Err(e) => {
                    warn!("startup i/o error: {}", e);
                    Timer::after(Duration::from_secs(1)).await;
                }
            }
        }

        // Steady state: one sample per second, frame always reflects the
        // latest sample. A bus hiccup is logged and the cadence continues.
        loop {
            if let Err(e) = run_cycle(&mut sensor, &mut display) {
                warn!("sample cycle failed: {}", e);
            }
            Timer::after(Duration::from_millis(SAMPLE_INTERVAL_MS)).await;
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
