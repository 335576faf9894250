//! Business logic layer (hardware-independent)
//!
//! Everything here is generic over the [`crate::traits`] seams: the numeric
//! formatting, the bar-graph scaling, the per-cycle frame render, and the
//! startup sequencer. No bus or board types leak in, so all of it runs
//! under host unit tests with scripted fakes.

use core::fmt::Write;

use log::{info, warn};

use crate::config::{
    BAR_LABEL, BAR_ROW, BLANK_GLYPH, DEGREE_GLYPH, DISPLAY_SETTLE_MS, EXPECTED_CHIP_ID,
    FULL_BLOCK_GLYPH, LCD_COLUMNS, LCD_FONT, LCD_ROWS, READING_COLUMN, RETRY_DELAY_MS,
    SENSOR_SETTLE_MS, TEMP_FULL_SCALE_C, THERMOMETER_BITMAP, THERMOMETER_GLYPH,
};
use crate::model::Reading;
use crate::traits::{CharacterDisplay, TemperatureSensor};

/// Placeholder for the numeric field while the thermocouple is faulted.
const FAULT_TEXT: &str = "xx";

/// Format the numeric field: one decimal place, or "xx" for a fault.
///
/// Negative values keep whatever sign the formatter gives them; the
/// cold-junction range can go below zero and is displayed as-is.
pub fn format_reading(reading: Reading) -> heapless::String<16> {
    let mut buffer = heapless::String::new();
    match reading {
        Reading::Celsius(v) => {
            let _ = write!(buffer, "{:.1}", v);
        }
        Reading::Fault => {
            let _ = buffer.push_str(FAULT_TEXT);
        }
    }
    buffer
}

/// Number of filled cells for a bar of `width` cells.
///
/// Linear in `value`, truncating, clamped to `[0, width]`. NaN and negative
/// values clamp to an empty bar.
pub fn bar_fill(value: f32, max_value: f32, width: usize) -> usize {
    if !(value > 0.0) || !(max_value > 0.0) {
        return 0;
    }
    if value >= max_value {
        return width;
    }
    ((value / max_value) * width as f32) as usize
}

/// Draw a labeled horizontal bar graph across one display row.
///
/// Column 0 carries the label; the remaining cells are full-block glyphs up
/// to the scaled fill, then blanks so a shrinking bar erases itself.
pub fn render_bar_graph<D: CharacterDisplay>(
    display: &mut D,
    label: char,
    row: u8,
    value: f32,
    max_value: f32,
) -> Result<(), &'static str> {
    let width = (LCD_COLUMNS - 1) as usize;
    let filled = bar_fill(value, max_value, width);

    display.set_cursor(0, row)?;
    let mut tag = [0u8; 4];
    display.write_text(label.encode_utf8(&mut tag))?;
    for _ in 0..filled {
        display.write_glyph(FULL_BLOCK_GLYPH)?;
    }
    for _ in filled..width {
        display.write_glyph(BLANK_GLYPH)?;
    }
    Ok(())
}

/// Push one Display Frame: the numeric field on row 0 (after the static
/// icon), the degree glyph, the unit letter, a trailing blank, and the bar
/// graph on its own row. A fault draws "xx" and an empty bar.
pub fn render_frame<D: CharacterDisplay>(
    display: &mut D,
    reading: Reading,
) -> Result<(), &'static str> {
    display.set_cursor(READING_COLUMN, 0)?;
    display.write_text(&format_reading(reading))?;
    display.write_glyph(DEGREE_GLYPH)?;
    display.write_text("C")?;
    display.write_glyph(BLANK_GLYPH)?;

    render_bar_graph(
        display,
        BAR_LABEL,
        BAR_ROW,
        reading.bar_value(),
        TEMP_FULL_SCALE_C,
    )
}

/// One steady-state iteration: sample the sensor, render the frame.
///
/// The frame on the panel always reflects this sample; nothing is buffered
/// across iterations. The caller owns the cadence sleep.
pub fn run_cycle<S: TemperatureSensor, D: CharacterDisplay>(
    sensor: &mut S,
    display: &mut D,
) -> Result<(), &'static str> {
    let reading = sensor.read_temperature()?;
    render_frame(display, reading)
}

/// How many times a startup probe may fail before the sequencer gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep probing until the condition clears or power is removed.
    Unbounded,
    /// Give up after this many failed attempts in one phase. Used by tests.
    Bounded(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    /// Waiting for the display to answer on the bus.
    ProbingDisplay,
    /// Display confirmed; letting the confirmation stay visible.
    DisplaySettling,
    /// Waiting for the sensor chip id to match.
    ProbingSensor,
    /// Sensor confirmed; letting the confirmation stay visible.
    SensorSettling,
    /// Steady state reached.
    Ready,
}

/// What the caller should do after one sequencer poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    /// Sleep this many milliseconds, then poll again.
    Wait(u64),
    /// Startup is complete; enter the acquire-render loop.
    Ready,
    /// A bounded retry policy ran out of attempts.
    GaveUp,
}

/// Startup sequencer: brings both peripherals into a known-good state.
///
/// Each failure is fatal-but-retriable: the sequencer never advances past a
/// failed phase and, under [`RetryPolicy::Unbounded`], never aborts. All
/// sleeping is delegated to the caller via [`StartupStep::Wait`].
pub struct StartupSequencer {
    phase: StartupPhase,
    attempts: u32,
    policy: RetryPolicy,
    sensor_initialized: bool,
}

impl StartupSequencer {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            phase: StartupPhase::ProbingDisplay,
            attempts: 0,
            policy,
            sensor_initialized: false,
        }
    }

    pub fn phase(&self) -> StartupPhase {
        self.phase
    }

    /// Run one startup stage against the peripherals.
    ///
    /// `Err` is a bus failure on an already-confirmed display; the caller
    /// logs it and polls again.
    pub fn poll<S: TemperatureSensor, D: CharacterDisplay>(
        &mut self,
        sensor: &mut S,
        display: &mut D,
    ) -> Result<StartupStep, &'static str> {
        match self.phase {
            StartupPhase::ProbingDisplay => {
                match display.init(LCD_COLUMNS, LCD_ROWS, LCD_FONT) {
                    Ok(()) => {
                        info!("display ready ({}x{})", LCD_COLUMNS, LCD_ROWS);
                        display.set_cursor(0, 0)?;
                        display.write_text("Display OK")?;
                        self.enter(StartupPhase::DisplaySettling);
                        Ok(StartupStep::Wait(DISPLAY_SETTLE_MS))
                    }
                    Err(e) => {
                        warn!(
                            "display not responding ({}), retrying in {}s",
                            e,
                            RETRY_DELAY_MS / 1000
                        );
                        Ok(self.retry())
                    }
                }
            }
            StartupPhase::DisplaySettling => {
                display.clear()?;
                self.enter(StartupPhase::ProbingSensor);
                self.probe_sensor(sensor, display)
            }
            StartupPhase::ProbingSensor => self.probe_sensor(sensor, display),
            StartupPhase::SensorSettling => {
                display.clear()?;
                display.define_glyph(THERMOMETER_GLYPH, &THERMOMETER_BITMAP)?;
                display.set_cursor(0, 0)?;
                display.write_glyph(THERMOMETER_GLYPH)?;

                // Advisory only; a missing thermocouple shows up as "xx"
                // once the loop runs.
                match sensor.thermocouple_present() {
                    Ok(true) => info!("thermocouple detected"),
                    Ok(false) => warn!("thermocouple not connected"),
                    Err(e) => warn!("thermocouple presence check failed: {}", e),
                }

                self.enter(StartupPhase::Ready);
                Ok(StartupStep::Ready)
            }
            StartupPhase::Ready => Ok(StartupStep::Ready),
        }
    }

    fn probe_sensor<S: TemperatureSensor, D: CharacterDisplay>(
        &mut self,
        sensor: &mut S,
        display: &mut D,
    ) -> Result<StartupStep, &'static str> {
        // A failed init gets the same fixed backoff as a bad chip id.
        if !self.sensor_initialized {
            if let Err(e) = sensor.init() {
                warn!("sensor init failed: {}", e);
                return self.sensor_retry(display);
            }
            self.sensor_initialized = true;
        }
        match sensor.chip_id() {
            Ok(id) if id == EXPECTED_CHIP_ID => {
                info!("sensor chip id 0x{:04X}", id);
                display.set_cursor(0, 0)?;
                display.write_text("MAX6675 OK")?;
                self.enter(StartupPhase::SensorSettling);
                Ok(StartupStep::Wait(SENSOR_SETTLE_MS))
            }
            Ok(id) => {
                warn!(
                    "unexpected sensor chip id 0x{:04X} (want 0x{:04X})",
                    id, EXPECTED_CHIP_ID
                );
                self.sensor_retry(display)
            }
            Err(e) => {
                warn!("sensor probe failed: {}", e);
                self.sensor_retry(display)
            }
        }
    }

    fn sensor_retry<D: CharacterDisplay>(
        &mut self,
        display: &mut D,
    ) -> Result<StartupStep, &'static str> {
        display.set_cursor(0, 0)?;
        display.write_text("Sensor not found")?;
        Ok(self.retry())
    }

    fn enter(&mut self, phase: StartupPhase) {
        self.phase = phase;
        self.attempts = 0;
    }

    fn retry(&mut self) -> StartupStep {
        self.attempts += 1;
        match self.policy {
            RetryPolicy::Bounded(max) if self.attempts >= max => StartupStep::GaveUp,
            _ => StartupStep::Wait(RETRY_DELAY_MS),
        }
    }
}
