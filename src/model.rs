// Model of the data read in this app

/// One temperature sample, produced per cycle and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Calibrated temperature in degrees Celsius.
    Celsius(f32),
    /// The thermocouple is open or disconnected; no valid temperature.
    Fault,
}

impl Reading {
    /// Value the bar graph is scaled from. A fault draws an empty bar.
    pub fn bar_value(self) -> f32 {
        match self {
            Reading::Celsius(v) => v,
            Reading::Fault => 0.0,
        }
    }

    pub fn is_fault(self) -> bool {
        matches!(self, Reading::Fault)
    }
}

/// HD44780 character cell font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVariant {
    Dots5x8,
    Dots5x10,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_reading_scales_to_empty_bar() {
        assert_eq!(Reading::Fault.bar_value(), 0.0);
        assert!(Reading::Fault.is_fault());
    }

    #[test]
    fn valid_reading_keeps_its_value() {
        assert_eq!(Reading::Celsius(23.46).bar_value(), 23.46);
        assert!(!Reading::Celsius(23.46).is_fault());
    }
}
