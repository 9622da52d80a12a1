//! Metric/imperial conversion arithmetic.
//!
//! History replay depends on these formulas being applied identically on
//! every read, so they live in one place and nothing else does unit math.

use crate::types::{Sample, UnitSystem};

/// Miles per hour in one metre per second.
pub const MPH_PER_MPS: f64 = 2.237;

/// Inches of mercury in one hectopascal.
pub const INHG_PER_HPA: f64 = 0.02953;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn mps_to_mph(v: f64) -> f64 {
    v * MPH_PER_MPS
}

pub fn mph_to_mps(v: f64) -> f64 {
    v / MPH_PER_MPS
}

pub fn hpa_to_inhg(p: f64) -> f64 {
    p * INHG_PER_HPA
}

pub fn inhg_to_hpa(p: f64) -> f64 {
    p / INHG_PER_HPA
}

impl Sample {
    /// Return this sample expressed in `target` units.
    ///
    /// Identity when the sample is already tagged `target`. Humidity and the
    /// weather condition are unit-independent and copied unchanged.
    pub fn in_units(&self, target: UnitSystem) -> Sample {
        if self.unit_system == target {
            return self.clone();
        }

        let (temperature, wind_speed, pressure) = match target {
            UnitSystem::Imperial => (
                celsius_to_fahrenheit(self.temperature),
                mps_to_mph(self.wind_speed),
                hpa_to_inhg(self.pressure),
            ),
            UnitSystem::Metric => (
                fahrenheit_to_celsius(self.temperature),
                mph_to_mps(self.wind_speed),
                inhg_to_hpa(self.pressure),
            ),
        };

        Sample {
            temperature,
            wind_speed,
            pressure,
            unit_system: target,
            ..self.clone()
        }
    }
}
