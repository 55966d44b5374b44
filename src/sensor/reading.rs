//! Synthetic sensor reading generation
//!
//! Each field is drawn independently from a uniform distribution over its
//! declared range and rounded to two decimal places. The generator is a pure
//! function of its random source, so tests can seed a [`rand::rngs::StdRng`]
//! for reproducible sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -50.0..=50.0;
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const CO2_RANGE: RangeInclusive<f64> = 300.0..=2000.0;

/// One synthetic sensor sample. Immutable once created and discarded after
/// encoding; nothing retains readings across publish cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius in [-50, 50]
    pub temperature: f64,
    /// Relative humidity percent in [0, 100]
    pub humidity: f64,
    /// CO2 concentration in ppm in [300, 2000]
    pub co2: f64,
}

/// Infinite source of sensor readings, one per call
#[derive(Debug)]
pub struct ReadingGenerator<R: Rng = StdRng> {
    rng: R,
}

impl ReadingGenerator<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for ReadingGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ReadingGenerator<R> {
    /// Build a generator over a caller-provided random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw one fresh reading
    pub fn generate(&mut self) -> SensorReading {
        SensorReading {
            temperature: round2(self.rng.gen_range(TEMPERATURE_RANGE)),
            humidity: round2(self.rng.gen_range(HUMIDITY_RANGE)),
            co2: round2(self.rng.gen_range(CO2_RANGE)),
        }
    }
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// True when `value` carries at most two fractional digits
    fn has_two_decimal_precision(value: f64) -> bool {
        let scaled = value * 100.0;
        (scaled - scaled.round()).abs() < 1e-9
    }

    #[test]
    fn round2_examples() {
        assert_eq!(round2(12.345), 12.35);
        assert_eq!(round2(-0.005), -0.01);
        assert_eq!(round2(300.0), 300.0);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let mut a = ReadingGenerator::with_rng(StdRng::seed_from_u64(7));
        let mut b = ReadingGenerator::with_rng(StdRng::seed_from_u64(7));
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn generator_is_re_invokable() {
        let mut gen = ReadingGenerator::new();
        for _ in 0..1000 {
            let reading = gen.generate();
            assert!(TEMPERATURE_RANGE.contains(&reading.temperature));
            assert!(HUMIDITY_RANGE.contains(&reading.humidity));
            assert!(CO2_RANGE.contains(&reading.co2));
        }
    }

    proptest! {
        #[test]
        fn readings_stay_in_range_with_two_decimals(seed in any::<u64>()) {
            let mut gen = ReadingGenerator::with_rng(StdRng::seed_from_u64(seed));
            let reading = gen.generate();

            prop_assert!(TEMPERATURE_RANGE.contains(&reading.temperature));
            prop_assert!(HUMIDITY_RANGE.contains(&reading.humidity));
            prop_assert!(CO2_RANGE.contains(&reading.co2));

            prop_assert!(has_two_decimal_precision(reading.temperature));
            prop_assert!(has_two_decimal_precision(reading.humidity));
            prop_assert!(has_two_decimal_precision(reading.co2));
        }
    }
}
