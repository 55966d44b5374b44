//! Synthetic sensor readings and their wire encoding

pub mod payload;
pub mod reading;

pub use payload::encode;
pub use reading::{ReadingGenerator, SensorReading};
