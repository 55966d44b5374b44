//! Test support utilities

pub mod mocks;

pub use mocks::{MockHandle, MockTransport};
