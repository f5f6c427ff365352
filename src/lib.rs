//! Debounced push-button press counter with LED and SSD1306 status display.
//!
//! Everything except `hardware` is hardware-independent and runs under `cargo test` on the host.

#![cfg_attr(not(test), no_std)]

pub mod display;
pub mod logic;
pub mod model;
pub mod sink;
pub mod traits;

#[cfg(feature = "esp32c3")]
pub mod hardware;

#[cfg(test)]
mod fakes;
