//! Error types for the busylight crate.

use thiserror::Error;

/// Errors that can occur while parsing colors or talking to lights.
#[derive(Error, Debug)]
pub enum BusylightError {
    #[error("Unknown color: {0}")]
    ColorLookup(String),

    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("Short write to {light}: wrote {written} of {expected} bytes")]
    ShortWrite {
        light: String,
        written: usize,
        expected: usize,
    },

    #[error("No lights found")]
    NoLightsFound,

    #[error("Light index {index} out of range ({available} lights available)")]
    LightIndex { index: usize, available: usize },

    #[error("All {0} lights failed to update")]
    AllLightsFailed(usize),
}

/// Result type alias for busylight operations.
pub type BusylightResult<T> = Result<T, BusylightError>;
