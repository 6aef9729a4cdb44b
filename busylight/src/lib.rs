//! Drive USB presence lights ("busylights").
//!
//! - `color`: color strings to RGB, with dimming
//! - `drivers`: per-device HID report encoding behind the `Light` trait
//! - `manager`: discovery, selection and fan-out to attached lights

pub mod color;
pub mod drivers;
pub mod error;
pub mod manager;
pub mod transport;

pub use color::{Rgb, parse_color, parse_color_dimmed};
pub use drivers::Light;
pub use error::{BusylightError, BusylightResult};
pub use manager::{LightInfo, LightManager};
