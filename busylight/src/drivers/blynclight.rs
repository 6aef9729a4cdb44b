//! Embrava Blynclight family.
//!
//! Color bytes are sent red, blue, green. Black is sent with the "off" flag
//! set since the device otherwise keeps its last color.

use super::{HidLight, Light};
use crate::color::Rgb;
use crate::error::BusylightResult;

pub const SUPPORTED: &[(u16, u16)] = &[
    (0x2c0d, 0x0001),
    (0x2c0d, 0x000c),
    (0x0e53, 0x2516),
];

const REPORT_ID: u8 = 0x00;
const FLAG_OFF: u8 = 0x01;
const TRAILER: [u8; 2] = [0xff, 0x22];

pub fn encode(color: Rgb) -> [u8; 10] {
    let flags = if color.is_off() { FLAG_OFF } else { 0 };
    [
        REPORT_ID, color.r, color.b, color.g, flags, 0, 0, 0, TRAILER[0], TRAILER[1],
    ]
}

pub struct Blynclight(pub(crate) HidLight);

impl Light for Blynclight {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn usb_id(&self) -> (u16, u16) {
        self.0.usb_id
    }

    fn set_color(&mut self, color: Rgb) -> BusylightResult<()> {
        self.0.write_report(&encode(color))
    }
}
