//! Luxafor Flag.

use super::{HidLight, Light};
use crate::color::Rgb;
use crate::error::BusylightResult;

pub const SUPPORTED: &[(u16, u16)] = &[(0x04d8, 0xf372)];

const REPORT_ID: u8 = 0x00;
const CMD_STATIC: u8 = 0x01;
const ALL_LEDS: u8 = 0xff;

pub fn encode(color: Rgb) -> [u8; 9] {
    [
        REPORT_ID, CMD_STATIC, ALL_LEDS, color.r, color.g, color.b, 0, 0, 0,
    ]
}

pub struct Luxafor(pub(crate) HidLight);

impl Light for Luxafor {
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
