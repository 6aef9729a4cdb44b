//! ThingM blink(1). Colors are set through feature reports.

use super::{HidLight, Light};
use crate::color::Rgb;
use crate::error::BusylightResult;

pub const SUPPORTED: &[(u16, u16)] = &[(0x27b8, 0x01ed)];

const REPORT_ID: u8 = 0x01;
/// "Set color now", no fade.
const CMD_SET_NOW: u8 = b'n';

pub fn encode(color: Rgb) -> [u8; 9] {
    [
        REPORT_ID,
        CMD_SET_NOW,
        color.r,
        color.g,
        color.b,
        0,
        0,
        0,
        0,
    ]
}

pub struct Blink1(pub(crate) HidLight);

impl Light for Blink1 {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn usb_id(&self) -> (u16, u16) {
        self.0.usb_id
    }

    fn set_color(&mut self, color: Rgb) -> BusylightResult<()> {
        self.0.transport.send_feature_report(&encode(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Family;
    use crate::transport::testing::{Recorder, Report};

    #[test]
    fn uses_feature_reports() {
        let recorder = Recorder::default();
        let mut light =
            Family::Blink1.driver(Box::new(recorder.clone()), (0x27b8, 0x01ed), "b1".into());

        light.set_color(Rgb::new(9, 8, 7)).unwrap();

        assert_eq!(
            recorder.taken(),
            vec![Report::Feature(vec![0x01, b'n', 9, 8, 7, 0, 0, 0, 0])]
        );
    }
}
