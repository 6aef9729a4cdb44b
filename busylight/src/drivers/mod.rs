//! Device drivers: one module per supported light family.

pub mod blink1;
pub mod blynclight;
pub mod kuando;
pub mod luxafor;

use std::time::Duration;

use crate::color::Rgb;
use crate::error::{BusylightError, BusylightResult};
use crate::transport::HidTransport;

/// A USB light that can show a solid color.
pub trait Light {
    fn name(&self) -> &str;

    /// `(vendor_id, product_id)` of the underlying device.
    fn usb_id(&self) -> (u16, u16);

    fn set_color(&mut self, color: Rgb) -> BusylightResult<()>;

    fn off(&mut self) -> BusylightResult<()> {
        self.set_color(Rgb::OFF)
    }

    /// Devices that switch themselves off unless refreshed return how often
    /// the current state must be re-sent.
    fn keepalive_interval(&self) -> Option<Duration> {
        None
    }
}

/// The families of lights this crate can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Luxafor,
    Blink1,
    Blynclight,
    Kuando,
}

impl Family {
    /// Identify a device from its USB ids.
    pub fn identify(vendor_id: u16, product_id: u16) -> Option<Family> {
        if luxafor::SUPPORTED.contains(&(vendor_id, product_id)) {
            Some(Family::Luxafor)
        } else if blink1::SUPPORTED.contains(&(vendor_id, product_id)) {
            Some(Family::Blink1)
        } else if blynclight::SUPPORTED.contains(&(vendor_id, product_id)) {
            Some(Family::Blynclight)
        } else if kuando::SUPPORTED.contains(&(vendor_id, product_id)) {
            Some(Family::Kuando)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Family::Luxafor => "Luxafor Flag",
            Family::Blink1 => "blink(1)",
            Family::Blynclight => "Embrava Blynclight",
            Family::Kuando => "Kuando Busylight",
        }
    }

    /// Wrap an opened transport in the matching driver.
    pub fn driver(
        &self,
        transport: Box<dyn HidTransport>,
        usb_id: (u16, u16),
        name: String,
    ) -> Box<dyn Light> {
        let device = HidLight {
            transport,
            usb_id,
            name,
        };
        match self {
            Family::Luxafor => Box::new(luxafor::Luxafor(device)),
            Family::Blink1 => Box::new(blink1::Blink1(device)),
            Family::Blynclight => Box::new(blynclight::Blynclight(device)),
            Family::Kuando => Box::new(kuando::Kuando(device)),
        }
    }
}

/// State shared by every driver: the open device and how to describe it.
pub struct HidLight {
    pub(crate) transport: Box<dyn HidTransport>,
    pub(crate) usb_id: (u16, u16),
    pub(crate) name: String,
}

impl HidLight {
    /// Write an output report, treating a short write as an error.
    pub(crate) fn write_report(&self, report: &[u8]) -> BusylightResult<()> {
        let written = self.transport.write(report)?;
        if written < report.len() {
            return Err(BusylightError::ShortWrite {
                light: self.name.clone(),
                written,
                expected: report.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_supported_devices() {
        assert_eq!(Family::identify(0x04d8, 0xf372), Some(Family::Luxafor));
        assert_eq!(Family::identify(0x27b8, 0x01ed), Some(Family::Blink1));
        assert_eq!(Family::identify(0x2c0d, 0x000c), Some(Family::Blynclight));
        assert_eq!(Family::identify(0x27bb, 0x3bcd), Some(Family::Kuando));
        assert_eq!(Family::identify(0x046d, 0xc52b), None);
    }
}
