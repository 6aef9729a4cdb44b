//! Raw HID report output.

use hidapi::HidDevice;

use crate::error::BusylightResult;

/// Something reports can be written to. Implemented for `hidapi::HidDevice`;
/// tests record reports instead.
pub trait HidTransport {
    /// Write an output report. The first byte is the report id.
    fn write(&self, report: &[u8]) -> BusylightResult<usize>;

    /// Send a feature report. The first byte is the report id.
    fn send_feature_report(&self, report: &[u8]) -> BusylightResult<()>;
}

impl HidTransport for HidDevice {
    fn write(&self, report: &[u8]) -> BusylightResult<usize> {
        Ok(HidDevice::write(self, report)?)
    }

    fn send_feature_report(&self, report: &[u8]) -> BusylightResult<()> {
        Ok(HidDevice::send_feature_report(self, report)?)
    }
}
