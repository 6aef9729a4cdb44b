//! Plenom Kuando Busylight (Alpha and Omega).
//!
//! The device takes a 64 byte program: seven 8 byte steps, three config
//! bytes, three bytes of 0xff padding and a big-endian checksum. Colors are
//! PWM duty cycles in 0..=100. The light switches itself off when it stops
//! receiving commands, so the current program has to be re-sent regularly.

use std::time::Duration;

use super::{HidLight, Light};
use crate::color::Rgb;
use crate::error::BusylightResult;

pub const SUPPORTED: &[(u16, u16)] = &[
    (0x27bb, 0x3bca),
    (0x27bb, 0x3bcb),
    (0x27bb, 0x3bcc),
    (0x27bb, 0x3bcd),
    (0x27bb, 0x3bce),
    (0x27bb, 0x3bcf),
];

const REPORT_ID: u8 = 0x00;
const PROGRAM_LEN: usize = 64;
const CHECKSUM_AT: usize = 62;
const PADDING: std::ops::Range<usize> = 59..62;

/// Opcode 1 ("jump") targeting step 0: loop on the first step forever.
const JUMP_TO_STEP_0: u8 = 0x10;

const KEEPALIVE: Duration = Duration::from_secs(10);

fn pwm(channel: u8) -> u8 {
    ((u16::from(channel) * 100) / 255) as u8
}

/// Build the full report (report id followed by the 64 byte program).
pub fn encode(color: Rgb) -> [u8; PROGRAM_LEN + 1] {
    let mut program = [0u8; PROGRAM_LEN];

    program[..8].copy_from_slice(&[
        JUMP_TO_STEP_0,
        0, // repeat
        pwm(color.r),
        pwm(color.g),
        pwm(color.b),
        0, // on time: solid
        0, // off time: solid
        0, // no ringtone
    ]);

    for byte in &mut program[PADDING] {
        *byte = 0xff;
    }

    let checksum: u16 = program[..CHECKSUM_AT]
        .iter()
        .map(|b| u16::from(*b))
        .sum();
    program[CHECKSUM_AT..].copy_from_slice(&checksum.to_be_bytes());

    let mut report = [0u8; PROGRAM_LEN + 1];
    report[0] = REPORT_ID;
    report[1..].copy_from_slice(&program);
    report
}

pub struct Kuando(pub(crate) HidLight);

impl Light for Kuando {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn usb_id(&self) -> (u16, u16) {
        self.0.usb_id
    }

    fn set_color(&mut self, color: Rgb) -> BusylightResult<()> {
        self.0.write_report(&encode(color))
    }

    fn keepalive_interval(&self) -> Option<Duration> {
        Some(KEEPALIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_colors_to_pwm() {
        let report = encode(Rgb::new(255, 0, 128));
        assert_eq!(report[0], REPORT_ID);
        assert_eq!(&report[1..9], &[0x10, 0, 100, 0, 50, 0, 0, 0]);
    }

    #[test]
    fn pads_and_checksums_program() {
        let report = encode(Rgb::new(255, 255, 255));
        let program = &report[1..];

        assert_eq!(program.len(), 64);
        assert_eq!(&program[59..62], &[0xff, 0xff, 0xff]);

        // 0x10 + 3 * 100 + 3 * 0xff
        let expected: u16 = 0x10 + 300 + 3 * 0xff;
        assert_eq!(&program[62..], &expected.to_be_bytes());
    }

    #[test]
    fn off_is_all_zero_duty_cycle() {
        let report = encode(Rgb::OFF);
        assert_eq!(&report[3..6], &[0, 0, 0]);
    }
}
