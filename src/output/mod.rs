// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use std::borrow::Cow;

use thiserror::Error;

use crate::{MidiStatus, PortIndex};

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid port {0}")]
    InvalidPort(PortIndex),
    #[error("disconnected")]
    Disconnected,
    #[error("send: {msg}")]
    Send { msg: Cow<'static, str> },
}

pub type Result<T> = std::result::Result<T, Error>;

/// RGB LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// From normalized components in the interval [0, 1].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f32(red: f32, green: f32, blue: f32) -> Self {
        let quantize = |component: f32| (component.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(quantize(red), quantize(green), quantize(blue))
    }
}

/// Builds a 3-byte channel message from its parts.
///
/// The inverse of decoding: status nibble and channel bits share byte 0.
#[must_use]
pub const fn channel_message(status: MidiStatus, channel: u8, data1: u8, data2: u8) -> [u8; 3] {
    [((status as u8) << 4) | (channel & 0x0f), data1, data2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_message_packs_status_and_channel() {
        assert_eq!(
            [0x93, 60, 100],
            channel_message(MidiStatus::NoteOn, 3, 60, 100)
        );
        assert_eq!(
            [0xb0, 7, 127],
            channel_message(MidiStatus::ControlChange, 0, 7, 127)
        );
        // Out-of-range channel bits are masked off.
        assert_eq!(
            [0x81, 60, 0],
            channel_message(MidiStatus::NoteOff, 17, 60, 0)
        );
    }

    #[test]
    fn rgb_from_f32_clamps_and_quantizes() {
        assert_eq!(Rgb::BLACK, Rgb::from_f32(0.0, -1.0, 0.0));
        assert_eq!(Rgb::WHITE, Rgb::from_f32(1.0, 2.0, 1.0));
        assert_eq!(Rgb::new(127, 0, 255), Rgb::from_f32(0.5, 0.0, 1.0));
    }
}
