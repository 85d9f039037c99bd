// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use strum::{EnumCount, EnumIter, FromRepr};
use thiserror::Error;

use crate::TimeStamp;

#[cfg(test)]
mod tests;

/// MIDI status kinds, tagged with the high nibble of the status byte.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromRepr, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum MidiStatus {
    /// Placeholder for messages that carry no recognizable status nibble
    /// and for queries against controls that have never been observed.
    #[default]
    Dummy = 0x0,
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyKeyAftertouch = 0xa,
    ControlChange = 0xb,
    ProgramChange = 0xc,
    ChannelAftertouch = 0xd,
    PitchWheel = 0xe,
    Sysex = 0xf,
}

impl MidiStatus {
    /// Classifies the high nibble of a status byte.
    ///
    /// Nibbles below `0x8` belong to data bytes (running status is not
    /// supported) and map to [`MidiStatus::Dummy`].
    #[must_use]
    pub fn from_status_byte(status: u8) -> Self {
        Self::from_repr(status >> 4).unwrap_or(Self::Dummy)
    }

    /// `true` for message kinds whose `data1` byte is a stable per-control
    /// identifier (note number or controller number).
    #[must_use]
    pub const fn has_control_identifier(self) -> bool {
        matches!(
            self,
            Self::NoteOff | Self::NoteOn | Self::PolyKeyAftertouch | Self::ControlChange
        )
    }

    /// `true` for message kinds without a stable per-control identifier.
    ///
    /// The state table reserves one slot per special kind instead of keying
    /// these by their (meaningless) `data1` byte.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(
            self,
            Self::ProgramChange | Self::ChannelAftertouch | Self::PitchWheel | Self::Sysex
        )
    }
}

/// One decoded MIDI message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiMessage {
    /// Backend timestamp of the message.
    pub ts: TimeStamp,
    pub status: MidiStatus,
    /// Channel bits of the status byte (0..=15).
    pub channel: u8,
    /// Identifier byte: note number or controller number for standard
    /// statuses, first payload byte otherwise.
    pub data1: u8,
    /// Value byte: velocity, pressure or controller value. Zero when the
    /// message carries no third byte.
    pub data2: u8,
    /// The complete message as received, preserved for sysex payloads and
    /// for echoing messages back to an output port.
    pub raw: Vec<u8>,
}

impl MidiMessage {
    /// Zero-valued placeholder for controls that have never been observed.
    #[must_use]
    pub const fn dummy(data1: u8) -> Self {
        Self {
            ts: TimeStamp::from_micros(0),
            status: MidiStatus::Dummy,
            channel: 0,
            data1,
            data2: 0,
            raw: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty message")]
    Empty,
}

/// Decodes one raw MIDI message.
///
/// Byte 0 carries the status nibble and the channel, byte 1 the identifier
/// and byte 2 the value; missing trailing bytes default to zero.
///
/// Some devices send NoteOn with velocity zero instead of NoteOff, so
/// note on/off is reclassified by velocity once here. All downstream state
/// tracking relies on this normalization.
pub fn decode(ts: TimeStamp, input: &[u8]) -> Result<MidiMessage, DecodeError> {
    let [status_byte, data @ ..] = input else {
        return Err(DecodeError::Empty);
    };
    let data1 = data.first().copied().unwrap_or(0);
    let data2 = data.get(1).copied().unwrap_or(0);
    let mut status = MidiStatus::from_status_byte(*status_byte);
    if matches!(status, MidiStatus::NoteOn | MidiStatus::NoteOff) {
        status = if data2 == 0 {
            MidiStatus::NoteOff
        } else {
            MidiStatus::NoteOn
        };
    }
    Ok(MidiMessage {
        ts,
        status,
        channel: status_byte & 0x0f,
        data1,
        data2,
        raw: input.to_vec(),
    })
}
