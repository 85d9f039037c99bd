// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

pub mod launchpad_pro;

// Descriptors of supported MIDI devices for auto-detection.
pub const MIDI_DEVICE_DESCRIPTORS: &[&crate::midi::MidiDeviceDescriptor] =
    &[crate::devices::launchpad_pro::MIDI_DEVICE_DESCRIPTOR];
