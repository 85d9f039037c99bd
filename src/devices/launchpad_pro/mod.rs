// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use strum::{EnumIter, FromRepr};

use crate::midi::MidiDeviceDescriptor;

pub mod output;
pub use self::output::Gateway as OutputGateway;

pub const MIDI_DEVICE_DESCRIPTOR: &MidiDeviceDescriptor = &MidiDeviceDescriptor {
    vendor_name: "Novation",
    model_name: "Launchpad Pro",
    port_name_prefix: "Launchpad Pro",
};

/// The Launchpad Pro exposes one port pair per operating mode.
///
/// Ableton Live mode offers the standard note/CC surface; most extra
/// features have to be requested through sysex messages. Standalone mode
/// covers the note, drum, fader and programmer layouts and is the easiest
/// to interact with. Hardware mode passes messages through to whatever is
/// connected to the device's physical MIDI in/out jacks, not to the
/// Launchpad itself.
///
/// See the Launchpad Pro programmer's reference guide for details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter)]
#[repr(u8)]
pub enum Mode {
    AbletonLive = 1,
    Standalone = 2,
    Hardware = 3,
}

impl Mode {
    /// Name of the port pair this mode is reachable on.
    #[must_use]
    pub fn port_name(self) -> String {
        format!(
            "{prefix} {mode}",
            prefix = MIDI_DEVICE_DESCRIPTOR.port_name_prefix,
            mode = self as u8,
        )
    }
}

/// Port of the Launchpad operating in `mode`, if connected.
#[cfg(feature = "midir")]
#[must_use]
pub fn find_port(registry: &crate::registry::MidiRegistry, mode: Mode) -> Option<crate::PortIndex> {
    registry.find_port(&mode.port_name())
}

/// LED grid addressed by a single grid message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum GridLayout {
    /// All 10x10 positions including the surrounding round buttons.
    #[default]
    Full = 0,
    /// The square 8x8 pad matrix only.
    Compact = 1,
}

impl GridLayout {
    #[must_use]
    pub const fn led_count(self) -> usize {
        match self {
            Self::Full => 100,
            Self::Compact => 64,
        }
    }
}
