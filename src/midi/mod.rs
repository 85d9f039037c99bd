// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use std::ops::{Deref, DerefMut};

use crate::{output, PortIndex, TimeStamp};

#[cfg(feature = "midir")]
pub mod midir;

/// Descriptor of a known device model, used for port auto-detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiDeviceDescriptor {
    pub vendor_name: &'static str,
    pub model_name: &'static str,
    pub port_name_prefix: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortDescriptor {
    pub index: PortIndex,
    pub name: String,
}

/// Passive callback for sinking MIDI input messages
pub trait MidiInputHandler: Send {
    /// Invoked before (re-)connecting the input port.
    fn connect_midi_input_port(&mut self, port: &MidiPortDescriptor);

    /// Invoked for each incoming message.
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]);
}

impl<D> MidiInputHandler for D
where
    D: DerefMut + Send,
    <D as Deref>::Target: MidiInputHandler,
{
    fn connect_midi_input_port(&mut self, port: &MidiPortDescriptor) {
        self.deref_mut().connect_midi_input_port(port);
    }

    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) {
        self.deref_mut().handle_midi_input(ts, input);
    }
}

pub trait MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> output::Result<()>;
}
