// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use std::sync::mpsc;

use crate::{
    message::{self, MidiMessage, MidiStatus},
    midi::{
        midir::{MidirDevice, MidirDeviceManager, PortError},
        MidiInputHandler, MidiPortDescriptor,
    },
    output,
    state::{self, DeviceStateTable},
    PortIndex, TimeStamp,
};

/// Forwards raw messages from the midir callback thread into a channel
/// that [`MidiRegistry::poll`] drains on the polling thread.
///
/// The state tables are never touched from the callback.
#[derive(Debug)]
struct QueueInputHandler {
    sender: mpsc::Sender<(TimeStamp, Vec<u8>)>,
}

impl MidiInputHandler for QueueInputHandler {
    fn connect_midi_input_port(&mut self, port: &MidiPortDescriptor) {
        log::debug!(
            "Connecting MIDI input port {index}: \"{name}\"",
            index = port.index,
            name = port.name,
        );
    }

    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) {
        // The receiver only disappears while the device set is rebuilding.
        if self.sender.send((ts, input.to_vec())).is_err() {
            log::debug!("Dropping MIDI input {ts} {input:x?}");
        }
    }
}

#[allow(missing_debug_implementations)]
struct RegisteredDevice {
    device: MidirDevice<QueueInputHandler>,
    receiver: mpsc::Receiver<(TimeStamp, Vec<u8>)>,
    state: DeviceStateTable,
}

/// The set of connected MIDI devices and their state tables.
///
/// An explicit, owned object: open it, poll it once per frame/tick, query
/// it in between, close (or drop) it. Only the polling step mutates the
/// state tables, so queries between polls observe a consistent snapshot.
#[allow(missing_debug_implementations)]
pub struct MidiRegistry {
    manager: MidirDeviceManager<QueueInputHandler>,
    devices: Vec<RegisteredDevice>,
}

impl MidiRegistry {
    /// Connects all available device port pairs.
    ///
    /// Opening succeeds even with no device plugged in; devices appearing
    /// later are picked up by [`Self::poll`].
    pub fn open() -> Result<Self, PortError> {
        let manager = MidirDeviceManager::new()?;
        let mut registry = Self {
            manager,
            devices: Vec::new(),
        };
        registry.connect_all()?;
        if registry.devices.is_empty() {
            log::warn!("No MIDI device available");
        }
        Ok(registry)
    }

    /// Drains all pending input into the per-device state tables.
    ///
    /// Call once per frame/tick from a single thread. Detects hot-plug
    /// first: when the port set changed, every table is discarded and all
    /// devices are reconnected, so port indices from before the rebuild
    /// must not be reused.
    pub fn poll(&mut self) -> Result<(), PortError> {
        if self.port_set_changed() {
            self.rebuild()?;
        }
        for entry in &mut self.devices {
            while let Ok((ts, raw)) = entry.receiver.try_recv() {
                match message::decode(ts, &raw) {
                    Ok(message) => entry.state.ingest(message),
                    Err(err) => log::warn!(
                        "Undecodable MIDI input on \"{name}\": {err}",
                        name = entry.device.port_name(),
                    ),
                }
            }
        }
        Ok(())
    }

    /// Synchronous, total teardown. Dropping the registry is equivalent.
    pub fn close(mut self) {
        self.disconnect_all();
    }

    #[must_use]
    pub fn port_count(&self) -> usize {
        self.devices.len()
    }

    /// Descriptors of all connected ports in ascending port order.
    pub fn ports(&self) -> impl Iterator<Item = &MidiPortDescriptor> {
        self.devices.iter().map(|entry| entry.device.descriptor())
    }

    #[must_use]
    pub fn port_name(&self, port: PortIndex) -> Option<&str> {
        self.entry(port).map(|entry| entry.device.port_name())
    }

    /// First port whose name contains `name_fragment`.
    #[must_use]
    pub fn find_port(&self, name_fragment: &str) -> Option<PortIndex> {
        let port = self
            .ports()
            .find(|descriptor| descriptor.name.contains(name_fragment))
            .map(|descriptor| descriptor.index);
        if port.is_none() {
            log::warn!("No device port containing name \"{name_fragment}\"");
        }
        port
    }

    /// Latest message stored for a control identifier on one port.
    ///
    /// Returns the zero-valued dummy message when the port is unknown or
    /// the control has never been observed.
    #[must_use]
    pub fn message_at(&self, port: PortIndex, data1: u8) -> MidiMessage {
        self.table(port)
            .and_then(|table| table.control(data1))
            .cloned()
            .unwrap_or_else(|| MidiMessage::dummy(data1))
    }

    /// Velocity or polyphonic aftertouch pressure of a note, zero when the
    /// note is not held.
    ///
    /// Aftertouch takes precedence over the plain NoteOn velocity. With
    /// `port = None` all devices are scanned in ascending port order and
    /// the first active match wins.
    #[must_use]
    pub fn note_value(&self, note: u8, port: Option<PortIndex>) -> u8 {
        match self.value(note, MidiStatus::PolyKeyAftertouch, port) {
            0 => self.value(note, MidiStatus::NoteOn, port),
            aftertouch => aftertouch,
        }
    }

    #[must_use]
    pub fn is_note_on(&self, note: u8, port: Option<PortIndex>) -> bool {
        self.note_value(note, port) != 0
    }

    /// Latest control-change value, zero when inactive.
    #[must_use]
    pub fn cc_value(&self, controller: u8, port: Option<PortIndex>) -> u8 {
        self.value(controller, MidiStatus::ControlChange, port)
    }

    #[must_use]
    pub fn is_cc_on(&self, controller: u8, port: Option<PortIndex>) -> bool {
        self.cc_value(controller, port) != 0
    }

    /// Raw bytes of the last sysex message received on one port.
    #[must_use]
    pub fn last_sysex(&self, port: PortIndex) -> Option<&[u8]> {
        self.last_special(port, MidiStatus::Sysex)
            .map(|message| message.raw.as_slice())
    }

    /// Program number of the last program change on one port, zero when
    /// none has been received.
    #[must_use]
    pub fn last_program_change(&self, port: PortIndex) -> u8 {
        self.last_special(port, MidiStatus::ProgramChange)
            .map_or(0, |message| message.data1)
    }

    /// Pressure of the last channel-wide aftertouch on one port, zero when
    /// none has been received.
    #[must_use]
    pub fn last_channel_aftertouch(&self, port: PortIndex) -> u8 {
        self.last_special(port, MidiStatus::ChannelAftertouch)
            .map_or(0, |message| message.data1)
    }

    /// 14-bit position of the last pitch-wheel message on one port
    /// (center = 0x2000), or `None` when none has been received.
    #[must_use]
    pub fn last_pitch_wheel(&self, port: PortIndex) -> Option<u16> {
        self.last_special(port, MidiStatus::PitchWheel)
            .map(|message| (u16::from(message.data2) << 7) | u16::from(message.data1))
    }

    /// Sends raw bytes through the output port paired with `port`.
    pub fn send_raw(&mut self, port: PortIndex, output: &[u8]) -> output::Result<()> {
        let Some(entry) = self.entry_mut(port) else {
            return Err(output::Error::InvalidPort(port));
        };
        entry.device.send(output)
    }

    /// Builds and sends a 3-byte channel message.
    pub fn send_channel_message(
        &mut self,
        port: PortIndex,
        status: MidiStatus,
        channel: u8,
        data1: u8,
        data2: u8,
    ) -> output::Result<()> {
        self.send_raw(port, &output::channel_message(status, channel, data1, data2))
    }

    /// Echoes a previously received message back to a device.
    ///
    /// Dummy messages carry no bytes and are silently ignored.
    pub fn send_message(&mut self, port: PortIndex, message: &MidiMessage) -> output::Result<()> {
        if message.status == MidiStatus::Dummy {
            return Ok(());
        }
        self.send_raw(port, &message.raw)
    }

    fn value(&self, data1: u8, status: MidiStatus, port: Option<PortIndex>) -> u8 {
        match port {
            None => state::first_active_value(self.tables(), data1, status),
            Some(port) => self
                .table(port)
                .and_then(|table| state::first_active_value([table], data1, status)),
        }
        .unwrap_or(0)
    }

    fn tables(&self) -> impl Iterator<Item = &DeviceStateTable> {
        self.devices.iter().map(|entry| &entry.state)
    }

    fn table(&self, port: PortIndex) -> Option<&DeviceStateTable> {
        self.entry(port).map(|entry| &entry.state)
    }

    fn last_special(&self, port: PortIndex, status: MidiStatus) -> Option<&MidiMessage> {
        self.table(port)
            .and_then(|table| table.last_special(status))
    }

    fn entry(&self, port: PortIndex) -> Option<&RegisteredDevice> {
        self.devices.get(usize::try_from(port.value()).ok()?)
    }

    fn entry_mut(&mut self, port: PortIndex) -> Option<&mut RegisteredDevice> {
        self.devices.get_mut(usize::try_from(port.value()).ok()?)
    }

    fn connect_all(&mut self) -> Result<(), PortError> {
        debug_assert!(self.devices.is_empty());
        for mut device in self.manager.devices() {
            let (sender, receiver) = mpsc::channel();
            device.reconnect(Some(move || QueueInputHandler { sender }))?;
            self.devices.push(RegisteredDevice {
                device,
                receiver,
                state: DeviceStateTable::new(),
            });
        }
        Ok(())
    }

    fn disconnect_all(&mut self) {
        for entry in &mut self.devices {
            entry.device.disconnect();
            entry.state.clear();
        }
        self.devices.clear();
    }

    fn port_set_changed(&self) -> bool {
        if self.manager.port_count() != self.devices.len() {
            return true;
        }
        self.manager
            .port_names()
            .iter()
            .zip(self.ports())
            .any(|(name, descriptor)| *name != descriptor.name)
    }

    fn rebuild(&mut self) -> Result<(), PortError> {
        let before = self
            .ports()
            .map(|descriptor| descriptor.name.clone())
            .collect::<Vec<_>>();
        let after = self.manager.port_names();
        for name in after.iter().filter(|name| !before.contains(name)) {
            log::info!("MIDI device added: \"{name}\"");
        }
        for name in before.iter().filter(|name| !after.contains(name)) {
            log::info!("MIDI device removed: \"{name}\"");
        }
        self.disconnect_all();
        self.connect_all()
    }
}

impl Drop for MidiRegistry {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}
