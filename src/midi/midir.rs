// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use std::marker::PhantomData;

use midir::{
    ConnectError, Ignore, InitError, MidiInput, MidiInputConnection, MidiInputPort, MidiOutput,
    MidiOutputConnection, MidiOutputPort,
};
use thiserror::Error;

use super::{MidiInputHandler, MidiPortDescriptor};
use crate::{output, PortIndex, TimeStamp};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("disconnected")]
    Disconnected,
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    ConnectInput(#[from] ConnectError<MidiInput>),
    #[error(transparent)]
    ConnectOutput(#[from] ConnectError<MidiOutput>),
}

impl From<midir::SendError> for output::Error {
    fn from(err: midir::SendError) -> Self {
        output::Error::Send {
            msg: err.to_string().into(),
        }
    }
}

impl super::MidiOutputConnection for MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> output::Result<()> {
        self.send(output).map_err(Into::into)
    }
}

// Adapter for the midir callback closure
fn handle_input<I>(micros: u64, input: &[u8], input_handler: &mut I)
where
    I: MidiInputHandler,
{
    let ts = TimeStamp::from_micros(micros);
    log::trace!("Received MIDI input: {ts} {input:x?}");
    input_handler.handle_midi_input(ts, input);
}

/// One MIDI device port pair driven by [`midir`].
///
/// The input and output port carry the same index: backends enumerate both
/// directions in the same order, so pairing is positional. Devices without
/// an output counterpart are input-only.
#[allow(missing_debug_implementations)]
pub struct MidirDevice<I>
where
    I: MidiInputHandler + 'static,
{
    descriptor: MidiPortDescriptor,
    input_port: MidiInputPort,
    output_port: Option<MidiOutputPort>,
    input_connection: Option<MidiInputConnection<I>>,
    output_connection: Option<MidiOutputConnection>,
}

impl<I> MidirDevice<I>
where
    I: MidiInputHandler,
{
    #[must_use]
    fn new(
        descriptor: MidiPortDescriptor,
        input_port: MidiInputPort,
        output_port: Option<MidiOutputPort>,
    ) -> Self {
        Self {
            descriptor,
            input_port,
            output_port,
            input_connection: None,
            output_connection: None,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &MidiPortDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.descriptor.name
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.input_connection.is_some()
    }

    pub fn reconnect(
        &mut self,
        new_input_handler: Option<impl FnOnce() -> I>,
    ) -> Result<(), PortError> {
        self.reconnect_input(new_input_handler)?;
        self.reconnect_output()?;
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.disconnect_input();
        self.disconnect_output();
    }

    /// Sends raw bytes through the paired output port.
    pub fn send(&mut self, output: &[u8]) -> output::Result<()> {
        let Some(connection) = self.output_connection.as_mut() else {
            return Err(output::Error::Disconnected);
        };
        connection.send(output).map_err(Into::into)
    }

    fn reconnect_input(
        &mut self,
        new_input_handler: Option<impl FnOnce() -> I>,
    ) -> Result<(), PortError> {
        let (input, mut input_handler) =
            if let Some((input, input_handler)) = self.disconnect_input() {
                (input, input_handler)
            } else {
                let Some(new_input_handler) = new_input_handler else {
                    return Err(PortError::Disconnected);
                };
                let mut input = MidiInput::new(&self.descriptor.name)?;
                input.ignore(Ignore::None);
                (input, new_input_handler())
            };
        input_handler.connect_midi_input_port(&self.descriptor);
        let input_connection = input.connect(
            &self.input_port,
            &self.descriptor.name,
            |micros, input, input_handler| handle_input(micros, input, input_handler),
            input_handler,
        )?;
        self.input_connection = Some(input_connection);
        Ok(())
    }

    fn disconnect_input(&mut self) -> Option<(MidiInput, I)> {
        self.input_connection.take().map(MidiInputConnection::close)
    }

    fn reconnect_output(&mut self) -> Result<(), PortError> {
        let Some(output_port) = &self.output_port else {
            return Ok(());
        };
        let output = match self.disconnect_output() {
            Some(output) => output,
            None => MidiOutput::new(&self.descriptor.name)?,
        };
        let output_connection = output.connect(output_port, &self.descriptor.name)?;
        self.output_connection = Some(output_connection);
        Ok(())
    }

    fn disconnect_output(&mut self) -> Option<MidiOutput> {
        self.output_connection
            .take()
            .map(MidiOutputConnection::close)
    }
}

/// Enumerates and connects [`MidirDevice`]s.
#[allow(missing_debug_implementations)]
pub struct MidirDeviceManager<I> {
    input: MidiInput,
    output: MidiOutput,
    _input_handler: PhantomData<I>,
}

impl<I> MidirDeviceManager<I>
where
    I: MidiInputHandler,
{
    pub fn new() -> Result<Self, InitError> {
        let mut input = MidiInput::new("input port watcher")?;
        input.ignore(Ignore::None);
        let output = MidiOutput::new("output port watcher")?;
        Ok(MidirDeviceManager {
            input,
            output,
            _input_handler: PhantomData,
        })
    }

    #[must_use]
    pub fn port_count(&self) -> usize {
        self.input.port_count()
    }

    /// Names of all input ports in enumeration order.
    #[must_use]
    pub fn port_names(&self) -> Vec<String> {
        self.input
            .ports()
            .iter()
            .filter_map(|port| self.input.port_name(port).ok())
            .collect()
    }

    /// All devices in ascending port order.
    ///
    /// Output ports are paired with input ports positionally.
    pub fn devices(&self) -> impl Iterator<Item = MidirDevice<I>> + '_ {
        let output_ports = self.output.ports();
        self.input
            .ports()
            .into_iter()
            .enumerate()
            .filter_map(move |(index, input_port)| {
                let name = self.input.port_name(&input_port).ok()?;
                let descriptor = MidiPortDescriptor {
                    index: PortIndex::new(u32::try_from(index).ok()?),
                    name,
                };
                let output_port = output_ports.get(index).cloned();
                log::debug!(
                    "Found MIDI device {index}: \"{name}\"",
                    index = descriptor.index,
                    name = descriptor.name,
                );
                Some(MidirDevice::new(descriptor, input_port, output_port))
            })
    }
}
