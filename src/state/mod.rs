// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::HashMap;

use crate::message::{MidiMessage, MidiStatus};

#[cfg(test)]
mod tests;

/// Key of one slot in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StateKey {
    /// Standard statuses share one slot per identifier byte.
    Control(u8),
    /// Statuses without a stable identifier get one reserved slot per kind.
    Special(MidiStatus),
}

impl StateKey {
    fn for_message(message: &MidiMessage) -> Self {
        if message.status.has_control_identifier() {
            Self::Control(message.data1)
        } else {
            Self::Special(message.status)
        }
    }
}

/// Latest-value cache over the message stream of a single device port.
///
/// MIDI interleaves notes, controller changes, aftertouch, pitch-wheel and
/// sysex on one wire. The table collapses that stream into one slot per
/// derived key so callers can ask synchronous point-in-time questions
/// ("is note 60 held right now?") without replaying history.
///
/// Each table is owned by exactly one device port. Mutation happens only
/// from the polling step that drains that port; queries may run at any
/// point between polls.
#[derive(Debug, Clone, Default)]
pub struct DeviceStateTable {
    slots: HashMap<StateKey, MidiMessage>,
}

impl DeviceStateTable {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    /// Stores `message` in its slot, replacing the previous occupant.
    ///
    /// Arrival order decides which message is the latest; timestamps are
    /// carried along but never compared. Messages with an unrecognized
    /// status are accepted and land in the [`MidiStatus::Dummy`] slot.
    pub fn ingest(&mut self, message: MidiMessage) {
        self.slots.insert(StateKey::for_message(&message), message);
    }

    /// Latest message stored under a standard control identifier, or `None`
    /// if no message with that identifier has ever been seen.
    ///
    /// All standard statuses share the identifier keyspace: a control
    /// change and a note message with the same `data1` overwrite each
    /// other. Callers that care about the kind must check the status of the
    /// returned message, which is what [`Self::is_active`] does.
    #[must_use]
    pub fn control(&self, data1: u8) -> Option<&MidiMessage> {
        self.slots.get(&StateKey::Control(data1))
    }

    /// Latest message of a special kind, or `None` if no message of that
    /// kind has ever been seen.
    ///
    /// Standard statuses have no special slot and always yield `None` here.
    #[must_use]
    pub fn last_special(&self, status: MidiStatus) -> Option<&MidiMessage> {
        if status.has_control_identifier() {
            return None;
        }
        self.slots.get(&StateKey::Special(status))
    }

    /// `true` iff the control is present with the requested status and a
    /// non-zero value.
    ///
    /// A released note fails the non-zero check, because NoteOff velocity
    /// is forced to zero during decoding. The stale NoteOff entry stays in
    /// the table but reports inactive.
    #[must_use]
    pub fn is_active(&self, data1: u8, status: MidiStatus) -> bool {
        self.control(data1)
            .is_some_and(|message| message.status == status && message.data2 != 0)
    }

    /// Discards every slot.
    ///
    /// Used when the device set is rebuilt on hot-plug and on shutdown.
    /// There is no partial clear.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Scans tables in iteration order and returns the value of the first one
/// where the control is active with the requested status.
///
/// The registry iterates devices in ascending port order, turning this into
/// a first-match-wins query across all connected devices.
#[must_use]
pub fn first_active_value<'a>(
    tables: impl IntoIterator<Item = &'a DeviceStateTable>,
    data1: u8,
    status: MidiStatus,
) -> Option<u8> {
    tables.into_iter().find_map(|table| {
        table
            .is_active(data1, status)
            .then(|| table.control(data1).map(|message| message.data2))
            .flatten()
    })
}
