// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::{message::decode, TimeStamp};

fn message(status: MidiStatus, data1: u8, data2: u8) -> MidiMessage {
    MidiMessage {
        ts: TimeStamp::from_micros(0),
        status,
        channel: 0,
        data1,
        data2,
        raw: Vec::new(),
    }
}

#[test]
fn last_ingested_message_wins_per_control() {
    let mut table = DeviceStateTable::new();
    table.ingest(message(MidiStatus::NoteOn, 60, 100));
    table.ingest(message(MidiStatus::NoteOn, 60, 64));
    table.ingest(message(MidiStatus::NoteOn, 60, 127));
    assert_eq!(127, table.control(60).unwrap().data2);
    assert_eq!(1, table.len());
}

#[test]
fn silent_note_on_reports_inactive_like_note_off() {
    let mut on_with_zero_velocity = DeviceStateTable::new();
    on_with_zero_velocity.ingest(decode(TimeStamp::default(), &[0x90, 60, 100]).unwrap());
    on_with_zero_velocity.ingest(decode(TimeStamp::default(), &[0x90, 60, 0]).unwrap());

    let mut off = DeviceStateTable::new();
    off.ingest(decode(TimeStamp::default(), &[0x90, 60, 100]).unwrap());
    off.ingest(decode(TimeStamp::default(), &[0x80, 60, 0]).unwrap());

    for table in [&on_with_zero_velocity, &off] {
        assert!(!table.is_active(60, MidiStatus::NoteOn));
        // The stale entry is still present, just inactive.
        assert!(table.control(60).is_some());
    }
}

#[test]
fn never_ingested_control_is_inactive() {
    let table = DeviceStateTable::new();
    assert!(!table.is_active(60, MidiStatus::NoteOn));
    assert!(!table.is_active(60, MidiStatus::ControlChange));
    assert!(table.control(60).is_none());
}

#[test]
fn active_requires_matching_status() {
    let mut table = DeviceStateTable::new();
    table.ingest(message(MidiStatus::ControlChange, 60, 10));
    assert!(table.is_active(60, MidiStatus::ControlChange));
    assert!(!table.is_active(60, MidiStatus::NoteOn));
}

#[test]
fn special_kinds_occupy_independent_slots() {
    let mut table = DeviceStateTable::new();
    table.ingest(message(MidiStatus::ProgramChange, 5, 0));
    table.ingest(message(MidiStatus::PitchWheel, 0x00, 0x40));
    table.ingest(message(MidiStatus::ChannelAftertouch, 99, 0));

    assert_eq!(
        5,
        table.last_special(MidiStatus::ProgramChange).unwrap().data1
    );
    assert_eq!(
        0x40,
        table.last_special(MidiStatus::PitchWheel).unwrap().data2
    );
    assert_eq!(
        99,
        table
            .last_special(MidiStatus::ChannelAftertouch)
            .unwrap()
            .data1
    );
    assert!(table.last_special(MidiStatus::Sysex).is_none());
}

#[test]
fn special_kinds_do_not_collide_with_controls() {
    let mut table = DeviceStateTable::new();
    // Identifier bytes of special messages are not keys; note 5 must be
    // unaffected by a program change to program 5.
    table.ingest(message(MidiStatus::NoteOn, 5, 100));
    table.ingest(message(MidiStatus::ProgramChange, 5, 0));
    assert_eq!(MidiStatus::NoteOn, table.control(5).unwrap().status);
    assert!(table.is_active(5, MidiStatus::NoteOn));
}

#[test]
fn last_special_is_none_for_standard_statuses() {
    let mut table = DeviceStateTable::new();
    table.ingest(message(MidiStatus::NoteOn, 60, 100));
    assert!(table.last_special(MidiStatus::NoteOn).is_none());
}

#[test]
fn clear_empties_every_slot() {
    let mut table = DeviceStateTable::new();
    table.ingest(message(MidiStatus::NoteOn, 60, 100));
    table.ingest(message(MidiStatus::ControlChange, 7, 127));
    table.ingest(message(MidiStatus::Sysex, 0, 0));
    table.clear();
    assert!(table.is_empty());
    assert!(table.control(60).is_none());
    assert!(table.control(7).is_none());
    assert!(table.last_special(MidiStatus::Sysex).is_none());
}

#[test]
fn standard_statuses_share_the_identifier_keyspace() {
    let mut table = DeviceStateTable::new();
    table.ingest(message(MidiStatus::NoteOn, 60, 100));
    table.ingest(message(MidiStatus::ControlChange, 60, 10));
    let latest = table.control(60).unwrap();
    assert_eq!(MidiStatus::ControlChange, latest.status);
    assert_eq!(10, latest.data2);
    assert!(!table.is_active(60, MidiStatus::NoteOn));
    assert!(table.is_active(60, MidiStatus::ControlChange));
}

#[test]
fn second_sysex_replaces_the_first() {
    let mut table = DeviceStateTable::new();
    let first = [0xf0, 0x00, 0x20, 0x29, 0x01, 0xf7];
    let second = [0xf0, 0x00, 0x20, 0x29, 0x02, 0xf7];
    table.ingest(decode(TimeStamp::default(), &first).unwrap());
    table.ingest(decode(TimeStamp::default(), &second).unwrap());
    assert_eq!(
        second.to_vec(),
        table.last_special(MidiStatus::Sysex).unwrap().raw
    );
}

#[test]
fn unrecognized_statuses_land_in_the_dummy_slot() {
    let mut table = DeviceStateTable::new();
    table.ingest(decode(TimeStamp::default(), &[0x42, 1, 2]).unwrap());
    table.ingest(decode(TimeStamp::default(), &[0x17, 3, 4]).unwrap());
    let latest = table.last_special(MidiStatus::Dummy).unwrap();
    assert_eq!(3, latest.data1);
    assert_eq!(1, table.len());
}

#[test]
fn first_active_value_scans_in_port_order() {
    let mut first = DeviceStateTable::new();
    let mut second = DeviceStateTable::new();
    first.ingest(message(MidiStatus::NoteOn, 60, 100));
    second.ingest(message(MidiStatus::NoteOn, 60, 50));

    assert_eq!(
        Some(100),
        first_active_value([&first, &second], 60, MidiStatus::NoteOn)
    );
    assert_eq!(
        Some(50),
        first_active_value([&second, &first], 60, MidiStatus::NoteOn)
    );
}

#[test]
fn first_active_value_skips_inactive_tables() {
    let mut released = DeviceStateTable::new();
    let mut held = DeviceStateTable::new();
    released.ingest(message(MidiStatus::NoteOff, 60, 0));
    held.ingest(message(MidiStatus::NoteOn, 60, 50));

    assert_eq!(
        Some(50),
        first_active_value([&released, &held], 60, MidiStatus::NoteOn)
    );
    assert_eq!(
        None,
        first_active_value([&released], 60, MidiStatus::NoteOn)
    );
    assert_eq!(
        None,
        first_active_value(std::iter::empty::<&DeviceStateTable>(), 60, MidiStatus::NoteOn)
    );
}
