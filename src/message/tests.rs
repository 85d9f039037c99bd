// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use super::*;

const TS: TimeStamp = TimeStamp::from_micros(42);

#[test]
fn decode_note_on() {
    let message = decode(TS, &[0x91, 60, 100]).unwrap();
    assert_eq!(MidiStatus::NoteOn, message.status);
    assert_eq!(1, message.channel);
    assert_eq!(60, message.data1);
    assert_eq!(100, message.data2);
    assert_eq!(vec![0x91, 60, 100], message.raw);
    assert_eq!(TS, message.ts);
}

#[test]
fn decode_reclassifies_silent_note_on_as_note_off() {
    let message = decode(TS, &[0x90, 60, 0]).unwrap();
    assert_eq!(MidiStatus::NoteOff, message.status);
}

#[test]
fn decode_reclassifies_loud_note_off_as_note_on() {
    let message = decode(TS, &[0x80, 60, 100]).unwrap();
    assert_eq!(MidiStatus::NoteOn, message.status);
}

#[test]
fn decode_defaults_missing_value_byte_to_zero() {
    let message = decode(TS, &[0xc5, 7]).unwrap();
    assert_eq!(MidiStatus::ProgramChange, message.status);
    assert_eq!(5, message.channel);
    assert_eq!(7, message.data1);
    assert_eq!(0, message.data2);
}

#[test]
fn decode_sysex_preserves_raw_bytes() {
    let raw = [0xf0, 0x00, 0x20, 0x29, 0x02, 0x10, 0x0b, 0x51, 0x3f, 0x00, 0x00, 0xf7];
    let message = decode(TS, &raw).unwrap();
    assert_eq!(MidiStatus::Sysex, message.status);
    assert_eq!(raw.to_vec(), message.raw);
}

#[test]
fn decode_unrecognized_status_nibble_as_dummy() {
    let message = decode(TS, &[0x42, 1, 2]).unwrap();
    assert_eq!(MidiStatus::Dummy, message.status);
}

#[test]
fn decode_empty_input_fails() {
    assert!(decode(TS, &[]).is_err());
}

#[test]
fn status_classification_is_disjoint() {
    use strum::IntoEnumIterator as _;
    for status in MidiStatus::iter() {
        assert!(!(status.has_control_identifier() && status.is_special()));
    }
    assert!(!MidiStatus::Dummy.has_control_identifier());
    assert!(!MidiStatus::Dummy.is_special());
}

#[test]
fn dummy_message_is_zero_valued() {
    let message = MidiMessage::dummy(60);
    assert_eq!(MidiStatus::Dummy, message.status);
    assert_eq!(60, message.data1);
    assert_eq!(0, message.data2);
    assert!(message.raw.is_empty());
}
