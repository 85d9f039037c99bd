// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

//! Polls all connected MIDI devices and prints note and controller
//! activity as it changes. Survives devices being plugged and unplugged.

use std::{thread, time::Duration};

use midio::{registry::MidiRegistry, MAX_DATA_VALUE};

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut registry = MidiRegistry::open()?;
    println!(
        "Connected {count} MIDI device(s):",
        count = registry.port_count()
    );
    for port in registry.ports() {
        println!("{index}: {name}", index = port.index, name = port.name);
    }

    let mut note_values = [0u8; 128];
    let mut cc_values = [0u8; 128];

    println!("Polling, press CTRL-C to exit...");
    loop {
        registry.poll()?;
        for data1 in 0..=MAX_DATA_VALUE {
            let slot = usize::from(data1);

            let note_value = registry.note_value(data1, None);
            if note_value != note_values[slot] {
                note_values[slot] = note_value;
                if note_value != 0 {
                    println!("note {data1} on (velocity {note_value})");
                } else {
                    println!("note {data1} off");
                }
            }

            let cc_value = registry.cc_value(data1, None);
            if cc_value != cc_values[slot] {
                cc_values[slot] = cc_value;
                println!("cc {data1} = {cc_value}");
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}
