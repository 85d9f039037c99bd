// SPDX-FileCopyrightText: The midio authors
// SPDX-License-Identifier: MPL-2.0

use super::GridLayout;
use crate::{
    midi::MidiOutputConnection,
    output::{Result, Rgb},
};

// Novation manufacturer id plus the Launchpad Pro product id, shared by all
// device-specific sysex commands.
const SYSEX_HEADER: [u8; 6] = [0xf0, 0x00, 0x20, 0x29, 0x02, 0x10];
const SYSEX_END: u8 = 0xf7;

const CMD_LED_RGB: u8 = 0x0b;
const CMD_LED_CLEAR: u8 = 0x0e;
const CMD_LED_GRID: u8 = 0x0f;
const CMD_SCROLL_TEXT: u8 = 0x14;

/// Most LEDs addressable by one [`rgb_leds`] message.
pub const MAX_LEDS_PER_MESSAGE: usize = 78;

fn begin(command: u8) -> Vec<u8> {
    let mut message = SYSEX_HEADER.to_vec();
    message.push(command);
    message
}

fn finish(mut message: Vec<u8>) -> Vec<u8> {
    message.push(SYSEX_END);
    message
}

// Color components are 6-bit on the wire.
const fn to_u6(component: u8) -> u8 {
    component >> 2
}

fn push_rgb(message: &mut Vec<u8>, color: Rgb) {
    message.extend_from_slice(&[to_u6(color.red), to_u6(color.green), to_u6(color.blue)]);
}

/// Lights one pad with a palette color (0..=127).
///
/// A plain note-on message, no sysex required.
#[must_use]
pub const fn palette_led(note: u8, color_index: u8) -> [u8; 3] {
    [0x90, note, color_index]
}

/// Sets one pad to an exact RGB color.
#[must_use]
pub fn rgb_led(note: u8, color: Rgb) -> Vec<u8> {
    let mut message = begin(CMD_LED_RGB);
    message.push(note);
    push_rgb(&mut message, color);
    finish(message)
}

/// Sets individually addressed pads in a single message.
///
/// At most [`MAX_LEDS_PER_MESSAGE`] LEDs fit into one sysex message;
/// surplus entries are dropped with a warning.
#[must_use]
pub fn rgb_leds(leds: &[(u8, Rgb)]) -> Vec<u8> {
    if leds.len() > MAX_LEDS_PER_MESSAGE {
        log::warn!(
            "Lighting only the first {MAX_LEDS_PER_MESSAGE} of {count} LEDs",
            count = leds.len(),
        );
    }
    let mut message = begin(CMD_LED_RGB);
    for &(note, color) in leds.iter().take(MAX_LEDS_PER_MESSAGE) {
        message.push(note);
        push_rgb(&mut message, color);
    }
    finish(message)
}

/// Sets the whole grid in one message, row by row.
///
/// Positions beyond the supplied colors keep their current state.
#[must_use]
pub fn grid(layout: GridLayout, colors: &[Rgb]) -> Vec<u8> {
    let mut message = begin(CMD_LED_GRID);
    message.push(layout as u8);
    for &color in colors.iter().take(layout.led_count()) {
        push_rgb(&mut message, color);
    }
    finish(message)
}

/// Sets every LED including the round buttons to one color.
#[must_use]
pub fn all_leds(color: Rgb) -> Vec<u8> {
    grid(GridLayout::Full, &[color; 100])
}

/// Turns every LED off.
#[must_use]
pub fn clear_all() -> Vec<u8> {
    let mut message = begin(CMD_LED_CLEAR);
    message.push(0);
    finish(message)
}

/// Scrolls text across the pad matrix in a palette color (0..=127).
///
/// Escape bytes 0x01 (slowest) to 0x07 (fastest) inside the text adjust
/// the scrolling speed. Non-ASCII bytes cannot be transported in a sysex
/// payload and are skipped.
#[must_use]
pub fn scroll_text(text: &str, color_index: u8, loop_forever: bool) -> Vec<u8> {
    let mut message = begin(CMD_SCROLL_TEXT);
    message.push(color_index);
    message.push(u8::from(loop_forever));
    message.extend(text.bytes().filter(u8::is_ascii));
    finish(message)
}

/// Builds and sends Launchpad Pro output messages over one connection.
#[derive(Debug)]
pub struct Gateway<C> {
    connection: C,
}

impl<C> Gateway<C>
where
    C: MidiOutputConnection,
{
    #[must_use]
    pub const fn new(connection: C) -> Self {
        Self { connection }
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub fn set_palette_led(&mut self, note: u8, color_index: u8) -> Result<()> {
        self.connection
            .send_midi_output(&palette_led(note, color_index))
    }

    pub fn set_rgb_led(&mut self, note: u8, color: Rgb) -> Result<()> {
        self.connection.send_midi_output(&rgb_led(note, color))
    }

    pub fn set_rgb_leds(&mut self, leds: &[(u8, Rgb)]) -> Result<()> {
        self.connection.send_midi_output(&rgb_leds(leds))
    }

    pub fn set_grid(&mut self, layout: GridLayout, colors: &[Rgb]) -> Result<()> {
        self.connection.send_midi_output(&grid(layout, colors))
    }

    pub fn set_all_leds(&mut self, color: Rgb) -> Result<()> {
        self.connection.send_midi_output(&all_leds(color))
    }

    pub fn clear_all_leds(&mut self) -> Result<()> {
        self.connection.send_midi_output(&clear_all())
    }

    pub fn scroll_text(&mut self, text: &str, color_index: u8, loop_forever: bool) -> Result<()> {
        self.connection
            .send_midi_output(&scroll_text(text, color_index, loop_forever))
    }
}
