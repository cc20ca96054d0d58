// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

pub use converter::{midi_note_to_freq, synth_to_midi};
#[cfg(feature = "midi")]
pub use midi::MidiPort;
pub use midi::MidiEvent;
