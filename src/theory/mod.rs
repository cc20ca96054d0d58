// Purpose: the music-theory primitives the mapping layer is built on
// Pitch classes, notes, keys and chords, resolved to MIDI note numbers

pub mod chord;
pub mod key;
pub mod pitch;

pub use chord::{Chord, ChordNote, ChordQuality};
pub use key::{Key, Scale};
pub use pitch::{to_octave, MidiNote, Note, PitchClass, MIDI_MAX};
