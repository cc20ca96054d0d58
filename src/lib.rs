pub mod error;
pub mod io; // MIDI wire format and message conversion
pub mod mapping; // Pitch tables and the quantizer
pub mod patch; // Patch/preset descriptions
#[cfg(feature = "sampler")]
pub mod sampler; // Built-in realtime sample player
pub mod synth; // Voice state machine and sound outputs
pub mod theory; // Notes, keys and chords

pub use error::{InstrumentError, PatchError, TheoryError};
pub use mapping::{ChordTable, NoteTable, PitchSet, PitchTable};
pub use patch::{InstrumentFormat, Patch, PatchConfig, PatchMetadata, Pattern, PlayMode, Preset};
pub use synth::{RecordingOutput, SoundOutput, Synth, SynthMessage};
pub use theory::{Chord, ChordNote, Key, MidiNote, Note, PitchClass};

/// Largest audio block the binary renders in one go
pub const MAX_BLOCK_SIZE: usize = 2048;
