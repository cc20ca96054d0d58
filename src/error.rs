//! Error types shared across the crate

use crate::patch::InstrumentFormat;

/// Errors raised while resolving notes, keys and chords
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TheoryError {
    /// The note lands outside MIDI range (0-127) at the requested octave
    #[error("{note} at octave {octave} is outside the MIDI note range")]
    PitchOutOfRange { note: String, octave: i16 },

    #[error("invalid pitch class: {0:?}")]
    InvalidPitchClass(String),

    #[error("invalid note: {0:?}")]
    InvalidNote(String),

    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    #[error("invalid chord: {0:?}")]
    InvalidChord(String),
}

/// Errors raised while loading an instrument into a sound output
#[derive(thiserror::Error, Debug)]
pub enum InstrumentError {
    #[error("instrument path has no file extension")]
    MissingExtension,

    #[error("unrecognized instrument extension: {0:?}")]
    UnrecognizedExtension(String),

    /// The format is known but this output cannot load it
    #[error("{format} instruments are not supported by this output")]
    Unsupported { format: InstrumentFormat },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(String),

    /// The receiving side of the output has gone away or is full
    #[error("sound output is disconnected")]
    Disconnected,
}

/// Errors raised while opening a MIDI output port
#[cfg(feature = "midi")]
#[derive(thiserror::Error, Debug)]
pub enum MidiPortError {
    #[error("MIDI init failed: {0}")]
    Init(String),

    #[error("no MIDI output port matching {0:?}")]
    PortNotFound(String),

    #[error("MIDI connect failed: {0}")]
    Connect(String),
}

/// Errors raised while reading patch files
#[derive(thiserror::Error, Debug)]
pub enum PatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but names a pitch that doesn't resolve
    #[error("invalid pattern: {0}")]
    Theory(#[from] TheoryError),
}
