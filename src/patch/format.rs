use std::fmt;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InstrumentError;

/// Instrument file formats a sound output may be asked to load
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentFormat {
    AuPreset,
    Exs,
    Wav,
    Wave,
    Aif,
    Aiff,
    Caf,
    Sf,
    Sf2,
}

impl InstrumentFormat {
    pub const ALL: [InstrumentFormat; 9] = [
        InstrumentFormat::AuPreset,
        InstrumentFormat::Exs,
        InstrumentFormat::Wav,
        InstrumentFormat::Wave,
        InstrumentFormat::Aif,
        InstrumentFormat::Aiff,
        InstrumentFormat::Caf,
        InstrumentFormat::Sf,
        InstrumentFormat::Sf2,
    ];

    /// Case-insensitive lookup, without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    pub fn from_path(path: &Path) -> Result<Self, InstrumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(InstrumentError::MissingExtension)?;
        Self::from_extension(ext).ok_or_else(|| InstrumentError::UnrecognizedExtension(ext.to_string()))
    }

    pub fn extension(self) -> &'static str {
        match self {
            InstrumentFormat::AuPreset => "aupreset",
            InstrumentFormat::Exs => "exs",
            InstrumentFormat::Wav => "wav",
            InstrumentFormat::Wave => "wave",
            InstrumentFormat::Aif => "aif",
            InstrumentFormat::Aiff => "aiff",
            InstrumentFormat::Caf => "caf",
            InstrumentFormat::Sf => "sf",
            InstrumentFormat::Sf2 => "sf2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InstrumentFormat::AuPreset => "AUPreset",
            InstrumentFormat::Exs => "EXS-24 File",
            InstrumentFormat::Wav | InstrumentFormat::Wave => "Wave File",
            InstrumentFormat::Aif | InstrumentFormat::Aiff => "AIFF File",
            InstrumentFormat::Caf => "CAF File",
            InstrumentFormat::Sf => "SoundFont File",
            InstrumentFormat::Sf2 => "SoundFont 2 File",
        }
    }

    /// Plain PCM wave data, as opposed to preset or bank formats
    pub fn is_wave(self) -> bool {
        matches!(self, InstrumentFormat::Wav | InstrumentFormat::Wave)
    }
}

impl fmt::Display for InstrumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
