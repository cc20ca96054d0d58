// Purpose: passive descriptions of what to play and with which instrument
// Nothing here triggers sound; Synth consumes a Patch once at construction

mod format;

pub use format::InstrumentFormat;

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::PatchError;
use crate::error::TheoryError;
use crate::theory::{Chord, ChordNote, Key, Note, PitchClass};

/// A named chord progression in a key.
///
/// Every chord note is checked against MIDI range on construction, so a
/// `Pattern` always resolves. The chord order is the playback order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PatternFile", into = "PatternFile"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    name: String,
    key: Key,
    octaves: RangeInclusive<i8>,
    chords: Vec<Vec<ChordNote>>,
}

impl Pattern {
    pub fn new(
        name: impl Into<String>,
        key: Key,
        octaves: RangeInclusive<i8>,
        chords: Vec<Vec<ChordNote>>,
    ) -> Result<Self, TheoryError> {
        for note in chords.iter().flatten() {
            note.midi()?;
        }

        Ok(Self {
            name: name.into(),
            key,
            octaves,
            chords,
        })
    }

    /// Root-position voicings of chord symbols, each rooted in `octave`
    pub fn from_progression(
        name: impl Into<String>,
        key: Key,
        octaves: RangeInclusive<i8>,
        progression: &[Chord],
        octave: i8,
    ) -> Result<Self, TheoryError> {
        let chords = progression.iter().map(|c| c.voiced_at(octave)).collect();
        Self::new(name, key, octaves, chords)
    }

    /// C, G, Am, F voiced around C3
    pub fn default_progression() -> Self {
        use PitchClass::*;

        let voicing = |notes: [(PitchClass, i8); 3]| {
            notes
                .into_iter()
                .map(|(pc, octave)| ChordNote::new(Note::new(pc, octave), octave))
                .collect::<Vec<_>>()
        };

        Self {
            name: "default".to_string(),
            key: Key::C_MAJOR,
            octaves: 1..=4,
            chords: vec![
                voicing([(C, 3), (E, 3), (G, 3)]),
                voicing([(G, 2), (B, 2), (D, 3)]),
                voicing([(A, 2), (C, 3), (E, 3)]),
                voicing([(F, 2), (A, 2), (C, 3)]),
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn octaves(&self) -> RangeInclusive<i8> {
        self.octaves.clone()
    }

    pub fn chords(&self) -> &[Vec<ChordNote>] {
        &self.chords
    }
}

/// On-disk shape of a pattern; the octave range is a two-element array
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct PatternFile {
    name: String,
    key: Key,
    octaves: [i8; 2],
    #[serde(default)]
    chords: Vec<Vec<ChordNote>>,
}

#[cfg(feature = "serde")]
impl TryFrom<PatternFile> for Pattern {
    type Error = TheoryError;

    fn try_from(file: PatternFile) -> Result<Self, Self::Error> {
        let [low, high] = file.octaves;
        Pattern::new(file.name, file.key, low..=high, file.chords)
    }
}

#[cfg(feature = "serde")]
impl From<Pattern> for PatternFile {
    fn from(pattern: Pattern) -> Self {
        Self {
            octaves: [*pattern.octaves.start(), *pattern.octaves.end()],
            name: pattern.name,
            key: pattern.key,
            chords: pattern.chords,
        }
    }
}

/// Which table `Synth::send` plays from
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    /// Single notes from the key across the octave range
    Notes,
    /// The pattern's chords in authored order
    #[default]
    Chords,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PatchConfig {
    pub name: String,
    /// Modulation wheel position applied at construction (0.0-1.0)
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_mod: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub tie: bool,
    /// Channel volume applied at construction (0.0-1.0)
    #[cfg_attr(feature = "serde", serde(default = "default_volume"))]
    pub volume: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: PlayMode,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_volume() -> f32 {
    1.0
}

impl PatchConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_mod: 0.0,
            tie: true,
            volume: 1.0,
            mode: PlayMode::Chords,
        }
    }
}

/// An instrument file: name without extension plus its declared format
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub filename: String,
    pub format: InstrumentFormat,
}

impl Preset {
    pub fn new(filename: impl Into<String>, format: InstrumentFormat) -> Self {
        Self {
            filename: filename.into(),
            format,
        }
    }

    /// "filename.ext"
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.extension())
    }

    pub fn format_description(&self) -> &'static str {
        self.format.description()
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchMetadata {
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub author: Option<String>,
}

/// On-disk shape of a patch; the pattern is validated after parsing
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct PatchFile {
    pattern: PatternFile,
    config: PatchConfig,
    preset: Preset,
    #[serde(default)]
    metadata: Option<PatchMetadata>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub pattern: Pattern,
    pub config: PatchConfig,
    pub preset: Preset,
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: Option<PatchMetadata>,
}

impl Patch {
    pub fn new(
        pattern: Pattern,
        config: PatchConfig,
        preset: Preset,
        metadata: Option<PatchMetadata>,
    ) -> Self {
        Self {
            pattern,
            config,
            preset,
            metadata,
        }
    }

    /// Title for display: metadata title, falling back to the config name
    pub fn title(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or(&self.config.name)
    }

    /// Parse a TOML patch. Syntax and shape problems are `Parse`; chord notes
    /// outside MIDI range are `Theory`.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, PatchError> {
        let file: PatchFile = toml::from_str(s)?;
        Ok(Self {
            pattern: Pattern::try_from(file.pattern)?,
            config: file.config,
            preset: file.preset,
            metadata: file.metadata,
        })
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let path = path.as_ref();
        let patch = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!(
            path = %path.display(),
            pattern = patch.pattern.name(),
            chords = patch.pattern.chords().len(),
            "loaded patch"
        );
        Ok(patch)
    }
}
