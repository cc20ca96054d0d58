use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::pitch::{to_octave, MidiNote, Note, PitchClass};
use crate::error::TheoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    Diminished7,
}

impl ChordQuality {
    /// Semitones above the root, in stacking order
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Diminished7 => &[0, 3, 6, 9],
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Diminished7 => "dim7",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        let quality = match suffix {
            "" | "M" | "maj" => ChordQuality::Major,
            "m" | "min" | "-" => ChordQuality::Minor,
            "dim" | "°" => ChordQuality::Diminished,
            "aug" | "+" => ChordQuality::Augmented,
            "sus2" => ChordQuality::Sus2,
            "sus4" | "sus" => ChordQuality::Sus4,
            "7" | "dom7" => ChordQuality::Dominant7,
            "maj7" | "M7" => ChordQuality::Major7,
            "m7" | "min7" => ChordQuality::Minor7,
            "dim7" | "°7" => ChordQuality::Diminished7,
            _ => return None,
        };
        Some(quality)
    }
}

/// A chord symbol: root plus quality, no octave
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl Chord {
    pub const fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self { root, quality }
    }

    /// Constituent pitch classes, root first
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.quality
            .intervals()
            .iter()
            .map(|&interval| self.root.transpose(interval as i32))
            .collect()
    }

    /// Root-position voicing with the root in `octave`; upper tones stack
    /// upward and may spill into the next octave.
    pub fn voiced_at(&self, octave: i8) -> Vec<ChordNote> {
        self.quality
            .intervals()
            .iter()
            .map(|&interval| {
                let from_c = self.root.semitone() + interval;
                let pitch_class = PitchClass::from_semitone(from_c);
                let octave = octave.saturating_add((from_c / 12) as i8);
                ChordNote::new(Note::new(pitch_class, octave), octave)
            })
            .collect()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}

impl FromStr for Chord {
    type Err = TheoryError;

    /// "C", "Am", "G7", "Bdim", "Fmaj7", "Dsus4"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TheoryError::InvalidChord(s.to_string());
        let (root, rest) = PitchClass::parse_prefix(s.trim()).ok_or_else(invalid)?;
        let quality = ChordQuality::from_suffix(rest).ok_or_else(invalid)?;
        Ok(Chord::new(root, quality))
    }
}

impl TryFrom<String> for Chord {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Chord> for String {
    fn from(chord: Chord) -> Self {
        chord.to_string()
    }
}

/// One authored chord tone: a note placed at an explicit octave.
///
/// The note's own octave is ignored when resolving; `octave` wins.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordNote {
    pub note: Note,
    pub octave: i8,
}

impl ChordNote {
    pub const fn new(note: Note, octave: i8) -> Self {
        Self { note, octave }
    }

    pub fn midi(&self) -> Result<MidiNote, TheoryError> {
        to_octave(self.note, self.octave)
    }
}

impl From<Note> for ChordNote {
    fn from(note: Note) -> Self {
        ChordNote::new(note, note.octave)
    }
}

impl fmt::Display for ChordNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note.pitch_class, self.octave)
    }
}

impl FromStr for ChordNote {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Note>().map(ChordNote::from)
    }
}

impl TryFrom<String> for ChordNote {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChordNote> for String {
    fn from(chord_note: ChordNote) -> Self {
        chord_note.to_string()
    }
}
