// Keys: a root pitch class plus a scale's interval pattern.
//
// A key has no octave of its own. The pitch table builder combines it with
// an octave range to get concrete notes.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::pitch::PitchClass;
use crate::error::TheoryError;

/// Interval patterns, as semitones above the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    Chromatic,
}

impl Scale {
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::NaturalMinor => "minor",
            Scale::HarmonicMinor => "harmonic minor",
            Scale::MelodicMinor => "melodic minor",
            Scale::Dorian => "dorian",
            Scale::Phrygian => "phrygian",
            Scale::Lydian => "lydian",
            Scale::Mixolydian => "mixolydian",
            Scale::Locrian => "locrian",
            Scale::MajorPentatonic => "major pentatonic",
            Scale::MinorPentatonic => "minor pentatonic",
            Scale::Blues => "blues",
            Scale::Chromatic => "chromatic",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        // Case matters for the one-letter forms, as in chord symbols
        match name.trim() {
            "M" => return Some(Scale::Major),
            "m" => return Some(Scale::NaturalMinor),
            _ => {}
        }

        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        let scale = match normalized.as_str() {
            "" | "major" | "maj" | "ionian" => Scale::Major,
            "minor" | "min" | "natural minor" | "aeolian" => Scale::NaturalMinor,
            "harmonic minor" => Scale::HarmonicMinor,
            "melodic minor" => Scale::MelodicMinor,
            "dorian" => Scale::Dorian,
            "phrygian" => Scale::Phrygian,
            "lydian" => Scale::Lydian,
            "mixolydian" => Scale::Mixolydian,
            "locrian" => Scale::Locrian,
            "major pentatonic" | "pentatonic" => Scale::MajorPentatonic,
            "minor pentatonic" => Scale::MinorPentatonic,
            "blues" => Scale::Blues,
            "chromatic" => Scale::Chromatic,
            _ => return None,
        };
        Some(scale)
    }
}

/// A root pitch class and a scale
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub root: PitchClass,
    pub scale: Scale,
}

impl Key {
    pub const C_MAJOR: Key = Key::new(PitchClass::C, Scale::Major);

    pub const fn new(root: PitchClass, scale: Scale) -> Self {
        Self { root, scale }
    }

    /// The key's pitch classes in chromatic order from C.
    ///
    /// This is the order they appear inside a single MIDI octave, so walking
    /// octaves and then these classes yields strictly ascending pitches.
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        let mut classes: Vec<PitchClass> = self
            .scale
            .intervals()
            .iter()
            .map(|&interval| self.root.transpose(interval as i32))
            .collect();
        classes.sort();
        classes
    }

    pub fn contains(&self, pitch_class: PitchClass) -> bool {
        let offset = pitch_class.transpose(-(self.root.semitone() as i32));
        self.scale.intervals().contains(&offset.semitone())
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::C_MAJOR
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale.name())
    }
}

impl FromStr for Key {
    type Err = TheoryError;

    /// "C", "Am", "A minor", "F# dorian", "Eb harmonic-minor"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TheoryError::InvalidKey(s.to_string());
        let (root, rest) = PitchClass::parse_prefix(s.trim()).ok_or_else(invalid)?;
        let scale = Scale::from_name(rest).ok_or_else(invalid)?;
        Ok(Key::new(root, scale))
    }
}

impl TryFrom<String> for Key {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}
