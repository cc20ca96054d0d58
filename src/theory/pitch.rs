/*
Pitch Classes, Notes and MIDI Numbers
=====================================

Three layers, from abstract to concrete:

  PitchClass  A chromatic note name with no octave: C, C#, D ... B.
              Stored as its semitone above C (0-11).

  Note        A pitch class plus an octave designation. Purely symbolic:
              "G12" is a perfectly good Note, it just has no MIDI number.

  MidiNote    An absolute pitch in [0, 127]. Only reachable through checked
              constructors, so holding one means the range is already proven.

The MIDI formula (same convention as most DAWs, middle C = C4 = 60):

    number = 12 * (octave + 1) + semitone

    C-1 =   0     C4 = 60     A4 = 69     G9 = 127

Octave Transposition
--------------------

`to_octave(note, octave)` ignores the note's own octave entirely and places
its pitch class in the target octave. Two consequences fall straight out of
the formula:

    to_octave(n, o + 1) == to_octave(n, o) + 12
    to_octave(n.to_octave(o1), o2) == to_octave(n, o2)

Arithmetic happens in i16, so even i8::MIN / i8::MAX octaves cannot overflow
before the range check rejects them.
*/

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::TheoryError;

/// Highest valid MIDI note number
pub const MIDI_MAX: u8 = 127;

/// The twelve chromatic pitch classes, named with sharps
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// Chromatic order from C, the order classes appear inside one MIDI octave
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Semitones above C (0-11)
    pub fn semitone(self) -> u8 {
        self as u8
    }

    pub fn from_semitone(semitone: u8) -> Self {
        Self::ALL[(semitone % 12) as usize]
    }

    /// Move by a signed number of semitones, wrapping around the octave
    pub fn transpose(self, semitones: i32) -> Self {
        let wrapped = (self.semitone() as i32 + semitones).rem_euclid(12);
        Self::from_semitone(wrapped as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a leading pitch class ("C", "Eb", "F#") and return the unparsed rest
    pub(crate) fn parse_prefix(s: &str) -> Option<(Self, &str)> {
        let mut chars = s.char_indices();
        let (_, letter) = chars.next()?;
        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let mut offset = 0;
        let mut rest = &s[letter.len_utf8()..];
        for (idx, c) in chars {
            match c {
                // "Csus4" is C suspended, not C#
                's' if s[idx..].starts_with("sus") => break,
                '#' | '♯' | 's' => offset += 1,
                'b' | '♭' => offset -= 1,
                _ => break,
            }
            rest = &s[idx + c.len_utf8()..];
        }

        Some((Self::from_semitone((base + offset).rem_euclid(12) as u8), rest))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse_prefix(s.trim()) {
            Some((pc, "")) => Ok(pc),
            _ => Err(TheoryError::InvalidPitchClass(s.to_string())),
        }
    }
}

impl TryFrom<String> for PitchClass {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PitchClass> for String {
    fn from(pc: PitchClass) -> Self {
        pc.name().to_string()
    }
}

/// A pitch class with an octave designation
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i8,
}

impl Note {
    pub const fn new(pitch_class: PitchClass, octave: i8) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// Same pitch class placed in another octave
    pub fn to_octave(self, octave: i8) -> Note {
        Note::new(self.pitch_class, octave)
    }

    /// One octave higher. Saturates at `i8::MAX`, which never resolves anyway.
    pub fn octave_up(self) -> Note {
        self.to_octave(self.octave.saturating_add(1))
    }

    /// One octave lower. Saturates at `i8::MIN`.
    pub fn octave_down(self) -> Note {
        self.to_octave(self.octave.saturating_sub(1))
    }

    /// Shift by `octaves` (positive = up)
    pub fn shift_octaves(self, octaves: i8) -> Note {
        self.to_octave(self.octave.saturating_add(octaves))
    }

    /// Resolve at the note's own octave
    pub fn midi(self) -> Result<MidiNote, TheoryError> {
        to_octave(self, self.octave)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

impl FromStr for Note {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TheoryError::InvalidNote(s.to_string());
        let (pitch_class, rest) = PitchClass::parse_prefix(s.trim()).ok_or_else(invalid)?;
        let octave = rest.parse::<i8>().map_err(|_| invalid())?;
        Ok(Note::new(pitch_class, octave))
    }
}

impl TryFrom<String> for Note {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

/// An absolute pitch, guaranteed to be a valid MIDI note number (0-127)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MidiNote(u8);

impl MidiNote {
    /// Middle C
    pub const C4: MidiNote = MidiNote(60);

    pub const fn new(number: u8) -> Option<Self> {
        if number <= MIDI_MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::from_semitone(self.0 % 12)
    }

    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    pub fn note(self) -> Note {
        Note::new(self.pitch_class(), self.octave())
    }

    /// Shift by semitones, `None` if the result leaves MIDI range
    pub fn transpose(self, semitones: i16) -> Option<Self> {
        let shifted = self.0 as i16 + semitones;
        u8::try_from(shifted).ok().and_then(Self::new)
    }
}

impl fmt::Display for MidiNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.note().fmt(f)
    }
}

impl From<MidiNote> for u8 {
    fn from(note: MidiNote) -> Self {
        note.0
    }
}

impl TryFrom<u8> for MidiNote {
    type Error = TheoryError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        MidiNote::new(number).ok_or_else(|| TheoryError::PitchOutOfRange {
            note: number.to_string(),
            octave: (number / 12) as i16 - 1,
        })
    }
}

/// Absolute pitch of `note`'s pitch class in `octave`.
///
/// Independent of the note's own octave. Fails instead of wrapping when the
/// result leaves MIDI range.
pub fn to_octave(note: Note, octave: i8) -> Result<MidiNote, TheoryError> {
    let number = 12 * (octave as i16 + 1) + note.pitch_class.semitone() as i16;
    u8::try_from(number)
        .ok()
        .and_then(MidiNote::new)
        .ok_or_else(|| TheoryError::PitchOutOfRange {
            note: note.pitch_class.to_string(),
            octave: octave as i16,
        })
}
