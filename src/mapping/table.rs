use std::ops::RangeInclusive;

use super::quantizer;
use crate::error::TheoryError;
use crate::patch::Pattern;
use crate::theory::{to_octave, Key, MidiNote, Note};

/// Something a voice can sound: one pitch or several at once
pub trait Voicing: Clone + PartialEq {
    fn pitches(&self) -> &[MidiNote];
}

impl Voicing for MidiNote {
    fn pitches(&self) -> &[MidiNote] {
        std::slice::from_ref(self)
    }
}

/// A set of simultaneous pitches, kept ascending without duplicates.
///
/// Two sets compare equal when they hold the same pitches, regardless of the
/// order the chord was authored in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PitchSet(Vec<MidiNote>);

impl PitchSet {
    pub fn new(pitches: impl IntoIterator<Item = MidiNote>) -> Self {
        let mut pitches: Vec<MidiNote> = pitches.into_iter().collect();
        pitches.sort();
        pitches.dedup();
        Self(pitches)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, note: MidiNote) -> bool {
        self.0.binary_search(&note).is_ok()
    }

    pub fn numbers(&self) -> Vec<u8> {
        self.0.iter().map(|n| n.number()).collect()
    }
}

impl Voicing for PitchSet {
    fn pitches(&self) -> &[MidiNote] {
        &self.0
    }
}

/// Ordered, immutable lookup table the quantizer indexes into
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTable<T> {
    entries: Vec<T>,
}

pub type NoteTable = PitchTable<MidiNote>;
pub type ChordTable = PitchTable<PitchSet>;

impl<T> PitchTable<T> {
    pub fn from_entries(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Quantize a control value in [0, 1] to an entry
    #[inline]
    pub fn select(&self, x: f32) -> Option<&T> {
        quantizer::select(&self.entries, x)
    }
}

impl NoteTable {
    /// Every pitch class of `key` in every octave of `octaves`.
    ///
    /// Order is (octave, chromatic position), so the table ascends. An empty
    /// range gives an empty table; one note outside MIDI range fails the build.
    pub fn from_key(key: &Key, octaves: RangeInclusive<i8>) -> Result<Self, TheoryError> {
        let classes = key.pitch_classes();
        let mut entries = Vec::with_capacity(classes.len() * octaves.clone().count());

        for octave in octaves.clone() {
            for &pitch_class in &classes {
                entries.push(to_octave(Note::new(pitch_class, octave), octave)?);
            }
        }

        tracing::debug!(
            key = %key,
            low = octaves.start(),
            high = octaves.end(),
            len = entries.len(),
            "built note table"
        );
        Ok(Self { entries })
    }
}

impl ChordTable {
    /// One entry per pattern chord, in authored order
    pub fn from_pattern(pattern: &Pattern) -> Result<Self, TheoryError> {
        let entries = pattern
            .chords()
            .iter()
            .map(|chord| {
                chord
                    .iter()
                    .map(|note| note.midi())
                    .collect::<Result<Vec<_>, _>>()
                    .map(PitchSet::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(pattern = pattern.name(), len = entries.len(), "built chord table");
        Ok(Self { entries })
    }
}
