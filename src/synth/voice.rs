use crate::mapping::{clamp_unit, index_for, PitchTable, Voicing};
use crate::synth::output::SoundOutput;

/// Velocity for a control value in [0, 1]: 30 at silence, 90 at full.
///
/// The floor keeps quiet gestures audible.
#[inline]
pub fn velocity(volume: f32) -> u8 {
    (30.0 + 60.0 * clamp_unit(volume)).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Silent,   // Nothing cached, nothing sounding
    Sounding, // Cached voicing is held on the output
}

/// One MIDI channel's voice: a table, and the voicing last triggered from it.
///
/// `update` only touches the output when the quantized selection changes,
/// and always stops the old voicing before starting the new one. The cache
/// is an index into the table, so a tick never allocates; equal entries at
/// different indices still count as the same voicing.
#[derive(Debug, Clone)]
pub struct VoiceChannel<T: Voicing> {
    channel: u8,
    table: PitchTable<T>,
    cache: Option<usize>,
}

impl<T: Voicing> VoiceChannel<T> {
    pub fn new(channel: u8, table: PitchTable<T>) -> Self {
        Self {
            channel,
            table,
            cache: None,
        }
    }

    /// Run one control tick. Returns true if the output was retriggered.
    pub fn update<O>(&mut self, pitch: f32, volume: f32, output: &mut O) -> bool
    where
        O: SoundOutput + ?Sized,
    {
        let Some(next) = index_for(self.table.len(), pitch) else {
            return false;
        };
        let entries = self.table.entries();
        if self.cache.is_some_and(|cached| entries[cached] == entries[next]) {
            return false;
        }

        self.stop_cached(output);

        let velocity = velocity(volume);
        let pitches = self.table.entries()[next].pitches();
        for &note in pitches {
            output.note_on(note, velocity, self.channel);
        }
        tracing::trace!(channel = self.channel, index = next, pitches = ?pitches, velocity, "retrigger");

        self.cache = Some(next);
        true
    }

    /// Stop whatever is sounding and go silent
    pub fn release<O>(&mut self, output: &mut O)
    where
        O: SoundOutput + ?Sized,
    {
        self.stop_cached(output);
    }

    fn stop_cached<O>(&mut self, output: &mut O)
    where
        O: SoundOutput + ?Sized,
    {
        if let Some(previous) = self.cache.take() {
            for &note in self.table.entries()[previous].pitches() {
                output.note_off(note, self.channel);
            }
        }
    }

    pub fn state(&self) -> VoiceState {
        match self.cache {
            Some(_) => VoiceState::Sounding,
            None => VoiceState::Silent,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.cache.map(|idx| &self.table.entries()[idx])
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn table(&self) -> &PitchTable<T> {
        &self.table
    }
}
