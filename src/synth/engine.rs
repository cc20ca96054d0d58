use std::ops::RangeInclusive;
use std::path::Path;

use super::output::{SoundOutput, CC_MODULATION, CC_VOLUME};
use super::voice::VoiceChannel;
use crate::error::{InstrumentError, TheoryError};
use crate::mapping::{clamp_unit, ChordTable, NoteTable, PitchSet};
use crate::patch::{InstrumentFormat, Patch, Pattern, PlayMode};
use crate::theory::{Key, MidiNote};

/// Channel single notes play on
pub const NOTE_CHANNEL: u8 = 0;
/// Channel chords play on, so both can sound without cutting each other off
pub const CHORD_CHANNEL: u8 = 1;

/// Scale a control value in [0, 1] to a 7-bit controller value
#[inline]
pub fn controller_value(value: f32) -> u8 {
    (clamp_unit(value) * 127.0) as u8
}

/// Turns (pitch, volume) control ticks into note events on a sound output.
///
/// Tables are built once here and never change. Each tick is synchronous and
/// allocation-free apart from what the output itself does; callers on
/// several threads must serialize access.
pub struct Synth<O: SoundOutput> {
    output: O,
    mode: PlayMode,
    notes: VoiceChannel<MidiNote>,
    chords: VoiceChannel<PitchSet>,
}

impl<O: SoundOutput> Synth<O> {
    /// Single notes of `key` across `octaves`, plus the default chord
    /// progression; `send` plays single notes.
    pub fn from_key(output: O, key: Key, octaves: RangeInclusive<i8>) -> Result<Self, TheoryError> {
        let notes = NoteTable::from_key(&key, octaves)?;
        let chords = ChordTable::from_pattern(&Pattern::default_progression())?;

        Ok(Self::with_tables(output, PlayMode::Notes, notes, chords))
    }

    /// Tables from the patch's pattern, mode and controller defaults from
    /// its config.
    pub fn new(output: O, patch: &Patch) -> Result<Self, TheoryError> {
        let pattern = &patch.pattern;
        let notes = NoteTable::from_key(&pattern.key(), pattern.octaves())?;
        let chords = ChordTable::from_pattern(pattern)?;

        let mut synth = Self::with_tables(output, patch.config.mode, notes, chords);
        synth.set_controller(CC_MODULATION, controller_value(patch.config.default_mod));
        synth.set_controller(CC_VOLUME, controller_value(patch.config.volume));

        tracing::info!(
            patch = patch.title(),
            mode = ?synth.mode,
            notes = synth.notes.table().len(),
            chords = synth.chords.table().len(),
            "synth ready"
        );
        Ok(synth)
    }

    pub fn with_tables(output: O, mode: PlayMode, notes: NoteTable, chords: ChordTable) -> Self {
        Self {
            output,
            mode,
            notes: VoiceChannel::new(NOTE_CHANNEL, notes),
            chords: VoiceChannel::new(CHORD_CHANNEL, chords),
        }
    }

    /// One control tick in the current play mode. Returns true on retrigger.
    pub fn send(&mut self, pitch: f32, volume: f32) -> bool {
        match self.mode {
            PlayMode::Notes => self.send_note(pitch, volume),
            PlayMode::Chords => self.send_chord(pitch, volume),
        }
    }

    pub fn send_note(&mut self, pitch: f32, volume: f32) -> bool {
        self.notes.update(pitch, volume, &mut self.output)
    }

    pub fn send_chord(&mut self, pitch: f32, volume: f32) -> bool {
        self.chords.update(pitch, volume, &mut self.output)
    }

    /// Modulation wheel, on both channels
    pub fn mod_wheel(&mut self, value: f32) {
        self.set_controller(CC_MODULATION, controller_value(value));
    }

    fn set_controller(&mut self, index: u8, value: u8) {
        self.output.controller(index, value, NOTE_CHANNEL);
        self.output.controller(index, value, CHORD_CHANNEL);
    }

    /// Load an instrument, picking the loader from the file extension.
    ///
    /// Failures are logged and reported as `false`; the synth stays usable.
    pub fn load_instrument(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_load_instrument(path) {
            Ok(format) => {
                tracing::debug!(path = %path.display(), format = format.description(), "instrument loaded");
                true
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "instrument not loaded");
                false
            }
        }
    }

    pub fn try_load_instrument(&mut self, path: &Path) -> Result<InstrumentFormat, InstrumentError> {
        let format = InstrumentFormat::from_path(path)?;
        self.output.load_instrument(path, format)?;
        Ok(format)
    }

    /// Stop every cached note and chord
    pub fn all_notes_off(&mut self) {
        self.notes.release(&mut self.output);
        self.chords.release(&mut self.output);
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
    }

    pub fn notes(&self) -> &VoiceChannel<MidiNote> {
        &self.notes
    }

    pub fn chords(&self) -> &VoiceChannel<PitchSet> {
        &self.chords
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

impl<O: SoundOutput> Drop for Synth<O> {
    fn drop(&mut self) {
        self.all_notes_off();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::message::SynthMessage;
    use crate::synth::output::RecordingOutput;

    #[test]
    fn controller_value_scales_and_clamps() {
        assert_eq!(controller_value(0.0), 0);
        assert_eq!(controller_value(1.0), 127);
        assert_eq!(controller_value(0.5), 63);
        assert_eq!(controller_value(2.0), 127);
        assert_eq!(controller_value(-1.0), 0);
    }

    #[test]
    fn mod_wheel_hits_both_channels() {
        let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
        synth.mod_wheel(1.0);
        assert_eq!(
            synth.output().events,
            vec![
                SynthMessage::Controller { channel: 0, index: 1, value: 127 },
                SynthMessage::Controller { channel: 1, index: 1, value: 127 },
            ]
        );
    }

    #[test]
    fn notes_and_chords_use_separate_channels() {
        let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
        synth.send_note(0.0, 1.0);
        synth.send_chord(0.0, 1.0);
        synth.send_note(1.0, 1.0);

        // Moving the note voice must not touch the chord voice
        let events = synth.output_mut().take();
        let chord_offs = events
            .iter()
            .filter(|e| matches!(e, SynthMessage::NoteOff { channel: 1, .. }))
            .count();
        assert_eq!(chord_offs, 0);
        assert_eq!(synth.chords().current().unwrap().numbers(), vec![48, 52, 55]);
    }

    #[test]
    fn load_failure_reports_false() {
        let mut synth = Synth::from_key(
            RecordingOutput::accepting(&[InstrumentFormat::Sf2]),
            Key::C_MAJOR,
            1..=4,
        )
        .unwrap();

        assert!(!synth.load_instrument("lead.mp3"));
        assert!(!synth.load_instrument("lead.wav"));
        assert!(synth.load_instrument("bank/piano.sf2"));
        assert_eq!(synth.output().loaded.len(), 1);
    }

    #[test]
    fn mode_switch_changes_send_target() {
        let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
        assert_eq!(synth.mode(), PlayMode::Notes);
        synth.send(0.0, 1.0);
        synth.set_mode(PlayMode::Chords);
        synth.send(0.0, 1.0);
        assert!(synth.notes().current().is_some());
        assert!(synth.chords().current().is_some());
    }
}
