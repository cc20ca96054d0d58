use std::path::{Path, PathBuf};

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use super::message::SynthMessage;
use crate::error::InstrumentError;
use crate::patch::InstrumentFormat;
use crate::theory::MidiNote;

/// Modulation wheel
pub const CC_MODULATION: u8 = 1;
/// Channel volume
pub const CC_VOLUME: u8 = 7;

/// The sound engine a `Synth` plays into.
///
/// Note and controller calls are fire-and-forget: an implementation that
/// cannot deliver an event drops it rather than blocking or retrying. Only
/// instrument loading reports failure, and it happens before playback.
pub trait SoundOutput {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8);

    fn note_off(&mut self, note: MidiNote, channel: u8);

    fn controller(&mut self, index: u8, value: u8, channel: u8);

    /// Load an instrument file. Default: the output has no instrument slots.
    fn load_instrument(
        &mut self,
        _path: &Path,
        format: InstrumentFormat,
    ) -> Result<(), InstrumentError> {
        Err(InstrumentError::Unsupported { format })
    }
}

impl<O: SoundOutput + ?Sized> SoundOutput for Box<O> {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8) {
        (**self).note_on(note, velocity, channel)
    }

    fn note_off(&mut self, note: MidiNote, channel: u8) {
        (**self).note_off(note, channel)
    }

    fn controller(&mut self, index: u8, value: u8, channel: u8) {
        (**self).controller(index, value, channel)
    }

    fn load_instrument(
        &mut self,
        path: &Path,
        format: InstrumentFormat,
    ) -> Result<(), InstrumentError> {
        (**self).load_instrument(path, format)
    }
}

/// Test double: records every event instead of making sound
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub events: Vec<SynthMessage>,
    pub loaded: Vec<(PathBuf, InstrumentFormat)>,
    /// Formats `load_instrument` accepts; everything else is `Unsupported`
    pub accepts: Vec<InstrumentFormat>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting(formats: &[InstrumentFormat]) -> Self {
        Self {
            accepts: formats.to_vec(),
            ..Self::default()
        }
    }

    /// Hand back everything recorded so far and start fresh
    pub fn take(&mut self) -> Vec<SynthMessage> {
        std::mem::take(&mut self.events)
    }

    pub fn note_ons(&self) -> impl Iterator<Item = &SynthMessage> {
        self.events
            .iter()
            .filter(|e| matches!(e, SynthMessage::NoteOn { .. }))
    }

    pub fn note_offs(&self) -> impl Iterator<Item = &SynthMessage> {
        self.events
            .iter()
            .filter(|e| matches!(e, SynthMessage::NoteOff { .. }))
    }
}

impl SoundOutput for RecordingOutput {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8) {
        self.events.push(SynthMessage::NoteOn {
            channel,
            note: note.number(),
            velocity,
        });
    }

    fn note_off(&mut self, note: MidiNote, channel: u8) {
        self.events.push(SynthMessage::NoteOff {
            channel,
            note: note.number(),
        });
    }

    fn controller(&mut self, index: u8, value: u8, channel: u8) {
        self.events.push(SynthMessage::Controller {
            channel,
            index,
            value,
        });
    }

    fn load_instrument(
        &mut self,
        path: &Path,
        format: InstrumentFormat,
    ) -> Result<(), InstrumentError> {
        if !self.accepts.contains(&format) {
            return Err(InstrumentError::Unsupported { format });
        }
        self.loaded.push((path.to_path_buf(), format));
        Ok(())
    }
}

/// Lock-free output: pushes messages into an `rtrb` ring for an audio thread.
///
/// A full ring drops the event and counts it.
#[cfg(feature = "rtrb")]
pub struct RingOutput {
    tx: Producer<SynthMessage>,
    dropped: u64,
}

#[cfg(feature = "rtrb")]
impl RingOutput {
    pub fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Events lost to a full ring since construction
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn is_connected(&self) -> bool {
        !self.tx.is_abandoned()
    }

    /// Returns false if the ring was full and the event was dropped
    pub fn push(&mut self, msg: SynthMessage) -> bool {
        if self.tx.push(msg).is_err() {
            self.dropped += 1;
            return false;
        }
        true
    }
}

#[cfg(feature = "rtrb")]
impl SoundOutput for RingOutput {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8) {
        self.push(SynthMessage::NoteOn {
            channel,
            note: note.number(),
            velocity,
        });
    }

    fn note_off(&mut self, note: MidiNote, channel: u8) {
        let sent = self.push(SynthMessage::NoteOff {
            channel,
            note: note.number(),
        });
        if !sent {
            // A lost note-off leaves the note hanging on the audio side
            tracing::warn!(note = note.number(), channel, dropped = self.dropped, "ring full, note-off lost");
        }
    }

    fn controller(&mut self, index: u8, value: u8, channel: u8) {
        self.push(SynthMessage::Controller {
            channel,
            index,
            value,
        });
    }
}
