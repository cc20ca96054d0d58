/*
Built-in Sample Player
======================

A small realtime sound output for running without external hardware. Split
in two halves connected by lock-free `rtrb` rings:

    control thread                         audio thread
    ──────────────                         ────────────
    Synth ─► SamplerHandle ──messages────► Sampler::render_block
                   │       ──instruments──►      │
                   └◄───────retired─────────────-┘

- Note and controller events travel as `SynthMessage`s (Copy, no allocation).
- Instruments are decoded on the control thread (`load_instrument`) and
  shipped as `Arc<SampleData>`. The one they replace travels back on the
  `retired` ring so its memory is freed off the audio thread.

The audio side never locks or allocates. Voices are allocated from a fixed
pool: a free voice first, else the oldest releasing voice; with neither
the note is dropped.

Controllers: CC 1 (modulation) sets vibrato depth, CC 7 channel volume.
*/

mod instrument;
mod voice;

pub use instrument::{SampleData, DEFAULT_ROOT};
pub use voice::{SampleVoice, VoiceState};

use std::f32::consts::TAU;
use std::path::Path;
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::InstrumentError;
use crate::patch::InstrumentFormat;
use crate::synth::message::{MessageReceiver, SynthMessage};
use crate::synth::output::{RingOutput, SoundOutput, CC_MODULATION, CC_VOLUME};
use crate::theory::MidiNote;

const MESSAGE_CAPACITY: usize = 1024;
const INSTRUMENT_CAPACITY: usize = 4;
const CHANNELS: usize = 16;

/// Vibrato at full modulation: half a semitone either way at 5.5 Hz
const VIBRATO_DEPTH_SEMITONES: f32 = 0.5;
const VIBRATO_RATE_HZ: f32 = 5.5;

/// Keeps a full chord on every voice from clipping
const MASTER_GAIN: f32 = 0.25;

/// Create a connected control handle and audio-thread renderer
pub fn sampler(sample_rate: f32, max_voices: usize) -> (SamplerHandle, Sampler<Consumer<SynthMessage>>) {
    let (msg_tx, msg_rx) = RingBuffer::new(MESSAGE_CAPACITY);
    let (inst_tx, inst_rx) = RingBuffer::new(INSTRUMENT_CAPACITY);
    let (retired_tx, retired_rx) = RingBuffer::new(INSTRUMENT_CAPACITY);

    let handle = SamplerHandle {
        output: RingOutput::new(msg_tx),
        instruments: inst_tx,
        retired: retired_rx,
    };
    let sampler = Sampler::new(sample_rate, max_voices, msg_rx, inst_rx, retired_tx);
    (handle, sampler)
}

/// Control-thread side: a `SoundOutput` that feeds a `Sampler`
pub struct SamplerHandle {
    output: RingOutput,
    instruments: Producer<Arc<SampleData>>,
    retired: Consumer<Arc<SampleData>>,
}

impl SamplerHandle {
    /// Messages lost to a full ring
    pub fn dropped(&self) -> u64 {
        self.output.dropped()
    }

    /// Hand an already decoded instrument to the audio thread
    pub fn send_instrument(&mut self, data: SampleData) -> Result<(), InstrumentError> {
        while self.retired.pop().is_ok() {}
        self.instruments
            .push(Arc::new(data))
            .map_err(|_| InstrumentError::Disconnected)
    }
}

impl SoundOutput for SamplerHandle {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8) {
        self.output.note_on(note, velocity, channel);
    }

    fn note_off(&mut self, note: MidiNote, channel: u8) {
        self.output.note_off(note, channel);
    }

    fn controller(&mut self, index: u8, value: u8, channel: u8) {
        self.output.controller(index, value, channel);
    }

    /// WAV only; preset and bank formats need a full sampler engine
    fn load_instrument(
        &mut self,
        path: &Path,
        format: InstrumentFormat,
    ) -> Result<(), InstrumentError> {
        if !format.is_wave() {
            return Err(InstrumentError::Unsupported { format });
        }
        self.send_instrument(SampleData::from_wav(path)?)
    }
}

#[derive(Debug, Clone, Copy)]
struct ChannelState {
    volume: f32,
    modulation: f32,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            modulation: 0.0,
        }
    }
}

/// Audio-thread side: renders the voices triggered through the handle
pub struct Sampler<R: MessageReceiver> {
    voices: Vec<SampleVoice>,
    rx: R,
    instruments: Consumer<Arc<SampleData>>,
    retired: Producer<Arc<SampleData>>,
    instrument: Arc<SampleData>,
    channels: [ChannelState; CHANNELS],
    sample_rate: f32,
    vibrato_phase: f32,
    frame_counter: u64,
}

impl<R: MessageReceiver> Sampler<R> {
    pub fn new(
        sample_rate: f32,
        max_voices: usize,
        rx: R,
        instruments: Consumer<Arc<SampleData>>,
        retired: Producer<Arc<SampleData>>,
    ) -> Self {
        Self {
            voices: vec![SampleVoice::new(); max_voices],
            rx,
            instruments,
            retired,
            instrument: Arc::new(SampleData::sine()),
            channels: [ChannelState::default(); CHANNELS],
            sample_rate,
            vibrato_phase: 0.0,
            frame_counter: 0,
        }
    }

    /// Overwrite `out` with the next block of mono audio
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.swap_instrument();

        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }

        // Vibrato is evaluated once per block
        let lfo = self.vibrato_phase.sin();
        self.vibrato_phase =
            (self.vibrato_phase + TAU * VIBRATO_RATE_HZ * out.len() as f32 / self.sample_rate) % TAU;

        out.fill(0.0);
        for voice in &mut self.voices {
            if !voice.is_active() {
                continue;
            }
            let channel = self.channels[voice.channel() as usize % CHANNELS];
            let semitones = lfo * channel.modulation * VIBRATO_DEPTH_SEMITONES;
            let pitch_scale = 2.0_f32.powf(semitones / 12.0);
            voice.render(
                out,
                &self.instrument,
                self.sample_rate,
                pitch_scale,
                channel.volume * MASTER_GAIN,
            );
        }

        self.frame_counter += out.len() as u64;
    }

    fn swap_instrument(&mut self) {
        while let Ok(next) = self.instruments.pop() {
            let old = std::mem::replace(&mut self.instrument, next);
            // Let the control thread free it; if its ring is full, drop here
            let _ = self.retired.push(old);
            for voice in &mut self.voices {
                voice.free();
            }
        }
    }

    fn handle(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn {
                channel,
                note,
                velocity,
            } => {
                let age = self.frame_counter;
                if let Some(voice) = self.allocate_voice() {
                    voice.start(channel, note, velocity, age);
                }
            }
            SynthMessage::NoteOff { channel, note } => {
                if let Some(voice) = self.voices.iter_mut().find(|v| v.is_holding(channel, note)) {
                    voice.release();
                }
            }
            SynthMessage::Controller {
                channel,
                index,
                value,
            } => {
                let state = &mut self.channels[channel as usize % CHANNELS];
                match index {
                    CC_MODULATION => state.modulation = value as f32 / 127.0,
                    CC_VOLUME => state.volume = value as f32 / 127.0,
                    _ => {}
                }
            }
        }
    }

    fn allocate_voice(&mut self) -> Option<&mut SampleVoice> {
        // First pass: find free voice index
        if let Some(idx) = self.voices.iter().position(|v| v.is_free()) {
            return Some(&mut self.voices[idx]);
        }

        // Second pass: steal oldest releasing voice
        let steal_idx = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx);

        steal_idx.map(|idx| &mut self.voices[idx])
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
