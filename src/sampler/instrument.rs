use std::f32::consts::TAU;
use std::path::Path;

use crate::error::InstrumentError;
use crate::io::midi_note_to_freq;
use crate::theory::{MidiNote, Note};

/// Root note assumed when a sample file doesn't name one
pub const DEFAULT_ROOT: MidiNote = MidiNote::C4;

const SINE_TABLE_LEN: usize = 2048;

/// Mono sample data plus what's needed to repitch it
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    frames: Vec<f32>,
    /// Frames per second the data was recorded at
    rate: f32,
    /// Frequency the data sounds at when played at its own rate
    root_freq: f32,
    looping: bool,
}

impl SampleData {
    pub fn new(frames: Vec<f32>, rate: f32, root: MidiNote, looping: bool) -> Self {
        Self {
            frames,
            rate,
            root_freq: midi_note_to_freq(root.number()),
            looping,
        }
    }

    /// Looping single-cycle sine, the instrument before anything is loaded
    pub fn sine() -> Self {
        let frames = (0..SINE_TABLE_LEN)
            .map(|i| (TAU * i as f32 / SINE_TABLE_LEN as f32).sin())
            .collect();
        let root_freq = midi_note_to_freq(DEFAULT_ROOT.number());

        Self {
            frames,
            rate: root_freq * SINE_TABLE_LEN as f32,
            root_freq,
            looping: true,
        }
    }

    /// Decode a WAV file, mixing all channels down to mono.
    ///
    /// A file stem that reads as a note ("d5.wav") sets the root note;
    /// otherwise it's C4.
    pub fn from_wav(path: &Path) -> Result<Self, InstrumentError> {
        let mut reader = hound::WavReader::open(path).map_err(decode_error)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(decode_error)?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(decode_error)?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let frames: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        if frames.is_empty() {
            return Err(InstrumentError::Decode(format!("{} has no audio", path.display())));
        }

        let root = root_from_stem(path).unwrap_or(DEFAULT_ROOT);
        tracing::debug!(
            path = %path.display(),
            frames = frames.len(),
            rate = spec.sample_rate,
            root = %root,
            "decoded wav"
        );
        Ok(Self::new(frames, spec.sample_rate as f32, root, false))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Read position advance per output frame to sound `note`
    #[inline]
    pub fn step_for(&self, note: u8, output_rate: f32) -> f64 {
        let ratio = midi_note_to_freq(note) / self.root_freq;
        (ratio * self.rate / output_rate) as f64
    }

    /// Linear interpolation at a fractional position; None past the end of a
    /// one-shot sample
    #[inline]
    pub fn read(&self, position: f64) -> Option<f32> {
        let len = self.frames.len();
        let mut position = position;
        if self.looping {
            position = position.rem_euclid(len as f64);
        }

        let idx = position as usize;
        if idx >= len {
            return None;
        }
        let frac = (position - idx as f64) as f32;
        let a = self.frames[idx];
        let b = match self.frames.get(idx + 1) {
            Some(&b) => b,
            None if self.looping => self.frames[0],
            None => 0.0,
        };
        Some(a + (b - a) * frac)
    }
}

fn root_from_stem(path: &Path) -> Option<MidiNote> {
    let stem = path.file_stem()?.to_str()?;
    stem.parse::<Note>().ok()?.midi().ok()
}

fn decode_error(err: hound::Error) -> InstrumentError {
    match err {
        hound::Error::IoError(io) => InstrumentError::Io(io),
        other => InstrumentError::Decode(other.to_string()),
    }
}
