//! Audio device setup for the built-in sampler

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, RingBuffer};

use handsynth::sampler::{sampler, SamplerHandle};
use handsynth::MAX_BLOCK_SIZE;

/// Samples buffered for the scope view between UI frames
const SCOPE_CAPACITY: usize = 8192;

/// A running output stream and the handles to talk to it
pub struct AudioDevice {
    /// Control side of the sampler, handed to the synth
    pub handle: SamplerHandle,
    /// Mono copy of the rendered audio for the waveform view
    pub scope: Consumer<f32>,
    /// Playback stops when this is dropped
    _stream: cpal::Stream,
}

impl AudioDevice {
    /// Open the default output device and start rendering
    pub fn open(max_voices: usize) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        tracing::info!(sample_rate, channels, max_voices, "audio device opened");

        let (handle, mut sampler) = sampler(sample_rate, max_voices);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    sampler.render_block(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                        // Scope is best effort
                        let _ = scope_tx.push(s);
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| tracing::error!(error = %err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            handle,
            scope: scope_rx,
            _stream: stream,
        })
    }
}
