//! Benchmarks for control ticks and sampler rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use handsynth::sampler::sampler;
use handsynth::{Key, MidiNote, SoundOutput, Synth};

use crate::BLOCK_SIZES;

/// Output that only counts, so the bench measures the state machine
#[derive(Default)]
struct CountingOutput {
    events: u64,
}

impl SoundOutput for CountingOutput {
    fn note_on(&mut self, _note: MidiNote, _velocity: u8, _channel: u8) {
        self.events += 1;
    }

    fn note_off(&mut self, _note: MidiNote, _channel: u8) {
        self.events += 1;
    }

    fn controller(&mut self, _index: u8, _value: u8, _channel: u8) {
        self.events += 1;
    }
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth");

    // Hand held still: quantizes to the cached voicing, no output traffic
    let mut synth = Synth::from_key(CountingOutput::default(), Key::C_MAJOR, 1..=4).unwrap();
    synth.send_note(0.5, 0.5);
    group.bench_function("send_note/steady", |b| {
        b.iter(|| synth.send_note(black_box(0.5), black_box(0.5)))
    });

    // Hand sweeping: every tick lands on a new note
    let mut synth = Synth::from_key(CountingOutput::default(), Key::C_MAJOR, 1..=4).unwrap();
    let mut flip = false;
    group.bench_function("send_note/retrigger", |b| {
        b.iter(|| {
            flip = !flip;
            synth.send_note(black_box(if flip { 0.1 } else { 0.9 }), black_box(0.5))
        })
    });

    let mut synth = Synth::from_key(CountingOutput::default(), Key::C_MAJOR, 1..=4).unwrap();
    group.bench_function("send_chord/retrigger", |b| {
        b.iter(|| {
            flip = !flip;
            synth.send_chord(black_box(if flip { 0.1 } else { 0.9 }), black_box(0.5))
        })
    });

    group.finish();
}

pub fn bench_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");

    for &size in BLOCK_SIZES {
        let (mut handle, mut sampler) = sampler(48_000.0, 16);
        // A chord on each channel plus a lead note
        for (channel, notes) in [(0u8, [48u8, 52, 55]), (1, [60, 64, 67])] {
            for note in notes {
                handle.note_on(MidiNote::new(note).unwrap(), 90, channel);
            }
        }
        handle.note_on(MidiNote::new(72).unwrap(), 90, 0);
        let mut output = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("render_block/7_voices", size), &size, |b, _| {
            b.iter(|| sampler.render_block(black_box(&mut output)))
        });
    }

    group.finish();
}
