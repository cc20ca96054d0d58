//! Benchmarks for the control path and the built-in sampler.
//!
//! Run with: cargo bench
//!
//! A hand tracker ticks at 30-120 Hz, so the control path has plenty of
//! headroom; what matters is that a tick never stalls the caller. The
//! sampler runs on the audio thread and must finish a block well within
//! its deadline.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - mapping/*  Table construction and quantized lookup
//!   - synth/*    Control ticks through the voice state machine
//!   - sampler/*  Block rendering with voices sounding

use criterion::{criterion_group, criterion_main};

mod control;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    control::bench_mapping,
    control::bench_synth,
    control::bench_sampler,
);
criterion_main!(benches);
