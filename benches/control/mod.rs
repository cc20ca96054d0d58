//! Benchmarks for the control path.

mod mapping;
mod synth;

pub use mapping::bench_mapping;
pub use synth::{bench_sampler, bench_synth};
