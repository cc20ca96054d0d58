//! handsynth - play a synth by moving the mouse
//!
//! Run with: cargo run -- --key "A minor" --low 2 --high 5

mod app;
mod ui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{bail, Result as EyreResult, WrapErr};

use handsynth::{Key, Patch, PlayMode, SoundOutput, Synth};

#[derive(Parser, Debug)]
#[command(name = "handsynth", about = "Horizontal mouse position picks the note, vertical sets the velocity")]
struct Args {
    /// Patch file (TOML); overrides --key/--low/--high
    #[arg(short, long)]
    patch: Option<PathBuf>,

    /// Key for single-note mode, e.g. "C major", "F# dorian"
    #[arg(short, long, default_value = "C major")]
    key: Key,

    /// Lowest octave of the note table
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    low: i8,

    /// Highest octave of the note table
    #[arg(long, default_value_t = 4)]
    high: i8,

    /// Instrument file to load (the built-in sampler plays .wav)
    #[arg(short, long)]
    instrument: Option<PathBuf>,

    /// Start in chord mode
    #[arg(long)]
    chords: bool,

    /// Send to a MIDI output port (name substring) instead of the sampler
    #[arg(long)]
    midi: Option<String>,

    /// Sampler polyphony
    #[arg(long, default_value_t = 16)]
    voices: usize,

    /// Write logs to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let patch = args
        .patch
        .as_deref()
        .map(Patch::load)
        .transpose()
        .wrap_err("failed to load patch")?;

    if let Some(port) = &args.midi {
        return run_midi(&args, patch.as_ref(), port);
    }

    let device = app::AudioDevice::open(args.voices)?;
    let synth = build_synth(&args, patch.as_ref(), device.handle)?;
    ui::run(synth, Some(device.scope), patch.as_ref().map(|p| p.title().to_string()))
}

#[cfg(feature = "midi")]
fn run_midi(args: &Args, patch: Option<&Patch>, port: &str) -> EyreResult<()> {
    let output = handsynth::io::MidiPort::connect(port)?;
    let synth = build_synth(args, patch, output)?;
    ui::run(synth, None, patch.map(|p| p.title().to_string()))
}

#[cfg(not(feature = "midi"))]
fn run_midi(_args: &Args, _patch: Option<&Patch>, _port: &str) -> EyreResult<()> {
    bail!("MIDI output needs a build with --features midi")
}

fn build_synth<O: SoundOutput>(args: &Args, patch: Option<&Patch>, output: O) -> EyreResult<Synth<O>> {
    let mut synth = match patch {
        Some(patch) => Synth::new(output, patch)?,
        None => Synth::from_key(output, args.key, args.low..=args.high)?,
    };
    if args.chords {
        synth.set_mode(PlayMode::Chords);
    }
    if synth.notes().table().is_empty() && synth.chords().table().is_empty() {
        bail!("nothing to play: the note range and chord list are both empty");
    }

    let instrument = args.instrument.clone().or_else(|| {
        let patch_dir = args.patch.as_deref()?.parent()?;
        Some(patch?.preset.path_in(patch_dir))
    });
    if let Some(path) = instrument {
        if !synth.load_instrument(&path) {
            eprintln!("could not load {}, keeping the default instrument", path.display());
        }
    }

    Ok(synth)
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
