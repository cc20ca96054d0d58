use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use handsynth::mapping::{index_for, select};
use handsynth::synth::{CHORD_CHANNEL, NOTE_CHANNEL};
use handsynth::theory::to_octave;
use handsynth::{
    ChordNote, InstrumentError, InstrumentFormat, Key, MidiNote, Note, Patch, PatchConfig,
    Pattern, PitchClass, PlayMode, Preset, RecordingOutput, SoundOutput, Synth, SynthMessage,
};

/// Lets a test look at what a synth sent after the synth is gone
#[derive(Clone, Default)]
struct SharedOutput(Rc<RefCell<RecordingOutput>>);

impl SoundOutput for SharedOutput {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8) {
        self.0.borrow_mut().note_on(note, velocity, channel);
    }

    fn note_off(&mut self, note: MidiNote, channel: u8) {
        self.0.borrow_mut().note_off(note, channel);
    }

    fn controller(&mut self, index: u8, value: u8, channel: u8) {
        self.0.borrow_mut().controller(index, value, channel);
    }
}

fn notes(numbers: &[u8]) -> Vec<ChordNote> {
    numbers
        .iter()
        .map(|&n| ChordNote::from(MidiNote::new(n).unwrap().note()))
        .collect()
}

fn chord_patch(chords: Vec<Vec<ChordNote>>) -> Patch {
    let pattern = Pattern::new("test", Key::C_MAJOR, 1..=4, chords).unwrap();
    Patch::new(pattern, PatchConfig::new("test"), Preset::new("d5", InstrumentFormat::Wav), None)
}

fn note_on(channel: u8, note: u8, velocity: u8) -> SynthMessage {
    SynthMessage::NoteOn { channel, note, velocity }
}

fn note_off(channel: u8, note: u8) -> SynthMessage {
    SynthMessage::NoteOff { channel, note }
}

#[test]
fn c_major_table_spans_c1_to_b4() {
    let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
    let table = synth.notes().table();
    assert_eq!(table.len(), 28);
    assert_eq!(table.first().map(|n| n.number()), Some(24));
    assert_eq!(table.last().map(|n| n.number()), Some(71));

    synth.send(0.0, 1.0);
    synth.send(1.0, 1.0);
    assert_eq!(
        synth.output_mut().take(),
        vec![note_on(NOTE_CHANNEL, 24, 90), note_off(NOTE_CHANNEL, 24), note_on(NOTE_CHANNEL, 71, 90)]
    );
}

#[test]
fn triad_pattern_plays_exact_chord_at_zero() {
    let patch = chord_patch(vec![notes(&[48, 52, 55])]);
    let mut synth = Synth::new(RecordingOutput::new(), &patch).unwrap();
    synth.output_mut().take();

    assert!(synth.send(0.0, 0.0));
    assert_eq!(
        synth.output_mut().take(),
        vec![
            note_on(CHORD_CHANNEL, 48, 30),
            note_on(CHORD_CHANNEL, 52, 30),
            note_on(CHORD_CHANNEL, 55, 30),
        ]
    );
    assert_eq!(synth.chords().current().map(|c| c.numbers()), Some(vec![48, 52, 55]));
}

#[test]
fn empty_chord_list_triggers_nothing() {
    let patch = chord_patch(Vec::new());
    let mut synth = Synth::new(RecordingOutput::new(), &patch).unwrap();
    synth.output_mut().take();

    for x in [0.0, 0.5, 1.0, -3.0, f32::NAN] {
        assert!(!synth.send(x, 1.0));
    }
    assert!(synth.output().events.is_empty());
}

#[test]
fn steady_hand_sends_nothing_after_first_trigger() {
    let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 3..=3).unwrap();
    synth.send_note(0.5, 0.2);
    synth.output_mut().take();

    // Same quantized note at a different volume is still a no-op
    for volume in [0.2, 0.9, 0.0] {
        assert!(!synth.send_note(0.51, volume));
    }
    assert!(synth.output().events.is_empty());
}

#[test]
fn change_stops_every_old_pitch_before_starting_new_ones() {
    let patch = chord_patch(vec![notes(&[48, 52, 55]), notes(&[43, 47, 50])]);
    let mut synth = Synth::new(RecordingOutput::new(), &patch).unwrap();
    synth.send(0.0, 1.0);
    synth.output_mut().take();

    assert!(synth.send(1.0, 0.5));
    assert_eq!(
        synth.output_mut().take(),
        vec![
            note_off(CHORD_CHANNEL, 48),
            note_off(CHORD_CHANNEL, 52),
            note_off(CHORD_CHANNEL, 55),
            note_on(CHORD_CHANNEL, 43, 60),
            note_on(CHORD_CHANNEL, 47, 60),
            note_on(CHORD_CHANNEL, 50, 60),
        ]
    );
}

#[test]
fn out_of_range_control_saturates() {
    let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
    synth.send_note(-0.5, 1.0);
    assert_eq!(synth.notes().current().map(|n| n.number()), Some(24));
    assert!(!synth.send_note(0.0, 1.0));

    synth.send_note(7.0, 1.0);
    assert_eq!(synth.notes().current().map(|n| n.number()), Some(71));
    assert!(!synth.send_note(1.0, 1.0));
}

#[test]
fn quantizer_boundaries_follow_inclusive_endpoints() {
    // Four entries: boundaries at 1/3 and 2/3, last entry only at x = 1
    let table = ["a", "b", "c", "d"];
    assert_eq!(select(&table, 0.0), Some(&"a"));
    assert_eq!(select(&table, 0.33), Some(&"a"));
    assert_eq!(select(&table, 0.34), Some(&"b"));
    assert_eq!(select(&table, 0.99), Some(&"c"));
    assert_eq!(select(&table, 1.0), Some(&"d"));
    assert_eq!(index_for(0, 0.5), None);
}

#[test]
fn note_and_chord_channels_are_independent() {
    let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
    synth.send_note(0.0, 1.0);
    synth.send_chord(0.0, 1.0);
    synth.output_mut().take();

    synth.send_chord(1.0, 1.0);
    let events = synth.output_mut().take();
    assert!(events.iter().all(|e| e.channel() == CHORD_CHANNEL));
    assert_eq!(synth.notes().current().map(|n| n.number()), Some(24));
}

#[test]
fn mode_picks_table_for_send() {
    let mut synth = Synth::from_key(RecordingOutput::new(), Key::C_MAJOR, 1..=4).unwrap();
    assert_eq!(synth.mode(), PlayMode::Notes);

    synth.set_mode(PlayMode::Chords);
    synth.send(0.0, 1.0);
    let channels: Vec<u8> = synth.output().note_ons().map(SynthMessage::channel).collect();
    assert_eq!(channels, vec![CHORD_CHANNEL; 3]);
}

#[test]
fn patch_controllers_reach_both_channels() {
    let mut patch = chord_patch(vec![notes(&[60])]);
    patch.config.default_mod = 0.5;
    patch.config.volume = 1.0;
    let synth = Synth::new(RecordingOutput::new(), &patch).unwrap();

    let controllers: Vec<(u8, u8, u8)> = synth
        .output()
        .events
        .iter()
        .filter_map(|e| match *e {
            SynthMessage::Controller { channel, index, value } => Some((index, value, channel)),
            _ => None,
        })
        .collect();
    assert_eq!(
        controllers,
        vec![(1, 63, NOTE_CHANNEL), (1, 63, CHORD_CHANNEL), (7, 127, NOTE_CHANNEL), (7, 127, CHORD_CHANNEL)]
    );
}

#[test]
fn dropping_synth_stops_held_notes() {
    let shared = SharedOutput::default();
    {
        let mut synth = Synth::from_key(shared.clone(), Key::C_MAJOR, 1..=4).unwrap();
        synth.send_note(0.0, 1.0);
        synth.send_chord(0.0, 1.0);
        shared.0.borrow_mut().take();
    }

    let events = shared.0.borrow_mut().take();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| matches!(e, SynthMessage::NoteOff { .. })));
}

#[test]
fn instrument_loading_reports_failure_and_stays_playable() {
    let output = RecordingOutput::accepting(&[InstrumentFormat::Wav, InstrumentFormat::Sf2]);
    let mut synth = Synth::from_key(output, Key::C_MAJOR, 1..=4).unwrap();

    assert!(synth.load_instrument("sounds/piano.WAV"));
    assert!(synth.load_instrument(Path::new("bank.sf2")));
    assert!(!synth.load_instrument("notes.txt"));
    assert!(!synth.load_instrument("no_extension"));
    assert!(!synth.load_instrument("pad.exs"));
    assert!(matches!(
        synth.try_load_instrument(Path::new("pad.exs")),
        Err(InstrumentError::Unsupported { format: InstrumentFormat::Exs })
    ));

    assert_eq!(synth.output().loaded.len(), 2);
    assert!(synth.send(0.5, 0.5));
}

#[test]
fn octave_retargeting_laws() {
    for pc in PitchClass::ALL {
        for o1 in -1..=8i8 {
            let note = Note::new(pc, o1);
            let once = to_octave(note, o1).unwrap();
            let twice = to_octave(once.note(), o1).unwrap();
            assert_eq!(once, twice);

            if let (Ok(low), Ok(high)) = (to_octave(note, o1), to_octave(note, o1 + 1)) {
                assert_eq!(high.number(), low.number() + 12);
                assert_eq!(high.pitch_class(), low.pitch_class());
            }
        }
    }
    assert!(to_octave(Note::new(PitchClass::Gs, 3), 9).is_err());
    assert!(to_octave(Note::new(PitchClass::C, 3), -2).is_err());
}
