use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Synth messages to the MIDI wire; note-offs go out with release velocity 0
pub fn synth_to_midi(msg: SynthMessage) -> MidiEvent {
    match msg {
        SynthMessage::NoteOn {
            channel,
            note,
            velocity,
        } => MidiEvent::NoteOn {
            channel,
            key: note,
            velocity,
        },
        SynthMessage::NoteOff { channel, note } => MidiEvent::NoteOff {
            channel,
            key: note,
            velocity: 0,
        },
        SynthMessage::Controller {
            channel,
            index,
            value,
        } => MidiEvent::ControlChange {
            channel,
            controller: index,
            value,
        },
    }
}

/// Equal temperament, A4 (note 69) = 440 Hz
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
