#[cfg(feature = "midi")]
use midir::{MidiOutput, MidiOutputConnection};

#[cfg(feature = "midi")]
use super::converter::synth_to_midi;
#[cfg(feature = "midi")]
use crate::{
    error::MidiPortError,
    synth::{message::SynthMessage, output::SoundOutput},
    theory::MidiNote,
};

/// Channel voice messages on the MIDI 1.0 wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Encode as the three wire bytes.
    ///
    /// Channels are masked to 4 bits and data bytes to 7 bits.
    pub fn encode(&self) -> [u8; 3] {
        let status = |kind: u8, channel: u8| kind | (channel & 0x0F);
        match *self {
            MidiEvent::NoteOff { channel, key, velocity } => {
                [status(0x80, channel), key & 0x7F, velocity & 0x7F]
            }
            MidiEvent::NoteOn { channel, key, velocity } => {
                [status(0x90, channel), key & 0x7F, velocity & 0x7F]
            }
            MidiEvent::ControlChange { channel, controller, value } => {
                [status(0xB0, channel), controller & 0x7F, value & 0x7F]
            }
        }
    }
}

/// A hardware or virtual MIDI output port driven as a sound output
#[cfg(feature = "midi")]
pub struct MidiPort {
    conn: MidiOutputConnection,
    failed_sends: u64,
}

#[cfg(feature = "midi")]
impl MidiPort {
    const CLIENT_NAME: &'static str = "handsynth";

    pub fn port_names() -> Result<Vec<String>, MidiPortError> {
        let midi_out = MidiOutput::new(Self::CLIENT_NAME).map_err(|e| MidiPortError::Init(e.to_string()))?;
        Ok(midi_out
            .ports()
            .iter()
            .filter_map(|p| midi_out.port_name(p).ok())
            .collect())
    }

    /// Connect to the first port whose name contains `name`
    pub fn connect(name: &str) -> Result<Self, MidiPortError> {
        let midi_out = MidiOutput::new(Self::CLIENT_NAME).map_err(|e| MidiPortError::Init(e.to_string()))?;
        let port = midi_out
            .ports()
            .into_iter()
            .find(|p| midi_out.port_name(p).is_ok_and(|n| n.contains(name)))
            .ok_or_else(|| MidiPortError::PortNotFound(name.to_string()))?;

        let conn = midi_out
            .connect(&port, "handsynth-out")
            .map_err(|e| MidiPortError::Connect(e.to_string()))?;
        tracing::info!(port = name, "connected MIDI output");

        Ok(Self {
            conn,
            failed_sends: 0,
        })
    }

    pub fn send(&mut self, event: MidiEvent) {
        if self.conn.send(&event.encode()).is_err() {
            self.failed_sends += 1;
        }
    }

    pub fn failed_sends(&self) -> u64 {
        self.failed_sends
    }
}

#[cfg(feature = "midi")]
impl SoundOutput for MidiPort {
    fn note_on(&mut self, note: MidiNote, velocity: u8, channel: u8) {
        self.send(synth_to_midi(SynthMessage::NoteOn {
            channel,
            note: note.number(),
            velocity,
        }));
    }

    fn note_off(&mut self, note: MidiNote, channel: u8) {
        self.send(synth_to_midi(SynthMessage::NoteOff {
            channel,
            note: note.number(),
        }));
    }

    fn controller(&mut self, index: u8, value: u8, channel: u8) {
        self.send(synth_to_midi(SynthMessage::Controller {
            channel,
            index,
            value,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_wire_format() {
        let event = MidiEvent::NoteOn { channel: 1, key: 60, velocity: 90 };
        assert_eq!(event.encode(), [0x91, 60, 90]);
    }

    #[test]
    fn note_off_and_controller_wire_format() {
        let off = MidiEvent::NoteOff { channel: 0, key: 48, velocity: 0 };
        assert_eq!(off.encode(), [0x80, 48, 0]);
        let cc = MidiEvent::ControlChange { channel: 15, controller: 7, value: 127 };
        assert_eq!(cc.encode(), [0xBF, 7, 127]);
    }

    #[test]
    fn out_of_range_fields_are_masked() {
        let event = MidiEvent::NoteOn { channel: 17, key: 200, velocity: 255 };
        assert_eq!(event.encode(), [0x91, 200 & 0x7F, 0x7F]);
    }
}
