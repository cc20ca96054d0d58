#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// MIDI-style control events emitted by the voice state machine.
///
/// `Copy` and allocation-free so they can cross a realtime ring buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    Controller { channel: u8, index: u8, value: u8 },
}

impl SynthMessage {
    pub fn channel(&self) -> u8 {
        match *self {
            SynthMessage::NoteOn { channel, .. }
            | SynthMessage::NoteOff { channel, .. }
            | SynthMessage::Controller { channel, .. } => channel,
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
