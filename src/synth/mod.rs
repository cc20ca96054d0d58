// Purpose: voice lifecycle on top of the mapping layer
// Quantized selections become note-on/note-off pairs on an injected sound output

pub mod engine;
pub mod message;
pub mod output;
pub mod voice;

pub use engine::{controller_value, Synth, CHORD_CHANNEL, NOTE_CHANNEL};
pub use message::{MessageReceiver, SynthMessage};
#[cfg(feature = "rtrb")]
pub use output::RingOutput;
pub use output::{RecordingOutput, SoundOutput, CC_MODULATION, CC_VOLUME};
pub use voice::{velocity, VoiceChannel, VoiceState};
