use super::instrument::SampleData;

/// Attack ramp length in seconds; short enough to read as instant, long
/// enough not to click
const ATTACK_SECONDS: f32 = 0.005;
const RELEASE_SECONDS: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Key held
    Releasing, // Key released, fading out
}

/// One playing sample: a read position, an amplitude ramp and the key that
/// started it.
///
/// The attack always runs to full level, even when the key is released
/// first, so a note started and stopped inside one block is still heard.
#[derive(Debug, Clone)]
pub struct SampleVoice {
    note: u8,
    channel: u8,
    velocity: u8,
    state: VoiceState,
    age: u64,
    position: f64,
    level: f32,
    attack_done: bool,
}

impl SampleVoice {
    pub fn new() -> Self {
        Self {
            note: 0,
            channel: 0,
            velocity: 0,
            state: VoiceState::Free,
            age: 0,
            position: 0.0,
            level: 0.0,
            attack_done: false,
        }
    }

    pub fn start(&mut self, channel: u8, note: u8, velocity: u8, age: u64) {
        self.note = note;
        self.channel = channel;
        self.velocity = velocity;
        self.state = VoiceState::Active;
        self.age = age;
        self.position = 0.0;
        self.level = 0.0;
        self.attack_done = false;
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
        }
    }

    /// Mix this voice into `out`. `pitch_scale` bends the playback rate
    /// (vibrato), `gain` is channel volume.
    pub fn render(
        &mut self,
        out: &mut [f32],
        data: &SampleData,
        sample_rate: f32,
        pitch_scale: f32,
        gain: f32,
    ) {
        let step = data.step_for(self.note, sample_rate) * pitch_scale as f64;
        let attack = 1.0 / (ATTACK_SECONDS * sample_rate);
        let release = 1.0 / (RELEASE_SECONDS * sample_rate);
        let amplitude = gain * self.velocity as f32 / 127.0;

        for o in out.iter_mut() {
            match self.state {
                VoiceState::Free => return,
                VoiceState::Releasing if self.attack_done => self.level -= release,
                VoiceState::Active | VoiceState::Releasing => {
                    self.level = (self.level + attack).min(1.0);
                    self.attack_done = self.level >= 1.0;
                }
            }
            if self.level <= 0.0 {
                self.free();
                return;
            }

            let Some(sample) = data.read(self.position) else {
                self.free();
                return;
            };
            *o += sample * self.level * amplitude;
            self.position += step;
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.velocity = 0;
        self.level = 0.0;
    }

    /// Held (not yet released) on `channel` playing `note`
    pub fn is_holding(&self, channel: u8, note: u8) -> bool {
        self.state == VoiceState::Active && self.channel == channel && self.note == note
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}

impl Default for SampleVoice {
    fn default() -> Self {
        Self::new()
    }
}
