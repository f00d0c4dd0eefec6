/*
ADSR envelope
=============

A per-sample state machine:

    Idle -> Attack -> Decay -> Sustain -> Release -> Idle

Attack is a linear ramp toward 1.0; decay and release are exponential,
multiplying the level by a coefficient chosen so the stage covers ~60 dB
(a factor of 0.001) over its configured time:

    coefficient = 0.001 ^ (1 / (time_seconds * sample_rate))

Decay is clamped at the sustain level on the way down; release snaps to zero
once the level falls below 1e-3 and the envelope returns to Idle. `trigger`
re-enters Attack from the *current* level, so fast re-presses ramp up from
where they are instead of punching a gap to silence.

Coefficients are recomputed whenever a time, the sustain level, or the
sample rate changes. Recomputing never touches `level`, so a running stage
continues from its exact position.
*/

/// Threshold below which a releasing envelope snaps to zero and goes Idle.
const RELEASE_FLOOR: f32 = 1e-3;

/// Slack when deciding the decay stage has reached the sustain level.
const SUSTAIN_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    attack_rate: f32,
    decay_coef: f32,
    release_coef: f32,

    level: f32,
    stage: EnvelopeStage,
    sample_rate: f32,
}

impl Envelope {
    pub fn new() -> Self {
        let mut env = Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            attack_rate: 0.0,
            decay_coef: 0.0,
            release_coef: 0.0,
            level: 0.0,
            stage: EnvelopeStage::Idle,
            sample_rate: 48_000.0,
        };
        env.calc_coefs();
        env
    }

    pub fn set_attack(&mut self, attack: f32) {
        self.attack = attack.clamp(0.001, 5.0);
        self.calc_coefs();
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.clamp(0.001, 5.0);
        self.calc_coefs();
    }

    pub fn set_sustain(&mut self, sustain: f32) {
        self.sustain = sustain.clamp(0.0, 1.0);
        self.calc_coefs();
    }

    pub fn set_release(&mut self, release: f32) {
        self.release = release.clamp(0.01, 10.0);
        self.calc_coefs();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.calc_coefs();
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn release_time(&self) -> f32 {
        self.release
    }

    /// Enter Attack from the current level, whatever the current stage.
    pub fn trigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Enter Release from the current level. No-op while Idle.
    pub fn release(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Advance one sample and return the new level.
    pub fn process(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
            EnvelopeStage::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level *= self.decay_coef;
                if self.level <= self.sustain + SUSTAIN_EPSILON {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                // Tracks live changes to the sustain parameter.
                self.level = self.sustain;
            }
            EnvelopeStage::Release => {
                self.level *= self.release_coef;
                if self.level <= RELEASE_FLOOR {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Back to Idle at zero level. Parameters are untouched.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    fn calc_coefs(&mut self) {
        // Degenerate stage lengths become an immediate jump, never a
        // non-finite coefficient.
        let attack_samples = self.attack * self.sample_rate;
        self.attack_rate = if attack_samples > 0.0 {
            1.0 / attack_samples
        } else {
            1.0
        };

        let decay_samples = self.decay * self.sample_rate;
        self.decay_coef = if decay_samples > 0.0 {
            0.001_f32.powf(1.0 / decay_samples)
        } else {
            0.0
        };

        let release_samples = self.release * self.sample_rate;
        self.release_coef = if release_samples > 0.0 {
            0.001_f32.powf(1.0 / release_samples)
        } else {
            0.0
        };
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
