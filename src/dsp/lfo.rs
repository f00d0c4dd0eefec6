use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Control-rate oscillator.
///
/// Runs the same phase-accumulator math as an audio oscillator but in the
/// 0.01..20 Hz band, producing modulation signals instead of sound. Each
/// voice carries two: one for operator-frequency vibrato, one for filter
/// cutoff.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoWave {
    Sine,
    Saw,
    Square,
    Triangle,
}

impl LfoWave {
    /// Map a stored integer selector onto a waveform, clamping anything out
    /// of range to the last entry.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => LfoWave::Sine,
            1 => LfoWave::Saw,
            2 => LfoWave::Square,
            _ => LfoWave::Triangle,
        }
    }
}

pub struct Lfo {
    rate: f32,
    depth: f32,
    wave: LfoWave,

    phase: f32,
    increment: f32,
    output: f32,
    sample_rate: f32,
}

impl Lfo {
    pub fn new() -> Self {
        let mut lfo = Self {
            rate: 1.0,
            depth: 0.0,
            wave: LfoWave::Sine,
            phase: 0.0,
            increment: 0.0,
            output: 0.0,
            sample_rate: 48_000.0,
        };
        lfo.update_increment();
        lfo
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(0.01, 20.0);
        self.update_increment();
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    pub fn set_wave(&mut self, wave: LfoWave) {
        self.wave = wave;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn wave(&self) -> LfoWave {
        self.wave
    }

    /// Evaluate at the current phase, then advance. The first sample after a
    /// reset therefore reads phase zero.
    pub fn process(&mut self) -> f32 {
        self.output = match self.wave {
            LfoWave::Sine => (self.phase * TAU).sin(),
            LfoWave::Saw => 2.0 * self.phase - 1.0,
            LfoWave::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoWave::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        self.output * self.depth
    }

    /// Depth-scaled output, what modulation consumers read.
    pub fn output(&self) -> f32 {
        self.output * self.depth
    }

    /// Unscaled, phase-synchronized output in [-1, 1].
    pub fn raw_output(&self) -> f32 {
        self.output
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.output = 0.0;
    }

    fn update_increment(&mut self) {
        self.increment = self.rate / self.sample_rate;
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}
