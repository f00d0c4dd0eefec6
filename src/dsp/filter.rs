use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two-pole (12 dB/oct) resonant filter applied per voice, after the
/// operator mix.
///
/// Coefficients come from the analog-prototype low-pass/high-pass design
/// equations and are recomputed on every parameter or sample-rate change.
/// The recurrence runs in Direct Form II Transposed, which keeps the state
/// to two words and stays well-behaved when coefficients move under
/// modulation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}

impl FilterType {
    /// Map a stored integer selector onto a type. Anything unknown is
    /// treated as high-pass, matching a 0/1 switch.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            FilterType::LowPass
        } else {
            FilterType::HighPass
        }
    }
}

pub struct Filter {
    filter_type: FilterType,
    cutoff: f32,
    resonance: f32,
    sample_rate: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    z1: f32,
    z2: f32,
}

impl Filter {
    pub fn new() -> Self {
        let mut filter = Self {
            filter_type: FilterType::LowPass,
            cutoff: 12_000.0,
            resonance: 0.0,
            sample_rate: 48_000.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        };
        filter.calc_coefs();
        filter
    }

    pub fn set_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
        self.calc_coefs();
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff.clamp(20.0, 20_000.0);
        self.calc_coefs();
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 1.0);
        self.calc_coefs();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.calc_coefs();
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Run one sample through the transposed-form recurrence.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Zero the two state words without touching the coefficients.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    fn calc_coefs(&mut self) {
        // The cutoff must stay below Nyquist or the prototype warp blows up.
        let max_cutoff = self.sample_rate * 0.499;
        let fc = self.cutoff.clamp(20.0, max_cutoff);

        let omega = 2.0 * PI * fc / self.sample_rate;
        let sin_w = omega.sin();
        let cos_w = omega.cos();

        // resonance 0 -> Butterworth, resonance 1 -> Q of ~12
        let q = 0.707 + self.resonance * 11.293;
        let alpha = sin_w / (2.0 * q);

        let a0 = 1.0 + alpha;
        match self.filter_type {
            FilterType::LowPass => {
                self.b0 = (1.0 - cos_w) * 0.5;
                self.b1 = 1.0 - cos_w;
                self.b2 = (1.0 - cos_w) * 0.5;
            }
            FilterType::HighPass => {
                self.b0 = (1.0 + cos_w) * 0.5;
                self.b1 = -(1.0 + cos_w);
                self.b2 = (1.0 + cos_w) * 0.5;
            }
        }
        self.a1 = -2.0 * cos_w;
        self.a2 = 1.0 - alpha;

        self.b0 /= a0;
        self.b1 /= a0;
        self.b2 /= a0;
        self.a1 /= a0;
        self.a2 /= a0;
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}
