use std::f32::consts::{PI, TAU};

/*
FM operator
===========

A single phase-modulated sine source. Six of these form one voice; the
selected algorithm decides which operators feed their output into which other
operators' phase, and which are summed into the audible signal.

The phase accumulator runs in [0, 1) and is converted to radians only at
evaluation time. Self-feedback and the external modulator input are both
added in radians on top of the accumulator:

    total = phase * 2pi + feedback * last_output * 5.0 + modulator_input

The 5.0 feedback scale here, and the matching 5.0 modulation scale the voice
applies when summing modulator outputs, set the usable FM brightness range.
Both are fixed design constants and must not drift.
*/

/// Scale applied to an operator's output before it phase-modulates another.
pub const MOD_SCALE: f32 = 5.0;

/// Scale applied to the operator's own previous output in the feedback path.
const FEEDBACK_SCALE: f32 = 5.0;

pub struct Operator {
    ratio: f32,
    level: f32,
    feedback: f32,
    detune_cents: f32,

    phase: f32,
    increment: f32,
    output: f32,
    feedback_sample: f32,
    modulator_input: f32,
}

impl Operator {
    pub fn new() -> Self {
        Self {
            ratio: 1.0,
            level: 0.5,
            feedback: 0.0,
            detune_cents: 0.0,
            phase: 0.0,
            increment: 0.0,
            output: 0.0,
            feedback_sample: 0.0,
            modulator_input: 0.0,
        }
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.clamp(0.25, 32.0);
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    pub fn set_detune(&mut self, cents: f32) {
        self.detune_cents = cents.clamp(-100.0, 100.0);
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Recompute the per-sample phase increment for a new base frequency.
    ///
    /// The operator runs at `ratio * base_freq`, shifted by the detune in
    /// cents. Callers invoke this whenever the note frequency or the vibrato
    /// modulation changes, which in practice is every sample.
    pub fn set_frequency(&mut self, base_freq: f32, sample_rate: f32) {
        self.increment =
            self.ratio * base_freq * 2.0_f32.powf(self.detune_cents / 1200.0) / sample_rate;
    }

    /// Phase offset in radians added on the next `process` call.
    pub fn set_modulator_input(&mut self, modulation: f32) {
        self.modulator_input = modulation;
    }

    /// Advance one sample and return the operator output.
    ///
    /// The output is also stored as the feedback sample for the next call.
    pub fn process(&mut self) -> f32 {
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        if self.phase < 0.0 {
            self.phase += 1.0;
        }

        let feedback = self.feedback * self.feedback_sample * FEEDBACK_SCALE;
        let total_phase = self.phase * TAU + feedback + self.modulator_input;

        self.output = self.level * fast_sin(total_phase);
        self.feedback_sample = self.output;
        self.output
    }

    /// Last value produced by `process`.
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Current accumulator position in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Clear all runtime state. Tuning parameters are left untouched.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.output = 0.0;
        self.feedback_sample = 0.0;
        self.modulator_input = 0.0;
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::new()
    }
}

/// Bhaskara I sine approximation, reduced to the full circle.
///
/// Odd-symmetric and continuous across the wrap, with a worst-case error of
/// about 2e-3 against the library sine. One rational evaluation per sample
/// keeps the hot operator loop free of libm calls.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    let mut x = x % TAU;
    if x < 0.0 {
        x += TAU;
    }

    let mut sign = 1.0;
    if x > PI {
        x -= PI;
        sign = -1.0;
    }

    // sin(x) ~ 16x(pi - x) / (5pi^2 - 4x(pi - x)) on [0, pi]
    let t = x * (PI - x);
    sign * (16.0 * t) / (5.0 * PI * PI - 4.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn increment_matches_ratio_times_frequency() {
        let mut op = Operator::new();
        for &ratio in &[0.25_f32, 0.5, 1.0, 2.0, 7.0, 32.0] {
            for &freq in &[27.5_f32, 110.0, 440.0, 1_760.0] {
                op.set_ratio(ratio);
                op.set_frequency(freq, SAMPLE_RATE);
                op.process();
                let expected = ratio * freq / SAMPLE_RATE;
                assert!(
                    (op.phase() - expected).abs() < 1e-6,
                    "ratio {ratio} freq {freq}: expected increment {expected}, got {}",
                    op.phase()
                );
                op.reset();
            }
        }
    }

    #[test]
    fn phase_stays_in_unit_range() {
        let mut op = Operator::new();
        op.set_ratio(32.0);
        op.set_frequency(1_000.0, SAMPLE_RATE);
        for _ in 0..20_000 {
            op.process();
            assert!(
                (0.0..1.0).contains(&op.phase()),
                "phase left [0, 1): {}",
                op.phase()
            );
        }
    }

    #[test]
    fn ratio_clamped_to_domain() {
        let mut op = Operator::new();
        op.set_ratio(100.0);
        assert_eq!(op.ratio(), 32.0);
        op.set_ratio(0.0);
        assert_eq!(op.ratio(), 0.25);
    }

    #[test]
    fn level_scales_output() {
        let mut quiet = Operator::new();
        let mut loud = Operator::new();
        quiet.set_level(0.25);
        loud.set_level(1.0);
        quiet.set_frequency(440.0, SAMPLE_RATE);
        loud.set_frequency(440.0, SAMPLE_RATE);

        for _ in 0..64 {
            let q = quiet.process();
            let l = loud.process();
            assert!((q - 0.25 * l).abs() < 1e-6);
        }
    }

    #[test]
    fn feedback_changes_the_waveform() {
        let mut clean = Operator::new();
        let mut driven = Operator::new();
        clean.set_level(1.0);
        driven.set_level(1.0);
        driven.set_feedback(0.8);
        clean.set_frequency(440.0, SAMPLE_RATE);
        driven.set_frequency(440.0, SAMPLE_RATE);

        let mut diverged = false;
        for _ in 0..256 {
            let c = clean.process();
            let d = driven.process();
            if (c - d).abs() > 1e-3 {
                diverged = true;
            }
        }
        assert!(diverged, "feedback should bend the sine away from clean");
    }

    #[test]
    fn reset_clears_runtime_state_only() {
        let mut op = Operator::new();
        op.set_ratio(3.0);
        op.set_frequency(440.0, SAMPLE_RATE);
        op.set_modulator_input(1.0);
        for _ in 0..100 {
            op.process();
        }

        op.reset();
        assert_eq!(op.phase(), 0.0);
        assert_eq!(op.output(), 0.0);
        assert_eq!(op.ratio(), 3.0, "tuning must survive reset");
    }

    #[test]
    fn fast_sin_is_odd_and_accurate() {
        let mut worst = 0.0f32;
        let mut x = -10.0f32;
        while x < 10.0 {
            let err = (fast_sin(x) - x.sin()).abs();
            worst = worst.max(err);
            assert!(
                (fast_sin(-x) + fast_sin(x)).abs() < 1e-5,
                "odd symmetry broken at {x}"
            );
            x += 0.01;
        }
        assert!(worst < 2.5e-3, "approximation error too large: {worst}");
    }

    #[test]
    fn fast_sin_continuous_at_wrap() {
        let eps = 1e-4;
        let below = fast_sin(TAU - eps);
        let above = fast_sin(TAU + eps);
        assert!((below - above).abs() < 1e-3);
    }
}
