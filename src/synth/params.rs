use crate::dsp::filter::FilterType;
use crate::dsp::lfo::LfoWave;
use crate::{NUM_ALGORITHMS, NUM_LFOS, NUM_OPERATORS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables of one operator slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct OperatorParams {
    pub ratio: f32,
    pub level: f32,
    pub feedback: f32,
}

/// Tunables of one LFO slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct LfoParams {
    pub rate: f32,
    pub depth: f32,
    pub wave: LfoWave,
}

/// The engine-wide parameter store: the single source of truth for every
/// tunable.
///
/// Written only through its setters, which clamp to the documented domains,
/// so a getter always returns the value the engine is actually using
/// (setting an operator ratio of 100 reads back as 32). Active voices are
/// pushed fresh values by the engine on every change; voices triggered later
/// read this store at trigger time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct EngineParams {
    operators: [OperatorParams; NUM_OPERATORS],
    algorithm: usize,

    filter_type: FilterType,
    filter_cutoff: f32,
    filter_resonance: f32,

    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    lfos: [LfoParams; NUM_LFOS],

    chorus_rate: f32,
    chorus_depth: f32,
    delay_time: f32,
    delay_feedback: f32,

    master_volume: f32,
}

impl Default for EngineParams {
    /// Power-on values. Hosts typically overwrite every one of these from
    /// their own parameter registry right after construction; standalone
    /// users start from [`crate::patch::Patch::init`] instead, which routes
    /// level onto a carrier.
    fn default() -> Self {
        Self {
            operators: [
                OperatorParams { ratio: 1.0, level: 0.5, feedback: 0.0 },
                OperatorParams { ratio: 2.0, level: 0.5, feedback: 0.0 },
                OperatorParams { ratio: 3.0, level: 0.5, feedback: 0.0 },
                OperatorParams { ratio: 1.0, level: 0.0, feedback: 0.0 },
                OperatorParams { ratio: 0.5, level: 0.0, feedback: 0.0 },
                OperatorParams { ratio: 0.25, level: 0.0, feedback: 0.0 },
            ],
            algorithm: 0,
            filter_type: FilterType::LowPass,
            filter_cutoff: 12_000.0,
            filter_resonance: 0.0,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            lfos: [
                LfoParams { rate: 1.0, depth: 0.0, wave: LfoWave::Sine },
                LfoParams { rate: 2.0, depth: 0.0, wave: LfoWave::Sine },
            ],
            chorus_rate: 1.0,
            chorus_depth: 0.3,
            delay_time: 0.25,
            delay_feedback: 0.3,
            master_volume: 0.7,
        }
    }
}

impl EngineParams {
    pub fn set_operator_ratio(&mut self, op: usize, ratio: f32) {
        if let Some(p) = self.operators.get_mut(op) {
            p.ratio = ratio.clamp(0.25, 32.0);
        }
    }

    pub fn set_operator_level(&mut self, op: usize, level: f32) {
        if let Some(p) = self.operators.get_mut(op) {
            p.level = level.clamp(0.0, 1.0);
        }
    }

    pub fn set_operator_feedback(&mut self, op: usize, feedback: f32) {
        if let Some(p) = self.operators.get_mut(op) {
            p.feedback = feedback.clamp(0.0, 1.0);
        }
    }

    /// Out-of-range selections fall back to the serial chain.
    pub fn set_algorithm(&mut self, algorithm: usize) {
        self.algorithm = if algorithm < NUM_ALGORITHMS { algorithm } else { 0 };
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.filter_cutoff = cutoff.clamp(20.0, 20_000.0);
    }

    pub fn set_filter_resonance(&mut self, resonance: f32) {
        self.filter_resonance = resonance.clamp(0.0, 1.0);
    }

    pub fn set_attack(&mut self, attack: f32) {
        self.attack = attack.clamp(0.001, 5.0);
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.clamp(0.001, 5.0);
    }

    pub fn set_sustain(&mut self, sustain: f32) {
        self.sustain = sustain.clamp(0.0, 1.0);
    }

    pub fn set_release(&mut self, release: f32) {
        self.release = release.clamp(0.01, 10.0);
    }

    pub fn set_lfo_rate(&mut self, lfo: usize, rate: f32) {
        if let Some(p) = self.lfos.get_mut(lfo) {
            p.rate = rate.clamp(0.01, 20.0);
        }
    }

    pub fn set_lfo_depth(&mut self, lfo: usize, depth: f32) {
        if let Some(p) = self.lfos.get_mut(lfo) {
            p.depth = depth.clamp(0.0, 1.0);
        }
    }

    pub fn set_lfo_wave(&mut self, lfo: usize, wave: LfoWave) {
        if let Some(p) = self.lfos.get_mut(lfo) {
            p.wave = wave;
        }
    }

    pub fn set_chorus_rate(&mut self, rate: f32) {
        self.chorus_rate = rate.clamp(0.1, 10.0);
    }

    pub fn set_chorus_depth(&mut self, depth: f32) {
        self.chorus_depth = depth.clamp(0.0, 1.0);
    }

    pub fn set_delay_time(&mut self, time: f32) {
        self.delay_time = time.clamp(0.001, 2.0);
    }

    pub fn set_delay_feedback(&mut self, feedback: f32) {
        self.delay_feedback = feedback.clamp(0.0, 0.9);
    }

    /// Stored as given; the outer gain staging is the caller's business.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume;
    }

    pub fn operator_ratio(&self, op: usize) -> f32 {
        self.operators.get(op).map_or(0.0, |p| p.ratio)
    }

    pub fn operator_level(&self, op: usize) -> f32 {
        self.operators.get(op).map_or(0.0, |p| p.level)
    }

    pub fn operator_feedback(&self, op: usize) -> f32 {
        self.operators.get(op).map_or(0.0, |p| p.feedback)
    }

    pub fn algorithm(&self) -> usize {
        self.algorithm
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn filter_cutoff(&self) -> f32 {
        self.filter_cutoff
    }

    pub fn filter_resonance(&self) -> f32 {
        self.filter_resonance
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

    pub fn release(&self) -> f32 {
        self.release
    }

    pub fn lfo_rate(&self, lfo: usize) -> f32 {
        self.lfos.get(lfo).map_or(0.0, |p| p.rate)
    }

    pub fn lfo_depth(&self, lfo: usize) -> f32 {
        self.lfos.get(lfo).map_or(0.0, |p| p.depth)
    }

    pub fn lfo_wave(&self, lfo: usize) -> LfoWave {
        self.lfos.get(lfo).map_or(LfoWave::Sine, |p| p.wave)
    }

    pub fn chorus_rate(&self) -> f32 {
        self.chorus_rate
    }

    pub fn chorus_depth(&self) -> f32 {
        self.chorus_depth
    }

    pub fn delay_time(&self) -> f32 {
        self.delay_time
    }

    pub fn delay_feedback(&self) -> f32 {
        self.delay_feedback
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }
}
