//! Preset data model: named snapshots of the engine's tunable surface.
//!
//! Patches only describe parameter values; applying one walks the engine's
//! clamping setters, so a hand-edited or deserialized patch can never push
//! an out-of-domain value into the audio path. File parsing and storage
//! belong to the surrounding application, which is why the serde derives are
//! feature-gated and nothing here touches the filesystem.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::FilterType;
use crate::dsp::lfo::LfoWave;
use crate::synth::engine::FmEngine;
use crate::{NUM_LFOS, NUM_OPERATORS};

/// Broad sound category used by preset browsers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchCategory {
    Lead,
    Pad,
    Bass,
    Keys,
    Fx,
    Init,
    User,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct OperatorPatch {
    pub ratio: f32,
    pub level: f32,
    pub feedback: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct LfoPatch {
    pub rate: f32,
    pub depth: f32,
    pub wave: LfoWave,
}

/// A complete, named parameter snapshot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Patch {
    pub name: String,
    pub category: PatchCategory,

    pub operators: [OperatorPatch; NUM_OPERATORS],
    pub algorithm: usize,

    pub filter_type: FilterType,
    pub filter_cutoff: f32,
    pub filter_resonance: f32,

    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,

    pub lfos: [LfoPatch; NUM_LFOS],

    pub chorus_rate: f32,
    pub chorus_depth: f32,
    pub delay_time: f32,
    pub delay_feedback: f32,

    pub master_volume: f32,
}

impl Patch {
    /// Snapshot the engine's current parameter values.
    pub fn capture(name: &str, category: PatchCategory, engine: &FmEngine) -> Self {
        let mut operators = [OperatorPatch {
            ratio: 1.0,
            level: 0.0,
            feedback: 0.0,
        }; NUM_OPERATORS];
        for (i, op) in operators.iter_mut().enumerate() {
            op.ratio = engine.operator_ratio(i);
            op.level = engine.operator_level(i);
            op.feedback = engine.operator_feedback(i);
        }

        let mut lfos = [LfoPatch {
            rate: 1.0,
            depth: 0.0,
            wave: LfoWave::Sine,
        }; NUM_LFOS];
        for (i, lfo) in lfos.iter_mut().enumerate() {
            lfo.rate = engine.lfo_rate(i);
            lfo.depth = engine.lfo_depth(i);
            lfo.wave = engine.lfo_wave(i);
        }

        Self {
            name: name.to_string(),
            category,
            operators,
            algorithm: engine.algorithm(),
            filter_type: engine.filter_type(),
            filter_cutoff: engine.filter_cutoff(),
            filter_resonance: engine.filter_resonance(),
            attack: engine.attack(),
            decay: engine.decay(),
            sustain: engine.sustain(),
            release: engine.release(),
            lfos,
            chorus_rate: engine.chorus_rate(),
            chorus_depth: engine.chorus_depth(),
            delay_time: engine.delay_time(),
            delay_feedback: engine.delay_feedback(),
            master_volume: engine.master_volume(),
        }
    }

    /// Push every value through the engine's clamping setters. Voices
    /// already sounding pick the new values up immediately.
    pub fn apply(&self, engine: &mut FmEngine) {
        for (i, op) in self.operators.iter().enumerate() {
            engine.set_operator_ratio(i, op.ratio);
            engine.set_operator_level(i, op.level);
            engine.set_operator_feedback(i, op.feedback);
        }
        engine.set_algorithm(self.algorithm);

        engine.set_filter_type(self.filter_type);
        engine.set_filter_cutoff(self.filter_cutoff);
        engine.set_filter_resonance(self.filter_resonance);

        engine.set_attack(self.attack);
        engine.set_decay(self.decay);
        engine.set_sustain(self.sustain);
        engine.set_release(self.release);

        for (i, lfo) in self.lfos.iter().enumerate() {
            engine.set_lfo_rate(i, lfo.rate);
            engine.set_lfo_depth(i, lfo.depth);
            engine.set_lfo_wave(i, lfo.wave);
        }

        engine.set_chorus_rate(self.chorus_rate);
        engine.set_chorus_depth(self.chorus_depth);
        engine.set_delay_time(self.delay_time);
        engine.set_delay_feedback(self.delay_feedback);
        engine.set_master_volume(self.master_volume);
    }

    /// A plain two-operator electric-piano-ish starting point: operator 1
    /// modulating a bank of carriers, with only the first carrier open.
    pub fn init() -> Self {
        let mut patch = Self::capture("Init", PatchCategory::Init, &FmEngine::new(48_000.0));
        patch.algorithm = 2;
        patch.operators[0] = OperatorPatch { ratio: 1.0, level: 0.5, feedback: 0.0 };
        patch.operators[1] = OperatorPatch { ratio: 1.0, level: 0.8, feedback: 0.0 };
        for op in &mut patch.operators[2..] {
            op.level = 0.0;
        }
        patch
    }

    /// Built-in starting points, one per broad category.
    pub fn factory() -> Vec<Patch> {
        let mut presets = vec![Self::init()];

        let mut glass = Self::init();
        glass.name = "Glass Keys".to_string();
        glass.category = PatchCategory::Keys;
        glass.algorithm = 4;
        glass.operators[0] = OperatorPatch { ratio: 3.5, level: 0.45, feedback: 0.1 };
        glass.operators[1] = OperatorPatch { ratio: 1.0, level: 0.9, feedback: 0.0 };
        glass.operators[2] = OperatorPatch { ratio: 7.0, level: 0.25, feedback: 0.0 };
        glass.operators[3] = OperatorPatch { ratio: 2.0, level: 0.6, feedback: 0.0 };
        glass.operators[4] = OperatorPatch { ratio: 10.0, level: 0.15, feedback: 0.2 };
        glass.operators[5] = OperatorPatch { ratio: 1.0, level: 0.5, feedback: 0.0 };
        glass.attack = 0.002;
        glass.decay = 1.2;
        glass.sustain = 0.25;
        glass.release = 0.8;
        glass.chorus_depth = 0.5;
        presets.push(glass);

        let mut bass = Self::init();
        bass.name = "Solid Bass".to_string();
        bass.category = PatchCategory::Bass;
        bass.algorithm = 4;
        bass.operators[0] = OperatorPatch { ratio: 1.0, level: 0.7, feedback: 0.3 };
        bass.operators[1] = OperatorPatch { ratio: 1.0, level: 0.9, feedback: 0.0 };
        bass.operators[2] = OperatorPatch { ratio: 2.0, level: 0.0, feedback: 0.0 };
        bass.filter_cutoff = 2_500.0;
        bass.filter_resonance = 0.2;
        bass.attack = 0.001;
        bass.decay = 0.25;
        bass.sustain = 0.6;
        bass.release = 0.12;
        bass.delay_feedback = 0.0;
        bass.chorus_depth = 0.0;
        presets.push(bass);

        let mut pad = Self::init();
        pad.name = "Slow Pad".to_string();
        pad.category = PatchCategory::Pad;
        pad.algorithm = 5;
        pad.operators[0] = OperatorPatch { ratio: 1.0, level: 0.35, feedback: 0.0 };
        pad.operators[1] = OperatorPatch { ratio: 2.0, level: 0.3, feedback: 0.0 };
        pad.operators[2] = OperatorPatch { ratio: 0.5, level: 0.3, feedback: 0.0 };
        pad.operators[3] = OperatorPatch { ratio: 1.0, level: 0.8, feedback: 0.0 };
        pad.operators[4] = OperatorPatch { ratio: 1.01, level: 0.8, feedback: 0.0 };
        pad.operators[5] = OperatorPatch { ratio: 2.0, level: 0.5, feedback: 0.0 };
        pad.attack = 1.2;
        pad.decay = 1.0;
        pad.sustain = 0.8;
        pad.release = 2.5;
        pad.lfos[0] = LfoPatch { rate: 5.5, depth: 0.1, wave: LfoWave::Sine };
        pad.lfos[1] = LfoPatch { rate: 0.3, depth: 0.5, wave: LfoWave::Triangle };
        pad.filter_cutoff = 6_000.0;
        pad.chorus_depth = 0.7;
        pad.delay_time = 0.45;
        pad.delay_feedback = 0.45;
        presets.push(pad);

        presets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_round_trips_through_apply() {
        let mut source = FmEngine::new(48_000.0);
        source.set_algorithm(3);
        source.set_operator_ratio(2, 7.5);
        source.set_filter_cutoff(900.0);
        source.set_lfo_depth(0, 0.4);
        source.set_master_volume(0.5);

        let patch = Patch::capture("Snapshot", PatchCategory::User, &source);

        let mut target = FmEngine::new(48_000.0);
        patch.apply(&mut target);
        assert_eq!(target.algorithm(), 3);
        assert_eq!(target.operator_ratio(2), 7.5);
        assert_eq!(target.filter_cutoff(), 900.0);
        assert_eq!(target.lfo_depth(0), 0.4);
        assert_eq!(target.master_volume(), 0.5);
    }

    #[test]
    fn apply_clamps_out_of_domain_values() {
        let mut patch = Patch::init();
        patch.operators[0].ratio = 500.0;
        patch.delay_feedback = 4.0;
        patch.algorithm = 99;

        let mut engine = FmEngine::new(48_000.0);
        patch.apply(&mut engine);
        assert_eq!(engine.operator_ratio(0), 32.0);
        assert_eq!(engine.delay_feedback(), 0.9);
        assert_eq!(engine.algorithm(), 0);
    }

    #[test]
    fn factory_presets_have_unique_names_and_audible_carriers() {
        use crate::dsp::algorithm::algorithm;

        let presets = Patch::factory();
        assert!(presets.len() >= 3);

        for (i, a) in presets.iter().enumerate() {
            for b in presets.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
            }

            // Every preset must put level on at least one carrier, or it is
            // a silent patch.
            let def = algorithm(a.algorithm);
            let audible = (0..NUM_OPERATORS)
                .any(|op| def.carriers[op] && a.operators[op].level > 0.0);
            assert!(audible, "preset '{}' is inaudible", a.name);
        }
    }
}
