use crate::dsp::algorithm::AlgorithmDef;
use crate::dsp::envelope::Envelope;
use crate::dsp::filter::Filter;
use crate::dsp::lfo::Lfo;
use crate::dsp::operator::{Operator, MOD_SCALE};
use crate::io::converter::midi_note_to_freq;
use crate::synth::params::EngineParams;
use crate::{NUM_LFOS, NUM_OPERATORS};

/// Pitch swing of LFO 1 at full depth: +/- 5 % of the note frequency.
const VIBRATO_RANGE: f32 = 0.05;

/// Cutoff swing of LFO 2 at full depth: +/- 50 % of the base cutoff.
const CUTOFF_MOD_RANGE: f32 = 0.5;

/// One sounding note: six operators, an amplitude envelope, a filter, and
/// two LFOs.
///
/// Voices live in the engine's fixed pool. A slot is claimed by `note_on`,
/// plays until its envelope returns to Idle, and is then reused; no state is
/// ever freed. The `age` stamp orders slots for oldest-first stealing.
pub struct Voice {
    pub(crate) active: bool,
    pub(crate) note: u8,
    pub(crate) velocity: f32,
    pub(crate) frequency: f32,
    pub(crate) bend_cents: f32,
    pub(crate) age: u64,
    pub(crate) sample_rate: f32,
    pub(crate) base_cutoff: f32,

    pub(crate) operators: [Operator; NUM_OPERATORS],
    pub(crate) envelope: Envelope,
    pub(crate) filter: Filter,
    pub(crate) lfos: [Lfo; NUM_LFOS],
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            active: false,
            note: 0,
            velocity: 0.0,
            frequency: 0.0,
            bend_cents: 0.0,
            age: 0,
            sample_rate,
            base_cutoff: 12_000.0,
            operators: Default::default(),
            envelope: Envelope::new(),
            filter: Filter::new(),
            lfos: Default::default(),
        }
    }

    /// Claim this slot for a note: reset every sub-component, apply the
    /// current parameter snapshot, and start the envelope.
    pub fn note_on(&mut self, note: u8, velocity: f32, age: u64, params: &EngineParams) {
        self.active = true;
        self.note = note;
        self.velocity = velocity.clamp(0.0, 1.0);
        self.frequency = midi_note_to_freq(note);
        self.bend_cents = 0.0;
        self.age = age;

        for op in &mut self.operators {
            op.reset();
        }
        self.envelope.reset();
        self.filter.reset();
        for lfo in &mut self.lfos {
            lfo.reset();
        }

        self.apply_params(params);
        self.envelope.trigger();
    }

    /// Start the envelope release; the voice frees itself once it reaches
    /// Idle.
    pub fn release(&mut self) {
        self.envelope.release();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    /// True once the envelope has fully decayed; the engine then recycles
    /// the slot.
    pub fn is_finished(&self) -> bool {
        !self.envelope.is_active()
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Push the full parameter snapshot onto every sub-component.
    pub fn apply_params(&mut self, params: &EngineParams) {
        self.apply_operator_params(params);

        self.envelope.set_sample_rate(self.sample_rate);
        self.envelope.set_attack(params.attack());
        self.envelope.set_decay(params.decay());
        self.envelope.set_sustain(params.sustain());
        self.envelope.set_release(params.release());

        self.filter.set_sample_rate(self.sample_rate);
        self.filter.set_type(params.filter_type());
        self.filter.set_cutoff(params.filter_cutoff());
        self.filter.set_resonance(params.filter_resonance());
        self.base_cutoff = params.filter_cutoff();

        for (i, lfo) in self.lfos.iter_mut().enumerate() {
            lfo.set_sample_rate(self.sample_rate);
            lfo.set_rate(params.lfo_rate(i));
            lfo.set_depth(params.lfo_depth(i));
            lfo.set_wave(params.lfo_wave(i));
        }
    }

    /// Re-apply just the operator tunables (and the increments they derive).
    pub(crate) fn apply_operator_params(&mut self, params: &EngineParams) {
        for (i, op) in self.operators.iter_mut().enumerate() {
            op.set_ratio(params.operator_ratio(i));
            op.set_level(params.operator_level(i));
            op.set_feedback(params.operator_feedback(i));
            op.set_frequency(self.frequency, self.sample_rate);
        }
    }

    /// Render one sample of the complete voice pipeline.
    pub fn process(&mut self, algo: &AlgorithmDef, master_volume: f32) -> f32 {
        // Control-rate modulators first.
        for lfo in &mut self.lfos {
            lfo.process();
        }
        let vibrato = self.lfos[0].output();
        let cutoff_mod = self.lfos[1].output();

        let bend = 2.0_f32.powf(self.bend_cents / 1200.0);
        let freq = self.frequency * bend * (1.0 + vibrato * VIBRATO_RANGE);
        for op in &mut self.operators {
            op.set_frequency(freq, self.sample_rate);
        }

        let amp = self.envelope.process() * self.velocity * master_volume;

        // Operators run modulators-before-consumers, so each consumer reads
        // the outputs its sources produced earlier in this same sample.
        let mut outputs = [0.0f32; NUM_OPERATORS];
        for &op_index in &algo.order {
            let mut modulation = 0.0;
            for &source in algo.modulators[op_index] {
                modulation += outputs[source] * MOD_SCALE;
            }
            let op = &mut self.operators[op_index];
            op.set_modulator_input(modulation);
            outputs[op_index] = op.process();
        }

        let mut sample = 0.0;
        let mut carriers = 0;
        for (op_index, &is_carrier) in algo.carriers.iter().enumerate() {
            if is_carrier {
                sample += outputs[op_index];
                carriers += 1;
            }
        }
        // Keep perceived loudness comparable across topologies with
        // different carrier counts.
        if carriers > 1 {
            sample /= (carriers as f32).sqrt();
        }

        sample *= amp;

        let cutoff = (self.base_cutoff * (1.0 + cutoff_mod * CUTOFF_MOD_RANGE))
            .clamp(20.0, 20_000.0);
        self.filter.set_cutoff(cutoff);
        self.filter.process(sample)
    }
}
