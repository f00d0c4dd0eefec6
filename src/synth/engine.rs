use crate::dsp::algorithm;
use crate::dsp::filter::FilterType;
use crate::dsp::lfo::LfoWave;
use crate::fx::{Chorus, Delay};
use crate::synth::params::EngineParams;
use crate::synth::voice::Voice;
use crate::{NUM_LFOS, NUM_OPERATORS, NUM_VOICES};

/// Headroom scale applied to the summed voice mix before the effects chain.
const MIX_SCALE: f32 = 0.5;

/// The synthesizer: a fixed pool of sixteen voices, the parameter store,
/// and the shared chorus -> delay chain.
///
/// `process` is written for a hard real-time callback: no allocation, no
/// locking, no error paths. Note events and parameter setters may come from
/// a control thread, but the caller must serialize them against `process`,
/// usually by funneling them through a ring buffer drained at the top of
/// each block; see [`crate::synth::message`].
pub struct FmEngine {
    sample_rate: f32,
    params: EngineParams,
    // Fixed pool, allocated once; slots are recycled, never resized.
    voices: Vec<Voice>,
    chorus: Chorus,
    delay: Delay,
    voice_age: u64,
}

impl FmEngine {
    pub fn new(sample_rate: f32) -> Self {
        let params = EngineParams::default();
        let voices = (0..NUM_VOICES).map(|_| Voice::new(sample_rate)).collect();

        let mut chorus = Chorus::new(sample_rate);
        chorus.set_rate(params.chorus_rate());
        chorus.set_depth(params.chorus_depth());

        let mut delay = Delay::new(sample_rate);
        delay.set_time(params.delay_time());
        delay.set_feedback(params.delay_feedback());

        Self {
            sample_rate,
            params,
            voices,
            chorus,
            delay,
            voice_age: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Propagate a new sample rate to the effects and every active voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.chorus.set_sample_rate(sample_rate);
        self.delay.set_sample_rate(sample_rate);
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
            if voice.is_active() {
                voice.apply_params(&self.params);
            }
        }
    }

    /// Start a note on a free slot, stealing the oldest voice if the pool is
    /// full.
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let slot = self
            .find_free_voice()
            .unwrap_or_else(|| self.steal_voice());
        self.voice_age += 1;
        let age = self.voice_age;
        self.voices[slot].note_on(note, velocity, age, &self.params);
    }

    /// Release every active voice holding this note. Overlapping re-presses
    /// of the same note each get their own voice, and all of them release.
    pub fn note_off(&mut self, note: u8) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.release();
            }
        }
    }

    /// Release everything at once (MIDI all-notes-off).
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.release();
            }
        }
    }

    /// Bend every active voice holding `note` by the given cents. The bend
    /// is folded into the per-sample frequency update, so it composes with
    /// vibrato and persists until the voice ends.
    pub fn set_voice_bend(&mut self, note: u8, cents: f32) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.bend_cents = cents;
            }
        }
    }

    /// Render a block. The same mono signal is written to both channels; if
    /// the slices differ in length, the shorter one bounds the block.
    pub fn process(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        let frames = out_left.len().min(out_right.len());
        let algo = algorithm::algorithm(self.params.algorithm());
        let master = self.params.master_volume();

        for s in 0..frames {
            let mut mix = 0.0;
            for voice in &mut self.voices {
                if !voice.is_active() {
                    continue;
                }
                if voice.is_finished() {
                    voice.active = false;
                    continue;
                }
                mix += voice.process(algo, master);
            }

            let mix = mix * MIX_SCALE;
            let wet = self.delay.process(self.chorus.process(mix));
            out_left[s] = wet;
            out_right[s] = wet;
        }
    }

    fn find_free_voice(&self) -> Option<usize> {
        self.voices.iter().position(|v| !v.is_active())
    }

    /// Oldest voice loses; ties go to the lowest slot index.
    fn steal_voice(&self) -> usize {
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age())
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    // Parameter setters clamp into the store and push onto active voices;
    // out-of-range operator/LFO indices are silent no-ops.

    pub fn set_operator_ratio(&mut self, op: usize, ratio: f32) {
        if op >= NUM_OPERATORS {
            return;
        }
        self.params.set_operator_ratio(op, ratio);
        self.push_operator_params();
    }

    pub fn set_operator_level(&mut self, op: usize, level: f32) {
        if op >= NUM_OPERATORS {
            return;
        }
        self.params.set_operator_level(op, level);
        self.push_operator_params();
    }

    pub fn set_operator_feedback(&mut self, op: usize, feedback: f32) {
        if op >= NUM_OPERATORS {
            return;
        }
        self.params.set_operator_feedback(op, feedback);
        self.push_operator_params();
    }

    /// The algorithm is read per block in `process`; nothing to push.
    pub fn set_algorithm(&mut self, index: usize) {
        self.params.set_algorithm(index);
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.params.set_filter_type(filter_type);
        for voice in self.active_voices() {
            voice.filter.set_type(filter_type);
        }
    }

    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.params.set_filter_cutoff(cutoff);
        let cutoff = self.params.filter_cutoff();
        for voice in self.active_voices() {
            voice.filter.set_cutoff(cutoff);
            voice.base_cutoff = cutoff;
        }
    }

    pub fn set_filter_resonance(&mut self, resonance: f32) {
        self.params.set_filter_resonance(resonance);
        let resonance = self.params.filter_resonance();
        for voice in self.active_voices() {
            voice.filter.set_resonance(resonance);
        }
    }

    pub fn set_attack(&mut self, attack: f32) {
        self.params.set_attack(attack);
        let attack = self.params.attack();
        for voice in self.active_voices() {
            voice.envelope.set_attack(attack);
        }
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.params.set_decay(decay);
        let decay = self.params.decay();
        for voice in self.active_voices() {
            voice.envelope.set_decay(decay);
        }
    }

    pub fn set_sustain(&mut self, sustain: f32) {
        self.params.set_sustain(sustain);
        let sustain = self.params.sustain();
        for voice in self.active_voices() {
            voice.envelope.set_sustain(sustain);
        }
    }

    pub fn set_release(&mut self, release: f32) {
        self.params.set_release(release);
        let release = self.params.release();
        for voice in self.active_voices() {
            voice.envelope.set_release(release);
        }
    }

    pub fn set_lfo_rate(&mut self, lfo: usize, rate: f32) {
        if lfo >= NUM_LFOS {
            return;
        }
        self.params.set_lfo_rate(lfo, rate);
        let rate = self.params.lfo_rate(lfo);
        for voice in self.active_voices() {
            voice.lfos[lfo].set_rate(rate);
        }
    }

    pub fn set_lfo_depth(&mut self, lfo: usize, depth: f32) {
        if lfo >= NUM_LFOS {
            return;
        }
        self.params.set_lfo_depth(lfo, depth);
        let depth = self.params.lfo_depth(lfo);
        for voice in self.active_voices() {
            voice.lfos[lfo].set_depth(depth);
        }
    }

    pub fn set_lfo_wave(&mut self, lfo: usize, wave: LfoWave) {
        if lfo >= NUM_LFOS {
            return;
        }
        self.params.set_lfo_wave(lfo, wave);
        for voice in self.active_voices() {
            voice.lfos[lfo].set_wave(wave);
        }
    }

    pub fn set_chorus_rate(&mut self, rate: f32) {
        self.params.set_chorus_rate(rate);
        self.chorus.set_rate(self.params.chorus_rate());
    }

    pub fn set_chorus_depth(&mut self, depth: f32) {
        self.params.set_chorus_depth(depth);
        self.chorus.set_depth(self.params.chorus_depth());
    }

    pub fn set_delay_time(&mut self, time: f32) {
        self.params.set_delay_time(time);
        self.delay.set_time(self.params.delay_time());
    }

    pub fn set_delay_feedback(&mut self, feedback: f32) {
        self.params.set_delay_feedback(feedback);
        self.delay.set_feedback(self.params.delay_feedback());
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.params.set_master_volume(volume);
    }

    // Getters return the clamped, stored values.

    pub fn operator_ratio(&self, op: usize) -> f32 {
        self.params.operator_ratio(op)
    }

    pub fn operator_level(&self, op: usize) -> f32 {
        self.params.operator_level(op)
    }

    pub fn operator_feedback(&self, op: usize) -> f32 {
        self.params.operator_feedback(op)
    }

    pub fn algorithm(&self) -> usize {
        self.params.algorithm()
    }

    pub fn filter_type(&self) -> FilterType {
        self.params.filter_type()
    }

    pub fn filter_cutoff(&self) -> f32 {
        self.params.filter_cutoff()
    }

    pub fn filter_resonance(&self) -> f32 {
        self.params.filter_resonance()
    }

    pub fn attack(&self) -> f32 {
        self.params.attack()
    }

    pub fn decay(&self) -> f32 {
        self.params.decay()
    }

    pub fn sustain(&self) -> f32 {
        self.params.sustain()
    }

    pub fn release(&self) -> f32 {
        self.params.release()
    }

    pub fn lfo_rate(&self, lfo: usize) -> f32 {
        self.params.lfo_rate(lfo)
    }

    pub fn lfo_depth(&self, lfo: usize) -> f32 {
        self.params.lfo_depth(lfo)
    }

    pub fn lfo_wave(&self, lfo: usize) -> LfoWave {
        self.params.lfo_wave(lfo)
    }

    pub fn chorus_rate(&self) -> f32 {
        self.params.chorus_rate()
    }

    pub fn chorus_depth(&self) -> f32 {
        self.params.chorus_depth()
    }

    pub fn delay_time(&self) -> f32 {
        self.params.delay_time()
    }

    pub fn delay_feedback(&self) -> f32 {
        self.params.delay_feedback()
    }

    pub fn master_volume(&self) -> f32 {
        self.params.master_volume()
    }

    /// The full parameter snapshot, e.g. for preset capture.
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Per-slot (active, note, envelope level) view for meters and tests.
    pub fn voice_states(&self) -> [(bool, u8, f32); NUM_VOICES] {
        let mut states = [(false, 0u8, 0.0f32); NUM_VOICES];
        for (state, voice) in states.iter_mut().zip(&self.voices) {
            *state = (voice.is_active(), voice.note(), voice.envelope_level());
        }
        states
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    fn active_voices(&mut self) -> impl Iterator<Item = &mut Voice> + '_ {
        self.voices.iter_mut().filter(|v| v.is_active())
    }

    fn push_operator_params(&mut self) {
        // Operator changes also move the derived phase increments, so the
        // whole group is re-applied, the way a ratio change retunes a chord
        // that is already sounding.
        let params = &self.params;
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.apply_operator_params(params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn render(engine: &mut FmEngine, frames: usize) -> Vec<f32> {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        engine.process(&mut left, &mut right);
        left
    }

    #[test]
    fn silent_until_first_note() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        let out = render(&mut engine, 512);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    /// Route level onto carriers; the raw power-on values leave every
    /// carrier muted until a host or patch configures them.
    fn audible(engine: &mut FmEngine) {
        engine.set_algorithm(2);
    }

    #[test]
    fn note_on_produces_audio_on_both_channels() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        audible(&mut engine);
        engine.note_on(69, 1.0);

        let mut left = vec![0.0; 2_048];
        let mut right = vec![0.0; 2_048];
        engine.process(&mut left, &mut right);

        let peak = left.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak > 0.01, "expected audible output, peak {peak}");
        assert_eq!(left, right, "core output is dual mono");
    }

    #[test]
    fn voice_slot_is_recycled_after_release() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        engine.set_release(0.01);
        engine.note_on(60, 1.0);
        assert_eq!(engine.active_voice_count(), 1);

        engine.note_off(60);
        // 0.1 s, far past the 10 ms release.
        render(&mut engine, 4_800);
        assert_eq!(engine.active_voice_count(), 0);
    }

    #[test]
    fn seventeenth_note_steals_the_oldest_slot() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        for note in 40..56 {
            engine.note_on(note, 1.0);
        }
        assert_eq!(engine.active_voice_count(), NUM_VOICES);

        engine.note_on(100, 1.0);
        assert_eq!(engine.active_voice_count(), NUM_VOICES);

        let states = engine.voice_states();
        assert!(
            states.iter().all(|&(_, note, _)| note != 40),
            "oldest note (40) should have been evicted"
        );
        // The first slot held the oldest voice; it now carries the new note
        // with freshly reset state.
        assert_eq!(states[0].1, 100);
        assert_eq!(states[0].2, 0.0, "stolen voice restarts its envelope");
    }

    #[test]
    fn duplicate_notes_all_release_together() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        engine.note_on(64, 1.0);
        engine.note_on(64, 1.0);
        assert_eq!(engine.active_voice_count(), 2);

        engine.set_release(0.01);
        engine.note_off(64);
        render(&mut engine, 4_800);
        assert_eq!(engine.active_voice_count(), 0);
    }

    #[test]
    fn all_notes_off_drains_the_pool() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        engine.set_release(0.01);
        for note in 60..70 {
            engine.note_on(note, 1.0);
        }
        engine.all_notes_off();
        render(&mut engine, 4_800);
        assert_eq!(engine.active_voice_count(), 0);
    }

    #[test]
    fn setters_round_trip_clamped_values() {
        let mut engine = FmEngine::new(SAMPLE_RATE);

        engine.set_operator_ratio(0, 100.0);
        assert_eq!(engine.operator_ratio(0), 32.0);

        engine.set_filter_cutoff(50_000.0);
        assert_eq!(engine.filter_cutoff(), 20_000.0);

        engine.set_delay_feedback(3.0);
        assert_eq!(engine.delay_feedback(), 0.9);

        engine.set_algorithm(12);
        assert_eq!(engine.algorithm(), 0);

        engine.set_lfo_rate(1, 500.0);
        assert_eq!(engine.lfo_rate(1), 20.0);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        engine.note_on(60, 1.0);

        engine.set_operator_ratio(6, 8.0);
        engine.set_lfo_depth(2, 1.0);
        assert_eq!(engine.operator_ratio(6), 0.0);
        assert_eq!(engine.lfo_depth(2), 0.0);

        // And the engine keeps rendering normally.
        let out = render(&mut engine, 256);
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn parameter_changes_reach_sounding_voices() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        audible(&mut engine);
        engine.note_on(69, 1.0);
        render(&mut engine, 1_024);

        // Mute every operator mid-note: the voice body must go quiet within
        // a block even though no note event occurred.
        for op in 0..NUM_OPERATORS {
            engine.set_operator_level(op, 0.0);
        }
        render(&mut engine, 96_000); // let the chorus/delay tails die out
        let out = render(&mut engine, 1_024);
        let peak = out.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak < 1e-3, "muted operators should silence the mix, peak {peak}");
    }

    #[test]
    fn mismatched_buffer_lengths_use_the_shorter() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        engine.note_on(60, 1.0);

        let mut left = vec![0.0; 128];
        let mut right = vec![0.0; 64];
        engine.process(&mut left, &mut right);
        assert!(left[64..].iter().all(|&s| s == 0.0), "frames past the shorter buffer stay untouched");
    }

    #[test]
    fn sustained_polyphony_stays_finite() {
        let mut engine = FmEngine::new(SAMPLE_RATE);
        engine.set_filter_resonance(1.0);
        for op in 0..NUM_OPERATORS {
            engine.set_operator_feedback(op, 1.0);
            engine.set_operator_level(op, 1.0);
        }
        engine.set_algorithm(7);
        for note in 48..64 {
            engine.note_on(note, 1.0);
        }

        for _ in 0..20 {
            let out = render(&mut engine, 512);
            assert!(out.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn sample_rate_change_keeps_running_voices_consistent() {
        let mut engine = FmEngine::new(44_100.0);
        audible(&mut engine);
        engine.note_on(69, 1.0);
        render(&mut engine, 512);

        engine.set_sample_rate(96_000.0);
        assert_eq!(engine.sample_rate(), 96_000.0);
        let out = render(&mut engine, 2_048);
        assert!(out.iter().all(|s| s.is_finite()));
        let peak = out.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak > 0.0, "voice should keep sounding after the switch");
    }
}
