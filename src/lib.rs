pub mod dsp;
pub mod fx;
pub mod io;
pub mod patch;
pub mod synth;

pub use synth::engine::FmEngine;
pub use synth::params::EngineParams;

/// Conventional upper bound callers use when sizing render scratch buffers;
/// `FmEngine::process` itself accepts any block length.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Operators per voice.
pub const NUM_OPERATORS: usize = 6;

/// Fixed polyphony: the voice pool is created once and never resized.
pub const NUM_VOICES: usize = 16;

/// Control-rate modulators per voice (vibrato and filter cutoff).
pub const NUM_LFOS: usize = 2;

/// Selectable modulation topologies.
pub const NUM_ALGORITHMS: usize = 8;
