//! Post-mix effects owned by the engine.
//!
//! Both effects run on the summed voice signal, not per voice, and carry
//! their circular-buffer state across blocks until explicitly reset. Buffers
//! are sized at construction and on sample-rate changes; `process` never
//! allocates.

/// Modulated short delay, thickening the mix.
pub mod chorus;
/// Feedback echo.
pub mod delay;

pub use chorus::Chorus;
pub use delay::Delay;
