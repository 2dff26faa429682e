// Stepweave Pattern Generator
//
// Deterministic step-sequencer pattern generation for Stepweave synth
// presets. Given a declarative set of rhythm layers — catalog beat
// divisions and Euclidean onset grids, each with a 0..=127 probability
// weight — the generator resolves which layer sounds at every
// subdivision of one bar, assigns pitches from a scale using
// beat-strength stability, and runs a final octave randomization pass.
// The resolved, pitched events are the payload the preset assembly layer
// serializes into a preset; file formats and bank bookkeeping live
// outside this crate.
//
// Architecture:
// - time.rs: exact rational bar positions (collision equality is exact,
//   never tolerance-based)
// - division.rs: beat division catalog (straight, triplet, dotted)
// - euclid.rs: maximally even Euclidean onset generator
// - compete.rs: probability competition resolver — winner draws,
//   duration ownership, and lost-probability inheritance under the
//   127 budget
// - scale.rs: scale tables, strength pattern, note stability mapping
// - octave.rs: octave randomization post-processing
// - generate.rs: per-instrument pipeline from config to pitched events
// - error.rs: configuration error kinds
//
// Generation is pure and synchronous: every randomized step draws from a
// caller-supplied generator, so a pattern is reproducible given its seed
// and independent presets can be generated in parallel with no shared
// mutable state.

pub mod compete;
pub mod division;
pub mod error;
pub mod euclid;
pub mod generate;
pub mod octave;
pub mod scale;
pub mod time;

#[cfg(test)]
pub(crate) mod test_rng;
