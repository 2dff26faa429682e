// Octave randomization post-processing.
//
// The final pass over a pitched pattern. Each note carries an authored
// octave chance (0..=127); one draw against that chance decides whether
// the note jumps by whole octaves, with the direction chosen uniformly
// and the magnitude drawn from 1..=max_octaves. Out-of-range results are
// clamped to MIDI bounds rather than rejected, so a jump near the edge
// of the keyboard lands on the edge instead of silencing the note.

use crate::compete::draw;
use crate::scale::PitchedEvent;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for the octave randomization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctaveRandomizer {
    /// Largest shift in octaves; 0 disables the pass entirely.
    pub max_octaves: u8,
}

impl Default for OctaveRandomizer {
    fn default() -> Self {
        OctaveRandomizer { max_octaves: 1 }
    }
}

impl OctaveRandomizer {
    /// Apply the pass in place. Notes with a zero octave chance consume
    /// no draws, so sparse usage stays cheap and the draw stream stays
    /// predictable.
    pub fn apply(&self, events: &mut [PitchedEvent], rng: &mut impl Rng) {
        if self.max_octaves == 0 {
            return;
        }
        for ev in events.iter_mut() {
            if ev.octave_chance == 0 {
                continue;
            }
            let r = draw(rng, 127);
            if r >= ev.octave_chance as u64 {
                continue;
            }
            let magnitude = if self.max_octaves == 1 {
                1i16
            } else {
                1 + draw(rng, self.max_octaves as u64) as i16
            };
            let up = draw(rng, 2) == 0;
            let shift = if up { 12 * magnitude } else { -12 * magnitude };
            ev.note = (ev.note as i16 + shift).clamp(0, 127) as u8;
            let delta = if up { magnitude as i8 } else { -(magnitude as i8) };
            ev.octave_offset = ev.octave_offset.saturating_add(delta);
            log::trace!("octave shift {delta:+} at {} -> note {}", ev.start, ev.note);
        }
    }
}
