// Scale tables, beat-strength pattern, and note stability mapping.
//
// Once the resolver has decided *when* notes sound, this module decides
// *what* they sound. Each scale degree carries a stability value (the
// root is the most stable, the fifth next, leading tones least), and each
// bar position carries a strength value from the strength pattern
// (downbeat strongest, offbeats weakest). A resolved onset takes the
// degree whose stability sits closest to the strength of its position —
// strong beats land on stable degrees, weak beats wander — with ties
// broken toward the root.
//
// The mapping is pure and stateless per event: no melodic memory, only
// the shared read-only scale and strength tables, which makes it safe to
// share across parallel generation runs.

use crate::compete::ResolvedEvent;
use crate::time::Ratio;
use serde::{Deserialize, Serialize};

/// A scale: ordered semitone offsets from the root, each with a
/// stability value used by the beat-strength mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    pub name: String,
    /// Semitone offsets from the root, ascending, starting at 0.
    pub intervals: Vec<u8>,
    /// Per-degree stability on the same 0..=7 scale the strength pattern
    /// uses; same length as `intervals`, root highest.
    pub stability: Vec<u8>,
}

impl ScaleDefinition {
    pub fn new(name: &str, intervals: Vec<u8>, stability: Vec<u8>) -> Self {
        assert!(!intervals.is_empty(), "scale must have at least one degree");
        assert_eq!(
            intervals.len(),
            stability.len(),
            "one stability value per scale degree"
        );
        ScaleDefinition {
            name: name.to_string(),
            intervals,
            stability,
        }
    }

    pub fn major() -> Self {
        ScaleDefinition::new("major", vec![0, 2, 4, 5, 7, 9, 11], vec![7, 2, 4, 3, 5, 2, 1])
    }

    pub fn natural_minor() -> Self {
        ScaleDefinition::new("minor", vec![0, 2, 3, 5, 7, 8, 10], vec![7, 2, 4, 3, 5, 2, 1])
    }

    pub fn dorian() -> Self {
        ScaleDefinition::new("dorian", vec![0, 2, 3, 5, 7, 9, 10], vec![7, 2, 4, 3, 5, 2, 1])
    }

    pub fn mixolydian() -> Self {
        ScaleDefinition::new(
            "mixolydian",
            vec![0, 2, 4, 5, 7, 9, 10],
            vec![7, 2, 4, 3, 5, 2, 1],
        )
    }

    pub fn minor_pentatonic() -> Self {
        ScaleDefinition::new("minor pentatonic", vec![0, 3, 5, 7, 10], vec![7, 4, 3, 5, 2])
    }

    /// The degree whose stability most closely matches `target`, ties
    /// broken toward the root (the lowest matching degree index).
    pub fn degree_for_strength(&self, target: u8) -> usize {
        let mut best = 0;
        let mut best_dist = self.stability[0].abs_diff(target);
        for (i, &s) in self.stability.iter().enumerate().skip(1) {
            let dist = s.abs_diff(target);
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }
}

/// Beat strength per bar position on a fixed 1/24 grid (the finest grid
/// that holds quarters, eighths, and their triplets exactly).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthPattern {
    slots: Vec<u8>,
}

impl StrengthPattern {
    pub fn new(slots: Vec<u8>) -> Self {
        assert!(!slots.is_empty(), "strength pattern must have at least one slot");
        StrengthPattern { slots }
    }

    /// The strength at a bar position: the value of the grid slot the
    /// position falls into. The lookup is exact rational arithmetic, so
    /// triplet positions land on their own slots.
    pub fn strength_at(&self, pos: Ratio) -> u8 {
        let len = self.slots.len() as i128;
        let slot = (pos.numer() as i128 * len / pos.denom() as i128).rem_euclid(len);
        self.slots[slot as usize]
    }
}

impl Default for StrengthPattern {
    /// 24 slots: downbeat 7, remaining quarters 5, eighths 3, everything
    /// between (sixteenths, triplet positions) 1.
    fn default() -> Self {
        let slots = (0..24)
            .map(|i| {
                if i == 0 {
                    7
                } else if i % 6 == 0 {
                    5
                } else if i % 3 == 0 {
                    3
                } else {
                    1
                }
            })
            .collect();
        StrengthPattern { slots }
    }
}

/// A fully determined note: the final unit handed to the preset writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchedEvent {
    pub start: Ratio,
    pub duration: Ratio,
    /// MIDI note number, 0..=127.
    pub note: u8,
    /// The winning layer's authored weight, serialized as the step's
    /// trigger chance.
    pub chance: u8,
    /// Layer that won the onset.
    pub layer: String,
    /// The strength value the degree choice targeted.
    pub strength: u8,
    pub length_bias: Option<i8>,
    /// Chance for the octave randomization pass (octave.rs).
    pub octave_chance: u8,
    /// Octaves applied so far: the authored offset here, plus whatever
    /// the randomization pass adds.
    pub octave_offset: i8,
}

/// Assign a pitch to one resolved onset.
///
/// The target strength is the candidate's explicit preference when
/// authored, otherwise the strength pattern's value at the onset
/// position. `root_note` is the MIDI note of the scale root at the
/// pattern's base octave; the authored octave offset is applied here and
/// the result clamped into MIDI range.
pub fn map_pitch(
    event: &ResolvedEvent,
    scale: &ScaleDefinition,
    strengths: &StrengthPattern,
    root_note: u8,
) -> PitchedEvent {
    let win = &event.winner;
    let strength = win
        .strength_pref
        .unwrap_or_else(|| strengths.strength_at(event.start));
    let degree = scale.degree_for_strength(strength);
    let note = (root_note as i16 + scale.intervals[degree] as i16 + 12 * win.octave_offset as i16)
        .clamp(0, 127) as u8;
    PitchedEvent {
        start: event.start,
        duration: event.duration,
        note,
        chance: win.weight,
        layer: win.layer.clone(),
        strength,
        length_bias: win.length_bias,
        octave_chance: win.octave_chance,
        octave_offset: win.octave_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compete::Candidate;

    fn resolved(start: Ratio, winner: Candidate) -> ResolvedEvent {
        ResolvedEvent {
            start,
            duration: winner.duration,
            winner,
        }
    }

    fn cand(start: Ratio) -> Candidate {
        Candidate {
            layer: "1/4".to_string(),
            start,
            duration: Ratio::new(1, 4),
            weight: 64,
            strength_pref: None,
            length_bias: None,
            octave_chance: 0,
            octave_offset: 0,
        }
    }

    #[test]
    fn test_degree_for_strength_matches_stability() {
        let major = ScaleDefinition::major();
        assert_eq!(major.degree_for_strength(7), 0); // root
        assert_eq!(major.degree_for_strength(5), 4); // fifth
        assert_eq!(major.degree_for_strength(3), 3); // fourth, exact match
    }

    #[test]
    fn test_builtin_scales_are_well_formed() {
        for scale in [
            ScaleDefinition::major(),
            ScaleDefinition::natural_minor(),
            ScaleDefinition::dorian(),
            ScaleDefinition::mixolydian(),
            ScaleDefinition::minor_pentatonic(),
        ] {
            assert_eq!(scale.intervals.len(), scale.stability.len());
            assert_eq!(scale.intervals[0], 0, "{}: root must be offset 0", scale.name);
            assert_eq!(scale.stability[0], 7, "{}: root must be most stable", scale.name);
            assert!(scale.intervals.windows(2).all(|w| w[0] < w[1]));
            // The most stable degree always wins the downbeat.
            assert_eq!(scale.degree_for_strength(7), 0);
        }
    }

    #[test]
    fn test_degree_tie_breaks_toward_root() {
        let scale = ScaleDefinition::new("tie", vec![0, 4, 7], vec![5, 3, 3]);
        // Degrees 1 and 2 both sit at distance 0 from target 3; the one
        // nearer the root wins.
        assert_eq!(scale.degree_for_strength(3), 1);
    }

    #[test]
    fn test_default_strength_pattern() {
        let strengths = StrengthPattern::default();
        assert_eq!(strengths.strength_at(Ratio::ZERO), 7);
        assert_eq!(strengths.strength_at(Ratio::new(1, 4)), 5);
        assert_eq!(strengths.strength_at(Ratio::new(1, 8)), 3);
        assert_eq!(strengths.strength_at(Ratio::new(1, 3)), 1); // triplet slot
        assert_eq!(strengths.strength_at(Ratio::new(1, 16)), 1);
    }

    #[test]
    fn test_downbeat_maps_to_root() {
        let event = resolved(Ratio::ZERO, cand(Ratio::ZERO));
        let pitched = map_pitch(
            &event,
            &ScaleDefinition::major(),
            &StrengthPattern::default(),
            60,
        );
        assert_eq!(pitched.note, 60);
        assert_eq!(pitched.strength, 7);
        assert_eq!(pitched.chance, 64);
    }

    #[test]
    fn test_quarter_beat_maps_to_fifth() {
        let start = Ratio::new(1, 4);
        let event = resolved(start, cand(start));
        let pitched = map_pitch(
            &event,
            &ScaleDefinition::major(),
            &StrengthPattern::default(),
            60,
        );
        assert_eq!(pitched.note, 67);
    }

    #[test]
    fn test_strength_preference_overrides_pattern() {
        let mut winner = cand(Ratio::ZERO);
        winner.strength_pref = Some(5);
        let event = resolved(Ratio::ZERO, winner);
        let pitched = map_pitch(
            &event,
            &ScaleDefinition::major(),
            &StrengthPattern::default(),
            60,
        );
        assert_eq!(pitched.note, 67); // fifth despite the downbeat
        assert_eq!(pitched.strength, 5);
    }

    #[test]
    fn test_authored_octave_offset_and_midi_clamp() {
        let mut winner = cand(Ratio::ZERO);
        winner.octave_offset = 1;
        let event = resolved(Ratio::ZERO, winner.clone());
        let pitched = map_pitch(
            &event,
            &ScaleDefinition::major(),
            &StrengthPattern::default(),
            60,
        );
        assert_eq!(pitched.note, 72);
        assert_eq!(pitched.octave_offset, 1);

        let event = resolved(Ratio::ZERO, winner);
        let pitched = map_pitch(
            &event,
            &ScaleDefinition::major(),
            &StrengthPattern::default(),
            120,
        );
        assert_eq!(pitched.note, 127); // clamped, not rejected
    }
}
