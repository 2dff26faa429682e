// Probability competition resolution over one bar.
//
// The core of the generator. Every active layer contributes a candidate
// at each of its onsets; candidates sharing an exact start-time form a
// competition group. Groups resolve in time order: one draw in [0, 127)
// picks a winner (or silence), the winner owns its full duration and
// suppresses every onset that falls strictly inside that window, and a
// loser whose own next onset was swallowed by the winner carries its
// weight forward to its layer's next surviving group.
//
// The timeline is an explicit ordered map from start-time to group, so
// suppression and weight carry-over stay auditable instead of being
// buried in nested conditionals. Start-times are exact rationals
// (time.rs), which makes group membership exact.
//
// Budget rule: a group's combined weight may never exceed 127, neither as
// authored nor after inheritance. Violations abort the whole pattern via
// `ProbabilityBudgetExceeded` — clamping would silently reshape the
// authored musical intent.

use crate::error::PatternError;
use crate::time::Ratio;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound of the synth's 7-bit chance scale. One competition draw is
/// uniform in [0, CHANCE_MAX), and a group's combined weight may never
/// exceed CHANCE_MAX.
pub const CHANCE_MAX: u32 = 127;

/// One authored onset competing for a start-time.
///
/// Candidates are pure values, constructed fresh per generation call and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Layer identifier: a division id like "1/8T", or a Euclidean layer
    /// label like "E(3,8)". Groups compare candidates and inheritance
    /// matches a loser to its later onsets by this id.
    pub layer: String,
    /// Onset position within the bar, in [0, 1).
    pub start: Ratio,
    /// Duration the event would own if it wins.
    pub duration: Ratio,
    /// Authored probability weight, 0..=127.
    pub weight: u8,
    /// Preferred beat strength for pitch selection; `None` defers to the
    /// strength pattern at the onset position.
    pub strength_pref: Option<u8>,
    /// Authored note-length bias, passed through to the preset.
    pub length_bias: Option<i8>,
    /// Chance (0..=127) that the octave post-processor shifts this note.
    pub octave_chance: u8,
    /// Authored octave offset applied during pitch mapping.
    pub octave_offset: i8,
}

/// A resolved onset: the winning candidate and the window it owns.
/// Silence is a gap between events, never an event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub start: Ratio,
    pub duration: Ratio,
    pub winner: Candidate,
}

/// A candidate plus the weight it has inherited from suppressed losers of
/// earlier groups. Effective weight for the draw is authored + inherited.
struct Entry {
    cand: Candidate,
    inherited: u32,
}

/// Resolve all candidates of one bar into a non-overlapping event
/// sequence.
///
/// Deterministic for a given rng stream: groups are visited in start
/// order, candidates within a group are ordered by descending effective
/// weight with ties broken by ascending layer id, and each unsuppressed
/// group consumes exactly one draw.
pub fn resolve(
    candidates: &[Candidate],
    rng: &mut impl Rng,
) -> Result<Vec<ResolvedEvent>, PatternError> {
    let mut timeline: BTreeMap<Ratio, Vec<Entry>> = BTreeMap::new();
    for cand in candidates {
        timeline.entry(cand.start).or_default().push(Entry {
            cand: cand.clone(),
            inherited: 0,
        });
    }

    // Authored budgets are checked before anything is drawn or emitted,
    // so an over-budget pattern aborts without a partial result.
    for (start, group) in &timeline {
        let total: u32 = group.iter().map(|e| e.cand.weight as u32).sum();
        if total > CHANCE_MAX {
            return Err(PatternError::ProbabilityBudgetExceeded {
                start: *start,
                total,
                inherited: false,
            });
        }
    }

    let starts: Vec<Ratio> = timeline.keys().copied().collect();
    let mut resolved: Vec<ResolvedEvent> = Vec::new();
    let mut owned_until = Ratio::ZERO;

    for start in starts {
        // Ownership: an onset strictly inside the current winner's window
        // neither competes nor sounds, and consumes no draw.
        if start < owned_until {
            log::trace!("onset {start} suppressed (owned until {owned_until})");
            continue;
        }

        let group = &timeline[&start];
        let total: u32 = group
            .iter()
            .map(|e| e.cand.weight as u32 + e.inherited)
            .sum();
        let has_inherited = group.iter().any(|e| e.inherited > 0);
        if total > CHANCE_MAX {
            return Err(PatternError::ProbabilityBudgetExceeded {
                start,
                total,
                inherited: has_inherited,
            });
        }

        // Fixed candidate ordering: descending effective weight, then
        // ascending layer id. This pins which cumulative sub-range of
        // [0, 127) each candidate occupies.
        let mut order: Vec<usize> = (0..group.len()).collect();
        order.sort_by(|&a, &b| {
            let ea = group[a].cand.weight as u32 + group[a].inherited;
            let eb = group[b].cand.weight as u32 + group[b].inherited;
            eb.cmp(&ea)
                .then_with(|| group[a].cand.layer.cmp(&group[b].cand.layer))
        });

        let r = draw(rng, CHANCE_MAX as u64) as u32;
        let mut acc = 0u32;
        let mut winner: Option<usize> = None;
        for &idx in &order {
            acc += group[idx].cand.weight as u32 + group[idx].inherited;
            if r < acc {
                winner = Some(idx);
                break;
            }
        }

        // A draw at or past the group total resolves to silence: no
        // event, no ownership.
        let Some(win_idx) = winner else {
            log::debug!("group at {start}: r={r} >= total {total}, silence");
            continue;
        };

        let win = group[win_idx].cand.clone();
        let end = start + win.duration;
        log::debug!("group at {start}: r={r}, {} wins [{start}, {end})", win.layer);

        // Lost-probability inheritance: a loser whose next onset falls
        // strictly inside the winner's window carries its authored weight
        // to its layer's first group at or after the window end.
        // Inherited weight is never carried a second time.
        let mut carries: Vec<(String, u8)> = Vec::new();
        for (idx, entry) in group.iter().enumerate() {
            if idx == win_idx || entry.cand.weight == 0 {
                continue;
            }
            let next_onset = start + entry.cand.duration;
            if next_onset < end {
                carries.push((entry.cand.layer.clone(), entry.cand.weight));
            }
        }
        for (layer, weight) in carries {
            let target = timeline
                .range_mut(end..)
                .find(|(_, g)| g.iter().any(|e| e.cand.layer == layer));
            if let Some((target_start, target_group)) = target {
                log::debug!("layer {layer} carries {weight} forward to {target_start}");
                if let Some(entry) =
                    target_group.iter_mut().find(|e| e.cand.layer == layer)
                {
                    entry.inherited += weight as u32;
                }
            }
        }

        resolved.push(ResolvedEvent {
            start,
            duration: win.duration,
            winner: win,
        });
        owned_until = end;
    }

    Ok(resolved)
}

/// Uniform draw in [0, range) from the generator's raw `next_u64` stream.
///
/// Rejection sampling keeps the result unbiased, and drawing straight
/// from `next_u64` keeps the decision stream a pure function of the
/// seeded generator rather than of rand's internal range sampling.
pub(crate) fn draw(rng: &mut impl Rng, range: u64) -> u64 {
    debug_assert!(range > 0);
    let threshold = range.wrapping_neg() % range;
    loop {
        let r = rng.next_u64();
        if r >= threshold {
            return r % range;
        }
    }
}
