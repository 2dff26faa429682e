// Pattern generation pipeline: config in, pitched events out.
//
// Ties the stages together for one instrument's pattern: authored layers
// expand into candidates (division catalog + Euclidean grids), the
// resolver decides which onsets sound, the scale mapper pitches them,
// and the octave pass perturbs the result. Everything downstream of the
// config is pure: the same config and rng stream always produce the same
// events, so presets can be regenerated or generated in parallel without
// shared state.
//
// Serialization of the returned events into the preset file is the
// caller's job; the types here only guarantee a serde-stable shape.

use crate::compete::{Candidate, resolve};
use crate::division::Division;
use crate::error::PatternError;
use crate::euclid::euclidean;
use crate::octave::OctaveRandomizer;
use crate::scale::{PitchedEvent, ScaleDefinition, StrengthPattern, map_pitch};
use crate::time::Ratio;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// One rhythm layer on a catalog division: a candidate at every onset of
/// the division, all with the same authored weight and preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionLayer {
    /// Division identifier as authored ("1/8", "1/8T", "1/16D", ...).
    pub division: String,
    pub weight: u8,
    pub strength_pref: Option<u8>,
    pub length_bias: Option<i8>,
    pub octave_chance: u8,
    pub octave_offset: i8,
}

impl DivisionLayer {
    pub fn new(division: &str, weight: u8) -> Self {
        DivisionLayer {
            division: division.to_string(),
            weight,
            strength_pref: None,
            length_bias: None,
            octave_chance: 0,
            octave_offset: 0,
        }
    }
}

/// One rhythm layer on a Euclidean grid: `onsets` candidates spread over
/// `steps` steps, each one step long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuclidLayer {
    pub onsets: i64,
    pub steps: i64,
    pub weight: u8,
    pub strength_pref: Option<u8>,
    pub length_bias: Option<i8>,
    pub octave_chance: u8,
    pub octave_offset: i8,
}

impl EuclidLayer {
    pub fn new(onsets: i64, steps: i64, weight: u8) -> Self {
        EuclidLayer {
            onsets,
            steps,
            weight,
            strength_pref: None,
            length_bias: None,
            octave_chance: 0,
            octave_offset: 0,
        }
    }

    /// Layer label used for grouping and inheritance in the resolver.
    pub fn label(&self) -> String {
        format!("E({},{})", self.onsets, self.steps)
    }
}

/// Everything needed to generate one instrument's bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub divisions: Vec<DivisionLayer>,
    pub euclids: Vec<EuclidLayer>,
    pub scale: ScaleDefinition,
    pub strengths: StrengthPattern,
    /// MIDI note of the scale root at the pattern's base octave.
    pub root_note: u8,
    pub octaves: OctaveRandomizer,
    /// Seed for `generate_seeded`; each instrument owns its own stream.
    pub seed: u64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            divisions: Vec::new(),
            euclids: Vec::new(),
            scale: ScaleDefinition::major(),
            strengths: StrengthPattern::default(),
            root_note: 60,
            octaves: OctaveRandomizer::default(),
            seed: 0,
        }
    }
}

/// Expand the config's layers into the full candidate set for one bar.
pub fn build_candidates(config: &PatternConfig) -> Result<Vec<Candidate>, PatternError> {
    let mut out = Vec::new();
    for layer in &config.divisions {
        let division = Division::from_id(&layer.division)?;
        let duration = division.duration();
        for start in division.start_times() {
            out.push(Candidate {
                layer: layer.division.clone(),
                start,
                duration,
                weight: layer.weight,
                strength_pref: layer.strength_pref,
                length_bias: layer.length_bias,
                octave_chance: layer.octave_chance,
                octave_offset: layer.octave_offset,
            });
        }
    }
    for layer in &config.euclids {
        let indices = euclidean(layer.onsets, layer.steps)?;
        let label = layer.label();
        let duration = Ratio::new(1, layer.steps);
        for index in indices {
            out.push(Candidate {
                layer: label.clone(),
                start: Ratio::new(index as i64, layer.steps),
                duration,
                weight: layer.weight,
                strength_pref: layer.strength_pref,
                length_bias: layer.length_bias,
                octave_chance: layer.octave_chance,
                octave_offset: layer.octave_offset,
            });
        }
    }
    Ok(out)
}

/// Generate one instrument's pattern with a caller-supplied generator.
pub fn generate(
    config: &PatternConfig,
    rng: &mut impl Rng,
) -> Result<Vec<PitchedEvent>, PatternError> {
    let candidates = build_candidates(config)?;
    let resolved = resolve(&candidates, rng)?;
    let mut events: Vec<PitchedEvent> = resolved
        .iter()
        .map(|ev| map_pitch(ev, &config.scale, &config.strengths, config.root_note))
        .collect();
    config.octaves.apply(&mut events, rng);
    log::debug!(
        "generated {} events from {} candidates",
        events.len(),
        candidates.len()
    );
    Ok(events)
}

/// Generate from the config's own seed. The stream is private to this
/// call, so independent presets never contend for shared entropy.
pub fn generate_seeded(config: &PatternConfig) -> Result<Vec<PitchedEvent>, PatternError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    generate(config, &mut rng)
}
