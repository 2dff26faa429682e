// Beat division catalog.
//
// The static table of rhythmic subdivisions a pattern layer may use:
// straight divisions (1/1 down to 1/32), triplets (three in the space of
// two), and dotted divisions (one and a half times the straight length).
// Each division is an ordered set of onset times within the bar plus one
// fixed note duration; both are closed-form functions of the division, so
// the catalog needs no stored tables.
//
// Dotted divisions do not tile the bar evenly: onsets are laid down at
// i * duration for as long as that stays below 1, and the last window runs
// past the bar boundary. 1/16D, for example, has duration 3/32 and exactly
// 11 onsets, the last at 30/32 — not 1/duration rounded. That truncation
// is part of the catalog's contract and the resolver relies on it.

use crate::error::PatternError;
use crate::time::Ratio;

/// A named rhythmic subdivision of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Division {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    HalfTriplet,
    QuarterTriplet,
    EighthTriplet,
    SixteenthTriplet,
    HalfDotted,
    QuarterDotted,
    EighthDotted,
    SixteenthDotted,
    ThirtySecondDotted,
}

impl Division {
    pub const ALL: [Division; 15] = [
        Division::Whole,
        Division::Half,
        Division::Quarter,
        Division::Eighth,
        Division::Sixteenth,
        Division::ThirtySecond,
        Division::HalfTriplet,
        Division::QuarterTriplet,
        Division::EighthTriplet,
        Division::SixteenthTriplet,
        Division::HalfDotted,
        Division::QuarterDotted,
        Division::EighthDotted,
        Division::SixteenthDotted,
        Division::ThirtySecondDotted,
    ];

    /// The identifier used in authored pattern layers and serialized
    /// presets ("1/8", "1/8T", "1/8D", ...).
    pub fn id(self) -> &'static str {
        match self {
            Division::Whole => "1/1",
            Division::Half => "1/2",
            Division::Quarter => "1/4",
            Division::Eighth => "1/8",
            Division::Sixteenth => "1/16",
            Division::ThirtySecond => "1/32",
            Division::HalfTriplet => "1/2T",
            Division::QuarterTriplet => "1/4T",
            Division::EighthTriplet => "1/8T",
            Division::SixteenthTriplet => "1/16T",
            Division::HalfDotted => "1/2D",
            Division::QuarterDotted => "1/4D",
            Division::EighthDotted => "1/8D",
            Division::SixteenthDotted => "1/16D",
            Division::ThirtySecondDotted => "1/32D",
        }
    }

    /// Look up a division by its authored identifier.
    pub fn from_id(id: &str) -> Result<Division, PatternError> {
        Division::ALL
            .iter()
            .copied()
            .find(|d| d.id() == id)
            .ok_or_else(|| PatternError::InvalidDivision(id.to_string()))
    }

    /// The fixed duration of one note of this division, in bar units.
    pub fn duration(self) -> Ratio {
        match self {
            Division::Whole => Ratio::new(1, 1),
            Division::Half => Ratio::new(1, 2),
            Division::Quarter => Ratio::new(1, 4),
            Division::Eighth => Ratio::new(1, 8),
            Division::Sixteenth => Ratio::new(1, 16),
            Division::ThirtySecond => Ratio::new(1, 32),
            Division::HalfTriplet => Ratio::new(1, 3),
            Division::QuarterTriplet => Ratio::new(1, 6),
            Division::EighthTriplet => Ratio::new(1, 12),
            Division::SixteenthTriplet => Ratio::new(1, 24),
            Division::HalfDotted => Ratio::new(3, 4),
            Division::QuarterDotted => Ratio::new(3, 8),
            Division::EighthDotted => Ratio::new(3, 16),
            Division::SixteenthDotted => Ratio::new(3, 32),
            Division::ThirtySecondDotted => Ratio::new(3, 64),
        }
    }

    /// Ordered onset times within the bar: i * duration while < 1.
    ///
    /// For straight and triplet divisions this tiles the bar exactly; for
    /// dotted divisions the final window is truncated by the bar boundary.
    pub fn start_times(self) -> Vec<Ratio> {
        let duration = self.duration();
        let mut starts = Vec::new();
        let mut i: i64 = 0;
        loop {
            let t = duration * Ratio::from_int(i);
            if t >= Ratio::ONE {
                break;
            }
            starts.push(t);
            i += 1;
        }
        starts
    }
}
