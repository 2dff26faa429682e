// Exact rational bar positions.
//
// Every start-time and duration in a pattern is a fraction of one bar,
// normalized to [0, 1). Collisions between layers — two onsets landing on
// the same instant — decide everything in the resolver, so positions are
// kept as exact integer fractions rather than floats: 3/6 and 1/2 must be
// the *same* key in the timeline, not two values within a tolerance.
//
// Ratios are normalized on construction (gcd-reduced, denominator kept
// positive), which makes derived Eq/Hash agree with numeric equality.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An exact rational number, used for bar positions and note durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ratio {
    num: i64,
    den: i64,
}

impl Ratio {
    pub const ZERO: Ratio = Ratio { num: 0, den: 1 };
    pub const ONE: Ratio = Ratio { num: 1, den: 1 };

    /// Create a normalized ratio.
    ///
    /// Panics if `den == 0`. The sign is folded into the numerator.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "Ratio: zero denominator");
        let sign = den.signum();
        let (num, den) = (num * sign, den * sign);
        let g = gcd(num.abs(), den);
        Ratio {
            num: num / g,
            den: den / g,
        }
    }

    pub fn from_int(n: i64) -> Self {
        Ratio { num: n, den: 1 }
    }

    pub fn numer(self) -> i64 {
        self.num
    }

    pub fn denom(self) -> i64 {
        self.den
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// Euclid's algorithm; gcd(0, d) = d, so zero numerators normalize to 0/1.
fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

impl std::ops::Add for Ratio {
    type Output = Ratio;

    fn add(self, other: Ratio) -> Ratio {
        Ratio::new(
            self.num * other.den + other.num * self.den,
            self.den * other.den,
        )
    }
}

impl std::ops::Sub for Ratio {
    type Output = Ratio;

    fn sub(self, other: Ratio) -> Ratio {
        Ratio::new(
            self.num * other.den - other.num * self.den,
            self.den * other.den,
        )
    }
}

impl std::ops::Mul for Ratio {
    type Output = Ratio;

    fn mul(self, other: Ratio) -> Ratio {
        Ratio::new(self.num * other.num, self.den * other.den)
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Ratio) -> Ordering {
        // Denominators are always positive, so cross-multiplication keeps
        // the ordering. i128 avoids overflow on large denominators.
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Ratio) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
