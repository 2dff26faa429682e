// Euclidean rhythm generation.
//
// Distributes k onsets over n steps as evenly as integer arithmetic
// allows (the Bjorklund distribution): onset i lands on step
// floor(i * n / k). Euclidean layers are an alternative onset source for
// the resolver, alongside the division catalog — the caller turns the
// step indices into candidates on the n-step grid with an authored
// weight.

use crate::error::PatternError;
use crate::time::Ratio;

/// Step indices of `onsets` onsets distributed over `steps` steps.
///
/// Fails with `InvalidParameters` when either count is non-positive or
/// there are more onsets than steps.
pub fn euclidean(onsets: i64, steps: i64) -> Result<Vec<usize>, PatternError> {
    if onsets <= 0 || steps <= 0 || onsets > steps {
        return Err(PatternError::InvalidParameters { onsets, steps });
    }
    Ok((0..onsets).map(|i| (i * steps / onsets) as usize).collect())
}

/// Onset times of a Euclidean pattern as bar positions on the step grid.
pub fn onset_times(onsets: i64, steps: i64) -> Result<Vec<Ratio>, PatternError> {
    let indices = euclidean(onsets, steps)?;
    Ok(indices
        .into_iter()
        .map(|i| Ratio::new(i as i64, steps))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_over_sixteen() {
        assert_eq!(euclidean(4, 16).unwrap(), vec![0, 4, 8, 12]);
    }

    #[test]
    fn test_three_over_eight_is_maximally_even() {
        let onsets = euclidean(3, 8).unwrap();
        assert_eq!(onsets.len(), 3);

        // Gaps between consecutive onsets (wrapping around the bar) may
        // differ by at most one step.
        let mut gaps = Vec::new();
        for i in 0..onsets.len() {
            let next = onsets[(i + 1) % onsets.len()] as i64;
            let cur = onsets[i] as i64;
            gaps.push((next - cur).rem_euclid(8));
        }
        let max = gaps.iter().max().unwrap();
        let min = gaps.iter().min().unwrap();
        assert!(max - min <= 1, "gaps {gaps:?} are not maximally even");
    }

    #[test]
    fn test_full_density_hits_every_step() {
        assert_eq!(euclidean(8, 8).unwrap(), (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            euclidean(9, 8),
            Err(PatternError::InvalidParameters { onsets: 9, steps: 8 })
        );
        assert_eq!(
            euclidean(0, 8),
            Err(PatternError::InvalidParameters { onsets: 0, steps: 8 })
        );
        assert_eq!(
            euclidean(3, 0),
            Err(PatternError::InvalidParameters { onsets: 3, steps: 0 })
        );
    }

    #[test]
    fn test_onset_times_land_on_the_step_grid() {
        let times = onset_times(4, 16).unwrap();
        assert_eq!(
            times,
            vec![
                Ratio::ZERO,
                Ratio::new(1, 4),
                Ratio::new(1, 2),
                Ratio::new(3, 4)
            ]
        );
    }
}
