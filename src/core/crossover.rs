// Golden / dead cross detection between pairs of moving averages

use crate::core::moving_average::MovingAverages;
use crate::types::{AveragePoint, CrossDirection, CrossoverEvent};

/// Classify the move between two consecutive samples.
///
/// Golden: short strictly below long, then strictly above.
/// Dead: short strictly above long, then strictly below.
/// Touching (equal values) on either side is not a cross.
pub fn classify_cross(
    prev_short: f64,
    prev_long: f64,
    curr_short: f64,
    curr_long: f64,
) -> Option<CrossDirection> {
    if prev_short < prev_long && curr_short > curr_long {
        Some(CrossDirection::Golden)
    } else if prev_short > prev_long && curr_short < curr_long {
        Some(CrossDirection::Dead)
    } else {
        None
    }
}

fn last_two(points: &[AveragePoint]) -> Option<(f64, f64)> {
    match points {
        [.., prev, curr] => Some((prev.value?, curr.value?)),
        _ => None,
    }
}

/// Events for short/mid, mid/long, short/long, in that order.
/// A pair whose last two values are not both defined yields nothing.
pub fn detect_crossovers(averages: &MovingAverages) -> Vec<CrossoverEvent> {
    averages
        .windows()
        .pairs()
        .into_iter()
        .filter_map(|pair| {
            let (prev_short, curr_short) = last_two(averages.series(pair.short)?)?;
            let (prev_long, curr_long) = last_two(averages.series(pair.long)?)?;

            classify_cross(prev_short, prev_long, curr_short, curr_long)
                .map(|direction| CrossoverEvent { pair, direction })
        })
        .collect()
}
