/// Heuristic confidence in a set of raw occupancy estimates.
///
/// Starts at 1.0 and is docked for values outside a plausible range and for
/// a high spread relative to the mean. The result is in `[0.0, 1.0]`; an
/// empty estimate has no confidence at all.
pub fn confidence(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut score: f64 = 1.0;
    if min < 0.0 {
        score -= 0.2;
    }
    if max > 150.0 {
        score -= 0.1;
    }
    if max > 200.0 {
        score -= 0.2;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean > 0.0 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let spread = variance.sqrt() / mean;
        if spread > 0.5 {
            score -= 0.3;
        } else if spread > 0.2 {
            score -= 0.1;
        }
    }

    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}
