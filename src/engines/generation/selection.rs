//! Sigma-scaled fitness-proportionate selection.

use rand::Rng;

/// Spins a roulette wheel `spins` times over `fitness`, with each slice
/// weighted `exclusion * fitness / mean`. Returns the selected indices in
/// ascending spin order.
///
/// Callers must only use this with a positive `mean`. A non-positive mean has
/// no meaningful wheel; the population falls back to uniform picks instead.
pub fn sigma_scaled_roulette<R: Rng>(
    fitness: &[f64],
    mean: f64,
    exclusion: f64,
    spins: usize,
    rng: &mut R,
) -> Vec<usize> {
    let scaled: Vec<f64> = fitness.iter().map(|f| exclusion * f / mean).collect();
    let total: f64 = scaled.iter().sum();

    let mut draws: Vec<f64> = (0..spins).map(|_| rng.gen::<f64>() * total).collect();
    draws.sort_by(f64::total_cmp);
    sweep(&scaled, &draws)
}

/// Walks the cumulative wheel once over sorted `draws`.
///
/// A draw beyond the accumulated total, which rounding can produce, lands on
/// the last slice.
pub fn sweep(scaled: &[f64], draws: &[f64]) -> Vec<usize> {
    let mut selected = Vec::with_capacity(draws.len());
    if scaled.is_empty() {
        return selected;
    }

    let last = scaled.len() - 1;
    let mut index = 0;
    let mut upper = scaled[0];
    for &draw in draws {
        while draw > upper && index < last {
            index += 1;
            upper += scaled[index];
        }
        selected.push(index);
    }
    selected
}
