/// Summary of one generation's fitness values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessStats {
    pub mean: f64,
    pub stdev: f64,
    pub total: f64,
}

/// Mean and population standard deviation. All zeros for an empty slice.
pub fn fitness_stats(values: &[f64]) -> FitnessStats {
    if values.is_empty() {
        return FitnessStats::default();
    }

    let n = values.len() as f64;
    let total: f64 = values.iter().sum();
    let mean = total / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    FitnessStats {
        mean,
        stdev: variance.sqrt(),
        total,
    }
}
