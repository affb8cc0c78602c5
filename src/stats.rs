/// Componentwise weighted mean of a cluster's red/green/blue channels.
pub type Mean = [f64; 3];
/// Componentwise weighted variance of a cluster's red/green/blue channels.
pub type Variance = [f64; 3];

/// Aggregate statistics tracked for one cluster: weight, mean, variance, and
/// point count. `total_squared_error` (TSE) drives the choice of which
/// cluster to split next.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterStats {
    pub weight: f64,
    pub mean: Mean,
    pub variance: Variance,
    pub count: usize,
}

impl ClusterStats {
    #[must_use]
    pub fn total_squared_error(&self) -> f64 {
        self.weight * (self.variance[0] + self.variance[1] + self.variance[2])
    }

    /// The channel (0=red, 1=green, 2=blue) with the largest variance. Ties
    /// broken red > green > blue, matching the reference implementation's
    /// sequential `if max_val < var` comparisons.
    #[must_use]
    pub fn widest_axis(&self) -> usize {
        let mut axis = 0;
        let mut max_val = self.variance[0];
        if max_val < self.variance[1] {
            max_val = self.variance[1];
            axis = 1;
        }
        if max_val < self.variance[2] {
            axis = 2;
        }
        axis
    }
}

/// Recovers the complement cluster's mean/variance from the parent's
/// pre-split statistics and the split-off subcluster's statistics, without
/// a second pass over the data. This is the "combined-moment identity" that
/// makes the divisive splitter avoid rescanning points on every split.
///
/// `total` is the parent cluster's statistics *before* the split (only
/// `weight`, `mean`, `variance` are read). `part` is the statistics of the
/// subcluster that was scanned out. Returns the complement's weight, mean,
/// and variance.
#[must_use]
pub fn complement_stats(total: &ClusterStats, part: &ClusterStats) -> (f64, Mean, Variance) {
    let complement_weight = total.weight - part.weight;
    let mut complement_mean = [0.0; 3];
    let mut complement_var = [0.0; 3];
    for axis in 0..3 {
        complement_mean[axis] =
            (total.weight * total.mean[axis] - part.weight * part.mean[axis]) / complement_weight;

        let part_second_moment =
            part.variance[axis] + (part.mean[axis] - total.mean[axis]).powi(2);
        complement_var[axis] = (total.weight * total.variance[axis]
            - part.weight * part_second_moment)
            / complement_weight
            - (complement_mean[axis] - total.mean[axis]).powi(2);
    }
    (complement_weight, complement_mean, complement_var)
}

/// Recovers only the complement's mean (skipping variance), used inside the
/// local-refinement loop where intermediate iterations never need variance.
#[must_use]
pub fn complement_mean(total: &ClusterStats, part_weight: f64, part_mean: Mean) -> Mean {
    let complement_weight = total.weight - part_weight;
    let mut complement_mean = [0.0; 3];
    for axis in 0..3 {
        complement_mean[axis] =
            (total.weight * total.mean[axis] - part_weight * part_mean[axis]) / complement_weight;
    }
    complement_mean
}

/// Weighted mean/variance of a raw accumulation: `sum` is Σ w·x and
/// `sum_sq` is Σ w·x² per channel, `weight` is Σ w.
#[must_use]
pub fn finalize(weight: f64, sum: [f64; 3], sum_sq: [f64; 3]) -> (Mean, Variance) {
    let mut mean = [0.0; 3];
    let mut variance = [0.0; 3];
    for axis in 0..3 {
        mean[axis] = sum[axis] / weight;
        variance[axis] = sum_sq[axis] / weight - mean[axis] * mean[axis];
    }
    (mean, variance)
}
