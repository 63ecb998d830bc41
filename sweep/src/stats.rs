//! How far a distribution is from uniform.

use jump_bucketing::DistributionTable;
use statrs::distribution::{ChiSquared, ContinuousCDF};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniformity {
    /// L1 distance between the observed bucket frequencies and the uniform
    /// distribution.
    pub l1_distance: f64,
    /// p-value of a chi-squared uniformity test. `None` with a single bucket,
    /// which is trivially uniform, or with more than
    /// [`MAX_CHI_SQUARED_BUCKETS`] buckets.
    pub p_value: Option<f64>,
}

/// Largest bucket count for which the chi-squared p-value is computed.
pub const MAX_CHI_SQUARED_BUCKETS: u32 = 1 << 20;

/// Measures the uniformity of `table` over buckets `0..num_buckets`. Buckets
/// without occurrences count as zero.
///
/// Only the non-empty buckets are visited, the empty ones contribute in
/// closed form.
pub fn uniformity(table: &DistributionTable, num_buckets: u32) -> Uniformity {
    let num_empty = u64::from(num_buckets).saturating_sub(table.len() as u64);
    Uniformity {
        l1_distance: l1_distance_to_uniform(table, num_buckets, num_empty),
        p_value: (num_buckets <= MAX_CHI_SQUARED_BUCKETS)
            .then(|| chi_squared_uniformity_test_p_value(table, num_buckets, num_empty))
            .flatten(),
    }
}

fn l1_distance_to_uniform(table: &DistributionTable, num_buckets: u32, num_empty: u64) -> f64 {
    let num_keys = table.total() as f64;
    let uniform = 1.0 / f64::from(num_buckets);
    table
        .iter()
        .map(|(_, c)| c as f64 / num_keys)
        .map(|p| (p - uniform).abs())
        .sum::<f64>()
        + num_empty as f64 * uniform
}

fn chi_squared_uniformity_test_p_value(
    table: &DistributionTable,
    num_buckets: u32,
    num_empty: u64,
) -> Option<f64> {
    let expected_count = table.total() as f64 / f64::from(num_buckets);

    // An empty bucket adds (0 - e)^2 / e = e.
    let statistic = table
        .iter()
        .map(|(_, o)| (o as f64 - expected_count).powi(2) / expected_count)
        .sum::<f64>()
        + num_empty as f64 * expected_count;

    let degrees_of_freedom = f64::from(num_buckets) - 1.0;

    ChiSquared::new(degrees_of_freedom)
        .ok()
        .map(|distribution| 1.0 - distribution.cdf(statistic))
}
