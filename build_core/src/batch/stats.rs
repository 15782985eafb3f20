//! Summary statistics over simulated samples

use serde::{Deserialize, Serialize};

/// Shape of a sample distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub max: f64,
    /// Half-width of the 95% confidence interval of the mean
    pub ci95: f64,
}

impl Distribution {
    pub fn from_samples(samples: &[f64]) -> Distribution {
        if samples.is_empty() {
            return Distribution::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = if sorted.len() > 1 {
            sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();

        Distribution {
            count: sorted.len(),
            mean,
            std_dev,
            min: sorted[0],
            p10: percentile(&sorted, 10.0),
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            max: sorted[sorted.len() - 1],
            ci95: 1.96 * std_dev / n.sqrt(),
        }
    }
}

/// Percentile of a sorted, non-empty slice: the sample at the linear index
/// `p * (n - 1)`, rounded to the nearest index. No interpolation.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}
