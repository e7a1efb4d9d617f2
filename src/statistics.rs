use itertools::Itertools;
use statrs::distribution::{ContinuousCDF, Normal};


/// Above this number of non-zero differences the exact distribution is not enumerated.
const EXACT_MAX_SAMPLES: usize = 50;

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Why a signed-rank test could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndefinedTest {
    /// The samples are not paired
    LengthMismatch(usize, usize),
    /// Every paired difference is zero
    AllZeroDifferences,
    /// The tie correction cancels the variance of the statistic
    ZeroVariance,
}

impl std::fmt::Display for UndefinedTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UndefinedTest::LengthMismatch(a, b) => {
                write!(f, "samples of different sizes ({a} and {b})")
            }
            UndefinedTest::AllZeroDifferences => {
                write!(f, "all paired differences are zero")
            }
            UndefinedTest::ZeroVariance => {
                write!(f, "null distribution without variance")
            }
        }
    }
}

impl std::error::Error for UndefinedTest {}

/// Two-sided Wilcoxon signed-rank test on paired samples.
///
/// Zero differences are discarded. The exact null distribution is used for up to
/// 50 differences without ties and zeros, the normal approximation with tie correction
/// otherwise.
pub fn wilcoxon(x: &[f64], y: &[f64]) -> Result<f64, UndefinedTest> {
    if x.len() != y.len() {
        return Err(UndefinedTest::LengthMismatch(x.len(), y.len()));
    }
    let differences = x.iter().zip(y).map(|(a, b)| a - b).collect_vec();
    let non_zero = differences
        .iter()
        .copied()
        .filter(|d| *d != 0.0)
        .collect_vec();
    if non_zero.is_empty() {
        return Err(UndefinedTest::AllZeroDifferences);
    }
    let has_zeros = non_zero.len() < differences.len();
    let (ranks, tie_sizes) = average_ranks(
        &non_zero.iter().map(|d| d.abs()).collect_vec(),
    );
    let r_plus: f64 = positive_ranks(&non_zero, &ranks).sum();
    let n = non_zero.len();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);
    let has_ties = tie_sizes.iter().any(|&t| t > 1);

    let p_value = if n <= EXACT_MAX_SAMPLES && !has_ties && !has_zeros {
        2.0 * exact_lower_tail(n, statistic as usize)
    } else {
        normal_approximation(n, statistic, &tie_sizes)?
    };
    Ok(p_value.min(1.0))
}

fn positive_ranks<'a>(
    differences: &'a [f64],
    ranks: &'a [f64],
) -> impl Iterator<Item = f64> + 'a {
    differences
        .iter()
        .zip(ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| *r)
}

/// Ranks starting at 1, ties get the mean of the ranks they span.
/// Also returns the size of every group of tied values.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let order = (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect_vec();
    let mut ranks = vec![0.0; values.len()];
    let mut tie_sizes = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let average_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average_rank;
        }
        tie_sizes.push(end - start);
        start = end;
    }
    (ranks, tie_sizes)
}

/// P(W <= statistic) where W is the sum of a random subset of {1, ..., n}.
fn exact_lower_tail(n: usize, statistic: usize) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s]: number of subsets of {1..k} summing to s
    let mut counts = vec![0_f64; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }
    let favorable: f64 = counts[..=statistic.min(max_sum)].iter().sum();
    favorable / 2_f64.powi(n as i32)
}

fn normal_approximation(
    n: usize,
    statistic: f64,
    tie_sizes: &[usize],
) -> Result<f64, UndefinedTest> {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let tie_correction = tie_sizes
        .iter()
        .map(|&t| (t.pow(3) - t) as f64)
        .sum::<f64>()
        / 48.0;
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_correction;
    let distribution = Normal::new(mean, variance.sqrt())
        .map_err(|_| UndefinedTest::ZeroVariance)?;
    Ok(2.0 * distribution.cdf(statistic))
}
