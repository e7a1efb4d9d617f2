use itertools::Itertools;
use log::warn;
use serde::Serialize;

use crate::datastructures::*;
use crate::method::MethodRecord;
use crate::statistics::{round_to, wilcoxon};


/// Reporting level of a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Significance {
    Strong,
    Moderate,
    Weak,
    None,
}

impl Significance {
    pub fn from_p_value(p_value: Metric<f64>) -> Self {
        match p_value {
            Metric::Value(p) if p <= P_VALUE_STRONG => Significance::Strong,
            Metric::Value(p) if p <= P_VALUE_MODERATE => Significance::Moderate,
            Metric::Value(p) if p <= P_VALUE_WEAK => Significance::Weak,
            _ => Significance::None,
        }
    }
}

/// Comparison of two methods on the same instance.
///
/// Differences are `method_1 - method_2`, a negative difference favors `method_1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub method_1: String,
    pub method_2: String,
    pub mean_score_difference: Metric<f64>,
    pub p_value: Metric<f64>,
    pub mean_best_time_difference: Metric<f64>,
    pub significance: Significance,
    /// Method with the lower mean score when the difference is significant
    pub better_method_score: Option<String>,
    /// Faster method when both reach the same mean score
    pub better_method_time: Option<String>,
}

impl Gap {
    pub fn compare(m1: &MethodRecord, m2: &MethodRecord) -> Self {
        if !m1.has_data() || !m2.has_data() {
            return Self::from_statistics(
                &m1.name,
                &m2.name,
                Metric::Missing,
                Metric::Missing,
                Metric::Missing,
            );
        }
        let p_value = if m1.is_constant() || m2.is_constant() {
            0.0
        } else {
            signed_rank_p_value(m1, m2)
        };
        Self::from_statistics(
            &m1.name,
            &m2.name,
            m1.mean_score.zip_with(m2.mean_score, |a, b| round_to(a - b, 1)),
            Metric::Value(round_to(p_value, 3)),
            m1.mean_best_time
                .zip_with(m2.mean_best_time, |a, b| round_to(a - b, 1)),
        )
    }

    /// Derives the winners from already computed statistics.
    pub fn from_statistics(
        method_1: &str,
        method_2: &str,
        mean_score_difference: Metric<f64>,
        p_value: Metric<f64>,
        mean_best_time_difference: Metric<f64>,
    ) -> Self {
        let significance = Significance::from_p_value(p_value);
        let better_method_score = match mean_score_difference {
            Metric::Value(d) if significance == Significance::Strong => {
                if d < 0.0 {
                    Some(method_1.to_string())
                } else if d > 0.0 {
                    Some(method_2.to_string())
                } else {
                    None
                }
            }
            _ => None,
        };
        let better_method_time =
            match (mean_score_difference, mean_best_time_difference) {
                (Metric::Value(d), Metric::Value(t)) if d == 0.0 => {
                    if t < -TIME_TIEBREAK_SECONDS {
                        Some(method_1.to_string())
                    } else if t > TIME_TIEBREAK_SECONDS {
                        Some(method_2.to_string())
                    } else {
                        None
                    }
                }
                _ => None,
            };
        Self {
            method_1: method_1.to_string(),
            method_2: method_2.to_string(),
            mean_score_difference,
            p_value,
            mean_best_time_difference,
            significance,
            better_method_score,
            better_method_time,
        }
    }

    pub fn is_incomparable(&self) -> bool {
        self.p_value.is_missing()
    }
}

/// Paired test on the scores, run i of each method share the same seed.
///
/// An undefined test falls back to a p-value of 0. This matches the behavior of the
/// historical reports but is only exact when the score multisets are identical.
fn signed_rank_p_value(m1: &MethodRecord, m2: &MethodRecord) -> f64 {
    let x = m1.runs.iter().map(|run| run.score as f64).collect_vec();
    let y = m2.runs.iter().map(|run| run.score as f64).collect_vec();
    match wilcoxon(&x, &y) {
        Ok(p_value) => p_value,
        Err(err) => {
            let same_scores = m1.scores().into_iter().sorted().collect_vec()
                == m2.scores().into_iter().sorted().collect_vec();
            if !same_scores {
                warn!(
                    "{} vs {} on {}: {err}, p-value set to 0",
                    m1.name, m2.name, m1.instance
                );
            }
            0.0
        }
    }
}
