use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::datastructures::*;
use crate::gap::Gap;
use crate::method::MethodRecord;
use crate::reference::{BestKnown, InstanceInfo, ReferenceTables};

#[cfg(test)]
mod tests;

/// How the best score of a method compares to the references of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreClass {
    Missing,
    /// The method proved its best score optimal
    Optimal,
    /// Better than the best known score
    NewBest,
    BestKnown,
    /// Best score among the compared methods
    BestFound,
    Other,
}

/// Results of every method on one instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceRecord {
    pub name: String,
    pub info: InstanceInfo,
    pub best_known: BestKnown,
    /// In configuration order
    pub methods: Vec<MethodRecord>,
    pub gaps: Vec<Gap>,
}

impl InstanceRecord {
    /// Reads the runs of every method and compares each pair of `gaps`.
    ///
    /// Fails when the instance is absent from the reference tables.
    pub fn build(
        config: &Config,
        name: &str,
        references: &ReferenceTables,
        gaps: &[(String, String)],
    ) -> Result<Self> {
        info!("{name}");
        let best_known = references.best_known(name)?;
        let info = references.info(name)?;
        let methods = config
            .methods
            .iter()
            .map(|method| {
                MethodRecord::build(
                    &method.name,
                    &config.method_directory(method),
                    name,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_methods(name, info, best_known, methods, gaps)
    }

    pub fn from_methods(
        name: &str,
        info: InstanceInfo,
        best_known: BestKnown,
        methods: Vec<MethodRecord>,
        gaps: &[(String, String)],
    ) -> Result<Self> {
        let mut instance = Self {
            name: name.to_string(),
            info,
            best_known,
            methods,
            gaps: Vec::with_capacity(gaps.len()),
        };
        instance.gaps = gaps
            .iter()
            .map(|(m1, m2)| Ok(Gap::compare(instance.method(m1)?, instance.method(m2)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(instance)
    }

    pub fn method(&self, name: &str) -> Result<&MethodRecord> {
        self.methods
            .iter()
            .find(|method| method.name == name)
            .with_context(|| format!("unknown method {name} on {}", self.name))
    }

    pub fn gap(&self, m1: &str, m2: &str) -> Option<&Gap> {
        self.gaps
            .iter()
            .find(|gap| gap.method_1 == m1 && gap.method_2 == m2)
    }

    /// Best score found by any method.
    pub fn best_found(&self) -> Metric<i64> {
        self.methods
            .iter()
            .map(|method| method.best_score)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(Metric::Missing)
    }

    /// Lowest mean score of any method.
    pub fn best_mean(&self) -> Metric<f64> {
        self.methods
            .iter()
            .map(|method| method.mean_score)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(Metric::Missing)
    }

    pub fn reaches_best_known(&self, method: &MethodRecord) -> bool {
        method.best_score == Metric::Value(self.best_known.score)
    }

    pub fn reaches_best_found(&self, method: &MethodRecord) -> bool {
        method.has_data() && method.best_score == self.best_found()
    }

    pub fn reaches_best_mean(&self, method: &MethodRecord) -> bool {
        method.has_data() && method.mean_score == self.best_mean()
    }

    pub fn classify(&self, method: &MethodRecord) -> ScoreClass {
        let Metric::Value(best_score) = method.best_score else {
            return ScoreClass::Missing;
        };
        if method.optimal {
            ScoreClass::Optimal
        } else if best_score < self.best_known.score {
            ScoreClass::NewBest
        } else if best_score == self.best_known.score {
            ScoreClass::BestKnown
        } else if self.reaches_best_found(method) {
            ScoreClass::BestFound
        } else {
            ScoreClass::Other
        }
    }

    /// Method names sorted by (mean score, best score, mean best time), grouped in tiers
    /// of identical keys.
    ///
    /// Tier `k` starts at position `k` of the sorted methods, the tiers following a tie
    /// stay empty.
    pub fn rank_tiers(&self) -> Vec<Vec<String>> {
        let key = |method: &MethodRecord| {
            (method.mean_score, method.best_score, method.mean_best_time)
        };
        let sorted = self
            .methods
            .iter()
            .sorted_by(|a, b| {
                key(*a)
                    .partial_cmp(&key(*b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .collect_vec();
        let mut tiers = vec![Vec::new(); sorted.len()];
        let mut current = 0;
        for (position, &method) in sorted.iter().enumerate() {
            if key(sorted[current]) != key(method) {
                current = position;
            }
            tiers[current].push(method.name.clone());
        }
        tiers
    }
}
