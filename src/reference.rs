use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use itertools::izip;
use polars::prelude::*;
use serde::Serialize;


/// Marker of a best known score proven optimal in the literature.
pub const OPTIMAL_MARKER: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestKnown {
    pub score: i64,
    pub optimal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstanceInfo {
    pub nb_vertices: i64,
    pub nb_edges: i64,
}

/// Ground truth on the instances, loaded once for the whole table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    best_known: HashMap<String, BestKnown>,
    info: HashMap<String, InstanceInfo>,
    best_known_source: String,
    info_source: String,
}

impl ReferenceTables {
    /// Reads `<instance> <score> <flag>` lines and `<instance>,<vertices>,<edges>` lines.
    pub fn load(best_scores_path: &Path, instance_info_path: &Path) -> Result<Self> {
        Ok(Self {
            best_known: read_best_scores(best_scores_path)?,
            info: read_instance_info(instance_info_path)?,
            best_known_source: best_scores_path.display().to_string(),
            info_source: instance_info_path.display().to_string(),
        })
    }

    pub fn from_entries(
        best_known: impl IntoIterator<Item = (String, BestKnown)>,
        info: impl IntoIterator<Item = (String, InstanceInfo)>,
    ) -> Self {
        Self {
            best_known: best_known.into_iter().collect(),
            info: info.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn best_known(&self, instance: &str) -> Result<BestKnown> {
        self.best_known.get(instance).copied().with_context(|| {
            format!("instance {instance} not found in {}", self.best_known_source)
        })
    }

    pub fn info(&self, instance: &str) -> Result<InstanceInfo> {
        self.info.get(instance).copied().with_context(|| {
            format!("instance {instance} not found in {}", self.info_source)
        })
    }
}

fn read_headerless(path: &Path, delimiter: u8) -> Result<DataFrame> {
    CsvReader::from_path(path)
        .with_context(|| format!("failed to open {path:?}"))?
        .has_header(false)
        .with_delimiter(delimiter)
        .finish()
        .with_context(|| format!("failed to parse {path:?}"))
}

fn column_as(df: &DataFrame, idx: usize, dtype: &DataType) -> Result<Series> {
    Ok(df
        .select_at_idx(idx)
        .with_context(|| format!("missing column {}", idx + 1))?
        .cast(dtype)?)
}

pub fn read_best_scores(path: &Path) -> Result<HashMap<String, BestKnown>> {
    let df = read_headerless(path, b' ')?;
    let (instances, scores, flags) = (
        column_as(&df, 0, &DataType::Utf8)?,
        column_as(&df, 1, &DataType::Int64)?,
        column_as(&df, 2, &DataType::Utf8)?,
    );
    izip!(
        instances.utf8()?.into_iter(),
        scores.i64()?.into_iter(),
        flags.utf8()?.into_iter()
    )
    .map(|(instance, score, flag)| -> Result<(String, BestKnown)> {
        let instance = instance.context("empty instance name")?;
        let score = score
            .with_context(|| format!("invalid best score for {instance} in {path:?}"))?;
        Ok((
            instance.to_string(),
            BestKnown {
                score,
                optimal: flag == Some(OPTIMAL_MARKER),
            },
        ))
    })
    .collect()
}

pub fn read_instance_info(path: &Path) -> Result<HashMap<String, InstanceInfo>> {
    let df = read_headerless(path, b',')?;
    let (instances, vertices, edges) = (
        column_as(&df, 0, &DataType::Utf8)?,
        column_as(&df, 1, &DataType::Int64)?,
        column_as(&df, 2, &DataType::Int64)?,
    );
    izip!(
        instances.utf8()?.into_iter(),
        vertices.i64()?.into_iter(),
        edges.i64()?.into_iter()
    )
    .map(|(instance, nb_vertices, nb_edges)| -> Result<(String, InstanceInfo)> {
        let instance = instance.context("empty instance name")?;
        match (nb_vertices, nb_edges) {
            (Some(nb_vertices), Some(nb_edges)) => Ok((
                instance.to_string(),
                InstanceInfo {
                    nb_vertices,
                    nb_edges,
                },
            )),
            _ => anyhow::bail!("invalid size for {instance} in {path:?}"),
        }
    })
    .collect()
}
