use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use itertools::Itertools;
use log::warn;
use regex::Regex;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run logs of `instance` in `directory`, one per seed, sorted by seed.
pub fn discover_run_logs(directory: &Path, instance: &str) -> Result<Vec<PathBuf>> {
    discover_logs(directory, instance, "csv")
}

/// Logs of old solver versions, used when no run log is found.
pub fn discover_legacy_logs(
    directory: &Path,
    instance: &str,
) -> Result<Vec<PathBuf>> {
    discover_logs(directory, instance, "txt")
}

fn discover_logs(
    directory: &Path,
    instance: &str,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let pattern = directory.join(format!(
        "{}_[0-9]*.{extension}",
        glob::Pattern::escape(instance)
    ));
    let pattern = pattern.to_str().context("non utf8 log directory")?;
    let seed_regex = Regex::new(&format!(
        r"^{}_(\d+)$",
        regex::escape(instance)
    ))?;
    let files = glob::glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("unreadable log entry: {err}");
                None
            }
        })
        .filter_map(|path| {
            let seed = seed_index(&seed_regex, &path)?;
            Some((seed, path))
        })
        .sorted_by_key(|(seed, _)| *seed)
        .map(|(_, path)| path)
        .collect();
    Ok(files)
}

/// Numeric seed embedded in `<instance>_<seed>.<ext>`, files of other instances sharing
/// the prefix do not match.
fn seed_index(seed_regex: &Regex, path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    seed_regex.captures(stem)?.get(1)?.as_str().parse().ok()
}

pub fn parse_date(date: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date {date:?}"))
}

/// Seconds between the first and the last dated comment line of a run log.
///
/// The solver writes the search parameters (date first) before the search and the date
/// alone once the search ends.
pub fn search_duration(comments: &[&str]) -> Result<f64> {
    let dates = comments
        .iter()
        .filter_map(|line| {
            let first_field = line.trim_start_matches('#').split(',').next()?;
            parse_date(first_field).ok()
        })
        .collect_vec();
    match (dates.first(), dates.last()) {
        (Some(start), Some(end)) if dates.len() >= 2 => {
            Ok((*end - *start).num_seconds() as f64)
        }
        _ => anyhow::bail!(
            "expected a start and an end date, found {} dates",
            dates.len()
        ),
    }
}
