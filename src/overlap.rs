//! Cross-referencing of significant Pearson and Spearman results.

use crate::testing::CorrelationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An enzyme found significant under both correlation methods.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRecord {
    pub enzyme: String,
    pub pearson: CorrelationResult,
    pub spearman: CorrelationResult,
}

/// Flat row layout of `enzyme_overlap.tsv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapRow {
    #[serde(rename = "Enzyme")]
    pub enzyme: String,
    #[serde(rename = "Pearson_Correlation")]
    pub pearson_correlation: f64,
    #[serde(rename = "Pearson_t_value")]
    pub pearson_t_value: f64,
    #[serde(rename = "Pearson_p_value")]
    pub pearson_p_value: f64,
    #[serde(rename = "Pearson_conf_lower")]
    pub pearson_conf_lower: f64,
    #[serde(rename = "Pearson_conf_upper")]
    pub pearson_conf_upper: f64,
    #[serde(rename = "Spearman_Correlation")]
    pub spearman_correlation: f64,
    #[serde(rename = "Spearman_t_value")]
    pub spearman_t_value: f64,
    #[serde(rename = "Spearman_p_value")]
    pub spearman_p_value: f64,
    #[serde(rename = "Spearman_conf_lower")]
    pub spearman_conf_lower: f64,
    #[serde(rename = "Spearman_conf_upper")]
    pub spearman_conf_upper: f64,
}

impl From<&OverlapRecord> for OverlapRow {
    fn from(record: &OverlapRecord) -> Self {
        OverlapRow {
            enzyme: record.enzyme.clone(),
            pearson_correlation: record.pearson.correlation,
            pearson_t_value: record.pearson.t_value,
            pearson_p_value: record.pearson.p_value,
            pearson_conf_lower: record.pearson.conf_lower,
            pearson_conf_upper: record.pearson.conf_upper,
            spearman_correlation: record.spearman.correlation,
            spearman_t_value: record.spearman.t_value,
            spearman_p_value: record.spearman.p_value,
            spearman_conf_lower: record.spearman.conf_lower,
            spearman_conf_upper: record.spearman.conf_upper,
        }
    }
}

/// Find the enzymes present in both significant sets.
///
/// The output follows the order of `spearman`. When an enzyme name occurs more than once in
/// `pearson`, the last occurrence is used.
pub fn find_overlap(
    pearson: &[CorrelationResult],
    spearman: &[CorrelationResult],
) -> Vec<OverlapRecord> {
    if pearson.is_empty() || spearman.is_empty() {
        return Vec::new();
    }

    let pearson_data: HashMap<&str, &CorrelationResult> = pearson
        .iter()
        .map(|result| (result.enzyme.as_str(), result))
        .collect();

    spearman
        .iter()
        .filter_map(|s| {
            pearson_data.get(s.enzyme.as_str()).map(|&p| OverlapRecord {
                enzyme: s.enzyme.clone(),
                pearson: p.clone(),
                spearman: s.clone(),
            })
        })
        .collect()
}
