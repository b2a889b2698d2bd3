//! Consistency check between a chain forest and the interaction results it
//! was traced from.

use std::fmt;

use meshtrace_core::types::collections::{BTreeMap, FxHashSet};
use meshtrace_core::HttpVerb;
use serde::{Deserialize, Serialize};

use crate::chains::{ChainForest, ChainNode};
use crate::interactions::InteractionResults;

/// `(source, target, endpoint, verb)` of one API interaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiInteractionKey {
    pub source: String,
    pub target: String,
    pub endpoint: String,
    pub http_method: HttpVerb,
}

/// A service pair whose counts disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMismatch {
    pub source: String,
    pub target: String,
    pub chain_count: usize,
    pub results_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub count_mismatches: Vec<CountMismatch>,
    pub missing_in_results: Vec<ApiInteractionKey>,
    pub extra_in_results: Vec<ApiInteractionKey>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.count_mismatches.is_empty()
            && self.missing_in_results.is_empty()
            && self.extra_in_results.is_empty()
    }
}

pub fn compare(forest: &ChainForest, results: &InteractionResults) -> ConsistencyReport {
    let mut chain_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut chain_api: FxHashSet<ApiInteractionKey> = FxHashSet::default();

    for root in forest.iter() {
        for call in &root.calls {
            chain_api.insert(api_key(&root.service, call));
        }
        count_edges(root, &mut chain_counts);
    }

    let mut results_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for rel in &results.relations {
        results_counts.insert((rel.source.clone(), rel.target.clone()), rel.count);
    }
    let results_api: FxHashSet<ApiInteractionKey> = results
        .api_interactions
        .iter()
        .map(|site| ApiInteractionKey {
            source: site.source_service.clone(),
            target: site.target_service.clone(),
            endpoint: site.raw_endpoint.clone(),
            http_method: site.http_verb,
        })
        .collect();

    let mut pairs: Vec<&(String, String)> = chain_counts.keys().chain(results_counts.keys()).collect();
    pairs.sort();
    pairs.dedup();

    let count_mismatches = pairs
        .into_iter()
        .filter_map(|pair| {
            let chain_count = chain_counts.get(pair).copied().unwrap_or(0);
            let results_count = results_counts.get(pair).copied().unwrap_or(0);
            (chain_count != results_count).then(|| CountMismatch {
                source: pair.0.clone(),
                target: pair.1.clone(),
                chain_count,
                results_count,
            })
        })
        .collect();

    let mut missing_in_results: Vec<ApiInteractionKey> =
        chain_api.difference(&results_api).cloned().collect();
    missing_in_results.sort();
    let mut extra_in_results: Vec<ApiInteractionKey> =
        results_api.difference(&chain_api).cloned().collect();
    extra_in_results.sort();

    ConsistencyReport {
        count_mismatches,
        missing_in_results,
        extra_in_results,
    }
}

fn api_key(source: &str, call: &ChainNode) -> ApiInteractionKey {
    ApiInteractionKey {
        source: source.to_string(),
        target: call.service.clone(),
        endpoint: call.endpoint.clone().unwrap_or_default(),
        http_method: call.http_method.unwrap_or_default(),
    }
}

fn count_edges(node: &ChainNode, counts: &mut BTreeMap<(String, String), usize>) {
    for call in &node.calls {
        *counts
            .entry((node.service.clone(), call.service.clone()))
            .or_insert(0) += call.count.unwrap_or(1);
        count_edges(call, counts);
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Service Interaction Comparison ---")?;
        if self.count_mismatches.is_empty() {
            writeln!(f, "Service interactions are consistent.")?;
        }
        for m in &self.count_mismatches {
            writeln!(
                f,
                "Mismatch for ({}, {}): Chain={}, Results={}",
                m.source, m.target, m.chain_count, m.results_count
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- API Interaction Comparison ---")?;
        write_keys(f, "Missing in results", "No missing API interactions in results.", &self.missing_in_results)?;
        write_keys(f, "Extra in results", "No extra API interactions in results.", &self.extra_in_results)
    }
}

fn write_keys(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    empty: &str,
    keys: &[ApiInteractionKey],
) -> fmt::Result {
    if keys.is_empty() {
        return writeln!(f, "{empty}");
    }
    writeln!(f, "{heading} ({}):", keys.len())?;
    for k in keys {
        writeln!(f, "  ({}, {}, {}, {})", k.source, k.target, k.endpoint, k.http_method)?;
    }
    Ok(())
}
