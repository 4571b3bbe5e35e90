//! Aggregation engine: folds the judgment log into per-variant tallies, a
//! head-to-head matrix and a pairwise ranking.
//!
//! Judgments reference instance ids only. Variant identity is resolved
//! through the current instance table on every read (judgment -> instance ->
//! variant); it is never cached on the judgment. A judgment whose instances
//! no longer resolve is excluded from the tallies and counted in
//! `excluded_dangling`, never raised as an error.

pub mod model;
pub mod ranking;

pub use model::{
    percentage, AggregateReport, EvaluatorCount, HeadToHeadCell, RankEntry, TopicBreakdown,
    TopicVariantRecord, VariantTally,
};

use crate::errors::EvalError;
use crate::model::{Judgment, TextInstance};
use crate::storage::EvalStore;
use ranking::HeadToHead;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    wins: u64,
    losses: u64,
    ties: u64,
}

/// Reads the store fresh and aggregates. Pure read; safe from any number of
/// concurrent callers.
pub fn compute_stats(store: &dyn EvalStore) -> Result<AggregateReport, EvalError> {
    let instances = store.instances()?;
    let judgments = store.judgments()?;
    let report = aggregate(&instances, &judgments);
    tracing::debug!(
        event = "aggregate_computed",
        instances = instances.len(),
        judgments = report.total_judgments,
        excluded_dangling = report.excluded_dangling,
        ranked = report.ranking.len()
    );
    Ok(report)
}

pub fn aggregate(instances: &[TextInstance], judgments: &[Judgment]) -> AggregateReport {
    let lookup: HashMap<&str, &TextInstance> =
        instances.iter().map(|i| (i.id.as_str(), i)).collect();

    let mut tallies: BTreeMap<String, Counts> = instances
        .iter()
        .map(|i| (i.variant_id.clone(), Counts::default()))
        .collect();
    let mut h2h = HeadToHead::default();
    let mut evaluators: BTreeMap<&str, u64> = BTreeMap::new();
    let mut topics: BTreeMap<&str, BTreeMap<&str, (u64, u64)>> = BTreeMap::new();
    let mut excluded_dangling = 0;
    let mut same_variant = 0;

    for j in judgments {
        *evaluators.entry(j.evaluator_id.as_str()).or_default() += 1;

        let Some(&winner) = lookup.get(j.winner_instance_id.as_str()) else {
            excluded_dangling += 1;
            tracing::debug!(
                event = "dangling_judgment_excluded",
                judgment_id = j.id,
                missing = %j.winner_instance_id
            );
            continue;
        };

        let Some(loser_id) = &j.loser_instance_id else {
            tallies.entry(winner.variant_id.clone()).or_default().ties += 1;
            continue;
        };

        let Some(&loser) = lookup.get(loser_id.as_str()) else {
            excluded_dangling += 1;
            tracing::debug!(
                event = "dangling_judgment_excluded",
                judgment_id = j.id,
                missing = %loser_id
            );
            continue;
        };

        if winner.variant_id == loser.variant_id {
            same_variant += 1;
            continue;
        }

        tallies.entry(winner.variant_id.clone()).or_default().wins += 1;
        tallies.entry(loser.variant_id.clone()).or_default().losses += 1;
        h2h.record(&winner.variant_id, &loser.variant_id);

        let per_topic = topics.entry(winner.context.topic.as_str()).or_default();
        per_topic.entry(winner.variant_id.as_str()).or_default().0 += 1;
        per_topic.entry(loser.variant_id.as_str()).or_default().1 += 1;
    }

    let variant_ids: Vec<String> = tallies.keys().cloned().collect();

    let variants = tallies
        .into_iter()
        .map(|(variant, c)| {
            let total = c.wins + c.losses;
            VariantTally {
                variant,
                wins: c.wins,
                losses: c.losses,
                ties: c.ties,
                total,
                win_rate: percentage(c.wins, total),
            }
        })
        .collect();

    let mut evaluators: Vec<EvaluatorCount> = evaluators
        .into_iter()
        .map(|(evaluator, judgments)| EvaluatorCount {
            evaluator: evaluator.to_string(),
            judgments,
        })
        .collect();
    evaluators.sort_by(|a, b| {
        b.judgments
            .cmp(&a.judgments)
            .then_with(|| a.evaluator.cmp(&b.evaluator))
    });

    AggregateReport {
        schema_version: model::REPORT_SCHEMA_VERSION,
        total_judgments: judgments.len() as u64,
        excluded_dangling,
        same_variant,
        evaluators,
        variants,
        head_to_head: h2h.matrix(&variant_ids),
        ranking: h2h.rank(&variant_ids),
        topics: topic_breakdown(topics),
    }
}

fn topic_breakdown(topics: BTreeMap<&str, BTreeMap<&str, (u64, u64)>>) -> Vec<TopicBreakdown> {
    topics
        .into_iter()
        .map(|(topic, per_variant)| {
            let mut variants: Vec<TopicVariantRecord> = per_variant
                .into_iter()
                .map(|(variant, (wins, losses))| TopicVariantRecord {
                    variant: variant.to_string(),
                    wins,
                    losses,
                    win_rate: percentage(wins, wins + losses),
                })
                .collect();
            variants.sort_by(|a, b| {
                ranking::cmp_ratio_desc(a.wins, a.wins + a.losses, b.wins, b.wins + b.losses)
                    .then_with(|| a.variant.cmp(&b.variant))
            });
            TopicBreakdown {
                topic: topic.to_string(),
                variants,
            }
        })
        .collect()
}
