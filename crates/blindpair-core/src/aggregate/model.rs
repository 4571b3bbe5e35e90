use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Everything the reporting surface shows. Contains no timestamps, so two
/// reads over unchanged store contents compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub schema_version: u32,
    pub total_judgments: u64,
    /// Judgments whose winner or loser no longer resolves to an instance.
    pub excluded_dangling: u64,
    /// Decisive judgments between two instances of the same variant.
    pub same_variant: u64,
    pub evaluators: Vec<EvaluatorCount>,
    /// Pooled win/loss/tie table, ordered by variant id.
    pub variants: Vec<VariantTally>,
    /// Full matrix over ordered pairs of distinct variants.
    pub head_to_head: Vec<HeadToHeadCell>,
    /// Pairwise ranking. Variants without head-to-head matches are absent.
    pub ranking: Vec<RankEntry>,
    pub topics: Vec<TopicBreakdown>,
}

impl AggregateReport {
    pub fn variant(&self, id: &str) -> Option<&VariantTally> {
        self.variants.iter().find(|v| v.variant == id)
    }

    pub fn cell(&self, variant: &str, opponent: &str) -> Option<&HeadToHeadCell> {
        self.head_to_head
            .iter()
            .find(|c| c.variant == variant && c.opponent == opponent)
    }

    pub fn is_empty(&self) -> bool {
        self.total_judgments == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorCount {
    pub evaluator: String,
    pub judgments: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTally {
    pub variant: String,
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
    /// wins + losses; ties never enter the denominator.
    pub total: u64,
    /// Percentage, `None` when `total == 0`.
    pub win_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadCell {
    pub variant: String,
    pub opponent: String,
    /// Judgments where `variant` beat `opponent`.
    pub wins: u64,
    /// Judgments where `opponent` beat `variant`.
    pub losses: u64,
    pub win_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: usize,
    pub variant: String,
    pub h2h_wins: u64,
    pub h2h_matches: u64,
    pub ratio: f64,
    /// Distinct opponents met at least once.
    pub opponents: usize,
    /// Mean of the per-opponent win ratios. Informational, not used for ordering.
    pub mean_opponent_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBreakdown {
    pub topic: String,
    /// Ordered by win rate descending, then variant id.
    pub variants: Vec<TopicVariantRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicVariantRecord {
    pub variant: String,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: Option<f64>,
}

/// `part / whole * 100`, or `None` when there is no data.
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}
