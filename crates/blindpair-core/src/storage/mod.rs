pub mod schema;
pub mod store;

use crate::errors::EvalError;
use crate::model::{ContextKey, Judgment, NewJudgment, TextInstance};
use serde::Serialize;

pub use store::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub instances: u64,
    pub judgments: u64,
}

impl StoreCounts {
    pub fn is_empty(&self) -> bool {
        self.instances == 0 && self.judgments == 0
    }
}

/// Shared evaluation store: the comparison pool plus the judgment log.
///
/// Instances are write-once; judgments are append-only. `reset` is the only
/// bulk mutation and must not run concurrently with evaluation sessions.
pub trait EvalStore: Send + Sync {
    /// Context keys holding at least two instances, in a stable order.
    /// Singleton keys are not sample-able and never appear here.
    fn comparable_context_keys(&self) -> Result<Vec<ContextKey>, EvalError>;

    /// All instances sharing `key`, ordered by id.
    fn instances_in_context(&self, key: &ContextKey) -> Result<Vec<TextInstance>, EvalError>;

    fn instances(&self) -> Result<Vec<TextInstance>, EvalError>;

    fn get_instance(&self, id: &str) -> Result<Option<TextInstance>, EvalError>;

    /// Appends one judgment. Visible to `judgments` as soon as this returns.
    fn append_judgment(&self, judgment: &NewJudgment) -> Result<Judgment, EvalError>;

    /// Every recorded judgment in insertion order.
    fn judgments(&self) -> Result<Vec<Judgment>, EvalError>;

    fn counts(&self) -> Result<StoreCounts, EvalError>;

    /// Deletes all judgments, then all instances. Returns the counts that
    /// were present before deletion.
    fn reset(&self) -> Result<StoreCounts, EvalError>;
}
