pub mod aggregate;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod import;
pub mod judgments;
pub mod model;
pub mod report;
pub mod sampler;
pub mod storage;

pub use aggregate::{compute_stats, AggregateReport};
pub use errors::EvalError;
pub use judgments::JudgmentRecorder;
pub use sampler::PairSampler;
pub use storage::{EvalStore, Store};
