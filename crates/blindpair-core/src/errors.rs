use thiserror::Error;

/// Configuration failure with a human readable reason.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Error)]
pub enum EvalError {
    /// No context key in the pool has two or more instances.
    #[error("no comparable pair: nothing to evaluate")]
    NoComparablePair,

    #[error("invalid judgment: {0}")]
    InvalidJudgment(String),

    #[error("invalid judgment: unknown instance '{0}'")]
    UnknownInstance(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl EvalError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidJudgment(reason.into())
    }

    /// True for errors caused by caller input rather than the store.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidJudgment(_) | Self::UnknownInstance(_))
    }
}

impl From<rusqlite::Error> for EvalError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            // A judgment referencing an instance removed after validation.
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::InvalidJudgment(e.to_string())
            }
            _ => Self::StoreUnavailable(e.to_string()),
        }
    }
}
