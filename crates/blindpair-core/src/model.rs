use serde::{Deserialize, Serialize};
use std::fmt;

/// Groups instances that may be compared with each other.
///
/// Two instances are comparable iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub topic: String,
    pub score: i64,
    pub profile_id: i64,
}

impl ContextKey {
    pub fn new(topic: impl Into<String>, score: i64, profile_id: i64) -> Self {
        Self {
            topic: topic.into(),
            score,
            profile_id,
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | score {} | profile {}",
            self.topic, self.score, self.profile_id
        )
    }
}

/// One generated candidate text. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInstance {
    pub id: String,
    pub context: ContextKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub variant_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Row shape produced by the generation pipeline, keyed by the
/// `interpretations` column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub instrument_code: String,
    pub score: i64,
    #[serde(default)]
    pub level: Option<String>,
    pub user_profile_id: i64,
    pub prompt_variant: String,
    pub interpretation_text: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl InstanceRow {
    /// Converts the row, deriving a content fingerprint id when none is given.
    pub fn into_instance(self) -> TextInstance {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => crate::fingerprint::instance_id(
                &self.instrument_code,
                self.score,
                self.user_profile_id,
                &self.prompt_variant,
                &self.interpretation_text,
            ),
        };
        TextInstance {
            id,
            context: ContextKey::new(self.instrument_code, self.score, self.user_profile_id),
            level: self.level,
            variant_id: self.prompt_variant,
            text: self.interpretation_text,
            model: self.model,
        }
    }
}

/// One recorded human decision.
///
/// `loser_instance_id` is `None` for a tie. Variant identity is never stored
/// here; it is resolved through the instance table at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub id: i64,
    pub winner_instance_id: String,
    pub loser_instance_id: Option<String>,
    pub evaluator_id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub created_at: String,
}

impl Judgment {
    pub fn is_tie(&self) -> bool {
        self.loser_instance_id.is_none()
    }
}

/// Validated judgment ready to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJudgment {
    pub winner_id: String,
    pub loser_id: Option<String>,
    pub evaluator_id: String,
    pub rating: u8,
    pub feedback: Option<String>,
}

/// Neutral rating stored for ties.
pub const TIE_RATING: u8 = 3;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// What an evaluator submits for one displayed pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgmentInput {
    pub winner_id: String,
    pub loser_id: Option<String>,
    pub evaluator_id: String,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
}

impl JudgmentInput {
    pub fn decisive(
        winner_id: impl Into<String>,
        loser_id: impl Into<String>,
        evaluator_id: impl Into<String>,
    ) -> Self {
        Self {
            winner_id: winner_id.into(),
            loser_id: Some(loser_id.into()),
            evaluator_id: evaluator_id.into(),
            rating: None,
            feedback: None,
        }
    }

    pub fn tie(winner_id: impl Into<String>, evaluator_id: impl Into<String>) -> Self {
        Self {
            winner_id: winner_id.into(),
            loser_id: None,
            evaluator_id: evaluator_id.into(),
            rating: None,
            feedback: None,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}
