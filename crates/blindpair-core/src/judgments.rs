use crate::errors::EvalError;
use crate::model::{Judgment, JudgmentInput, NewJudgment, MAX_RATING, MIN_RATING, TIE_RATING};
use crate::storage::EvalStore;
use std::sync::Arc;

/// Write side of the judgment log. Validates at the boundary, then appends.
#[derive(Clone)]
pub struct JudgmentRecorder {
    store: Arc<dyn EvalStore>,
}

impl JudgmentRecorder {
    pub fn new(store: Arc<dyn EvalStore>) -> Self {
        Self { store }
    }

    /// Records one decision. Nothing is persisted when validation fails.
    pub fn record(&self, input: JudgmentInput) -> Result<Judgment, EvalError> {
        let new = validate(input)?;

        if self.store.get_instance(&new.winner_id)?.is_none() {
            return Err(EvalError::UnknownInstance(new.winner_id));
        }
        if let Some(loser) = &new.loser_id {
            if self.store.get_instance(loser)?.is_none() {
                return Err(EvalError::UnknownInstance(loser.clone()));
            }
        }

        let judgment = self.store.append_judgment(&new)?;
        tracing::info!(
            event = "judgment_recorded",
            judgment_id = judgment.id,
            evaluator = %judgment.evaluator_id,
            tie = judgment.is_tie(),
            rating = judgment.rating
        );
        Ok(judgment)
    }
}

fn validate(input: JudgmentInput) -> Result<NewJudgment, EvalError> {
    let evaluator_id = input.evaluator_id.trim().to_string();
    if evaluator_id.is_empty() {
        return Err(EvalError::invalid("evaluator id is empty"));
    }
    if input.winner_id.trim().is_empty() {
        return Err(EvalError::invalid("winner id is empty"));
    }
    if input.loser_id.as_deref() == Some(input.winner_id.as_str()) {
        return Err(EvalError::invalid(format!(
            "winner and loser are the same instance '{}'",
            input.winner_id
        )));
    }

    let rating = match (&input.loser_id, input.rating) {
        (None, _) => TIE_RATING,
        (Some(_), None) => TIE_RATING,
        (Some(_), Some(r)) if (MIN_RATING..=MAX_RATING).contains(&r) => r,
        (Some(_), Some(r)) => {
            return Err(EvalError::invalid(format!(
                "rating {} outside {}..={}",
                r, MIN_RATING, MAX_RATING
            )))
        }
    };

    let feedback = input
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    Ok(NewJudgment {
        winner_id: input.winner_id,
        loser_id: input.loser_id,
        evaluator_id,
        rating,
        feedback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_rating_is_neutral() {
        let j = validate(JudgmentInput::tie("i1", "ann").with_rating(5)).unwrap();
        assert_eq!(j.rating, TIE_RATING);
        assert!(j.loser_id.is_none());
    }

    #[test]
    fn test_rejects_self_comparison() {
        let err = validate(JudgmentInput::decisive("i1", "i1", "ann")).unwrap_err();
        assert!(matches!(err, EvalError::InvalidJudgment(_)));
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let err = validate(JudgmentInput::decisive("i1", "i2", "ann").with_rating(6)).unwrap_err();
        assert!(err.is_rejection());
        let err = validate(JudgmentInput::decisive("i1", "i2", "ann").with_rating(0)).unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_trims_evaluator_and_blank_feedback() {
        let j = validate(
            JudgmentInput::decisive("i1", "i2", "  ann ")
                .with_rating(4)
                .with_feedback("   "),
        )
        .unwrap();
        assert_eq!(j.evaluator_id, "ann");
        assert_eq!(j.rating, 4);
        assert_eq!(j.feedback, None);

        let err = validate(JudgmentInput::tie("i1", "   ")).unwrap_err();
        assert!(matches!(err, EvalError::InvalidJudgment(_)));
    }
}
