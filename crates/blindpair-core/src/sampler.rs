use crate::errors::EvalError;
use crate::model::{ContextKey, TextInstance};
use crate::storage::EvalStore;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// Two comparable instances in presentation order (`a` is shown first).
///
/// Holds the variant identities, so it must stay on the server side of the
/// evaluation flow. Hand [`SampledPair::blind`] to anything that displays.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPair {
    pub context: ContextKey,
    pub a: TextInstance,
    pub b: TextInstance,
}

impl SampledPair {
    pub fn blind(&self) -> BlindPair {
        BlindPair {
            context: self.context.clone(),
            level: self.a.level.clone(),
            a: BlindText::from(&self.a),
            b: BlindText::from(&self.b),
        }
    }

    /// Instance id shown under a display label.
    pub fn id_for_label(&self, label: Label) -> &str {
        match label {
            Label::A => &self.a.id,
            Label::B => &self.b.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    A,
    B,
}

/// Display-safe view of a sampled pair: no variant identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlindPair {
    pub context: ContextKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub a: BlindText,
    pub b: BlindText,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlindText {
    pub id: String,
    pub text: String,
}

impl From<&TextInstance> for BlindText {
    fn from(i: &TextInstance) -> Self {
        Self {
            id: i.id.clone(),
            text: i.text.clone(),
        }
    }
}

/// Draws comparable pairs from the pool. Stateless and read-only.
#[derive(Clone)]
pub struct PairSampler {
    store: Arc<dyn EvalStore>,
}

impl PairSampler {
    pub fn new(store: Arc<dyn EvalStore>) -> Self {
        Self { store }
    }

    pub fn sample_pair(&self) -> Result<SampledPair, EvalError> {
        self.sample_pair_with(&mut rand::thread_rng())
    }

    /// Samples with a caller supplied RNG (seeded sessions, tests).
    ///
    /// The context key is drawn uniformly over comparable keys, not over
    /// instances, so large contexts are not oversampled. Fails only when no
    /// key holds two or more instances.
    pub fn sample_pair_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SampledPair, EvalError> {
        let keys = self.store.comparable_context_keys()?;
        let key = keys.choose(rng).ok_or(EvalError::NoComparablePair)?;

        let group = self.store.instances_in_context(key)?;
        if group.len() < 2 {
            tracing::debug!(
                event = "pair_unavailable",
                context = %key,
                instances = group.len()
            );
            return Err(EvalError::NoComparablePair);
        }

        let mut picked: Vec<TextInstance> = group.choose_multiple(rng, 2).cloned().collect();
        // choose_multiple does not randomise order; flip a fair coin for it.
        if rng.gen_bool(0.5) {
            picked.swap(0, 1);
        }
        let b = picked.pop().ok_or(EvalError::NoComparablePair)?;
        let a = picked.pop().ok_or(EvalError::NoComparablePair)?;

        tracing::debug!(
            event = "pair_sampled",
            context = %key,
            a = %a.id,
            b = %b.id
        );

        Ok(SampledPair {
            context: key.clone(),
            a,
            b,
        })
    }
}
