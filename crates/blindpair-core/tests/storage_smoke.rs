use blindpair_core::model::{ContextKey, JudgmentInput};
use blindpair_core::storage::{EvalStore, Store};
use blindpair_core::JudgmentRecorder;
use std::sync::Arc;
use tempfile::tempdir;

mod common;

#[test]
fn test_storage_smoke_lifecycle() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("nested").join("eval.db");

    let store = Store::open(&db_path)?;
    store.init_schema()?;
    // schema init is idempotent
    store.init_schema()?;

    let key = ContextKey::new("GAD-7", 10, 2);
    let a = common::instance("i1", "basic", &key);
    let b = common::instance("i2", "full", &key);
    assert!(store.insert_instance(&a)?);
    assert!(!store.insert_instance(&a)?);
    assert_eq!(store.insert_instances(&[a.clone(), b.clone()])?, 1);

    assert_eq!(store.comparable_context_keys()?, vec![key.clone()]);
    assert_eq!(store.instances_in_context(&key)?, vec![a.clone(), b.clone()]);
    assert_eq!(store.get_instance("i2")?, Some(b));
    assert_eq!(store.get_instance("nope")?, None);

    let recorder = JudgmentRecorder::new(Arc::new(store.clone()));
    let j = recorder.record(JudgmentInput::decisive("i2", "i1", "ann").with_rating(4))?;
    assert_eq!(j.rating, 4);

    // Verify via raw SQL against the documented column names
    let conn = rusqlite::Connection::open(&db_path)?;
    let (winner, loser, evaluator, rating): (String, Option<String>, String, i64) = conn
        .query_row(
            "SELECT interpretation_id, preferred_over, evaluator_name, rating FROM evaluations",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?;
    assert_eq!(winner, "i2");
    assert_eq!(loser.as_deref(), Some("i1"));
    assert_eq!(evaluator, "ann");
    assert_eq!(rating, 4);

    let variant: String = conn.query_row(
        "SELECT prompt_variant FROM interpretations WHERE id = 'i1'",
        [],
        |r| r.get(0),
    )?;
    assert_eq!(variant, "basic");

    let counts = store.counts()?;
    assert_eq!((counts.instances, counts.judgments), (2, 1));
    Ok(())
}

#[test]
fn test_foreign_keys_reject_unknown_instance_at_store_level() -> anyhow::Result<()> {
    let store = common::memory_store(&[]);
    let res = store.append_judgment(&blindpair_core::model::NewJudgment {
        winner_id: "ghost".into(),
        loser_id: None,
        evaluator_id: "ann".into(),
        rating: 3,
        feedback: None,
    });
    let err = res.unwrap_err();
    assert!(matches!(err, blindpair_core::EvalError::InvalidJudgment(_)));
    assert!(err.is_rejection());
    assert_eq!(store.counts()?.judgments, 0);
    Ok(())
}

#[test]
fn test_instance_reset_after_validation_is_rejected_not_unavailable() -> anyhow::Result<()> {
    let key = ContextKey::new("PHQ-9", 12, 1);
    let store = common::memory_store(&[
        common::instance("i1", "basic", &key),
        common::instance("i2", "full", &key),
    ]);
    // Validation saw both ids; a reset then removes them before the append.
    assert!(store.get_instance("i1")?.is_some());
    store.reset()?;
    let err = store
        .append_judgment(&blindpair_core::model::NewJudgment {
            winner_id: "i1".into(),
            loser_id: Some("i2".into()),
            evaluator_id: "ann".into(),
            rating: 4,
            feedback: None,
        })
        .unwrap_err();
    assert!(matches!(err, blindpair_core::EvalError::InvalidJudgment(_)));
    Ok(())
}

#[test]
fn test_singleton_contexts_are_not_comparable() -> anyhow::Result<()> {
    let pair = ContextKey::new("PHQ-9", 12, 1);
    let lonely = ContextKey::new("PHQ-9", 20, 1);
    let store = common::memory_store(&[
        common::instance("a1", "basic", &pair),
        common::instance("a2", "full", &pair),
        common::instance("b1", "basic", &lonely),
    ]);
    assert_eq!(store.comparable_context_keys()?, vec![pair]);
    Ok(())
}
