use blindpair_core::model::JudgmentInput;
use blindpair_core::storage::Store;
use blindpair_core::{compute_stats, EvalError, EvalStore, JudgmentRecorder, PairSampler};
use std::sync::Arc;

mod common;
use common::{instance, memory_store, phq};

/// I1 -> A, I2 -> B, I3 -> A in one context; judgments I1>I2, I3>I2, tie on I1.
fn seed(store: &Store) {
    let recorder = JudgmentRecorder::new(Arc::new(store.clone()));
    recorder
        .record(JudgmentInput::decisive("I1", "I2", "ann").with_rating(4))
        .unwrap();
    recorder
        .record(JudgmentInput::decisive("I3", "I2", "bob"))
        .unwrap();
    recorder.record(JudgmentInput::tie("I1", "ann")).unwrap();
}

fn three_instances() -> Vec<blindpair_core::model::TextInstance> {
    let key = phq(12, 1);
    vec![
        instance("I1", "A", &key),
        instance("I2", "B", &key),
        instance("I3", "A", &key),
    ]
}

#[test]
fn test_worked_example_tallies() {
    let store = memory_store(&three_instances());
    seed(&store);

    let report = compute_stats(&store).unwrap();
    assert_eq!(report.total_judgments, 3);
    assert_eq!(report.excluded_dangling, 0);

    let a = report.variant("A").unwrap();
    let b = report.variant("B").unwrap();
    assert_eq!((a.wins, a.losses, a.ties), (2, 0, 1));
    assert_eq!((b.wins, b.losses, b.ties), (0, 2, 0));
    assert_eq!(a.win_rate, Some(100.0));
    assert_eq!(b.win_rate, Some(0.0));

    let ab = report.cell("A", "B").unwrap();
    assert_eq!((ab.wins, ab.losses), (2, 0));
    assert_eq!(report.cell("B", "A").unwrap().wins, 0);

    let order: Vec<&str> = report.ranking.iter().map(|r| r.variant.as_str()).collect();
    assert_eq!(order, vec!["A", "B"]);
    assert_eq!(report.ranking[0].h2h_matches, 2);
}

#[test]
fn test_wins_equal_losses_across_variants() {
    let store = memory_store(&three_instances());
    seed(&store);
    let report = compute_stats(&store).unwrap();

    let wins: u64 = report.variants.iter().map(|v| v.wins).sum();
    let losses: u64 = report.variants.iter().map(|v| v.losses).sum();
    assert_eq!(wins, losses);
}

#[test]
fn test_variant_without_judgments_not_ranked() {
    let key = phq(12, 1);
    let mut pool = three_instances();
    pool.push(instance("I4", "C", &key));
    let store = memory_store(&pool);
    seed(&store);

    let report = compute_stats(&store).unwrap();
    let c = report.variant("C").unwrap();
    assert_eq!(c.total, 0);
    assert_eq!(c.win_rate, None);
    assert!(report.ranking.iter().all(|r| r.variant != "C"));
    assert_eq!(report.ranking.len(), 2);
}

#[test]
fn test_deleted_instance_excludes_its_judgments() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("eval.db");
    let store = Store::open(&db).unwrap();
    store.init_schema().unwrap();
    store.insert_instances(&three_instances()).unwrap();
    seed(&store);

    // Remove I3 behind the store's back.
    {
        let raw = rusqlite::Connection::open(&db).unwrap();
        raw.execute("PRAGMA foreign_keys = OFF", []).unwrap();
        raw.execute("DELETE FROM interpretations WHERE id = 'I3'", [])
            .unwrap();
    }

    let report = compute_stats(&store).unwrap();
    assert_eq!(report.total_judgments, 3);
    assert_eq!(report.excluded_dangling, 1);
    let a = report.variant("A").unwrap();
    let b = report.variant("B").unwrap();
    assert_eq!((a.wins, a.ties), (1, 1));
    assert_eq!(b.losses, 1);
    assert_eq!(report.cell("A", "B").unwrap().wins, 1);
}

#[test]
fn test_repeated_reads_are_identical() {
    let store = memory_store(&three_instances());
    seed(&store);

    let first = serde_json::to_string(&compute_stats(&store).unwrap()).unwrap();
    let second = serde_json::to_string(&compute_stats(&store).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.counts().unwrap().judgments, 3);
}

#[test]
fn test_new_judgment_visible_on_next_read() {
    let store = memory_store(&three_instances());
    let recorder = JudgmentRecorder::new(Arc::new(store.clone()));
    assert!(compute_stats(&store).unwrap().is_empty());

    recorder
        .record(JudgmentInput::decisive("I2", "I1", "cat"))
        .unwrap();
    let report = compute_stats(&store).unwrap();
    assert_eq!(report.variant("B").unwrap().wins, 1);
    assert_eq!(report.evaluators[0].evaluator, "cat");
}

#[test]
fn test_reset_empties_everything() {
    let store = memory_store(&three_instances());
    seed(&store);

    let removed = store.reset().unwrap();
    assert_eq!(removed.instances, 3);
    assert_eq!(removed.judgments, 3);

    assert!(store.counts().unwrap().is_empty());
    let report = compute_stats(&store).unwrap();
    assert_eq!(report.total_judgments, 0);
    assert!(report.variants.is_empty());
    assert!(report.ranking.is_empty());

    let sampler = PairSampler::new(Arc::new(store.clone()));
    assert!(matches!(
        sampler.sample_pair(),
        Err(EvalError::NoComparablePair)
    ));

    // Reset on an empty store is a no-op, not an error.
    assert!(store.reset().unwrap().is_empty());
}
