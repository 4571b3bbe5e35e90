use super::{EvalStore, StoreCounts};
use crate::errors::EvalError;
use crate::model::{ContextKey, Judgment, NewJudgment, TextInstance};
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const INSTANCE_COLUMNS: &str =
    "id, instrument_code, score, level, user_profile_id, prompt_variant, interpretation_text, model";

const JUDGMENT_COLUMNS: &str =
    "id, interpretation_id, preferred_over, evaluator_name, rating, feedback, created_at";

/// SQLite-backed store. Cloning shares the same connection.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create db dir {}", parent.display()))?;
        }
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, EvalError> {
        self.conn
            .lock()
            .map_err(|_| EvalError::StoreUnavailable("connection lock poisoned".into()))
    }

    /// Inserts one instance. Returns false if the id already exists.
    pub fn insert_instance(&self, instance: &TextInstance) -> Result<bool, EvalError> {
        let conn = self.lock()?;
        insert_instance_row(&conn, instance)
    }

    /// Inserts a batch in one transaction. Returns how many rows were new.
    pub fn insert_instances(&self, instances: &[TextInstance]) -> Result<u64, EvalError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        for instance in instances {
            if insert_instance_row(&tx, instance)? {
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}

fn insert_instance_row(conn: &Connection, i: &TextInstance) -> Result<bool, EvalError> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO interpretations
            (id, instrument_code, score, level, user_profile_id, prompt_variant, interpretation_text, model)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            i.id,
            i.context.topic,
            i.context.score,
            i.level,
            i.context.profile_id,
            i.variant_id,
            i.text,
            i.model
        ],
    )?;
    Ok(n > 0)
}

fn instance_from_row(row: &Row<'_>) -> rusqlite::Result<TextInstance> {
    Ok(TextInstance {
        id: row.get(0)?,
        context: ContextKey {
            topic: row.get(1)?,
            score: row.get(2)?,
            profile_id: row.get(4)?,
        },
        level: row.get(3)?,
        variant_id: row.get(5)?,
        text: row.get(6)?,
        model: row.get(7)?,
    })
}

fn judgment_from_row(row: &Row<'_>) -> rusqlite::Result<Judgment> {
    Ok(Judgment {
        id: row.get(0)?,
        winner_instance_id: row.get(1)?,
        loser_instance_id: row.get(2)?,
        evaluator_id: row.get(3)?,
        rating: row.get(4)?,
        feedback: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn count(conn: &Connection, table: &str) -> Result<u64, EvalError> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let n: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
    Ok(n as u64)
}

impl EvalStore for Store {
    fn comparable_context_keys(&self) -> Result<Vec<ContextKey>, EvalError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT instrument_code, score, user_profile_id
             FROM interpretations
             GROUP BY instrument_code, score, user_profile_id
             HAVING COUNT(*) >= 2
             ORDER BY instrument_code, score, user_profile_id",
        )?;
        let keys = stmt
            .query_map([], |row| {
                Ok(ContextKey {
                    topic: row.get(0)?,
                    score: row.get(1)?,
                    profile_id: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn instances_in_context(&self, key: &ContextKey) -> Result<Vec<TextInstance>, EvalError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM interpretations
             WHERE instrument_code = ?1 AND score = ?2 AND user_profile_id = ?3
             ORDER BY id",
            INSTANCE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![key.topic, key.score, key.profile_id], instance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn instances(&self) -> Result<Vec<TextInstance>, EvalError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM interpretations ORDER BY id", INSTANCE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], instance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn get_instance(&self, id: &str) -> Result<Option<TextInstance>, EvalError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM interpretations WHERE id = ?1", INSTANCE_COLUMNS);
        let found = conn
            .query_row(&sql, params![id], instance_from_row)
            .optional()?;
        Ok(found)
    }

    fn append_judgment(&self, j: &NewJudgment) -> Result<Judgment, EvalError> {
        let conn = self.lock()?;
        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO evaluations
                (interpretation_id, evaluator_name, rating, preferred_over, feedback, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                j.winner_id,
                j.evaluator_id,
                j.rating,
                j.loser_id,
                j.feedback,
                created_at
            ],
        )?;
        Ok(Judgment {
            id: conn.last_insert_rowid(),
            winner_instance_id: j.winner_id.clone(),
            loser_instance_id: j.loser_id.clone(),
            evaluator_id: j.evaluator_id.clone(),
            rating: j.rating,
            feedback: j.feedback.clone(),
            created_at,
        })
    }

    fn judgments(&self) -> Result<Vec<Judgment>, EvalError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM evaluations ORDER BY id", JUDGMENT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], judgment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn counts(&self) -> Result<StoreCounts, EvalError> {
        let conn = self.lock()?;
        Ok(StoreCounts {
            instances: count(&conn, "interpretations")?,
            judgments: count(&conn, "evaluations")?,
        })
    }

    fn reset(&self) -> Result<StoreCounts, EvalError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let before = StoreCounts {
            instances: count(&tx, "interpretations")?,
            judgments: count(&tx, "evaluations")?,
        };
        // Dependents first: evaluations reference interpretations.
        tx.execute("DELETE FROM evaluations", [])?;
        tx.execute("DELETE FROM interpretations", [])?;
        tx.commit()?;

        tracing::warn!(
            event = "store_reset",
            instances = before.instances,
            judgments = before.judgments,
            "deleted all judgments and instances"
        );
        Ok(before)
    }
}
