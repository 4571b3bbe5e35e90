pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS interpretations (
  id TEXT PRIMARY KEY,
  instrument_code TEXT NOT NULL,
  score INTEGER NOT NULL,
  level TEXT,
  user_profile_id INTEGER NOT NULL,
  prompt_variant TEXT NOT NULL,
  interpretation_text TEXT NOT NULL,
  model TEXT
);

CREATE TABLE IF NOT EXISTS evaluations (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  interpretation_id TEXT NOT NULL REFERENCES interpretations(id),
  evaluator_name TEXT NOT NULL,
  rating INTEGER NOT NULL,
  preferred_over TEXT REFERENCES interpretations(id),
  feedback TEXT,
  created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_interpretations_context
  ON interpretations(instrument_code, score, user_profile_id);
"#;
