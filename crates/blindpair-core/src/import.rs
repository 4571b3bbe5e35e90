use crate::model::{InstanceRow, TextInstance};
use crate::storage::Store;
use anyhow::Context;
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub read: u64,
    pub inserted: u64,
    /// Rows whose id was already present.
    pub skipped: u64,
}

/// Parses generation pipeline output: one `interpretations` row per line.
/// Blank lines are ignored.
pub fn parse_jsonl<R: BufRead>(reader: R) -> anyhow::Result<Vec<TextInstance>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: InstanceRow =
            serde_json::from_str(&line).with_context(|| format!("line {}: parse error", i + 1))?;
        if row.prompt_variant.trim().is_empty() {
            anyhow::bail!("line {}: prompt_variant is empty", i + 1);
        }
        out.push(row.into_instance());
    }
    Ok(out)
}

pub fn import_jsonl(store: &Store, path: &Path) -> anyhow::Result<ImportStats> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let instances = parse_jsonl(std::io::BufReader::new(file))?;
    let inserted = store.insert_instances(&instances)?;
    let stats = ImportStats {
        read: instances.len() as u64,
        inserted,
        skipped: instances.len() as u64 - inserted,
    };
    tracing::info!(
        event = "instances_imported",
        path = %path.display(),
        read = stats.read,
        inserted = stats.inserted,
        skipped = stats.skipped
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jsonl_derives_missing_ids() {
        let input = r#"
{"instrument_code":"PHQ-9","score":12,"level":"moderate","user_profile_id":1,"prompt_variant":"basic","interpretation_text":"one","model":"gpt-4o"}

{"id":"fixed","instrument_code":"PHQ-9","score":12,"user_profile_id":1,"prompt_variant":"full","interpretation_text":"two"}
"#;
        let rows = parse_jsonl(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.len(), 32);
        assert_eq!(rows[0].level.as_deref(), Some("moderate"));
        assert_eq!(rows[1].id, "fixed");
        assert_eq!(rows[0].context, rows[1].context);
    }

    #[test]
    fn test_parse_jsonl_reports_line() {
        let err = parse_jsonl("{}\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
