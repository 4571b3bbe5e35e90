use super::{exit_codes, open_session};
use crate::cli::args::ImportArgs;

pub fn cmd_import(args: ImportArgs) -> anyhow::Result<i32> {
    let session = open_session(&args.store)?;
    let stats = match blindpair_core::import::import_jsonl(&session.store, &args.input) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("import failed: {e:#}");
            return Ok(exit_codes::INVALID_INPUT);
        }
    };
    println!(
        "imported {} of {} interpretations ({} already present)",
        stats.inserted, stats.read, stats.skipped
    );
    Ok(exit_codes::OK)
}
