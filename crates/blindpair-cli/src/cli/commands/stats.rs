use super::{ensure_parent_dir, exit_codes, open_session};
use crate::cli::args::StatsArgs;
use anyhow::Context;
use blindpair_core::config::ReportFormat;
use blindpair_core::{compute_stats, report};

pub fn cmd_stats(args: StatsArgs) -> anyhow::Result<i32> {
    let session = open_session(&args.store)?;

    let format = match args.format.as_deref().map(str::parse::<ReportFormat>) {
        None => session.cfg.report.format,
        Some(Ok(f)) => f,
        Some(Err(e)) => {
            eprintln!("config error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let report = compute_stats(&session.store)?;
    let generated_at = chrono::Utc::now().to_rfc3339();
    let rendered = report::render(&report, format, &generated_at)?;

    match &args.out {
        Some(path) => {
            ensure_parent_dir(path)?;
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(exit_codes::OK)
}
