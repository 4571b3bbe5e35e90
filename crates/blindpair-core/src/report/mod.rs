pub mod console;
pub mod markdown;

use crate::aggregate::AggregateReport;
use crate::config::ReportFormat;

/// Placeholder shown wherever a ratio has a zero denominator.
pub const NO_DATA: &str = "-";

pub fn fmt_pct(v: Option<f64>) -> String {
    v.map(|p| format!("{:.1}%", p))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Renders the report; `generated_at` is stamped by the caller so the report
/// itself stays comparable across reads.
pub fn render(
    report: &AggregateReport,
    format: ReportFormat,
    generated_at: &str,
) -> anyhow::Result<String> {
    Ok(match format {
        ReportFormat::Text => console::render_text(report, generated_at),
        ReportFormat::Md => markdown::render_markdown(report, generated_at),
        ReportFormat::Json => {
            let mut v = serde_json::to_value(report)?;
            v["generated_at"] = serde_json::json!(generated_at);
            serde_json::to_string_pretty(&v)?
        }
    })
}
