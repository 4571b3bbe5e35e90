use super::{fmt_pct, NO_DATA};
use crate::aggregate::AggregateReport;

pub fn render_markdown(r: &AggregateReport, generated_at: &str) -> String {
    let mut md = String::new();

    md.push_str("# Blind Pairwise Evaluation Report\n\n");
    md.push_str(&format!(
        "**Generated**: {} | **Judgments**: {} | **Evaluators**: {}\n\n",
        generated_at,
        r.total_judgments,
        r.evaluators.len()
    ));

    if r.excluded_dangling > 0 || r.same_variant > 0 {
        md.push_str("### Notes\n");
        if r.excluded_dangling > 0 {
            md.push_str(&format!(
                "- {} judgment(s) excluded: referenced instance no longer exists\n",
                r.excluded_dangling
            ));
        }
        if r.same_variant > 0 {
            md.push_str(&format!(
                "- {} same-variant judgment(s) not tallied\n",
                r.same_variant
            ));
        }
        md.push('\n');
    }

    md.push_str("### Evaluators\n\n| Evaluator | Judgments |\n|---|---|\n");
    for e in &r.evaluators {
        md.push_str(&format!("| {} | {} |\n", e.evaluator, e.judgments));
    }

    md.push_str("\n### Pooled Win Rate\n\n");
    md.push_str("| Variant | Wins | Losses | Ties | Win Rate |\n|---|---|---|---|---|\n");
    for v in &r.variants {
        md.push_str(&format!(
            "| `{}` | {} | {} | {} | {} |\n",
            v.variant,
            v.wins,
            v.losses,
            v.ties,
            fmt_pct(v.win_rate)
        ));
    }

    let names: Vec<&str> = r.variants.iter().map(|v| v.variant.as_str()).collect();
    if names.len() > 1 {
        md.push_str("\n### Head-to-Head (row beats column)\n\n| |");
        for n in &names {
            md.push_str(&format!(" `{}` |", n));
        }
        md.push_str("\n|---|");
        md.push_str(&"---|".repeat(names.len()));
        md.push('\n');
        for row in &names {
            md.push_str(&format!("| `{}` |", row));
            for col in &names {
                let cell = if row == col {
                    NO_DATA.to_string()
                } else {
                    fmt_pct(r.cell(row, col).and_then(|c| c.win_pct))
                };
                md.push_str(&format!(" {} |", cell));
            }
            md.push('\n');
        }
    }

    md.push_str("\n### Ranking\n\n| Rank | Variant | H2H Wins | H2H Matches | Ratio |\n|---|---|---|---|---|\n");
    for e in &r.ranking {
        md.push_str(&format!(
            "| {} | `{}` | {} | {} | {:.1}% |\n",
            e.rank,
            e.variant,
            e.h2h_wins,
            e.h2h_matches,
            e.ratio * 100.0
        ));
    }

    md
}
