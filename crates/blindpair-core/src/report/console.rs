use super::{fmt_pct, NO_DATA};
use crate::aggregate::AggregateReport;
use std::fmt::Write;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn render_text(report: &AggregateReport, generated_at: &str) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut s, report, generated_at);
    s
}

fn write_text(s: &mut String, r: &AggregateReport, generated_at: &str) -> std::fmt::Result {
    writeln!(s, "Blind pairwise evaluation summary ({})", generated_at)?;
    writeln!(s, "{}", RULE)?;
    writeln!(s, "Judgments: {}", r.total_judgments)?;
    writeln!(s, "Evaluators: {}", r.evaluators.len())?;
    if r.excluded_dangling > 0 {
        writeln!(
            s,
            "Excluded: {} judgment(s) reference deleted instances",
            r.excluded_dangling
        )?;
    }
    if r.same_variant > 0 {
        writeln!(s, "Same-variant judgments (not tallied): {}", r.same_variant)?;
    }

    if r.is_empty() {
        writeln!(s, "\nNo judgments recorded yet.")?;
        return Ok(());
    }

    writeln!(s, "\nEvaluators:")?;
    for e in &r.evaluators {
        writeln!(s, "  - {}: {}", e.evaluator, e.judgments)?;
    }

    writeln!(s, "\n{}", RULE)?;
    writeln!(s, "Pooled win rate")?;
    writeln!(
        s,
        "{:<20} {:>6} {:>6} {:>6} {:>9}",
        "Variant", "Wins", "Losses", "Ties", "Win rate"
    )?;
    for v in &r.variants {
        writeln!(
            s,
            "{:<20} {:>6} {:>6} {:>6} {:>9}",
            v.variant,
            v.wins,
            v.losses,
            v.ties,
            fmt_pct(v.win_rate)
        )?;
    }

    let played: Vec<_> = r
        .head_to_head
        .iter()
        .filter(|c| c.variant < c.opponent && c.wins + c.losses > 0)
        .collect();
    if !played.is_empty() {
        writeln!(s, "\n{}", RULE)?;
        writeln!(s, "Head-to-head")?;
        for c in played {
            writeln!(
                s,
                "  {} vs {}: {}-{} ({} for {})",
                c.variant,
                c.opponent,
                c.wins,
                c.losses,
                fmt_pct(c.win_pct),
                c.variant
            )?;
        }
    }

    writeln!(s, "\n{}", RULE)?;
    writeln!(s, "Ranking (head-to-head wins / matches)")?;
    if r.ranking.is_empty() {
        writeln!(s, "  {}", NO_DATA)?;
    }
    for e in &r.ranking {
        writeln!(
            s,
            "{:<4} {:<20} {:>6.1}%  ({}/{}, {} opponent(s))",
            e.rank,
            e.variant,
            e.ratio * 100.0,
            e.h2h_wins,
            e.h2h_matches,
            e.opponents
        )?;
    }

    if !r.topics.is_empty() {
        writeln!(s, "\n{}", RULE)?;
        writeln!(s, "By topic")?;
        for t in &r.topics {
            writeln!(s, "  {}:", t.topic)?;
            for v in &t.variants {
                writeln!(
                    s,
                    "    {}: {} ({}-{})",
                    v.variant,
                    fmt_pct(v.win_rate),
                    v.wins,
                    v.losses
                )?;
            }
        }
    }

    let mut with_data: Vec<_> = r.variants.iter().filter(|v| v.win_rate.is_some()).collect();
    with_data.sort_by(|a, b| {
        crate::aggregate::ranking::cmp_ratio_desc(a.wins, a.total, b.wins, b.total)
            .then_with(|| a.variant.cmp(&b.variant))
    });
    if let (Some(best), Some(worst)) = (with_data.first(), with_data.last()) {
        writeln!(s, "\n{}", RULE)?;
        writeln!(s, "Best variant: {} ({})", best.variant, fmt_pct(best.win_rate))?;
        if with_data.len() > 1 {
            writeln!(
                s,
                "Weakest variant: {} ({})",
                worst.variant,
                fmt_pct(worst.win_rate)
            )?;
        }
    }
    Ok(())
}
