use super::model::{percentage, HeadToHeadCell, RankEntry};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Directed win counts: `(winner_variant, loser_variant) -> wins`.
///
/// Cells are counted independently; `(a, b)` and `(b, a)` are separate.
#[derive(Debug, Default, Clone)]
pub struct HeadToHead {
    cells: BTreeMap<(String, String), u64>,
}

impl HeadToHead {
    pub fn record(&mut self, winner: &str, loser: &str) {
        *self
            .cells
            .entry((winner.to_string(), loser.to_string()))
            .or_default() += 1;
    }

    pub fn wins(&self, variant: &str, opponent: &str) -> u64 {
        self.cells
            .get(&(variant.to_string(), opponent.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// One cell per ordered pair of distinct variants.
    pub fn matrix(&self, variants: &[String]) -> Vec<HeadToHeadCell> {
        let mut out = Vec::new();
        for a in variants {
            for b in variants.iter().filter(|b| *b != a) {
                let wins = self.wins(a, b);
                let losses = self.wins(b, a);
                out.push(HeadToHeadCell {
                    variant: a.clone(),
                    opponent: b.clone(),
                    wins,
                    losses,
                    win_pct: percentage(wins, wins + losses),
                });
            }
        }
        out
    }

    /// Ranks by head-to-head wins over head-to-head matches, descending.
    ///
    /// A variant with no matches has no ratio and is left out. Equal ratios
    /// fall back to variant id order.
    pub fn rank(&self, variants: &[String]) -> Vec<RankEntry> {
        let mut entries: Vec<RankEntry> = variants
            .iter()
            .filter_map(|a| {
                let mut wins = 0;
                let mut matches = 0;
                let mut opponents = 0;
                let mut ratio_sum = 0.0;
                for b in variants.iter().filter(|b| *b != a) {
                    let w = self.wins(a, b);
                    let n = w + self.wins(b, a);
                    if n == 0 {
                        continue;
                    }
                    wins += w;
                    matches += n;
                    opponents += 1;
                    ratio_sum += w as f64 / n as f64;
                }
                if matches == 0 {
                    return None;
                }
                Some(RankEntry {
                    rank: 0,
                    variant: a.clone(),
                    h2h_wins: wins,
                    h2h_matches: matches,
                    ratio: wins as f64 / matches as f64,
                    opponents,
                    mean_opponent_ratio: ratio_sum / opponents as f64,
                })
            })
            .collect();

        entries.sort_by(|x, y| {
            cmp_ratio_desc(x.h2h_wins, x.h2h_matches, y.h2h_wins, y.h2h_matches)
                .then_with(|| x.variant.cmp(&y.variant))
        });
        for (i, e) in entries.iter_mut().enumerate() {
            e.rank = i + 1;
        }
        entries
    }
}

/// Orders `wa/na` against `wb/nb`, higher ratio first. Exact integer
/// comparison so equal ratios tie regardless of float rounding. A zero
/// denominator sorts last.
pub fn cmp_ratio_desc(wa: u64, na: u64, wb: u64, nb: u64) -> Ordering {
    match (na, nb) {
        (0, 0) => Ordering::Equal,
        (0, _) => Ordering::Greater,
        (_, 0) => Ordering::Less,
        _ => {
            let lhs = wa as u128 * nb as u128;
            let rhs = wb as u128 * na as u128;
            rhs.cmp(&lhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_equal_ratios_break_by_variant_id() {
        let mut h = HeadToHead::default();
        // A 2/4, B 2/4 against each other
        h.record("B", "A");
        h.record("B", "A");
        h.record("A", "B");
        h.record("A", "B");
        let ranked = h.rank(&ids(&["A", "B"]));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].variant, "A");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].variant, "B");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_equal_ratio_different_sample_sizes() {
        let mut h = HeadToHead::default();
        // zeta: 1 of 3 matches won against x; alpha: 2 of 6 against y
        h.record("zeta", "x");
        h.record("x", "zeta");
        h.record("x", "zeta");
        for _ in 0..2 {
            h.record("alpha", "y");
        }
        for _ in 0..4 {
            h.record("y", "alpha");
        }
        let ranked = h.rank(&ids(&["alpha", "x", "y", "zeta"]));
        let order: Vec<&str> = ranked.iter().map(|r| r.variant.as_str()).collect();
        // x 2/3, y 4/6 tie at the top; alpha 2/6, zeta 1/3 tie at the bottom
        assert_eq!(order, vec!["x", "y", "alpha", "zeta"]);
    }

    #[test]
    fn test_variant_without_matches_is_absent() {
        let mut h = HeadToHead::default();
        h.record("A", "B");
        let ranked = h.rank(&ids(&["A", "B", "C"]));
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.variant != "C"));
    }

    #[test]
    fn test_non_transitive_cycle_ranks_all() {
        let mut h = HeadToHead::default();
        h.record("A", "B");
        h.record("B", "C");
        h.record("C", "A");
        let ranked = h.rank(&ids(&["A", "B", "C"]));
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.ratio == 0.5));
        assert_eq!(ranked[0].variant, "A");
    }

    #[test]
    fn test_mean_opponent_ratio_differs_from_pooled() {
        let mut h = HeadToHead::default();
        // A beats B once (1/1), loses to C three times (0/3)
        h.record("A", "B");
        for _ in 0..3 {
            h.record("C", "A");
        }
        let ranked = h.rank(&ids(&["A", "B", "C"]));
        let a = ranked.iter().find(|r| r.variant == "A").unwrap();
        assert_eq!(a.h2h_matches, 4);
        assert!((a.ratio - 0.25).abs() < 1e-9);
        assert!((a.mean_opponent_ratio - 0.5).abs() < 1e-9);
        assert_eq!(a.opponents, 2);
    }

    #[test]
    fn test_matrix_covers_ordered_pairs() {
        let mut h = HeadToHead::default();
        h.record("A", "B");
        h.record("A", "B");
        h.record("B", "A");
        let m = h.matrix(&ids(&["A", "B", "C"]));
        assert_eq!(m.len(), 6);
        let ab = m.iter().find(|c| c.variant == "A" && c.opponent == "B").unwrap();
        assert_eq!((ab.wins, ab.losses), (2, 1));
        let ac = m.iter().find(|c| c.variant == "A" && c.opponent == "C").unwrap();
        assert_eq!(ac.win_pct, None);
    }
}
