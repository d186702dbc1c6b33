/// A display title earned once cumulative score reaches `min_score`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rank {
    pub name: &'static str,
    pub min_score: u64,
}

pub const DEFAULT_RANKS: &[Rank] = &[
    Rank {
        name: "Candidate",
        min_score: 0,
    },
    Rank {
        name: "Junior Associate",
        min_score: 500,
    },
    Rank {
        name: "Senior Associate",
        min_score: 1200,
    },
    Rank {
        name: "Junior Partner",
        min_score: 2500,
    },
    Rank {
        name: "Managing Partner",
        min_score: 4000,
    },
    Rank {
        name: "Citation Master",
        min_score: 6000,
    },
];

/// Highest-threshold rank whose minimum does not exceed `score`.
/// Equal thresholds resolve to the later table entry. `ranks` must be non-empty.
pub fn rank_for_score(ranks: &[Rank], score: u64) -> &Rank {
    ranks
        .iter()
        .filter(|r| r.min_score <= score)
        .max_by_key(|r| r.min_score)
        .unwrap_or(&ranks[0])
}

/// The lowest rank strictly above the one `score` currently earns.
pub fn next_rank(ranks: &[Rank], score: u64) -> Option<&Rank> {
    ranks
        .iter()
        .filter(|r| r.min_score > score)
        .min_by_key(|r| r.min_score)
}

pub fn score_to_next_rank(ranks: &[Rank], score: u64) -> Option<u64> {
    next_rank(ranks, score).map(|r| r.min_score - score)
}

/// Fraction of the way from the current rank's threshold to the next one.
/// Returns 1.0 once the top rank is reached.
pub fn rank_progress(ranks: &[Rank], score: u64) -> f64 {
    let current = rank_for_score(ranks, score);
    match next_rank(ranks, score) {
        Some(next) => {
            let span = (next.min_score - current.min_score) as f64;
            let into = score.saturating_sub(current.min_score) as f64;
            (into / span).clamp(0.0, 1.0)
        }
        None => 1.0,
    }
}
