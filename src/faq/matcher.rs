use crate::models::faq::FaqEntry;

/// Result of a nearest-neighbor lookup
///
/// `score` is the best similarity found even when `entry` is `None`, so
/// callers can report how close the query came. For an empty corpus it is
/// `f32::NEG_INFINITY`.
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome<'a> {
    pub entry: Option<&'a FaqEntry>,
    pub score: f32,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, na, nb) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(d, aa, bb), (x, y)| {
            (d + (x * y), aa + (x * x), bb + (y * y))
        });

    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
    }
}

/// Find the entry most similar to `query` and apply `threshold`.
///
/// Ties keep the earliest entry in corpus order. A non-finite similarity
/// (from NaN or infinite vector components) ranks as `f32::NEG_INFINITY`.
pub fn find_best_match<'a>(
    query: &[f32],
    entries: &'a [FaqEntry],
    threshold: f32,
) -> MatchOutcome<'a> {
    let mut best: Option<&FaqEntry> = None;
    let mut best_score = f32::NEG_INFINITY;

    for entry in entries {
        let score = match cosine_similarity(query, &entry.embedding) {
            score if score.is_finite() => score,
            _ => f32::NEG_INFINITY,
        };
        if best.is_none() || score > best_score {
            best = Some(entry);
            best_score = score;
        }
    }

    match best {
        Some(entry) if best_score >= threshold => MatchOutcome {
            entry: Some(entry),
            score: best_score,
        },
        _ => MatchOutcome {
            entry: None,
            score: best_score,
        },
    }
}
