//! Entity conflict resolution.
//!
//! Given all candidates for one buffer (already filtered by confidence
//! threshold and enabled entity types), produces the maximal set of
//! pairwise non-overlapping winners. This is weighted interval
//! selection, not "longest wins": generic classifiers frequently emit
//! short, low-value spans overlapping a more specific, higher-value
//! span at the same position.
//!
//! Candidates are grouped into overlap clusters. Within a cluster the
//! winner is chosen by configured priority, then confidence, then span
//! length, then smallest start offset. Losers that overlap the winner
//! (fully nested or partially) are dropped whole; partial overlap is
//! never split, to avoid emitting malformed fragments. Selection then
//! repeats on the surviving candidates.

use crate::priority::EntityPriorityTable;
use scrub_common::{EntityCandidate, Result, ScrubError};
use std::cmp::Ordering;

/// Resolve candidates for one buffer of `buffer_chars` code points.
///
/// Pure: identical input in any order yields the identical winner
/// sequence, sorted by start offset. Zero-length or out-of-bounds spans
/// are invalid input and rejected.
pub fn resolve_conflicts(
    table: &EntityPriorityTable,
    buffer_chars: usize,
    candidates: &[EntityCandidate],
) -> Result<Vec<EntityCandidate>> {
    for c in candidates {
        if c.is_empty() || c.end > buffer_chars {
            return Err(ScrubError::InvalidSpan {
                entity_type: c.entity_type.clone(),
                start: c.start,
                end: c.end,
            });
        }
    }

    let mut winners = Vec::new();
    for cluster in overlap_clusters(candidates) {
        select_winners(table, cluster, &mut winners);
    }

    winners.sort_by(|a, b| a.start.cmp(&b.start));
    Ok(winners)
}

/// Group candidates into connected components under "ranges intersect".
fn overlap_clusters(candidates: &[EntityCandidate]) -> Vec<Vec<EntityCandidate>> {
    let mut sorted: Vec<EntityCandidate> = candidates.to_vec();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then(a.entity_type.cmp(&b.entity_type))
    });

    let mut clusters: Vec<Vec<EntityCandidate>> = Vec::new();
    let mut cluster_end = 0usize;
    for c in sorted {
        match clusters.last_mut() {
            Some(cluster) if c.start < cluster_end => {
                cluster_end = cluster_end.max(c.end);
                cluster.push(c);
            }
            _ => {
                cluster_end = c.end;
                clusters.push(vec![c]);
            }
        }
    }
    clusters
}

/// Repeatedly pick the best remaining candidate and drop everything it
/// overlaps. Survivors of one round form the sub-clusters of the next;
/// the loop handles them uniformly.
fn select_winners(
    table: &EntityPriorityTable,
    mut pool: Vec<EntityCandidate>,
    winners: &mut Vec<EntityCandidate>,
) {
    while !pool.is_empty() {
        let best = pool
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| rank(table, a, b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let winner = pool.swap_remove(best);
        pool.retain(|c| !c.overlaps(&winner));
        winners.push(winner);
    }
}

/// Total order used for winner selection: priority, then confidence,
/// then span length, then smaller start, then entity type name as a
/// final determinism guarantee.
fn rank(table: &EntityPriorityTable, a: &EntityCandidate, b: &EntityCandidate) -> Ordering {
    table
        .priority_of(&a.entity_type)
        .cmp(&table.priority_of(&b.entity_type))
        .then(a.confidence.total_cmp(&b.confidence))
        .then(a.len().cmp(&b.len()))
        .then(b.start.cmp(&a.start))
        .then(b.entity_type.cmp(&a.entity_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table() -> EntityPriorityTable {
        let mut priorities = BTreeMap::new();
        priorities.insert("US_SSN".to_string(), 10);
        priorities.insert("PERSON".to_string(), 5);
        priorities.insert("ORGANIZATION".to_string(), 2);
        EntityPriorityTable::new(priorities, 0)
    }

    fn cand(entity_type: &str, start: usize, end: usize, confidence: f64) -> EntityCandidate {
        EntityCandidate::new(entity_type, start, end, confidence)
    }

    #[test]
    fn test_empty_input() {
        let winners = resolve_conflicts(&table(), 100, &[]).unwrap();
        assert!(winners.is_empty());
    }

    #[test]
    fn test_non_overlapping_all_win() {
        let candidates = vec![
            cand("PERSON", 9, 19, 0.85),
            cand("US_SSN", 26, 37, 0.9),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0].entity_type, "PERSON");
        assert_eq!(winners[1].entity_type, "US_SSN");
    }

    #[test]
    fn test_priority_beats_confidence() {
        // ORGANIZATION has higher confidence but lower priority
        let candidates = vec![
            cand("ORGANIZATION", 0, 3, 0.99),
            cand("US_SSN", 0, 16, 0.9),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].entity_type, "US_SSN");
    }

    #[test]
    fn test_priority_independent_of_order() {
        let a = vec![cand("ORGANIZATION", 0, 3, 0.6), cand("US_SSN", 0, 16, 0.9)];
        let b = vec![cand("US_SSN", 0, 16, 0.9), cand("ORGANIZATION", 0, 3, 0.6)];
        let wa = resolve_conflicts(&table(), 100, &a).unwrap();
        let wb = resolve_conflicts(&table(), 100, &b).unwrap();
        assert_eq!(wa, wb);
        assert_eq!(wa[0].entity_type, "US_SSN");
    }

    #[test]
    fn test_confidence_breaks_priority_tie() {
        let candidates = vec![
            cand("PERSON", 0, 10, 0.7),
            cand("PERSON", 5, 15, 0.9),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].start, 5);
    }

    #[test]
    fn test_length_breaks_confidence_tie() {
        let candidates = vec![
            cand("PERSON", 0, 5, 0.8),
            cand("PERSON", 3, 15, 0.8),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].len(), 12);
    }

    #[test]
    fn test_start_breaks_length_tie() {
        let candidates = vec![
            cand("PERSON", 4, 10, 0.8),
            cand("PERSON", 2, 8, 0.8),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].start, 2);
    }

    #[test]
    fn test_contained_loser_discarded() {
        let candidates = vec![
            cand("US_SSN", 0, 20, 0.9),
            cand("ORGANIZATION", 5, 8, 0.95),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].entity_type, "US_SSN");
    }

    #[test]
    fn test_partial_overlap_dropped_whole() {
        // Loser extends past the winner but is not split
        let candidates = vec![
            cand("US_SSN", 0, 10, 0.9),
            cand("ORGANIZATION", 8, 20, 0.9),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].entity_type, "US_SSN");
    }

    #[test]
    fn test_survivors_reselected() {
        // Chain: A overlaps B, B overlaps C, A and C disjoint.
        // B wins nothing (lowest rank); A and C both survive.
        let candidates = vec![
            cand("US_SSN", 0, 10, 0.9),
            cand("ORGANIZATION", 8, 14, 0.5),
            cand("US_SSN", 12, 22, 0.9),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0].start, 0);
        assert_eq!(winners[1].start, 12);
    }

    #[test]
    fn test_adjacent_spans_do_not_conflict() {
        let candidates = vec![
            cand("PERSON", 0, 5, 0.8),
            cand("PERSON", 5, 10, 0.8),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        assert_eq!(winners.len(), 2);
    }

    #[test]
    fn test_zero_length_span_rejected() {
        let candidates = vec![cand("PERSON", 5, 5, 0.8)];
        let err = resolve_conflicts(&table(), 100, &candidates).unwrap_err();
        assert!(matches!(err, ScrubError::InvalidSpan { .. }));
    }

    #[test]
    fn test_out_of_bounds_span_rejected() {
        let candidates = vec![cand("PERSON", 5, 101, 0.8)];
        let err = resolve_conflicts(&table(), 100, &candidates).unwrap_err();
        assert!(matches!(err, ScrubError::InvalidSpan { .. }));
    }

    #[test]
    fn test_winners_sorted_and_disjoint() {
        let candidates = vec![
            cand("US_SSN", 30, 40, 0.9),
            cand("PERSON", 0, 12, 0.8),
            cand("ORGANIZATION", 10, 20, 0.95),
            cand("PERSON", 15, 25, 0.7),
        ];
        let winners = resolve_conflicts(&table(), 100, &candidates).unwrap();
        for pair in winners.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }
}
