use std::collections::BTreeSet;

// share of the top vote a player count needs to stay among the best
const SENSITIVITY: f64 = 0.80;

/// One `results` row of the suggested_numplayers poll: the player count
/// as bgg labels it ("4" or "4+") and the number of "Best" votes.
#[derive(Debug, Clone, PartialEq)]
pub struct PollEntry {
    pub label: String,
    pub votes: u32
}

impl PollEntry {
    pub fn new(label: &str, votes: u32) -> PollEntry {
        PollEntry { label: label.to_string(), votes }
    }
}

/// Player counts the community calls best. Walks the poll in bgg order,
/// every entry that ties or beats the running top vote resets the set to
/// the previous picks still within 80% of it, plus itself.
/// "N+" labels and counts outside `min..=max` never qualify.
/// Empty when no qualifying entry has a single vote.
pub fn best_player_counts(poll: &[PollEntry], min: u32, max: u32) -> BTreeSet<u32> {
    // later duplicates overwrite the votes but keep the first position
    let mut votes: Vec<(u32, f64)> = Vec::new();
    for entry in poll {
        let players = match entry.label.parse::<u32>() {
            Ok(n) => n,
            Err(_) => continue
        };
        if players < min || players > max {
            continue;
        }
        match votes.iter_mut().find(|(p, _)| *p == players) {
            Some(seen) => seen.1 = entry.votes as f64,
            None => votes.push((players, entry.votes as f64))
        }
    }

    let mut best: Vec<(u32, f64)> = Vec::new();
    let mut top_vote = 0.0;
    for &(players, vote) in &votes {
        if vote >= top_vote {
            top_vote = vote;
            best.retain(|&(_, v)| v >= SENSITIVITY * top_vote);
            best.push((players, vote));
        }
    }
    if top_vote == 0.0 {
        return BTreeSet::new();
    }
    best.into_iter().map(|(p, _)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(entries: &[(&str, u32)]) -> Vec<PollEntry> {
        entries.iter().map(|&(l, v)| PollEntry::new(l, v)).collect()
    }

    fn set(counts: &[u32]) -> BTreeSet<u32> {
        counts.iter().cloned().collect()
    }

    #[test]
    fn counts_within_threshold_are_co_best() {
        let p = poll(&[("2", 10), ("3", 10), ("4", 3)]);
        assert_eq!(best_player_counts(&p, 2, 4), set(&[2, 3]));
    }

    #[test]
    fn new_leader_drops_counts_below_threshold() {
        let p = poll(&[("2", 5), ("3", 7), ("4", 20)]);
        assert_eq!(best_player_counts(&p, 1, 5), set(&[4]));
    }

    #[test]
    fn earlier_counts_near_the_leader_survive() {
        let p = poll(&[("2", 9), ("3", 10)]);
        assert_eq!(best_player_counts(&p, 1, 5), set(&[2, 3]));
    }

    #[test]
    fn threshold_is_inclusive() {
        let p = poll(&[("2", 8), ("3", 10)]);
        assert_eq!(best_player_counts(&p, 1, 5), set(&[2, 3]));
        let p = poll(&[("2", 7), ("3", 10)]);
        assert_eq!(best_player_counts(&p, 1, 5), set(&[3]));
    }

    #[test]
    fn entries_after_the_leader_with_fewer_votes_are_not_added() {
        // only entries reaching the running top re-evaluate the set
        let p = poll(&[("3", 10), ("2", 9)]);
        assert_eq!(best_player_counts(&p, 1, 5), set(&[3]));
    }

    #[test]
    fn plus_labels_are_ignored() {
        let p = poll(&[("1", 2), ("2", 4), ("2+", 50)]);
        assert_eq!(best_player_counts(&p, 1, 2), set(&[2]));
    }

    #[test]
    fn counts_outside_player_range_are_ignored() {
        let p = poll(&[("1", 30), ("2", 4), ("3", 5), ("6", 40)]);
        assert_eq!(best_player_counts(&p, 2, 5), set(&[2, 3]));
    }

    #[test]
    fn no_valid_entries_means_no_best_count() {
        assert!(best_player_counts(&[], 1, 4).is_empty());
        let p = poll(&[("4+", 10), ("7", 10)]);
        assert!(best_player_counts(&p, 1, 4).is_empty());
    }

    #[test]
    fn zero_votes_means_no_best_count() {
        let p = poll(&[("1", 0), ("2", 0)]);
        assert!(best_player_counts(&p, 1, 4).is_empty());
    }

    #[test]
    fn inconsistent_player_range_yields_nothing() {
        let p = poll(&[("2", 10), ("3", 10)]);
        assert!(best_player_counts(&p, 4, 2).is_empty());
    }

    #[test]
    fn duplicate_labels_keep_last_votes() {
        let p = poll(&[("2", 1), ("3", 10), ("2", 10)]);
        assert_eq!(best_player_counts(&p, 1, 4), set(&[2, 3]));
    }

    #[test]
    fn removing_entries_below_threshold_changes_nothing() {
        let full = poll(&[("1", 1), ("2", 10), ("3", 9), ("4", 2)]);
        let trimmed = poll(&[("2", 10), ("3", 9)]);
        assert_eq!(best_player_counts(&full, 1, 4), best_player_counts(&trimmed, 1, 4));
    }
}
