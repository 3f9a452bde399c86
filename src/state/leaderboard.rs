//! Ranking of recorded attempts for tournament summaries.

use std::cmp::Ordering;

use crate::state::{game::PlayerShot, scoring::Band};

/// Marker shown next to a ranked attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    /// First place.
    Gold,
    /// Second place.
    Silver,
    /// Third place.
    Bronze,
    /// Every other participant.
    Applause,
}

impl Medal {
    /// Medal awarded to a zero-based rank.
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            0 => Medal::Gold,
            1 => Medal::Silver,
            2 => Medal::Bronze,
            _ => Medal::Applause,
        }
    }

    /// Emoji used when rendering the medal.
    pub fn symbol(self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
            Medal::Applause => "👏",
        }
    }
}

/// Ranking order: score descending, then distance ascending, then earliest attempt.
/// Attempts equal on all three keep the order they were offered in.
pub fn compare(a: &PlayerShot, b: &PlayerShot) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.distance.cmp(&b.distance))
        .then_with(|| a.shot_at.cmp(&b.shot_at))
}

/// Attempts sorted by [`compare`], plus aggregate counts.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<PlayerShot>,
}

impl Leaderboard {
    /// Rank a set of recorded attempts.
    pub fn rank<'a>(shots: impl IntoIterator<Item = &'a PlayerShot>) -> Self {
        let mut entries = shots.into_iter().cloned().collect::<Vec<_>>();
        entries.sort_by(compare);
        Self { entries }
    }

    /// Ranked attempts, best first.
    pub fn entries(&self) -> &[PlayerShot] {
        &self.entries
    }

    /// Ranked attempts paired with their medal.
    pub fn medals(&self) -> impl Iterator<Item = (Medal, &PlayerShot)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(rank, shot)| (Medal::for_rank(rank), shot))
    }

    /// Best attempt, if any were recorded.
    pub fn champion(&self) -> Option<&PlayerShot> {
        self.entries.first()
    }

    /// Number of ranked attempts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody took a shot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attempts that went in (distance ≤ 2).
    pub fn scored(&self) -> usize {
        self.entries
            .iter()
            .filter(|shot| Band::from_distance(shot.distance).is_basket())
            .count()
    }

    /// Attempts with a perfect alignment.
    pub fn perfect(&self) -> usize {
        self.entries.iter().filter(|shot| shot.distance == 0).count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::state::{game::ParticipantId, scoring};

    fn shot(name: &str, distance: u32, at: Instant) -> PlayerShot {
        PlayerShot {
            participant: ParticipantId::new(name),
            hoop_cell: 25,
            aim_cell: 25 + distance as usize,
            distance,
            score: scoring::score(distance),
            shot_at: at,
        }
    }

    fn names(board: &Leaderboard) -> Vec<&str> {
        board
            .entries()
            .iter()
            .map(|shot| shot.participant.as_str())
            .collect()
    }

    #[test]
    fn ranks_by_score_then_distance_then_time() {
        let t0 = Instant::now();
        let a = shot("A", 2, t0 + Duration::from_secs(10));
        let b = shot("B", 1, t0 + Duration::from_secs(5));
        let c = shot("C", 0, t0 + Duration::from_secs(20));
        assert_eq!((a.score, b.score, c.score), (50, 50, 100));

        let board = Leaderboard::rank([&a, &b, &c]);
        assert_eq!(names(&board), ["C", "B", "A"]);
    }

    #[test]
    fn earlier_attempt_wins_full_tie() {
        let t0 = Instant::now();
        let late = shot("late", 4, t0 + Duration::from_secs(3));
        let early = shot("early", 4, t0 + Duration::from_secs(1));
        let board = Leaderboard::rank([&late, &early]);
        assert_eq!(names(&board), ["early", "late"]);
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let t0 = Instant::now();
        let shots = [
            shot("p1", 7, t0),
            shot("p2", 0, t0 + Duration::from_secs(2)),
            shot("p3", 3, t0 + Duration::from_secs(1)),
            shot("p4", 3, t0),
            shot("p5", 1, t0 + Duration::from_secs(4)),
        ];
        let forward = Leaderboard::rank(shots.iter());
        let backward = Leaderboard::rank(shots.iter().rev());
        assert_eq!(names(&forward), names(&backward));
        assert_eq!(names(&forward), ["p2", "p5", "p4", "p3", "p1"]);
    }

    #[test]
    fn medals_cover_top_three_then_applause() {
        let t0 = Instant::now();
        let shots = (0..5)
            .map(|i| shot(&format!("p{i}"), i, t0))
            .collect::<Vec<_>>();
        let board = Leaderboard::rank(&shots);
        let medals = board.medals().map(|(medal, _)| medal).collect::<Vec<_>>();
        assert_eq!(
            medals,
            [
                Medal::Gold,
                Medal::Silver,
                Medal::Bronze,
                Medal::Applause,
                Medal::Applause
            ]
        );
    }

    #[test]
    fn counts_scored_and_perfect() {
        let t0 = Instant::now();
        let shots = [shot("a", 0, t0), shot("b", 2, t0), shot("c", 3, t0), shot("d", 0, t0)];
        let board = Leaderboard::rank(&shots);
        assert_eq!(board.len(), 4);
        assert_eq!(board.scored(), 3);
        assert_eq!(board.perfect(), 2);
        assert_eq!(
            board.champion().map(|shot| shot.participant.as_str()),
            Some("a")
        );
    }

    #[test]
    fn empty_board_has_no_champion() {
        let board = Leaderboard::rank(std::iter::empty());
        assert!(board.is_empty());
        assert!(board.champion().is_none());
    }
}
