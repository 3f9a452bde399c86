//! Final summaries emitted once a game reaches its result phase.

use std::time::Duration;

use tokio::time::Instant;

use crate::{
    render::rule,
    state::{
        game::{GameMode, GameState, PlayerShot},
        leaderboard::Leaderboard,
        scoring::{self, Band},
    },
};

/// Summary matching the game's mode.
pub fn summary(game: &GameState, now: Instant) -> String {
    let elapsed = game.elapsed(now);
    match game.mode() {
        GameMode::Single => single_result(game.players.values().next(), elapsed),
        GameMode::Tournament => tournament(&Leaderboard::rank(game.players.values()), elapsed),
    }
}

/// Result of a single-player game; `shot` is the sole recorded attempt, if any.
pub fn single_result(shot: Option<&PlayerShot>, elapsed: Duration) -> String {
    let Some(shot) = shot else {
        return "🏀 **GAME OVER**\n\nNo shots taken! The game has ended.\n\nTime to try again? Use /hoopshot to play!".to_string();
    };

    let remark = if shot.score >= 50 {
        "🏆 Excellent shooting!"
    } else if shot.score > 0 {
        "💪 Keep practicing!"
    } else {
        "😅 Better luck next time!"
    };

    format!(
        "🏀 **GAME OVER**\n\n{}\n\n📊 **Final Stats:**\n• Distance: {} positions\n• Score: {} points\n• Reaction time: {}s\n\n{remark}",
        scoring::verdict(shot.distance),
        shot.distance,
        shot.score,
        seconds(elapsed),
    )
}

/// Tournament leaderboard with medals, aggregate stats and the champion.
pub fn tournament(board: &Leaderboard, elapsed: Duration) -> String {
    let mut lines = vec![
        "🏀 **TOURNAMENT RESULTS**".to_string(),
        rule(),
        String::new(),
    ];

    let Some(champion) = board.champion() else {
        lines.push("No shots taken! The tournament has ended.".to_string());
        lines.push(String::new());
        lines.push("Try again with /hooptourney!".to_string());
        return lines.join("\n");
    };

    for (medal, shot) in board.medals() {
        lines.push(format!(
            "{} {} - {} Distance: {} ({} pts)",
            medal.symbol(),
            shot.participant.mention(),
            Band::from_distance(shot.distance).label(),
            shot.distance,
            shot.score,
        ));
    }
    lines.push(String::new());

    let perfect = board.perfect();
    lines.push(format!(
        "📊 Stats: {}/{} scored | {perfect} perfect shot{}",
        board.scored(),
        board.len(),
        if perfect == 1 { "" } else { "s" },
    ));
    lines.push(format!("⏱️ Game duration: {} seconds", seconds(elapsed)));
    lines.push(String::new());
    lines.push(format!("🏆 Champion: {} 🏆", champion.participant.mention()));

    lines.join("\n")
}

fn seconds(elapsed: Duration) -> String {
    format!("{:.1}", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::ParticipantId;

    fn shot(name: &str, distance: u32, offset_secs: u64) -> PlayerShot {
        PlayerShot {
            participant: ParticipantId::new(name),
            hoop_cell: 20,
            aim_cell: 20 + distance as usize,
            distance,
            score: scoring::score(distance),
            shot_at: Instant::now() + Duration::from_secs(offset_secs),
        }
    }

    #[test]
    fn single_without_shot_has_its_own_variant() {
        let text = single_result(None, Duration::from_secs(20));
        assert!(text.contains("No shots taken! The game has ended."));
        assert!(!text.contains("Final Stats"));
    }

    #[test]
    fn single_result_reports_stats_and_remark() {
        let text = single_result(Some(&shot("a", 2, 0)), Duration::from_millis(4_250));
        assert!(text.contains("✅ GREAT SHOT! It went in!"));
        assert!(text.contains("• Distance: 2 positions"));
        assert!(text.contains("• Score: 50 points"));
        assert!(text.contains("• Reaction time: 4.2s") || text.contains("• Reaction time: 4.3s"));
        assert!(text.ends_with("🏆 Excellent shooting!"));

        assert!(single_result(Some(&shot("a", 4, 0)), Duration::ZERO).ends_with("💪 Keep practicing!"));
        assert!(
            single_result(Some(&shot("a", 9, 0)), Duration::ZERO)
                .ends_with("😅 Better luck next time!")
        );
    }

    #[test]
    fn empty_tournament_has_no_ranking() {
        let text = tournament(&Leaderboard::default(), Duration::from_secs(30));
        assert!(text.contains("No shots taken! The tournament has ended."));
        assert!(!text.contains("🥇"));
        assert!(!text.contains("Champion"));
    }

    #[test]
    fn tournament_lists_ranked_players_with_medals() {
        let shots = [shot("A", 2, 10), shot("B", 1, 5), shot("C", 0, 20), shot("D", 8, 1)];
        let text = tournament(&Leaderboard::rank(&shots), Duration::from_secs(30));
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[3], "🥇 <@C> - PERFECT! Distance: 0 (100 pts)");
        assert_eq!(lines[4], "🥈 <@B> - SCORED! Distance: 1 (50 pts)");
        assert_eq!(lines[5], "🥉 <@A> - SCORED! Distance: 2 (50 pts)");
        assert_eq!(lines[6], "👏 <@D> - MISSED! Distance: 8 (0 pts)");
        assert!(text.contains("📊 Stats: 3/4 scored | 1 perfect shot\n"));
        assert!(text.contains("⏱️ Game duration: 30.0 seconds"));
        assert!(text.ends_with("🏆 Champion: <@C> 🏆"));
    }

    #[test]
    fn perfect_count_is_pluralised() {
        let shots = [shot("A", 3, 0)];
        let text = tournament(&Leaderboard::rank(&shots), Duration::from_secs(1));
        assert!(text.contains("| 0 perfect shots"));
    }
}
