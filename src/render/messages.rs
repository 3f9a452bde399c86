use crate::{
    render::{HEADER, rule},
    state::{game::ParticipantId, scoring::Band},
};

/// Countdown shown before aiming starts.
pub fn countdown(remaining: u32) -> String {
    format!(
        "{HEADER}\n{}\n\nThe hoop 🏀 and your aim ▲ are both moving!\nReact with 🏀 when they align perfectly!\n\nStarting in {remaining}...",
        rule()
    )
}

/// Immediate acknowledgement posted when a shot is recorded.
pub fn shot_feedback(participant: &ParticipantId, distance: u32) -> String {
    let mention = participant.mention();
    match Band::from_distance(distance) {
        Band::Perfect => format!("🎯 PERFECT timing {mention}!"),
        Band::VeryClose => format!("✅ Great timing {mention}!"),
        Band::Close => format!("👍 Good attempt {mention}!"),
        Band::Miss => format!("💪 Shot taken {mention}!"),
    }
}

/// Notice for a participant who already has a recorded attempt.
pub fn already_shot(participant: &ParticipantId) -> String {
    format!("{} You already took your shot!", participant.mention())
}

/// Best-effort notice posted when a game is abandoned.
pub fn technical_difficulties() -> &'static str {
    "⚠️ Game ended due to technical difficulties."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_ends_with_remaining_seconds() {
        let text = countdown(2);
        assert!(text.starts_with(HEADER));
        assert!(text.ends_with("Starting in 2..."));
    }

    #[test]
    fn feedback_mentions_participant_per_band() {
        let alice = ParticipantId::new("alice");
        assert_eq!(shot_feedback(&alice, 0), "🎯 PERFECT timing <@alice>!");
        assert_eq!(shot_feedback(&alice, 1), "✅ Great timing <@alice>!");
        assert_eq!(shot_feedback(&alice, 5), "👍 Good attempt <@alice>!");
        assert_eq!(shot_feedback(&alice, 6), "💪 Shot taken <@alice>!");
    }

    #[test]
    fn duplicate_notice_mentions_participant() {
        assert_eq!(
            already_shot(&ParticipantId::new("bob")),
            "<@bob> You already took your shot!"
        );
    }
}
