//! Distance bands shared by scoring, verdicts and the live proximity status.

/// Qualitative band an alignment distance falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Distance 0.
    Perfect,
    /// Distance 1 or 2.
    VeryClose,
    /// Distance 3 to 5.
    Close,
    /// Anything further.
    Miss,
}

impl Band {
    /// Classify a rounded alignment distance.
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => Band::Perfect,
            1..=2 => Band::VeryClose,
            3..=5 => Band::Close,
            _ => Band::Miss,
        }
    }

    /// Points awarded for a shot in this band.
    pub fn score(self) -> u32 {
        match self {
            Band::Perfect => 100,
            Band::VeryClose => 50,
            Band::Close => 10,
            Band::Miss => 0,
        }
    }

    /// Human readable verdict shown on the single-player result.
    pub fn verdict(self) -> &'static str {
        match self {
            Band::Perfect => "🏆 PERFECT! Nothing but net!",
            Band::VeryClose => "✅ GREAT SHOT! It went in!",
            Band::Close => "😅 CLOSE! Rim out!",
            Band::Miss => "❌ MISSED! Way off!",
        }
    }

    /// Short label used on leaderboard lines.
    pub fn label(self) -> &'static str {
        match self {
            Band::Perfect => "PERFECT!",
            Band::VeryClose => "SCORED!",
            Band::Close => "CLOSE!",
            Band::Miss => "MISSED!",
        }
    }

    /// Whether a shot in this band counts as a basket.
    pub fn is_basket(self) -> bool {
        matches!(self, Band::Perfect | Band::VeryClose)
    }
}

/// Points for a rounded alignment distance.
pub fn score(distance: u32) -> u32 {
    Band::from_distance(distance).score()
}

/// Verdict for a rounded alignment distance.
pub fn verdict(distance: u32) -> &'static str {
    Band::from_distance(distance).verdict()
}
