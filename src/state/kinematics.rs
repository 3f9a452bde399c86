//! One-dimensional marker motion along the track, with reflection at both ends.

/// Lowest coordinate a marker may occupy.
pub const MIN_POS: f64 = 5.0;
/// Highest coordinate a marker may occupy.
pub const MAX_POS: f64 = 45.0;
/// Number of cells on the rendered track.
pub const TRACK_WIDTH: usize = 50;

/// Direction of travel along the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Moving towards [`MAX_POS`].
    Forward,
    /// Moving towards [`MIN_POS`].
    Backward,
}

impl Direction {
    /// Signed unit factor applied to the speed.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// A moving marker (the hoop or the aim) on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Real-valued coordinate, always within `[MIN_POS, MAX_POS]`.
    pub position: f64,
    /// Current direction of travel.
    pub direction: Direction,
}

impl Marker {
    /// Place a marker, clamping the coordinate onto the usable track.
    pub fn new(position: f64, direction: Direction) -> Self {
        Self {
            position: position.clamp(MIN_POS, MAX_POS),
            direction,
        }
    }

    /// Advance by one tick at `speed` units per tick.
    ///
    /// Touching or crossing a bound reverses the direction and clamps the
    /// position onto that bound within the same tick.
    pub fn step(self, speed: f64) -> Self {
        let next = self.position + self.direction.sign() * speed;
        if next <= MIN_POS || next >= MAX_POS {
            Self {
                position: next.clamp(MIN_POS, MAX_POS),
                direction: self.direction.reversed(),
            }
        } else {
            Self {
                position: next,
                direction: self.direction,
            }
        }
    }

    /// Track cell the marker currently occupies (nearest integer).
    pub fn cell(&self) -> usize {
        // position is clamped to [MIN_POS, MAX_POS] so the cast cannot wrap
        self.position.round() as usize
    }
}

/// Alignment distance between two cells. Symmetric by construction.
pub fn cell_distance(a: usize, b: usize) -> u32 {
    a.abs_diff(b) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_by_speed_in_current_direction() {
        let marker = Marker::new(20.0, Direction::Forward).step(1.3);
        assert!((marker.position - 21.3).abs() < 1e-9);
        assert_eq!(marker.direction, Direction::Forward);

        let marker = Marker::new(20.0, Direction::Backward).step(0.8);
        assert!((marker.position - 19.2).abs() < 1e-9);
        assert_eq!(marker.direction, Direction::Backward);
    }

    #[test]
    fn clamps_and_reverses_at_upper_bound() {
        let marker = Marker::new(44.5, Direction::Forward).step(1.3);
        assert_eq!(marker.position, MAX_POS);
        assert_eq!(marker.direction, Direction::Backward);
    }

    #[test]
    fn clamps_and_reverses_at_lower_bound() {
        let marker = Marker::new(5.5, Direction::Backward).step(0.8);
        assert_eq!(marker.position, MIN_POS);
        assert_eq!(marker.direction, Direction::Forward);
    }

    #[test]
    fn landing_exactly_on_bound_reverses() {
        let marker = Marker::new(44.0, Direction::Forward).step(1.0);
        assert_eq!(marker.position, MAX_POS);
        assert_eq!(marker.direction, Direction::Backward);
    }

    #[test]
    fn stays_within_bounds_over_many_ticks() {
        let mut hoop = Marker::new(25.0, Direction::Forward);
        let mut aim = Marker::new(15.0, Direction::Forward);
        for _ in 0..10_000 {
            let before = (hoop.direction, aim.direction);
            hoop = hoop.step(0.8);
            aim = aim.step(1.3);
            for (marker, previous) in [(hoop, before.0), (aim, before.1)] {
                assert!((MIN_POS..=MAX_POS).contains(&marker.position));
                if marker.position == MIN_POS || marker.position == MAX_POS {
                    assert_eq!(marker.direction, previous.reversed());
                }
            }
        }
    }

    #[test]
    fn distance_is_symmetric() {
        for (a, b) in [(5, 45), (25, 25), (17, 20), (44, 6)] {
            assert_eq!(cell_distance(a, b), cell_distance(b, a));
        }
        assert_eq!(cell_distance(17, 20), 3);
    }
}
