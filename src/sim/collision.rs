//! Axis-aligned hitbox overlap
//!
//! Cars collide as plain rectangles. The drawn sprites are a little larger
//! than their hitboxes, which gives near misses some slack.

use glam::Vec2;

use super::state::Opponent;
use crate::car_origin;
use crate::tuning::Tuning;

/// Axis-aligned rectangle (y grows down the road)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Hitbox of the player car parked at the bottom of the field
pub fn player_hitbox(player: i32, tuning: &Tuning) -> Hitbox {
    Hitbox::new(
        car_origin(player, tuning.player_hitbox_top),
        Vec2::new(tuning.hitbox_width, tuning.hitbox_height),
    )
}

pub fn opponent_hitbox(opponent: &Opponent, tuning: &Tuning) -> Hitbox {
    Hitbox::new(
        car_origin(opponent.x, opponent.y),
        Vec2::new(tuning.hitbox_width, tuning.hitbox_height),
    )
}

/// First opponent (in list order) touching the player, if any
pub fn find_collision<'a>(
    opponents: &'a [Opponent],
    player: i32,
    tuning: &Tuning,
) -> Option<&'a Opponent> {
    let player_box = player_hitbox(player, tuning);
    opponents
        .iter()
        .find(|o| opponent_hitbox(o, tuning).overlaps(&player_box))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opponent(x: i32, y: f32) -> Opponent {
        Opponent::new(1, x, y, 5.0)
    }

    #[test]
    fn test_overlap_head_on() {
        let tuning = Tuning::default();
        // 520 + 100 > 600, 200 < 295, 270 > 225
        assert!(find_collision(&[opponent(200, 520.0)], 225, &tuning).is_some());
    }

    #[test]
    fn test_no_overlap_beside_player() {
        let tuning = Tuning::default();
        // 400 < 295 fails
        assert!(find_collision(&[opponent(400, 620.0)], 225, &tuning).is_none());
    }

    #[test]
    fn test_no_overlap_above_line() {
        let tuning = Tuning::default();
        // 500 + 100 == 600 is not past the line
        assert!(find_collision(&[opponent(225, 500.0)], 225, &tuning).is_none());
        assert!(find_collision(&[opponent(225, 500.5)], 225, &tuning).is_some());
    }

    #[test]
    fn test_touching_sides_do_not_collide() {
        let tuning = Tuning::default();
        assert!(find_collision(&[opponent(295, 560.0)], 225, &tuning).is_none());
        assert!(find_collision(&[opponent(155, 560.0)], 225, &tuning).is_none());
        assert!(find_collision(&[opponent(156, 560.0)], 225, &tuning).is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let tuning = Tuning::default();
        let cars = [
            Opponent::new(4, 0, 0.0, 5.0),
            Opponent::new(7, 210, 550.0, 5.0),
            Opponent::new(9, 230, 560.0, 5.0),
        ];
        let hit = find_collision(&cars, 225, &tuning).map(|o| o.id);
        assert_eq!(hit, Some(7));
    }

    #[test]
    fn test_opponent_below_player_line_still_hits() {
        let tuning = Tuning::default();
        // Anything not yet culled still overlaps the player box
        assert!(find_collision(&[opponent(225, 690.0)], 225, &tuning).is_some());
    }
}
