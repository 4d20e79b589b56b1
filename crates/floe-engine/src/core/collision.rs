//! Unit-square overlap tests on the grid.
//!
//! Every collidable occupies a 1×1 box whose top-left corner is its cell.
//! Overlap uses a shrunk width so boxes that merely touch, or differ by float
//! noise, do not count.

use glam::{IVec2, Vec2};

/// Default overlap width for unit boxes.
pub const DETECTION_WIDTH: f32 = 0.9;

/// Nearest cell, with halves rounding toward +infinity.
pub fn round_cell(v: Vec2) -> IVec2 {
    (v + Vec2::splat(0.5)).floor().as_ivec2()
}

/// Whether unit boxes at `a` and `b` overlap by more than `1 - detection_width`
/// on both axes.
pub fn overlaps(a: Vec2, b: Vec2, detection_width: f32) -> bool {
    let d = (a - b).abs();
    d.x < detection_width && d.y < detection_width
}

/// Move `dest` so it sits flush against `obstacle` on the edge it was
/// travelling toward. A zero `step` leaves it unchanged.
///
/// Moving right clamps to `obstacle.x - 1`, left to `obstacle.x + 1`,
/// down to `obstacle.y - 1`, up to `obstacle.y + 1`.
pub fn clamp_against(dest: IVec2, obstacle: IVec2, step: IVec2) -> IVec2 {
    let mut out = dest;
    if step.x > 0 {
        out.x = obstacle.x - 1;
    } else if step.x < 0 {
        out.x = obstacle.x + 1;
    }
    if step.y > 0 {
        out.y = obstacle.y - 1;
    } else if step.y < 0 {
        out.y = obstacle.y + 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_cells_do_not_overlap() {
        assert!(!overlaps(Vec2::new(2.0, 2.0), Vec2::new(3.0, 2.0), DETECTION_WIDTH));
        assert!(!overlaps(Vec2::new(2.0, 2.0), Vec2::new(2.0, 1.0), DETECTION_WIDTH));
    }

    #[test]
    fn shared_cell_overlaps() {
        assert!(overlaps(Vec2::new(3.0, 2.0), Vec2::new(3.0, 2.0), DETECTION_WIDTH));
        assert!(overlaps(Vec2::new(3.05, 2.0), Vec2::new(3.0, 2.0), DETECTION_WIDTH));
    }

    #[test]
    fn near_miss_within_tolerance_is_ignored() {
        assert!(!overlaps(Vec2::new(2.05, 2.0), Vec2::new(3.0, 2.0), DETECTION_WIDTH));
    }

    #[test]
    fn clamp_each_edge() {
        let obstacle = IVec2::new(5, 5);
        assert_eq!(clamp_against(obstacle, obstacle, IVec2::X), IVec2::new(4, 5));
        assert_eq!(clamp_against(obstacle, obstacle, IVec2::NEG_X), IVec2::new(6, 5));
        assert_eq!(clamp_against(obstacle, obstacle, IVec2::Y), IVec2::new(5, 4));
        assert_eq!(clamp_against(obstacle, obstacle, IVec2::NEG_Y), IVec2::new(5, 6));
        assert_eq!(clamp_against(obstacle, obstacle, IVec2::ZERO), obstacle);
    }

    #[test]
    fn round_cell_halves_go_up() {
        assert_eq!(round_cell(Vec2::new(0.5, -0.5)), IVec2::new(1, 0));
        assert_eq!(round_cell(Vec2::new(1.49, 7.51)), IVec2::new(1, 8));
    }
}
