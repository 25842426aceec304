//! Angle and Ray Geometry Helpers
//!
//! Small pure functions shared by the camera solvers: angle normalization,
//! rate-limited interpolation steps, and the offset/rotation helpers used to
//! build the occlusion ray fan.
//!
//! All angles are in degrees unless a function says otherwise. Normalized
//! angles live in the half-open-at-the-bottom range `(-180, 180]`.

use glam::{Quat, Vec3};

/// Normalize an angle into the range `(-180, 180]` degrees.
///
/// Idempotent: applying it twice yields the same result as once. Any finite
/// input maps into range, no matter how many full turns it carries.
pub fn correct_angle(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid gives [-180, 180); fold the bottom edge onto +180
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Enforce a minimum magnitude on an interpolation step.
///
/// A positive step below `min` becomes `min`; a negative step above `-min`
/// becomes `-min`. Zero steps stay zero so a finished interpolation does
/// not oscillate.
pub fn minimum_angle(angle: f32, min: f32) -> f32 {
    if angle > 0.0 && angle < min {
        return min;
    }
    if angle < 0.0 && angle > -min {
        return -min;
    }
    angle
}

/// Cap an interpolation step so it never overshoots the remaining
/// difference `max`.
///
/// The cap is signed: a positive `max` bounds from above, a negative `max`
/// bounds from below. A zero `max` short-circuits to the bound itself,
/// which keeps degenerate clamp inputs from producing NaN downstream.
pub fn maximum_angle(angle: f32, max: f32) -> f32 {
    if max == 0.0 {
        return max;
    }
    if max > 0.0 && angle > max {
        return max;
    }
    if max < 0.0 && angle < max {
        return max;
    }
    angle
}

/// One rate-limited interpolation step from `current` toward `target`.
///
/// The step is proportional to the shortest-path difference
/// (`diff * rate * dt`), raised to at least `min_rate * dt` so small
/// corrections do not stall, and capped at the raw difference so the result
/// never overshoots. Both pitch and yaw smoothing go through here.
pub fn interpolate_angle(current: f32, target: f32, rate: f32, min_rate: f32, dt: f32) -> f32 {
    let diff = correct_angle(target - current);
    let step = minimum_angle(diff * rate * dt, min_rate * dt);
    let step = maximum_angle(step, diff);
    correct_angle(current + step)
}

/// Rotate a vector about the world up axis by `degrees`.
pub fn rotate_about_up(v: Vec3, degrees: f32) -> Vec3 {
    Quat::from_axis_angle(Vec3::Y, degrees.to_radians()) * v
}

/// Rotate a vector vertically (toward or away from up) by `degrees`.
///
/// The rotation axis is `v x up`, so a positive angle tilts the vector
/// upward regardless of its heading. Degenerate for vectors parallel to
/// up, which the ray fan never produces.
pub fn rotate_vertical(v: Vec3, degrees: f32) -> Vec3 {
    let axis = v.cross(Vec3::Y);
    if axis.length_squared() < 1e-10 {
        return v;
    }
    Quat::from_axis_angle(axis.normalize(), degrees.to_radians()) * v
}

/// Offset a point sideways relative to a reference direction.
///
/// The offset axis is the reference direction rotated 90 degrees about up
/// with its vertical component removed, so the point slides horizontally
/// even when the reference direction is tilted. `vertical` is applied
/// straight along world up.
pub fn offset_point(point: Vec3, relative_to: Vec3, horizontal: f32, vertical: f32) -> Vec3 {
    if horizontal == 0.0 && vertical == 0.0 {
        return point;
    }
    let mut side = rotate_about_up(relative_to, 90.0);
    side.y = 0.0;
    let side = side.normalize_or_zero() * horizontal;
    point + side + Vec3::new(0.0, vertical, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_angle_in_range() {
        for raw in [-720.0, -539.0, -180.0, -179.9, 0.0, 179.9, 180.0, 360.0, 1234.5] {
            let a = correct_angle(raw);
            assert!(
                a > -180.0 && a <= 180.0,
                "correct_angle({raw}) = {a} out of (-180, 180]"
            );
        }
    }

    #[test]
    fn test_correct_angle_idempotent() {
        for raw in [-500.0, -180.0, -42.0, 0.0, 90.0, 180.0, 270.0, 900.0] {
            let once = correct_angle(raw);
            let twice = correct_angle(once);
            assert_eq!(once, twice, "correct_angle not idempotent at {raw}");
        }
    }

    #[test]
    fn test_correct_angle_values() {
        assert_eq!(correct_angle(190.0), -170.0);
        assert_eq!(correct_angle(-190.0), 170.0);
        assert_eq!(correct_angle(180.0), 180.0);
        assert_eq!(correct_angle(-180.0), 180.0);
        assert_eq!(correct_angle(0.0), 0.0);
    }

    #[test]
    fn test_minimum_angle_raises_small_steps() {
        assert_eq!(minimum_angle(0.5, 2.0), 2.0);
        assert_eq!(minimum_angle(-0.5, 2.0), -2.0);
        assert_eq!(minimum_angle(5.0, 2.0), 5.0);
        assert_eq!(minimum_angle(-5.0, 2.0), -5.0);
        assert_eq!(minimum_angle(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_maximum_angle_caps_steps() {
        assert_eq!(maximum_angle(5.0, 3.0), 3.0);
        assert_eq!(maximum_angle(2.0, 3.0), 2.0);
        assert_eq!(maximum_angle(-5.0, -3.0), -3.0);
        assert_eq!(maximum_angle(-2.0, -3.0), -2.0);
    }

    #[test]
    fn test_maximum_angle_zero_bound_short_circuits() {
        assert_eq!(maximum_angle(10.0, 0.0), 0.0);
        assert_eq!(maximum_angle(-10.0, 0.0), 0.0);
    }

    #[test]
    fn test_interpolate_never_overshoots() {
        // Large rate would overshoot without the cap
        let result = interpolate_angle(0.0, 10.0, 1000.0, 1.0, 0.016);
        assert_eq!(result, 10.0);

        let result = interpolate_angle(0.0, -10.0, 1000.0, 1.0, 0.016);
        assert_eq!(result, -10.0);
    }

    #[test]
    fn test_interpolate_respects_minimum_step() {
        // Tiny proportional step, but min_rate forces visible progress
        let current = 0.0;
        let target = 10.0;
        let result = interpolate_angle(current, target, 0.01, 5.0, 0.1);
        let moved = result - current;
        assert!(
            moved >= 0.5 - 1e-6,
            "step {moved} below enforced minimum 0.5"
        );
        assert!(moved <= 10.0, "step {moved} overshot the difference");
    }

    #[test]
    fn test_interpolate_stays_within_diff_bounds() {
        for (current, target) in [(0.0f32, 45.0f32), (170.0, -170.0), (-90.0, 90.0)] {
            let diff = correct_angle(target - current);
            let result = interpolate_angle(current, target, 3.0, 1.0, 0.016);
            let moved = correct_angle(result - current);
            assert!(
                moved.abs() <= diff.abs() + 1e-4,
                "moved {moved} beyond diff {diff}"
            );
            assert!(
                moved.signum() == diff.signum() || moved == 0.0,
                "moved {moved} against diff {diff}"
            );
        }
    }

    #[test]
    fn test_interpolate_takes_shortest_path() {
        // 170 -> -170 should go +20 through 180, not -340
        let result = interpolate_angle(170.0, -170.0, 1000.0, 1.0, 1.0);
        assert_eq!(result, -170.0);
    }

    #[test]
    fn test_rotate_about_up() {
        let v = Vec3::new(0.0, 0.0, -1.0);
        let rotated = rotate_about_up(v, 90.0);
        assert!((rotated - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotate_vertical_tilts_up() {
        let v = Vec3::new(0.0, 0.0, -1.0);
        let rotated = rotate_vertical(v, 30.0);
        assert!(rotated.y > 0.0, "positive angle should tilt upward");
        assert!((rotated.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_offset_point_horizontal_stays_level() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let dir = Vec3::new(0.0, -0.3, -1.0).normalize();
        let offset = offset_point(p, dir, 0.5, 0.0);
        assert!((offset.y - p.y).abs() < 1e-6, "horizontal offset changed height");
        assert!(((offset - p).length() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_offset_point_zero_is_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(offset_point(p, Vec3::NEG_Z, 0.0, 0.0), p);
    }
}
