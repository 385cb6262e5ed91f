//! Provides [`DistanceLimits`] and the dolly step that respects them.

use bevy_math::DVec3;
use bevy_reflect::Reflect;

/// Bound how close to and how far from the target the camera may dolly.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DistanceLimits {
    /// The closest the camera may get to the target, in world units. Must be `>= 0`.
    pub min: f64,
    /// The furthest the camera may get from the target, in world units. Must be `>= min`, and may
    /// be infinite.
    pub max: f64,
}

impl Default for DistanceLimits {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl DistanceLimits {
    /// Limits between `min` and `max`.
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min >= 0.0 && max >= min, "invalid distance limits {min}..{max}");
        Self { min, max }
    }

    /// Is `distance` within the limits?
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.min && distance <= self.max
    }

    /// The world distance a drag across the full viewport height covers, for a camera currently
    /// `distance` away from the target.
    ///
    /// This is the width of the allowed range, but never more than twice the current distance, so
    /// a single drag from a close camera does not fling it to the far limit.
    pub fn drag_range(&self, distance: f64) -> f64 {
        (self.max - self.min).min(2.0 * distance)
    }
}

/// Move the camera `delta` world units toward the target, or away from it if `delta` is negative.
///
/// Returns the new camera position, or `None` if the move would leave `limits`, or carry the camera
/// onto or through the target. A rejected step is not partially applied.
pub fn dolly(position: DVec3, target: DVec3, delta: f64, limits: &DistanceLimits) -> Option<DVec3> {
    let to_target = target - position;
    let distance = to_target.length();
    let direction = to_target.try_normalize()?;
    let new_distance = distance - delta;
    (new_distance > 0.0 && limits.contains(new_distance)).then(|| position + direction * delta)
}
