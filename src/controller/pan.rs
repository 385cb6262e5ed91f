//! Panning moves the camera and its target together, in the plane perpendicular to the view.

use bevy_math::{DVec2, DVec3};

/// The result of a single pan step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanStep {
    /// New camera position.
    pub position: DVec3,
    /// New target. Same offset from the camera as before the step.
    pub target: DVec3,
}

/// Translate the camera by `delta` logical pixels, scaled so that a point at the target's depth
/// moves by `delta` on screen. Positive x moves the camera right, positive y moves it along `up`.
///
/// The view direction and distance are measured fresh on every step, since each step moves the
/// target. `up` is used as given and is not re-orthogonalized against the view.
///
/// Returns `None` if `up` is parallel to the view, since there is no horizontal axis to pan along.
///
/// # Panics
///
/// If the camera is located at the target.
pub fn pan(
    position: DVec3,
    target: DVec3,
    up: DVec3,
    fov_degrees: f64,
    viewport_height: f64,
    delta: DVec2,
) -> Option<PanStep> {
    let eye = position - target;
    let distance = eye.length();
    assert!(
        distance > 0.0,
        "cannot pan a camera located at its target ({target})"
    );
    let right = up.cross(eye).try_normalize()?;
    let half_extent = (fov_degrees.to_radians() / 2.0).tan() * distance;
    let scale = half_extent / (viewport_height / 2.0);

    let position = position + right * delta.x * scale + up * delta.y * scale;
    Some(PanStep {
        position,
        target: position - eye,
    })
}
