//! Orbiting: the per-gesture reference frame, the pointer to spherical angle mapping, and the up
//! vector correction applied when an orbit ends.
//!
//! Orbit angles are always measured from the point where the drag started, in a frame captured at
//! that moment. This means the camera position is purely a function of the total pointer
//! displacement, so long drags do not accumulate error. The inclination is clamped just short of
//! the poles of that frame, but because the frame is re-captured for every gesture, there is no
//! limit to how far the camera can travel over the top across several gestures.

use std::f64::consts::{FRAC_PI_2, PI};

use bevy_math::{DMat4, DVec2, DVec3};
use bevy_reflect::prelude::*;

/// How close, in radians, the inclination may get to either pole of the gesture frame.
pub const POLE_EPSILON: f64 = 0.01;

/// An orthonormal frame centered on the target, with its polar axis pointing at the camera.
///
/// Captured once when an orbit starts and left untouched until the orbit ends.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct BasisFrame {
    /// Columns are (right, up, view, target).
    local_to_world: DMat4,
    radius: f64,
}

impl BasisFrame {
    /// Capture a frame from the current camera pose.
    ///
    /// The frame's up axis is the camera's own up axis: `up` with any component along the view
    /// removed. For a camera whose up is already orthogonal to its view, that is `up` itself.
    ///
    /// Returns `None` if `up` is parallel to the view, which leaves no horizontal axis.
    ///
    /// # Panics
    ///
    /// If the camera is located at the target.
    pub fn capture(position: DVec3, up: DVec3, target: DVec3) -> Option<Self> {
        let offset = position - target;
        let radius = offset.length();
        assert!(
            radius > 0.0,
            "cannot orbit a camera located at its target ({target})"
        );
        let view = offset / radius;
        let right = up.cross(view).try_normalize()?;
        let up = view.cross(right);
        Some(Self {
            local_to_world: DMat4::from_cols(
                right.extend(0.0),
                up.extend(0.0),
                view.extend(0.0),
                target.extend(1.0),
            ),
            radius,
        })
    }

    /// Distance from the target to the camera when the frame was captured.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The frame's horizontal axis.
    pub fn right(&self) -> DVec3 {
        self.local_to_world.x_axis.truncate()
    }

    /// The camera's up axis at the time of capture.
    ///
    /// This is the up vector the camera stored only when that vector was orthogonal to the view;
    /// otherwise it is the stored up with its component along the view removed.
    pub fn up(&self) -> DVec3 {
        self.local_to_world.y_axis.truncate()
    }

    /// The direction from the target to the camera at the time of capture.
    pub fn view(&self) -> DVec3 {
        self.local_to_world.z_axis.truncate()
    }

    /// The target the frame is centered on.
    pub fn origin(&self) -> DVec3 {
        self.local_to_world.w_axis.truncate()
    }

    /// Transform a point given in (right, up, view) coordinates into world space.
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.local_to_world.transform_point3(local)
    }

    /// The world space camera position for the given angles.
    pub fn position_at(&self, angles: SphericalAngles) -> DVec3 {
        self.to_world(angles.to_local(self.radius))
    }
}

/// Spherical angles relative to a [`BasisFrame`]. The frame's view axis sits at `phi = 0`,
/// `theta = π/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalAngles {
    /// Azimuth around the frame's up axis.
    pub phi: f64,
    /// Inclination from the frame's up axis, within `[POLE_EPSILON, π - POLE_EPSILON]`.
    pub theta: f64,
}

impl SphericalAngles {
    /// Map the pointer displacement since the press to angles. Moving the pointer across the
    /// whole viewport at `rotate_speed = 1` turns the camera by 2π horizontally and vertically.
    pub fn from_drag(drag: DVec2, viewport_size: DVec2, rotate_speed: f64) -> Self {
        let drag = drag * 2.0 * rotate_speed;
        let phi = -drag.x * (PI / viewport_size.x);
        let theta = -drag.y * (PI / viewport_size.y) + FRAC_PI_2;
        Self {
            phi,
            theta: theta.clamp(POLE_EPSILON, PI - POLE_EPSILON),
        }
    }

    /// The (right, up, view) coordinates of the point at `radius`.
    pub fn to_local(self, radius: f64) -> DVec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        DVec3::new(
            radius * sin_theta * sin_phi,
            radius * cos_theta,
            radius * sin_theta * cos_phi,
        )
    }
}

/// Compute an up vector exactly orthogonal to the direction from `position` to `target`, as close
/// as possible to `up`. This removes any twist about the view axis left over from an orbit.
///
/// If `up` is parallel to the view direction there is no unique answer, and `up` is returned
/// unchanged.
pub fn stabilize_up(position: DVec3, target: DVec3, up: DVec3) -> DVec3 {
    let Some(view) = (target - position).try_normalize() else {
        return up;
    };
    let Some(side) = view.cross(up).try_normalize() else {
        return up;
    };
    side.cross(view).normalize()
}
