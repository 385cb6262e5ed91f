//! The camera the controller moves, seen through the [`CameraRecord`] trait.

use bevy_ecs::change_detection::Mut;
use bevy_math::{DMat3, DQuat, DVec3};
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;

/// Read/write access to the parts of a camera an [`OrbitCam`](super::component::OrbitCam) drives.
pub trait CameraRecord {
    /// World space position of the camera.
    fn position(&self) -> DVec3;
    /// Move the camera without changing where it is facing.
    fn set_position(&mut self, position: DVec3);
    /// The camera's up vector.
    fn up(&self) -> DVec3;
    /// Replace the camera's up vector.
    fn set_up(&mut self, up: DVec3);
    /// Vertical field of view, in degrees.
    fn fov_degrees(&self) -> f64;
    /// Turn the camera to face `target`, using `up` to fix the roll.
    fn look_at(&mut self, target: DVec3, up: DVec3);
}

/// A free-standing camera, for driving the controller outside of a Bevy world.
///
/// Like most scene graph cameras, the up vector is stored separately from the orientation:
/// [`CameraRecord::look_at`] only rewrites `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CameraRig {
    /// World space position.
    pub position: DVec3,
    /// Up vector used when aiming the camera.
    pub up: DVec3,
    /// Orientation. The camera looks down its local -Z axis.
    pub rotation: DQuat,
    /// Vertical field of view, in degrees.
    pub fov_degrees: f64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: DVec3::Z,
            up: DVec3::Y,
            rotation: DQuat::IDENTITY,
            fov_degrees: 50.0,
        }
    }
}

impl CameraRig {
    /// A camera at `position` looking at `target`.
    pub fn looking_at(position: DVec3, target: DVec3, up: DVec3) -> Self {
        let mut rig = Self {
            position,
            up,
            ..Default::default()
        };
        rig.look_at(target, up);
        rig
    }

    /// Set the vertical field of view, in degrees.
    pub fn with_fov_degrees(self, fov_degrees: f64) -> Self {
        Self {
            fov_degrees,
            ..self
        }
    }

    /// The direction the camera is facing.
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }
}

impl CameraRecord for CameraRig {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    fn up(&self) -> DVec3 {
        self.up
    }

    fn set_up(&mut self, up: DVec3) {
        self.up = up;
    }

    fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    fn look_at(&mut self, target: DVec3, up: DVec3) {
        if let Some(rotation) = look_rotation(target - self.position, up) {
            self.rotation = rotation;
        }
    }
}

/// 64-bit version of the rotation computed by [`Transform::look_to`]. `None` if `forward` is zero
/// or parallel to `up`.
pub fn look_rotation(forward: DVec3, up: DVec3) -> Option<DQuat> {
    let back = (-forward).try_normalize()?;
    let right = up.cross(back).try_normalize()?;
    let up = back.cross(right);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, up, back)))
}

/// Adapts a Bevy camera [`Transform`] with a perspective projection to a [`CameraRecord`].
///
/// A transform has no separate up vector, so [`CameraRecord::up`] is the transform's local up
/// axis, and setting it re-aims the camera along its current forward direction.
pub struct TransformRecord<'w> {
    transform: Mut<'w, Transform>,
    fov_degrees: f64,
}

impl<'w> TransformRecord<'w> {
    /// Wrap a transform. Returns `None` for projections without a field of view.
    pub fn new(transform: Mut<'w, Transform>, projection: &Projection) -> Option<Self> {
        match projection {
            Projection::Perspective(perspective) => Some(Self {
                transform,
                fov_degrees: (perspective.fov as f64).to_degrees(),
            }),
            Projection::Orthographic(_) | Projection::Custom(_) => None,
        }
    }
}

impl CameraRecord for TransformRecord<'_> {
    fn position(&self) -> DVec3 {
        self.transform.translation.as_dvec3()
    }

    fn set_position(&mut self, position: DVec3) {
        self.transform.translation = position.as_vec3();
    }

    fn up(&self) -> DVec3 {
        self.transform.up().as_vec3().as_dvec3()
    }

    fn set_up(&mut self, up: DVec3) {
        let forward = self.transform.forward();
        self.transform.look_to(forward, up.as_vec3());
    }

    fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    fn look_at(&mut self, target: DVec3, up: DVec3) {
        self.transform.look_at(target.as_vec3(), up.as_vec3());
    }
}
