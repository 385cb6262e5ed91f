//! A camera controller that orbits a target point without pole lock or accumulated twist.
//!
//! ## Controls
//!
//! - Left drag: orbit the target. Hold shift, alt, control, or meta to pan instead.
//! - Right drag, or the arrow keys: pan the camera and target together.
//! - Middle drag, or the scroll wheel: dolly toward or away from the target.
//!
//! ## How it works
//!
//! An orbit measures angles from the point where the drag started, in a reference frame captured
//! at that moment. The inclination is held just short of that frame's poles, but the frame is
//! captured again for every drag, so the camera is free to go over the top of the target. When the
//! drag ends, the camera's up vector is made orthogonal to its view again, so no roll builds up
//! from one drag to the next.
//!
//! ## Usage
//!
//! Add [`DefaultOrbitCamPlugins`] to your app, and an [`OrbitCam`](crate::prelude::OrbitCam)
//! component to a camera with a perspective projection. The controller can also be driven without
//! Bevy's input handling, see [`OrbitCam`](crate::prelude::OrbitCam).

#![warn(missing_docs)]

pub mod controller;
pub mod input;

use bevy_app::{PluginGroup, PluginGroupBuilder};

/// Adds [`bevy_orbit_cam`](crate) functionality together with the default mouse and keyboard input.
pub struct DefaultOrbitCamPlugins;

impl PluginGroup for DefaultOrbitCamPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(input::DefaultInputPlugin)
            .add(controller::OrbitCamPlugin)
    }
}

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            component::{EnabledMotion, OrbitCam, OrbitCamChanged, PanKeys, Sensitivity},
            gesture::{GestureKind, GestureState, ModifierKeys, PointerButtons},
            record::{CameraRecord, CameraRig, TransformRecord},
            zoom::DistanceLimits,
            OrbitCamPlugin,
        },
        input::{DefaultInputPlugin, OrbitCamInput},
        DefaultOrbitCamPlugins,
    };
}
