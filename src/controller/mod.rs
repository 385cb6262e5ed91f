//! Camera controller implementation.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_window::RequestRedraw;

pub mod component;
pub mod gesture;
pub mod orbit;
pub mod pan;
pub mod record;
pub mod zoom;

use component::{OrbitCam, OrbitCamChanged};

/// Adds [`OrbitCam`] functionality to the app. Cameras are moved by sending
/// [`OrbitCamInput`](crate::input::OrbitCamInput) events.
pub struct OrbitCamPlugin;

impl Plugin for OrbitCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<crate::input::OrbitCamInput>()
            .add_event::<OrbitCamChanged>()
            .add_event::<RequestRedraw>()
            .add_systems(
                PreUpdate,
                (
                    OrbitCam::capture_added_homes,
                    OrbitCam::sync_viewports,
                    OrbitCam::apply_inputs,
                )
                    .chain(),
            )
            .register_type::<OrbitCam>();
    }
}
