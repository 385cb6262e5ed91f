//! Inputs consumed by [`OrbitCam`], and the default plugin that produces them from the mouse and
//! keyboard.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::{
    keyboard::{KeyCode, KeyboardInput},
    mouse::{MouseButton, MouseScrollUnit, MouseWheel},
    ButtonInput, ButtonState, InputSystem,
};
use bevy_math::prelude::*;
use bevy_render::prelude::*;
use bevy_window::{PrimaryWindow, Window};

use crate::prelude::*;

/// How many pixels a single line of scroll counts for. Mice that scroll in lines report one line
/// per notch.
pub const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

/// Send one of these to move an [`OrbitCam`]. The [`DefaultInputPlugin`] sends these for mouse and
/// keyboard input, but you can send your own from any input source.
///
/// Events are applied in the order they are sent.
#[derive(Debug, Clone, Copy, PartialEq, Event)]
pub enum OrbitCamInput {
    /// A pointer button was pressed.
    Press {
        /// The camera to control.
        camera: Entity,
        /// Pointer position in logical pixels, from the top left of the viewport.
        position: Vec2,
        /// The button that was pressed.
        button: MouseButton,
    },
    /// The pointer moved while a button was held.
    Move {
        /// The camera to control.
        camera: Entity,
        /// Pointer position in logical pixels, from the top left of the viewport.
        position: Vec2,
        /// Buttons held during the move.
        buttons: PointerButtons,
        /// Modifier keys held during the move.
        modifiers: ModifierKeys,
    },
    /// The pointer button was released.
    Release {
        /// The camera to control.
        camera: Entity,
    },
    /// The scroll wheel moved.
    Wheel {
        /// The camera to control.
        camera: Entity,
        /// Scroll distance in pixels, positive when scrolling toward the user.
        delta_y: f32,
    },
    /// A key was pressed, or repeated while held.
    Key {
        /// The camera to control.
        camera: Entity,
        /// The key.
        key: KeyCode,
    },
    /// Return the camera to its starting pose. See [`OrbitCam::reset`].
    Reset {
        /// The camera to reset.
        camera: Entity,
    },
    /// Aim the camera at its target again. See [`OrbitCam::update`].
    Update {
        /// The camera to update.
        camera: Entity,
    },
}

impl OrbitCamInput {
    /// The camera this input is addressed to.
    pub fn camera(&self) -> Entity {
        match self {
            Self::Press { camera, .. }
            | Self::Move { camera, .. }
            | Self::Release { camera }
            | Self::Wheel { camera, .. }
            | Self::Key { camera, .. }
            | Self::Reset { camera }
            | Self::Update { camera } => *camera,
        }
    }
}

/// See the [module](self) docs.
pub struct DefaultInputPlugin;

impl Plugin for DefaultInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<OrbitCamInput>().add_systems(
            PreUpdate,
            default_camera_inputs
                .after(InputSystem)
                .before(OrbitCam::apply_inputs),
        );
    }
}

const POINTER_BUTTONS: [MouseButton; 3] =
    [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Translates mouse and keyboard input on the primary window into [`OrbitCamInput`] events for
/// every [`OrbitCam`].
///
/// Presses and scrolling only reach cameras whose viewport is under the pointer. Moves and
/// releases go to every camera; a camera that is not in the middle of a gesture ignores them.
pub fn default_camera_inputs(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut wheel: EventReader<MouseWheel>,
    mut keyboard: EventReader<KeyboardInput>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(Entity, Option<&Camera>), With<OrbitCam>>,
    mut last_cursor: Local<Option<Vec2>>,
    mut inputs: EventWriter<OrbitCamInput>,
) {
    let cursor = windows.single().ok().and_then(Window::cursor_position);
    let cursor_moved = cursor.is_some() && cursor != *last_cursor;
    *last_cursor = cursor;

    let wheel_delta: f32 = wheel
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => -event.y * PIXELS_PER_SCROLL_LINE,
            MouseScrollUnit::Pixel => -event.y,
        })
        .sum();
    let pressed_keys: Vec<KeyCode> = keyboard
        .read()
        .filter(|event| event.state == ButtonState::Pressed)
        .map(|event| event.key_code)
        .collect();

    let buttons = PointerButtons::from_input(&mouse);
    let modifiers = ModifierKeys::from_input(&keys);
    let released = POINTER_BUTTONS
        .iter()
        .any(|button| mouse.just_released(*button))
        && buttons.is_empty();

    for (camera, render_camera) in cameras.iter() {
        if render_camera.is_some_and(|c| !c.is_active) {
            continue;
        }
        let viewport = render_camera.and_then(Camera::logical_viewport_rect);
        // Pointer position relative to this camera's viewport, if the pointer is over it.
        let local = cursor.map(|cursor| match viewport {
            Some(rect) => (cursor - rect.min, rect.contains(cursor)),
            None => (cursor, true),
        });

        if let Some((position, hovered)) = local {
            if hovered {
                for button in POINTER_BUTTONS {
                    if mouse.just_pressed(button) {
                        inputs.write(OrbitCamInput::Press {
                            camera,
                            position,
                            button,
                        });
                    }
                }
            }
            if cursor_moved && !buttons.is_empty() {
                inputs.write(OrbitCamInput::Move {
                    camera,
                    position,
                    buttons,
                    modifiers,
                });
            }
            if hovered && wheel_delta != 0.0 {
                inputs.write(OrbitCamInput::Wheel {
                    camera,
                    delta_y: wheel_delta,
                });
            }
        }

        if released {
            inputs.write(OrbitCamInput::Release { camera });
        }

        for key in &pressed_keys {
            inputs.write(OrbitCamInput::Key { camera, key: *key });
        }
    }
}
