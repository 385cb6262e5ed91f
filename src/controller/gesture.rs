//! Gesture state, pointer/modifier input types, and the table that decides which kind of drag a
//! press turns into.

use bevy_input::{keyboard::KeyCode, mouse::MouseButton, ButtonInput};
use bevy_math::DVec2;
use bevy_reflect::prelude::*;

use super::orbit::BasisFrame;

/// Total pointer travel, in logical pixels, that a press may cover and still count as a click.
pub const CLICK_THRESHOLD: f64 = 2.0;

/// Manhattan distance between two pointer positions. Used to tell clicks from drags.
pub fn travel(from: DVec2, to: DVec2) -> f64 {
    (to - from).abs().element_sum()
}

/// The gesture an [`OrbitCam`](super::component::OrbitCam) is currently performing.
///
/// `Idle` is the only resting state. A pointer press moves to `Indeterminate` until the pointer
/// has travelled further than [`CLICK_THRESHOLD`], at which point the gesture is promoted to one of
/// the active states and stays there until release.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A button is down, but the pointer has not moved far enough to be a drag.
    Indeterminate,
    /// Orbiting the target. The frame is captured when the drag is confirmed and is dropped
    /// together with this state.
    Rotating {
        /// Reference frame of the rotation, fixed for the lifetime of the gesture.
        frame: BasisFrame,
    },
    /// Moving the camera toward or away from the target.
    Dollying,
    /// Translating the camera and target together.
    Panning,
}

impl GestureState {
    /// Is any gesture in progress?
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Is the camera orbiting?
    pub fn is_rotating(&self) -> bool {
        matches!(self, Self::Rotating { .. })
    }

    /// The kind of drag this state performs, if it has been decided.
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle | Self::Indeterminate => None,
            Self::Rotating { .. } => Some(GestureKind::Rotate),
            Self::Dollying => Some(GestureKind::Dolly),
            Self::Panning => Some(GestureKind::Pan),
        }
    }
}

/// The three camera motions a drag can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum GestureKind {
    /// Orbit around the target.
    Rotate,
    /// Move along the view vector.
    Dolly,
    /// Translate perpendicular to the view vector.
    Pan,
}

/// Pointer buttons held during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct PointerButtons {
    /// Left mouse button.
    pub primary: bool,
    /// Right mouse button.
    pub secondary: bool,
    /// Middle mouse button, usually the wheel.
    pub tertiary: bool,
}

impl PointerButtons {
    /// Only the given button is held.
    pub fn only(button: MouseButton) -> Self {
        let mut buttons = Self::default();
        match button {
            MouseButton::Left => buttons.primary = true,
            MouseButton::Right => buttons.secondary = true,
            MouseButton::Middle => buttons.tertiary = true,
            _ => (),
        }
        buttons
    }

    /// Read the held buttons from Bevy's mouse button state.
    pub fn from_input(input: &ButtonInput<MouseButton>) -> Self {
        Self {
            primary: input.pressed(MouseButton::Left),
            secondary: input.pressed(MouseButton::Right),
            tertiary: input.pressed(MouseButton::Middle),
        }
    }

    /// Is `button` held? Buttons other than left, right, and middle are never reported.
    pub fn contains(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.primary,
            MouseButton::Right => self.secondary,
            MouseButton::Middle => self.tertiary,
            _ => false,
        }
    }

    /// Is no button held?
    pub fn is_empty(&self) -> bool {
        !(self.primary || self.secondary || self.tertiary)
    }
}

/// A set of modifier keys.
///
/// Used both for the keys held during an input and, on the controller, for the set of keys that
/// turn a primary-button drag into a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct ModifierKeys {
    /// Either shift key.
    pub shift: bool,
    /// Either alt/option key.
    pub alt: bool,
    /// Either control key.
    pub control: bool,
    /// Either meta/super/command key.
    pub meta: bool,
}

impl ModifierKeys {
    /// Every modifier key.
    pub const ALL: Self = Self {
        shift: true,
        alt: true,
        control: true,
        meta: true,
    };

    /// No modifier key.
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        control: false,
        meta: false,
    };

    /// Read the held modifiers from Bevy's keyboard state, treating left and right keys alike.
    pub fn from_input(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            shift: keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            alt: keys.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
            control: keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
            meta: keys.any_pressed([KeyCode::SuperLeft, KeyCode::SuperRight]),
        }
    }

    /// Does `self` share at least one key with `other`?
    pub fn intersects(&self, other: &Self) -> bool {
        (self.shift && other.shift)
            || (self.alt && other.alt)
            || (self.control && other.control)
            || (self.meta && other.meta)
    }
}

/// What a binding requires of the held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierRequirement {
    /// Matches regardless of modifiers.
    Any,
    /// At least one enabled pan modifier must be held.
    PanModifier,
}

/// One row of [`GESTURE_BINDINGS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureBinding {
    /// The button that must be held.
    pub button: MouseButton,
    /// The modifier keys that must be held.
    pub modifiers: ModifierRequirement,
    /// The resulting drag.
    pub kind: GestureKind,
}

/// Maps held buttons and modifiers to a drag kind. Rows are tried in order and the first match
/// wins.
pub const GESTURE_BINDINGS: [GestureBinding; 4] = [
    GestureBinding {
        button: MouseButton::Middle,
        modifiers: ModifierRequirement::Any,
        kind: GestureKind::Dolly,
    },
    GestureBinding {
        button: MouseButton::Right,
        modifiers: ModifierRequirement::Any,
        kind: GestureKind::Pan,
    },
    GestureBinding {
        button: MouseButton::Left,
        modifiers: ModifierRequirement::PanModifier,
        kind: GestureKind::Pan,
    },
    GestureBinding {
        button: MouseButton::Left,
        modifiers: ModifierRequirement::Any,
        kind: GestureKind::Rotate,
    },
];

impl GestureKind {
    /// Look up the drag kind for the held `buttons` and `held` modifiers, where `pan_modifiers`
    /// are the modifier keys enabled for panning. Returns `None` for unbound combinations.
    pub fn from_input(
        buttons: PointerButtons,
        held: ModifierKeys,
        pan_modifiers: ModifierKeys,
    ) -> Option<Self> {
        GESTURE_BINDINGS
            .iter()
            .find(|binding| {
                buttons.contains(binding.button)
                    && match binding.modifiers {
                        ModifierRequirement::Any => true,
                        ModifierRequirement::PanModifier => held.intersects(&pan_modifiers),
                    }
            })
            .map(|binding| binding.kind)
    }
}
