//! The primary [`Component`] of the controller, [`OrbitCam`].

use bevy_ecs::prelude::*;
use bevy_input::{keyboard::KeyCode, mouse::MouseButton};
use bevy_log::prelude::*;
use bevy_math::{DVec2, DVec3};
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    gesture::{travel, GestureKind, GestureState, ModifierKeys, PointerButtons, CLICK_THRESHOLD},
    orbit::{stabilize_up, BasisFrame, SphericalAngles},
    pan::pan,
    record::{CameraRecord, TransformRecord},
    zoom::{dolly, DistanceLimits},
};
use crate::input::OrbitCamInput;

/// Sent every time an [`OrbitCam`] moves its camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Event)]
pub struct OrbitCamChanged {
    /// The camera that moved.
    pub camera: Entity,
}

/// Tracks all state of a camera's controller, including its target, gesture, and settings.
///
/// # Moving the Camera
///
/// The [`DefaultInputPlugin`](crate::input::DefaultInputPlugin) sends mouse and keyboard input to
/// every camera with this component, as [`OrbitCamInput`] events. To drive the camera from another
/// input source, send those events yourself, or call the handlers directly:
///
/// 1. Start a drag with [`OrbitCam::press`].
/// 2. While the button is held, report the pointer with [`OrbitCam::pointer_move`]. The drag turns
///    into a rotation, dolly, or pan once the pointer has moved further than a click.
/// 3. End the drag with [`OrbitCam::release`], then read [`OrbitCam::clicked`].
///
/// [`OrbitCam::wheel`] and [`OrbitCam::key_down`] are complete gestures on their own.
///
/// Each handler takes the camera to move, as a [`CameraRecord`], and a callback that is invoked
/// once every time the camera is changed.
#[derive(Debug, Clone, Reflect, Component)]
pub struct OrbitCam {
    /// The point the camera orbits around and looks at. Panning moves it along with the camera.
    pub target: DVec3,
    /// Input sensitivity of the camera.
    pub sensitivity: Sensitivity,
    /// How close to and far from the target the camera may dolly.
    pub distance_limits: DistanceLimits,
    /// Modifier keys that turn a left button drag into a pan.
    pub pan_modifiers: ModifierKeys,
    /// Keys that pan the camera.
    pub keys: PanKeys,
    /// What input motions are currently allowed?
    pub enabled_motion: EnabledMotion,
    /// Size of the camera's viewport, in logical pixels. Kept in sync with the camera's render
    /// target by [`OrbitCam::sync_viewports`].
    pub viewport_size: DVec2,
    gesture: GestureState,
    pressed_button: Option<MouseButton>,
    press_position: DVec2,
    previous_pointer: DVec2,
    clicked: bool,
    home: Option<HomePose>,
}

/// Where [`OrbitCam::reset`] returns the camera to.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HomePose {
    /// Camera position.
    pub position: DVec3,
    /// Camera up vector.
    pub up: DVec3,
    /// Orbit target.
    pub target: DVec3,
}

impl Default for OrbitCam {
    fn default() -> Self {
        OrbitCam {
            target: DVec3::ZERO,
            sensitivity: Default::default(),
            distance_limits: Default::default(),
            pan_modifiers: ModifierKeys::ALL,
            keys: Default::default(),
            enabled_motion: Default::default(),
            viewport_size: DVec2::new(1280.0, 720.0),
            gesture: GestureState::Idle,
            pressed_button: None,
            press_position: DVec2::ZERO,
            previous_pointer: DVec2::ZERO,
            clicked: false,
            home: None,
        }
    }
}

impl OrbitCam {
    /// Create a controller orbiting `target`, remembering the current pose of `camera` as the
    /// pose to [`reset`](Self::reset) to.
    pub fn new(camera: &impl CameraRecord, target: DVec3) -> Self {
        let mut orbit_cam = Self::with_target(target);
        orbit_cam.capture_home(camera);
        orbit_cam
    }

    /// Create a controller orbiting `target`. The home pose is captured the first time the
    /// controller handles an input.
    pub fn with_target(target: DVec3) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Set the viewport size, in logical pixels.
    pub fn with_viewport_size(self, viewport_size: DVec2) -> Self {
        Self {
            viewport_size,
            ..self
        }
    }

    /// Set the distance limits.
    pub fn with_distance_limits(self, distance_limits: DistanceLimits) -> Self {
        Self {
            distance_limits,
            ..self
        }
    }

    /// Remember the current pose of `camera` and the current target as the pose to
    /// [`reset`](Self::reset) to.
    pub fn capture_home(&mut self, camera: &impl CameraRecord) {
        self.home = Some(HomePose {
            position: camera.position(),
            up: camera.up(),
            target: self.target,
        });
    }

    /// The pose [`reset`](Self::reset) returns to, if it has been captured.
    pub fn home(&self) -> Option<&HomePose> {
        self.home.as_ref()
    }

    /// The current gesture.
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Did the last completed pointer gesture stay within the click threshold? Valid immediately
    /// after a [`release`](Self::release).
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// Is the user in the middle of a gesture? New gestures cannot start while this is true.
    pub fn is_actively_controlled(&self) -> bool {
        self.gesture.is_active()
    }

    /// Should a context menu request be discarded? True while the right button, which is reserved
    /// for panning, is held.
    pub fn suppresses_context_menu(&self) -> bool {
        self.gesture.is_active() && self.pressed_button == Some(MouseButton::Right)
    }

    fn ensure_home(&mut self, camera: &impl CameraRecord) {
        if self.home.is_none() {
            self.capture_home(camera);
        }
    }

    fn viewport(&self) -> DVec2 {
        self.viewport_size.max(DVec2::ONE)
    }

    /// A pointer button was pressed at `position`, in logical pixels from the top left of the
    /// viewport. Ignored if a gesture is already in progress, or for buttons other than left,
    /// right, and middle.
    pub fn press(&mut self, position: DVec2, button: MouseButton) {
        if self.gesture.is_active() || PointerButtons::only(button).is_empty() {
            return;
        }
        self.gesture = GestureState::Indeterminate;
        self.pressed_button = Some(button);
        self.press_position = position;
        self.previous_pointer = position;
    }

    /// The pointer moved to `position` with `buttons` and `modifiers` held.
    ///
    /// While the gesture is still indeterminate, this promotes it to a drag once the pointer has
    /// travelled further than [`CLICK_THRESHOLD`] from the press. The kind of drag is decided by
    /// [`GestureKind::from_input`]. The first step of the drag is applied by the same move.
    pub fn pointer_move(
        &mut self,
        position: DVec2,
        buttons: PointerButtons,
        modifiers: ModifierKeys,
        camera: &mut impl CameraRecord,
        changed: &mut impl FnMut(),
    ) {
        self.ensure_home(&*camera);
        match self.gesture {
            GestureState::Idle => (),
            GestureState::Indeterminate => {
                if travel(self.press_position, position) <= CLICK_THRESHOLD {
                    return;
                }
                let Some(kind) = GestureKind::from_input(buttons, modifiers, self.pan_modifiers)
                else {
                    return;
                };
                if !self.enabled_motion.allows(kind) {
                    return;
                }
                if self.promote(kind, &*camera) {
                    self.pointer_move(position, buttons, modifiers, camera, changed);
                }
            }
            GestureState::Rotating { frame } => {
                self.rotate(frame, position, camera);
                changed();
            }
            GestureState::Dollying => {
                let distance = (self.target - camera.position()).length();
                let scale = self.distance_limits.drag_range(distance) / self.viewport().y
                    * self.sensitivity.zoom;
                let delta = scale * (self.previous_pointer.y - position.y);
                if self.apply_dolly(delta, camera) {
                    self.previous_pointer = position;
                    changed();
                }
            }
            GestureState::Panning => {
                let delta = DVec2::new(
                    self.previous_pointer.x - position.x,
                    position.y - self.previous_pointer.y,
                );
                self.previous_pointer = position;
                if self.apply_pan(delta, camera) {
                    changed();
                }
            }
        }
    }

    /// Returns `false`, leaving the gesture indeterminate, if a rotation has no frame to orbit in.
    fn promote(&mut self, kind: GestureKind, camera: &impl CameraRecord) -> bool {
        self.gesture = match kind {
            GestureKind::Rotate => {
                match BasisFrame::capture(camera.position(), camera.up(), self.target) {
                    Some(frame) => GestureState::Rotating { frame },
                    None => {
                        trace!("Orbit camera up is parallel to the view, not rotating");
                        return false;
                    }
                }
            }
            GestureKind::Dolly => GestureState::Dollying,
            GestureKind::Pan => GestureState::Panning,
        };
        debug!("Orbit camera drag started: {kind:?}");
        true
    }

    /// Angles are measured from the press, not the previous move, so the press position is never
    /// advanced during a rotation.
    fn rotate(&self, frame: BasisFrame, position: DVec2, camera: &mut impl CameraRecord) {
        let angles = SphericalAngles::from_drag(
            position - self.press_position,
            self.viewport(),
            self.sensitivity.rotate,
        );
        camera.set_position(frame.position_at(angles));
        camera.look_at(self.target, frame.up());
    }

    fn apply_dolly(&self, delta: f64, camera: &mut impl CameraRecord) -> bool {
        match dolly(camera.position(), self.target, delta, &self.distance_limits) {
            Some(position) => {
                camera.set_position(position);
                true
            }
            None => {
                trace!("Orbit camera dolly of {delta} rejected by {:?}", self.distance_limits);
                false
            }
        }
    }

    fn apply_pan(&mut self, delta: DVec2, camera: &mut impl CameraRecord) -> bool {
        let Some(step) = pan(
            camera.position(),
            self.target,
            camera.up(),
            camera.fov_degrees(),
            self.viewport().y,
            delta,
        ) else {
            trace!("Orbit camera up is parallel to the view, pan skipped");
            return false;
        };
        camera.set_position(step.position);
        self.target = step.target;
        true
    }

    /// The pointer button was released, ending the gesture.
    ///
    /// An orbit is finished off by straightening the camera's up vector, so that twist does not
    /// build up across gestures. [`OrbitCam::clicked`] reports whether the gesture ended before it
    /// became a drag.
    pub fn release(&mut self, camera: &mut impl CameraRecord, changed: &mut impl FnMut()) {
        if !self.gesture.is_active() {
            return;
        }
        if self.gesture.is_rotating() {
            let up = stabilize_up(camera.position(), self.target, camera.up());
            camera.set_up(up);
            changed();
        }
        self.clicked = self.gesture == GestureState::Indeterminate;
        if let Some(kind) = self.gesture.kind() {
            debug!("Orbit camera drag ended: {kind:?}");
        }
        self.gesture = GestureState::Idle;
        self.pressed_button = None;
    }

    /// The scroll wheel moved by `delta_y` pixels, positive toward the user. Dollies the camera
    /// away from the target for positive values and toward it for negative ones, as long as the
    /// result stays within [`OrbitCam::distance_limits`].
    pub fn wheel(
        &mut self,
        delta_y: f64,
        camera: &mut impl CameraRecord,
        changed: &mut impl FnMut(),
    ) {
        if self.gesture.is_active() || !self.enabled_motion.dolly {
            return;
        }
        self.ensure_home(&*camera);
        self.gesture = GestureState::Dollying;
        self.previous_pointer = DVec2::ZERO;
        let delta = -delta_y * self.sensitivity.wheel * self.sensitivity.zoom;
        if self.apply_dolly(delta, camera) {
            changed();
        }
        self.gesture = GestureState::Idle;
    }

    /// A key was pressed. The keys in [`OrbitCam::keys`] pan the camera by
    /// [`Sensitivity::key_pan`] pixels. Other keys are ignored.
    pub fn key_down(
        &mut self,
        key: KeyCode,
        camera: &mut impl CameraRecord,
        changed: &mut impl FnMut(),
    ) {
        if self.gesture.is_active() || !self.enabled_motion.pan {
            return;
        }
        let Some(direction) = self.keys.direction(key) else {
            return;
        };
        self.ensure_home(&*camera);
        self.gesture = GestureState::Panning;
        self.previous_pointer = DVec2::ZERO;
        if self.apply_pan(direction * self.sensitivity.key_pan, camera) {
            changed();
        }
        self.gesture = GestureState::Idle;
    }

    /// Return the camera and target to the home pose, cancelling any gesture in progress.
    pub fn reset(&mut self, camera: &mut impl CameraRecord, changed: &mut impl FnMut()) {
        self.ensure_home(&*camera);
        if let Some(home) = self.home {
            camera.set_position(home.position);
            camera.set_up(home.up);
            self.target = home.target;
        }
        self.gesture = GestureState::Idle;
        self.pressed_button = None;
        self.update(camera, changed);
    }

    /// Aim the camera at the target again. Call this after moving the camera or target from
    /// outside the controller.
    pub fn update(&mut self, camera: &mut impl CameraRecord, changed: &mut impl FnMut()) {
        let up = camera.up();
        camera.look_at(self.target, up);
        changed();
    }

    /// Apply [`OrbitCamInput`] events to their cameras. Called once per frame.
    pub fn apply_inputs(
        mut inputs: EventReader<OrbitCamInput>,
        mut cameras: Query<(&mut OrbitCam, &mut Transform, &Projection)>,
        mut changed_events: EventWriter<OrbitCamChanged>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        for input in inputs.read() {
            let entity = input.camera();
            let Ok((mut orbit_cam, transform, projection)) = cameras.get_mut(entity) else {
                continue;
            };
            let Some(mut camera) = TransformRecord::new(transform, projection) else {
                error_once!("Only perspective projections are supported by OrbitCam.");
                continue;
            };
            let mut changed = || {
                changed_events.write(OrbitCamChanged { camera: entity });
                redraw.write(RequestRedraw);
            };
            let camera = &mut camera;
            match *input {
                OrbitCamInput::Press {
                    position, button, ..
                } => orbit_cam.press(position.as_dvec2(), button),
                OrbitCamInput::Move {
                    position,
                    buttons,
                    modifiers,
                    ..
                } => orbit_cam.pointer_move(
                    position.as_dvec2(),
                    buttons,
                    modifiers,
                    camera,
                    &mut changed,
                ),
                OrbitCamInput::Release { .. } => orbit_cam.release(camera, &mut changed),
                OrbitCamInput::Wheel { delta_y, .. } => {
                    orbit_cam.wheel(delta_y as f64, camera, &mut changed)
                }
                OrbitCamInput::Key { key, .. } => orbit_cam.key_down(key, camera, &mut changed),
                OrbitCamInput::Reset { .. } => orbit_cam.reset(camera, &mut changed),
                OrbitCamInput::Update { .. } => orbit_cam.update(camera, &mut changed),
            }
        }
    }

    /// Copy each camera's logical viewport size into its controller.
    pub fn sync_viewports(mut cameras: Query<(&mut OrbitCam, &Camera)>) {
        for (mut orbit_cam, camera) in cameras.iter_mut() {
            let Some(size) = camera.logical_viewport_size() else {
                continue;
            };
            let size = size.as_dvec2();
            if orbit_cam.viewport_size != size {
                orbit_cam.viewport_size = size;
            }
        }
    }

    /// Remember the starting pose of newly added controllers.
    pub fn capture_added_homes(
        mut cameras: Query<(&mut OrbitCam, &Transform, &Projection), Added<OrbitCam>>,
    ) {
        for (mut orbit_cam, transform, projection) in cameras.iter_mut() {
            if orbit_cam.home.is_some() || !matches!(projection, Projection::Perspective(_)) {
                continue;
            }
            let target = orbit_cam.target;
            orbit_cam.home = Some(HomePose {
                position: transform.translation.as_dvec3(),
                up: transform.up().as_vec3().as_dvec3(),
                target,
            });
        }
    }
}

/// The sensitivity of the camera controller to inputs.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Sensitivity {
    /// Multiplies rotation. At `1.0`, dragging across the whole viewport orbits by a full turn.
    pub rotate: f64,
    /// Multiplies dolly, from both drags and the scroll wheel.
    pub zoom: f64,
    /// World units the camera dollies per pixel of scroll.
    pub wheel: f64,
    /// Pixels the camera pans per key press.
    pub key_pan: f64,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            rotate: 1.0,
            zoom: 1.0,
            wheel: 0.01,
            key_pan: 7.0,
        }
    }
}

/// Keys that pan the camera in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct PanKeys {
    /// Moves the camera up.
    pub up: KeyCode,
    /// Moves the camera down.
    pub down: KeyCode,
    /// Moves the camera left.
    pub left: KeyCode,
    /// Moves the camera right.
    pub right: KeyCode,
}

impl Default for PanKeys {
    fn default() -> Self {
        Self {
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
        }
    }
}

impl PanKeys {
    /// The unit pan direction bound to `key`, x to the right and y up.
    pub fn direction(&self, key: KeyCode) -> Option<DVec2> {
        if key == self.up {
            Some(DVec2::Y)
        } else if key == self.down {
            Some(DVec2::NEG_Y)
        } else if key == self.left {
            Some(DVec2::NEG_X)
        } else if key == self.right {
            Some(DVec2::X)
        } else {
            None
        }
    }
}

/// Controls what kinds of motions are allowed to initiate.
#[derive(Debug, Clone, Reflect)]
pub struct EnabledMotion {
    /// Should rotation be enabled?
    pub rotate: bool,
    /// Should dolly be enabled?
    pub dolly: bool,
    /// Should pan be enabled?
    pub pan: bool,
}

impl Default for EnabledMotion {
    fn default() -> Self {
        Self {
            rotate: true,
            dolly: true,
            pan: true,
        }
    }
}

impl EnabledMotion {
    /// Is `kind` enabled?
    pub fn allows(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Rotate => self.rotate,
            GestureKind::Dolly => self.dolly,
            GestureKind::Pan => self.pan,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::controller::record::CameraRig;

    const EPSILON: f64 = 1e-9;

    fn rig() -> CameraRig {
        CameraRig::looking_at(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y)
    }

    fn orbit_cam(rig: &CameraRig) -> OrbitCam {
        OrbitCam::new(rig, DVec3::ZERO).with_viewport_size(DVec2::splat(300.0))
    }

    fn drag(
        orbit_cam: &mut OrbitCam,
        rig: &mut CameraRig,
        button: MouseButton,
        path: &[DVec2],
    ) -> usize {
        let mut changes = 0;
        let mut changed = || changes += 1;
        orbit_cam.press(path[0], button);
        for position in &path[1..] {
            orbit_cam.pointer_move(
                *position,
                PointerButtons::only(button),
                ModifierKeys::NONE,
                rig,
                &mut changed,
            );
        }
        orbit_cam.release(rig, &mut changed);
        changes
    }

    #[test]
    fn horizontal_rotate_keeps_the_radius() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        orbit_cam.press(DVec2::new(100.0, 100.0), MouseButton::Left);
        let mut changes = 0;
        orbit_cam.pointer_move(
            DVec2::new(150.0, 100.0),
            PointerButtons::only(MouseButton::Left),
            ModifierKeys::NONE,
            &mut rig,
            &mut || changes += 1,
        );
        assert!(orbit_cam.gesture().is_rotating());
        assert_eq!(changes, 1);
        let expected = DVec3::new(-5.0 * (PI / 3.0).sin(), 0.0, 2.5);
        assert!(rig.position.distance(expected) < EPSILON, "{}", rig.position);
        assert!((rig.position.length() - 5.0).abs() < EPSILON);
        assert!(rig.forward().distance(-rig.position.normalize()) < EPSILON);
    }

    #[test]
    fn rotation_depends_only_on_total_displacement() {
        let mut direct = rig();
        let mut stepped = rig();
        let mut a = orbit_cam(&direct);
        let mut b = orbit_cam(&stepped);
        let start = DVec2::new(120.0, 80.0);
        let end = DVec2::new(190.0, 20.0);
        a.press(start, MouseButton::Left);
        b.press(start, MouseButton::Left);
        let buttons = PointerButtons::only(MouseButton::Left);
        a.pointer_move(end, buttons, ModifierKeys::NONE, &mut direct, &mut || ());
        for i in 1..=10 {
            let position = start.lerp(end, i as f64 / 10.0);
            b.pointer_move(position, buttons, ModifierKeys::NONE, &mut stepped, &mut || ());
        }
        assert!(direct.position.distance(stepped.position) < EPSILON);
    }

    #[test]
    fn small_motion_is_a_click() {
        let mut rig = rig();
        let before = rig;
        let mut orbit_cam = orbit_cam(&rig);
        let path = [DVec2::new(10.0, 10.0), DVec2::new(11.0, 11.0), DVec2::new(9.0, 10.0)];
        let changes = drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
        assert!(orbit_cam.clicked());
        assert_eq!(changes, 0);
        assert_eq!(rig, before);
        assert_eq!(*orbit_cam.gesture(), GestureState::Idle);
    }

    #[test]
    fn larger_motion_is_a_drag() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        let path = [DVec2::new(10.0, 10.0), DVec2::new(12.0, 11.0)];
        let changes = drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
        assert!(!orbit_cam.clicked());
        assert!(changes >= 1);
    }

    #[test]
    fn up_is_orthogonal_after_rotating() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        let path = [
            DVec2::new(150.0, 150.0),
            DVec2::new(200.0, 60.0),
            DVec2::new(260.0, 10.0),
        ];
        drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
        let view = (orbit_cam.target - rig.position).normalize();
        assert!(rig.up.dot(view).abs() < EPSILON);
        assert!((rig.up.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn orbits_over_the_pole_across_gestures() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        // Each drag tilts to just short of the pole of its own frame, a quarter turn, so two of
        // them carry the camera over the top to the far side.
        for _ in 0..2 {
            let path = [DVec2::new(150.0, 200.0), DVec2::new(150.0, 280.0)];
            drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
            assert!((rig.position.length() - 5.0).abs() < 1e-6);
        }
        assert!(rig.position.z < -4.9, "{}", rig.position);
    }

    #[test]
    fn wheel_dollies_within_limits() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig).with_distance_limits(DistanceLimits::new(1.0, 10.0));
        let mut changes = 0;
        orbit_cam.wheel(100.0, &mut rig, &mut || changes += 1);
        assert!((rig.position.length() - 6.0).abs() < EPSILON);
        orbit_cam.wheel(-100.0, &mut rig, &mut || changes += 1);
        orbit_cam.wheel(-100.0, &mut rig, &mut || changes += 1);
        assert!((rig.position.length() - 4.0).abs() < EPSILON);
        assert_eq!(changes, 3);

        let before = rig;
        orbit_cam.wheel(1000.0, &mut rig, &mut || changes += 1);
        orbit_cam.wheel(-500.0, &mut rig, &mut || changes += 1);
        assert_eq!(rig, before);
        assert_eq!(changes, 3);
        assert_eq!(*orbit_cam.gesture(), GestureState::Idle);
    }

    #[test]
    fn wheel_onto_the_target_is_rejected() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        let mut changes = 0;
        orbit_cam.wheel(-500.0, &mut rig, &mut || changes += 1);
        assert_eq!(rig.position, DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(changes, 0);

        orbit_cam.wheel(-400.0, &mut rig, &mut || changes += 1);
        assert!((rig.position.length() - 1.0).abs() < EPSILON);
        let path = [DVec2::new(100.0, 100.0), DVec2::new(140.0, 100.0)];
        drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
        assert!((rig.position.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn up_along_the_view_leaves_the_camera_untouched() {
        let mut rig = CameraRig::looking_at(DVec3::new(0.0, 5.0, 0.0), DVec3::ZERO, DVec3::Y);
        let before = rig;
        let mut orbit_cam = orbit_cam(&rig);
        let mut changes = 0;
        orbit_cam.key_down(KeyCode::ArrowLeft, &mut rig, &mut || changes += 1);
        assert_eq!(*orbit_cam.gesture(), GestureState::Idle);

        let path = [DVec2::new(100.0, 100.0), DVec2::new(140.0, 100.0)];
        changes += drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
        changes += drag(&mut orbit_cam, &mut rig, MouseButton::Right, &path);

        assert_eq!(changes, 0);
        assert_eq!(rig, before);
        assert_eq!(orbit_cam.target, DVec3::ZERO);
        assert!(rig.position.is_finite());
    }

    #[test]
    fn middle_drag_dollies() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig).with_distance_limits(DistanceLimits::new(1.0, 10.0));
        let path = [DVec2::new(100.0, 100.0), DVec2::new(100.0, 50.0)];
        drag(&mut orbit_cam, &mut rig, MouseButton::Middle, &path);
        // A full viewport height covers the 9 unit range, so 50 of 300 pixels covers 1.5 units.
        assert!((rig.position.length() - 3.5).abs() < EPSILON);
    }

    #[test]
    fn rejected_dolly_does_not_advance_the_pointer() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig).with_distance_limits(DistanceLimits::new(4.0, 10.0));
        let buttons = PointerButtons::only(MouseButton::Middle);
        let mut changes = 0;
        orbit_cam.press(DVec2::new(100.0, 200.0), MouseButton::Middle);
        // Would need 1.2 units of travel toward the target, but only 1 is allowed.
        orbit_cam.pointer_move(
            DVec2::new(100.0, 140.0),
            buttons,
            ModifierKeys::NONE,
            &mut rig,
            &mut || changes += 1,
        );
        assert_eq!(changes, 0);
        assert!((rig.position.length() - 5.0).abs() < EPSILON);
        // Moving back down is measured from the press, so it dollies away from the target.
        orbit_cam.pointer_move(
            DVec2::new(100.0, 220.0),
            buttons,
            ModifierKeys::NONE,
            &mut rig,
            &mut || changes += 1,
        );
        assert_eq!(changes, 1);
        assert!((rig.position.length() - 5.4).abs() < EPSILON);
    }

    #[test]
    fn right_drag_pans_camera_and_target() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        let path = [DVec2::new(100.0, 100.0), DVec2::new(130.0, 100.0)];
        drag(&mut orbit_cam, &mut rig, MouseButton::Right, &path);
        let scale = (25.0_f64).to_radians().tan() * 5.0 / 150.0;
        assert!((rig.position.x + 30.0 * scale).abs() < EPSILON);
        assert!((orbit_cam.target.x - rig.position.x).abs() < EPSILON);
        assert!(((rig.position - orbit_cam.target).length() - 5.0).abs() < EPSILON);
        assert!(!orbit_cam.clicked());
    }

    #[test]
    fn modifier_turns_left_drag_into_pan() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        orbit_cam.press(DVec2::new(100.0, 100.0), MouseButton::Left);
        let shift = ModifierKeys {
            shift: true,
            ..ModifierKeys::NONE
        };
        orbit_cam.pointer_move(
            DVec2::new(100.0, 140.0),
            PointerButtons::only(MouseButton::Left),
            shift,
            &mut rig,
            &mut || (),
        );
        assert_eq!(*orbit_cam.gesture(), GestureState::Panning);
        assert!(rig.position.y > 0.0);
        assert!((orbit_cam.target.y - rig.position.y).abs() < EPSILON);
    }

    #[test]
    fn arrow_keys_pan() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        let mut changes = 0;
        orbit_cam.key_down(KeyCode::ArrowLeft, &mut rig, &mut || changes += 1);
        assert!(rig.position.x < 0.0);
        assert!((orbit_cam.target.x - rig.position.x).abs() < EPSILON);
        orbit_cam.key_down(KeyCode::KeyQ, &mut rig, &mut || changes += 1);
        assert_eq!(changes, 1);
        assert_eq!(*orbit_cam.gesture(), GestureState::Idle);
    }

    #[test]
    fn inputs_are_ignored_during_a_gesture() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        orbit_cam.press(DVec2::new(100.0, 100.0), MouseButton::Right);
        orbit_cam.press(DVec2::new(10.0, 10.0), MouseButton::Left);
        let before = rig;
        let mut changes = 0;
        orbit_cam.wheel(100.0, &mut rig, &mut || changes += 1);
        orbit_cam.key_down(KeyCode::ArrowUp, &mut rig, &mut || changes += 1);
        assert_eq!(changes, 0);
        assert_eq!(rig, before);
        assert!(orbit_cam.suppresses_context_menu());
        orbit_cam.release(&mut rig, &mut || changes += 1);
        assert!(!orbit_cam.suppresses_context_menu());
        assert!(orbit_cam.clicked());
    }

    #[test]
    fn context_menu_is_only_suppressed_for_right_button() {
        let rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        orbit_cam.press(DVec2::ZERO, MouseButton::Left);
        assert!(!orbit_cam.suppresses_context_menu());
    }

    #[test]
    fn disabled_motion_never_starts() {
        let mut rig = rig();
        let before = rig;
        let mut orbit_cam = orbit_cam(&rig);
        orbit_cam.enabled_motion.rotate = false;
        orbit_cam.enabled_motion.dolly = false;
        let path = [DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0)];
        let changes = drag(&mut orbit_cam, &mut rig, MouseButton::Left, &path);
        orbit_cam.wheel(100.0, &mut rig, &mut || ());
        assert_eq!(changes, 0);
        assert_eq!(rig, before);
    }

    #[test]
    fn release_when_idle_is_a_no_op() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        let mut changes = 0;
        orbit_cam.release(&mut rig, &mut || changes += 1);
        assert_eq!(changes, 0);
        assert!(!orbit_cam.clicked());
    }

    #[test]
    fn reset_restores_home_and_is_idempotent() {
        let mut rig = rig();
        let home = rig;
        let mut orbit_cam = orbit_cam(&rig);
        drag(
            &mut orbit_cam,
            &mut rig,
            MouseButton::Left,
            &[DVec2::new(10.0, 10.0), DVec2::new(90.0, 70.0)],
        );
        drag(
            &mut orbit_cam,
            &mut rig,
            MouseButton::Right,
            &[DVec2::new(10.0, 10.0), DVec2::new(40.0, 30.0)],
        );
        assert_ne!(orbit_cam.target, DVec3::ZERO);

        let mut changes = 0;
        orbit_cam.reset(&mut rig, &mut || changes += 1);
        let once = (rig, orbit_cam.target);
        orbit_cam.reset(&mut rig, &mut || changes += 1);
        assert_eq!((rig, orbit_cam.target), once);
        assert_eq!(changes, 2);
        assert!(rig.position.distance(home.position) < EPSILON);
        assert_eq!(orbit_cam.target, DVec3::ZERO);
        assert!(rig.forward().distance(home.forward()) < EPSILON);
    }

    #[test]
    fn update_aims_at_a_moved_target() {
        let mut rig = rig();
        let mut orbit_cam = orbit_cam(&rig);
        orbit_cam.target = DVec3::new(0.0, 1.0, 0.0);
        let mut changes = 0;
        orbit_cam.update(&mut rig, &mut || changes += 1);
        assert_eq!(changes, 1);
        let expected = (orbit_cam.target - rig.position).normalize();
        assert!(rig.forward().distance(expected) < EPSILON);
    }

    #[test]
    fn home_is_captured_lazily() {
        let mut rig = rig();
        let mut orbit_cam = OrbitCam::with_target(DVec3::ZERO);
        assert!(orbit_cam.home().is_none());
        orbit_cam.wheel(50.0, &mut rig, &mut || ());
        let home = orbit_cam.home().unwrap();
        assert_eq!(home.position, DVec3::new(0.0, 0.0, 5.0));
    }
}
