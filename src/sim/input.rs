//! Keyboard stand-ins for XR session events and controller gestures.
//!
//! | Key          | Action                              |
//! |--------------|-------------------------------------|
//! | Space        | Select, right controller            |
//! | F            | Select, left controller             |
//! | G            | Squeeze, right controller           |
//! | Delete       | Clear persistent anchors            |
//! | C            | Toggle right controller connection  |
//! | R            | Restart the session (restore again) |
//! | WASD         | Walk                                |
//! | Arrow keys   | Look around                         |

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::anchors::ClearAnchorsRequest;
use crate::collaborators::Hand;
use crate::constants::SIM_EYE_HEIGHT;
use crate::interaction::{
    Controller, ControllerConnected, ControllerDisconnected, ControllerLink, SelectGesture,
    SqueezeGesture, Viewer,
};
use crate::restoration::SessionStarted;

const WALK_SPEED: f32 = 1.5;
const TURN_SPEED: f32 = 1.2;
const PITCH_LIMIT: f32 = 1.2;

/// Head yaw/pitch, kept apart from the transform so pitch can be clamped
#[derive(Component, Debug, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

/// Camera as the viewer's head, with both controllers held in front of it
pub fn spawn_rig(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Viewer"),
            Camera3d::default(),
            Viewer,
            LookAngles::default(),
            Transform::from_xyz(0.0, SIM_EYE_HEIGHT, 2.0),
        ))
        .with_children(|head| {
            for (hand, x) in [(Hand::Left, -0.2), (Hand::Right, 0.2)] {
                head.spawn((
                    Name::new(format!("{} controller", hand.label())),
                    Controller { hand },
                    Transform::from_xyz(x, -0.35, -0.4),
                ));
            }
        });
}

/// The desktop session is "tracking" as soon as the app starts
pub fn start_session(
    mut session: MessageWriter<SessionStarted>,
    mut connected: MessageWriter<ControllerConnected>,
) {
    session.write(SessionStarted);
    connected.write(ControllerConnected { hand: Hand::Left });
    connected.write(ControllerConnected { hand: Hand::Right });
}

#[allow(clippy::too_many_arguments)]
pub fn keyboard_gestures(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    controllers: Query<(&Controller, &ControllerLink)>,
    mut select: MessageWriter<SelectGesture>,
    mut squeeze: MessageWriter<SqueezeGesture>,
    mut clear: MessageWriter<ClearAnchorsRequest>,
    mut connect: MessageWriter<ControllerConnected>,
    mut disconnect: MessageWriter<ControllerDisconnected>,
    mut session: MessageWriter<SessionStarted>,
) {
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        select.write(SelectGesture { hand: Hand::Right });
    }
    if keyboard.just_pressed(KeyCode::KeyF) {
        select.write(SelectGesture { hand: Hand::Left });
    }
    if keyboard.just_pressed(KeyCode::KeyG) {
        squeeze.write(SqueezeGesture { hand: Hand::Right });
    }
    if keyboard.just_pressed(KeyCode::Delete) {
        clear.write(ClearAnchorsRequest);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        session.write(SessionStarted);
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        let right_connected = controllers
            .iter()
            .any(|(controller, link)| controller.hand == Hand::Right && link.connected);
        if right_connected {
            disconnect.write(ControllerDisconnected { hand: Hand::Right });
        } else {
            connect.write(ControllerConnected { hand: Hand::Right });
        }
    }
}

pub fn move_viewer(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut contexts: EguiContexts,
    mut viewer: Query<(&mut Transform, &mut LookAngles), With<Viewer>>,
) {
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let Ok((mut transform, mut look)) = viewer.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    let axis = |negative: KeyCode, positive: KeyCode| {
        keyboard.pressed(positive) as i32 as f32 - keyboard.pressed(negative) as i32 as f32
    };

    look.yaw += axis(KeyCode::ArrowRight, KeyCode::ArrowLeft) * TURN_SPEED * dt;
    look.pitch = (look.pitch + axis(KeyCode::ArrowDown, KeyCode::ArrowUp) * TURN_SPEED * dt)
        .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    transform.rotation = Quat::from_euler(EulerRot::YXZ, look.yaw, look.pitch, 0.0);

    // Walk on the floor plane regardless of pitch
    let yaw = Quat::from_rotation_y(look.yaw);
    let forward = yaw * Vec3::NEG_Z;
    let right = yaw * Vec3::X;
    let step = forward * axis(KeyCode::KeyS, KeyCode::KeyW) + right * axis(KeyCode::KeyA, KeyCode::KeyD);
    transform.translation += step.normalize_or_zero() * WALK_SPEED * dt;
}
