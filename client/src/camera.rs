//! First-person camera following the simulated player.

use bevy::prelude::*;
use metrito_shared::Simulation;

const FOV_DEFAULT: f32 = 70.0_f32.to_radians();
/// Narrowed FOV while inspecting an object.
const FOV_INSPECT: f32 = 30.0_f32.to_radians();

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
        app.add_systems(Update, (update_camera, update_camera_fov));
    }
}

#[derive(Component)]
pub struct PlayerCamera;

fn spawn_camera(mut commands: Commands, simulation: Res<Simulation>) {
    let player = simulation.player();
    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEFAULT,
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(player.position()).with_rotation(player.view_rotation()),
    ));
}

/// Snap the camera onto the player pose. The simulation already moves in
/// small fixed steps, so no smoothing is applied.
pub fn update_camera(simulation: Res<Simulation>, mut camera: Query<&mut Transform, With<PlayerCamera>>) {
    let Ok(mut transform) = camera.single_mut() else {
        return;
    };
    let player = simulation.player();
    transform.translation = player.position();
    transform.rotation = player.view_rotation();
}

pub fn update_camera_fov(
    simulation: Res<Simulation>,
    mut camera: Query<&mut Projection, With<PlayerCamera>>,
    time: Res<Time>,
) {
    let Ok(mut projection) = camera.single_mut() else {
        return;
    };
    let Projection::Perspective(ref mut persp) = *projection else {
        return;
    };

    let target_fov = if simulation.is_inspecting() {
        FOV_INSPECT
    } else {
        FOV_DEFAULT
    };

    let zoom_speed = 12.0;
    let t = 1.0 - (-zoom_speed * time.delta_secs()).exp();
    persp.fov = persp.fov + (target_fov - persp.fov) * t;
}
