//! Player input handling
//!
//! Keyboard and mouse are read every frame and accumulated until the next
//! fixed tick consumes them.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use metrito_shared::{HeldKeys, TickInput};

use crate::states::GameState;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AccumulatedInput>();
        app.add_systems(
            Update,
            (handle_keyboard_input, handle_mouse_input, grab_cursor, return_to_menu)
                .run_if(in_state(GameState::Playing)),
        );
        app.add_systems(OnExit(GameState::Playing), clear_input);
        app.add_systems(OnEnter(GameState::MainMenu), release_cursor);
    }
}

/// Input gathered since the last fixed tick.
#[derive(Resource, Default, Debug)]
pub struct AccumulatedInput {
    pending: TickInput,
}

impl AccumulatedInput {
    /// Hand the pending input to a tick. Held keys carry over; mouse motion
    /// and key presses are consumed.
    pub fn take_for_tick(&mut self) -> TickInput {
        let input = self.pending;
        self.pending = TickInput {
            held: input.held,
            ..default()
        };
        input
    }
}

pub fn handle_keyboard_input(keyboard: Res<ButtonInput<KeyCode>>, mut accumulated: ResMut<AccumulatedInput>) {
    let pending = &mut accumulated.pending;
    pending.held = HeldKeys {
        forward: keyboard.pressed(KeyCode::KeyW),
        backward: keyboard.pressed(KeyCode::KeyS),
        left: keyboard.pressed(KeyCode::KeyA),
        right: keyboard.pressed(KeyCode::KeyD),
    };
    pending.interact |= keyboard.just_pressed(KeyCode::KeyY);
    pending.collect |= keyboard.just_pressed(KeyCode::KeyX);
    pending.toggle_noclip |= keyboard.just_pressed(KeyCode::KeyB);
    pending.jump |= keyboard.just_pressed(KeyCode::Space);
}

/// Mouse look only counts while the cursor is captured.
pub fn handle_mouse_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    cursor_opts: Query<&CursorOptions, With<PrimaryWindow>>,
    mut accumulated: ResMut<AccumulatedInput>,
) {
    let locked = cursor_opts
        .single()
        .is_ok_and(|cursor| cursor.grab_mode == CursorGrabMode::Locked);

    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }
    if locked {
        accumulated.pending.look_delta += delta;
    }
}

pub fn grab_cursor(
    mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if let Ok(mut cursor) = cursor_opts.single_mut() {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}

fn return_to_menu(keyboard: Res<ButtonInput<KeyCode>>, mut next_state: ResMut<NextState<GameState>>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        info!("Escape pressed - back to main menu");
        next_state.set(GameState::MainMenu);
    }
}

fn clear_input(mut accumulated: ResMut<AccumulatedInput>) {
    accumulated.pending = TickInput::default();
}

pub fn release_cursor(mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    if let Ok(mut cursor) = cursor_opts.single_mut() {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}
