//! Main menu UI

use bevy::prelude::*;

use super::styles::*;
use crate::states::GameState;

pub struct MainMenuPlugin;

impl Plugin for MainMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::MainMenu), spawn_main_menu);
        app.add_systems(OnExit(GameState::MainMenu), despawn_main_menu);
        app.add_systems(
            Update,
            (button_interactions, handle_menu_actions, fade_notice).run_if(in_state(GameState::MainMenu)),
        );
    }
}

/// Marker for the main menu root
#[derive(Component)]
struct MainMenuRoot;

/// "Coming soon" notice shown by the settings button
#[derive(Component)]
struct SettingsNotice {
    timer: Timer,
}

#[derive(Component, Clone, Copy)]
enum MenuButton {
    Continue,
    Settings,
}

fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(MENU_BACKGROUND),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("METRITO"),
                title_text_style(),
                TextColor(ACCENT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    padding: UiRect::all(Val::Px(10.0)),
                    ..default()
                })
                .with_children(|btn_container| {
                    spawn_button(btn_container, "CONTINUE", MenuButton::Continue);
                    spawn_button(btn_container, "SETTINGS", MenuButton::Settings);
                });

            parent.spawn((
                SettingsNotice {
                    timer: Timer::from_seconds(2.5, TimerMode::Once),
                },
                Text::new("Settings coming soon!"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(TEXT_MUTED),
                Node {
                    margin: UiRect::top(Val::Px(12.0)),
                    ..default()
                },
                Visibility::Hidden,
            ));

            parent.spawn((
                Text::new("WASD mover | Y interactuar | X tomar | Espacio saltar | Esc menú"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_MUTED),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(20.0),
                    ..default()
                },
            ));
        });
}

fn spawn_button(parent: &mut bevy::ecs::hierarchy::ChildSpawnerCommands<'_>, text: &str, action: MenuButton) {
    parent
        .spawn((
            Button,
            action,
            button_style(),
            BackgroundColor(BUTTON_NORMAL),
            BorderColor::from(BUTTON_BORDER),
            BorderRadius::all(Val::Px(6.0)),
        ))
        .with_children(|btn| {
            btn.spawn((Text::new(text), button_text_style(), TextColor(TEXT_COLOR)));
        });
}

fn despawn_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn button_interactions(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, mut bg_color, mut border_color) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BackgroundColor(BUTTON_PRESSED);
                *border_color = BorderColor::from(ACCENT_COLOR);
            }
            Interaction::Hovered => {
                *bg_color = BackgroundColor(BUTTON_HOVERED);
                *border_color = BorderColor::from(ACCENT_COLOR);
            }
            Interaction::None => {
                *bg_color = BackgroundColor(BUTTON_NORMAL);
                *border_color = BorderColor::from(BUTTON_BORDER);
            }
        };
    }
}

fn handle_menu_actions(
    buttons: Query<(&Interaction, &MenuButton), Changed<Interaction>>,
    mut notice: Query<(&mut SettingsNotice, &mut Visibility)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            MenuButton::Continue => {
                info!("Continue pressed - entering the station");
                next_state.set(GameState::Playing);
            }
            MenuButton::Settings => {
                if let Ok((mut notice, mut visibility)) = notice.single_mut() {
                    notice.timer.reset();
                    *visibility = Visibility::Visible;
                }
            }
        }
    }
}

fn fade_notice(time: Res<Time>, mut notice: Query<(&mut SettingsNotice, &mut Visibility)>) {
    for (mut notice, mut visibility) in notice.iter_mut() {
        if *visibility == Visibility::Hidden {
            continue;
        }
        notice.timer.tick(time.delta());
        if notice.timer.just_finished() {
            *visibility = Visibility::Hidden;
        }
    }
}
