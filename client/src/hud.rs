//! In-game HUD: aim hint, inspect panel, pickup overlay and inventory.

use bevy::prelude::*;
use metrito_shared::{AutoHide, Hint, PresentationRequest, Simulation};

use crate::camera::PlayerCamera;
use crate::gameplay::Presentation;
use crate::states::GameState;
use crate::ui::styles::{PANEL_BACKGROUND, TEXT_COLOR, TEXT_MUTED};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudState>();
        app.add_systems(OnEnter(GameState::Playing), spawn_hud);
        app.add_systems(OnExit(GameState::Playing), despawn_hud);
        app.add_systems(Update, (apply_hud_requests, tick_pickup).chain());
        app.add_systems(
            Update,
            (update_hint, update_inspect_panel, update_pickup_overlay, update_inventory)
                .after(tick_pickup)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Panel contents requested by the simulation. Survives the HUD being
/// despawned while the menu is open.
#[derive(Resource, Default)]
pub struct HudState {
    /// `Some` while inspecting: (description, bottom line).
    inspect: Option<(Option<String>, Option<String>)>,
    pickup: AutoHide,
    pickup_text: String,
}

#[derive(Component)]
struct HudRoot;

#[derive(Component)]
struct HintText;

#[derive(Component)]
struct InspectPanel;

#[derive(Component)]
struct InspectText;

#[derive(Component)]
struct InspectBottom;

#[derive(Component)]
struct PickupOverlay;

#[derive(Component)]
struct InventoryIcon;

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Pickable::IGNORE,
        ))
        .with_children(|parent| {
            // Center dot
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                BorderRadius::all(Val::Px(2.0)),
            ));

            parent.spawn((
                HintText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    position_type: PositionType::Absolute,
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
                Visibility::Hidden,
            ));

            parent
                .spawn((
                    InspectPanel,
                    Node {
                        position_type: PositionType::Absolute,
                        right: Val::Px(40.0),
                        top: Val::Percent(30.0),
                        width: Val::Px(320.0),
                        padding: UiRect::all(Val::Px(16.0)),
                        ..default()
                    },
                    BackgroundColor(PANEL_BACKGROUND),
                    Visibility::Hidden,
                ))
                .with_children(|panel| {
                    panel.spawn((
                        InspectText,
                        Text::new(""),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
                });

            parent.spawn((
                InspectBottom,
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(TEXT_MUTED),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(60.0),
                    ..default()
                },
                Visibility::Hidden,
            ));

            parent.spawn((
                PickupOverlay,
                Text::new(""),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Percent(20.0),
                    ..default()
                },
                Visibility::Hidden,
            ));

            parent.spawn((
                InventoryIcon,
                Text::new("[ refresco ]"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(20.0),
                    bottom: Val::Px(20.0),
                    padding: UiRect::all(Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
                Visibility::Hidden,
            ));
        });
}

fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn apply_hud_requests(mut presentation: MessageReader<Presentation>, mut hud: ResMut<HudState>) {
    for Presentation(request) in presentation.read() {
        match request {
            PresentationRequest::OpenInspect {
                description,
                bottom_text,
            } => {
                hud.inspect = Some((description.clone(), bottom_text.clone()));
            }
            PresentationRequest::CloseInspect => hud.inspect = None,
            PresentationRequest::ShowPickup { text, visible_for } => {
                hud.pickup_text = text.clone();
                hud.pickup.show(*visible_for);
            }
            _ => {}
        }
    }
}

fn tick_pickup(time: Res<Time>, mut hud: ResMut<HudState>) {
    hud.pickup.tick(time.delta());
}

/// Place the hint over the aimed-at object, or at the bottom of the screen
/// for the anomaly zone.
fn update_hint(
    simulation: Res<Simulation>,
    camera: Query<(&Camera, &GlobalTransform), With<PlayerCamera>>,
    mut hint: Query<(&mut Text, &mut Node, &mut Visibility), With<HintText>>,
) {
    let Ok((mut text, mut node, mut visibility)) = hint.single_mut() else {
        return;
    };
    let Some(current) = simulation.hint() else {
        *visibility = Visibility::Hidden;
        return;
    };

    let anchor = match current {
        Hint::LookCloser => None,
        _ => simulation
            .target()
            .and_then(|t| simulation.interactables().get(t.id))
            .map(|item| simulation.scene().world_position(item.node)),
    };

    match anchor {
        Some(world_pos) => {
            let Ok((camera, camera_transform)) = camera.single() else {
                return;
            };
            let Ok(screen) = camera.world_to_viewport(camera_transform, world_pos) else {
                // Behind the camera.
                *visibility = Visibility::Hidden;
                return;
            };
            node.left = Val::Px(screen.x);
            node.top = Val::Px(screen.y);
            node.bottom = Val::Auto;
        }
        None => {
            node.left = Val::Auto;
            node.top = Val::Auto;
            node.bottom = Val::Percent(25.0);
        }
    }

    **text = current.text().to_string();
    *visibility = Visibility::Visible;
}

fn update_inspect_panel(
    hud: Res<HudState>,
    mut panel: Query<&mut Visibility, (With<InspectPanel>, Without<InspectBottom>)>,
    mut panel_text: Query<&mut Text, (With<InspectText>, Without<InspectBottom>)>,
    mut bottom: Query<(&mut Text, &mut Visibility), (With<InspectBottom>, Without<InspectText>)>,
) {
    let (description, bottom_line) = match &hud.inspect {
        Some((description, bottom_line)) => (description.as_deref(), bottom_line.as_deref()),
        None => (None, None),
    };

    if let Ok(mut visibility) = panel.single_mut() {
        *visibility = if description.is_some() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
    if let (Some(description), Ok(mut text)) = (description, panel_text.single_mut()) {
        **text = description.to_string();
    }
    if let Ok((mut text, mut visibility)) = bottom.single_mut() {
        match bottom_line {
            Some(line) => {
                **text = line.to_string();
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn update_pickup_overlay(hud: Res<HudState>, mut overlay: Query<(&mut Text, &mut Visibility), With<PickupOverlay>>) {
    let Ok((mut text, mut visibility)) = overlay.single_mut() else {
        return;
    };
    if hud.pickup.is_visible() {
        **text = hud.pickup_text.clone();
        *visibility = Visibility::Visible;
    } else {
        *visibility = Visibility::Hidden;
    }
}

fn update_inventory(simulation: Res<Simulation>, mut icon: Query<&mut Visibility, With<InventoryIcon>>) {
    let Ok(mut visibility) = icon.single_mut() else {
        return;
    };
    *visibility = if simulation.inventory().soda {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
}
