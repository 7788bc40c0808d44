//! Metrito client - renders the station and drives the simulation.

mod audio;
mod camera;
mod dialogue;
mod gameplay;
mod hud;
mod input;
mod scene_loader;
mod states;
mod ui;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use metrito_shared::config::load_world_config_or_default;
use metrito_shared::TICK_HZ;
use states::GameState;

/// Get the asset path - for bundled macOS apps, use path relative to executable
fn get_asset_path() -> String {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                info!("Using bundled assets at: {:?}", bundled_assets);
                return bundled_assets.to_string_lossy().to_string();
            }
        }
    }
    "assets".to_string()
}

fn main() {
    let asset_path = get_asset_path();
    let config_path = std::path::Path::new(&asset_path).join("world.ron");

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Metrito".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path,
                ..default()
            }),
    );

    // Config is read after DefaultPlugins so the fallback warning is logged.
    let config = load_world_config_or_default(&config_path);

    app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ));
    app.init_state::<GameState>();

    app.add_plugins(gameplay::GameplayPlugin { config });
    app.add_plugins(scene_loader::SceneLoaderPlugin);
    app.add_plugins(input::InputPlugin);
    app.add_plugins(camera::CameraPlugin);
    app.add_plugins(hud::HudPlugin);
    app.add_plugins(dialogue::DialoguePlugin);
    app.add_plugins(audio::GameAudioPlugin);
    app.add_plugins(ui::MainMenuPlugin);

    info!("Starting Metrito at {} Hz", TICK_HZ);
    app.run();
}
