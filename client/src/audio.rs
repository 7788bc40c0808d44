//! Audio for simulation cues and the station ambience.
//!
//! A sound whose asset failed to load is skipped; audio is never fatal.

use bevy::asset::LoadState;
use bevy::audio::Volume;
use bevy::prelude::*;
use metrito_shared::{PresentationRequest, SoundCue};

use crate::gameplay::Presentation;
use crate::states::GameState;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_audio);
        app.add_systems(OnEnter(GameState::Playing), ensure_ambient_entity);
        app.add_systems(Update, play_cues);
    }
}

/// Resource holding all loaded audio assets
#[derive(Resource)]
pub struct GameAudio {
    pub glitch: Handle<AudioSource>,
    pub stairs_block: Handle<AudioSource>,
    pub found: Handle<AudioSource>,
    pub ambience: Handle<AudioSource>,
}

impl GameAudio {
    fn cue(&self, cue: SoundCue) -> &Handle<AudioSource> {
        match cue {
            SoundCue::Glitch => &self.glitch,
            SoundCue::StairsBlock => &self.stairs_block,
            SoundCue::Found => &self.found,
        }
    }
}

/// Marker for the looping ambience entity
#[derive(Component)]
pub struct AmbientSound;

pub fn setup_audio(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("Audio system: Loading audio assets...");
    commands.insert_resource(GameAudio {
        glitch: asset_server.load("audio/glitch_scare.mp3"),
        stairs_block: asset_server.load("audio/scary.mp3"),
        found: asset_server.load("audio/found.mp3"),
        ambience: asset_server.load("audio/horrorambience.mp3"),
    });
}

fn is_playable(asset_server: &AssetServer, handle: &Handle<AudioSource>) -> bool {
    !matches!(asset_server.get_load_state(handle), Some(LoadState::Failed(_)))
}

/// Spawn the ambience loop the first time gameplay starts.
pub fn ensure_ambient_entity(
    mut commands: Commands,
    audio: Option<Res<GameAudio>>,
    asset_server: Res<AssetServer>,
    existing: Query<(), With<AmbientSound>>,
) {
    if !existing.is_empty() {
        return;
    }
    let Some(audio) = audio else { return };
    if !is_playable(&asset_server, &audio.ambience) {
        warn!("Ambience audio failed to load, playing without it");
        return;
    }

    info!("Starting station ambience");
    commands.spawn((
        AmbientSound,
        AudioPlayer::new(audio.ambience.clone()),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(0.4)),
    ));
}

pub fn play_cues(
    mut commands: Commands,
    mut presentation: MessageReader<Presentation>,
    audio: Option<Res<GameAudio>>,
    asset_server: Res<AssetServer>,
) {
    for Presentation(request) in presentation.read() {
        let PresentationRequest::PlaySound(cue) = request else {
            continue;
        };
        let Some(audio) = audio.as_ref() else {
            debug!("No audio resource, skipping {:?}", cue);
            continue;
        };
        let handle = audio.cue(*cue);
        if !is_playable(&asset_server, handle) {
            debug!("Sound for {:?} unavailable, skipping", cue);
            continue;
        }
        commands.spawn((AudioPlayer::new(handle.clone()), PlaybackSettings::DESPAWN));
    }
}
