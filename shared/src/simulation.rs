//! The simulation context: owns the player, the loaded world and every timer,
//! and advances them one fixed tick at a time.

use bevy::prelude::*;
use std::time::Duration;

use crate::anomaly::AnomalyTracker;
use crate::collision::{resolve_move, CollisionContext, MoveOutcome};
use crate::config::WorldConfig;
use crate::floor::settle_player;
use crate::glitch::{detect_overlaps, flag_anomalies};
use crate::interaction::{
    find_target, hint_for, is_collectible, AimTarget, Interactable, InteractableId, InteractableSet,
    DEFAULT_TEMPLATES,
};
use crate::movement::{advance_jump, can_start_jump, key_displacements, start_jump, HeldKeys};
use crate::player::PlayerState;
use crate::presentation::{
    DialogueSlot, Hint, PresentationRequest, SoundCue, ANOMALY_TEXT, ANOMALY_VISIBLE, PICKUP_TEXT,
    PICKUP_VISIBLE, STAIRS_WARNING_TEXT, STAIRS_WARNING_VISIBLE,
};
use crate::scene::SceneGraph;
use crate::spatial::SpatialIndex;
use crate::timers::{AutoHide, Cooldown};

/// Input gathered since the previous tick. Discrete actions are edge
/// triggered: one `true` per key press.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub held: HeldKeys,
    /// Mouse motion in pixels.
    pub look_delta: Vec2,
    pub interact: bool,
    pub collect: bool,
    pub toggle_noclip: bool,
    pub jump: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pub soda: bool,
}

#[derive(Resource)]
pub struct Simulation {
    config: WorldConfig,
    scene: SceneGraph,
    /// Set exactly once, when the scene finishes loading.
    index: Option<SpatialIndex>,
    load_failed: bool,
    player: PlayerState,
    interactables: InteractableSet,
    inventory: Inventory,
    inspecting: Option<InteractableId>,
    target: Option<AimTarget>,
    anomaly: AnomalyTracker,
    anomaly_dialogue: AutoHide,
    warning: Cooldown,
    clock: Duration,
}

impl Simulation {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            player: PlayerState::new(config.spawn_position),
            warning: Cooldown::new(config.warning_cooldown()),
            config,
            scene: SceneGraph::new(),
            index: None,
            load_failed: false,
            interactables: InteractableSet::new(),
            inventory: Inventory::default(),
            inspecting: None,
            target: None,
            anomaly: AnomalyTracker::default(),
            anomaly_dialogue: AutoHide::default(),
            clock: Duration::ZERO,
        }
    }

    /// Take ownership of the loaded scene and build the spatial index,
    /// interactables and glitch flags from it. Only the first call after a
    /// successful load counts.
    pub fn on_scene_loaded(&mut self, scene: SceneGraph) {
        if self.index.is_some() {
            warn!("Scene already loaded, ignoring second scene");
            return;
        }
        if self.load_failed {
            warn!("Scene arrived after a load failure, ignoring it");
            return;
        }

        let index = SpatialIndex::from_scene(&scene);
        let mut interactables = InteractableSet::new();
        interactables.populate_from_templates(&scene, DEFAULT_TEMPLATES);
        let glitches = detect_overlaps(&scene, index.platform_segments());
        flag_anomalies(&mut interactables, &scene, &glitches);

        info!(
            "Scene ready: {} nodes, {} obstacles, {} floors, {} interactables, {} glitches",
            scene.len(),
            index.obstacles().len(),
            index.floors().len(),
            interactables.len(),
            glitches.len()
        );

        self.scene = scene;
        self.interactables = interactables;
        self.index = Some(index);
    }

    /// Record a load failure. The world stays unconstrained from then on.
    pub fn on_scene_failed(&mut self, reason: &str) {
        if self.load_failed || self.index.is_some() {
            return;
        }
        error!("Failed to load station scene: {}", reason);
        self.load_failed = true;
    }

    /// Advance one fixed step.
    pub fn tick(&mut self, input: &TickInput, delta: Duration) -> Vec<PresentationRequest> {
        let mut requests = Vec::new();
        self.clock += delta;
        self.anomaly_dialogue.tick(delta);

        if input.toggle_noclip {
            self.player.noclip = !self.player.noclip;
            info!("No-clip {}", if self.player.noclip { "on" } else { "off" });
        }
        if input.interact {
            self.interact(&mut requests);
        }
        if input.collect {
            self.collect(&mut requests);
        }
        if input.jump && can_start_jump(&self.player, &self.config) {
            start_jump(&mut self.player);
        }

        if self.inspecting.is_none() {
            self.player.apply_look(
                input.look_delta,
                self.config.mouse_sensitivity,
                self.config.pitch_limit,
            );
            self.walk(input.held, &mut requests);
        }

        if self.player.jump.active {
            if advance_jump(&mut self.player, &self.config) {
                settle_player(&self.scene, self.index.as_ref(), &self.config, &mut self.player);
            }
        } else {
            settle_player(&self.scene, self.index.as_ref(), &self.config, &mut self.player);
        }

        self.update_target();
        self.anomaly.update(
            self.config.anomaly_zone.as_ref(),
            self.player.position(),
            self.anomaly_dialogue.is_visible(),
        );

        requests
    }

    fn walk(&mut self, held: HeldKeys, requests: &mut Vec<PresentationRequest>) {
        let speed = self.config.move_speed(self.player.noclip);
        for delta in key_displacements(held, &self.player, speed) {
            let ctx = CollisionContext {
                scene: &self.scene,
                index: self.index.as_ref(),
                config: &self.config,
                noclip: self.player.noclip,
            };
            match resolve_move(&ctx, self.player.position(), delta) {
                MoveOutcome::Accepted(position) => self.player.set_position(position),
                MoveOutcome::Blocked { warn: true } => {
                    if self.warning.try_fire(self.clock) {
                        requests.push(PresentationRequest::dialogue(
                            DialogueSlot::Narration,
                            STAIRS_WARNING_TEXT,
                            STAIRS_WARNING_VISIBLE,
                        ));
                        requests.push(PresentationRequest::PlaySound(SoundCue::StairsBlock));
                    }
                }
                MoveOutcome::Blocked { warn: false } => {}
            }
        }
    }

    fn interact(&mut self, requests: &mut Vec<PresentationRequest>) {
        if self.inspecting.take().is_some() {
            info!("Inspect closed");
            requests.push(PresentationRequest::CloseInspect);
            return;
        }

        if self.anomaly.inside() {
            info!("Anomaly triggered");
            self.anomaly_dialogue.show(ANOMALY_VISIBLE);
            requests.push(PresentationRequest::dialogue(
                DialogueSlot::Anomaly,
                ANOMALY_TEXT,
                ANOMALY_VISIBLE,
            ));
            requests.push(PresentationRequest::PlaySound(SoundCue::Glitch));
            return;
        }

        let Some(target) = self.target.take() else {
            return;
        };
        let Some(item) = self.interactables.get(target.id) else {
            return;
        };
        info!("Inspecting {}", item.name);
        let non_blank = |text: &str| (!text.trim().is_empty()).then(|| text.to_string());
        requests.push(PresentationRequest::HideDialogue(DialogueSlot::Anomaly));
        requests.push(PresentationRequest::OpenInspect {
            description: non_blank(&item.description),
            bottom_text: non_blank(&item.bottom_text),
        });
        self.anomaly_dialogue.hide();
        self.inspecting = Some(target.id);
    }

    fn collect(&mut self, requests: &mut Vec<PresentationRequest>) {
        if self.inventory.soda {
            return;
        }
        let collectible = self
            .target_interactable()
            .is_some_and(|item| is_collectible(item, &self.config.collectible_prefix));
        if !collectible {
            return;
        }
        info!("Collected a soda");
        self.inventory.soda = true;
        requests.push(PresentationRequest::PlaySound(SoundCue::Found));
        requests.push(PresentationRequest::ShowPickup {
            text: PICKUP_TEXT.to_string(),
            visible_for: PICKUP_VISIBLE,
        });
    }

    fn update_target(&mut self) {
        if self.inspecting.is_some() || self.interactables.is_empty() {
            self.target = None;
            return;
        }
        self.target = find_target(
            &self.scene,
            &self.interactables,
            self.player.position(),
            self.player.view_direction(),
            self.config.interact_distance,
        );
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Whether collision and floor snapping are active.
    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn interactables(&self) -> &InteractableSet {
        &self.interactables
    }

    pub fn inventory(&self) -> Inventory {
        self.inventory
    }

    pub fn is_inspecting(&self) -> bool {
        self.inspecting.is_some()
    }

    pub fn target(&self) -> Option<AimTarget> {
        self.target
    }

    pub fn target_interactable(&self) -> Option<&Interactable> {
        self.target.and_then(|t| self.interactables.get(t.id))
    }

    pub fn in_anomaly_zone(&self) -> bool {
        self.anomaly.inside()
    }

    /// Hint to show, if any. Inside the anomaly zone the interact key acts on
    /// the zone, so no target hint is offered there.
    pub fn hint(&self) -> Option<Hint> {
        if self.inspecting.is_some() {
            return None;
        }
        if self.anomaly.inside() {
            return self.anomaly.hint_visible().then_some(Hint::LookCloser);
        }
        self.target_interactable()
            .map(|item| hint_for(item, &self.config.collectible_prefix, self.inventory.soda))
    }
}
