//! Simulation core for the subway station vignette.
//!
//! Everything here is engine-agnostic game logic: the client feeds it a scene
//! graph once the glTF is loaded, then drives [`Simulation::tick`] every fixed
//! step and renders whatever state and requests come back.

pub mod anomaly;
pub mod collision;
pub mod config;
pub mod floor;
pub mod geometry;
pub mod glitch;
pub mod interaction;
pub mod movement;
pub mod naming;
pub mod player;
pub mod presentation;
pub mod scene;
pub mod simulation;
pub mod spatial;
pub mod timers;

pub use anomaly::{AnomalyTracker, AnomalyZone};
pub use collision::{Axis, Crossing, Doorway, InvisibleWall, MoveOutcome, WallFeedback};
pub use config::WorldConfig;
pub use interaction::{AimTarget, Interactable, InteractableId, InteractableSet};
pub use movement::HeldKeys;
pub use player::{JumpState, PlayerState};
pub use presentation::{DialogueSlot, Hint, PresentationRequest, SoundCue};
pub use scene::{MeshShape, NodeId, RayHit, SceneGraph, SceneNode};
pub use simulation::{Inventory, Simulation, TickInput};
pub use spatial::{FloorSurface, ObstacleVolume, SpatialIndex};
pub use timers::{AutoHide, Cooldown, Typewriter};

/// Scene asset loaded by the client (relative to the asset folder).
pub const SCENE_PATH: &str = "metrito.glb#Scene0";

/// Fixed simulation rate. Movement speeds in [`WorldConfig`] are per tick.
pub const TICK_HZ: f64 = 60.0;
