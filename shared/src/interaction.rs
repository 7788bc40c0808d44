//! Interactables and the aim-based targeter.

use bevy::prelude::*;

use crate::presentation::Hint;
use crate::scene::{NodeId, SceneGraph};

/// Load-time description of an interactable, keyed by exact node name.
#[derive(Clone, Copy, Debug)]
pub struct InteractableTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub bottom_text: Option<&'static str>,
}

pub const DEFAULT_TEMPLATES: &[InteractableTemplate] = &[
    InteractableTemplate {
        name: "metro_map",
        description: "Mapa del metro. Muestra las estaciones y conexiones principales.",
        bottom_text: Some("y cómo salgo de aquí...?"),
    },
    InteractableTemplate {
        name: "Vending_machine",
        description: "Máquina expendedora. Ideal para comprar snacks antes del viaje.",
        bottom_text: Some("y si me alcanza para un snack..."),
    },
    InteractableTemplate {
        name: "St_02_4",
        description: "Un tramo del andén de la estación del metro.",
        bottom_text: Some("no sé si este sea mi andén..."),
    },
    InteractableTemplate {
        name: "ticket_machine",
        description: "Máquina de boletos. Aquí puedes comprar tu entrada al metro.",
        bottom_text: None,
    },
    InteractableTemplate {
        name: "automatic_ticket_gate",
        description: "Torniquete automático que controla el acceso a los andenes.",
        bottom_text: None,
    },
    InteractableTemplate {
        name: "St_02001_6",
        description: "Otra sección del andén, algo más alejada del flujo principal.",
        bottom_text: Some("¿de verdad debería estar aquí...?"),
    },
    InteractableTemplate {
        name: "St_02_6",
        description: "Un segmento del andén que conecta distintas partes de la estación.",
        bottom_text: Some("parece que todos los andenes se parecen..."),
    },
    InteractableTemplate {
        name: "subway_car001_1",
        description: "Uno de los vagones del metro. Silencioso, como si esperara algo.",
        bottom_text: Some("no sé si debería subir a este..."),
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractableId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Interactable {
    pub node: NodeId,
    pub name: String,
    pub description: String,
    /// Flavor line under the inspect panel. Empty means none.
    pub bottom_text: String,
    /// Glitch objects are skipped by the ray-pick.
    pub anomalous: bool,
}

/// Append-only collection with at most one entry per scene node.
#[derive(Clone, Debug, Default)]
pub struct InteractableSet {
    items: Vec<Interactable>,
}

impl InteractableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interactable. A node that is already registered keeps its
    /// existing entry and that entry's id is returned.
    pub fn register(&mut self, interactable: Interactable) -> InteractableId {
        if let Some(id) = self.find_by_node(interactable.node) {
            return id;
        }
        self.items.push(interactable);
        InteractableId(self.items.len() - 1)
    }

    /// Register every mesh node whose name matches a template exactly.
    pub fn populate_from_templates(&mut self, scene: &SceneGraph, templates: &[InteractableTemplate]) {
        for (node, scene_node) in scene.mesh_nodes() {
            let Some(template) = templates.iter().find(|t| t.name == scene_node.name) else {
                continue;
            };
            self.register(Interactable {
                node,
                name: scene_node.name.clone(),
                description: template.description.to_string(),
                bottom_text: template.bottom_text.unwrap_or_default().to_string(),
                anomalous: false,
            });
        }
    }

    pub fn find_by_node(&self, node: NodeId) -> Option<InteractableId> {
        self.items
            .iter()
            .position(|i| i.node == node)
            .map(InteractableId)
    }

    pub fn get(&self, id: InteractableId) -> Option<&Interactable> {
        self.items.get(id.0)
    }

    pub fn get_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.items.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InteractableId, &Interactable)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (InteractableId(i), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The interactable currently under the crosshair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimTarget {
    pub id: InteractableId,
    pub distance: f32,
}

/// Ray-pick the nearest non-anomalous interactable along `direction`.
///
/// The struck node is matched against the candidates directly, then through
/// its parent and grandparent so grouped multi-part meshes resolve to their
/// logical object. Anything farther than `max_distance` is no target.
pub fn find_target(
    scene: &SceneGraph,
    set: &InteractableSet,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<AimTarget> {
    let direction = Dir3::new(direction).ok()?;
    let candidates: Vec<(InteractableId, NodeId)> = set
        .iter()
        .filter(|(_, item)| !item.anomalous)
        .map(|(id, item)| (id, item.node))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let nodes: Vec<NodeId> = candidates.iter().map(|(_, node)| *node).collect();
    let hit = scene
        .raycast(&Ray3d::new(origin, direction), &nodes)
        .into_iter()
        .next()?;

    let parent = scene.parent(hit.node);
    let grandparent = parent.and_then(|p| scene.parent(p));
    let id = [Some(hit.node), parent, grandparent]
        .into_iter()
        .flatten()
        .find_map(|node| candidates.iter().find(|(_, n)| *n == node).map(|(id, _)| *id))?;

    (hit.distance <= max_distance).then_some(AimTarget {
        id,
        distance: hit.distance,
    })
}

/// Whether `interactable` is the one that can be collected from.
pub fn is_collectible(interactable: &Interactable, collectible_prefix: &str) -> bool {
    !collectible_prefix.is_empty() && interactable.name.starts_with(collectible_prefix)
}

/// Hint for an aimed-at interactable.
pub fn hint_for(interactable: &Interactable, collectible_prefix: &str, collected: bool) -> Hint {
    if is_collectible(interactable, collectible_prefix) {
        if collected {
            Hint::Inspect
        } else {
            Hint::InspectOrCollect
        }
    } else {
        Hint::Interact
    }
}
