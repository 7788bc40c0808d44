//! Duplicate platform geometry turns into glitch objects.

use bevy::math::bounding::IntersectsVolume;
use std::collections::BTreeSet;

use crate::interaction::{Interactable, InteractableSet};
use crate::scene::{NodeId, SceneGraph};

/// Flavor line given to glitch objects that have none.
pub const DEFAULT_GLITCH_LINE: &str = "qué cojones?";

/// Every node whose world box intersects the box of another node in `nodes`.
pub fn detect_overlaps(scene: &SceneGraph, nodes: &[NodeId]) -> BTreeSet<NodeId> {
    let boxes: Vec<_> = nodes
        .iter()
        .filter_map(|node| scene.world_bounds(*node).map(|b| (*node, b)))
        .collect();

    let mut flagged = BTreeSet::new();
    for (i, (a, box_a)) in boxes.iter().enumerate() {
        for (b, box_b) in &boxes[i + 1..] {
            if box_a.intersects(box_b) {
                flagged.insert(*a);
                flagged.insert(*b);
            }
        }
    }
    flagged
}

/// Mark `flagged` nodes anomalous, creating anomalous-only entries for nodes
/// that were not interactable yet.
pub fn flag_anomalies(set: &mut InteractableSet, scene: &SceneGraph, flagged: &BTreeSet<NodeId>) {
    for node in flagged {
        match set.find_by_node(*node).and_then(|id| set.get_mut(id)) {
            Some(existing) => {
                existing.anomalous = true;
                if existing.bottom_text.is_empty() {
                    existing.bottom_text = DEFAULT_GLITCH_LINE.to_string();
                }
            }
            None => {
                set.register(Interactable {
                    node: *node,
                    name: scene.name(*node).to_string(),
                    description: String::new(),
                    bottom_text: DEFAULT_GLITCH_LINE.to_string(),
                    anomalous: true,
                });
            }
        }
    }
}
