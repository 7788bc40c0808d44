//! Station scene loading.
//!
//! The glTF scene is spawned for rendering and, once it and all of its
//! dependencies have loaded, mirrored into a [`SceneGraph`] for the
//! simulation. A failed load is reported once and never retried.

use bevy::asset::RecursiveDependencyLoadState;
use bevy::mesh::{Indices, VertexAttributeValues};
use bevy::prelude::*;
use metrito_shared::{MeshShape, NodeId, SceneGraph, Simulation, SCENE_PATH};

pub struct SceneLoaderPlugin;

impl Plugin for SceneLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (start_scene_load, setup_lighting));
        app.add_systems(Update, poll_scene_load);
    }
}

#[derive(Resource)]
struct StationScene {
    handle: Handle<Scene>,
    settled: bool,
}

fn start_scene_load(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("Loading station scene {}", SCENE_PATH);
    let handle: Handle<Scene> = asset_server.load(SCENE_PATH);
    commands.spawn((Name::new("Station"), SceneRoot(handle.clone())));
    commands.insert_resource(StationScene {
        handle,
        settled: false,
    });
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.9, 1.0),
        brightness: 250.0,
        ..default()
    });
    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 60.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(12.0, 6.0, 10.0),
    ));
}

fn poll_scene_load(
    mut station: ResMut<StationScene>,
    asset_server: Res<AssetServer>,
    scenes: Res<Assets<Scene>>,
    meshes: Res<Assets<Mesh>>,
    mut simulation: ResMut<Simulation>,
) {
    if station.settled {
        return;
    }

    match asset_server.get_recursive_dependency_load_state(&station.handle) {
        Some(RecursiveDependencyLoadState::Loaded) => {}
        Some(RecursiveDependencyLoadState::Failed(err)) => {
            simulation.on_scene_failed(&format!("{err:?}"));
            station.settled = true;
            return;
        }
        _ => return,
    }

    station.settled = true;
    let Some(scene) = scenes.get(&station.handle) else {
        simulation.on_scene_failed("scene asset missing after load");
        return;
    };
    let graph = build_scene_graph(scene, &meshes);
    info!("Mirrored {} scene nodes", graph.len());
    simulation.on_scene_loaded(graph);
}

/// Mirror a loaded glTF scene into a [`SceneGraph`].
///
/// A node whose only mesh is a single leaf primitive is collapsed into one
/// mesh node carrying the node's name, so the name heuristics see the names
/// authored in the model.
pub fn build_scene_graph(scene: &Scene, meshes: &Assets<Mesh>) -> SceneGraph {
    let world = &scene.world;
    let mut graph = SceneGraph::new();

    #[allow(deprecated)]
    let roots: Vec<Entity> = world
        .iter_entities()
        .filter(|e| e.get::<ChildOf>().is_none())
        .map(|e| e.id())
        .collect();

    for root in roots {
        mirror_entity(world, meshes, root, None, &mut graph);
    }
    graph
}

fn mirror_entity(
    world: &World,
    meshes: &Assets<Mesh>,
    entity: Entity,
    parent: Option<NodeId>,
    graph: &mut SceneGraph,
) {
    let name = world
        .get::<Name>(entity)
        .map(|n| n.as_str().to_string())
        .unwrap_or_default();
    let local = world.get::<Transform>(entity).copied().unwrap_or_default();
    let children: Vec<Entity> = world
        .get::<Children>(entity)
        .map(|c| c.to_vec())
        .unwrap_or_default();

    let own_mesh = entity_mesh(world, meshes, entity, Mat4::IDENTITY);
    let leaf_primitives: Vec<Entity> = children
        .iter()
        .copied()
        .filter(|child| world.get::<Mesh3d>(*child).is_some() && world.get::<Children>(*child).is_none())
        .collect();

    let (mesh, collapsed) = match (own_mesh, leaf_primitives.as_slice()) {
        (None, [only]) => {
            let child_local = world
                .get::<Transform>(*only)
                .map(|t| t.to_matrix())
                .unwrap_or(Mat4::IDENTITY);
            (entity_mesh(world, meshes, *only, child_local), Some(*only))
        }
        (mesh, _) => (mesh, None),
    };

    let id = graph.add_node(name, parent, local, mesh);
    for child in children {
        if Some(child) != collapsed {
            mirror_entity(world, meshes, child, Some(id), graph);
        }
    }
}

/// Triangles of an entity's mesh, transformed by `local`.
fn entity_mesh(world: &World, meshes: &Assets<Mesh>, entity: Entity, local: Mat4) -> Option<MeshShape> {
    let mesh3d = world.get::<Mesh3d>(entity)?;
    let mesh = meshes.get(&mesh3d.0)?;
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
        return None;
    };
    let positions: Vec<Vec3> = positions
        .iter()
        .map(|p| local.transform_point3(Vec3::from_array(*p)))
        .collect();
    let indices: Option<Vec<u32>> = mesh.indices().map(|indices| match indices {
        Indices::U16(values) => values.iter().map(|i| u32::from(*i)).collect(),
        Indices::U32(values) => values.clone(),
    });
    MeshShape::from_indexed(&positions, indices.as_deref())
}
