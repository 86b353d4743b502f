use super::events::EmblemReady;
use super::fragment::{DebrisFragment, Fragment, FragmentRole, NavigationFragment};
use super::materials::enhance_material;
use super::picking::{AssembledVolume, CollisionVolume};
use crate::engine::core::mount_flags::MountFlags;
use crate::engine::loading::model_loader::ModelLoader;
use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::render::primitives::Aabb;
use constants::sections::{NAVIGATION_SLOT_COUNT, slot};

/// Bounding-box volume times the product of the fragment's scale relative to
/// the emblem root.
pub fn fragment_volume(half_extents: Vec3, scale: Vec3) -> f32 {
    (half_extents * 2.0).element_product() * scale.element_product().abs()
}

/// Rank fragments by volume, largest first. The top four are bound to
/// section slots in rank order, everything else is debris.
///
/// Ties keep their input order.
pub fn classify_by_volume(volumes: &[f32]) -> Vec<FragmentRole> {
    let mut ranked: Vec<usize> = (0..volumes.len()).collect();
    ranked.sort_by(|&a, &b| volumes[b].total_cmp(&volumes[a]));

    let mut roles = vec![FragmentRole::Debris; volumes.len()];
    for (slot, &index) in ranked.iter().take(NAVIGATION_SLOT_COUNT).enumerate() {
        roles[index] = FragmentRole::Navigation { slot };
    }
    roles
}

struct MeshCandidate {
    entity: Entity,
    name: String,
    relative: Transform,
    bounds: Aabb,
    material: StandardMaterial,
}

// Walk the spawned scene and collect mesh entities with their transform
// relative to the emblem root. Returns None while any mesh is still loading.
fn collect_candidates(
    root: Entity,
    children: &Query<&Children>,
    nodes: &Query<(&Transform, Option<&Name>, Option<&Mesh3d>, Option<&MeshMaterial3d<StandardMaterial>>)>,
    meshes: &Assets<Mesh>,
    materials: &Assets<StandardMaterial>,
) -> Option<Vec<MeshCandidate>> {
    let mut candidates = Vec::new();
    let mut stack: Vec<(Entity, GlobalTransform)> = Vec::new();
    push_children(&mut stack, children, root, GlobalTransform::IDENTITY);

    while let Some((entity, parent)) = stack.pop() {
        let Ok((transform, name, mesh, material)) = nodes.get(entity) else {
            continue;
        };
        let accumulated = parent.mul_transform(*transform);

        let bounds = match mesh {
            Some(mesh) => meshes.get(&mesh.0)?.compute_aabb(),
            None => None,
        };
        if let Some(bounds) = bounds {
            candidates.push(MeshCandidate {
                entity,
                name: name
                    .map(|n| n.as_str().to_string())
                    .unwrap_or_else(|| format!("fragment-{}", candidates.len())),
                relative: accumulated.compute_transform(),
                bounds,
                material: material
                    .and_then(|m| materials.get(&m.0))
                    .cloned()
                    .unwrap_or_default(),
            });
        }

        push_children(&mut stack, children, entity, accumulated);
    }

    Some(candidates)
}

// Reversed so popping visits children in scene order.
fn push_children(
    stack: &mut Vec<(Entity, GlobalTransform)>,
    children: &Query<&Children>,
    parent: Entity,
    parent_transform: GlobalTransform,
) {
    if let Ok(children) = children.get(parent) {
        let children: &[Entity] = children;
        stack.extend(children.iter().rev().map(|&child| (child, parent_transform)));
    }
}

/// Partition the loaded model into navigation and debris fragments. Runs
/// once, after the scene instance is ready and every mesh is available.
pub fn classify_emblem_model(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    model_loader: Res<ModelLoader>,
    flags: Res<MountFlags>,
    children: Query<&Children>,
    nodes: Query<(&Transform, Option<&Name>, Option<&Mesh3d>, Option<&MeshMaterial3d<StandardMaterial>>)>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ready: EventWriter<EmblemReady>,
) {
    if !loading_progress.scene_ready || loading_progress.fragments_classified {
        return;
    }
    let Some(root) = model_loader.root else {
        return;
    };
    let Some(candidates) = collect_candidates(root, &children, &nodes, &meshes, &materials) else {
        return;
    };

    if candidates.is_empty() {
        warn!("Emblem model has no mesh fragments");
    }

    let volumes: Vec<f32> = candidates
        .iter()
        .map(|c| fragment_volume(c.bounds.half_extents.into(), c.relative.scale))
        .collect();
    let roles = classify_by_volume(&volumes);

    let mut navigation = vec![None; NAVIGATION_SLOT_COUNT];
    let mut debris_count = 0;
    let mut assembled_min = Vec3::splat(f32::MAX);
    let mut assembled_max = Vec3::splat(f32::MIN);

    for (index, (candidate, role)) in candidates.into_iter().zip(roles).enumerate() {
        let local_volume =
            CollisionVolume::from_bounds(candidate.bounds.min().into(), candidate.bounds.max().into());
        for corner in local_volume.corners() {
            let corner = candidate.relative.transform_point(corner);
            assembled_min = assembled_min.min(corner);
            assembled_max = assembled_max.max(corner);
        }

        let (material, emissive) = enhance_material(&candidate.material, role);

        commands.entity(root).add_child(candidate.entity);
        let mut fragment = commands.entity(candidate.entity);
        fragment.insert((
            candidate.relative,
            Fragment {
                index,
                name: candidate.name,
                original: candidate.relative,
            },
            MeshMaterial3d(materials.add(material)),
            emissive,
        ));

        match role {
            FragmentRole::Navigation { slot: rank } => {
                let Some(section) = slot(rank) else {
                    continue;
                };
                fragment.insert((
                    NavigationFragment::from_slot(rank, section),
                    local_volume.inflated(flags.hit_scale()),
                ));
                navigation[rank] = Some(section.section_id);
            }
            FragmentRole::Debris => {
                fragment.insert(DebrisFragment::default());
                debris_count += 1;
            }
        }
    }

    if assembled_min.cmple(assembled_max).all() {
        commands.entity(root).insert((
            CollisionVolume::from_bounds(assembled_min, assembled_max),
            AssembledVolume,
        ));
    }

    let navigation: Vec<&'static str> = navigation.into_iter().flatten().collect();
    info!(
        "✓ Classified emblem: {} navigation, {} debris",
        navigation.len(),
        debris_count
    );
    ready.write(EmblemReady {
        navigation,
        debris_count,
    });
    loading_progress.fragments_classified = true;
}
