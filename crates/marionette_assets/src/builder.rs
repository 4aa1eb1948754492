//! Turns a [`RawScene`] into a posable [`Model`].
//!
//! The build runs in stages, each one relying on the previous:
//! 1. validate the raw meshes against the rest of the scene
//! 2. build the node tree (every mesh reference gets its own copy)
//! 3. freeze the tree into a [`Model`] (node list, name index)
//! 4. resolve bones to node handles, snapshot bind poses, normalize weights
//! 5. materials, then textures through the [`TextureLoader`]
//! 6. animation clips, every track checked against the name index
//! 7. bounds over the clip-0, time-0 pose

use glam::{Vec3, Vec4};
use marionette_animation::{AnimationClip, KeyframeTrack, NodeTrack};
use marionette_core::{MarionetteError, Result};
use marionette_scene::{Bone, Material, Mesh, Model, Node, NodeHandle, NodeTree, VertexWeight};
use rustc_hash::FxHashSet;

use crate::raw::{
    RawAnimation, RawMaterial, RawMesh, RawNode, RawNodeAnim, RawScene, affine_from_cols,
};
use crate::settings::ImportSettings;
use crate::texture::{FileTextureLoader, TextureLoader, texture_file_name};
use crate::weights::normalize_weights;

/// Builds a model with default settings, loading textures from the working
/// directory.
pub fn build(raw: &RawScene) -> Result<Model> {
    SceneBuilder::new(ImportSettings::default()).build(raw)
}

/// A mesh copy whose bones still need resolving once names are indexed.
struct PendingSkin {
    node: NodeHandle,
    slot: usize,
    raw_mesh: usize,
}

pub struct SceneBuilder<L = FileTextureLoader> {
    settings: ImportSettings,
    loader: L,
}

impl SceneBuilder<FileTextureLoader> {
    #[must_use]
    pub fn new(settings: ImportSettings) -> Self {
        Self {
            settings,
            loader: FileTextureLoader,
        }
    }
}

impl<L: TextureLoader> SceneBuilder<L> {
    #[must_use]
    pub fn with_loader(settings: ImportSettings, loader: L) -> Self {
        Self { settings, loader }
    }

    #[must_use]
    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Builds the model. Any failure aborts the build; no partial model is
    /// returned.
    pub fn build(&mut self, raw: &RawScene) -> Result<Model> {
        let root = raw.root.as_ref().ok_or(MarionetteError::MissingRootNode)?;

        let material_slots = raw.materials.len().max(1);
        for (index, mesh) in raw.meshes.iter().enumerate() {
            validate_mesh(index, mesh, material_slots)?;
        }

        let (tree, pending) = build_tree(root, raw)?;
        let mut model = Model::from_tree(tree, self.settings.duplicate_names)?;
        log::info!("Built {} nodes", model.node_count());

        self.attach_bones(&mut model, raw, &pending)?;

        model.materials = raw.materials.iter().map(build_material).collect();
        if model.materials.is_empty() && !raw.meshes.is_empty() {
            model.materials.push(Material::new("default"));
        }
        log::info!("Built {} materials", model.materials.len());

        if self.settings.load_textures {
            self.load_textures(&mut model);
        }

        for anim in &raw.animations {
            let clip = build_clip(anim)?;
            model.validate_clip(&clip)?;
            log::info!(
                "Animation '{}': {} node tracks, duration {}",
                clip.name,
                clip.tracks.len(),
                clip.duration
            );
            model.clips.push(clip);
        }

        let aabb = model.compute_aabb()?;
        let info = model.mesh_info();
        log::info!(
            "Model ready: {} vertices, {} triangles, bounds {:?}..{:?}",
            info.vertex_count,
            info.triangle_count,
            aabb.min,
            aabb.max
        );

        Ok(model)
    }

    fn attach_bones(&self, model: &mut Model, raw: &RawScene, pending: &[PendingSkin]) -> Result<()> {
        for skin in pending {
            let raw_mesh = &raw.meshes[skin.raw_mesh];
            let referenced_by = format!("a bone of mesh '{}'", mesh_name(skin.raw_mesh, raw_mesh));

            let bones = raw_mesh
                .bones
                .iter()
                .map(|b| {
                    Ok(Bone {
                        name: b.name.clone(),
                        node: model.resolve_node(&b.name, &referenced_by)?,
                        offset: affine_from_cols(&b.offset),
                        weights: b
                            .weights
                            .iter()
                            .map(|w| VertexWeight {
                                vertex: w.vertex,
                                weight: w.weight,
                            })
                            .collect(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let node = model.node_mut(skin.node).ok_or_else(|| {
                MarionetteError::InvalidScene("skinned mesh owner vanished".to_string())
            })?;
            let mesh = &mut node.meshes[skin.slot];
            mesh.set_bones(bones)?;
            if self.settings.normalize_weights {
                normalize_weights(mesh)?;
            }
            log::debug!("Mesh '{}': {} bones", mesh.name, mesh.bones().len());
        }
        model.validate_bones()
    }

    /// Loads each distinct texture name once. Failures are logged and the
    /// material renders untextured.
    fn load_textures(&mut self, model: &mut Model) {
        let base_dir = self.settings.texture_base_dir.as_deref();
        let mut attempted = FxHashSet::default();

        for name in model.materials.iter().filter_map(|m| m.texture.as_deref()) {
            if model.textures.contains_key(name) || !attempted.insert(name) {
                continue;
            }
            match self.loader.load(name, base_dir) {
                Ok(texture) => {
                    model.textures.insert(name.to_string(), texture);
                }
                Err(e) => log::warn!("{e}; rendering untextured"),
            }
        }
    }
}

fn mesh_name(index: usize, mesh: &RawMesh) -> String {
    if mesh.name.is_empty() {
        format!("mesh{index}")
    } else {
        mesh.name.clone()
    }
}

fn validate_mesh(index: usize, mesh: &RawMesh, material_slots: usize) -> Result<()> {
    let name = mesh_name(index, mesh);
    let vertex_count = mesh.positions.len();
    let invalid = |what: String| MarionetteError::InvalidScene(format!("mesh '{name}': {what}"));

    let attribute_lens = [
        ("normals", mesh.normals.as_ref().map(Vec::len)),
        ("uvs", mesh.uvs.as_ref().map(Vec::len)),
        ("colors", mesh.colors.as_ref().map(Vec::len)),
    ];
    for (attribute, len) in attribute_lens {
        if let Some(len) = len
            && len != vertex_count
        {
            return Err(invalid(format!(
                "{len} {attribute} for {vertex_count} vertices"
            )));
        }
    }

    for (f, face) in mesh.faces.iter().enumerate() {
        if face.len() != 3 {
            return Err(invalid(format!(
                "face {f} has {} indices, only triangles are supported",
                face.len()
            )));
        }
        if let Some(&i) = face.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(invalid(format!(
                "face {f} references vertex {i} of {vertex_count}"
            )));
        }
    }

    for bone in &mesh.bones {
        if let Some(w) = bone.weights.iter().find(|w| w.vertex as usize >= vertex_count) {
            return Err(invalid(format!(
                "bone '{}' weights vertex {} of {vertex_count}",
                bone.name, w.vertex
            )));
        }
    }

    if mesh.material_index >= material_slots {
        return Err(invalid(format!(
            "material index {} out of range ({material_slots} materials)",
            mesh.material_index
        )));
    }

    Ok(())
}

fn build_mesh(index: usize, raw: &RawMesh) -> Mesh {
    let indices = raw.faces.iter().flatten().copied().collect();
    let mut mesh = Mesh::new(mesh_name(index, raw), raw.positions(), indices, raw.material_index);
    if let Some(normals) = raw.normals() {
        mesh = mesh.with_normals(normals);
    }
    if let Some(uvs) = raw.uvs() {
        mesh = mesh.with_uvs(uvs);
    }
    if let Some(colors) = raw.colors() {
        mesh = mesh.with_colors(colors);
    }

    log::debug!(
        "Mesh '{}': {} vertices, {} triangles, normals: {}, uvs: {}, colors: {}",
        mesh.name,
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.normals.is_some(),
        mesh.uvs.is_some(),
        mesh.colors.is_some()
    );
    mesh
}

fn build_node(raw: &RawNode, scene: &RawScene) -> Result<Node> {
    let mut node = Node::new(raw.name.clone(), raw.local_matrix());
    for &index in &raw.meshes {
        let mesh = scene.meshes.get(index).ok_or_else(|| {
            MarionetteError::InvalidScene(format!(
                "node '{}' references mesh {index} but the scene has {}",
                raw.name,
                scene.meshes.len()
            ))
        })?;
        node.meshes.push(build_mesh(index, mesh));
    }
    log::debug!("Node '{}': {} meshes", node.name, node.meshes.len());
    Ok(node)
}

/// Builds the tree parent-first, keeping authored child order.
fn build_tree(root: &RawNode, scene: &RawScene) -> Result<(NodeTree, Vec<PendingSkin>)> {
    let mut tree = NodeTree::new(build_node(root, scene)?);
    let mut pending = Vec::new();
    let mut stack = vec![(root, tree.root())];

    while let Some((raw, handle)) = stack.pop() {
        for (slot, &index) in raw.meshes.iter().enumerate() {
            if !scene.meshes[index].bones.is_empty() {
                pending.push(PendingSkin {
                    node: handle,
                    slot,
                    raw_mesh: index,
                });
            }
        }

        for child in &raw.children {
            let child_handle = tree.add_child(handle, build_node(child, scene)?)?;
            stack.push((child, child_handle));
        }
    }

    Ok((tree, pending))
}

fn rgb(color: Option<[f32; 3]>) -> Vec4 {
    color.map_or(Vec4::W, |c| Vec3::from_array(c).extend(1.0))
}

fn build_material(raw: &RawMaterial) -> Material {
    let mut material = Material::new(raw.name.clone());
    material.diffuse = rgb(raw.diffuse);
    material.ambient = rgb(raw.ambient);
    material.specular = rgb(raw.specular);
    material.emissive = rgb(raw.emissive);
    if let Some(shininess) = raw.shininess {
        material.shininess = shininess;
    }
    material.texture = raw
        .texture
        .as_deref()
        .map(|path| texture_file_name(path).to_string());

    log::debug!(
        "Material '{}': diffuse {:?}, shininess {}, texture {:?}",
        material.name,
        material.diffuse,
        material.shininess,
        material.texture
    );
    material
}

fn build_node_track(raw: &RawNodeAnim) -> Result<NodeTrack> {
    let mut track = NodeTrack::new(raw.node_name.clone());

    if !raw.position_keys.is_empty() {
        track = track.with_translation(KeyframeTrack::from_keys(
            raw.position_keys
                .iter()
                .map(|k| (k.time, Vec3::from_array(k.value))),
        )?);
    }
    if !raw.rotation_keys.is_empty() {
        track = track.with_rotation(KeyframeTrack::from_keys(
            raw.rotation_keys
                .iter()
                .map(|k| (k.time, glam::Quat::from_array(k.value))),
        )?);
    }
    if !raw.scaling_keys.is_empty() {
        track = track.with_scale(KeyframeTrack::from_keys(
            raw.scaling_keys
                .iter()
                .map(|k| (k.time, Vec3::from_array(k.value))),
        )?);
    }

    Ok(track)
}

fn build_clip(raw: &RawAnimation) -> Result<AnimationClip> {
    let tracks = raw
        .channels
        .iter()
        .map(build_node_track)
        .collect::<Result<Vec<_>>>()?;
    Ok(AnimationClip::new(raw.name.clone(), raw.duration, tracks))
}
