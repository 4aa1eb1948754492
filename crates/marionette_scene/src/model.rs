use glam::Affine3A;
use marionette_animation::{AnimationClip, AnimationPlayer};
use marionette_core::{Aabb, MarionetteError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::node::Node;
use crate::texture::Texture;
use crate::{pose, skinning, transform_system};

/// What to do when two nodes of one scene share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Keep the first node (in pre-order) under that name and log a warning.
    #[default]
    FirstWins,
    /// Fail the build with [`MarionetteError::DuplicateNodeName`].
    Reject,
}

/// A node hierarchy under construction.
///
/// Nodes are added parent-first; [`Model::from_tree`] freezes the tree and
/// derives the flattened draw list and the name index from it.
#[derive(Debug)]
pub struct NodeTree {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
}

impl NodeTree {
    #[must_use]
    pub fn new(root: Node) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(root);
        Self { nodes, root }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Appends `child` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, mut child: Node) -> Result<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return Err(MarionetteError::InvalidScene(format!(
                "cannot attach '{}' to a parent that is not in the tree",
                child.name
            )));
        }

        child.parent = Some(parent);
        child.children.clear();
        let handle = self.nodes.insert(child);
        self.nodes[parent].children.push(handle);
        Ok(handle)
    }

    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }
}

/// Totals over every mesh of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshInfo {
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// Everything a renderer needs to draw one mesh.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub node: NodeHandle,
    pub world_matrix: &'a Affine3A,
    pub mesh: &'a Mesh,
    /// None only if the mesh's material index is out of range.
    pub material: Option<&'a Material>,
    /// None when the material is untextured or its texture failed to load.
    pub texture: Option<&'a Texture>,
}

/// A posable, renderable model.
///
/// The node arena owns every node; `node_list` (pre-order) and `node_index`
/// only hold handles into it. The model is a plain caller-owned value: each
/// tick runs evaluate, propagate and skin through `&mut self`.
#[derive(Debug)]
pub struct Model {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
    node_list: Vec<NodeHandle>,
    node_index: FxHashMap<String, NodeHandle>,

    pub materials: Vec<Material>,
    /// Loaded textures keyed by the name materials reference.
    pub textures: FxHashMap<String, Texture>,
    pub clips: Vec<AnimationClip>,

    aabb: Aabb,
    draw_order_reversed: bool,
}

impl Model {
    /// Freezes `tree`, building the pre-order node list and the name index.
    pub fn from_tree(tree: NodeTree, duplicate_names: DuplicateNamePolicy) -> Result<Self> {
        let NodeTree { nodes, root } = tree;

        let mut node_list = Vec::with_capacity(nodes.len());
        let mut node_index = FxHashMap::default();

        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = nodes.get(handle) else {
                continue;
            };

            node_list.push(handle);
            if node_index.contains_key(&node.name) {
                match duplicate_names {
                    DuplicateNamePolicy::FirstWins => {
                        log::warn!("Duplicate node name '{}': keeping the first node", node.name);
                    }
                    DuplicateNamePolicy::Reject => {
                        return Err(MarionetteError::DuplicateNodeName(node.name.clone()));
                    }
                }
            } else {
                node_index.insert(node.name.clone(), handle);
            }

            stack.extend(node.children.iter().rev().copied());
        }

        let mut model = Self {
            nodes,
            root,
            node_list,
            node_index,
            materials: Vec::new(),
            textures: FxHashMap::default(),
            clips: Vec::new(),
            aabb: Aabb::EMPTY,
            draw_order_reversed: false,
        };
        model.validate_bones()?;
        model.propagate();
        Ok(model)
    }

    /// Checks that every bone points at a node of this model carrying the
    /// bone's name.
    pub fn validate_bones(&self) -> Result<()> {
        for (_, node) in self.nodes() {
            for mesh in &node.meshes {
                for bone in mesh.bones() {
                    let bound = self
                        .nodes
                        .get(bone.node)
                        .is_some_and(|target| target.name == bone.name);
                    if !bound {
                        return Err(MarionetteError::UnknownNode {
                            name: bone.name.clone(),
                            referenced_by: format!("a bone of mesh '{}'", mesh.name),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Node access
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Looks a node up by name through the index.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeHandle> {
        self.node_index.get(name).copied()
    }

    /// Like [`Model::find_node`], but a miss is an [`MarionetteError::UnknownNode`].
    pub fn resolve_node(&self, name: &str, referenced_by: &str) -> Result<NodeHandle> {
        self.find_node(name).ok_or_else(|| MarionetteError::UnknownNode {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    #[inline]
    #[must_use]
    pub fn node_index(&self) -> &FxHashMap<String, NodeHandle> {
        &self.node_index
    }

    /// Nodes in draw order (pre-order unless reversed).
    #[inline]
    #[must_use]
    pub fn node_list(&self) -> &[NodeHandle] {
        &self.node_list
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in draw order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> + '_ {
        self.node_list
            .iter()
            .filter_map(|&h| self.nodes.get(h).map(|n| (h, n)))
    }

    // ========================================================================
    // Animation clips
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn has_animation(&self) -> bool {
        !self.clips.is_empty()
    }

    pub fn clip(&self, index: usize) -> Result<&AnimationClip> {
        self.clips
            .get(index)
            .ok_or(MarionetteError::ClipIndexOutOfBounds {
                index,
                count: self.clips.len(),
            })
    }

    #[must_use]
    pub fn clip_by_name(&self, name: &str) -> Option<(usize, &AnimationClip)> {
        self.clips.iter().enumerate().find(|(_, c)| c.name == name)
    }

    /// Checks that every track of the clip targets an existing node.
    pub fn validate_clip(&self, clip: &AnimationClip) -> Result<()> {
        pose::bind_clip(&self.node_index, clip).map(|_| ())
    }

    // ========================================================================
    // Per-tick pipeline
    // ========================================================================

    /// Poses animated nodes from clip `clip_index` at `time` (looping).
    pub fn evaluate(&mut self, clip_index: usize, time: f32) -> Result<()> {
        let count = self.clips.len();
        let Self {
            nodes,
            node_index,
            clips,
            ..
        } = self;
        let clip = clips
            .get(clip_index)
            .ok_or(MarionetteError::ClipIndexOutOfBounds {
                index: clip_index,
                count,
            })?;

        pose::evaluate(nodes, node_index, clip, time)
    }

    /// Recomputes every world matrix and its inverse from the root.
    pub fn propagate(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, self.root);
    }

    /// Refreshes only the subtree under `handle`, starting from its parent's
    /// current world matrix.
    pub fn propagate_subtree(&mut self, handle: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, handle);
    }

    /// Re-poses every skinned mesh. Call after [`Model::propagate`].
    pub fn skin(&mut self) -> Result<()> {
        skinning::skin(&mut self.nodes, &self.node_list)
    }

    /// Full tick: evaluate, propagate, skin. A model without clips is left
    /// untouched.
    pub fn update(&mut self, clip_index: usize, time: f32) -> Result<()> {
        if !self.has_animation() {
            return Ok(());
        }

        self.evaluate(clip_index, time)?;
        self.propagate();
        self.skin()
    }

    /// Advances `player` by `dt` and poses the model at the new time.
    ///
    /// Does nothing while the player is paused or disabled.
    pub fn tick(&mut self, player: &mut AnimationPlayer, dt: f32) -> Result<()> {
        if !self.has_animation() || !player.is_playing() {
            return Ok(());
        }

        let duration = self.clip(player.clip_index)?.duration;
        let time = player.advance(dt, duration);
        self.update(player.clip_index, time)
    }

    /// Disables `player` and shows the rest pose until it is re-enabled.
    pub fn stop(&mut self, player: &mut AnimationPlayer) {
        player.enabled = false;
        self.reset();
    }

    // ========================================================================
    // Auxiliary operations
    // ========================================================================

    /// Shows the rest pose: original local transforms, bind-pose vertices.
    pub fn reset(&mut self) {
        for &handle in &self.node_list {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            node.reset_local();
            for mesh in &mut node.meshes {
                mesh.restore_bind_pose();
            }
        }
        self.propagate();
    }

    /// Reverses the draw order of nodes and of each node's meshes.
    ///
    /// Only affects the order items come out of [`Model::draw_items`]
    /// (transparency sorting); poses are unchanged.
    pub fn reverse_draw_order(&mut self) {
        self.node_list.reverse();
        for &handle in &self.node_list {
            if let Some(node) = self.nodes.get_mut(handle) {
                node.meshes.reverse();
            }
        }
        self.draw_order_reversed = !self.draw_order_reversed;
    }

    #[inline]
    #[must_use]
    pub fn is_draw_order_reversed(&self) -> bool {
        self.draw_order_reversed
    }

    #[must_use]
    pub fn mesh_info(&self) -> MeshInfo {
        self.nodes()
            .flat_map(|(_, node)| node.meshes.iter())
            .fold(MeshInfo::default(), |acc, mesh| MeshInfo {
                vertex_count: acc.vertex_count + mesh.vertex_count(),
                triangle_count: acc.triangle_count + mesh.triangle_count(),
            })
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// Bounds computed at load time over the clip-0, time-0 pose.
    #[inline]
    #[must_use]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub(crate) fn set_aabb(&mut self, aabb: Aabb) {
        self.aabb = aabb;
    }

    pub(crate) fn arena(&self) -> &SlotMap<NodeHandle, Node> {
        &self.nodes
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Walks the flattened node list; world matrices are already resolved so
    /// no recursion is needed at draw time.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem<'_>> + '_ {
        self.nodes().flat_map(move |(handle, node)| {
            node.meshes.iter().map(move |mesh| {
                let material = self.materials.get(mesh.material_index);
                let texture = material
                    .and_then(|m| m.texture.as_deref())
                    .and_then(|name| self.textures.get(name));
                DrawItem {
                    node: handle,
                    world_matrix: node.transform.world_matrix(),
                    mesh,
                    material,
                    texture,
                }
            })
        })
    }
}
