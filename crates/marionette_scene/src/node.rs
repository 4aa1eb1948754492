use glam::Affine3A;

use crate::NodeHandle;
use crate::mesh::Mesh;
use crate::transform::Transform;

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a single-owner tree stored in the model's arena:
/// - `parent`: handle of the parent node (None for the root)
/// - `children`: child handles, in authored order
///
/// # Transform
///
/// The live local transform is rewritten by animation every tick. The
/// original local matrix is captured once, when the node is created, and is
/// what [`Node::reset_local`] restores.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,
    original_local: Affine3A,

    // === Attachments ===
    /// Meshes declared by this node, drawn in list order.
    pub meshes: Vec<Mesh>,
}

impl Node {
    /// Creates a node whose current and original local transform are `local`.
    #[must_use]
    pub fn new(name: impl Into<String>, local: Affine3A) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::from_local_matrix(local),
            original_local: local,
            meshes: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// The local matrix captured at build time.
    #[inline]
    #[must_use]
    pub fn original_local(&self) -> &Affine3A {
        &self.original_local
    }

    /// Restores the local transform captured at build time.
    pub fn reset_local(&mut self) {
        self.transform.apply_local_matrix(self.original_local);
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        self.transform.world_matrix()
    }

    #[inline]
    #[must_use]
    pub fn has_skinned_mesh(&self) -> bool {
        self.meshes.iter().any(Mesh::is_skinned)
    }
}
