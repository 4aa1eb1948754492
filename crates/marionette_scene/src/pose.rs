//! Pose evaluation: writes sampled clip values into node local transforms.

use marionette_animation::AnimationClip;
use marionette_core::{MarionetteError, Result};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::NodeHandle;
use crate::node::Node;

/// Resolves every track of `clip` to a node handle.
///
/// Fails on the first track whose node name is not in the index.
pub fn bind_clip(
    node_index: &FxHashMap<String, NodeHandle>,
    clip: &AnimationClip,
) -> Result<SmallVec<[NodeHandle; 32]>> {
    clip.tracks
        .iter()
        .map(|track| {
            node_index
                .get(&track.node_name)
                .copied()
                .ok_or_else(|| MarionetteError::UnknownNode {
                    name: track.node_name.clone(),
                    referenced_by: format!("a track of animation '{}'", clip.name),
                })
        })
        .collect()
}

/// Poses every animated node for `time`, looping over the clip duration.
///
/// Each track's local transform becomes `T * R * S` of its sampled channels;
/// missing channels keep the node's current component and nodes without a
/// track are left alone. All track names are resolved before any node is
/// written, so a lookup failure leaves the pose untouched.
pub fn evaluate(
    nodes: &mut SlotMap<NodeHandle, Node>,
    node_index: &FxHashMap<String, NodeHandle>,
    clip: &AnimationClip,
    time: f32,
) -> Result<()> {
    let targets = bind_clip(node_index, clip)?;
    let t = clip.wrap_time(time);

    for (track, handle) in clip.tracks.iter().zip(targets) {
        if let Some(node) = nodes.get_mut(handle) {
            node.transform.apply_sample(track.sample(t));
        }
    }

    Ok(())
}
