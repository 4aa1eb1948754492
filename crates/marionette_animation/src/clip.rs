use glam::{Quat, Vec3};

use crate::tracks::KeyframeTrack;

/// The three independently timed channels that animate one node.
///
/// Any channel may be absent; an absent channel leaves the matching component
/// of the node's local transform untouched.
#[derive(Debug, Clone)]
pub struct NodeTrack {
    pub node_name: String,
    pub translation: Option<KeyframeTrack<Vec3>>,
    pub rotation: Option<KeyframeTrack<Quat>>,
    pub scale: Option<KeyframeTrack<Vec3>>,
}

/// Result of sampling a [`NodeTrack`]: one optional value per channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelSample {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl NodeTrack {
    #[must_use]
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            translation: None,
            rotation: None,
            scale: None,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.translation = Some(track);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, track: KeyframeTrack<Quat>) -> Self {
        self.rotation = Some(track);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.scale = Some(track);
        self
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> ChannelSample {
        ChannelSample {
            translation: self.translation.as_ref().map(|t| t.sample(time)),
            rotation: self.rotation.as_ref().map(|t| t.sample(time)),
            scale: self.scale.as_ref().map(|t| t.sample(time)),
        }
    }

    /// Latest key time across the present channels.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        [
            self.translation.as_ref().map(KeyframeTrack::end_time),
            self.rotation.as_ref().map(KeyframeTrack::end_time),
            self.scale.as_ref().map(KeyframeTrack::end_time),
        ]
        .into_iter()
        .flatten()
        .fold(0.0_f32, f32::max)
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<NodeTrack>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<NodeTrack>) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Builds a clip whose duration is the latest key time of any track.
    #[must_use]
    pub fn with_computed_duration(name: impl Into<String>, tracks: Vec<NodeTrack>) -> Self {
        let duration = tracks.iter().map(NodeTrack::end_time).fold(0.0_f32, f32::max);
        Self::new(name, duration, tracks)
    }

    /// Maps an arbitrary playback time into `[0, duration)` so the clip loops.
    ///
    /// Negative times wrap backwards from the end. A clip without a positive
    /// duration always samples at time zero.
    #[inline]
    #[must_use]
    pub fn wrap_time(&self, time: f32) -> f32 {
        if self.duration > 0.0 && time.is_finite() {
            time.rem_euclid(self.duration)
        } else {
            0.0
        }
    }
}
