//! Keyframe animation data for the Marionette engine.
//!
//! - [`KeyframeTrack`]: time-ordered keys for one channel, sampled with
//!   linear (vectors) or shortest-arc spherical (quaternions) interpolation
//! - [`NodeTrack`]: translation / rotation / scale channels of one node
//! - [`AnimationClip`]: a named, looping set of node tracks
//! - [`AnimationPlayer`]: playback clock with speed control

pub mod clip;
pub mod player;
pub mod tracks;
pub mod values;

pub use clip::{AnimationClip, ChannelSample, NodeTrack};
pub use player::AnimationPlayer;
pub use tracks::KeyframeTrack;
pub use values::Interpolatable;
