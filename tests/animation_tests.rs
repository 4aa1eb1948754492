//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack sampling: boundaries, exact keys, linear midpoints
//! - Interpolatable implementations (f32, Vec3, Quat shortest arc)
//! - KeyframeTrack construction checks
//! - AnimationClip time wrapping and computed duration
//! - AnimationPlayer speed, pause and time accumulation

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use marionette::animation::player::{MAX_SPEED, MIN_SPEED};
use marionette::{
    AnimationClip, AnimationPlayer, Interpolatable, KeyframeTrack, MarionetteError, NodeTrack,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn quat_approx(a: Quat, b: Quat, tolerance: f32) -> bool {
    a.angle_between(b) < tolerance
}

fn deg(d: f32) -> f32 {
    d * PI / 180.0
}

fn translation_track() -> KeyframeTrack<Vec3> {
    KeyframeTrack::from_keys([
        (0.0, Vec3::ZERO),
        (10.0, Vec3::new(10.0, 0.0, 0.0)),
        (20.0, Vec3::new(10.0, 5.0, 0.0)),
    ])
    .unwrap()
}

// ============================================================================
// KeyframeTrack: Sampling
// ============================================================================

#[test]
fn track_midpoint_interpolates_linearly() {
    let track = translation_track();
    assert!(vec3_approx(track.sample(5.0), Vec3::new(5.0, 0.0, 0.0)));
    assert!(vec3_approx(track.sample(15.0), Vec3::new(10.0, 2.5, 0.0)));
}

#[test]
fn track_exact_key_returns_that_key() {
    let track = translation_track();
    assert!(vec3_approx(track.sample(0.0), Vec3::ZERO));
    assert!(vec3_approx(track.sample(10.0), Vec3::new(10.0, 0.0, 0.0)));
    assert!(vec3_approx(track.sample(20.0), Vec3::new(10.0, 5.0, 0.0)));
}

#[test]
fn track_before_first_key_holds_first_value() {
    let track = KeyframeTrack::new(vec![1.0, 2.0], vec![3.0_f32, 7.0]).unwrap();
    assert!(approx(track.sample(0.0), 3.0));
    assert!(approx(track.sample(-100.0), 3.0));
}

#[test]
fn track_after_last_key_holds_last_value() {
    let track = KeyframeTrack::new(vec![1.0, 2.0], vec![3.0_f32, 7.0]).unwrap();
    assert!(approx(track.sample(2.5), 7.0));
    assert!(approx(track.sample(1e6), 7.0));
}

#[test]
fn track_single_key_is_constant() {
    let track = KeyframeTrack::new(vec![4.0], vec![Vec3::ONE]).unwrap();
    for t in [-1.0, 0.0, 4.0, 9.0] {
        assert!(vec3_approx(track.sample(t), Vec3::ONE));
    }
}

#[test]
fn track_rejects_bad_input() {
    assert!(matches!(
        KeyframeTrack::<f32>::new(vec![], vec![]),
        Err(MarionetteError::InvalidTrack(_))
    ));
    assert!(matches!(
        KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32]),
        Err(MarionetteError::InvalidTrack(_))
    ));
    assert!(matches!(
        KeyframeTrack::new(vec![0.0, 1.0, 1.0], vec![1.0_f32, 2.0, 3.0]),
        Err(MarionetteError::InvalidTrack(_))
    ));
}

#[test]
fn track_time_range() {
    let track = translation_track();
    assert_eq!(track.len(), 3);
    assert!(approx(track.start_time(), 0.0));
    assert!(approx(track.end_time(), 20.0));
}

// ============================================================================
// Interpolatable
// ============================================================================

#[test]
fn f32_interpolation() {
    assert!(approx(f32::interpolate_linear(2.0, 4.0, 0.25), 2.5));
}

#[test]
fn quat_slerp_same_hemisphere() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_z(deg(170.0));
    let mid = Quat::interpolate_linear(q0, q1, 0.5);
    assert!(quat_approx(mid, Quat::from_rotation_z(deg(85.0)), 1e-3));
}

#[test]
fn quat_slerp_takes_shortest_arc_for_negated_end() {
    // -q represents the same 170° rotation but lies in the opposite
    // hemisphere; without sign correction the blend would take the long way.
    let q0 = Quat::IDENTITY;
    let q1 = -Quat::from_rotation_z(deg(170.0));
    let mid = Quat::interpolate_linear(q0, q1, 0.5);
    assert!(
        quat_approx(mid, Quat::from_rotation_z(deg(85.0)), 1e-3),
        "midpoint went the long way: {mid:?}"
    );
}

#[test]
fn quat_slerp_past_half_turn_wraps_backwards() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_z(deg(190.0));
    let mid = Quat::interpolate_linear(q0, q1, 0.5);
    assert!(quat_approx(mid, Quat::from_rotation_z(deg(-85.0)), 1e-3));
}

#[test]
fn quat_track_endpoints_are_exact() {
    let q1 = Quat::from_rotation_y(deg(60.0));
    let track = KeyframeTrack::from_keys([(0.0, Quat::IDENTITY), (1.0, q1)]).unwrap();
    assert!(quat_approx(track.sample(0.0), Quat::IDENTITY, 1e-4));
    assert!(quat_approx(track.sample(1.0), q1, 1e-4));
    assert!(quat_approx(track.sample(0.5), Quat::from_rotation_y(deg(30.0)), 1e-3));
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_wrap_time_loops() {
    let clip = AnimationClip::new("walk", 2.0, Vec::new());
    assert!(approx(clip.wrap_time(0.5), 0.5));
    assert!(approx(clip.wrap_time(2.5), 0.5));
    assert!(approx(clip.wrap_time(4.0), 0.0));
}

#[test]
fn clip_wrap_time_negative_wraps_from_end() {
    let clip = AnimationClip::new("walk", 2.0, Vec::new());
    assert!(approx(clip.wrap_time(-0.5), 1.5));
}

#[test]
fn clip_without_duration_samples_time_zero() {
    let clip = AnimationClip::new("pose", 0.0, Vec::new());
    assert!(approx(clip.wrap_time(3.7), 0.0));
    assert!(approx(clip.wrap_time(f32::NAN), 0.0));
}

#[test]
fn clip_computed_duration_uses_latest_key() {
    let tracks = vec![
        NodeTrack::new("a").with_translation(translation_track()),
        NodeTrack::new("b").with_scale(
            KeyframeTrack::from_keys([(0.0, Vec3::ONE), (25.0, Vec3::ONE)]).unwrap(),
        ),
    ];
    let clip = AnimationClip::with_computed_duration("c", tracks);
    assert!(approx(clip.duration, 25.0));
}

#[test]
fn node_track_samples_only_present_channels() {
    let track = NodeTrack::new("arm").with_translation(translation_track());
    let sample = track.sample(5.0);
    assert!(vec3_approx(sample.translation.unwrap(), Vec3::new(5.0, 0.0, 0.0)));
    assert!(sample.rotation.is_none());
    assert!(sample.scale.is_none());
}

// ============================================================================
// AnimationPlayer
// ============================================================================

#[test]
fn player_speed_is_clamped() {
    let mut player = AnimationPlayer::default();
    player.set_speed(100.0);
    assert!(approx(player.speed(), MAX_SPEED));
    player.set_speed(0.0);
    assert!(approx(player.speed(), MIN_SPEED));
}

#[test]
fn player_faster_and_slower_steps() {
    let mut player = AnimationPlayer::default();
    player.faster();
    assert!(approx(player.speed(), 1.25));
    player.slower();
    assert!(approx(player.speed(), 1.25 * 0.95));

    for _ in 0..100 {
        player.faster();
    }
    assert!(approx(player.speed(), MAX_SPEED));
}

#[test]
fn player_advance_scales_and_wraps() {
    let mut player = AnimationPlayer::default();
    player.set_speed(2.0);
    assert!(approx(player.advance(0.25, 1.0), 0.5));
    assert!(approx(player.advance(0.5, 1.0), 0.5));
}

#[test]
fn player_paused_does_not_advance() {
    let mut player = AnimationPlayer::default();
    player.advance(0.3, 10.0);
    player.toggle_pause();
    assert!(!player.is_playing());
    assert!(approx(player.advance(5.0, 10.0), 0.3));

    player.toggle_pause();
    assert!(approx(player.advance(0.2, 10.0), 0.5));
}

#[test]
fn player_restart_resets_state() {
    let mut player = AnimationPlayer::new(2);
    player.faster();
    player.advance(1.0, 10.0);
    player.toggle_pause();
    player.restart();

    assert_eq!(player.clip_index, 2);
    assert!(approx(player.time, 0.0));
    assert!(approx(player.speed(), 1.0));
    assert!(player.is_playing());
}
