/// Lower bound for [`AnimationPlayer::speed`].
pub const MIN_SPEED: f32 = 0.1;
/// Upper bound for [`AnimationPlayer::speed`].
pub const MAX_SPEED: f32 = 10.0;

const SPEED_UP_FACTOR: f32 = 1.25;
const SLOW_DOWN_FACTOR: f32 = 0.95;

/// Drives playback of a single clip.
///
/// The player only tracks time; posing a model is done by handing
/// [`AnimationPlayer::clip_index`] and [`AnimationPlayer::time`] to the model.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    pub clip_index: usize,
    /// Playback position in clip time units, kept inside `[0, duration)`.
    pub time: f32,
    speed: f32,
    pub paused: bool,
    /// When disabled the model is expected to show its rest pose.
    pub enabled: bool,
}

impl AnimationPlayer {
    #[must_use]
    pub fn new(clip_index: usize) -> Self {
        Self {
            clip_index,
            time: 0.0,
            speed: 1.0,
            paused: false,
            enabled: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn faster(&mut self) {
        self.set_speed(self.speed * SPEED_UP_FACTOR);
        log::debug!("animation speed: {}", self.speed);
    }

    pub fn slower(&mut self) {
        self.set_speed(self.speed * SLOW_DOWN_FACTOR);
        log::debug!("animation speed: {}", self.speed);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Whether a tick should pose the model.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Restores playback defaults: time zero, unit speed, playing.
    pub fn restart(&mut self) {
        self.time = 0.0;
        self.speed = 1.0;
        self.paused = false;
        self.enabled = true;
    }

    /// Advances time by `dt * speed` and wraps it into the clip duration.
    ///
    /// Returns the new playback time. Nothing moves while paused or disabled.
    pub fn advance(&mut self, dt: f32, duration: f32) -> f32 {
        if !self.is_playing() {
            return self.time;
        }

        self.time += dt * self.speed;
        if duration > 0.0 {
            self.time = self.time.rem_euclid(duration);
        } else {
            self.time = 0.0;
        }
        self.time
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new(0)
    }
}
