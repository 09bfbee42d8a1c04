pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 2.0;
pub const SPEED_STEP: f64 = 0.1;
pub const DEFAULT_SPEED: f64 = 1.0;

pub const MIN_VOLUME: u8 = 0;
pub const MAX_VOLUME: u8 = 100;
pub const VOLUME_STEP: u8 = 10;
pub const DEFAULT_VOLUME: u8 = 50;

/// Transport status derived from the playing/paused flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The controller's view of playback: transport flags, speed, volume and
/// whether the loaded file carries an audio stream.
///
/// `paused` is only ever true while `playing` is true; the flag setters are
/// crate-private so the controller is the single place that moves them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    playing: bool,
    paused: bool,
    speed: f64,
    volume: u8,
    audio_present: bool,
}

impl PlayerState {
    pub fn new(audio_present: bool) -> Self {
        Self {
            playing: false,
            paused: false,
            speed: DEFAULT_SPEED,
            volume: DEFAULT_VOLUME,
            audio_present,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Playing and not paused
    pub fn is_active(&self) -> bool {
        self.playing && !self.paused
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn audio_present(&self) -> bool {
        self.audio_present
    }

    pub fn status(&self) -> PlaybackStatus {
        match (self.playing, self.paused) {
            (false, _) => PlaybackStatus::Stopped,
            (true, false) => PlaybackStatus::Playing,
            (true, true) => PlaybackStatus::Paused,
        }
    }

    // ==============================================
    // Speed
    // ==============================================

    pub fn increase_speed(&mut self) {
        self.speed = clamp_speed(self.speed + SPEED_STEP);
    }

    pub fn decrease_speed(&mut self) {
        self.speed = clamp_speed(self.speed - SPEED_STEP);
    }

    pub fn speed_at_floor(&self) -> bool {
        self.speed <= MIN_SPEED
    }

    pub fn speed_at_ceiling(&self) -> bool {
        self.speed >= MAX_SPEED
    }

    // ==============================================
    // Volume (display only, never forwarded to the player)
    // ==============================================

    pub fn increase_volume(&mut self) {
        self.volume = self.volume.saturating_add(VOLUME_STEP).min(MAX_VOLUME);
    }

    pub fn decrease_volume(&mut self) {
        self.volume = self.volume.saturating_sub(VOLUME_STEP);
    }

    pub fn volume_at_floor(&self) -> bool {
        self.volume == MIN_VOLUME
    }

    pub fn volume_at_ceiling(&self) -> bool {
        self.volume >= MAX_VOLUME
    }

    // ==============================================
    // Transport flags
    // ==============================================

    pub(crate) fn mark_started(&mut self) {
        self.playing = true;
        self.paused = false;
    }

    pub(crate) fn mark_paused(&mut self) {
        if self.playing {
            self.paused = true;
        }
    }

    pub(crate) fn mark_resumed(&mut self) {
        self.paused = false;
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.playing = false;
        self.paused = false;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Snap to tenths so repeated steps land on exact values, then clamp
fn clamp_speed(speed: f64) -> f64 {
    ((speed * 10.0).round() / 10.0).clamp(MIN_SPEED, MAX_SPEED)
}
