//! Runtime configuration
//!
//! Built once at startup from command-line arguments. Nothing here is
//! persisted between runs.

use std::time::Duration;

pub const DEFAULT_PLAYER: &str = "ffplay";
pub const DEFAULT_PROBE: &str = "ffprobe";
pub const DEFAULT_TICK_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Executable that decodes and renders the video
    pub player_program: String,
    /// Executable used to list the streams of the file
    pub probe_program: String,
    /// Leave the player running when the controller exits
    pub keep_running: bool,
    /// Ignore keys whose button is drawn disabled
    pub gate_controls: bool,
    /// How long the event loop waits for input before checking the child
    pub tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_program: DEFAULT_PLAYER.to_string(),
            probe_program: DEFAULT_PROBE.to_string(),
            keep_running: false,
            gate_controls: false,
            tick_rate: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}
