use std::path::{Path, PathBuf};

use crate::{
    commands::{LoopControl, PlayerCommand},
    config::Config,
    error::Result,
    process::{PlaybackProcess, PlayerExit},
    state::{PlaybackStatus, PlayerState},
};

/// Whether the button for `command` is drawn enabled in the current state.
///
/// Speed and volume buttons only look enabled while playback is running and
/// unpaused; the play/pause button looks disabled exactly then.
pub fn command_enabled(state: &PlayerState, command: PlayerCommand) -> bool {
    match command {
        PlayerCommand::TogglePlayback => !state.is_active(),
        PlayerCommand::SpeedDown => state.is_active() && !state.speed_at_floor(),
        PlayerCommand::SpeedUp => state.is_active() && !state.speed_at_ceiling(),
        PlayerCommand::VolumeUp => state.is_active() && !state.volume_at_ceiling(),
        PlayerCommand::VolumeDown => state.is_active() && !state.volume_at_floor(),
        PlayerCommand::Quit => true,
    }
}

/// Owns the player state and the playback process, and applies commands to
/// both. Lives on the event-loop thread.
pub struct PlayerController<P: PlaybackProcess> {
    state: PlayerState,
    process: P,
    media_path: PathBuf,
    gate_controls: bool,
    keep_running: bool,
    status_message: String,
}

impl<P: PlaybackProcess> PlayerController<P> {
    pub fn new(media_path: PathBuf, audio_present: bool, process: P, config: &Config) -> Self {
        Self {
            state: PlayerState::new(audio_present),
            process,
            media_path,
            gate_controls: config.gate_controls,
            keep_running: config.keep_running,
            status_message: "Press P to start playback".to_string(),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn media_path(&self) -> &Path {
        &self.media_path
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    /// Apply one command
    pub fn dispatch(&mut self, command: PlayerCommand) -> LoopControl {
        let gated = self.gate_controls && command.is_adjustment();
        if gated && !command_enabled(&self.state, command) {
            log::debug!("Ignoring {} while its control is disabled", command);
            return LoopControl::Continue;
        }

        match command {
            PlayerCommand::TogglePlayback => self.toggle_playback(),
            PlayerCommand::SpeedDown => self.state.decrease_speed(),
            PlayerCommand::SpeedUp => self.state.increase_speed(),
            PlayerCommand::VolumeUp => self.state.increase_volume(),
            PlayerCommand::VolumeDown => self.state.decrease_volume(),
            PlayerCommand::Quit => return LoopControl::Exit,
        }
        LoopControl::Continue
    }

    /// Stopped -> Playing -> Paused -> Playing. A flag only moves when the
    /// process operation behind it succeeded.
    pub fn toggle_playback(&mut self) {
        match self.state.status() {
            PlaybackStatus::Stopped => {
                match self.process.start(&self.media_path, self.state.speed()) {
                    Ok(_) => {
                        self.state.mark_started();
                        self.status_message = format!("Playing at x{:.1}", self.state.speed());
                    }
                    Err(e) => self.report("Error while playing the video", &e),
                }
            }
            PlaybackStatus::Playing => match self.process.suspend() {
                Ok(()) => {
                    self.state.mark_paused();
                    self.status_message = "Paused".to_string();
                    log::info!("Playback paused");
                }
                Err(e) => self.report("Error while pausing the video", &e),
            },
            PlaybackStatus::Paused => match self.process.resume() {
                Ok(()) => {
                    self.state.mark_resumed();
                    self.status_message = "Resumed".to_string();
                    log::info!("Playback resumed");
                }
                Err(e) => self.report("Error while resuming the video", &e),
            },
        }
    }

    /// Notice a player that exited on its own and return to Stopped. A
    /// failure exit is reported like a failed start. Returns true when the
    /// state changed.
    pub fn poll_process(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(exit) = self.process.poll_exit() else {
            return false;
        };

        self.state.mark_stopped();
        match exit {
            PlayerExit::Finished => self.status_message = "Playback finished".to_string(),
            PlayerExit::Failed(reason) => self.report("Error while playing the video", &reason),
        }
        true
    }

    /// Stop the player unless it was configured to outlive the controller
    pub fn shutdown(&mut self) -> Result<()> {
        if self.keep_running {
            if let Some(pid) = self.process.pid() {
                log::info!("Leaving player (pid {}) running", pid);
            }
            return Ok(());
        }
        self.process.terminate()?;
        self.state.mark_stopped();
        Ok(())
    }

    fn report(&mut self, context: &str, error: &dyn std::fmt::Display) {
        log::error!("{}: {}", context, error);
        self.status_message = format!("{}: {}", context, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;

    /// Records calls and fails the operations it is told to fail
    #[derive(Default)]
    struct ScriptedProcess {
        fail_start: bool,
        fail_suspend: bool,
        fail_resume: bool,
        running: bool,
        exit: Option<PlayerExit>,
        calls: Vec<String>,
    }

    impl PlaybackProcess for ScriptedProcess {
        fn start(&mut self, path: &Path, speed: f64) -> Result<u32> {
            self.calls.push(format!("start {} {:.1}", path.display(), speed));
            if self.fail_start {
                return Err(PlayerError::Spawn {
                    program: "ffplay".to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            self.running = true;
            Ok(4242)
        }

        fn suspend(&mut self) -> Result<()> {
            self.calls.push("suspend".to_string());
            if self.fail_suspend {
                return Err(PlayerError::Signal {
                    signal: "SIGSTOP",
                    pid: 4242,
                    reason: "No such process".to_string(),
                });
            }
            Ok(())
        }

        fn resume(&mut self) -> Result<()> {
            self.calls.push("resume".to_string());
            if self.fail_resume {
                return Err(PlayerError::Signal {
                    signal: "SIGCONT",
                    pid: 4242,
                    reason: "No such process".to_string(),
                });
            }
            Ok(())
        }

        fn poll_exit(&mut self) -> Option<PlayerExit> {
            if !self.running {
                return None;
            }
            let exit = self.exit.take()?;
            self.running = false;
            Some(exit)
        }

        fn terminate(&mut self) -> Result<()> {
            self.calls.push("terminate".to_string());
            self.running = false;
            Ok(())
        }

        fn pid(&self) -> Option<u32> {
            self.running.then_some(4242)
        }
    }

    fn controller(process: ScriptedProcess) -> PlayerController<ScriptedProcess> {
        controller_with(process, &Config::default())
    }

    fn controller_with(
        process: ScriptedProcess,
        config: &Config,
    ) -> PlayerController<ScriptedProcess> {
        let _ = env_logger::builder().is_test(true).try_init();
        PlayerController::new(PathBuf::from("movie.mp4"), true, process, config)
    }

    fn press(ctrl: &mut PlayerController<ScriptedProcess>, command: PlayerCommand, times: usize) {
        for _ in 0..times {
            assert_eq!(ctrl.dispatch(command), LoopControl::Continue);
        }
    }

    #[test]
    fn test_toggle_from_stopped_starts_playback() {
        let mut ctrl = controller(ScriptedProcess::default());
        ctrl.dispatch(PlayerCommand::TogglePlayback);

        assert!(ctrl.state().is_playing());
        assert!(!ctrl.state().is_paused());
        assert_eq!(ctrl.process().calls, vec!["start movie.mp4 1.0"]);
    }

    #[test]
    fn test_failed_start_stays_stopped() {
        let mut ctrl = controller(ScriptedProcess {
            fail_start: true,
            ..Default::default()
        });
        ctrl.dispatch(PlayerCommand::TogglePlayback);

        assert_eq!(ctrl.state().status(), PlaybackStatus::Stopped);
        assert!(ctrl.status_message().starts_with("Error while playing"));
    }

    #[test]
    fn test_toggle_while_playing_suspends() {
        let mut ctrl = controller(ScriptedProcess::default());
        press(&mut ctrl, PlayerCommand::TogglePlayback, 2);

        assert!(ctrl.state().is_playing());
        assert!(ctrl.state().is_paused());
        assert_eq!(ctrl.process().calls[1], "suspend");
    }

    #[test]
    fn test_failed_suspend_keeps_playing() {
        let mut ctrl = controller(ScriptedProcess {
            fail_suspend: true,
            ..Default::default()
        });
        press(&mut ctrl, PlayerCommand::TogglePlayback, 2);

        assert_eq!(ctrl.state().status(), PlaybackStatus::Playing);
        assert!(ctrl.status_message().contains("SIGSTOP"));
    }

    #[test]
    fn test_toggle_while_paused_resumes() {
        let mut ctrl = controller(ScriptedProcess::default());
        press(&mut ctrl, PlayerCommand::TogglePlayback, 3);

        assert_eq!(ctrl.state().status(), PlaybackStatus::Playing);
        assert_eq!(ctrl.process().calls[2], "resume");
    }

    #[test]
    fn test_failed_resume_stays_paused() {
        let mut ctrl = controller(ScriptedProcess {
            fail_resume: true,
            ..Default::default()
        });
        press(&mut ctrl, PlayerCommand::TogglePlayback, 3);

        assert_eq!(ctrl.state().status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_speed_and_volume_scenario() {
        let mut ctrl = controller(ScriptedProcess::default());
        assert_eq!(ctrl.state().volume(), 50);
        assert_eq!(ctrl.state().speed(), 1.0);

        press(&mut ctrl, PlayerCommand::SpeedUp, 4);
        assert_eq!(ctrl.state().speed(), 1.4);

        press(&mut ctrl, PlayerCommand::SpeedDown, 20);
        assert_eq!(ctrl.state().speed(), 0.1);

        press(&mut ctrl, PlayerCommand::VolumeUp, 6);
        assert_eq!(ctrl.state().volume(), 100);
    }

    #[test]
    fn test_speed_is_bound_at_launch() {
        let mut ctrl = controller(ScriptedProcess::default());
        press(&mut ctrl, PlayerCommand::SpeedUp, 5);
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        press(&mut ctrl, PlayerCommand::SpeedDown, 3);

        assert_eq!(ctrl.process().calls, vec!["start movie.mp4 1.5"]);
        assert_eq!(ctrl.state().speed(), 1.2);
    }

    #[test]
    fn test_quit_exits_loop() {
        let mut ctrl = controller(ScriptedProcess::default());
        assert_eq!(ctrl.dispatch(PlayerCommand::Quit), LoopControl::Exit);
    }

    #[test]
    fn test_player_exit_returns_to_stopped() {
        let mut ctrl = controller(ScriptedProcess::default());
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        assert!(!ctrl.poll_process());

        ctrl.process.exit = Some(PlayerExit::Finished);
        assert!(ctrl.poll_process());
        assert_eq!(ctrl.state().status(), PlaybackStatus::Stopped);
        assert_eq!(ctrl.status_message(), "Playback finished");

        // Toggle launches a fresh process
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        assert_eq!(ctrl.process().calls.len(), 2);
        assert!(!ctrl.poll_process());
    }

    #[test]
    fn test_failed_player_exit_is_reported() {
        let mut ctrl = controller(ScriptedProcess::default());
        ctrl.dispatch(PlayerCommand::TogglePlayback);

        let reason = "ffplay (pid 4242) exit status: 1".to_string();
        ctrl.process.exit = Some(PlayerExit::Failed(reason));
        assert!(ctrl.poll_process());
        assert_eq!(ctrl.state().status(), PlaybackStatus::Stopped);
        assert_eq!(
            ctrl.status_message(),
            "Error while playing the video: ffplay (pid 4242) exit status: 1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_player_binary_is_reported() {
        use crate::process::FfplayProcess;

        let _ = env_logger::builder().is_test(true).try_init();
        // `false` ignores its arguments and exits with status 1
        let mut ctrl = PlayerController::new(
            PathBuf::from("movie.mp4"),
            true,
            FfplayProcess::new("false"),
            &Config::default(),
        );
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        assert!(ctrl.state().is_playing());

        let mut changed = false;
        for _ in 0..100 {
            if ctrl.poll_process() {
                changed = true;
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        assert!(changed);
        assert_eq!(ctrl.state().status(), PlaybackStatus::Stopped);
        assert!(
            ctrl.status_message().starts_with("Error while playing the video"),
            "{}",
            ctrl.status_message()
        );
    }

    #[test]
    fn test_command_enabled_rules() {
        let mut state = PlayerState::default();
        assert!(command_enabled(&state, PlayerCommand::TogglePlayback));
        assert!(!command_enabled(&state, PlayerCommand::SpeedUp));
        assert!(!command_enabled(&state, PlayerCommand::VolumeDown));

        state.mark_started();
        assert!(!command_enabled(&state, PlayerCommand::TogglePlayback));
        assert!(command_enabled(&state, PlayerCommand::SpeedUp));
        assert!(command_enabled(&state, PlayerCommand::SpeedDown));
        assert!(command_enabled(&state, PlayerCommand::VolumeUp));
        assert!(command_enabled(&state, PlayerCommand::VolumeDown));

        for _ in 0..5 {
            state.increase_volume();
        }
        assert!(!command_enabled(&state, PlayerCommand::VolumeUp));

        state.mark_paused();
        assert!(command_enabled(&state, PlayerCommand::TogglePlayback));
        assert!(!command_enabled(&state, PlayerCommand::SpeedDown));
        assert!(!command_enabled(&state, PlayerCommand::VolumeDown));
        assert!(command_enabled(&state, PlayerCommand::Quit));
    }

    #[test]
    fn test_gated_controls_ignore_disabled_keys() {
        let config = Config {
            gate_controls: true,
            ..Config::default()
        };
        let mut ctrl = controller_with(ScriptedProcess::default(), &config);

        press(&mut ctrl, PlayerCommand::VolumeUp, 2);
        assert_eq!(ctrl.state().volume(), 50);

        ctrl.dispatch(PlayerCommand::TogglePlayback);
        press(&mut ctrl, PlayerCommand::VolumeUp, 2);
        assert_eq!(ctrl.state().volume(), 70);

        // Play/Pause is never gated
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        assert!(ctrl.state().is_paused());
        press(&mut ctrl, PlayerCommand::VolumeUp, 1);
        assert_eq!(ctrl.state().volume(), 70);
    }

    #[test]
    fn test_shutdown_terminates_player() {
        let mut ctrl = controller(ScriptedProcess::default());
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        ctrl.shutdown().unwrap();

        assert_eq!(ctrl.process().calls.last().unwrap(), "terminate");
        assert!(!ctrl.state().is_playing());
    }

    #[test]
    fn test_shutdown_can_leave_player_running() {
        let config = Config {
            keep_running: true,
            ..Config::default()
        };
        let mut ctrl = controller_with(ScriptedProcess::default(), &config);
        ctrl.dispatch(PlayerCommand::TogglePlayback);
        ctrl.shutdown().unwrap();

        assert!(!ctrl.process().calls.contains(&"terminate".to_string()));
        assert_eq!(ctrl.process().pid(), Some(4242));
    }
}
