//! Lifecycle control of the external playback process
//!
//! The player is launched once per playback and addressed afterwards through
//! the `Child` handle captured at spawn time. Pause and resume are delivered
//! as SIGSTOP/SIGCONT to that PID only.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::error::{PlayerError, Result};

/// Boundary to the process that actually decodes and renders the video
pub trait PlaybackProcess {
    /// Launch playback of `path`. `speed` is bound for the lifetime of the launch.
    fn start(&mut self, path: &Path, speed: f64) -> Result<u32>;

    /// Stop the running process in place
    fn suspend(&mut self) -> Result<()>;

    /// Continue a suspended process
    fn resume(&mut self) -> Result<()>;

    /// Reap the process if it exited on its own. Returns `Some` exactly once
    /// per launch, on the first call after the exit.
    fn poll_exit(&mut self) -> Option<PlayerExit>;

    /// Kill and reap the process if one is running
    fn terminate(&mut self) -> Result<()>;

    fn pid(&self) -> Option<u32>;
}

/// How a launched player ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerExit {
    /// Exited with a success status
    Finished,
    /// Exited with a failure status or was killed by a signal
    Failed(String),
}

/// `ffplay`-compatible player adapter
#[derive(Debug)]
pub struct FfplayProcess {
    program: String,
    child: Option<Child>,
}

impl FfplayProcess {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    fn running_pid(&self) -> Result<u32> {
        self.child
            .as_ref()
            .map(Child::id)
            .ok_or(PlayerError::NotRunning)
    }
}

/// Command-line arguments for one launch
pub fn playback_args(path: &Path, speed: f64) -> Vec<OsString> {
    vec![
        OsString::from("-autoexit"),
        OsString::from("-i"),
        path.as_os_str().to_os_string(),
        OsString::from("-vf"),
        OsString::from(speed_filter(speed)),
    ]
}

/// Video filter that presents frames at `speed` times the normal rate.
/// Timestamps are divided by the multiplier, so 2.0 plays twice as fast.
pub fn speed_filter(speed: f64) -> String {
    format!("setpts=PTS/{:.2}", speed)
}

impl PlaybackProcess for FfplayProcess {
    fn start(&mut self, path: &Path, speed: f64) -> Result<u32> {
        if let Some(child) = &self.child {
            return Err(PlayerError::AlreadyRunning(child.id()));
        }

        let child = Command::new(&self.program)
            .args(playback_args(path, speed))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let pid = child.id();
        log::info!(
            "Started {} (pid {}) for {:?} at x{:.1}",
            self.program,
            pid,
            path,
            speed
        );
        self.child = Some(child);
        Ok(pid)
    }

    fn suspend(&mut self) -> Result<()> {
        let pid = self.running_pid()?;
        signal::stop(pid)
    }

    fn resume(&mut self) -> Result<()> {
        let pid = self.running_pid()?;
        signal::cont(pid)
    }

    fn poll_exit(&mut self) -> Option<PlayerExit> {
        let child = self.child.as_mut()?;

        match child.try_wait() {
            Ok(Some(status)) => {
                let pid = child.id();
                self.child = None;
                if status.success() {
                    log::info!("{} (pid {}) exited: {}", self.program, pid, status);
                    Some(PlayerExit::Finished)
                } else {
                    Some(PlayerExit::Failed(format!(
                        "{} (pid {}) {}",
                        self.program, pid, status
                    )))
                }
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not query {} status: {}", self.program, e);
                None
            }
        }
    }

    fn terminate(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let pid = child.id();
        if child.try_wait()?.is_none() {
            // A stopped child is continued first so it can be reaped promptly
            if let Err(e) = signal::cont(pid) {
                log::debug!("Could not continue {} before killing it: {}", self.program, e);
            }
            child.kill()?;
        }
        let status = child.wait()?;
        log::info!("Terminated {} (pid {}): {}", self.program, pid, status);
        Ok(())
    }

    fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

#[cfg(unix)]
mod signal {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    use crate::error::{PlayerError, Result};

    pub fn stop(pid: u32) -> Result<()> {
        send(pid, Signal::SIGSTOP)
    }

    pub fn cont(pid: u32) -> Result<()> {
        send(pid, Signal::SIGCONT)
    }

    fn send(pid: u32, signal: Signal) -> Result<()> {
        let raw = i32::try_from(pid).map_err(|_| PlayerError::Signal {
            signal: signal.as_str(),
            pid,
            reason: "pid out of range".to_string(),
        })?;

        kill(Pid::from_raw(raw), signal).map_err(|errno| PlayerError::Signal {
            signal: signal.as_str(),
            pid,
            reason: errno.desc().to_string(),
        })
    }
}

#[cfg(not(unix))]
mod signal {
    use crate::error::{PlayerError, Result};

    pub fn stop(_pid: u32) -> Result<()> {
        Err(PlayerError::Unsupported("suspending the player"))
    }

    pub fn cont(_pid: u32) -> Result<()> {
        Err(PlayerError::Unsupported("resuming the player"))
    }
}
