//! Audio stream detection through an external probing tool

use std::path::Path;
use std::process::Command;

use crate::error::{PlayerError, Result};

const STREAM_SECTION: &str = "[STREAM]";
const AUDIO_MARKER: &str = "codec_type=audio";

/// Queries an external tool for the streams of a media file
pub trait StreamInspector {
    /// Raw textual output of the probe
    fn inspect(&self, path: &Path) -> Result<String>;
}

/// Runs `ffprobe -show_streams -i <path>` and captures stdout and stderr
#[derive(Debug, Clone)]
pub struct FfprobeInspector {
    program: String,
}

impl FfprobeInspector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl StreamInspector for FfprobeInspector {
    fn inspect(&self, path: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-show_streams")
            .arg("-i")
            .arg(path)
            .output()
            .map_err(|source| PlayerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            let last_line = combined.lines().next_back().unwrap_or("").trim().to_string();
            return Err(PlayerError::Probe(format!(
                "{} exited with {}: {}",
                self.program, output.status, last_line
            )));
        }

        Ok(combined)
    }
}

/// True when any `[STREAM]` section of the probe output is an audio stream
pub fn has_audio_stream(output: &str) -> bool {
    output
        .split(STREAM_SECTION)
        .any(|section| section.contains(AUDIO_MARKER))
}

/// Probe once at startup. Any failure degrades to "no audio".
pub fn detect_audio(inspector: &dyn StreamInspector, path: &Path) -> bool {
    match inspector.inspect(path) {
        Ok(output) => {
            let present = has_audio_stream(&output);
            log::info!("Audio stream present in {:?}: {}", path, present);
            present
        }
        Err(e) => {
            log::warn!("Error while checking audio support: {}", e);
            false
        }
    }
}
