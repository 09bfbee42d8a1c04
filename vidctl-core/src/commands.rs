use strum::EnumIter;

/// Actions the input layer can request from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
pub enum PlayerCommand {
    /// Advance Stopped -> Playing -> Paused -> Playing
    #[strum(serialize = "Play/Pause")]
    TogglePlayback,
    /// Lower the launch speed by one step
    #[strum(serialize = "Slower")]
    SpeedDown,
    /// Raise the launch speed by one step
    #[strum(serialize = "Faster")]
    SpeedUp,
    /// Raise the displayed volume by one step
    #[strum(serialize = "Volume +")]
    VolumeUp,
    /// Lower the displayed volume by one step
    #[strum(serialize = "Volume -")]
    VolumeDown,
    /// Leave the event loop
    #[strum(serialize = "Quit")]
    Quit,
}

impl PlayerCommand {
    /// Key label shown on buttons and in the help line
    pub fn key_label(&self) -> &'static str {
        match self {
            PlayerCommand::TogglePlayback => "P",
            PlayerCommand::SpeedDown => "S",
            PlayerCommand::SpeedUp => "F",
            PlayerCommand::VolumeUp => "U",
            PlayerCommand::VolumeDown => "D",
            PlayerCommand::Quit => "Esc",
        }
    }

    /// Speed and volume steps, the commands strict gating applies to
    pub fn is_adjustment(&self) -> bool {
        matches!(
            self,
            PlayerCommand::SpeedDown
                | PlayerCommand::SpeedUp
                | PlayerCommand::VolumeUp
                | PlayerCommand::VolumeDown
        )
    }
}

/// What the event loop should do after a command was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}
