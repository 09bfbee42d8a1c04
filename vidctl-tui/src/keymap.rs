use ratatui::crossterm::event::KeyCode;
use vidctl_core::commands::PlayerCommand;

/// Translate one keystroke into a player command. Letters match either case;
/// unmapped keys yield `None`.
pub fn command_for_key(key: KeyCode) -> Option<PlayerCommand> {
    match key {
        KeyCode::Esc => Some(PlayerCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'p' => Some(PlayerCommand::TogglePlayback),
            's' => Some(PlayerCommand::SpeedDown),
            'f' => Some(PlayerCommand::SpeedUp),
            'u' => Some(PlayerCommand::VolumeUp),
            'd' => Some(PlayerCommand::VolumeDown),
            _ => None,
        },
        _ => None,
    }
}
