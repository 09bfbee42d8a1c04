use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use strum::IntoEnumIterator;
use tui_logger::TuiLoggerWidget;
use vidctl_core::{
    commands::PlayerCommand,
    controller::{PlayerController, command_enabled},
    process::PlaybackProcess,
    state::{PlaybackStatus, PlayerState},
};

const NO_AUDIO_WARNING: &str = "Warning: the video has no audio track";

/// Buttons per row, top to bottom
const CONTROL_ROWS: [&[PlayerCommand]; 3] = [
    &[PlayerCommand::TogglePlayback],
    &[PlayerCommand::SpeedDown, PlayerCommand::SpeedUp],
    &[PlayerCommand::VolumeUp, PlayerCommand::VolumeDown],
];

/// A button as it should look right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlButton {
    pub command: PlayerCommand,
    pub enabled: bool,
}

impl ControlButton {
    pub fn label(&self) -> String {
        format!("[{}] {}", self.command.key_label(), self.command)
    }

    fn style(&self) -> Style {
        if self.enabled {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::Black).bg(Color::Red)
        }
    }
}

/// Button rows with their enabled look for `state`
pub fn controls(state: &PlayerState) -> Vec<Vec<ControlButton>> {
    CONTROL_ROWS
        .iter()
        .map(|row| {
            row.iter()
                .map(|&command| ControlButton {
                    command,
                    enabled: command_enabled(state, command),
                })
                .collect()
        })
        .collect()
}

/// Draw the whole screen
pub fn draw<P: PlaybackProcess>(f: &mut Frame, controller: &PlayerController<P>) {
    let frame_block = Block::default()
        .title(" vidctl ")
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);

    let inner = frame_block.inner(f.area());
    f.render_widget(frame_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(9), // File line and controls
            Constraint::Length(1), // Status
            Constraint::Length(1), // Key help
            Constraint::Min(0),    // Log
        ])
        .split(inner);

    draw_controls(f, chunks[0], controller);
    draw_status(f, chunks[1], controller);
    draw_help(f, chunks[2]);
    draw_log(f, chunks[3]);
}

/// File line, button rows, and the missing-audio warning
fn draw_controls<P: PlaybackProcess>(f: &mut Frame, area: Rect, controller: &PlayerController<P>) {
    let state = controller.state();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("File: ", Style::default().fg(Color::DarkGray)),
            Span::raw(controller.media_path().display().to_string()),
        ]),
        Line::default(),
    ];

    for row in controls(state) {
        let mut spans = Vec::new();
        for (i, button) in row.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(button.label(), button.style()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    if !state.audio_present() {
        lines.push(Line::from(Span::styled(
            NO_AUDIO_WARNING,
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_status<P: PlaybackProcess>(f: &mut Frame, area: Rect, controller: &PlayerController<P>) {
    let state = controller.state();
    let status_style = match state.status() {
        PlaybackStatus::Playing => Style::default().fg(Color::Green),
        PlaybackStatus::Paused => Style::default().fg(Color::Yellow),
        PlaybackStatus::Stopped => Style::default().fg(Color::Gray),
    };

    let line = Line::from(vec![
        Span::styled(
            state.status().to_string(),
            status_style.add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " | Speed x{:.1} | Volume {}% | ",
            state.speed(),
            state.volume()
        )),
        Span::styled(
            controller.status_message().to_string(),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

/// Key help generated from the command list
fn draw_help(f: &mut Frame, area: Rect) {
    let spans: Vec<Span> = PlayerCommand::iter()
        .flat_map(|command| {
            [
                Span::styled(
                    format!("[{}]", command.key_label()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(" {}  ", command)),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_log(f: &mut Frame, area: Rect) {
    let log_widget = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Log ")
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(log_widget, area);
}
