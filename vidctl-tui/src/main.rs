use std::io::{self, BufRead, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

use vidctl_core::{
    commands::LoopControl,
    config::{Config, DEFAULT_PLAYER, DEFAULT_PROBE, DEFAULT_TICK_MS},
    controller::PlayerController,
    probe::{self, FfprobeInspector},
    process::{FfplayProcess, PlaybackProcess},
};

mod keymap;
mod ui;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Parser)]
#[command(name = "vidctl", about = "Terminal remote control for an external video player", version)]
struct Cli {
    /// Video file to play. Prompted for on stdin when omitted
    path: Option<PathBuf>,

    /// Player executable
    #[arg(long, default_value = DEFAULT_PLAYER)]
    player: String,

    /// Probe executable used to detect audio streams
    #[arg(long, default_value = DEFAULT_PROBE)]
    probe: String,

    /// Leave the player running after quitting
    #[arg(long)]
    keep_running: bool,

    /// Ignore speed and volume keys while their buttons are disabled
    #[arg(long)]
    gate_controls: bool,

    /// Milliseconds to wait for a key before checking on the player
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            player_program: self.player.clone(),
            probe_program: self.probe.clone(),
            keep_running: self.keep_running,
            gate_controls: self.gate_controls,
            tick_rate: Duration::from_millis(self.tick_ms),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    // Initialize tui_logger for the log pane
    tui_logger::init_logger(log::LevelFilter::Debug)
        .map_err(|e| anyhow::anyhow!("failed to init tui_logger: {:?}", e))?;
    tui_logger::set_default_level(log::LevelFilter::Debug);

    log::info!("Starting vidctl");

    let path = match cli.path {
        Some(path) => path,
        None => prompt_video_path()?,
    };

    let inspector = FfprobeInspector::new(config.probe_program.as_str());
    let audio_present = probe::detect_audio(&inspector, &path);

    let player = FfplayProcess::new(config.player_program.as_str());
    let mut controller = PlayerController::new(path, audio_present, player, &config);

    let result = run_tui(&mut controller, &config);

    // Ensure the player does not outlive us unless asked to
    if let Err(e) = controller.shutdown() {
        eprintln!("Error while stopping the player: {}", e);
    }

    result
}

/// Read the video path from one line of stdin. The path is not validated.
fn prompt_video_path() -> anyhow::Result<PathBuf> {
    print!("Enter the path of the video file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read the video path")?;

    Ok(PathBuf::from(line.trim()))
}

fn run_tui<P: PlaybackProcess>(
    controller: &mut PlayerController<P>,
    config: &Config,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, controller, config.tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Draw, wait for one key, dispatch it. An input error ends the program.
fn event_loop<P: PlaybackProcess>(
    terminal: &mut Tui,
    controller: &mut PlayerController<P>,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    loop {
        controller.poll_process();

        terminal.draw(|f| ui::draw(f, controller))?;

        if !event::poll(tick_rate).context("failed to poll terminal input")? {
            continue;
        }

        if let Event::Key(key) = event::read().context("failed to read terminal input")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = keymap::command_for_key(key.code) {
                if controller.dispatch(command) == LoopControl::Exit {
                    log::info!("Quitting");
                    return Ok(());
                }
            }
        }
    }
}
