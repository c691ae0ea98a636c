use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};
use terminal_worm::config::{MAX_NAP_TIME_MS, MIN_NUMBER_OF_COLS, MIN_NUMBER_OF_ROWS, ROWS_RESERVED};
use terminal_worm::error::{ResultCode, WormError};
use terminal_worm::game::{GamePlan, LevelSource, Pacing, play_game};
use terminal_worm::input::KeyboardInput;
use terminal_worm::renderer::TerminalSurface;
use terminal_worm::settings::{Settings, load_settings, save_settings};
use terminal_worm::terminal_runtime::{TerminalSession, install_panic_hook};

const LOG_FILE_NAME: &str = "worm.log";

#[derive(Debug, Parser)]
#[command(version, about = "Steer a worm through file-defined levels and eat all the food")]
struct Cli {
    /// Play only this level file instead of the built-in level list.
    level: Option<PathBuf>,

    /// Pause between two frames in milliseconds.
    #[arg(
        short = 'n',
        long = "nap-time",
        value_parser = clap::value_parser!(u64).range(0..=MAX_NAP_TIME_MS)
    )]
    nap_time: Option<u64>,

    /// Start in single-step mode: one frame per key press.
    #[arg(short = 's', long = "single-step")]
    single_step: bool,

    /// Play the built-in generated level.
    #[arg(long = "generated", conflicts_with = "level")]
    generated: bool,

    /// Write the log here instead of the platform data directory.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Store the effective settings as the new defaults and exit.
    #[arg(long = "write-settings")]
    write_settings: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone());

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("Ignoring settings: {error}");
            warn!("falling back to default settings: {error}");
            Settings::default()
        }
    };
    let settings = apply_cli(settings, &cli);

    if cli.write_settings {
        return match save_settings(&settings) {
            Ok(()) => ResultCode::Ok.into(),
            Err(error) => {
                eprintln!("Failed to save settings: {error}");
                ResultCode::Failed.into()
            }
        };
    }

    install_panic_hook();

    match run(&cli, &settings) {
        Ok(()) => {
            info!("run finished");
            ResultCode::Ok.into()
        }
        Err(error) => {
            error!("run failed: {error}");
            // The terminal is restored by now; the message lands in the shell.
            eprintln!("{error}");
            error.result_code().into()
        }
    }
}

fn run(cli: &Cli, settings: &Settings) -> Result<(), WormError> {
    let session = TerminalSession::enter()?;

    let viewport = session.viewport()?;
    if viewport.height < ROWS_RESERVED + MIN_NUMBER_OF_ROWS
        || viewport.width < MIN_NUMBER_OF_COLS
    {
        return Err(WormError::TooSmall {
            min_cols: MIN_NUMBER_OF_COLS,
            min_rows: MIN_NUMBER_OF_ROWS + ROWS_RESERVED,
        });
    }

    let plan = if cli.generated {
        GamePlan::single(LevelSource::Generated)
    } else if let Some(level) = &cli.level {
        GamePlan::single(LevelSource::File(level.clone()))
    } else {
        GamePlan::sequence(&settings.level_dir, settings.levels.as_slice())
    };
    let pacing = Pacing {
        nap_time: Duration::from_millis(settings.nap_time_ms),
        single_step: settings.start_single_step,
    };

    let mut surface = TerminalSurface::new(session);
    let mut input = KeyboardInput::new();
    play_game(&mut surface, &mut input, &plan, pacing)
}

fn apply_cli(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(nap_time) = cli.nap_time {
        settings.nap_time_ms = nap_time;
    }
    if cli.single_step {
        settings.start_single_step = true;
    }
    settings
}

fn init_logging(path: Option<PathBuf>) {
    let path = path.unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Logging disabled, cannot create {}: {error}", path.display());
            return;
        }
    };

    if let Err(error) = WriteLogger::init(LevelFilter::Info, Config::default(), file) {
        eprintln!("Logging disabled: {error}");
    }
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("terminal-worm");
    base.push(LOG_FILE_NAME);
    base
}
