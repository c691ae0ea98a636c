use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::board::{Board, CellChange};
use crate::config::{BONUS_3, ColorTag, GridSize, WORM_INITIAL_LENGTH};
use crate::error::WormError;
use crate::input::{Direction, InputEvent, InputSource};
use crate::worm::{Position, Worm};

const PRESS_ANY_KEY: &str = "Press any key";

/// Per-level state of the tick loop. Everything but `Ongoing` ends the level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Ongoing,
    Quit,
    OutOfBounds,
    Crash,
    Crossing,
}

/// Why the player lost a level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LossCause {
    OutOfBounds,
    Crash,
    Crossing,
}

/// How a level ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LevelVerdict {
    Completed,
    Quit,
    Lost(LossCause),
}

impl LevelVerdict {
    /// Classifies the state the tick loop stopped in.
    ///
    /// An `Ongoing` level with food left means the loop exited for no known
    /// reason, which is reported as an internal error.
    pub fn from_end_state(status: GameStatus, food_remaining: usize) -> Result<Self, WormError> {
        match status {
            GameStatus::Ongoing if food_remaining == 0 => Ok(Self::Completed),
            GameStatus::Ongoing => Err(WormError::InternalError(format!(
                "level loop ended with {food_remaining} food items left"
            ))),
            GameStatus::Quit => Ok(Self::Quit),
            GameStatus::OutOfBounds => Ok(Self::Lost(LossCause::OutOfBounds)),
            GameStatus::Crash => Ok(Self::Lost(LossCause::Crash)),
            GameStatus::Crossing => Ok(Self::Lost(LossCause::Crossing)),
        }
    }

    /// Message shown in the end-of-level dialog.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Completed => "Level completed!",
            Self::Quit => "You aborted the current level.",
            Self::Lost(LossCause::OutOfBounds) => "You lost: your worm left the board.",
            Self::Lost(LossCause::Crash) => "You lost: your worm hit a barrier.",
            Self::Lost(LossCause::Crossing) => "You lost: your worm crossed a worm.",
        }
    }
}

/// Where the content of a level comes from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LevelSource {
    File(PathBuf),
    Generated,
}

impl LevelSource {
    /// Short name for the status line and the log.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            ),
            Self::Generated => "generated".to_owned(),
        }
    }
}

/// Values shown in the status area below the board.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StatusInfo {
    pub level_name: String,
    pub head: Position,
    pub length: usize,
    pub food_remaining: usize,
    pub single_step: bool,
}

/// Display collaborator of the tick loop.
pub trait Surface {
    /// Current terminal size in cells.
    fn viewport(&mut self) -> Result<GridSize, WormError>;

    /// Records repainted board cells; shown on the next refresh.
    fn draw_cells(&mut self, changes: &[CellChange]);

    /// Records the status area content; shown on the next refresh.
    fn draw_status(&mut self, status: &StatusInfo);

    /// Flushes everything recorded so far to the screen.
    fn refresh(&mut self) -> Result<(), WormError>;

    /// Shows a modal message and waits for acknowledgement.
    fn show_dialog(&mut self, message: &str, prompt: &str) -> Result<(), WormError>;
}

/// Frame pacing shared by all levels of a run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pacing {
    pub nap_time: Duration,
    /// Blocking input: the loop waits for a key before every frame.
    pub single_step: bool,
}

/// The ordered levels of one run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GamePlan {
    pub levels: Vec<LevelSource>,
    /// Congratulate after the last level; off when a single level was chosen.
    pub announce_completion: bool,
}

impl GamePlan {
    /// Plays only `source`.
    #[must_use]
    pub fn single(source: LevelSource) -> Self {
        Self {
            levels: vec![source],
            announce_completion: false,
        }
    }

    /// Plays `names` in order, each resolved against `level_dir`.
    #[must_use]
    pub fn sequence<S: AsRef<str>>(level_dir: &Path, names: &[S]) -> Self {
        Self {
            levels: names
                .iter()
                .map(|name| LevelSource::File(level_dir.join(name.as_ref())))
                .collect(),
            announce_completion: true,
        }
    }
}

/// Board and worm of the level being played.
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    board: Board,
    worm: Worm,
    status: GameStatus,
}

impl Level {
    /// Sets up a level on a board sized for `viewport`.
    pub fn from_source(viewport: GridSize, source: &LevelSource) -> Result<Self, WormError> {
        let mut board = Board::new(viewport)?;
        match source {
            LevelSource::File(path) => board.load_level_file(path)?,
            LevelSource::Generated => board.generate_default_level(),
        }

        Self::new(source.name(), board)
    }

    /// Places a fresh worm in the bottom-left corner of a loaded board.
    pub fn new(name: String, mut board: Board) -> Result<Self, WormError> {
        let start = Position {
            x: 0,
            y: board.last_row(),
        };
        let worm = Worm::new(
            board.size().total_cells(),
            WORM_INITIAL_LENGTH,
            start,
            Direction::Right,
            ColorTag::UserWorm,
        )?;
        place_worm(&worm, &mut board);

        Ok(Self {
            name,
            board,
            worm,
            status: GameStatus::Ongoing,
        })
    }

    /// Replaces the worm, e.g. to start a scenario from a known layout.
    pub fn with_worm(mut self, worm: Worm) -> Self {
        self.worm.remove_from_board(&mut self.board);
        self.worm = worm;
        place_worm(&self.worm, &mut self.board);
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn worm(&self) -> &Worm {
        &self.worm
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Applies one input event to the worm or the level state.
    ///
    /// Step-mode events belong to the loop's pacing and are ignored here.
    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Direction(direction) => self.worm.set_heading(direction),
            InputEvent::DebugGrow => self.worm.grow(BONUS_3),
            InputEvent::Quit => self.status = GameStatus::Quit,
            InputEvent::SingleStepOn | InputEvent::SingleStepOff => {}
        }
    }

    /// Advances the level by one tick: erase tail, move, repaint.
    pub fn tick(&mut self) -> GameStatus {
        if self.status != GameStatus::Ongoing {
            return self.status;
        }

        self.worm.erase_trailing_segment(&mut self.board);
        self.status = self.worm.advance(&mut self.board);
        if self.status == GameStatus::Ongoing {
            self.worm.render(&mut self.board);
            debug_assert_eq!(
                self.board.food_remaining(),
                self.board.count_food_cells()
            );
        }

        self.status
    }

    /// True once every food item has been eaten.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.board.food_remaining() == 0
    }

    /// Classifies how the level ended.
    pub fn verdict(&self) -> Result<LevelVerdict, WormError> {
        LevelVerdict::from_end_state(self.status, self.board.food_remaining())
    }

    /// Drains board repaints for the renderer.
    pub fn take_changes(&mut self) -> Vec<CellChange> {
        self.board.take_changes()
    }

    #[must_use]
    pub fn status_info(&self, single_step: bool) -> StatusInfo {
        StatusInfo {
            level_name: self.name.clone(),
            head: self.worm.head(),
            length: self.worm.length(),
            food_remaining: self.board.food_remaining(),
            single_step,
        }
    }

    /// Frees the worm's cells at the end of the level.
    pub fn remove_worm(&mut self) {
        self.worm.remove_from_board(&mut self.board);
    }
}

/// Paints a freshly placed worm. Food under its head is eaten on the spot.
fn place_worm(worm: &Worm, board: &mut Board) {
    if board.content_at(worm.head()).is_food() {
        board.decrement_food();
    }
    worm.render(board);
}

/// Plays one level to its end and reports the verdict in a dialog.
///
/// Setup failures are shown to the player and returned as errors.
pub fn run_level<S, I>(
    surface: &mut S,
    input: &mut I,
    source: &LevelSource,
    pacing: &mut Pacing,
) -> Result<LevelVerdict, WormError>
where
    S: Surface + ?Sized,
    I: InputSource + ?Sized,
{
    let viewport = surface.viewport()?;
    let mut level = match Level::from_source(viewport, source) {
        Ok(level) => level,
        Err(error) => {
            warn!("level {} could not be set up: {error}", source.name());
            surface.show_dialog(&error.to_string(), PRESS_ANY_KEY)?;
            return Err(error);
        }
    };

    info!(
        "starting level {} on a {}x{} board with {} food items",
        source.name(),
        level.board().size().width,
        level.board().size().height,
        level.board().food_remaining()
    );

    surface.draw_cells(&level.take_changes());
    surface.draw_status(&level.status_info(pacing.single_step));
    surface.refresh()?;

    loop {
        if let Some(event) = input.next_event(pacing.single_step)? {
            match event {
                InputEvent::SingleStepOn => {
                    debug!("single-step mode on");
                    pacing.single_step = true;
                }
                InputEvent::SingleStepOff => {
                    debug!("single-step mode off");
                    pacing.single_step = false;
                }
                other => level.apply_input(other),
            }
        }
        if level.status() == GameStatus::Quit {
            break;
        }

        if level.tick() != GameStatus::Ongoing {
            break;
        }

        surface.draw_cells(&level.take_changes());
        surface.draw_status(&level.status_info(pacing.single_step));
        if !pacing.nap_time.is_zero() {
            thread::sleep(pacing.nap_time);
        }
        surface.refresh()?;

        if level.is_complete() {
            break;
        }
    }

    let verdict = level.verdict();
    match &verdict {
        Ok(verdict) => {
            info!("level {} ended: {verdict:?}", source.name());
            surface.show_dialog(verdict.message(), PRESS_ANY_KEY)?;
        }
        Err(error) => {
            warn!("level {} ended abnormally: {error}", source.name());
            surface.show_dialog("Internal error!", PRESS_ANY_KEY)?;
        }
    }

    level.remove_worm();
    surface.draw_cells(&level.take_changes());
    surface.refresh()?;

    verdict
}

/// Plays the levels of `plan` in order until one is not completed.
pub fn play_game<S, I>(
    surface: &mut S,
    input: &mut I,
    plan: &GamePlan,
    mut pacing: Pacing,
) -> Result<(), WormError>
where
    S: Surface + ?Sized,
    I: InputSource + ?Sized,
{
    for source in &plan.levels {
        let verdict = run_level(surface, input, source, &mut pacing)?;
        if verdict != LevelVerdict::Completed {
            return Ok(());
        }
    }

    if plan.announce_completion {
        info!("all {} levels completed", plan.levels.len());
        surface.show_dialog("You finished all levels!", PRESS_ANY_KEY)?;
    }

    Ok(())
}
