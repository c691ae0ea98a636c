use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use terminal_worm::board::{Cell, CellChange};
use terminal_worm::config::GridSize;
use terminal_worm::error::WormError;
use terminal_worm::game::{
    GamePlan, LevelSource, LevelVerdict, LossCause, Pacing, StatusInfo, Surface, play_game,
    run_level,
};
use terminal_worm::input::{Direction, InputEvent, InputSource};

/// Surface that records what the loop asked it to show.
#[derive(Debug, Default)]
struct RecordingSurface {
    levels_set_up: usize,
    changes: Vec<CellChange>,
    statuses: Vec<StatusInfo>,
    dialogs: Vec<String>,
    refreshes: usize,
}

impl Surface for RecordingSurface {
    fn viewport(&mut self) -> Result<GridSize, WormError> {
        self.levels_set_up += 1;
        // 10x3 board once the status rows are reserved.
        Ok(GridSize {
            width: 10,
            height: 7,
        })
    }

    fn draw_cells(&mut self, changes: &[CellChange]) {
        self.changes.extend_from_slice(changes);
    }

    fn draw_status(&mut self, status: &StatusInfo) {
        self.statuses.push(status.clone());
    }

    fn refresh(&mut self) -> Result<(), WormError> {
        self.refreshes += 1;
        Ok(())
    }

    fn show_dialog(&mut self, message: &str, _prompt: &str) -> Result<(), WormError> {
        self.dialogs.push(message.to_owned());
        Ok(())
    }
}

/// Input that replays a fixed script, then reports no key presses.
#[derive(Debug, Default)]
struct ScriptedInput {
    events: VecDeque<Option<InputEvent>>,
    blocking_polls: Vec<bool>,
}

impl ScriptedInput {
    fn new(events: Vec<Option<InputEvent>>) -> Self {
        Self {
            events: events.into(),
            blocking_polls: Vec::new(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self, blocking: bool) -> io::Result<Option<InputEvent>> {
        self.blocking_polls.push(blocking);
        Ok(self.events.pop_front().flatten())
    }
}

fn free_running() -> Pacing {
    Pacing {
        nap_time: Duration::ZERO,
        single_step: false,
    }
}

fn level_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after epoch")
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("worm-level-tests")
        .join(format!("{label}-{nanos}"));
    fs::create_dir_all(&dir).expect("test level directory should be creatable");
    dir
}

fn write_level(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, rows.join("\n")).expect("test level write should succeed");
    path
}

#[test]
fn completing_a_level_reports_success_and_clears_worm() {
    let dir = level_dir("complete");
    let path = write_level(&dir, "one.level", &["", "", "   @"]);
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::default();
    let mut pacing = free_running();

    let verdict = run_level(&mut surface, &mut input, &LevelSource::File(path), &mut pacing)
        .expect("level should run");

    assert_eq!(verdict, LevelVerdict::Completed);
    assert_eq!(surface.dialogs, vec!["Level completed!".to_owned()]);
    assert_eq!(surface.statuses.last().map(|s| s.food_remaining), Some(0));
    assert_eq!(surface.statuses.last().map(|s| s.level_name.as_str()), Some("one.level"));

    // Teardown repaints every live segment as free.
    let teardown: Vec<&CellChange> = surface
        .changes
        .iter()
        .rev()
        .take_while(|change| change.cell == Cell::Free)
        .collect();
    assert_eq!(teardown.len(), 4);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn quitting_ends_the_level_before_the_first_move() {
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::new(vec![Some(InputEvent::Quit)]);
    let mut pacing = free_running();

    let verdict = run_level(&mut surface, &mut input, &LevelSource::Generated, &mut pacing)
        .expect("level should run");

    assert_eq!(verdict, LevelVerdict::Quit);
    assert_eq!(surface.dialogs, vec!["You aborted the current level.".to_owned()]);
    // Only the initial frame and the teardown were flushed.
    assert_eq!(surface.refreshes, 2);
}

#[test]
fn steering_into_the_bottom_edge_loses_the_level() {
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::new(vec![Some(InputEvent::Direction(Direction::Down))]);
    let mut pacing = free_running();

    let verdict = run_level(&mut surface, &mut input, &LevelSource::Generated, &mut pacing)
        .expect("level should run");

    assert_eq!(verdict, LevelVerdict::Lost(LossCause::OutOfBounds));
    assert!(surface.dialogs[0].contains("left the board"));
}

#[test]
fn single_step_mode_switches_to_blocking_polls() {
    let dir = level_dir("single-step");
    let path = write_level(&dir, "step.level", &["", "", "      @"]);
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::new(vec![
        Some(InputEvent::SingleStepOn),
        None,
        Some(InputEvent::SingleStepOff),
    ]);
    let mut pacing = free_running();

    let verdict = run_level(&mut surface, &mut input, &LevelSource::File(path), &mut pacing)
        .expect("level should run");

    assert_eq!(verdict, LevelVerdict::Completed);
    assert_eq!(&input.blocking_polls[..4], &[false, true, true, false]);
    assert!(!pacing.single_step);
    assert!(surface.statuses.iter().any(|status| status.single_step));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn missing_level_file_is_shown_and_returned() {
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::default();
    let mut pacing = free_running();
    let source = LevelSource::File(PathBuf::from("no/such/dir/missing.level.9"));

    let result = run_level(&mut surface, &mut input, &source, &mut pacing);

    assert!(matches!(result, Err(WormError::LevelFile { .. })));
    assert_eq!(surface.dialogs.len(), 1);
    assert!(surface.dialogs[0].contains("missing.level.9"));
}

#[test]
fn level_sequence_plays_all_levels_and_congratulates() {
    let dir = level_dir("sequence");
    write_level(&dir, "a.level.1", &["", "", "  @"]);
    write_level(&dir, "b.level.2", &["", "", "    $"]);
    let plan = GamePlan::sequence(&dir, &["a.level.1", "b.level.2"]);
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::default();

    play_game(&mut surface, &mut input, &plan, free_running()).expect("game should run");

    assert_eq!(surface.levels_set_up, 2);
    assert_eq!(
        surface.dialogs,
        vec![
            "Level completed!".to_owned(),
            "Level completed!".to_owned(),
            "You finished all levels!".to_owned(),
        ]
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn level_sequence_stops_after_a_loss() {
    let dir = level_dir("stop");
    write_level(&dir, "a.level.1", &["", "", "  #   @"]);
    write_level(&dir, "b.level.2", &["", "", "  @"]);
    let plan = GamePlan::sequence(&dir, &["a.level.1", "b.level.2"]);
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::default();

    play_game(&mut surface, &mut input, &plan, free_running()).expect("game should run");

    assert_eq!(surface.levels_set_up, 1);
    assert_eq!(surface.dialogs.len(), 1);
    assert!(surface.dialogs[0].contains("barrier"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn single_level_plan_skips_the_final_message() {
    let dir = level_dir("single");
    let path = write_level(&dir, "only.level", &["", "", " &"]);
    let plan = GamePlan::single(LevelSource::File(path));
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::default();

    play_game(&mut surface, &mut input, &plan, free_running()).expect("game should run");

    assert_eq!(surface.dialogs, vec!["Level completed!".to_owned()]);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn level_sequence_propagates_setup_errors() {
    let dir = level_dir("broken");
    write_level(&dir, "a.level.1", &["", "", "  @"]);
    let plan = GamePlan::sequence(&dir, &["a.level.1", "missing.level.2"]);
    let mut surface = RecordingSurface::default();
    let mut input = ScriptedInput::default();

    let result = play_game(&mut surface, &mut input, &plan, free_running());

    assert!(matches!(result, Err(WormError::LevelFile { .. })));
    assert_eq!(surface.dialogs.len(), 2);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn shipped_levels_load_with_food_and_a_free_start() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("levels");
    let viewport = GridSize {
        width: 80,
        height: 24,
    };

    for name in terminal_worm::config::DEFAULT_LEVELS {
        let mut board = terminal_worm::board::Board::new(viewport).expect("board");
        board
            .load_level_file(&dir.join(name))
            .expect("shipped level should load");

        assert!(board.food_remaining() > 0, "{name} has no food");
        assert_eq!(board.food_remaining(), board.count_food_cells());
        let start = terminal_worm::worm::Position {
            x: 0,
            y: board.last_row(),
        };
        assert_eq!(board.content_at(start), Cell::Free, "{name} blocks the start");
    }
}
