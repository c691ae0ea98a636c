use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

/// Canonical movement directions for the worm.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the `(dx, dy)` step for one tick; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete input events consumed by the tick loop, one per poll.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputEvent {
    Direction(Direction),
    Quit,
    /// Switch to blocking input: one frame per key press.
    SingleStepOn,
    /// Back to free-running frames.
    SingleStepOff,
    /// Development aid: grow the worm by the tier-3 bonus.
    DebugGrow,
}

/// Source of input events for the tick loop.
pub trait InputSource {
    /// Returns the next event.
    ///
    /// With `blocking` set, waits for one key press (which may map to no
    /// event); otherwise returns immediately.
    fn next_event(&mut self, blocking: bool) -> io::Result<Option<InputEvent>>;
}

/// Keyboard input read through crossterm.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for KeyboardInput {
    fn next_event(&mut self, blocking: bool) -> io::Result<Option<InputEvent>> {
        if blocking {
            let key = wait_for_key_press()?;
            return Ok(map_key(key));
        }

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key));
                }
            }
        }

        Ok(None)
    }
}

/// Blocks until a key is pressed and returns it.
pub fn wait_for_key_press() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

/// Maps one key press onto a game input event.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    let event = match key.code {
        KeyCode::Up => InputEvent::Direction(Direction::Up),
        KeyCode::Down => InputEvent::Direction(Direction::Down),
        KeyCode::Left => InputEvent::Direction(Direction::Left),
        KeyCode::Right => InputEvent::Direction(Direction::Right),
        KeyCode::Char('q') => InputEvent::Quit,
        KeyCode::Char('s') => InputEvent::SingleStepOn,
        KeyCode::Char(' ') => InputEvent::SingleStepOff,
        KeyCode::Char('g') => InputEvent::DebugGrow,
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{Direction, InputEvent, map_key};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn deltas_are_unit_steps_with_y_growing_down() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn arrow_keys_steer() {
        assert_eq!(
            map_key(press(KeyCode::Up)),
            Some(InputEvent::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(InputEvent::Direction(Direction::Left))
        );
    }

    #[test]
    fn control_keys_map_to_events() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(
            map_key(press(KeyCode::Char('s'))),
            Some(InputEvent::SingleStepOn)
        );
        assert_eq!(
            map_key(press(KeyCode::Char(' '))),
            Some(InputEvent::SingleStepOff)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('g'))),
            Some(InputEvent::DebugGrow)
        );
    }

    #[test]
    fn unmapped_keys_yield_nothing() {
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Enter)), None);
    }
}
