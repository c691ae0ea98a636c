use std::collections::VecDeque;

use crate::board::{Board, Cell};
use crate::config::{
    ColorTag, GLYPH_FREE_CELL, GLYPH_WORM_HEAD, GLYPH_WORM_INNER, GLYPH_WORM_TAIL, GridSize,
};
use crate::error::WormError;
use crate::game::GameStatus;
use crate::input::Direction;

/// Grid position in logical cell coordinates: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring position one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The player's worm.
///
/// `body` holds the live segments, head first. It never holds more than
/// `length` segments after a move, and `length` never exceeds `capacity`.
/// A fresh worm starts as a single head and unrolls one segment per tick
/// until it reaches its length.
#[derive(Debug, Clone)]
pub struct Worm {
    body: VecDeque<Position>,
    capacity: usize,
    length: usize,
    heading: Direction,
    color: ColorTag,
}

impl Worm {
    /// Creates a worm whose head sits at `head`.
    ///
    /// `initial_length` is clamped to `1..=capacity`. Fails with
    /// [`WormError::NoMemory`] if the segment buffer cannot be allocated.
    pub fn new(
        capacity: usize,
        initial_length: usize,
        head: Position,
        heading: Direction,
        color: ColorTag,
    ) -> Result<Self, WormError> {
        if capacity == 0 {
            return Err(WormError::InternalError(
                "worm capacity must be at least one segment".to_owned(),
            ));
        }

        let mut body = VecDeque::new();
        // One spare slot: a move pushes the new head before trimming the tail.
        let slots = capacity.checked_add(1).ok_or(WormError::NoMemory)?;
        body.try_reserve_exact(slots)
            .map_err(|_| WormError::NoMemory)?;
        body.push_front(head);

        let mut worm = Self {
            body,
            capacity,
            length: initial_length.clamp(1, capacity),
            heading,
            color,
        };
        worm.set_heading(heading);
        Ok(worm)
    }

    /// Changes the heading used by the next [`Worm::advance`].
    ///
    /// Reversals are allowed; running back into the body is a crossing.
    pub fn set_heading(&mut self, heading: Direction) {
        self.heading = heading;
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("worm body must always contain the head segment")
    }

    /// Target segment count, including segments still to unroll.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over live segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Adds `bonus` segments, saturating at the capacity.
    pub fn grow(&mut self, bonus: usize) {
        self.length = self.length.saturating_add(bonus).min(self.capacity);
    }

    /// Paints the head, the segment behind it and the tail.
    ///
    /// Interior segments keep the glyph they got when they were the
    /// second segment, so only these three cells change per tick.
    pub fn render(&self, board: &mut Board) {
        board.place_item(self.head(), Cell::Worm, GLYPH_WORM_HEAD, self.color);

        if let Some(&inner) = self.body.get(1) {
            board.place_item(inner, Cell::Worm, GLYPH_WORM_INNER, self.color);
        }

        if self.body.len() > 1 {
            if let Some(&tail) = self.body.back() {
                board.place_item(tail, Cell::Worm, GLYPH_WORM_TAIL, self.color);
            }
        }
    }

    /// Frees the cell of the oldest segment if the next move will drop it.
    ///
    /// While the worm is shorter than its length the tail stays put,
    /// which is how growth shows up on screen.
    pub fn erase_trailing_segment(&mut self, board: &mut Board) {
        if self.body.len() < self.length {
            return;
        }

        // A single-segment worm keeps its head as the anchor for the move;
        // advance trims it once the new head is in place.
        let tail = if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            self.body.back().copied()
        };

        if let Some(tail) = tail {
            board.place_item(tail, Cell::Free, GLYPH_FREE_CELL, ColorTag::FreeCell);
        }
    }

    /// Moves the head one step along the heading and classifies the result.
    ///
    /// The head only moves when the outcome is [`GameStatus::Ongoing`].
    /// The target cell is marked as worm by the next [`Worm::render`].
    pub fn advance(&mut self, board: &mut Board) -> GameStatus {
        let candidate = self.head().step(self.heading);

        if !board.contains(candidate) {
            return GameStatus::OutOfBounds;
        }

        let status = match board.content_at(candidate) {
            Cell::Food(tier) => {
                self.grow(tier.bonus());
                board.decrement_food();
                GameStatus::Ongoing
            }
            Cell::Barrier => GameStatus::Crash,
            Cell::Worm => GameStatus::Crossing,
            Cell::Free => GameStatus::Ongoing,
        };

        if status == GameStatus::Ongoing {
            self.body.push_front(candidate);
            self.body.truncate(self.length);
        }

        status
    }

    /// Frees every live segment on the board.
    pub fn remove_from_board(&self, board: &mut Board) {
        for &segment in &self.body {
            board.place_item(segment, Cell::Free, GLYPH_FREE_CELL, ColorTag::FreeCell);
        }
    }
}
