use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::config::{
    ColorTag, GLYPH_BARRIER, GLYPH_FREE_CELL, GLYPH_WORM_INNER, GridSize, MIN_NUMBER_OF_COLS,
    MIN_NUMBER_OF_ROWS, ROWS_RESERVED, SYMBOL_BARRIER,
};
use crate::error::WormError;
use crate::food::FoodTier;
use crate::worm::Position;

/// Semantic content of one board position.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Cell {
    Free,
    Barrier,
    Worm,
    Food(FoodTier),
}

impl Cell {
    /// Decodes one level file symbol. Unknown symbols are free cells.
    #[must_use]
    pub fn from_symbol(symbol: u8) -> Self {
        if symbol == SYMBOL_BARRIER {
            return Self::Barrier;
        }

        FoodTier::from_symbol(symbol).map_or(Self::Free, Self::Food)
    }

    #[must_use]
    pub fn is_food(self) -> bool {
        matches!(self, Self::Food(_))
    }

    /// Glyph and color the cell is painted with when no caller-specific
    /// glyph applies.
    #[must_use]
    pub fn appearance(self) -> (char, ColorTag) {
        match self {
            Self::Free => (GLYPH_FREE_CELL, ColorTag::FreeCell),
            Self::Barrier => (GLYPH_BARRIER, ColorTag::Barrier),
            Self::Worm => (GLYPH_WORM_INNER, ColorTag::UserWorm),
            Self::Food(tier) => (char::from(tier.symbol()), tier.color()),
        }
    }
}

/// One painted cell, queued for the rendering collaborator.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CellChange {
    pub position: Position,
    pub cell: Cell,
    pub glyph: char,
    pub color: ColorTag,
}

/// The playable area of one level.
///
/// Every mutation goes through [`Board::place_item`], which also queues a
/// [`CellChange`]. The renderer drains those with [`Board::take_changes`].
#[derive(Debug, Clone)]
pub struct Board {
    size: GridSize,
    cells: Vec<Cell>,
    food_remaining: usize,
    changes: Vec<CellChange>,
}

impl Board {
    /// Derives the board from the terminal viewport, keeping
    /// [`ROWS_RESERVED`] rows free below it for the status area.
    pub fn new(viewport: GridSize) -> Result<Self, WormError> {
        let size = GridSize {
            width: viewport.width,
            height: viewport.height.saturating_sub(ROWS_RESERVED),
        };
        Self::with_size(size)
    }

    /// Allocates a board of exactly `size` cells, all free.
    pub fn with_size(size: GridSize) -> Result<Self, WormError> {
        if size.width < MIN_NUMBER_OF_COLS || size.height < MIN_NUMBER_OF_ROWS {
            return Err(WormError::TooSmall {
                min_cols: MIN_NUMBER_OF_COLS,
                min_rows: MIN_NUMBER_OF_ROWS + ROWS_RESERVED,
            });
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size.total_cells())
            .map_err(|_| WormError::NoMemory)?;
        cells.resize(size.total_cells(), Cell::Free);

        Ok(Self {
            size,
            cells,
            food_remaining: 0,
            changes: Vec::new(),
        })
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Index of the bottom row.
    #[must_use]
    pub fn last_row(&self) -> i32 {
        i32::from(self.size.height) - 1
    }

    /// Index of the rightmost column.
    #[must_use]
    pub fn last_col(&self) -> i32 {
        i32::from(self.size.width) - 1
    }

    /// Returns true when `position` addresses a cell of this board.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.is_within_bounds(self.size)
    }

    /// Sets the classification of one cell and queues its repaint.
    pub fn place_item(&mut self, position: Position, cell: Cell, glyph: char, color: ColorTag) {
        let index = self.index(position);
        self.cells[index] = cell;
        self.changes.push(CellChange {
            position,
            cell,
            glyph,
            color,
        });
    }

    /// Returns the classification at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the board. Callers check with
    /// [`Board::contains`] first.
    #[must_use]
    pub fn content_at(&self, position: Position) -> Cell {
        self.cells[self.index(position)]
    }

    #[must_use]
    pub fn food_remaining(&self) -> usize {
        self.food_remaining
    }

    pub fn decrement_food(&mut self) {
        self.food_remaining = self.food_remaining.saturating_sub(1);
    }

    pub fn set_food(&mut self, count: usize) {
        self.food_remaining = count;
    }

    /// Counts food cells by scanning the grid.
    #[must_use]
    pub fn count_food_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_food()).count()
    }

    /// Drains the repaints queued since the previous call.
    pub fn take_changes(&mut self) -> Vec<CellChange> {
        std::mem::take(&mut self.changes)
    }

    /// Loads a level description: one line per row, one symbol per column.
    ///
    /// Lines beyond the board height are ignored and columns beyond the
    /// board width are discarded. Missing rows and columns stay free.
    pub fn load_level<R: BufRead>(&mut self, mut source: R) -> io::Result<()> {
        self.clear();

        let width = usize::from(self.size.width);
        let mut line = Vec::with_capacity(width + 2);
        for y in 0..i32::from(self.size.height) {
            line.clear();
            if source.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if line.last() == Some(&b'\n') {
                line.pop();
            }

            for (x, &symbol) in (0..).zip(line.iter().take(width)) {
                let cell = Cell::from_symbol(symbol);
                if cell == Cell::Free {
                    continue;
                }

                let (glyph, color) = cell.appearance();
                self.place_item(Position { x, y }, cell, glyph, color);
                if cell.is_food() {
                    self.food_remaining += 1;
                }
            }
        }

        debug!(
            "level loaded: {}x{} board, {} food items",
            self.size.width, self.size.height, self.food_remaining
        );
        Ok(())
    }

    /// Opens `path` and loads it with [`Board::load_level`].
    pub fn load_level_file(&mut self, path: &Path) -> Result<(), WormError> {
        let to_error = |source: io::Error| WormError::LevelFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(to_error)?;
        self.load_level(BufReader::new(file)).map_err(to_error)
    }

    /// Fills the board with the scripted fallback level: a barrier along the
    /// right edge, two vertical barrier runs and one row of mixed food.
    pub fn generate_default_level(&mut self) {
        self.clear();

        let last_col = self.last_col();
        for y in 0..=self.last_row() {
            self.place_if_inside(Position { x: last_col, y }, Cell::Barrier);
        }
        for y in 5..20 {
            let x = last_col - last_col / 3;
            self.place_if_inside(Position { x, y }, Cell::Barrier);
        }
        for y in 10..=17 {
            let x = last_col / 3;
            self.place_if_inside(Position { x, y }, Cell::Barrier);
        }

        let food_row = [
            (6..=9, FoodTier::Three),
            (10..=11, FoodTier::One),
            (12..=15, FoodTier::Two),
        ];
        for (columns, tier) in food_row {
            for x in columns {
                self.place_if_inside(Position { x, y: 6 }, Cell::Food(tier));
            }
        }

        self.food_remaining = self.count_food_cells();
    }

    fn place_if_inside(&mut self, position: Position, cell: Cell) {
        if self.contains(position) {
            let (glyph, color) = cell.appearance();
            self.place_item(position, cell, glyph, color);
        }
    }

    fn clear(&mut self) {
        for y in 0..i32::from(self.size.height) {
            for x in 0..i32::from(self.size.width) {
                self.place_item(
                    Position { x, y },
                    Cell::Free,
                    GLYPH_FREE_CELL,
                    ColorTag::FreeCell,
                );
            }
        }
        self.food_remaining = 0;
    }

    fn index(&self, position: Position) -> usize {
        assert!(
            self.contains(position),
            "board position ({}, {}) is outside {}x{}",
            position.x,
            position.y,
            self.size.width,
            self.size.height,
        );

        // In bounds, so both coordinates are non-negative.
        position.y as usize * usize::from(self.size.width) + position.x as usize
    }
}
