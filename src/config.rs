use ratatui::style::Color;

/// Logical grid dimensions passed through the game as a named type.
///
/// Used both for the terminal viewport and for the playable board, so
/// width (columns) vs. height (rows) is unambiguous at every call site.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Rows below the board kept free for the separator line and the status area.
pub const ROWS_RESERVED: u16 = 4;

/// Smallest playable board height.
pub const MIN_NUMBER_OF_ROWS: u16 = 3;

/// Smallest playable board width.
pub const MIN_NUMBER_OF_COLS: u16 = 10;

/// Segment count a fresh worm grows into at the start of a level.
pub const WORM_INITIAL_LENGTH: usize = 5;

/// Length bonus for tier-1 food.
pub const BONUS_1: usize = 1;

/// Length bonus for tier-2 food.
pub const BONUS_2: usize = 2;

/// Length bonus for tier-3 food. Also used by the debug-grow key.
pub const BONUS_3: usize = 4;

/// Level file symbols.
pub const SYMBOL_BARRIER: u8 = b'#';
pub const SYMBOL_FOOD_1: u8 = b'@';
pub const SYMBOL_FOOD_2: u8 = b'$';
pub const SYMBOL_FOOD_3: u8 = b'&';

/// Glyph painted for free cells.
pub const GLYPH_FREE_CELL: char = ' ';

/// Glyph painted for barrier cells.
pub const GLYPH_BARRIER: char = '#';

/// Worm glyphs.
pub const GLYPH_WORM_HEAD: char = '0';
pub const GLYPH_WORM_INNER: char = 'o';
pub const GLYPH_WORM_TAIL: char = '`';

/// Default pause between two frames in milliseconds.
pub const DEFAULT_NAP_TIME_MS: u64 = 100;

/// Upper bound accepted for the frame delay.
pub const MAX_NAP_TIME_MS: u64 = 1_000;

/// Directory the built-in level list is resolved against.
pub const DEFAULT_LEVEL_DIR: &str = "levels";

/// Built-in level files, played in order.
pub const DEFAULT_LEVELS: &[&str] = &[
    "basic.level.1",
    "squaredance.level.2",
    "pirates-doom.level.3",
];

/// Rendering attribute attached to every painted cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ColorTag {
    UserWorm,
    FreeCell,
    Food1,
    Food2,
    Food3,
    Barrier,
}

impl ColorTag {
    /// Foreground color used by the terminal renderer.
    #[must_use]
    pub fn foreground(self) -> Color {
        match self {
            Self::UserWorm => Color::Green,
            Self::FreeCell => Color::Black,
            Self::Food1 => Color::Yellow,
            Self::Food2 => Color::Magenta,
            Self::Food3 => Color::Cyan,
            Self::Barrier => Color::Red,
        }
    }
}
