use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;

use crate::board::CellChange;
use crate::config::{ColorTag, GLYPH_BARRIER, GridSize, ROWS_RESERVED};
use crate::error::WormError;
use crate::game::{StatusInfo, Surface};
use crate::input::wait_for_key_press;
use crate::terminal_runtime::TerminalSession;
use crate::ui::dialog::render_dialog;
use crate::ui::status::render_status;

/// Glyph and color last painted into one board cell.
type Painted = Option<(char, ColorTag)>;

/// Screen copy of the board, updated from [`CellChange`] lists.
///
/// ratatui redraws whole frames, so the painted cells are kept here and
/// replayed on every refresh.
#[derive(Debug, Clone, Default)]
pub struct CellMirror {
    size: GridSize,
    cells: Vec<Painted>,
}

impl CellMirror {
    /// Clears the mirror and sizes it for a board of `size`.
    pub fn reset(&mut self, size: GridSize) {
        self.size = size;
        self.cells.clear();
        self.cells.resize(size.total_cells(), None);
    }

    /// Records the glyphs of `changes`; positions outside the mirror are skipped.
    pub fn apply(&mut self, changes: &[CellChange]) {
        for change in changes {
            if !change.position.is_within_bounds(self.size) {
                continue;
            }
            let index = change.position.y as usize * usize::from(self.size.width)
                + change.position.x as usize;
            self.cells[index] = Some((change.glyph, change.color));
        }
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Painted {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.cells[usize::from(y) * usize::from(self.size.width) + usize::from(x)]
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }
}

/// [`Surface`] drawing into the terminal through ratatui.
pub struct TerminalSurface {
    session: TerminalSession,
    mirror: CellMirror,
    status: Option<StatusInfo>,
}

impl TerminalSurface {
    #[must_use]
    pub fn new(session: TerminalSession) -> Self {
        Self {
            session,
            mirror: CellMirror::default(),
            status: None,
        }
    }

    fn draw(&mut self, dialog: Option<(&str, &str)>) -> Result<(), WormError> {
        let Self {
            session,
            mirror,
            status,
        } = self;

        session.terminal_mut().draw(|frame| {
            let area = render_frame(frame, mirror, status.as_ref());
            if let Some((message, prompt)) = dialog {
                render_dialog(frame, area, message, prompt);
            }
        })?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn viewport(&mut self) -> Result<GridSize, WormError> {
        let viewport = self.session.viewport()?;
        let board = GridSize {
            width: viewport.width,
            height: viewport.height.saturating_sub(ROWS_RESERVED),
        };
        if board != self.mirror.size() {
            self.mirror.reset(board);
        }
        Ok(viewport)
    }

    fn draw_cells(&mut self, changes: &[CellChange]) {
        self.mirror.apply(changes);
    }

    fn draw_status(&mut self, status: &StatusInfo) {
        self.status = Some(status.clone());
    }

    fn refresh(&mut self) -> Result<(), WormError> {
        self.draw(None)
    }

    fn show_dialog(&mut self, message: &str, prompt: &str) -> Result<(), WormError> {
        self.draw(Some((message, prompt)))?;
        wait_for_key_press()?;
        Ok(())
    }
}

/// Renders board, separator line and status area; returns the full area.
fn render_frame(frame: &mut Frame<'_>, mirror: &CellMirror, status: Option<&StatusInfo>) -> Rect {
    let area = frame.area();
    let [board_area, separator_area, status_area] = Layout::vertical([
        Constraint::Length(mirror.size().height),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_board(frame, board_area, mirror);
    render_separator(frame, separator_area);
    if let Some(status) = status {
        render_status(frame, status_area, status);
    }

    area
}

fn render_board(frame: &mut Frame<'_>, area: Rect, mirror: &CellMirror) {
    let buffer = frame.buffer_mut();
    for y in 0..area.height {
        for x in 0..area.width {
            let Some((glyph, color)) = mirror.get(x, y) else {
                continue;
            };
            buffer.set_string(
                area.x + x,
                area.y + y,
                glyph.to_string(),
                Style::new().fg(color.foreground()),
            );
        }
    }
}

fn render_separator(frame: &mut Frame<'_>, area: Rect) {
    let line = GLYPH_BARRIER.to_string().repeat(usize::from(area.width));
    frame.buffer_mut().set_string(
        area.x,
        area.y,
        line,
        Style::new().fg(ColorTag::Barrier.foreground()),
    );
}
