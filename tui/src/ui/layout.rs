use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{
    render_add_button, render_delete_confirmation, render_grid, render_header, render_help_screen,
    render_note_dialog, render_status_bar, render_trash,
};

/// Gap between cards, horizontally and vertically
const CARD_SPACING: u16 = 1;
const TRASH_WIDTH: u16 = 18;

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &mut App) {
    app.sync_cells();
    let size = frame.size();

    // Header, grid, bin row, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_grid(frame, app, chunks[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(TRASH_WIDTH)])
        .split(chunks[2]);
    render_add_button(frame, app, bottom[0]);
    render_trash(frame, app, bottom[1]);

    render_status_bar(frame, app, chunks[3]);

    // Overlays (drawn last)
    if app.dialog.is_some() {
        render_note_dialog(frame, app, size);
    }
    if app.pending_delete.is_some() {
        render_delete_confirmation(frame, app, size);
    }
    if app.help_open {
        render_help_screen(frame, app, size);
    }
}

/// Lay out `count` cards in `area`, starting at grid row `scroll_row`.
/// Cards that would not fit entirely are left out.
pub fn grid_cells(
    area: Rect,
    columns: u16,
    card_height: u16,
    count: usize,
    scroll_row: usize,
) -> Vec<(Rect, usize)> {
    let columns = columns.max(1);
    let card_height = card_height.max(3);
    let spacing_total = CARD_SPACING.saturating_mul(columns.saturating_add(1));
    let card_width = area.width.saturating_sub(spacing_total) / columns;
    if card_width == 0 {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let first = scroll_row.saturating_mul(columns as usize);
    let bottom = area.y.saturating_add(area.height);
    for position in first..count {
        let index = position - first;
        let Ok(row) = u16::try_from(index / columns as usize) else { break };
        let col = (index % columns as usize) as u16;

        let y = area
            .y
            .saturating_add(CARD_SPACING)
            .saturating_add(row.saturating_mul(card_height.saturating_add(CARD_SPACING)));
        if y.saturating_add(card_height) > bottom {
            break;
        }
        let x = area.x + CARD_SPACING + col * (card_width + CARD_SPACING);
        cells.push((Rect::new(x, y, card_width, card_height), position));
    }
    cells
}

/// Grid rows that fit in a viewport of `height`
pub fn visible_rows(height: u16, card_height: u16) -> usize {
    let card_height = card_height.max(3);
    (height.saturating_sub(CARD_SPACING) / card_height.saturating_add(CARD_SPACING)).max(1) as usize
}

/// First grid row to draw so that `selected` stays on screen
pub fn scroll_to_selected(selected: usize, columns: u16, rows_visible: usize, scroll_row: usize) -> usize {
    let row = selected / columns.max(1) as usize;
    let rows_visible = rows_visible.max(1);
    if row < scroll_row {
        row
    } else if row >= scroll_row + rows_visible {
        row + 1 - rows_visible
    } else {
        scroll_row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_column_grid() {
        let area = Rect::new(0, 3, 41, 20);
        let cells = grid_cells(area, 2, 6, 5, 0);

        // 20 rows fit two rows of 6-high cards with spacing
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], (Rect::new(1, 4, 19, 6), 0));
        assert_eq!(cells[1], (Rect::new(21, 4, 19, 6), 1));
        assert_eq!(cells[2], (Rect::new(1, 11, 19, 6), 2));
        assert_eq!(cells[3].1, 3);
    }

    #[test]
    fn test_grid_scrolled() {
        let area = Rect::new(0, 0, 41, 20);
        let cells = grid_cells(area, 2, 6, 5, 1);
        assert_eq!(cells[0].1, 2);
        assert_eq!(cells.last().unwrap().1, 4);
    }

    #[test]
    fn test_grid_too_narrow() {
        assert!(grid_cells(Rect::new(0, 0, 2, 20), 2, 6, 3, 0).is_empty());
    }

    #[test]
    fn test_scroll_follows_selection() {
        assert_eq!(scroll_to_selected(0, 2, 2, 0), 0);
        assert_eq!(scroll_to_selected(5, 2, 2, 0), 1);
        assert_eq!(scroll_to_selected(1, 2, 2, 1), 0);
        assert_eq!(scroll_to_selected(3, 2, 2, 1), 1);
    }

    #[test]
    fn test_visible_rows() {
        assert_eq!(visible_rows(20, 6), 2);
        assert_eq!(visible_rows(2, 6), 1);
    }

    #[test]
    fn test_extreme_grid_settings_do_not_overflow() {
        assert_eq!(visible_rows(20, u16::MAX), 1);
        assert!(grid_cells(Rect::new(0, 0, 80, 20), u16::MAX, 6, 3, 0).is_empty());
        assert!(grid_cells(Rect::new(0, 0, 80, 20), 2, u16::MAX, 3, 0).is_empty());
    }
}
