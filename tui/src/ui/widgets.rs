use crate::app::{App, CONFIRM_DELETE_MESSAGE};
use crate::dialog::DialogField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{grid_cells, scroll_to_selected, visible_rows};

/// Render the header with title and key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let key_hints = if app.dialog.is_some() {
        " [Tab:Switch field] [Ctrl+S:Submit] [Esc:Cancel] "
    } else if app.pending_delete.is_some() {
        " [y:Yes] [n:No] "
    } else if app.drag.is_some() {
        " [b/→:Over bin] [←:Leave bin] [Enter:Drop] [Esc:Cancel] "
    } else {
        " [q:Quit] [?:Help] [←↑↓→:Move] [Enter:Edit] [a:Add] [Space:Pick up] "
    };

    let header_spans = vec![
        Span::styled(
            " 📝 Notes ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(key_hints, Style::default().fg(Color::DarkGray)),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Render the notes grid from the bound cells and record hit areas
pub fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    app.cell_areas.clear();

    if app.cells.cells().is_empty() {
        let message = if app.load_error.is_some() {
            "Notes could not be loaded."
        } else {
            "No notes yet. Press 'a' to add one."
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let grid = &app.config.grid;
    let rows = visible_rows(area.height, grid.card_height);
    app.scroll_row = scroll_to_selected(app.selected, grid.columns, rows, app.scroll_row);
    let cells = grid_cells(area, grid.columns, grid.card_height, app.cells.cells().len(), app.scroll_row);

    let dragged_id = app.drag.as_ref().and_then(|d| d.payload.note_id());
    for (rect, position) in &cells {
        let cell = &app.cells.cells()[*position];
        let is_selected = *position == app.selected;
        let is_dragged = dragged_id == Some(cell.id);

        let border_style = if is_dragged {
            Style::default().fg(Color::Magenta)
        } else if is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if is_dragged { BorderType::Double } else { BorderType::Rounded })
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ", cell.title),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        let body = Paragraph::new(cell.body.as_str())
            .block(block)
            .style(if is_dragged {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            })
            .wrap(Wrap { trim: true });

        frame.render_widget(body, *rect);
    }

    app.cell_areas = cells;
}

/// Render the "add" button
pub fn render_add_button(frame: &mut Frame, app: &mut App, area: Rect) {
    let label = " + Add note ";
    let button_area = Rect::new(
        area.x + 1,
        area.y,
        (label.width() as u16 + 2).min(area.width.saturating_sub(1)),
        area.height,
    );

    let button = Paragraph::new(label)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);

    frame.render_widget(button, button_area);
    app.add_button_area = button_area;
}

/// Render the trash bin drop target
pub fn render_trash(frame: &mut Frame, app: &mut App, area: Rect) {
    let icon = if app.trash.is_full { "🗑  Bin (full)" } else { "🗑  Bin" };

    let style = if app.trash.hovered {
        Style::default().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD)
    } else if app.drag.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let bin = Paragraph::new(icon)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
        .style(style)
        .alignment(Alignment::Center);

    frame.render_widget(bin, area);
    app.trash_area = area;
    app.trash.dirty = false;
}

/// Render the status bar at the bottom; a toast replaces it while shown
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (status_text, style) = if let Some(toast) = &app.toast {
        (
            format!(" {} ", toast.message),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        )
    } else if let Some(err) = &app.load_error {
        (
            format!(" {} ", err),
            Style::default().bg(Color::Red).fg(Color::White),
        )
    } else {
        (
            format!(" {} notes ", app.notes.len()),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )
    };

    let status_bar = Paragraph::new(status_text)
        .style(style)
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the add/edit dialog
pub fn render_note_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = &app.dialog else { return };

    let popup_width = 60.min(area.width);
    let popup_height = 12.min(area.height);
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(dialog.heading())
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let inner = Rect {
        x: popup_area.x + 1,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(2),
        height: popup_area.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Button
        ])
        .split(inner);

    let field_style = |field: DialogField| {
        if dialog.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let title = Paragraph::new(dialog.title.as_str())
        .block(Block::default().borders(Borders::ALL).title(" Title ").border_style(field_style(DialogField::Title)))
        .style(Style::default().fg(Color::White));
    frame.render_widget(title, chunks[0]);

    let body = Paragraph::new(dialog.body.as_str())
        .block(Block::default().borders(Borders::ALL).title(" Note ").border_style(field_style(DialogField::Body)))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[1]);

    let button = Paragraph::new(format!("[ {} ]", dialog.submit_label()))
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Right);
    frame.render_widget(button, chunks[2]);

    // Cursor sits on the first line of the focused field
    let field_area = match dialog.focus {
        DialogField::Title => chunks[0],
        DialogField::Body => chunks[1],
    };
    let text = dialog.focused_text();
    let byte_pos = text.char_indices().map(|(i, _)| i).nth(dialog.cursor).unwrap_or(text.len());
    let cursor_x = field_area.x + 1 + text[..byte_pos].width() as u16;
    frame.set_cursor(
        cursor_x.min(field_area.x + field_area.width.saturating_sub(2)),
        field_area.y + 1,
    );
}

/// Render the yes/no delete confirmation
pub fn render_delete_confirmation(frame: &mut Frame, _app: &App, area: Rect) {
    let popup_width = 60.min(area.width);
    let popup_height = 5.min(area.height);

    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let text = format!("{} (y/n)", CONFIRM_DELETE_MESSAGE);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Confirm Deletion")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area); // This clears the area behind the popup
    frame.render_widget(paragraph, popup_area);
}

/// Render the help screen overlay
pub fn render_help_screen(frame: &mut Frame, app: &App, size: Rect) {
    let k = &app.config.keymap;
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &str, what: &str| Line::from(format!("{:<13}{}", key, what));

    let help_text = vec![
        Line::from(""),
        heading("Grid"),
        entry("Arrows", "Move selection"),
        entry(&k.edit_note, "Edit selected note"),
        entry(&k.add_note, "Add a note"),
        entry("Click", "Edit note"),
        Line::from(""),
        heading("Deleting"),
        entry(&k.pick_up, "Pick up selected note"),
        entry(&k.hover_bin, "Move it over the bin"),
        entry(&k.leave_bin, "Move it off the bin"),
        entry(&k.drop, "Drop"),
        entry(&k.cancel, "Cancel drag"),
        entry("Mouse drag", "Drag a card onto the bin"),
        Line::from(""),
        heading("Dialog"),
        entry(&k.switch_field, "Switch between title and note"),
        entry(&k.submit, "Add / Save"),
        entry(&k.cancel, "Close without saving"),
        Line::from(""),
        heading("Interface"),
        entry(&k.help, "Show this help"),
        entry(&k.quit, "Quit application"),
        Line::from(""),
        Line::from(Span::styled("Press '?' or 'Esc' to close", Style::default().fg(Color::DarkGray))),
    ];

    let popup_width = 60.min(size.width);
    let popup_height = (help_text.len() as u16 + 2).min(size.height);
    let x = (size.width.saturating_sub(popup_width)) / 2;
    let y = (size.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let inner = Rect {
        x: popup_area.x + 1,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(2),
        height: popup_area.height.saturating_sub(2),
    };

    let paragraph = Paragraph::new(help_text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ui::render;
    use dragnotes_core::models::NewNote;
    use dragnotes_core::storage::SqliteNoteStore;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::tempdir;

    fn app_with_notes(dir: &tempfile::TempDir, titles: &[&str]) -> App {
        let store = SqliteNoteStore::open(dir.path().join("notes.db")).unwrap();
        let mut app = App::new(Box::new(store), Config::default()).unwrap();
        for title in titles {
            app.add_note(&NewNote::new(title.to_string(), "body".to_string()));
        }
        app
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_render_records_hit_areas() {
        let dir = tempdir().unwrap();
        let mut app = app_with_notes(&dir, &["Groceries", "Ideas", "Errands"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();

        assert_eq!(app.cell_areas.len(), 3);
        assert_eq!(app.trash_area.height, 3);
        assert!(app.add_button_area.width > 0);
        let text = buffer_text(&terminal);
        assert!(text.contains("Groceries"));
        assert!(text.contains("Bin"));
    }

    #[test]
    fn test_render_edit_only_after_invalidation() {
        let dir = tempdir().unwrap();
        let mut app = app_with_notes(&dir, &["Before"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let id = app.notes[0].id;
        app.edit_note(id, "After", "body");
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("After"));
        assert!(!text.contains("Before"));
    }

    #[test]
    fn test_render_dialog_and_confirmation() {
        let dir = tempdir().unwrap();
        let mut app = app_with_notes(&dir, &["Groceries"]);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        app.open_add_dialog();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Add a new note"));

        app.close_dialog();
        app.pending_delete = Some(app.notes[0].id);
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Confirm Deletion"));
    }

    #[test]
    fn test_render_empty_grid() {
        let dir = tempdir().unwrap();
        let mut app = app_with_notes(&dir, &[]);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(app.cell_areas.is_empty());
        assert!(buffer_text(&terminal).contains("No notes yet"));
    }
}
