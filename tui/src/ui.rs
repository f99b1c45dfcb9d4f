mod layout;
mod widgets;

pub use layout::{grid_cells, render, scroll_to_selected, visible_rows};
pub use widgets::{
    render_add_button,
    render_delete_confirmation,
    render_grid,
    render_header,
    render_help_screen,
    render_note_dialog,
    render_status_bar,
    render_trash,
};
