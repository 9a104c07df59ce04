use crate::theme::Theme;
use ratatui::widgets::{Block, Borders};

pub fn panel_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let mut b = Block::default().borders(Borders::ALL).title(title);
    if focused {
        b = b.border_style(theme.border_focused());
    }
    b
}

/// Field frame: focused, idle, or dimmed when the field is disabled.
pub fn field_block<'a>(title: &'a str, focused: bool, disabled: bool, theme: &Theme) -> Block<'a> {
    let b = Block::default().borders(Borders::ALL).title(title);
    if disabled {
        b.border_style(theme.text_muted()).title_style(theme.text_muted())
    } else if focused {
        b.border_style(theme.border_focused())
    } else {
        b.border_style(theme.border_unfocused())
    }
}
