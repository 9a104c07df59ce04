use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

fn field_status(state: &AppState) -> Option<String> {
    let field = state.form.form.current()?;
    let st = &field.state;
    let mut out = format!("field: {}", st.field_name());
    if st.is_open() {
        let shown = st.view().rows.len();
        out.push_str(&format!(" (open, {shown} rows)"));
    }
    if let Some(v) = st.value() {
        out.push_str(&format!(" = {v}"));
    }
    Some(out)
}

/// Toast or focused-field status on the left, help text on the right when it fits.
pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState, help_text: &str) {
    let mut spans: Vec<Span> = Vec::new();
    if let Some(t) = &state.toast {
        let color = state.theme.toast_color(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[ERROR]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::styled(
            format!(" {tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(t.text.clone(), Style::default().fg(color)));
    } else if let Some(s) = field_status(state) {
        spans.push(Span::styled(
            format!(" {s}"),
            Style::default().fg(Color::Magenta),
        ));
    }

    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let help_w = help_text.chars().count();
    let width = area.width as usize;
    if used + help_w + 3 <= width {
        let pad = width - used - help_w - 1;
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(help_text.to_string(), state.theme.text_muted()));
    }
    let p = Paragraph::new(Line::from(spans));
    f.render_widget(p, area);
}
