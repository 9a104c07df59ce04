use crate::app::{RowView, TypeaheadView};
use crate::theme::Theme;
use crate::widgets::chrome::field_block;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const MENU_ROWS: u16 = 8;
pub const FIELD_HEIGHT: u16 = 3;

/// Screen areas of one field, recorded at draw time for pointer hit-testing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldHits {
    pub field: Rect,
    pub clear: Option<Rect>,
}

pub(crate) fn compute_scroll_window(total: usize, selected: usize, inner_h: u16) -> (usize, usize) {
    if inner_h == 0 || total == 0 {
        return (0, 0);
    }
    let sel = selected.min(total.saturating_sub(1));
    let ih = inner_h as usize;
    let start = sel.saturating_sub(ih - 1);
    let end = (start + ih).min(total);
    (start, end)
}

// `cursor` is the char index of the edit caret, drawn only while focused
pub fn draw_field(
    f: &mut Frame,
    area: Rect,
    caption: &str,
    view: &TypeaheadView,
    cursor: Option<usize>,
    theme: &Theme,
) -> FieldHits {
    let block = field_block(caption, view.has_focus, view.is_disabled, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut hits = FieldHits {
        field: area,
        clear: None,
    };
    let mut text_area = inner;
    if view.show_clear && inner.width > 2 {
        let clear = Rect::new(inner.right() - 1, inner.y, 1, inner.height.min(1));
        text_area.width -= 2;
        f.render_widget(Paragraph::new("×").style(theme.text_error()), clear);
        hits.clear = Some(clear);
    }

    let style = if view.is_disabled {
        theme.text_muted()
    } else if view.has_focus {
        theme.text_active_bold()
    } else {
        Style::default()
    };
    let mut shown = view.text.clone();
    if let Some(col) = cursor.filter(|_| view.has_focus) {
        let at = shown
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(shown.len());
        shown.insert(at, '▏');
    }
    let marker = if view.is_open { "▴" } else { "▾" };
    let line = Line::from(vec![
        Span::styled(shown, style),
        Span::raw(" "),
        Span::styled(marker, theme.text_muted()),
    ]);
    f.render_widget(Paragraph::new(line), text_area);
    hits
}

fn row_line<'a>(row: &'a RowView, theme: &Theme) -> Line<'a> {
    match row {
        RowView::Group { label, .. } => {
            Line::from(Span::styled(format!(" {label}"), theme.group_header_style()))
        }
        RowView::Option {
            label,
            group,
            highlighted,
            synthetic,
            ..
        } => {
            let indent = if group.is_some() { "   " } else { " " };
            let cur = if *highlighted { '›' } else { ' ' };
            let text = if *synthetic {
                format!("{indent}{cur} (+) {label}")
            } else {
                format!("{indent}{cur} {label}")
            };
            let style = if *highlighted {
                theme.list_cursor_style()
            } else if *synthetic {
                theme.create_style()
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style))
        }
    }
}

/// Popup under (or above) `anchor`, clipped to `bounds`. Returns the screen
/// row of each visible option with its value.
pub fn draw_menu(
    f: &mut Frame,
    anchor: Rect,
    bounds: Rect,
    view: &TypeaheadView,
    theme: &Theme,
) -> Vec<(Rect, String)> {
    if !view.is_open || (view.rows.is_empty() && view.no_options.is_none()) {
        return Vec::new();
    }
    let total = view.rows.len() + usize::from(view.no_options.is_some());
    let want = total.min(MENU_ROWS as usize) as u16 + 2;
    let below = bounds.bottom().saturating_sub(anchor.bottom());
    let above = anchor.y.saturating_sub(bounds.y);
    let (y, h) = if below >= want || below >= above {
        (anchor.bottom(), want.min(below))
    } else {
        let h = want.min(above);
        (anchor.y - h, h)
    };
    if h < 3 {
        return Vec::new();
    }
    let area = Rect::new(anchor.x, y, anchor.width, h);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let selected = view
        .rows
        .iter()
        .position(|r| matches!(r, RowView::Option { highlighted: true, .. }))
        .unwrap_or(0);
    let (start, end) = compute_scroll_window(view.rows.len(), selected, inner.height);
    let mut lines: Vec<Line> = Vec::new();
    let mut hits = Vec::new();
    for (i, row) in view.rows.iter().enumerate().take(end).skip(start) {
        if let RowView::Option { value, .. } = row {
            let r = Rect::new(inner.x, inner.y + (i - start) as u16, inner.width, 1);
            hits.push((r, value.clone()));
        }
        lines.push(row_line(row, theme));
    }
    if let Some(q) = &view.no_options {
        if (lines.len() as u16) < inner.height {
            lines.push(Line::from(vec![
                Span::styled(" No options found for ", theme.text_muted()),
                Span::styled(format!("\"{q}\""), theme.text_error()),
            ]));
        }
    }
    f.render_widget(Paragraph::new(lines), inner);
    hits
}
