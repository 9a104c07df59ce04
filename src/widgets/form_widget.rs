use crate::app::Effect;
use crate::nav::keys::{EditOp, FormCommand};
use crate::theme::Theme;
use crate::widgets::form::{draw_form, FormState};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::crossterm::event as rt_event;
use ratatui::prelude::*;
use tui_textarea::TextArea;

pub struct FormWidget {
    pub form: FormState,
    // Single-line edit buffer of the selected field
    ta: TextArea<'static>,
    // Field the buffer was built for
    buffer_field: usize,
    theme: Theme,
}

fn buffer_for(text: &str) -> TextArea<'static> {
    let mut ta = TextArea::default();
    if !text.is_empty() {
        ta.insert_str(text);
    }
    ta
}

impl FormWidget {
    pub fn new(form: FormState) -> Self {
        let text = form
            .current()
            .map(|f| f.state.typed_label().to_string())
            .unwrap_or_default();
        Self {
            buffer_field: form.selected,
            form,
            ta: buffer_for(&text),
            theme: Theme::default(),
        }
    }

    fn field_text(&self) -> String {
        self.form
            .current()
            .map(|f| f.state.typed_label().to_string())
            .unwrap_or_default()
    }

    fn buffer_text(&self) -> String {
        self.ta.lines().first().cloned().unwrap_or_default()
    }

    // Commits, reverts, prop updates and focus moves change the text behind
    // the buffer's back; rebuild it with the caret at the end when that happened.
    fn sync_buffer(&mut self) {
        let text = self.field_text();
        if self.buffer_field != self.form.selected || self.buffer_text() != text {
            self.ta = buffer_for(&text);
            self.buffer_field = self.form.selected;
        }
    }

    pub fn cursor_col(&self) -> usize {
        self.ta.cursor().1
    }

    fn edit(&mut self, op: EditOp) -> Vec<Effect> {
        self.sync_buffer();
        let before = self.buffer_text();
        let code = match op {
            EditOp::Insert(c) => rt_event::KeyCode::Char(c),
            EditOp::Backspace => rt_event::KeyCode::Backspace,
            EditOp::Delete => rt_event::KeyCode::Delete,
            EditOp::Left => rt_event::KeyCode::Left,
            EditOp::Right => rt_event::KeyCode::Right,
            EditOp::Home => rt_event::KeyCode::Home,
            EditOp::End => rt_event::KeyCode::End,
        };
        let _ = self
            .ta
            .input(rt_event::KeyEvent::new(code, rt_event::KeyModifiers::NONE));
        let after = self.buffer_text();
        if after == before {
            // Caret movement only
            return Vec::new();
        }
        self.form.edit(after)
    }

    pub fn apply(&mut self, cmd: FormCommand) -> Vec<Effect> {
        let effects = match cmd {
            FormCommand::Field(key) => self.form.key(key),
            FormCommand::Next => self.form.move_focus(true),
            FormCommand::Prev => self.form.move_focus(false),
            FormCommand::Blur => self.form.blur(),
            FormCommand::Edit(op) => self.edit(op),
            FormCommand::Clear => self.form.clear(),
            // Handled by the app loop
            FormCommand::CopyYaml | FormCommand::Quit => Vec::new(),
        };
        self.sync_buffer();
        effects
    }
}

impl crate::widgets::Widget for FormWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64) {
        self.sync_buffer();
        let cursor = (tick % 2 == 0).then(|| self.cursor_col());
        draw_form(f, area, &mut self.form, focused, cursor, &self.theme);
    }

    fn on_command(&mut self, cmd: FormCommand) -> Vec<Effect> {
        self.apply(cmd)
    }

    fn on_mouse(&mut self, ev: MouseEvent) -> Vec<Effect> {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let effects = self.form.pointer_down(ev.column, ev.row);
                self.sync_buffer();
                effects
            }
            _ => Vec::new(),
        }
    }
}
