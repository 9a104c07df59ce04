use crate::app::{mount, update, Effect, Key, TypeaheadMsg, TypeaheadState};
use crate::theme::Theme;
use crate::typeahead::TypeaheadProps;
use crate::widgets::chrome::panel_block;
use crate::widgets::typeahead::{draw_field, draw_menu, FIELD_HEIGHT};
use anyhow::{Context, Result};
use ratatui::prelude::*;
use std::collections::{BTreeMap, VecDeque};

#[derive(Clone, Debug)]
pub struct FormField {
    pub caption: String,
    pub state: TypeaheadState,
}

/// What sits under a screen cell, topmost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    Field(usize),
    Option(usize, String),
    Clear(usize),
}

#[derive(Clone, Debug, Default)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<FormField>,
    pub selected: usize,
    // Host-side copy of every field value, kept current from notifications
    pub values: BTreeMap<String, Option<String>>,
    pub log: Vec<Effect>,
    pub hits: Vec<(Rect, Hit)>,
}

fn contains(r: &Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.right() && row >= r.y && row < r.bottom()
}

impl FormState {
    /// Mounts every field. Auto-selection can notify right away, so the
    /// mount notifications are returned alongside.
    pub fn new(title: impl Into<String>, fields: Vec<(String, TypeaheadProps)>) -> (Self, Vec<Effect>) {
        let mut form = FormState {
            title: title.into(),
            ..Default::default()
        };
        let mut effects = Vec::new();
        for (caption, props) in fields {
            form.values.insert(props.field_name.clone(), props.value.clone());
            let (state, mounted) = mount(props);
            form.fields.push(FormField { caption, state });
            let idx = form.fields.len() - 1;
            effects.extend(form.absorb(idx, mounted));
        }
        form.selected = form.step_enabled(form.fields.len().saturating_sub(1), true).unwrap_or(0);
        (form, effects)
    }

    pub fn current(&self) -> Option<&FormField> {
        self.fields.get(self.selected)
    }

    fn is_enabled(&self, idx: usize) -> bool {
        self.fields
            .get(idx)
            .is_some_and(|f| !f.state.props().is_disabled)
    }

    fn current_has_focus(&self) -> bool {
        self.current().is_some_and(|f| f.state.has_focus())
    }

    // Next enabled field after `from`, wrapping; may return `from` itself
    fn step_enabled(&self, from: usize, forward: bool) -> Option<usize> {
        let n = self.fields.len();
        (1..=n)
            .map(|k| if forward { (from + k) % n } else { (from + n - k % n) % n })
            .find(|i| self.is_enabled(*i))
    }

    pub fn dispatch(&mut self, idx: usize, msg: TypeaheadMsg) -> Vec<Effect> {
        let Some(field) = self.fields.get_mut(idx) else {
            return Vec::new();
        };
        let effects = update(&mut field.state, msg);
        self.absorb(idx, effects)
    }

    // Records notifications and feeds every committed value back as the
    // `value` prop, the way a controlled host re-renders.
    fn absorb(&mut self, idx: usize, effects: Vec<Effect>) -> Vec<Effect> {
        let mut out = Vec::new();
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(e) = queue.pop_front() {
            if let Effect::Change { field_name, value } = &e {
                self.values.insert(field_name.clone(), value.clone());
                if let Some(field) = self.fields.get_mut(idx) {
                    let mut props = field.state.props().clone();
                    props.value = value.clone();
                    queue.extend(update(&mut field.state, TypeaheadMsg::SetProps(props)));
                }
            }
            self.log.push(e.clone());
            out.push(e);
        }
        out
    }

    pub fn focus_current(&mut self) -> Vec<Effect> {
        if !self.is_enabled(self.selected) || self.current_has_focus() {
            return Vec::new();
        }
        self.dispatch(self.selected, TypeaheadMsg::Focus)
    }

    pub fn key(&mut self, key: Key) -> Vec<Effect> {
        let mut out = self.focus_current();
        out.extend(self.dispatch(self.selected, TypeaheadMsg::KeyDown(key)));
        out
    }

    /// Full text of the selected field after an edit.
    pub fn edit(&mut self, text: String) -> Vec<Effect> {
        let mut out = self.focus_current();
        out.extend(self.dispatch(self.selected, TypeaheadMsg::Change(text)));
        out
    }

    pub fn clear(&mut self) -> Vec<Effect> {
        self.dispatch(self.selected, TypeaheadMsg::ClearClick)
    }

    // Focus loss without Tab (Esc, click elsewhere)
    pub fn blur(&mut self) -> Vec<Effect> {
        if !self.current_has_focus() {
            return Vec::new();
        }
        self.dispatch(self.selected, TypeaheadMsg::Blur)
    }

    /// Tab / BackTab: the field sees Tab then loses focus, then the next
    /// enabled field gains it.
    pub fn move_focus(&mut self, forward: bool) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.current_has_focus() {
            out.extend(self.dispatch(self.selected, TypeaheadMsg::KeyDown(Key::Tab)));
            out.extend(self.dispatch(self.selected, TypeaheadMsg::Blur));
        }
        if let Some(next) = self.step_enabled(self.selected, forward) {
            self.selected = next;
            out.extend(self.dispatch(next, TypeaheadMsg::Focus));
        }
        out
    }

    pub fn hit_test(&self, col: u16, row: u16) -> Option<Hit> {
        self.hits
            .iter()
            .rev()
            .find(|(r, _)| contains(r, col, row))
            .map(|(_, h)| h.clone())
    }

    pub fn pointer_down(&mut self, col: u16, row: u16) -> Vec<Effect> {
        match self.hit_test(col, row) {
            Some(Hit::Option(i, value)) => self.dispatch(i, TypeaheadMsg::PointerDownOption(value)),
            Some(Hit::Clear(i)) => self.dispatch(i, TypeaheadMsg::ClearClick),
            Some(Hit::Field(i)) => {
                if !self.is_enabled(i) {
                    return Vec::new();
                }
                let mut out = Vec::new();
                if i != self.selected {
                    out.extend(self.blur());
                    self.selected = i;
                }
                out.extend(self.focus_current());
                out.extend(self.dispatch(i, TypeaheadMsg::PointerDownField));
                out
            }
            None => self.blur(),
        }
    }

    pub fn values_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.values).context("serializing form values")
    }

    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "selected": self.current().map(|f| f.state.field_name()),
            "values": self.values,
            "notifications": self.log,
        })
    }
}

pub fn draw_form(
    f: &mut Frame,
    area: Rect,
    form: &mut FormState,
    highlight: bool,
    cursor: Option<usize>,
    theme: &Theme,
) {
    let block = panel_block(&form.title, highlight, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);
    form.hits.clear();

    let mut open: Option<(usize, Rect)> = None;
    let mut y = inner.y;
    for (i, fld) in form.fields.iter().enumerate() {
        if y + FIELD_HEIGHT > inner.bottom() {
            break;
        }
        let rect = Rect::new(inner.x, y, inner.width, FIELD_HEIGHT);
        y += FIELD_HEIGHT;
        let view = fld.state.view();
        let caret = if i == form.selected { cursor } else { None };
        let hits = draw_field(f, rect, &fld.caption, &view, caret, theme);
        form.hits.push((hits.field, Hit::Field(i)));
        if let Some(c) = hits.clear {
            form.hits.push((c, Hit::Clear(i)));
        }
        if view.is_open {
            open = Some((i, rect));
        }
    }
    // Popup last so it overlays the fields below it
    if let Some((i, anchor)) = open {
        let view = form.fields[i].state.view();
        for (r, value) in draw_menu(f, anchor, inner, &view, theme) {
            form.hits.push((r, Hit::Option(i, value)));
        }
    }
}
