use crate::typeahead::commit::{self, CommitContext, Resolution, Trigger};
use crate::typeahead::cursor::{self, Direction};
use crate::typeahead::filter::{flatten_options, FilterFlags, FlatRow, Filtered};
use crate::typeahead::index;
use crate::typeahead::{Display, TypeaheadProps};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Tab,
}

#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum TypeaheadMsg {
    Focus,
    Blur,
    KeyDown(Key),
    // Full field text after an edit
    Change(String),
    PointerDownField,
    PointerDownOption(String),
    ClearClick,
    SetProps(TypeaheadProps),
}

/// Notifications for the host, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Change {
        field_name: String,
        value: Option<String>,
    },
    Blur {
        field_name: String,
        value: Option<String>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct TypeaheadState {
    props: TypeaheadProps,
    is_open: bool,
    has_focus: bool,
    committed: Option<String>,
    display: Display,
    highlighted: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowView {
    Group {
        value: String,
        label: String,
    },
    Option {
        value: String,
        label: String,
        group: Option<String>,
        highlighted: bool,
        synthetic: bool,
    },
}

/// Everything the presentation layer needs to draw one field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeaheadView {
    pub text: String,
    pub is_disabled: bool,
    pub is_open: bool,
    pub has_focus: bool,
    pub show_clear: bool,
    pub rows: Vec<RowView>,
    // Query text echoed by the "no matching options" indicator
    pub no_options: Option<String>,
}

/// Build the state for freshly supplied props. Auto-selection may already
/// produce a `Change`, so the effects are handed back with the state.
pub fn mount(props: TypeaheadProps) -> (TypeaheadState, Vec<Effect>) {
    if let Some(dup) = index::duplicate_value(&props.options) {
        tracing::warn!(field = %props.field_name, value = dup, "duplicate option value, first match wins");
    }
    let mut state = TypeaheadState {
        committed: props.value.clone(),
        props,
        ..Default::default()
    };
    let mut effects = Vec::new();
    state.reconcile(true, &mut effects);
    (state, effects)
}

impl TypeaheadState {
    pub fn props(&self) -> &TypeaheadProps {
        &self.props
    }

    pub fn field_name(&self) -> &str {
        &self.props.field_name
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn value(&self) -> Option<&str> {
        self.committed.as_deref()
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn typed_label(&self) -> &str {
        self.display.text()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    fn flags(&self) -> FilterFlags {
        FilterFlags {
            render_empty_groups: self.props.render_empty_groups,
            allow_unknown_value: self.props.allow_unknown_value,
        }
    }

    pub fn filtered(&self) -> Filtered {
        flatten_options(
            &self.props.options,
            self.props.groups.as_deref(),
            self.display.query(),
            self.flags(),
        )
    }

    pub fn view(&self) -> TypeaheadView {
        let mut view = TypeaheadView {
            text: self.display.text().to_string(),
            is_disabled: self.props.is_disabled,
            is_open: self.is_open,
            has_focus: self.has_focus,
            show_clear: self.props.is_clearable && !self.props.is_disabled,
            ..Default::default()
        };
        if !self.is_open {
            return view;
        }
        let filtered = self.filtered();
        view.rows = filtered
            .rows
            .into_iter()
            .map(|row| match row {
                FlatRow::Group(g) => RowView::Group {
                    value: g.value,
                    label: g.label,
                },
                FlatRow::Option {
                    option,
                    group,
                    synthetic,
                } => RowView::Option {
                    highlighted: self.highlighted.as_deref() == Some(option.value.as_str()),
                    value: option.value,
                    label: option.label,
                    group,
                    synthetic,
                },
            })
            .collect();
        if !filtered.has_matches && !self.props.allow_unknown_value {
            view.no_options = Some(self.display.query().to_string());
        }
        view
    }

    // ===== DERIVATIONS =====

    fn resolved_display(&self) -> Display {
        let Some(value) = &self.committed else {
            return Display::Committed(String::new());
        };
        match index::label_for(&self.props.options, value) {
            Some(label) => Display::Committed(label.to_string()),
            None if self.props.allow_unknown_value => Display::Unmatched(value.clone()),
            None => Display::Committed(String::new()),
        }
    }

    fn committed_if_visible(&self, filtered: &Filtered) -> Option<String> {
        self.committed.clone().filter(|v| filtered.contains(v))
    }

    // Keep the highlight while its row is visible, otherwise fall back to the
    // first visible option.
    fn retarget_highlight(&mut self) {
        if self.display.query().is_empty() && self.display.is_typing() {
            self.highlighted = None;
            return;
        }
        let filtered = self.filtered();
        let keep = self.highlighted.as_deref().is_some_and(|h| filtered.contains(h));
        if !keep {
            self.highlighted = filtered.values().first().map(|v| v.to_string());
        }
    }

    fn move_highlight(&mut self, direction: Direction) {
        let filtered = self.filtered();
        self.highlighted = cursor::next(direction, &filtered.values(), self.highlighted.as_deref());
    }

    fn open(&mut self) {
        if self.is_open {
            return;
        }
        self.is_open = true;
        let filtered = self.filtered();
        self.highlighted = self.committed_if_visible(&filtered);
        tracing::debug!(field = %self.props.field_name, highlighted = ?self.highlighted, "menu opened");
    }

    fn close(&mut self) {
        self.is_open = false;
    }

    // ===== COMMITS =====

    fn resolve(&self, trigger: Trigger<'_>) -> Resolution {
        let filtered = self.filtered();
        let ctx = CommitContext {
            display: &self.display,
            highlighted: self.highlighted.as_deref(),
            filtered: &filtered,
            options: &self.props.options,
            is_clearable: self.props.is_clearable,
            allow_unknown_value: self.props.allow_unknown_value,
        };
        commit::resolve(trigger, &ctx)
    }

    fn apply(&mut self, trigger: Trigger<'_>, resolution: Resolution, effects: &mut Vec<Effect>) {
        match resolution {
            Resolution::Commit(value) => self.commit(trigger, value, effects),
            Resolution::Revert => {
                self.display = self.resolved_display();
                self.highlighted = self.committed.clone();
            }
            Resolution::Retain => {}
        }
    }

    fn commit(&mut self, trigger: Trigger<'_>, value: Option<String>, effects: &mut Vec<Effect>) {
        let notify = commit::should_notify(trigger, self.committed.as_deref(), value.as_deref());
        self.committed = value;
        self.display = self.resolved_display();
        self.highlighted = self.committed.clone();
        if notify {
            tracing::debug!(field = %self.props.field_name, value = ?self.committed, ?trigger, "value committed");
            effects.push(Effect::Change {
                field_name: self.props.field_name.clone(),
                value: self.committed.clone(),
            });
        }
    }

    // Runs at mount and after every prop update. Auto-selection is only
    // considered when the option set settles, never after a user clear.
    fn reconcile(&mut self, auto_select: bool, effects: &mut Vec<Effect>) {
        if auto_select && self.props.auto_select_single_option && self.committed.is_none() {
            let resolution = self.resolve(Trigger::AutoSelect);
            self.apply(Trigger::AutoSelect, resolution, effects);
        }
        if !self.display.is_typing() {
            self.display = self.resolved_display();
        }
        if self.props.is_disabled {
            self.is_open = false;
            self.has_focus = false;
        }
    }

    fn set_props(&mut self, props: TypeaheadProps, effects: &mut Vec<Effect>) {
        let value_changed = props.value != self.props.value;
        let options_changed = props.options != self.props.options;
        if options_changed {
            if let Some(dup) = index::duplicate_value(&props.options) {
                tracing::warn!(field = %props.field_name, value = dup, "duplicate option value, first match wins");
            }
        }
        let auto_select = options_changed
            || (props.auto_select_single_option && !self.props.auto_select_single_option);
        self.props = props;
        if value_changed {
            self.committed = self.props.value.clone();
        }
        self.reconcile(auto_select, effects);
        if !self.is_open {
            return;
        }
        if self.display.is_typing() {
            self.retarget_highlight();
        } else {
            let filtered = self.filtered();
            let keep = !value_changed
                && self.highlighted.as_deref().is_some_and(|h| filtered.contains(h));
            if !keep {
                self.highlighted = self.committed_if_visible(&filtered);
            }
        }
    }
}

pub fn update(state: &mut TypeaheadState, msg: TypeaheadMsg) -> Vec<Effect> {
    use TypeaheadMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        SetProps(props) => state.set_props(props, &mut effects),
        _ if state.props.is_disabled => {
            tracing::trace!(field = %state.props.field_name, "event ignored, field disabled");
        }
        Focus => {
            state.has_focus = true;
            state.open();
        }
        PointerDownField => state.open(),
        KeyDown(key @ (Key::ArrowUp | Key::ArrowDown)) => {
            let direction = if key == Key::ArrowUp {
                Direction::Up
            } else {
                Direction::Down
            };
            if state.is_open {
                state.move_highlight(direction);
            } else {
                state.open();
                if state.highlighted.is_none() {
                    state.move_highlight(direction);
                }
            }
        }
        KeyDown(Key::Enter) => {
            if state.is_open {
                let resolution = state.resolve(Trigger::Enter);
                state.apply(Trigger::Enter, resolution, &mut effects);
                state.close();
            }
        }
        // Tab only hides the menu; the blur that follows does the commit
        KeyDown(Key::Tab) => state.close(),
        Change(text) => {
            state.display = Display::Typing(text);
            state.is_open = true;
            state.retarget_highlight();
        }
        PointerDownOption(value) => {
            if state.is_open {
                let trigger = Trigger::OptionClick(&value);
                let resolution = state.resolve(trigger);
                if resolution != Resolution::Retain {
                    state.apply(trigger, resolution, &mut effects);
                    state.close();
                }
            }
        }
        ClearClick => {
            let resolution = state.resolve(Trigger::Clear);
            state.apply(Trigger::Clear, resolution, &mut effects);
        }
        Blur => {
            let resolution = state.resolve(Trigger::Blur);
            state.apply(Trigger::Blur, resolution, &mut effects);
            state.close();
            state.has_focus = false;
            effects.push(Effect::Blur {
                field_name: state.props.field_name.clone(),
                value: state.committed.clone(),
            });
        }
    }
    effects
}

#[cfg(test)]
mod tests;
