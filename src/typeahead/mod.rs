pub mod commit;
pub mod cursor;
pub mod filter;
pub mod index;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub group: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            group: None,
        }
    }

    pub fn grouped(
        value: impl Into<String>,
        label: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            group: Some(group.into()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct OptionGroup {
    pub value: String,
    pub label: String,
}

impl OptionGroup {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Host-owned inputs of a single typeahead field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeaheadProps {
    pub field_name: String,
    pub options: Vec<SelectOption>,
    pub groups: Option<Vec<OptionGroup>>,
    pub value: Option<String>,
    pub is_disabled: bool,
    pub is_clearable: bool,
    pub allow_unknown_value: bool,
    pub render_empty_groups: bool,
    pub auto_select_single_option: bool,
}

impl TypeaheadProps {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_groups(mut self, groups: Vec<OptionGroup>) -> Self {
        self.groups = Some(groups);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// What the field shows.
///
/// `Typing` is free text the user is composing; it is never overwritten by
/// prop-driven resyncs. `Unmatched` is a committed value that has no option
/// and is shown literally (only reachable with `allow_unknown_value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    Committed(String),
    Typing(String),
    Unmatched(String),
}

impl Default for Display {
    fn default() -> Self {
        Display::Committed(String::new())
    }
}

impl Display {
    pub fn text(&self) -> &str {
        match self {
            Display::Committed(s) | Display::Typing(s) | Display::Unmatched(s) => s,
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self, Display::Typing(_))
    }

    /// Text the option list is filtered by. A committed label shows the whole
    /// list again; an unmatched literal keeps filtering so its synthetic row
    /// comes back when the menu reopens.
    pub fn query(&self) -> &str {
        match self {
            Display::Committed(_) => "",
            Display::Typing(s) | Display::Unmatched(s) => s,
        }
    }
}
