use super::filter::Filtered;
use super::index::by_label;
use super::{Display, SelectOption};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger<'a> {
    OptionClick(&'a str),
    Enter,
    // Focus loss, with or without a preceding Tab
    Blur,
    Clear,
    // Sole option picked without user interaction
    AutoSelect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Commit(Option<String>),
    // Leave value and display untouched
    Retain,
    // Drop typed text, show the committed value again
    Revert,
}

pub struct CommitContext<'a> {
    pub display: &'a Display,
    pub highlighted: Option<&'a str>,
    pub filtered: &'a Filtered,
    pub options: &'a [SelectOption],
    pub is_clearable: bool,
    pub allow_unknown_value: bool,
}

impl CommitContext<'_> {
    // Highlight is only honoured while its row is on screen
    fn visible_highlight(&self) -> Option<&str> {
        self.highlighted.filter(|h| self.filtered.contains(h))
    }
}

pub fn resolve(trigger: Trigger<'_>, ctx: &CommitContext<'_>) -> Resolution {
    match trigger {
        Trigger::OptionClick(value) => {
            if ctx.filtered.contains(value) {
                Resolution::Commit(Some(value.to_string()))
            } else {
                Resolution::Retain
            }
        }
        Trigger::Enter => match ctx.visible_highlight() {
            Some(h) => Resolution::Commit(Some(h.to_string())),
            None => Resolution::Retain,
        },
        Trigger::Clear => {
            if ctx.is_clearable {
                Resolution::Commit(None)
            } else {
                Resolution::Retain
            }
        }
        Trigger::Blur => resolve_blur(ctx),
        Trigger::AutoSelect => match ctx.options {
            [only] => Resolution::Commit(Some(only.value.clone())),
            _ => Resolution::Retain,
        },
    }
}

fn resolve_blur(ctx: &CommitContext<'_>) -> Resolution {
    if let Display::Typing(text) = ctx.display {
        // A highlight picked after emptying the text still wins over clearing
        if let Some(h) = ctx.visible_highlight() {
            return Resolution::Commit(Some(h.to_string()));
        }
        if text.is_empty() {
            return if ctx.is_clearable {
                Resolution::Commit(None)
            } else {
                Resolution::Revert
            };
        }
        if ctx.allow_unknown_value {
            return Resolution::Commit(Some(text.clone()));
        }
        return match by_label(ctx.options, text) {
            Some(o) => Resolution::Commit(Some(o.value.clone())),
            None => Resolution::Revert,
        };
    }
    match ctx.visible_highlight() {
        Some(h) => Resolution::Commit(Some(h.to_string())),
        None => Resolution::Revert,
    }
}

/// Whether committing `next` over `previous` notifies the host. Clearing
/// always notifies, every other trigger only on an actual change.
pub fn should_notify(trigger: Trigger<'_>, previous: Option<&str>, next: Option<&str>) -> bool {
    matches!(trigger, Trigger::Clear) || previous != next
}
