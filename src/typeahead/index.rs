use super::{OptionGroup, SelectOption};
use std::collections::HashSet;

pub fn by_value<'a>(options: &'a [SelectOption], value: &str) -> Option<&'a SelectOption> {
    options.iter().find(|o| o.value == value)
}

/// Exact (case-sensitive) label lookup.
pub fn by_label<'a>(options: &'a [SelectOption], label: &str) -> Option<&'a SelectOption> {
    options.iter().find(|o| o.label == label)
}

/// The group header an option is attributed to. Options pointing at a group
/// id that is not declared get none.
pub fn group_of<'a>(option: &SelectOption, groups: &'a [OptionGroup]) -> Option<&'a OptionGroup> {
    let gid = option.group.as_deref()?;
    groups.iter().find(|g| g.value == gid)
}

/// First value that occurs more than once, if any.
pub fn duplicate_value(options: &[SelectOption]) -> Option<&str> {
    let mut seen = HashSet::new();
    options
        .iter()
        .find(|o| !seen.insert(o.value.as_str()))
        .map(|o| o.value.as_str())
}

/// Label shown for a committed value, `None` when the value is unknown.
pub fn label_for<'a>(options: &'a [SelectOption], value: &str) -> Option<&'a str> {
    by_value(options, value).map(|o| o.label.as_str())
}
