use super::index::{by_label, group_of};
use super::{OptionGroup, SelectOption};

#[derive(Clone, Copy, Debug, Default)]
pub struct FilterFlags {
    pub render_empty_groups: bool,
    pub allow_unknown_value: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlatRow {
    Group(OptionGroup),
    Option {
        option: SelectOption,
        // Group header this row is rendered under
        group: Option<String>,
        synthetic: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filtered {
    pub rows: Vec<FlatRow>,
    // True when at least one real (non-synthetic) option matched
    pub has_matches: bool,
}

impl Filtered {
    /// Option values in display order; this is the navigation order.
    pub fn values(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| match r {
                FlatRow::Option { option, .. } => Some(option.value.as_str()),
                FlatRow::Group(_) => None,
            })
            .collect()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.rows.iter().any(|r| match r {
            FlatRow::Option { option, .. } => option.value == value,
            FlatRow::Group(_) => false,
        })
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn flatten_options(
    options: &[SelectOption],
    groups: Option<&[OptionGroup]>,
    query: &str,
    flags: FilterFlags,
) -> Filtered {
    let mut out = Filtered::default();
    let label_hit = |o: &SelectOption| query.is_empty() || contains_ci(&o.label, query);

    match groups {
        None => {
            for o in options.iter().filter(|o| label_hit(o)) {
                out.rows.push(FlatRow::Option {
                    option: o.clone(),
                    group: None,
                    synthetic: false,
                });
                out.has_matches = true;
            }
        }
        Some(groups) => {
            for g in groups {
                let group_hit = !query.is_empty() && contains_ci(&g.label, query);
                let members: Vec<&SelectOption> = options
                    .iter()
                    .filter(|o| group_of(o, groups).is_some_and(|og| og.value == g.value))
                    .filter(|o| group_hit || label_hit(o))
                    .collect();
                if members.is_empty() && !flags.render_empty_groups {
                    continue;
                }
                out.rows.push(FlatRow::Group(g.clone()));
                for o in members {
                    out.rows.push(FlatRow::Option {
                        option: o.clone(),
                        group: Some(g.value.clone()),
                        synthetic: false,
                    });
                    out.has_matches = true;
                }
            }
            // Options without a declared group trail the grouped section, headerless
            for o in options
                .iter()
                .filter(|o| group_of(o, groups).is_none() && label_hit(o))
            {
                out.rows.push(FlatRow::Option {
                    option: o.clone(),
                    group: None,
                    synthetic: false,
                });
                out.has_matches = true;
            }
        }
    }

    if flags.allow_unknown_value && !query.is_empty() && by_label(options, query).is_none() {
        out.rows.push(FlatRow::Option {
            option: SelectOption::new(query, query),
            group: None,
            synthetic: true,
        });
    }
    out
}
