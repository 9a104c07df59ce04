use super::*;
use crate::typeahead::{OptionGroup, SelectOption};

fn opts() -> Vec<SelectOption> {
    vec![
        SelectOption::new("value1", "label1"),
        SelectOption::new("value2", "label2"),
    ]
}

fn grouped() -> TypeaheadProps {
    TypeaheadProps::new("fieldName")
        .with_options(vec![
            SelectOption::grouped("value1", "label1", "group1"),
            SelectOption::grouped("value2", "label2", "group2"),
            SelectOption::grouped("value3", "label3", "group1"),
            SelectOption::grouped("value4", "label4", "group2"),
        ])
        .with_groups(vec![
            OptionGroup::new("group1", "Group 1"),
            OptionGroup::new("group2", "Group 2"),
        ])
}

fn basic() -> TypeaheadProps {
    TypeaheadProps::new("fieldName").with_options(opts())
}

fn mounted(props: TypeaheadProps) -> TypeaheadState {
    let (st, effects) = mount(props);
    assert!(effects.is_empty(), "unexpected mount effects: {effects:?}");
    st
}

fn run(st: &mut TypeaheadState, msgs: Vec<TypeaheadMsg>) -> Vec<Effect> {
    msgs.into_iter().flat_map(|m| update(st, m)).collect()
}

// One Change per typed character, the way an input element reports edits
fn type_text(st: &mut TypeaheadState, text: &str) -> Vec<Effect> {
    let mut out = Vec::new();
    for (i, _) in text.char_indices().skip(1).chain([(text.len(), ' ')]) {
        out.extend(update(st, TypeaheadMsg::Change(text[..i].to_string())));
    }
    out
}

fn changes(effects: &[Effect]) -> Vec<Option<&str>> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Change { value, .. } => Some(value.as_deref()),
            _ => None,
        })
        .collect()
}

fn blurs(effects: &[Effect]) -> Vec<Option<&str>> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Blur { value, .. } => Some(value.as_deref()),
            _ => None,
        })
        .collect()
}

fn option_rows(view: &TypeaheadView) -> Vec<(&str, bool)> {
    view.rows
        .iter()
        .filter_map(|r| match r {
            RowView::Option {
                value, highlighted, ..
            } => Some((value.as_str(), *highlighted)),
            _ => None,
        })
        .collect()
}

fn group_rows(view: &TypeaheadView) -> Vec<&str> {
    view.rows
        .iter()
        .filter_map(|r| match r {
            RowView::Group { value, .. } => Some(value.as_str()),
            _ => None,
        })
        .collect()
}

use Key::*;
use TypeaheadMsg::*;

#[test]
fn mounts_closed_with_field_name_only() {
    let st = mounted(TypeaheadProps::new("fieldName"));
    assert!(!st.is_open());
    assert_eq!(st.typed_label(), "");
    assert!(st.view().rows.is_empty());
    let st = mounted(basic());
    assert!(!st.is_open());
}

#[test]
fn focus_click_and_arrow_open_the_menu() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    assert!(st.is_open());
    assert_eq!(option_rows(&st.view()), vec![("value1", false), ("value2", false)]);

    let mut st = mounted(basic());
    run(&mut st, vec![PointerDownField]);
    assert!(st.is_open());

    let mut st = mounted(basic());
    run(&mut st, vec![KeyDown(ArrowDown)]);
    assert!(st.is_open());
    assert_eq!(st.highlighted(), Some("value1"));
}

#[test]
fn blur_closes_the_menu() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus, Blur]);
    assert!(!st.is_open());
    assert!(!st.has_focus());
}

#[test]
fn value_prop_resolves_to_label() {
    let st = mounted(basic().with_value("value1"));
    assert_eq!(st.typed_label(), "label1");

    let st = mounted(basic().with_value("unknownValue"));
    assert_eq!(st.typed_label(), "");
    // Accepted anyway, waiting for options to catch up
    assert_eq!(st.value(), Some("unknownValue"));

    let mut st = mounted(basic().with_value("value1"));
    let effects = run(&mut st, vec![SetProps(basic().with_value("value2"))]);
    assert!(effects.is_empty());
    assert_eq!(st.typed_label(), "label2");
}

#[test]
fn highlight_follows_committed_value_on_focus() {
    let mut st = mounted(basic().with_value("value1"));
    run(&mut st, vec![Focus]);
    assert_eq!(option_rows(&st.view()), vec![("value1", true), ("value2", false)]);

    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    assert_eq!(st.highlighted(), None);
}

#[test]
fn both_arrows_enter_the_list_at_first_option() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus, KeyDown(ArrowDown)]);
    assert_eq!(st.highlighted(), Some("value1"));

    let mut st = mounted(basic());
    run(&mut st, vec![Focus, KeyDown(ArrowUp)]);
    assert_eq!(st.highlighted(), Some("value1"));

    let mut st = mounted(basic());
    run(&mut st, vec![Focus, KeyDown(ArrowDown), KeyDown(ArrowDown)]);
    assert_eq!(st.highlighted(), Some("value2"));
}

#[test]
fn typing_filters_and_highlights_first_match() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "label2");
    assert_eq!(option_rows(&st.view()), vec![("value2", true)]);

    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "bel");
    assert_eq!(option_rows(&st.view()), vec![("value1", true), ("value2", false)]);
}

#[test]
fn arrows_alone_do_not_commit() {
    let mut st = mounted(basic().with_value("value1"));
    let effects = run(&mut st, vec![Focus, KeyDown(ArrowDown), KeyDown(ArrowDown)]);
    assert!(effects.is_empty());
    assert_eq!(st.value(), Some("value1"));
}

#[test]
fn tab_then_blur_commits_highlight() {
    let mut st = mounted(basic());
    let effects = run(
        &mut st,
        vec![Focus, KeyDown(ArrowDown), KeyDown(ArrowDown), KeyDown(Tab)],
    );
    assert!(effects.is_empty());
    assert!(!st.is_open());
    let effects = run(&mut st, vec![Blur]);
    assert_eq!(st.value(), Some("value2"));
    assert_eq!(changes(&effects), vec![Some("value2")]);
    assert_eq!(blurs(&effects), vec![Some("value2")]);
    assert_eq!(
        effects[0],
        Effect::Change {
            field_name: "fieldName".into(),
            value: Some("value2".into())
        }
    );
}

#[test]
fn enter_commits_highlight_and_closes() {
    let mut st = mounted(basic());
    let effects = run(&mut st, vec![Focus, KeyDown(ArrowDown), KeyDown(Enter)]);
    assert_eq!(changes(&effects), vec![Some("value1")]);
    assert!(!st.is_open());
    assert_eq!(st.typed_label(), "label1");

    // Nothing highlighted: close without committing
    let mut st = mounted(basic());
    let effects = run(&mut st, vec![Focus, KeyDown(Enter)]);
    assert!(effects.is_empty());
    assert!(!st.is_open());
    assert_eq!(st.value(), None);
}

#[test]
fn zigzag_navigation_clamps_and_commits_final_position() {
    let keys = [ArrowUp, ArrowDown, ArrowDown, ArrowUp, ArrowUp, ArrowUp, ArrowDown];
    for finish in [vec![KeyDown(Tab), Blur], vec![KeyDown(Enter)]] {
        let mut st = mounted(basic());
        let mut msgs = vec![Focus];
        msgs.extend(keys.iter().map(|k| KeyDown(*k)));
        msgs.extend(finish);
        let effects = run(&mut st, msgs);
        assert_eq!(st.value(), Some("value2"));
        assert_eq!(changes(&effects), vec![Some("value2")]);
    }
}

#[test]
fn option_click_commits_without_blur() {
    let mut st = mounted(basic());
    let effects = run(&mut st, vec![Focus, PointerDownOption("value2".into())]);
    assert_eq!(st.value(), Some("value2"));
    assert_eq!(st.typed_label(), "label2");
    assert!(!st.is_open());
    assert_eq!(changes(&effects), vec![Some("value2")]);
    assert!(blurs(&effects).is_empty());
}

#[test]
fn disabled_field_ignores_interaction() {
    let mut props = basic();
    props.is_disabled = true;
    let mut st = mounted(props);
    let effects = run(
        &mut st,
        vec![Focus, PointerDownField, KeyDown(ArrowDown), ClearClick, Blur],
    );
    assert!(effects.is_empty());
    assert!(!st.is_open());
    assert!(st.view().is_disabled);
    assert!(!mounted(basic()).view().is_disabled);
}

#[test]
fn unknown_text_reverts_without_flag() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "unknownValue");
    let effects = run(&mut st, vec![KeyDown(Tab), Blur]);
    assert!(changes(&effects).is_empty());
    assert_eq!(st.value(), None);
    assert_eq!(st.typed_label(), "");
}

#[test]
fn unknown_text_commits_with_flag() {
    let mut props = basic();
    props.allow_unknown_value = true;
    let mut st = mounted(props);
    run(&mut st, vec![Focus]);
    type_text(&mut st, "unknownValue");
    assert_eq!(st.view().no_options, None);
    let effects = run(&mut st, vec![KeyDown(Tab), Blur]);
    assert_eq!(changes(&effects), vec![Some("unknownValue")]);
    assert_eq!(st.typed_label(), "unknownValue");
}

#[test]
fn blur_reports_value_after_its_commit() {
    let mut st = mounted(basic());
    let effects = run(&mut st, vec![Focus, KeyDown(ArrowDown), Blur]);
    assert_eq!(
        effects.last(),
        Some(&Effect::Blur {
            field_name: "fieldName".into(),
            value: Some("value1".into())
        })
    );
}

#[test]
fn tab_blur_notifies_once() {
    let mut st = mounted(basic());
    let effects = run(&mut st, vec![Focus, KeyDown(ArrowDown), KeyDown(Tab), Blur]);
    assert_eq!(changes(&effects).len(), 1);
    assert_eq!(blurs(&effects).len(), 1);
}

#[test]
fn sequential_commits_notify_in_order() {
    let mut st = mounted(basic());
    let effects = run(
        &mut st,
        vec![
            Focus,
            KeyDown(ArrowDown),
            KeyDown(Enter),
            KeyDown(ArrowDown),
            KeyDown(ArrowDown),
            KeyDown(Tab),
            Blur,
        ],
    );
    assert_eq!(changes(&effects), vec![Some("value1"), Some("value2")]);
}

#[test]
fn repeated_clicks_notify_each_change() {
    let mut st = mounted(basic());
    let mut effects = run(&mut st, vec![Focus, PointerDownOption("value2".into())]);
    assert_eq!(st.typed_label(), "label2");
    effects.extend(run(&mut st, vec![Focus, PointerDownOption("value1".into())]));
    assert_eq!(st.typed_label(), "label1");
    assert_eq!(changes(&effects), vec![Some("value2"), Some("value1")]);
}

#[test]
fn click_then_blur_reports_clicked_value() {
    let mut st = mounted(basic());
    let effects = run(&mut st, vec![Focus, PointerDownOption("value2".into()), Blur]);
    assert_eq!(changes(&effects), vec![Some("value2")]);
    assert_eq!(blurs(&effects), vec![Some("value2")]);
}

#[test]
fn controlled_echo_and_double_blur() {
    let mut st = mounted(basic());
    let mut effects = run(&mut st, vec![Focus, PointerDownOption("value2".into())]);
    // Host feeds the committed value back
    effects.extend(run(&mut st, vec![SetProps(basic().with_value("value2"))]));
    effects.extend(run(
        &mut st,
        vec![Focus, PointerDownOption("value1".into()), Blur, Blur],
    ));
    assert_eq!(changes(&effects), vec![Some("value2"), Some("value1")]);
    assert_eq!(blurs(&effects), vec![Some("value1"), Some("value1")]);
}

#[test]
fn no_options_indicator_echoes_query() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "unknownValue");
    let view = st.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.no_options.as_deref(), Some("unknownValue"));
}

#[test]
fn synthetic_row_while_typing_and_after_reopen() {
    let mut props = basic();
    props.allow_unknown_value = true;
    let mut st = mounted(props);
    run(&mut st, vec![Focus]);
    type_text(&mut st, "unknownValue");
    let synthetic = |v: &TypeaheadView| {
        v.rows.iter().any(|r| {
            matches!(r, RowView::Option { value, synthetic: true, .. } if value == "unknownValue")
        })
    };
    assert!(synthetic(&st.view()));

    run(&mut st, vec![KeyDown(Tab), Blur, Focus]);
    assert!(st.is_open());
    assert!(synthetic(&st.view()));
    assert_eq!(st.highlighted(), Some("unknownValue"));
}

#[test]
fn clear_control_resets_everything() {
    let mut props = basic().with_value("value1");
    props.allow_unknown_value = true;
    props.is_clearable = true;
    let mut st = mounted(props);
    assert!(st.view().show_clear);
    let effects = run(&mut st, vec![ClearClick]);
    assert_eq!(st.value(), None);
    assert_eq!(st.highlighted(), None);
    assert_eq!(st.typed_label(), "");
    assert_eq!(changes(&effects), vec![None]);

    // Already cleared, still notifies
    let effects = run(&mut st, vec![ClearClick]);
    assert_eq!(changes(&effects), vec![None]);
}

#[test]
fn clear_control_needs_clearable() {
    let mut st = mounted(basic().with_value("value1"));
    assert!(!st.view().show_clear);
    let effects = run(&mut st, vec![ClearClick]);
    assert!(effects.is_empty());
    assert_eq!(st.value(), Some("value1"));
}

#[test]
fn emptied_label_clears_when_clearable() {
    let mut props = basic();
    props.is_clearable = true;
    let mut st = mounted(props);
    run(&mut st, vec![Focus, KeyDown(ArrowDown), KeyDown(Tab), Blur, Focus]);
    assert_eq!(st.value(), Some("value1"));
    let effects = run(&mut st, vec![Change(String::new()), Blur]);
    assert_eq!(st.typed_label(), "");
    assert_eq!(st.value(), None);
    assert_eq!(changes(&effects), vec![None]);
}

#[test]
fn emptied_label_reverts_when_not_clearable() {
    let mut st = mounted(basic().with_value("value1"));
    let effects = run(&mut st, vec![Focus, Change(String::new()), Blur]);
    assert!(changes(&effects).is_empty());
    assert_eq!(st.typed_label(), "label1");
}

#[test]
fn emptied_then_highlighted_commits_highlight_on_tab_blur() {
    let mut props = basic().with_value("value2");
    props.is_clearable = true;
    let mut st = mounted(props);
    let effects = run(
        &mut st,
        vec![Focus, Change(String::new()), KeyDown(ArrowDown), KeyDown(Tab), Blur],
    );
    assert_eq!(st.value(), Some("value1"));
    assert_eq!(changes(&effects), vec![Some("value1")]);
    assert_eq!(blurs(&effects), vec![Some("value1")]);
}

#[test]
fn cleared_auto_select_field_stays_cleared() {
    let mut props = TypeaheadProps::new("fieldName").with_options(vec![SelectOption::new("x", "X")]);
    props.auto_select_single_option = true;
    props.is_clearable = true;
    let (mut st, mounted_effects) = mount(props.clone());
    assert_eq!(changes(&mounted_effects), vec![Some("x")]);

    let effects = run(&mut st, vec![ClearClick]);
    assert_eq!(changes(&effects), vec![None]);

    // Host echoes the cleared value back
    props.value = None;
    let effects = run(&mut st, vec![SetProps(props.clone())]);
    assert!(effects.is_empty());
    assert_eq!(st.value(), None);

    // A new option set settles and the sole option is picked again
    props.options = vec![SelectOption::new("y", "Y")];
    let effects = run(&mut st, vec![SetProps(props)]);
    assert_eq!(changes(&effects), vec![Some("y")]);
}

#[test]
fn auto_selects_single_option() {
    let mut props =
        TypeaheadProps::new("fieldName").with_options(vec![SelectOption::new("value", "label")]);
    props.auto_select_single_option = true;
    let (st, effects) = mount(props);
    assert_eq!(st.typed_label(), "label");
    assert_eq!(
        effects,
        vec![Effect::Change {
            field_name: "fieldName".into(),
            value: Some("value".into())
        }]
    );
    assert!(!st.is_open());
}

#[test]
fn groups_render_with_attribution() {
    let mut st = mounted(grouped());
    run(&mut st, vec![Focus]);
    let view = st.view();
    assert_eq!(group_rows(&view), vec!["group1", "group2"]);
    let attribution: Vec<(&str, Option<&str>)> = view
        .rows
        .iter()
        .filter_map(|r| match r {
            RowView::Option { value, group, .. } => Some((value.as_str(), group.as_deref())),
            _ => None,
        })
        .collect();
    assert_eq!(
        attribution,
        vec![
            ("value1", Some("group1")),
            ("value3", Some("group1")),
            ("value2", Some("group2")),
            ("value4", Some("group2")),
        ]
    );
}

#[test]
fn group_label_search_shows_whole_group() {
    let mut st = mounted(grouped());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "Group 1");
    let view = st.view();
    assert_eq!(group_rows(&view), vec!["group1"]);
    let values: Vec<&str> = option_rows(&view).into_iter().map(|(v, _)| v).collect();
    assert_eq!(values, vec!["value1", "value3"]);
}

#[test]
fn empty_groups_follow_flag() {
    for (flag, expected) in [(true, vec!["group1", "group2"]), (false, vec![])] {
        let mut props = grouped();
        props.render_empty_groups = flag;
        let mut st = mounted(props);
        run(&mut st, vec![Focus]);
        type_text(&mut st, "does not exist");
        assert_eq!(group_rows(&st.view()), expected);
    }
}

#[test]
fn click_on_filtered_option_then_blur() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "bel2");
    run(&mut st, vec![PointerDownOption("value2".into()), Blur]);
    assert_eq!(st.value(), Some("value2"));
}

#[test]
fn outside_click_while_filtered_is_harmless() {
    let mut st = mounted(basic());
    run(&mut st, vec![Focus]);
    type_text(&mut st, "bel2");
    // Hidden option cannot be picked
    let effects = run(&mut st, vec![PointerDownOption("value1".into())]);
    assert!(effects.is_empty());
    assert!(st.is_open());
    run(&mut st, vec![Blur]);
    assert_eq!(st.value(), Some("value2"));
}

#[test]
fn options_arriving_after_value_resolve_label() {
    let props = TypeaheadProps::new("fieldName").with_value("myVal");
    let mut st = mounted(props.clone());
    assert_eq!(st.typed_label(), "");
    let mut next = props;
    next.options = vec![SelectOption::new("myVal", "somethingElse")];
    let effects = run(&mut st, vec![SetProps(next)]);
    assert!(effects.is_empty());
    assert_eq!(st.typed_label(), "somethingElse");
}

#[test]
fn prop_updates_do_not_clobber_typing() {
    let mut st = mounted(basic().with_value("value1"));
    run(&mut st, vec![Focus]);
    type_text(&mut st, "lab");
    run(&mut st, vec![SetProps(basic().with_value("value2"))]);
    assert_eq!(st.typed_label(), "lab");
    assert_eq!(st.value(), Some("value2"));
}

#[test]
fn reopen_highlights_committed_option_only() {
    let mut st = mounted(basic());
    run(
        &mut st,
        vec![Focus, KeyDown(ArrowDown), KeyDown(ArrowDown), KeyDown(Enter), Blur, Focus],
    );
    assert_eq!(option_rows(&st.view()), vec![("value1", false), ("value2", true)]);
}

#[test]
fn unmatched_literal_with_flag_shows_value() {
    let mut props = basic().with_value("free text");
    props.allow_unknown_value = true;
    let st = mounted(props);
    assert_eq!(st.typed_label(), "free text");
    assert!(matches!(st.display(), Display::Unmatched(_)));
}
