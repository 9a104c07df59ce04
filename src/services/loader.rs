use crate::model::{validate_app_config, validate_options, AppConfig, FieldConfig};
use crate::typeahead::{OptionGroup, SelectOption, TypeaheadProps};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "typeahead.yaml";
pub const CONFIG_DIR_ENV: &str = "TYPEAHEAD_TUI_CONFIG_DIR";

/// A parsed config and the directory relative paths inside it resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub base_dir: Option<PathBuf>,
    pub source: Option<PathBuf>,
}

pub fn get_by_path<'a>(v: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut cur = v;
    for seg in path.split('.') {
        cur = cur.get(seg)?;
    }
    Some(cur)
}

// Strings as-is, numbers in their JSON form
fn scalar_at(item: &JsonValue, path: &str) -> Option<String> {
    let v = get_by_path(item, path)?;
    v.as_str()
        .map(|s| s.to_string())
        .or_else(|| v.as_i64().map(|n| n.to_string()))
        .or_else(|| v.as_f64().map(|f| f.to_string()))
}

fn first_key(obj: &serde_json::Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(|x| x.as_str()))
        .map(|s| s.to_string())
}

// Options from a JSON document, with optional unwrap
// unwrap formats supported:
// - None: defaults to data.items; array of strings or objects with id|value and title|name|label
// - "data.items": same as above, at any path
// - "data.items[].id/title": iterate array at data.items, value from id, label from title
// - "data.items[].id/title/kind": as above, group id from kind
pub(crate) fn parse_options_from_json(v: &JsonValue, unwrap: Option<&str>) -> Vec<SelectOption> {
    let uw = unwrap.unwrap_or("data.items");
    let mut out: Vec<SelectOption> = Vec::new();
    if let Some(idx) = uw.find("[]") {
        let base = &uw[..idx];
        let rest = uw[idx + 2..].trim_start_matches('.');
        let mut keys = rest.split('/').filter(|s| !s.is_empty());
        let val_path = keys.next().unwrap_or("id");
        let lbl_path = keys.next().unwrap_or(if rest.is_empty() { "title" } else { val_path });
        let grp_path = keys.next();
        let arr = if base.is_empty() {
            v.as_array()
        } else {
            get_by_path(v, base).and_then(|x| x.as_array())
        };
        for item in arr.into_iter().flatten() {
            let value = scalar_at(item, val_path).unwrap_or_else(|| item.to_string());
            let label = scalar_at(item, lbl_path).unwrap_or_else(|| value.clone());
            out.push(SelectOption {
                value,
                label,
                group: grp_path.and_then(|g| scalar_at(item, g)),
            });
        }
        return out;
    }
    let arr = get_by_path(v, uw)
        .or_else(|| v.get("data").and_then(|d| d.get("items")))
        .or(Some(v))
        .and_then(|x| x.as_array());
    for item in arr.into_iter().flatten() {
        if let Some(s) = item.as_str() {
            out.push(SelectOption::new(s, s));
        } else if let Some(obj) = item.as_object() {
            let value = first_key(obj, &["id", "value"]).unwrap_or_else(|| item.to_string());
            let label = first_key(obj, &["title", "name", "label"]).unwrap_or_else(|| value.clone());
            out.push(SelectOption {
                value,
                label,
                group: first_key(obj, &["group"]),
            });
        }
    }
    out
}

pub(crate) fn resolve_path(base_dir: Option<&Path>, path: &str) -> PathBuf {
    let pb = PathBuf::from(path);
    if pb.is_absolute() {
        return pb;
    }
    match base_dir {
        Some(dir) => dir.join(pb),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(pb),
    }
}

/// Reads an options document; `.yaml`/`.yml` are parsed as YAML, anything
/// else as JSON.
pub fn read_options_file(path: &Path) -> Result<JsonValue> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).with_context(|| format!("parsing {path:?}"))
    } else {
        serde_json::from_str(&s).with_context(|| format!("parsing {path:?}"))
    }
}

fn field_options(field: &FieldConfig, base_dir: Option<&Path>) -> Result<Vec<SelectOption>> {
    let Some(file) = &field.options_file else {
        return Ok(field.options.clone());
    };
    let path = resolve_path(base_dir, file);
    let doc = read_options_file(&path)?;
    let options = parse_options_from_json(&doc, field.options_unwrap.as_deref());
    validate_options(&field.field_name, &options)?;
    tracing::debug!(field = %field.field_name, count = options.len(), path = ?path, "options loaded");
    Ok(options)
}

/// Validates the config and turns every field into widget props.
pub fn build_props(loaded: &LoadedConfig) -> Result<Vec<TypeaheadProps>> {
    validate_app_config(&loaded.config)?;
    loaded
        .config
        .fields
        .iter()
        .map(|f| {
            let options = field_options(f, loaded.base_dir.as_deref())
                .with_context(|| format!("options for field '{}'", f.field_name))?;
            Ok(f.to_props(options))
        })
        .collect()
}

fn parse_config_file(p: &Path) -> Result<LoadedConfig> {
    let s = fs::read_to_string(p).with_context(|| format!("reading {p:?}"))?;
    let config: AppConfig = serde_yaml::from_str(&s).with_context(|| format!("parsing {p:?}"))?;
    Ok(LoadedConfig {
        config,
        base_dir: p.parent().map(Path::to_path_buf),
        source: Some(p.to_path_buf()),
    })
}

/// Discovery order after the env override: `./typeahead.yaml`,
/// `./.tui/typeahead.yaml`, each ancestor's `.tui/typeahead.yaml`, then
/// `~/.tui/typeahead.yaml`.
pub(crate) fn config_candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut out = vec![cwd.join(CONFIG_FILE), cwd.join(".tui").join(CONFIG_FILE)];
    let mut cur = cwd;
    while let Some(parent) = cur.parent() {
        out.push(parent.join(".tui").join(CONFIG_FILE));
        cur = parent;
    }
    if let Some(home) = home {
        out.push(home.join(".tui").join(CONFIG_FILE));
    }
    out
}

pub fn load_config() -> Result<LoadedConfig> {
    if let Ok(base) = std::env::var(CONFIG_DIR_ENV) {
        let entry = PathBuf::from(&base).join(CONFIG_FILE);
        return parse_config_file(&entry)
            .with_context(|| format!("{CONFIG_DIR_ENV} points at {base}"));
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from);
    for p in config_candidates(&cwd, home.as_deref()) {
        if p.exists() {
            tracing::info!(path = ?p, "config found");
            return parse_config_file(&p);
        }
    }
    tracing::info!("no {CONFIG_FILE} found, using demo config");
    Ok(LoadedConfig {
        config: demo_config(),
        base_dir: None,
        source: None,
    })
}

/// Fields shown when no config file exists; one per widget flag.
pub fn demo_config() -> AppConfig {
    let langs = ["Rust", "Go", "Haskell", "OCaml", "Python", "Ruby", "TypeScript"];
    let lang_group = |l: &str| match l {
        "Rust" | "Go" => "systems",
        "Haskell" | "OCaml" => "functional",
        _ => "scripting",
    };
    let opt = |v: &str, l: &str| SelectOption::new(v, l);
    AppConfig {
        title: "Typeahead demo".into(),
        fields: vec![
            FieldConfig {
                field_name: "fruit".into(),
                label: Some("Fruit".into()),
                value: Some("pear".into()),
                options: vec![
                    opt("apple", "Apple"),
                    opt("banana", "Banana"),
                    opt("cherry", "Cherry"),
                    opt("pear", "Pear"),
                    opt("plum", "Plum"),
                ],
                is_clearable: true,
                ..Default::default()
            },
            FieldConfig {
                field_name: "language".into(),
                label: Some("Language (grouped)".into()),
                options: langs
                    .iter()
                    .map(|l| SelectOption::grouped(l.to_lowercase(), *l, lang_group(*l)))
                    .collect(),
                groups: Some(vec![
                    OptionGroup::new("systems", "Systems"),
                    OptionGroup::new("functional", "Functional"),
                    OptionGroup::new("scripting", "Scripting"),
                    OptionGroup::new("legacy", "Legacy"),
                ]),
                render_empty_groups: true,
                ..Default::default()
            },
            FieldConfig {
                field_name: "tag".into(),
                label: Some("Tag (free text)".into()),
                options: vec![opt("bug", "bug"), opt("feature", "feature")],
                allow_unknown_value: true,
                is_clearable: true,
                ..Default::default()
            },
            FieldConfig {
                field_name: "region".into(),
                label: Some("Region (single option)".into()),
                options: vec![opt("eu-west", "EU West")],
                auto_select_single_option: true,
                ..Default::default()
            },
            FieldConfig {
                field_name: "locked".into(),
                label: Some("Locked".into()),
                value: Some("apple".into()),
                options: vec![opt("apple", "Apple")],
                is_disabled: true,
                ..Default::default()
            },
        ],
    }
}
