use crate::typeahead::{OptionGroup, SelectOption, TypeaheadProps};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FieldConfig {
    pub field_name: String,
    // Caption drawn in the field border; falls back to field_name
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub groups: Option<Vec<OptionGroup>>,
    // Options loaded from a JSON/YAML file, relative to the config dir
    #[serde(default)]
    pub options_file: Option<String>,
    #[serde(default)]
    pub options_unwrap: Option<String>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_clearable: bool,
    #[serde(default)]
    pub allow_unknown_value: bool,
    #[serde(default)]
    pub render_empty_groups: bool,
    #[serde(default)]
    pub auto_select_single_option: bool,
}

impl FieldConfig {
    pub fn caption(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field_name)
    }

    /// Props for the widget, with options already resolved by the loader.
    pub fn to_props(&self, options: Vec<SelectOption>) -> TypeaheadProps {
        TypeaheadProps {
            field_name: self.field_name.clone(),
            options,
            groups: self.groups.clone(),
            value: self.value.clone(),
            is_disabled: self.is_disabled,
            is_clearable: self.is_clearable,
            allow_unknown_value: self.allow_unknown_value,
            render_empty_groups: self.render_empty_groups,
            auto_select_single_option: self.auto_select_single_option,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub fields: Vec<FieldConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            fields: vec![],
        }
    }
}

fn default_title() -> String {
    "Typeahead".to_string()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("field at index {0} has an empty field_name")]
    EmptyFieldName(usize),
    #[error("duplicate field_name: '{name}' at index {index}")]
    DuplicateField { name: String, index: usize },
    #[error("field '{field}' has duplicate option value '{value}'")]
    DuplicateOption { field: String, value: String },
    #[error("field '{0}' sets both 'options' and 'options_file'")]
    ConflictingOptions(String),
}

/// Checks a config before any widget is built. Options pointing at an
/// undeclared group are fine; they render without a header.
pub(crate) fn validate_app_config(cfg: &AppConfig) -> Result<(), ConfigError> {
    use std::collections::HashSet;
    let mut names = HashSet::new();
    for (i, f) in cfg.fields.iter().enumerate() {
        if f.field_name.trim().is_empty() {
            return Err(ConfigError::EmptyFieldName(i));
        }
        if !names.insert(f.field_name.as_str()) {
            return Err(ConfigError::DuplicateField {
                name: f.field_name.clone(),
                index: i,
            });
        }
        if f.options_file.is_some() && !f.options.is_empty() {
            return Err(ConfigError::ConflictingOptions(f.field_name.clone()));
        }
        validate_options(&f.field_name, &f.options)?;
    }
    Ok(())
}

/// Option values must be unique within a field.
pub(crate) fn validate_options(field: &str, options: &[SelectOption]) -> Result<(), ConfigError> {
    match crate::typeahead::index::duplicate_value(options) {
        Some(value) => Err(ConfigError::DuplicateOption {
            field: field.to_string(),
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}
