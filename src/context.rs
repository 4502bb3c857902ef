//! Stack parameters supplied from outside: a `deploy.toml` context file and
//! `-c KEY=VALUE` flags, resolved once into a [`StackConfig`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

pub const CONTEXT_FILE: &str = "deploy.toml";
pub const IMAGE_TAG_KEY: &str = "imageTag";
pub const DEFAULT_IMAGE_TAG: &str = "1.27";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct ContextFile {
    #[serde(default)]
    context: toml::Table,
}

/// Scalars become their text form; `imageTag = 1.27` reads as "1.27".
fn scalar_text(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text),
        toml::Value::Integer(number) => Some(number.to_string()),
        toml::Value::Float(number) => Some(number.to_string()),
        toml::Value::Boolean(flag) => Some(flag.to_string()),
        toml::Value::Datetime(datetime) => Some(datetime.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The supplied value, or `default` when the key is missing or empty.
    pub fn resolve(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    /// Reads the `[context]` table of a TOML document. Keys holding arrays or
    /// tables are skipped with a warning.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ContextFile = toml::from_str(content)?;
        let mut context = Self::new();
        for (key, value) in file.context {
            match scalar_text(value) {
                Some(text) => context.insert(key, text),
                None => {
                    log::warn!("Ignoring context key '{key}': only scalar values are supported")
                }
            }
        }
        Ok(context)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read context file {}: {}", path.display(), e))?;
        let context = Self::from_toml(&content)
            .map_err(|e| anyhow!("Invalid context file {}: {}", path.display(), e))?;
        log::debug!(
            "Loaded {} context value(s) from {}",
            context.values.len(),
            path.display()
        );
        Ok(context)
    }

    /// Loads `deploy.toml` from `root` if there is one.
    pub fn find_and_load(root: &Path) -> Result<Self> {
        let path = root.join(CONTEXT_FILE);
        if path.exists() {
            return Self::load_file(&path);
        }
        log::debug!(
            "No {} in {}, starting from an empty context",
            CONTEXT_FILE,
            root.display()
        );
        Ok(Self::new())
    }

    /// Applies `KEY=VALUE` assignments on top of the current values.
    pub fn apply_overrides<'a>(
        &mut self,
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        for assignment in assignments {
            let Some((key, value)) = assignment.split_once('=') else {
                return Err(anyhow!(
                    "Invalid context value: {}. Expected KEY=VALUE format.",
                    assignment
                ));
            };
            if key.is_empty() {
                return Err(anyhow!("Context key cannot be empty in '{}'", assignment));
            }
            self.insert(key, value);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackConfig {
    pub image_tag: String,
}

impl StackConfig {
    pub fn from_context(context: &Context) -> Self {
        StackConfig {
            image_tag: context.resolve(IMAGE_TAG_KEY, DEFAULT_IMAGE_TAG),
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::from_context(&Context::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_values_fall_back() {
        let mut context = Context::new();
        assert_eq!(context.resolve("imageTag", "1.27"), "1.27");
        context.insert("imageTag", "");
        assert_eq!(context.resolve("imageTag", "1.27"), "1.27");
    }

    #[test]
    fn whitespace_is_a_value() {
        let mut context = Context::new();
        context.insert("imageTag", " ");
        assert_eq!(StackConfig::from_context(&context).image_tag, " ");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut context = Context::from_toml(
            r#"
            [context]
            imageTag = "1.25"
            region = "eu-west-1"
            "#,
        )
        .unwrap();
        context
            .apply_overrides(["imageTag=1.25-alpine", "extra=a=b"])
            .unwrap();
        assert_eq!(context.get("imageTag"), Some("1.25-alpine"));
        assert_eq!(context.get("region"), Some("eu-west-1"));
        assert_eq!(context.get("extra"), Some("a=b"));
    }

    #[test]
    fn unquoted_numeric_tag_is_read_as_text() {
        let context = Context::from_toml("[context]\nimageTag = 1.27\n").unwrap();
        assert_eq!(StackConfig::from_context(&context).image_tag, "1.27");
    }

    #[test]
    fn unrelated_non_string_keys_do_not_break_the_file() {
        let context = Context::from_toml(
            r#"
            [context]
            imageTag = "1.25-alpine"
            replicas = 2
            verbose = true
            zones = ["a", "b"]

            [context.nested]
            key = "value"
            "#,
        )
        .unwrap();
        assert_eq!(context.get("imageTag"), Some("1.25-alpine"));
        assert_eq!(context.get("replicas"), Some("2"));
        assert_eq!(context.get("verbose"), Some("true"));
        assert_eq!(context.get("zones"), None);
        assert_eq!(context.get("nested"), None);
    }

    #[test]
    fn override_without_equals_is_rejected() {
        let mut context = Context::new();
        assert!(context.apply_overrides(["imageTag"]).is_err());
        assert!(context.apply_overrides(["=value"]).is_err());
    }

    #[test]
    fn file_without_context_table_is_empty() {
        assert_eq!(Context::from_toml("").unwrap(), Context::new());
        assert!(Context::from_toml("[context\n").is_err());
    }

    #[test]
    fn missing_context_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Context::find_and_load(dir.path()).unwrap(), Context::new());

        std::fs::write(dir.path().join(CONTEXT_FILE), "[context]\nimageTag = \"stable\"\n")
            .unwrap();
        let context = Context::find_and_load(dir.path()).unwrap();
        assert_eq!(StackConfig::from_context(&context).image_tag, "stable");
    }

    #[test]
    fn numeric_tag_in_context_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONTEXT_FILE);
        std::fs::write(&path, "[context]\nimageTag = 1.27\nreplicas = 2\n").unwrap();
        let context = Context::load_file(&path).unwrap();
        assert_eq!(StackConfig::from_context(&context).image_tag, "1.27");
    }
}
