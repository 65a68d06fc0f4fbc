//! `package.json` editing.
//!
//! Keys keep their original order (serde_json `preserve_order`), new keys are
//! appended, and output matches npm's own writer: two-space indentation and a
//! trailing newline. Identical edits on identical input are byte-identical.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum ManifestEdit {
    /// Set a top-level key, keeping its position if it already exists.
    Set { key: String, value: Value },
    Remove { key: String },
    /// Keep only the listed entries of the object at `key`, in their original
    /// order. Entries absent from the original are not invented, and a
    /// missing `key` stays missing.
    RetainEntries { key: String, keep: Vec<String> },
    RemoveEntries { key: String, entries: Vec<String> },
    SetEntry {
        key: String,
        entry: String,
        value: Value,
    },
    /// Text substitution inside one string entry of an object (e.g. a script).
    ReplaceInEntry {
        key: String,
        entry: String,
        from: String,
        to: String,
    },
}

impl ManifestEdit {
    pub fn set(key: &str, value: impl Into<Value>) -> Self {
        ManifestEdit::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn remove(key: &str) -> Self {
        ManifestEdit::Remove {
            key: key.to_string(),
        }
    }

    pub fn retain_entries(key: &str, keep: &[&str]) -> Self {
        ManifestEdit::RetainEntries {
            key: key.to_string(),
            keep: keep.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn remove_entries(key: &str, entries: &[&str]) -> Self {
        ManifestEdit::RemoveEntries {
            key: key.to_string(),
            entries: entries.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        let fields: Map<String, Value> = serde_json::from_str(content)?;
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_canonical_string(&self) -> String {
        let mut out = serde_json::to_string_pretty(&self.fields)
            .unwrap_or_else(|_| String::from("{}"));
        out.push('\n');
        out
    }

    pub fn apply(&mut self, edit: &ManifestEdit) {
        match edit {
            ManifestEdit::Set { key, value } => {
                self.fields.insert(key.clone(), value.clone());
            }
            ManifestEdit::Remove { key } => {
                self.fields.shift_remove(key);
            }
            ManifestEdit::RetainEntries { key, keep } => {
                if let Some(Value::Object(map)) = self.fields.get_mut(key) {
                    map.retain(|name, _| keep.contains(name));
                }
            }
            ManifestEdit::RemoveEntries { key, entries } => {
                if let Some(Value::Object(map)) = self.fields.get_mut(key) {
                    for entry in entries {
                        map.shift_remove(entry);
                    }
                }
            }
            ManifestEdit::SetEntry { key, entry, value } => {
                let map = self
                    .fields
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !map.is_object() {
                    *map = Value::Object(Map::new());
                }
                if let Value::Object(map) = map {
                    map.insert(entry.clone(), value.clone());
                }
            }
            ManifestEdit::ReplaceInEntry {
                key,
                entry,
                from,
                to,
            } => {
                if let Some(Value::String(text)) = self
                    .fields
                    .get_mut(key)
                    .and_then(|v| v.get_mut(entry.as_str()))
                {
                    if !from.is_empty() && text.contains(from.as_str()) {
                        *text = text.replace(from.as_str(), to);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PACKAGE: &str = r#"{
  "name": "typescript-starter",
  "version": "10.1.1",
  "bin": {
    "typescript-starter": "./bin/typescript-starter"
  },
  "scripts": {
    "build": "run-p build:*",
    "check-integration-tests": "run-s check-integration-test:*",
    "reset-hard": "git clean -dfx && git reset --hard && npm i"
  },
  "dependencies": {
    "@bitauth/libauth": "^1.17.1",
    "chalk": "^2.4.2"
  }
}
"#;

    #[test]
    fn canonical_output_round_trips_untouched_input() {
        let manifest = Manifest::parse(PACKAGE).unwrap();
        assert_eq!(manifest.to_canonical_string(), PACKAGE);
    }

    #[test]
    fn set_keeps_position_and_appends_new_keys() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::set("version", "1.0.0"));
        manifest.apply(&ManifestEdit::set("keywords", json!([])));
        let keys: Vec<&String> = manifest.fields.keys().collect();
        assert_eq!(
            keys,
            ["name", "version", "bin", "scripts", "dependencies", "keywords"]
        );
        assert_eq!(manifest.get("version"), Some(&json!("1.0.0")));
    }

    #[test]
    fn remove_preserves_order_of_remaining_keys() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::remove("bin"));
        let keys: Vec<&String> = manifest.fields.keys().collect();
        assert_eq!(keys, ["name", "version", "scripts", "dependencies"]);
    }

    #[test]
    fn retain_entries_drops_unlisted_and_skips_absent() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::retain_entries(
            "dependencies",
            &["@bitauth/libauth", "not-present"],
        ));
        assert_eq!(
            manifest.get("dependencies"),
            Some(&json!({ "@bitauth/libauth": "^1.17.1" }))
        );
    }

    #[test]
    fn retain_entries_keeps_original_order() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::retain_entries(
            "dependencies",
            &["chalk", "@bitauth/libauth"],
        ));
        let deps = manifest.get("dependencies").unwrap().as_object().unwrap();
        let names: Vec<&String> = deps.keys().collect();
        assert_eq!(names, ["@bitauth/libauth", "chalk"]);
    }

    #[test]
    fn retain_entries_leaves_missing_key_absent() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::retain_entries("peerDependencies", &["chalk"]));
        assert!(manifest.get("peerDependencies").is_none());
        assert_eq!(manifest.to_canonical_string(), PACKAGE);
    }

    #[test]
    fn retain_nothing_yields_empty_object() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::retain_entries("dependencies", &[]));
        assert!(manifest
            .to_canonical_string()
            .contains("\"dependencies\": {}\n"));
    }

    #[test]
    fn script_edits() {
        let mut manifest = Manifest::parse(PACKAGE).unwrap();
        manifest.apply(&ManifestEdit::remove_entries(
            "scripts",
            &["check-integration-tests"],
        ));
        manifest.apply(&ManifestEdit::SetEntry {
            key: "scripts".into(),
            entry: "preinstall".into(),
            value: json!("node -e \"guard\""),
        });
        manifest.apply(&ManifestEdit::ReplaceInEntry {
            key: "scripts".into(),
            entry: "reset-hard".into(),
            from: "npm i".into(),
            to: "yarn".into(),
        });
        assert_eq!(
            manifest.get("scripts"),
            Some(&json!({
                "build": "run-p build:*",
                "reset-hard": "git clean -dfx && git reset --hard && yarn",
                "preinstall": "node -e \"guard\""
            }))
        );
    }

    #[test]
    fn non_object_manifest_is_rejected() {
        assert!(Manifest::parse("[1, 2]").is_err());
    }
}
