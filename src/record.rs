use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First sighting of a snake; only consulted when ordering the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstAppearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One catalogued snake: the few fields the generator acts on, plus whatever
/// else the data file carries, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "firstAppearance", skip_serializing_if = "Option::is_none")]
    pub first_appearance: Option<FirstAppearance>,
    #[serde(rename = "snakeNumber", skip_serializing_if = "Option::is_none")]
    pub snake_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads every `*.json` record in `data_dir`. Entries are visited in sorted
/// filename order so the stable sort downstream sees the same input order on
/// every platform. Returns the records and the count of skipped entries.
pub fn load_snakes(data_dir: &Path) -> Result<(Vec<Snake>, usize)> {
    let mut names: Vec<_> = fs::read_dir(data_dir)
        .with_context(|| format!("reading data directory {}", data_dir.display()))?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("listing {}", data_dir.display()))?;
    names.sort();

    let mut snakes = Vec::new();
    let mut skipped = 0usize;

    for name in names {
        let path = data_dir.join(&name);
        let stem = match json_stem(&path) {
            Some(stem) => stem,
            None => {
                warn!("unknown file in data directory: {:?}", name);
                skipped += 1;
                continue;
            }
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut snake: Snake = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;

        // The file name is authoritative, whatever the body says.
        snake.id = stem;
        snakes.push(snake);
    }

    Ok((snakes, skipped))
}

fn json_stem(path: &Path) -> Option<String> {
    if path.extension().and_then(OsStr::to_str) != Some("json") {
        return None;
    }
    path.file_stem().and_then(OsStr::to_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_pass_through() {
        let snake: Snake = serde_json::from_str(
            r#"{"name":"Sidney","habitat":{"biome":"desert"},"firstAppearance":{"date":"2020-01-01","epoch":"early"}}"#,
        )
        .unwrap();

        assert_eq!(snake.extra.get("name"), Some(&Value::from("Sidney")));
        assert!(snake.extra.contains_key("habitat"));
        let fa = snake.first_appearance.as_ref().unwrap();
        assert_eq!(fa.date.as_deref(), Some("2020-01-01"));
        assert_eq!(fa.extra.get("epoch"), Some(&Value::from("early")));

        let back = serde_json::to_value(&snake).unwrap();
        assert_eq!(back.get("name"), Some(&Value::from("Sidney")));
        assert_eq!(
            back.pointer("/firstAppearance/epoch"),
            Some(&Value::from("early"))
        );
    }

    #[test]
    fn unset_fields_are_omitted_when_serialized() {
        let snake: Snake = serde_json::from_str(r#"{"name":"Monty"}"#).unwrap();
        let value = serde_json::to_value(&snake).unwrap();

        assert!(value.get("snakeNumber").is_none());
        assert!(value.get("images").is_none());
        assert!(value.get("firstAppearance").is_none());
    }

    #[test]
    fn json_stem_matches_only_json_files() {
        assert_eq!(json_stem(Path::new("data/adder.json")), Some("adder".to_owned()));
        assert_eq!(json_stem(Path::new("data/readme.md")), None);
        assert_eq!(json_stem(Path::new("data/adder.png")), None);
    }
}
