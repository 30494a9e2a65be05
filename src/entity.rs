//! candidate entities and their labels
//!
//! entities are read from JSON (JSON5 accepted) in either of two shapes:
//! - an array: `[{ "name": "node-1", "labels": { "role": "controller" } }, ...]`
//! - an object keyed by name: `{ "node-1": { "role": "controller" }, ... }`
//!
//! scalar label values are stringified; `null` becomes an empty value

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::filter::Labels;

/// an entity that can be matched against a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// add a label (builder style)
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

impl Labels for Entity {
    fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// read entities from a file, or from stdin when the path is `-` or absent
pub fn read_entities(path: Option<&Path>) -> Result<Vec<Entity>> {
    let content = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file: {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read entities from stdin")?;
            buf
        }
    };

    parse_entities(&content)
}

/// parse entities from JSON/JSON5 text
pub fn parse_entities(content: &str) -> Result<Vec<Entity>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json: JsonValue = json5::from_str(content).context("Failed to parse entities")?;

    match json {
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_entity_entry(item, &format!("[{}]", i)))
            .collect(),
        JsonValue::Object(map) => map
            .iter()
            .map(|(name, labels)| {
                Ok(Entity {
                    name: name.clone(),
                    labels: parse_labels(labels, name)?,
                })
            })
            .collect(),
        other => Err(anyhow!(
            "expected an array or object of entities, got {}",
            json_type_name(&other)
        )),
    }
}

fn parse_entity_entry(item: &JsonValue, path: &str) -> Result<Entity> {
    let obj = item
        .as_object()
        .ok_or_else(|| anyhow!("{}: entity must be an object", path))?;

    let name = match obj.get("name") {
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => bail!("{}.name: expected string, got {}", path, json_type_name(other)),
        None => bail!("{}: entity is missing 'name'", path),
    };

    let labels = match obj.get("labels") {
        Some(labels) => parse_labels(labels, &format!("{}.labels", path))?,
        None => BTreeMap::new(),
    };

    Ok(Entity { name, labels })
}

fn parse_labels(json: &JsonValue, path: &str) -> Result<BTreeMap<String, String>> {
    let obj = match json {
        JsonValue::Object(obj) => obj,
        JsonValue::Null => return Ok(BTreeMap::new()),
        other => bail!(
            "{}: labels must be an object, got {}",
            path,
            json_type_name(other)
        ),
    };

    obj.iter()
        .map(|(key, value)| {
            let value = label_value(value)
                .ok_or_else(|| anyhow!("{}.{}: label values must be scalars", path, key))?;
            Ok((key.clone(), value))
        })
        .collect()
}

/// stringify a scalar label value
fn label_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => Some(String::new()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                // JSON5 may hand integers over as floats
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < 1e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// every label name seen across a set of entities
pub fn known_labels(entities: &[Entity]) -> Vec<&str> {
    let mut names: Vec<&str> = entities
        .iter()
        .flat_map(|e| e.labels.keys().map(String::as_str))
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}
