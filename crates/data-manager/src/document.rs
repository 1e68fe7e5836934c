//! Feed paths and the JSON document tree behind a realtime feed
//!
//! Writes follow realtime-database semantics: setting `null` deletes a node,
//! parents left without children disappear with it, and empty objects are
//! never stored.

use clinker_shared::{ClinkerError, ClinkerResult};
use serde_json::{Map, Value};

/// Normalised slash-separated location inside the feed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeedPath {
    segments: Vec<String>,
}

impl FeedPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `"alerts/active"`, `"/alerts/active/"` and similar forms
    pub fn parse(path: &str) -> ClinkerResult<Self> {
        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(bad) = segments
            .iter()
            .find(|segment| segment.contains(['.', '$', '#', '[', ']']))
        {
            return Err(ClinkerError::InvalidPath {
                path: format!("{path} (segment '{bad}')"),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn join(&self, other: &FeedPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// True when `self` equals `other` or lies above it
    pub fn contains(&self, other: &FeedPath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True when a write at one path can change the value at the other
    pub fn overlaps(&self, other: &FeedPath) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl std::fmt::Display for FeedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl std::str::FromStr for FeedPath {
    type Err = ClinkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// JSON tree holding the current feed state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedDocument {
    root: Value,
}

impl FeedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Self {
        Self {
            root: normalize(value),
        }
    }

    /// Value at `path`, `None` when absent
    pub fn get(&self, path: &FeedPath) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = node.as_object()?.get(segment)?;
        }
        (!node.is_null()).then_some(node)
    }

    pub fn snapshot(&self, path: &FeedPath) -> Option<Value> {
        self.get(path).cloned()
    }

    /// Replace the subtree at `path`. `null` removes it.
    pub fn set(&mut self, path: &FeedPath, value: Value) {
        let value = normalize(value);
        if value.is_null() {
            remove_at(&mut self.root, path.segments());
        } else {
            set_at(&mut self.root, path.segments(), value);
        }
    }

    /// Set each child of `path` independently, leaving other children alone
    pub fn update(&mut self, path: &FeedPath, children: Map<String, Value>) {
        for (key, value) in children {
            // Multi-level keys such as "a/b" are allowed in updates
            match FeedPath::parse(&key) {
                Ok(relative) => self.set(&path.join(&relative), value),
                Err(err) => log::warn!("Skipping update child {key}: {err}"),
            }
        }
    }

    pub fn remove(&mut self, path: &FeedPath) {
        remove_at(&mut self.root, path.segments());
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }
}

fn set_at(node: &mut Value, segments: &[String], value: Value) {
    match segments.split_first() {
        None => *node = value,
        Some((first, rest)) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                let child = map.entry(first.clone()).or_insert(Value::Null);
                set_at(child, rest, value);
            }
        }
    }
}

fn remove_at(node: &mut Value, segments: &[String]) {
    let Some((first, rest)) = segments.split_first() else {
        *node = Value::Null;
        return;
    };

    if let Value::Object(map) = node {
        if rest.is_empty() {
            map.shift_remove(first);
        } else if let Some(child) = map.get_mut(first) {
            remove_at(child, rest);
            if child.is_null() {
                map.shift_remove(first);
            }
        }

        if map.is_empty() {
            *node = Value::Null;
        }
    }
}

/// Drop null children and empty objects, recursively
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .map(|(key, child)| (key, normalize(child)))
                .filter(|(_, child)| !child.is_null())
                .collect();
            if cleaned.is_empty() {
                Value::Null
            } else {
                Value::Object(cleaned)
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> FeedPath {
        FeedPath::parse(p).unwrap()
    }

    #[test]
    fn test_path_parsing() {
        assert_eq!(path("/alerts/active/").segments(), ["alerts", "active"]);
        assert!(path("/").is_root());
        assert_eq!(path("live_data").to_string(), "/live_data");
        assert!(FeedPath::parse("bad.key").is_err());
        assert!(FeedPath::parse("a/[0]").is_err());
    }

    #[test]
    fn test_path_relations() {
        let live = path("live_data");
        let node = path("live_data/step1_raw_material/current");
        assert!(live.contains(&node));
        assert!(!node.contains(&live));
        assert!(live.overlaps(&node) && node.overlaps(&live));
        assert!(!live.overlaps(&path("alerts")));
        assert!(FeedPath::root().overlaps(&live));
    }

    #[test]
    fn test_set_and_get() {
        let mut doc = FeedDocument::new();
        doc.set(&path("live_data/step4_kiln/current"), json!({"KilnDrivePower": "150"}));

        assert_eq!(
            doc.get(&path("live_data/step4_kiln/current/KilnDrivePower")),
            Some(&json!("150"))
        );
        assert!(doc.get(&path("live_data/step5_cooling_grinding")).is_none());
    }

    #[test]
    fn test_null_removes_and_prunes() {
        let mut doc = FeedDocument::new();
        doc.set(&path("alerts/active/a1"), json!({"title": "x"}));
        doc.set(&path("alerts/active/a1"), Value::Null);

        assert!(doc.get(&path("alerts/active")).is_none());
        assert!(doc.get(&path("alerts")).is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_empty_objects_are_not_stored() {
        let mut doc = FeedDocument::new();
        doc.set(&path("alerts/active"), json!({}));
        assert!(doc.get(&path("alerts")).is_none());

        doc.set(&path("a"), json!({"b": null, "c": 1}));
        assert_eq!(doc.get(&path("a")), Some(&json!({"c": 1})));
    }

    #[test]
    fn test_update_merges_children() {
        let mut doc = FeedDocument::from_value(json!({"a": {"x": 1, "y": 2}}));
        let mut children = Map::new();
        children.insert("y".to_string(), json!(20));
        children.insert("z".to_string(), json!(30));
        children.insert("x".to_string(), Value::Null);
        doc.update(&path("a"), children);

        assert_eq!(doc.get(&path("a")), Some(&json!({"y": 20, "z": 30})));
    }

    #[test]
    fn test_replace_keeps_key_position() {
        let mut doc = FeedDocument::from_value(json!({"first": 1, "second": 2, "third": 3}));
        doc.set(&path("second"), json!(22));
        doc.remove(&path("first"));

        let keys: Vec<&String> = doc.get(&FeedPath::root()).unwrap().as_object().unwrap().keys().collect();
        assert_eq!(keys, ["second", "third"]);
    }

    #[test]
    fn test_set_through_scalar() {
        let mut doc = FeedDocument::from_value(json!({"a": 5}));
        doc.set(&path("a/b"), json!(1));
        assert_eq!(doc.get(&path("a")), Some(&json!({"b": 1})));
    }
}
