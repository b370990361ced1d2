//! JSON backend
//!
//! Paths are `/`-separated object keys below the current value. An array met
//! while entering a path resolves to its first element; an array met while
//! collecting elements yields every element.

use super::{malformed, DocumentParser, PayloadFormat, Scope, Walker};
use crate::descriptor::Descriptor;
use crate::error::ParseError;
use crate::pool::ResponsePool;
use crate::types::SourceId;
use serde_json::Value as Json;

/// Walks JSON payloads with [`serde_json`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn format(&self) -> PayloadFormat {
        PayloadFormat::Json
    }

    fn parse_all(
        &self,
        data: &[u8],
        descriptors: &[Descriptor],
        pool: &mut ResponsePool,
        source: SourceId,
    ) -> usize {
        let doc: Json = match serde_json::from_slice(data) {
            Ok(doc) => doc,
            Err(e) => return malformed(source, self.format(), &ParseError::from(e)),
        };

        Walker::new(pool, source).run(&JsonScope(&doc), descriptors)
    }
}

#[derive(Clone, Copy)]
struct JsonScope<'a>(&'a Json);

impl<'a> JsonScope<'a> {
    fn lookup(&self, path: &str) -> Option<&'a Json> {
        let mut current = self.0;
        for key in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            current = first(current).get(key)?;
        }
        Some(current)
    }
}

fn first(value: &Json) -> &Json {
    match value {
        Json::Array(items) => items.first().unwrap_or(value),
        _ => value,
    }
}

fn scalar(value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}

impl<'a> Scope for JsonScope<'a> {
    fn enter(&self, path: &str) -> Option<Self> {
        let found = first(self.lookup(path)?);
        found.is_object().then_some(JsonScope(found))
    }

    fn elements(&self, path: &str) -> Vec<Self> {
        match self.lookup(path) {
            Some(Json::Array(items)) => items.iter().map(JsonScope).collect(),
            Some(found @ Json::Object(_)) => vec![JsonScope(found)],
            _ => Vec::new(),
        }
    }

    fn value(&self, path: &str, attr: Option<&str>) -> Option<String> {
        let found = self.lookup(path)?;
        match attr {
            Some(key) => scalar(first(found).get(key)?),
            None => scalar(first(found)),
        }
    }

    fn strings(&self, path: &str) -> Vec<String> {
        match self.lookup(path) {
            Some(Json::Array(items)) => items.iter().filter_map(scalar).collect(),
            Some(other) => scalar(other).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_paths() {
        let doc = json!({
            "status": {"code": 0, "msg": "Success"},
            "metadata": {"music": [{"title": "A", "album": {"name": "X"}}, {"title": "B"}]},
            "flag": null
        });
        let root = JsonScope(&doc);

        assert_eq!(root.value("status/code", None).as_deref(), Some("0"));
        assert_eq!(root.value("status", Some("msg")).as_deref(), Some("Success"));
        assert_eq!(root.elements("metadata/music").len(), 2);
        assert_eq!(root.value("metadata/music/album/name", None).as_deref(), Some("X"));
        assert!(root.value("flag", None).is_none());
        assert!(root.value("missing/deeper", None).is_none());
        assert!(root.enter("status/code").is_none(), "scalars are not scopes");
    }

    #[test]
    fn test_strings_skip_non_scalars() {
        let doc = json!({"roles": ["Composer", {"nested": true}, "Conductor"], "single": "Only"});
        let root = JsonScope(&doc);

        assert_eq!(root.strings("roles"), vec!["Composer", "Conductor"]);
        assert_eq!(root.strings("single"), vec!["Only"]);
        assert!(root.strings("absent").is_empty());
    }
}
