//! XML backend
//!
//! Paths are `/`-separated element local names below the current element;
//! `*` matches any element and `.` is the current element itself.

use super::{malformed, DocumentParser, PayloadFormat, Scope, Walker};
use crate::descriptor::Descriptor;
use crate::error::ParseError;
use crate::pool::ResponsePool;
use crate::types::SourceId;
use roxmltree::{Document, Node};
use std::borrow::Cow;

/// Walks XML payloads with [`roxmltree`]
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl DocumentParser for XmlParser {
    fn format(&self) -> PayloadFormat {
        PayloadFormat::Xml
    }

    fn parse_all(
        &self,
        data: &[u8],
        descriptors: &[Descriptor],
        pool: &mut ResponsePool,
        source: SourceId,
    ) -> usize {
        let text = match std::str::from_utf8(data) {
            Ok(text) => strip_default_namespace(text),
            Err(e) => return malformed(source, self.format(), &ParseError::from(e)),
        };
        let doc = match Document::parse(&text) {
            Ok(doc) => doc,
            Err(e) => return malformed(source, self.format(), &ParseError::from(e)),
        };

        Walker::new(pool, source).run(&XmlScope(doc.root_element()), descriptors)
    }
}

/// Blank out a default namespace declaration (`xmlns="..."`).
///
/// Prefixed declarations are kept so prefixed elements still resolve.
pub(crate) fn strip_default_namespace(text: &str) -> Cow<'_, str> {
    let mut search = 0;
    while let Some(found) = text[search..].find("xmlns") {
        let start = search + found;
        let rest = &text[start + "xmlns".len()..];
        let after_name = rest.trim_start();
        let preceded_by_space = text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);

        if preceded_by_space && after_name.starts_with('=') {
            let value = after_name[1..].trim_start();
            if let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') {
                if let Some(close) = value[1..].find(quote) {
                    let value_offset = text.len() - value.len();
                    let end = value_offset + 1 + close + 1;
                    let mut owned = String::with_capacity(text.len());
                    owned.push_str(&text[..start]);
                    owned.extend(std::iter::repeat(' ').take(end - start));
                    owned.push_str(&text[end..]);
                    return Cow::Owned(owned);
                }
            }
        }
        search = start + "xmlns".len();
    }
    Cow::Borrowed(text)
}

#[derive(Clone, Copy)]
struct XmlScope<'a, 'input>(Node<'a, 'input>);

impl<'a, 'input> XmlScope<'a, 'input> {
    fn select(&self, path: &str) -> Vec<Node<'a, 'input>> {
        let mut current = vec![self.0];
        for step in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            current = current
                .iter()
                .flat_map(|node| node.children())
                .filter(|child| child.is_element())
                .filter(|child| step == "*" || child.tag_name().name() == step)
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

/// Text of a leaf element as written; nested text is joined and trimmed
fn element_text(node: Node<'_, '_>) -> String {
    if node.children().any(|c| c.is_element()) {
        node.descendants()
            .filter(|d| d.is_text())
            .filter_map(|d| d.text())
            .collect::<String>()
            .trim()
            .to_string()
    } else {
        node.text().unwrap_or_default().to_string()
    }
}

impl<'a, 'input> Scope for XmlScope<'a, 'input> {
    fn enter(&self, path: &str) -> Option<Self> {
        self.select(path).into_iter().next().map(XmlScope)
    }

    fn elements(&self, path: &str) -> Vec<Self> {
        self.select(path).into_iter().map(XmlScope).collect()
    }

    fn value(&self, path: &str, attr: Option<&str>) -> Option<String> {
        let node = self.select(path).into_iter().next()?;
        match attr {
            Some(name) => node.attribute(name).map(str::to_string),
            None => Some(element_text(node)),
        }
    }

    fn strings(&self, path: &str) -> Vec<String> {
        self.select(path).into_iter().map(element_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_default_namespace() {
        let doc = r#"<metadata xmlns="http://musicbrainz.org/ns/mmd-2.0#" xmlns:ext="urn:ext"><a/></metadata>"#;
        let stripped = strip_default_namespace(doc);

        assert_eq!(stripped.len(), doc.len());
        assert!(!stripped.contains("mmd-2.0"));
        assert!(stripped.contains(r#"xmlns:ext="urn:ext""#));
        assert!(Document::parse(&stripped).is_ok());
    }

    #[test]
    fn test_no_namespace_is_borrowed() {
        let doc = "<metadata><xmlnsish/></metadata>";
        assert!(matches!(strip_default_namespace(doc), Cow::Borrowed(_)));
    }

    #[test]
    fn test_path_selection() {
        let doc = Document::parse(
            r#"<metadata><recording id="r1"><title>Song</title>
               <release-list><release><title>A</title></release><release><title>B</title></release></release-list>
               </recording></metadata>"#,
        )
        .unwrap();
        let root = XmlScope(doc.root_element());

        assert_eq!(root.value("recording", Some("id")).as_deref(), Some("r1"));
        assert_eq!(root.value("recording/title", None).as_deref(), Some("Song"));
        assert_eq!(root.elements("recording/release-list/release").len(), 2);
        assert_eq!(root.strings("recording/release-list/*/title"), vec!["A", "B"]);
        assert!(root.value("recording/length", None).is_none());

        let recording = root.enter("recording").unwrap();
        assert_eq!(recording.value(".", Some("id")).as_deref(), Some("r1"));
    }
}
