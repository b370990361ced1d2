//! Descriptor-driven parse engine
//!
//! Two backends, XML and JSON, walk the same [`Descriptor`] tables and
//! populate a [`ResponsePool`] identically. Each backend only knows how to
//! address its document format (the [`Scope`] trait); the traversal rules
//! live once, in [`Walker`].
//!
//! Traversal rules:
//! - `Set` installs state without reading the document.
//! - `Data` reads one scalar; a missing value is skipped.
//! - `Tree` descends into one nested scope; a `Top` tree finalizes a candidate.
//! - `Array` runs its children per element; a `Top` array finalizes per element.
//! - `DataArray` copies an already populated field to role-specific keys.
//!
//! A malformed document yields zero candidates and a warning.

mod json;
mod xml;

pub use json::JsonParser;
pub use xml::XmlParser;

use crate::descriptor::{Descriptor, NodeKind};
use crate::pool::ResponsePool;
use crate::types::{parse_finite, AttributeKey, SourceId, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, trace, warn};

/// Wire format of a service payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    Xml,
    Json,
}

impl PayloadFormat {
    /// File extension used for payload dumps and replay files
    pub fn extension(self) -> &'static str {
        match self {
            PayloadFormat::Xml => "xml",
            PayloadFormat::Json => "json",
        }
    }

    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xml" => Some(PayloadFormat::Xml),
            "json" => Some(PayloadFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Document backend
pub trait DocumentParser {
    fn format(&self) -> PayloadFormat;

    /// Parse one payload into `pool`, returning the number of candidates
    /// finalized. Malformed payloads yield zero.
    fn parse_all(
        &self,
        data: &[u8],
        descriptors: &[Descriptor],
        pool: &mut ResponsePool,
        source: SourceId,
    ) -> usize;
}

/// Backend for a wire format
pub fn parser_for(format: PayloadFormat) -> &'static dyn DocumentParser {
    match format {
        PayloadFormat::Xml => &XmlParser,
        PayloadFormat::Json => &JsonParser,
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// A position inside a parsed document
pub(crate) trait Scope: Sized {
    /// First nested scope at `path`
    fn enter(&self, path: &str) -> Option<Self>;

    /// Every element at `path`
    fn elements(&self, path: &str) -> Vec<Self>;

    /// Scalar at `path`, or the named attribute of the element at `path`
    fn value(&self, path: &str, attr: Option<&str>) -> Option<String>;

    /// Flat list of strings at `path`
    fn strings(&self, path: &str) -> Vec<String>;
}

/// Applies descriptor tables to a document, writing into a pool
pub(crate) struct Walker<'p> {
    pool: &'p mut ResponsePool,
    source: SourceId,
}

impl<'p> Walker<'p> {
    pub(crate) fn new(pool: &'p mut ResponsePool, source: SourceId) -> Self {
        Self { pool, source }
    }

    /// Walk a full document and close the pass
    pub(crate) fn run<S: Scope>(mut self, root: &S, descriptors: &[Descriptor]) -> usize {
        let start = self.pool.current_index();
        self.walk(root, descriptors, 0);
        self.pool.discard_pending();

        let count = self.pool.current_index() - start;
        debug!(source = %self.source, candidates = count, "Parse pass complete");
        count
    }

    fn walk<S: Scope>(&mut self, scope: &S, list: &[Descriptor], level: usize) {
        for node in list {
            trace!(
                "{:indent$}{:?} {} -> {}",
                "",
                node.kind,
                node.path,
                node.key,
                indent = level * 2
            );

            match node.kind {
                NodeKind::End => break,
                NodeKind::Set => self.apply_set(node),
                NodeKind::Data => match scope.value(node.path, node.attr) {
                    Some(raw) => self.apply_data(node.key, &raw, level),
                    None => trace!("{:indent$}absent", "", indent = level * 2),
                },
                NodeKind::Tree => {
                    if let (Some(inner), Some(children)) = (scope.enter(node.path), node.children) {
                        self.walk(&inner, children, level + 1);
                        if node.is_top() {
                            self.pool.finalize(self.source);
                        }
                    }
                }
                NodeKind::Array => {
                    let Some(children) = node.children else {
                        continue;
                    };
                    let elements = scope.elements(node.path);
                    trace!(
                        "{:indent$}{} elements",
                        "",
                        elements.len(),
                        indent = level * 2
                    );
                    for element in &elements {
                        self.walk(element, children, level + 1);
                        if node.is_top() {
                            self.pool.finalize(self.source);
                        }
                    }
                    self.pool.clear_join_phrase();
                }
                NodeKind::DataArray => self.apply_roles(scope, node, level),
            }
        }
    }

    fn apply_set(&mut self, node: &Descriptor) {
        match node.key {
            AttributeKey::JoinPhrase => self.pool.install_join_phrase(node.path),
            AttributeKey::ArtistType => self.arm_role(node.path),
            key => {
                let index = self.pool.current_index();
                self.pool.set_value(index, key, node.path);
            }
        }
    }

    fn apply_data(&mut self, key: AttributeKey, raw: &str, level: usize) {
        let index = self.pool.current_index();
        trace!(
            "{:indent$}set {} {} = {}",
            "",
            index,
            key,
            raw,
            indent = level * 2
        );

        match key {
            AttributeKey::JoinPhrase => self.pool.install_join_phrase(raw),
            AttributeKey::ArtistType => self.arm_role(raw),
            AttributeKey::Month => self.apply_month(index, raw),
            AttributeKey::AudioIdScore => match parse_finite(raw) {
                Some(score) => {
                    self.pool
                        .set_number(index, key, score * self.source.score_scale());
                }
                None => debug!(source = %self.source, value = raw, "Unparseable score skipped"),
            },
            AttributeKey::Duration => match parse_finite(raw) {
                Some(duration) => {
                    let ms = (duration * self.source.duration_scale()).round();
                    self.pool.set_number(index, key, ms);
                }
                None => debug!(source = %self.source, value = raw, "Unparseable duration skipped"),
            },
            _ => {
                self.pool.set_value(index, key, raw);
            }
        }
    }

    /// Arm a role redirect from an artist relation type
    fn arm_role(&mut self, raw: &str) {
        let lower = raw.to_lowercase();
        if lower.contains("conductor") {
            self.pool.arm_redirect(AttributeKey::Conductor);
        } else if lower.contains("composer") {
            self.pool.arm_redirect(AttributeKey::Composer);
        } else {
            self.pool.clear_redirect();
        }
    }

    /// Append a month to an existing date, else keep it aside
    fn apply_month(&mut self, index: usize, raw: &str) {
        let month = raw.trim();
        let date = self
            .pool
            .get(index)
            .and_then(|record| record.text(AttributeKey::Date))
            .map(Cow::into_owned);

        match date {
            Some(date) => {
                let combined = match month.parse::<u32>() {
                    Ok(m) => format!("{}-{:02}", date, m),
                    Err(_) => format!("{}-{}", date, month),
                };
                self.pool
                    .store(index, AttributeKey::Date, Value::Str(combined));
            }
            None => {
                self.pool
                    .store(index, AttributeKey::Month, Value::from(month));
            }
        }
    }

    fn apply_roles<S: Scope>(&mut self, scope: &S, node: &Descriptor, level: usize) {
        let Some(roles) = node.roles else {
            return;
        };
        let index = self.pool.current_index();

        for name in scope.strings(node.path) {
            let Some(role) = roles.iter().find(|r| r.name == name) else {
                continue;
            };
            let value = self
                .pool
                .get(index)
                .and_then(|record| record.text(node.key))
                .map(Cow::into_owned);
            if let Some(value) = value {
                trace!(
                    "{:indent$}role {} {} = {}",
                    "",
                    name,
                    role.key,
                    value,
                    indent = level * 2
                );
                self.pool.set_value(index, role.key, &value);
            }
        }
    }
}

/// Log a rejected payload and report zero candidates
pub(crate) fn malformed(source: SourceId, format: PayloadFormat, err: &crate::error::ParseError) -> usize {
    warn!(source = %source, format = %format, error = %err, "Malformed payload, no candidates");
    0
}
