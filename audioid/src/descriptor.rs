//! Declarative parse instructions
//!
//! A descriptor list is a static table walked by both document backends.
//! Nodes address the document with a `/`-separated path relative to the
//! current scope; `.` addresses the scope itself.
//!
//! Every list ends with an [`NodeKind::End`] node. Tables are built once as
//! `static` data and never mutated.

use crate::types::AttributeKey;

/// What a descriptor node does when visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Mutate parse state without reading the document (e.g. install a join phrase)
    Set,
    /// Read one scalar value
    Data,
    /// Descend into one nested scope
    Tree,
    /// Run the children once per element of a document array
    Array,
    /// Match a flat list of strings against a role table
    DataArray,
    /// List terminator
    End,
}

/// Role name to target key, for [`NodeKind::DataArray`] nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMapping {
    pub name: &'static str,
    pub key: AttributeKey,
}

/// One parse instruction
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub kind: NodeKind,
    /// Target key; for `Tree`/`Array` nodes, `Top` finalizes a candidate
    pub key: AttributeKey,
    /// Path relative to the current scope. For `Set` nodes, the literal value.
    pub path: &'static str,
    /// XML attribute name (JSON: one extra key below `path`)
    pub attr: Option<&'static str>,
    pub children: Option<&'static [Descriptor]>,
    pub roles: Option<&'static [RoleMapping]>,
}

impl Descriptor {
    pub const fn data(path: &'static str, key: AttributeKey) -> Self {
        Self {
            kind: NodeKind::Data,
            key,
            path,
            attr: None,
            children: None,
            roles: None,
        }
    }

    /// Read an attribute of the element at `path`
    pub const fn attr(path: &'static str, attr: &'static str, key: AttributeKey) -> Self {
        Self {
            kind: NodeKind::Data,
            key,
            path,
            attr: Some(attr),
            children: None,
            roles: None,
        }
    }

    pub const fn set(key: AttributeKey, value: &'static str) -> Self {
        Self {
            kind: NodeKind::Set,
            key,
            path: value,
            attr: None,
            children: None,
            roles: None,
        }
    }

    pub const fn tree(path: &'static str, key: AttributeKey, children: &'static [Descriptor]) -> Self {
        Self {
            kind: NodeKind::Tree,
            key,
            path,
            attr: None,
            children: Some(children),
            roles: None,
        }
    }

    pub const fn array(path: &'static str, key: AttributeKey, children: &'static [Descriptor]) -> Self {
        Self {
            kind: NodeKind::Array,
            key,
            path,
            attr: None,
            children: Some(children),
            roles: None,
        }
    }

    /// `key` names the already-populated field copied to each matched role
    pub const fn data_array(
        path: &'static str,
        key: AttributeKey,
        roles: &'static [RoleMapping],
    ) -> Self {
        Self {
            kind: NodeKind::DataArray,
            key,
            path,
            attr: None,
            children: None,
            roles: Some(roles),
        }
    }

    pub const fn end() -> Self {
        Self {
            kind: NodeKind::End,
            key: AttributeKey::Tree,
            path: "",
            attr: None,
            children: None,
            roles: None,
        }
    }

    /// Closing this node finalizes one candidate
    pub fn is_top(&self) -> bool {
        self.key == AttributeKey::Top
    }
}

/// Why a descriptor table is malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorDefect {
    /// List does not end with an `End` node
    Unterminated { path: String },
    /// `Tree`/`Array` node without children
    MissingChildren { path: String },
    /// `DataArray` node without a role table
    MissingRoles { path: String },
}

/// Check a descriptor table and every nested table
pub fn validate(list: &[Descriptor]) -> Result<(), DescriptorDefect> {
    validate_at(list, "")
}

fn validate_at(list: &[Descriptor], scope: &str) -> Result<(), DescriptorDefect> {
    match list.last() {
        Some(last) if last.kind == NodeKind::End => {}
        _ => {
            return Err(DescriptorDefect::Unterminated {
                path: scope.to_string(),
            })
        }
    }

    for node in list {
        let path = format!("{}/{}", scope, node.path);
        match node.kind {
            NodeKind::Tree | NodeKind::Array => match node.children {
                Some(children) => validate_at(children, &path)?,
                None => return Err(DescriptorDefect::MissingChildren { path }),
            },
            NodeKind::DataArray if node.roles.is_none() => {
                return Err(DescriptorDefect::MissingRoles { path })
            }
            _ => {}
        }
    }
    Ok(())
}
