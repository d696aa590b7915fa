//! Classification of GraphQL pagination shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::json::JsonNode;

mod page_info;

pub use page_info::{CursorPageInfo, OffsetPageInfo, PageInfo};

pub(crate) const EDGES: &str = "edges";
pub(crate) const NODES: &str = "nodes";
pub(crate) const ITEMS: &str = "items";
pub(crate) const NODE: &str = "node";
pub(crate) const CURSOR: &str = "cursor";
pub(crate) const PAGE_INFO: &str = "pageInfo";
pub(crate) const TOTAL_COUNT: &str = "totalCount";

/// The pagination shape of a JSON subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaginationType {
    None,
    /// Cursor pagination: `edges { node cursor }` or `nodes`, plus `pageInfo`/`totalCount`.
    Connection,
    /// Offset pagination: `items`, plus `pageInfo`/`totalCount`.
    CollectionSegment,
}

impl PaginationType {
    pub fn is_paginated(self) -> bool {
        !matches!(self, PaginationType::None)
    }
}

impl fmt::Display for PaginationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Connection => write!(f, "connection"),
            Self::CollectionSegment => write!(f, "collection segment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListField {
    Missing,
    Null,
    Array,
    Other,
}

fn list_field<N: JsonNode>(node: &N, name: &str) -> ListField {
    match node.field(name) {
        None => ListField::Missing,
        Some(value) if value.is_array() => ListField::Array,
        Some(value) if value.is_null() => ListField::Null,
        Some(_) => ListField::Other,
    }
}

/// Classifies an object node by its own direct fields.
///
/// `edges` is unambiguous on its own. A `nodes` list only counts as a
/// connection next to `pageInfo` or `totalCount`, since a bare `nodes` list is
/// indistinguishable from an ordinary list field. `items` is a collection
/// segment as long as no `edges`/`nodes` field is present. A `null` list is
/// accepted in place of an empty one when the metadata fields are there.
/// Scalars, arrays and every other object are `None`.
pub fn detect<N: JsonNode>(node: &N) -> PaginationType {
    if !node.is_object() {
        return PaginationType::None;
    }

    let has_metadata = node.has_field(PAGE_INFO) || node.has_field(TOTAL_COUNT);
    let edges = list_field(node, EDGES);
    let nodes = list_field(node, NODES);

    let connection = match (edges, nodes) {
        (ListField::Array, _) => true,
        (ListField::Null, _) if has_metadata => true,
        (_, ListField::Array | ListField::Null) => has_metadata,
        _ => false,
    };
    if connection {
        return PaginationType::Connection;
    }

    if edges == ListField::Missing && nodes == ListField::Missing {
        match list_field(node, ITEMS) {
            ListField::Array => return PaginationType::CollectionSegment,
            ListField::Null if has_metadata => return PaginationType::CollectionSegment,
            _ => {}
        }
    }

    PaginationType::None
}

/// True for an object whose only field is a plain `nodes` list: a
/// connection-looking field queried without any page metadata.
pub(crate) fn is_bare_nodes_list<N: JsonNode>(node: &N) -> bool {
    node.field_count() == 1 && list_field(node, NODES) == ListField::Array
}
