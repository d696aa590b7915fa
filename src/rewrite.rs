//! Depth-first rewrite of connection and collection segment shapes into flat
//! lists that plain structural deserialization can bind.
//!
//! The operation root is replaced by its bare element array and its page
//! metadata is handed back in [`Rewritten`]. Shapes found deeper in the tree
//! are replaced in place by a canonical page object,
//!
//! ```json
//! { "results": [...], "totalCount": 2, "pageInfo": { ... }, "paginationType": "Connection" }
//! ```
//!
//! which the result wrappers in [`crate::results`] know how to read.

use tracing::{debug, warn};

use crate::json::JsonNode;
use crate::pagination::{
    detect, is_bare_nodes_list, PageInfo, PaginationType, CURSOR, EDGES, ITEMS, NODE, NODES,
    PAGE_INFO, TOTAL_COUNT,
};

pub(crate) const RESULTS: &str = "results";
pub(crate) const PAGINATION_TYPE: &str = "paginationType";

/// An operation result after rewriting.
#[derive(Debug, Clone)]
pub struct Rewritten<N> {
    /// Flat element array for paginated roots; otherwise the rewritten node.
    pub node: N,
    /// `None` for scalars and `null`, which carry no shape at all.
    pub pagination: Option<PaginationType>,
    pub total_count: Option<u64>,
    pub page_info: Option<PageInfo>,
}

impl<N: JsonNode> Rewritten<N> {
    /// The rewrite of an absent operation result.
    pub fn empty() -> Self {
        Self {
            node: N::null(),
            pagination: None,
            total_count: None,
            page_info: None,
        }
    }
}

struct FlatPage<N> {
    pagination: PaginationType,
    items: Vec<N>,
    total_count: Option<u64>,
    page_info: Option<PageInfo>,
}

impl<N: JsonNode> FlatPage<N> {
    fn into_canonical(self) -> N {
        let mut node = N::object();
        node.set_field(RESULTS, N::array(self.items));
        if let Some(count) = self.total_count {
            node.set_field(TOTAL_COUNT, N::number(count));
        }
        if let Some(info) = &self.page_info {
            node.set_field(PAGE_INFO, info.to_node());
        }
        let tag = match self.pagination {
            PaginationType::Connection => "Connection",
            PaginationType::CollectionSegment => "CollectionSegment",
            PaginationType::None => "None",
        };
        node.set_field(PAGINATION_TYPE, N::string(tag));
        node
    }
}

/// Rewrites one operation's result subtree.
pub fn rewrite<N: JsonNode>(mut node: N) -> Rewritten<N> {
    if !node.is_object() && !node.is_array() {
        return Rewritten {
            node,
            pagination: None,
            total_count: None,
            page_info: None,
        };
    }

    match detect(&node) {
        PaginationType::None => {
            rewrite_nested(&mut node);
            Rewritten {
                node,
                pagination: Some(PaginationType::None),
                total_count: None,
                page_info: None,
            }
        }
        pagination => {
            let page = flatten(node, pagination);
            Rewritten {
                node: N::array(page.items),
                pagination: Some(page.pagination),
                total_count: page.total_count,
                page_info: page.page_info,
            }
        }
    }
}

fn rewrite_nested<N: JsonNode>(node: &mut N) {
    match detect(node) {
        PaginationType::None => {
            if is_bare_nodes_list(node) {
                if let Some(nodes) = node.take_field(NODES) {
                    *node = nodes;
                }
            }
            for child in node.children_mut() {
                rewrite_nested(child);
            }
        }
        pagination => {
            let taken = std::mem::replace(node, N::null());
            *node = flatten(taken, pagination).into_canonical();
        }
    }
}

fn take_list<N: JsonNode>(node: &mut N, name: &str) -> Option<Vec<N>> {
    node.take_field(name)
        .and_then(|list| list.into_elements().ok())
}

fn flatten<N: JsonNode>(mut node: N, pagination: PaginationType) -> FlatPage<N> {
    let total_count = node.field(TOTAL_COUNT).and_then(JsonNode::as_u64);
    let page_info = node
        .field(PAGE_INFO)
        .and_then(|info| PageInfo::read(info, pagination));

    let mut items = match pagination {
        PaginationType::Connection => match take_list(&mut node, EDGES) {
            Some(edges) => edges.into_iter().map(unwrap_edge).collect(),
            None => take_list(&mut node, NODES).unwrap_or_default(),
        },
        PaginationType::CollectionSegment => take_list(&mut node, ITEMS).unwrap_or_default(),
        PaginationType::None => Vec::new(),
    };

    for item in &mut items {
        rewrite_nested(item);
    }

    debug!(
        %pagination,
        items = items.len(),
        total_count,
        has_page_info = page_info.is_some(),
        "flattened paginated field"
    );

    FlatPage {
        pagination,
        items,
        total_count,
        page_info,
    }
}

/// Replaces an edge by its node, carrying the edge cursor over onto the node.
///
/// A `null` node stays `null` and loses its cursor, so nullable nodes need
/// an `Option<T>` element type.
fn unwrap_edge<N: JsonNode>(mut edge: N) -> N {
    let Some(mut node) = edge.take_field(NODE) else {
        return edge;
    };

    let cursor = edge.take_field(CURSOR).filter(|cursor| !cursor.is_null());
    if let Some(cursor) = cursor {
        if node.is_null() {
            debug!(
                cursor = cursor.as_str().unwrap_or_default(),
                "edge cursor dropped for null node"
            );
        } else if node.is_object() {
            if let Some(existing) = node.field(CURSOR) {
                if existing.as_str() != cursor.as_str() {
                    warn!(
                        existing = existing.as_str().unwrap_or_default(),
                        cursor = cursor.as_str().unwrap_or_default(),
                        "node field `cursor` overwritten by its edge cursor"
                    );
                }
            }
            node.set_field(CURSOR, cursor);
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::pagination::{CursorPageInfo, OffsetPageInfo};

    #[test]
    fn test_connection_root_becomes_flat_array() {
        let node = json!({
            "totalCount": 2,
            "pageInfo": { "hasNextPage": true, "endCursor": "Mg==" },
            "edges": [
                { "cursor": "MQ==", "node": { "name": "a" } },
                { "cursor": "Mg==", "node": { "name": "b" } }
            ]
        });

        let rewritten = rewrite(node);
        assert_eq!(rewritten.pagination, Some(PaginationType::Connection));
        assert_eq!(rewritten.total_count, Some(2));
        assert_eq!(
            rewritten.page_info,
            Some(PageInfo::Cursor(CursorPageInfo {
                end_cursor: Some("Mg==".to_string()),
                has_next_page: Some(true),
                ..Default::default()
            }))
        );
        assert_eq!(
            rewritten.node,
            json!([
                { "name": "a", "cursor": "MQ==" },
                { "name": "b", "cursor": "Mg==" }
            ])
        );
    }

    #[test]
    fn test_edge_cursor_overwrites_node_cursor() {
        let node = json!({ "edges": [{ "cursor": "edge", "node": { "cursor": "own" } }] });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.node, json!([{ "cursor": "edge" }]));
    }

    #[test]
    fn test_nodes_connection_gets_no_cursor() {
        let node = json!({ "nodes": [{ "id": 1 }], "totalCount": 1 });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.pagination, Some(PaginationType::Connection));
        assert_eq!(rewritten.page_info, None);
        assert_eq!(rewritten.node, json!([{ "id": 1 }]));
    }

    #[test]
    fn test_collection_segment_root() {
        let node = json!({
            "items": [{ "id": 1 }, { "id": 2 }],
            "pageInfo": { "hasNextPage": false, "hasPreviousPage": true }
        });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.pagination, Some(PaginationType::CollectionSegment));
        assert_eq!(rewritten.total_count, None);
        assert_eq!(
            rewritten.page_info,
            Some(PageInfo::Offset(OffsetPageInfo {
                has_next_page: Some(false),
                has_previous_page: Some(true),
            }))
        );
        assert_eq!(rewritten.node, json!([{ "id": 1 }, { "id": 2 }]));
    }

    #[test]
    fn test_flat_array_is_unchanged() {
        let node = json!([{ "id": 1, "tags": ["a", "b"] }]);
        let rewritten = rewrite(node.clone());
        assert_eq!(rewritten.pagination, Some(PaginationType::None));
        assert_eq!(rewritten.node, node);
    }

    #[test]
    fn test_bare_nodes_unwrapped_to_plain_array() {
        let node = json!({ "nodes": [{ "id": "t1" }, { "id": "t2" }] });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.pagination, Some(PaginationType::None));
        assert_eq!(rewritten.node, json!([{ "id": "t1" }, { "id": "t2" }]));
    }

    #[test]
    fn test_nested_connection_becomes_canonical_object() {
        let node = json!({
            "edges": [{
                "cursor": "A",
                "node": {
                    "name": "X",
                    "authors": {
                        "totalCount": 1,
                        "edges": [{ "cursor": "B", "node": { "firstName": "Y" } }]
                    }
                }
            }]
        });

        let rewritten = rewrite(node);
        assert_eq!(
            rewritten.node,
            json!([{
                "name": "X",
                "authors": {
                    "results": [{ "firstName": "Y", "cursor": "B" }],
                    "totalCount": 1,
                    "paginationType": "Connection"
                },
                "cursor": "A"
            }])
        );
    }

    #[test]
    fn test_nested_segment_under_plain_object() {
        let node = json!({
            "shelf": {
                "books": { "items": [{ "title": "t" }], "pageInfo": { "hasNextPage": true } }
            }
        });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.pagination, Some(PaginationType::None));
        assert_eq!(
            rewritten.node,
            json!({
                "shelf": {
                    "books": {
                        "results": [{ "title": "t" }],
                        "pageInfo": { "hasNextPage": true },
                        "paginationType": "CollectionSegment"
                    }
                }
            })
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let node = json!({
            "edges": [{ "cursor": "A", "node": { "tags": { "items": [1], "totalCount": 1 } } }]
        });
        let once = rewrite(node);
        let twice = rewrite(once.node.clone());
        assert_eq!(twice.pagination, Some(PaginationType::None));
        assert_eq!(twice.node, once.node);
    }

    #[test]
    fn test_scalars_have_no_pagination() {
        let rewritten = rewrite(json!("hello"));
        assert_eq!(rewritten.pagination, None);
        let rewritten = rewrite(Value::Null);
        assert_eq!(rewritten.pagination, None);
    }

    #[test]
    fn test_edge_without_node_is_kept() {
        let node = json!({ "edges": [{ "cursor": "A", "id": 1 }] });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.node, json!([{ "cursor": "A", "id": 1 }]));
    }

    #[test]
    fn test_null_node_stays_null() {
        let node = json!({
            "edges": [
                { "cursor": "A", "node": { "id": 1 } },
                { "cursor": "B", "node": null }
            ]
        });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.node, json!([{ "id": 1, "cursor": "A" }, null]));
    }

    #[test]
    fn test_null_edges_with_metadata_is_empty_page() {
        let node = json!({ "edges": null, "totalCount": 0 });
        let rewritten = rewrite(node);
        assert_eq!(rewritten.pagination, Some(PaginationType::Connection));
        assert_eq!(rewritten.total_count, Some(0));
        assert_eq!(rewritten.node, json!([]));
    }
}
