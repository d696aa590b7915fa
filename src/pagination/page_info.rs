use serde::{Deserialize, Serialize};

use crate::json::JsonNode;

use super::PaginationType;

/// Relay-style page info of a cursor connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_previous_page: Option<bool>,
}

/// Page info of an offset collection segment. Carries no cursors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_previous_page: Option<bool>,
}

impl From<CursorPageInfo> for OffsetPageInfo {
    fn from(info: CursorPageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
        }
    }
}

impl From<OffsetPageInfo> for CursorPageInfo {
    fn from(info: OffsetPageInfo) -> Self {
        Self {
            start_cursor: None,
            end_cursor: None,
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
        }
    }
}

/// Page info captured while rewriting, in the flavor of the detected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageInfo {
    Cursor(CursorPageInfo),
    Offset(OffsetPageInfo),
}

impl PageInfo {
    /// Reads a `pageInfo` object. Missing flags or cursors stay `None`;
    /// anything that is not an object yields no page info at all.
    pub fn read<N: JsonNode>(node: &N, pagination: PaginationType) -> Option<Self> {
        if !node.is_object() {
            return None;
        }

        let flag = |name: &str| node.field(name).and_then(JsonNode::as_bool);
        let cursor = |name: &str| {
            node.field(name)
                .and_then(JsonNode::as_str)
                .map(str::to_owned)
        };

        match pagination {
            PaginationType::Connection => Some(PageInfo::Cursor(CursorPageInfo {
                start_cursor: cursor("startCursor"),
                end_cursor: cursor("endCursor"),
                has_next_page: flag("hasNextPage"),
                has_previous_page: flag("hasPreviousPage"),
            })),
            PaginationType::CollectionSegment => Some(PageInfo::Offset(OffsetPageInfo {
                has_next_page: flag("hasNextPage"),
                has_previous_page: flag("hasPreviousPage"),
            })),
            PaginationType::None => None,
        }
    }

    pub fn pagination_type(&self) -> PaginationType {
        match self {
            PageInfo::Cursor(_) => PaginationType::Connection,
            PageInfo::Offset(_) => PaginationType::CollectionSegment,
        }
    }

    pub fn has_next_page(&self) -> Option<bool> {
        match self {
            PageInfo::Cursor(info) => info.has_next_page,
            PageInfo::Offset(info) => info.has_next_page,
        }
    }

    pub fn has_previous_page(&self) -> Option<bool> {
        match self {
            PageInfo::Cursor(info) => info.has_previous_page,
            PageInfo::Offset(info) => info.has_previous_page,
        }
    }

    /// Builds the canonical camelCase `pageInfo` object. Absent values are
    /// left out rather than written as `null`.
    pub fn to_node<N: JsonNode>(&self) -> N {
        let mut node = N::object();
        if let PageInfo::Cursor(info) = self {
            if let Some(cursor) = &info.start_cursor {
                node.set_field("startCursor", N::string(cursor));
            }
            if let Some(cursor) = &info.end_cursor {
                node.set_field("endCursor", N::string(cursor));
            }
        }
        if let Some(flag) = self.has_next_page() {
            node.set_field("hasNextPage", N::boolean(flag));
        }
        if let Some(flag) = self.has_previous_page() {
            node.set_field("hasPreviousPage", N::boolean(flag));
        }
        node
    }
}

impl From<PageInfo> for CursorPageInfo {
    fn from(info: PageInfo) -> Self {
        match info {
            PageInfo::Cursor(info) => info,
            PageInfo::Offset(info) => info.into(),
        }
    }
}

impl From<PageInfo> for OffsetPageInfo {
    fn from(info: PageInfo) -> Self {
        match info {
            PageInfo::Cursor(info) => info.into(),
            PageInfo::Offset(info) => info,
        }
    }
}
