//! Selection of the result wrapper from the caller's requested type.
//!
//! The requested wrapper is known statically, so the choice is made through
//! [`TypedResults::KIND`] rather than by inspecting types at runtime.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::pagination::{CursorPageInfo, OffsetPageInfo, PageInfo, PaginationType};
use crate::results::{PaginatedResults, QueryResults, SharedErrors};

/// Which wrapper gets constructed for an operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    Plain,
    Connection,
    CollectionSegment,
}

/// Page metadata captured while rewriting an operation root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub total_count: Option<u64>,
    pub page_info: Option<PageInfo>,
}

/// A result type the materializer knows how to build.
pub trait TypedResults: Sized {
    type Item: DeserializeOwned;

    const KIND: WrapperKind;

    fn from_parts(
        results: Vec<Self::Item>,
        metadata: PageMetadata,
        errors: Option<SharedErrors>,
    ) -> Self;
}

/// The page info flavor of a paginated wrapper.
pub trait PageInfoStyle: From<PageInfo> {
    const KIND: WrapperKind;
}

impl PageInfoStyle for CursorPageInfo {
    const KIND: WrapperKind = WrapperKind::Connection;
}

impl PageInfoStyle for OffsetPageInfo {
    const KIND: WrapperKind = WrapperKind::CollectionSegment;
}

impl<T: DeserializeOwned> TypedResults for QueryResults<T> {
    type Item = T;

    const KIND: WrapperKind = WrapperKind::Plain;

    fn from_parts(results: Vec<T>, _metadata: PageMetadata, errors: Option<SharedErrors>) -> Self {
        QueryResults::new(results, errors)
    }
}

impl<T: DeserializeOwned, P: PageInfoStyle> TypedResults for PaginatedResults<T, P> {
    type Item = T;

    const KIND: WrapperKind = P::KIND;

    fn from_parts(results: Vec<T>, metadata: PageMetadata, errors: Option<SharedErrors>) -> Self {
        PaginatedResults::new(
            results,
            metadata.total_count,
            metadata.page_info.map(P::from),
            errors,
        )
    }
}

/// Picks the wrapper for `R` given the shape detected at the operation root.
///
/// The requested type always wins; the detected shape only decides whether
/// there is metadata to populate it with.
pub fn resolve<R: TypedResults>(detected: Option<PaginationType>) -> WrapperKind {
    let kind = R::KIND;
    let matches = matches!(
        (kind, detected),
        (WrapperKind::Plain, _)
            | (WrapperKind::Connection, Some(PaginationType::Connection))
            | (WrapperKind::CollectionSegment, Some(PaginationType::CollectionSegment))
    );
    if !matches {
        debug!(?kind, ?detected, "requested wrapper differs from the detected shape");
    }
    kind
}

/// Adapts captured metadata to the wrapper being built.
///
/// Plain results carry none. A collection segment built over a connection
/// drops the cursors; a connection built over a segment gets its flags only.
pub fn adapt_metadata(kind: WrapperKind, metadata: PageMetadata) -> PageMetadata {
    match kind {
        WrapperKind::Plain => PageMetadata::default(),
        WrapperKind::Connection => PageMetadata {
            total_count: metadata.total_count,
            page_info: metadata
                .page_info
                .map(|info| PageInfo::Cursor(CursorPageInfo::from(info))),
        },
        WrapperKind::CollectionSegment => PageMetadata {
            total_count: metadata.total_count,
            page_info: metadata
                .page_info
                .map(|info| PageInfo::Offset(OffsetPageInfo::from(info))),
        },
    }
}
