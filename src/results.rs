//! Typed result wrappers handed back to callers.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::graphql::GraphQLError;
use crate::pagination::{CursorPageInfo, OffsetPageInfo, PageInfo, PaginationType};

/// Errors of one response, shared by every result materialized from it.
pub type SharedErrors = Arc<[GraphQLError]>;

/// An ordered, read-only list of results in server order, plus the response's
/// GraphQL errors.
#[derive(Debug, Clone)]
pub struct QueryResults<T> {
    results: Vec<T>,
    errors: Option<SharedErrors>,
}

impl<T> QueryResults<T> {
    pub fn new(results: Vec<T>, errors: Option<SharedErrors>) -> Self {
        Self { results, errors }
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn errors(&self) -> Option<&[GraphQLError]> {
        self.errors.as_deref()
    }

    pub fn has_any_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn has_any_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }

    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

impl<T> Default for QueryResults<T> {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl<T> IntoIterator for QueryResults<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a QueryResults<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Results of a paginated field with its total count and page info.
///
/// `page_info` is `None` only when the server response carried no `pageInfo`
/// selection at all.
#[derive(Debug, Clone)]
pub struct PaginatedResults<T, P> {
    results: QueryResults<T>,
    total_count: Option<u64>,
    page_info: Option<P>,
}

/// Results of a cursor connection.
pub type ConnectionResults<T> = PaginatedResults<T, CursorPageInfo>;

/// Results of an offset collection segment.
pub type CollectionSegmentResults<T> = PaginatedResults<T, OffsetPageInfo>;

impl<T, P> PaginatedResults<T, P> {
    pub fn new(
        results: Vec<T>,
        total_count: Option<u64>,
        page_info: Option<P>,
        errors: Option<SharedErrors>,
    ) -> Self {
        Self {
            results: QueryResults::new(results, errors),
            total_count,
            page_info,
        }
    }

    pub fn results(&self) -> &[T] {
        self.results.results()
    }

    pub fn errors(&self) -> Option<&[GraphQLError]> {
        self.results.errors()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn page_info(&self) -> Option<&P> {
        self.page_info.as_ref()
    }

    pub fn has_any_results(&self) -> bool {
        self.results.has_any_results()
    }

    pub fn has_any_errors(&self) -> bool {
        self.results.has_any_errors()
    }

    pub fn has_total_count(&self) -> bool {
        self.total_count.is_some()
    }

    pub fn has_page_info(&self) -> bool {
        self.page_info.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }

    pub fn into_results(self) -> Vec<T> {
        self.results.into_results()
    }

    /// Drops the pagination metadata.
    pub fn into_query_results(self) -> QueryResults<T> {
        self.results
    }
}

impl<T, P> Default for PaginatedResults<T, P> {
    fn default() -> Self {
        Self::new(Vec::new(), None, None, None)
    }
}

impl<T, P> IntoIterator for PaginatedResults<T, P> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T, P> IntoIterator for &'a PaginatedResults<T, P> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl<T: Serialize> Serialize for QueryResults<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.results.serialize(serializer)
    }
}

impl<T: Serialize, P: Serialize> Serialize for PaginatedResults<T, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut page = serializer.serialize_struct("PaginatedResults", 3)?;
        page.serialize_field("results", self.results.results())?;
        if let Some(count) = self.total_count {
            page.serialize_field("totalCount", &count)?;
        } else {
            page.skip_field("totalCount")?;
        }
        if let Some(info) = &self.page_info {
            page.serialize_field("pageInfo", info)?;
        } else {
            page.skip_field("pageInfo")?;
        }
        page.end()
    }
}

/// The canonical page object written by the rewriter at nested positions.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalPage<T> {
    results: Vec<T>,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    page_info: Option<CursorPageInfo>,
    #[serde(default)]
    pagination_type: Option<PaginationType>,
}

/// Anything a rewritten nested field can hold: a bare list, a canonical page
/// object, or `null`.
struct FlattenedList<T> {
    results: Vec<T>,
    total_count: Option<u64>,
    page_info: Option<PageInfo>,
}

impl<T> From<CanonicalPage<T>> for FlattenedList<T> {
    fn from(page: CanonicalPage<T>) -> Self {
        let page_info = page.page_info.map(|info| match page.pagination_type {
            Some(PaginationType::CollectionSegment) => PageInfo::Offset(info.into()),
            _ => PageInfo::Cursor(info),
        });
        Self {
            results: page.results,
            total_count: page.total_count,
            page_info,
        }
    }
}

struct FlattenedListVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for FlattenedListVisitor<T> {
    type Value = FlattenedList<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of results or a flattened page object")
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(FlattenedList {
            results: Vec::new(),
            total_count: None,
            page_info: None,
        })
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        let results = Vec::<T>::deserialize(SeqAccessDeserializer::new(seq))?;
        Ok(FlattenedList {
            results,
            total_count: None,
            page_info: None,
        })
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        CanonicalPage::<T>::deserialize(MapAccessDeserializer::new(map)).map(FlattenedList::from)
    }
}

fn deserialize_flattened<'de, D, T>(deserializer: D) -> Result<FlattenedList<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_any(FlattenedListVisitor(PhantomData))
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for QueryResults<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_flattened(deserializer).map(|list| QueryResults::new(list.results, None))
    }
}

impl<'de, T, P> Deserialize<'de> for PaginatedResults<T, P>
where
    T: Deserialize<'de>,
    P: From<PageInfo>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_flattened(deserializer).map(|list| {
            PaginatedResults::new(
                list.results,
                list.total_count,
                list.page_info.map(P::from),
                None,
            )
        })
    }
}

/// `deserialize_with` helper for model fields declared as a plain `Vec<T>`
/// that hold a rewritten connection or collection segment.
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Book {
///     #[serde(deserialize_with = "graphql_results::results::flattened_list")]
///     authors: Vec<Author>,
/// }
/// ```
pub fn flattened_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserialize_flattened(deserializer).map(|list| list.results)
}
