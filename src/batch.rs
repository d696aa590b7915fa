//! Results of a request carrying several named operations.
//!
//! Each operation is rewritten and deserialized on first access. Parsed
//! results are memoized per requested result type, so asking for the same
//! operation as `QueryResults<A>` and then `ConnectionResults<B>` keeps both.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{Error, Result};
use crate::graphql::GraphQLError;
use crate::json::{match_key, JsonNode};
use crate::materialize::materialize;
use crate::resolve::TypedResults;
use crate::results::{CollectionSegmentResults, ConnectionResults, QueryResults, SharedErrors};
use crate::rewrite::rewrite;

type Memo = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Selects an operation by position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKey {
    Index(usize),
    Name(String),
}

impl From<usize> for OperationKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for OperationKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for OperationKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// One operation's raw result subtree with its parsed results.
pub struct BatchQueryOperationResult<N> {
    name: String,
    node: N,
    errors: Option<SharedErrors>,
    memo: Mutex<Memo>,
}

impl<N: JsonNode> BatchQueryOperationResult<N> {
    fn new(name: String, node: N, errors: Option<SharedErrors>) -> Self {
        Self {
            name,
            node,
            errors,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operation's result subtree as returned by the server.
    pub fn raw(&self) -> &N {
        &self.node
    }

    /// Parses this operation as `R`, reusing an earlier parse of the same type.
    ///
    /// Two threads racing on the first access may both parse; the first result
    /// stored wins and the other is dropped.
    pub fn typed<R>(&self) -> Result<Arc<R>>
    where
        R: TypedResults + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<R>();
        let cached = self.memo().get(&type_id).cloned();
        if let Some(hit) = cached.and_then(|hit| hit.downcast::<R>().ok()) {
            trace!(operation = %self.name, "memoized results reused");
            return Ok(hit);
        }

        let parsed = Arc::new(
            materialize::<R, N>(rewrite(self.node.clone()), self.errors.clone()).map_err(
                |source| Error::Deserialize {
                    operation: self.name.clone(),
                    source,
                },
            )?,
        );

        let stored = self
            .memo()
            .entry(type_id)
            .or_insert_with(|| parsed.clone() as Arc<dyn Any + Send + Sync>)
            .clone();
        Ok(stored.downcast::<R>().unwrap_or(parsed))
    }

    fn memo(&self) -> std::sync::MutexGuard<'_, Memo> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<N: fmt::Debug> fmt::Debug for BatchQueryOperationResult<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchQueryOperationResult")
            .field("name", &self.name)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// All operations of one response, in response order.
#[derive(Debug)]
pub struct BatchQueryResults<N = serde_json::Value> {
    operations: Vec<BatchQueryOperationResult<N>>,
    errors: Option<SharedErrors>,
}

impl<N: JsonNode> BatchQueryResults<N> {
    pub fn new(data: Option<N>, errors: Option<SharedErrors>) -> Self {
        let operations = match data {
            Some(mut data) => data
                .field_names()
                .into_iter()
                .filter_map(|name| {
                    let node = data.take_field(&name)?;
                    Some(BatchQueryOperationResult::new(name, node, errors.clone()))
                })
                .collect(),
            None => Vec::new(),
        };
        Self { operations, errors }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn errors(&self) -> Option<&[GraphQLError]> {
        self.errors.as_deref()
    }

    pub fn has_any_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name()).collect()
    }

    pub fn operations(&self) -> &[BatchQueryOperationResult<N>] {
        &self.operations
    }

    pub fn operation(&self, key: impl Into<OperationKey>) -> Result<&BatchQueryOperationResult<N>> {
        match key.into() {
            OperationKey::Index(index) => {
                self.operations
                    .get(index)
                    .ok_or(Error::OperationIndexOutOfRange {
                        index,
                        len: self.operations.len(),
                    })
            }
            OperationKey::Name(name) => {
                let names = self.operation_names();
                let matched = match_key(&names, &name)
                    .ok_or_else(|| Error::OperationNotFound(name.clone()))?;
                self.operations
                    .iter()
                    .find(|op| op.name() == matched)
                    .ok_or(Error::OperationNotFound(name))
            }
        }
    }

    pub fn get_typed<R>(&self, key: impl Into<OperationKey>) -> Result<Arc<R>>
    where
        R: TypedResults + Send + Sync + 'static,
    {
        self.operation(key)?.typed::<R>()
    }

    pub fn get_results<T>(&self, key: impl Into<OperationKey>) -> Result<Arc<QueryResults<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.get_typed(key)
    }

    pub fn get_connection_results<T>(
        &self,
        key: impl Into<OperationKey>,
    ) -> Result<Arc<ConnectionResults<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.get_typed(key)
    }

    pub fn get_collection_segment_results<T>(
        &self,
        key: impl Into<OperationKey>,
    ) -> Result<Arc<CollectionSegmentResults<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.get_typed(key)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize, Debug)]
    struct Book {
        name: String,
    }

    #[derive(Deserialize, Debug)]
    struct Author {
        #[serde(rename = "firstName")]
        first_name: String,
    }

    fn batch() -> BatchQueryResults {
        let data = json!({
            "getBooks": {
                "totalCount": 1,
                "edges": [{ "cursor": "A", "node": { "name": "X" } }]
            },
            "getAuthors": {
                "items": [{ "firstName": "Y" }, { "firstName": "Z" }],
                "pageInfo": { "hasNextPage": true }
            }
        });
        BatchQueryResults::new(Some(data), None)
    }

    #[test]
    fn test_access_by_index_and_name() {
        let batch = batch();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.operation_names(), vec!["getBooks", "getAuthors"]);

        let books = batch.get_connection_results::<Book>(0).unwrap();
        assert_eq!(books.results()[0].name, "X");
        assert_eq!(books.total_count(), Some(1));

        let authors = batch.get_collection_segment_results::<Author>("getauthors").unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors.results()[1].first_name, "Z");
        assert_eq!(authors.page_info().and_then(|info| info.has_next_page), Some(true));
    }

    #[test]
    fn test_mismatched_type_fails() {
        let batch = batch();
        let result = batch.get_results::<Book>("getAuthors");
        assert!(matches!(
            result,
            Err(Error::Deserialize { operation, .. }) if operation == "getAuthors"
        ));
    }

    #[test]
    fn test_missing_operation() {
        let batch = batch();
        assert!(matches!(
            batch.get_results::<Book>(5),
            Err(Error::OperationIndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            batch.get_results::<Book>("getPublishers"),
            Err(Error::OperationNotFound(_))
        ));
    }

    #[test]
    fn test_results_memoized_per_type() {
        let batch = batch();
        let first = batch.get_results::<Book>("getBooks").unwrap();
        let second = batch.get_results::<Book>("getBooks").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let as_connection = batch.get_connection_results::<Book>("getBooks").unwrap();
        assert_eq!(as_connection.len(), 1);
        let again = batch.get_results::<Book>("getBooks").unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_concurrent_first_access() {
        let batch = Arc::new(batch());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let batch = Arc::clone(&batch);
                std::thread::spawn(move || batch.get_results::<Book>("getBooks").map(|r| r.len()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 1);
        }
    }

    #[test]
    fn test_empty_data() {
        let batch: BatchQueryResults = BatchQueryResults::new(None, None);
        assert!(batch.is_empty());
        assert!(!batch.has_any_errors());
    }
}
