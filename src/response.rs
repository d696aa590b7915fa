//! The raw `{ data, errors }` payload of a GraphQL response.

use std::sync::Arc;

use tracing::debug;

use crate::batch::BatchQueryResults;
use crate::error::{Error, Result};
use crate::graphql::GraphQLError;
use crate::json::{match_key, JsonNode};
use crate::materialize::materialize;
use crate::pagination::PaginationType;
use crate::resolve::TypedResults;
use crate::results::SharedErrors;
use crate::rewrite::{rewrite, Rewritten};

const DATA: &str = "data";
const ERRORS: &str = "errors";

/// A parsed GraphQL response over the JSON backend `N`.
#[derive(Debug, Clone)]
pub struct GraphQLQueryResponse<N = serde_json::Value> {
    data: Option<N>,
    errors: Option<SharedErrors>,
    raw_errors: Option<N>,
}

impl<N: JsonNode> GraphQLQueryResponse<N> {
    pub fn from_json_str(body: &str) -> Result<Self> {
        let payload: N = serde_json::from_str(body)?;
        Self::from_node(payload)
    }

    pub fn from_node(mut payload: N) -> Result<Self> {
        if !payload.is_object() {
            return Err(Error::MalformedResponse(
                "response payload is not a JSON object".to_string(),
            ));
        }

        let data = payload.take_field(DATA).filter(|data| !data.is_null());
        if let Some(data) = &data {
            if !data.is_object() {
                return Err(Error::MalformedResponse(
                    "`data` is not a JSON object".to_string(),
                ));
            }
        }

        let raw_errors = payload.take_field(ERRORS).filter(|errors| !errors.is_null());
        let errors = match &raw_errors {
            Some(raw) => {
                let parsed: Vec<GraphQLError> = raw.clone().deserialize_into().map_err(|e| {
                    Error::MalformedResponse(format!("invalid `errors` array: {e}"))
                })?;
                Some(Arc::from(parsed))
            }
            None => None,
        };

        Ok(Self {
            data,
            errors,
            raw_errors,
        })
    }

    pub fn data(&self) -> Option<&N> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> Option<&[GraphQLError]> {
        self.errors.as_deref()
    }

    pub fn has_any_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// The raw `errors` array as pretty JSON, for diagnostics.
    pub fn error_content(&self) -> Option<String> {
        self.raw_errors
            .as_ref()
            .and_then(|raw| serde_json::to_string_pretty(raw).ok())
    }

    /// Names of the operations under `data`, in response order.
    pub fn operation_names(&self) -> Vec<String> {
        self.data
            .as_ref()
            .map(JsonNode::field_names)
            .unwrap_or_default()
    }

    /// Finds an operation result by name, or the first one under `data` when
    /// no name is given. `Ok(None)` means the response carried no data.
    pub fn operation(&self, name: Option<&str>) -> Result<Option<(String, &N)>> {
        let Some(data) = &self.data else {
            return Ok(None);
        };

        let names = data.field_names();
        let selected = match name {
            Some(name) => {
                let keys: Vec<&str> = names.iter().map(String::as_str).collect();
                match match_key(&keys, name) {
                    Some(key) => key.to_owned(),
                    None => return Err(Error::OperationNotFound(name.to_string())),
                }
            }
            None => match names.into_iter().next() {
                Some(first) => first,
                None => return Ok(None),
            },
        };

        Ok(data.field(&selected).map(|node| (selected, node)))
    }

    /// Rewrites one operation's result subtree.
    pub fn rewrite_operation(&self, name: Option<&str>) -> Result<Rewritten<N>> {
        self.select_and_rewrite(name).map(|(_, rewritten)| rewritten)
    }

    /// Loads one operation's results as `R`, e.g. `QueryResults<Book>` or
    /// `ConnectionResults<Book>`.
    ///
    /// GraphQL errors do not stop materialization: partial data is returned
    /// with the errors attached.
    pub fn load_typed_results<R: TypedResults>(&self, name: Option<&str>) -> Result<R> {
        self.load_with_pagination(name).map(|(results, _)| results)
    }

    /// Like [`load_typed_results`](Self::load_typed_results), also returning
    /// the pagination detected at the operation root.
    pub fn load_with_pagination<R: TypedResults>(
        &self,
        name: Option<&str>,
    ) -> Result<(R, Option<PaginationType>)> {
        let (operation, rewritten) = self.select_and_rewrite(name)?;
        let pagination = rewritten.pagination;
        let results = materialize(rewritten, self.errors.clone())
            .map_err(|source| Error::Deserialize { operation, source })?;
        Ok((results, pagination))
    }

    fn select_and_rewrite(&self, name: Option<&str>) -> Result<(String, Rewritten<N>)> {
        Ok(match self.operation(name)? {
            Some((selected, node)) => {
                debug!(operation = %selected, "rewriting operation result");
                let rewritten = rewrite(node.clone());
                (selected, rewritten)
            }
            None => (name.unwrap_or_default().to_string(), Rewritten::empty()),
        })
    }

    /// Splits the response into its independently parsed operations.
    pub fn into_batch(self) -> BatchQueryResults<N> {
        BatchQueryResults::new(self.data, self.errors)
    }
}
