//! Typed results for GraphQL responses.
//!
//! Cursor connections (`edges`/`nodes`, `pageInfo`, `totalCount`) and offset
//! collection segments (`items`, `pageInfo`, `totalCount`) are rewritten into
//! flat lists, so application models only describe the items themselves:
//!
//! ```no_run
//! use graphql_results::{ConnectionResults, GraphQLQueryResponse};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Book {
//!     name: String,
//!     cursor: Option<String>,
//! }
//!
//! # fn example(body: &str) -> graphql_results::Result<()> {
//! let response: GraphQLQueryResponse = GraphQLQueryResponse::from_json_str(body)?;
//! let books: ConnectionResults<Book> = response.load_typed_results(Some("getBooks"))?;
//! println!("{} of {:?} books", books.len(), books.total_count());
//! # Ok(())
//! # }
//! ```
//!
//! Paginated fields nested inside an item keep their page metadata, so the
//! model declares them as a results wrapper. A plain `Vec<T>` field works
//! too but needs [`results::flattened_list`], otherwise deserialization fails
//! with `expected a sequence`. Nodes that may be `null` need `Option<T>`.
//!
//! ```no_run
//! use graphql_results::{CollectionSegmentResults, ConnectionResults};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Author {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Book {
//!     name: String,
//!     authors: ConnectionResults<Author>,
//!     #[serde(deserialize_with = "graphql_results::results::flattened_list")]
//!     editors: Vec<Author>,
//!     reviewers: CollectionSegmentResults<Option<Author>>,
//! }
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod graphql;
pub mod json;
pub mod materialize;
pub mod pagination;
pub mod resolve;
pub mod response;
pub mod results;
pub mod rewrite;

pub use batch::{BatchQueryOperationResult, BatchQueryResults, OperationKey};
pub use client::GraphQLClient;
pub use config::Config;
pub use error::{Error, Result};
pub use graphql::{GraphQLError, Location, PathSegment};
pub use json::JsonNode;
pub use pagination::{detect, CursorPageInfo, OffsetPageInfo, PageInfo, PaginationType};
pub use resolve::{resolve, PageMetadata, TypedResults, WrapperKind};
pub use response::GraphQLQueryResponse;
pub use results::{
    CollectionSegmentResults, ConnectionResults, PaginatedResults, QueryResults, SharedErrors,
};
pub use rewrite::{rewrite, Rewritten};
