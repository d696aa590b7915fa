//! Binding of a rewritten operation result into its typed wrapper.

use tracing::warn;

use crate::json::JsonNode;
use crate::resolve::{adapt_metadata, resolve, PageMetadata, TypedResults};
use crate::results::SharedErrors;
use crate::rewrite::Rewritten;

/// Deserializes the flat element list of `rewritten` and wraps it as `R`.
///
/// A root that is a single object becomes a one-element list and `null`
/// becomes an empty one. Element type mismatches are returned as errors.
pub fn materialize<R, N>(
    rewritten: Rewritten<N>,
    errors: Option<SharedErrors>,
) -> serde_json::Result<R>
where
    R: TypedResults,
    N: JsonNode,
{
    let kind = resolve::<R>(rewritten.pagination);

    let list = if rewritten.node.is_array() {
        rewritten.node
    } else if rewritten.node.is_null() {
        N::array(Vec::new())
    } else {
        N::array(vec![rewritten.node])
    };
    let results: Vec<R::Item> = list.deserialize_into()?;

    let metadata = adapt_metadata(
        kind,
        PageMetadata {
            total_count: rewritten.total_count,
            page_info: rewritten.page_info,
        },
    );
    if let Some(total) = metadata.total_count {
        if results.len() as u64 > total {
            warn!(
                results = results.len(),
                total_count = total,
                "server returned more results than its total count"
            );
        }
    }

    Ok(R::from_parts(results, metadata, errors))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::graphql::GraphQLError;
    use crate::results::{CollectionSegmentResults, ConnectionResults, QueryResults};
    use crate::rewrite::rewrite;

    #[derive(Deserialize, Debug)]
    struct Book {
        name: String,
        cursor: Option<String>,
    }

    #[test]
    fn test_connection_cursors_land_on_items() {
        let rewritten = rewrite(json!({
            "totalCount": 3,
            "pageInfo": { "hasNextPage": true, "endCursor": "Mg==" },
            "edges": [
                { "cursor": "MA==", "node": { "name": "a" } },
                { "cursor": "MQ==", "node": { "name": "b" } },
                { "cursor": "Mg==", "node": { "name": "c" } }
            ]
        }));

        let results: ConnectionResults<Book> = materialize(rewritten, None).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.total_count(), Some(3));
        let cursors: Vec<_> = results.iter().map(|b| b.cursor.as_deref()).collect();
        assert_eq!(cursors, vec![Some("MA=="), Some("MQ=="), Some("Mg==")]);
        assert_eq!(results.page_info().unwrap().end_cursor.as_deref(), Some("Mg=="));
    }

    #[test]
    fn test_segment_page_info_has_no_cursors() {
        let rewritten = rewrite(json!({
            "items": [{ "name": "a" }],
            "pageInfo": { "hasNextPage": false, "hasPreviousPage": true }
        }));

        let results: CollectionSegmentResults<Book> = materialize(rewritten, None).unwrap();
        let info = results.page_info().unwrap();
        assert_eq!(info.has_next_page, Some(false));
        assert_eq!(info.has_previous_page, Some(true));
        assert!(results.results()[0].cursor.is_none());
    }

    #[test]
    fn test_connection_requested_over_plain_list() {
        let rewritten = rewrite(json!([{ "name": "a" }]));
        let results: ConnectionResults<Book> = materialize(rewritten, None).unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results.has_page_info());
        assert!(!results.has_total_count());
    }

    #[test]
    fn test_single_object_and_null_roots() {
        let rewritten = rewrite(json!({ "name": "solo" }));
        let results: QueryResults<Book> = materialize(rewritten, None).unwrap();
        assert_eq!(results.results()[0].name, "solo");

        let results: QueryResults<Book> =
            materialize(Rewritten::<serde_json::Value>::empty(), None).unwrap();
        assert!(!results.has_any_results());
    }

    #[test]
    fn test_nullable_nodes_need_option() {
        let page = json!({
            "edges": [
                { "cursor": "A", "node": { "name": "a" } },
                { "cursor": "B", "node": null }
            ]
        });

        let strict: serde_json::Result<ConnectionResults<Book>> =
            materialize(rewrite(page.clone()), None);
        assert!(strict.is_err());

        let results: ConnectionResults<Option<Book>> = materialize(rewrite(page), None).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.results()[0].as_ref().map(|b| b.name.as_str()), Some("a"));
        assert!(results.results()[1].is_none());
    }

    #[test]
    fn test_mismatched_elements_fail() {
        let rewritten = rewrite(json!({ "edges": [{ "cursor": "A", "node": { "title": "x" } }] }));
        let result: serde_json::Result<ConnectionResults<Book>> = materialize(rewritten, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_errors_are_attached() {
        let errors: SharedErrors = vec![GraphQLError {
            message: "partial".to_string(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: Default::default(),
        }]
        .into();
        let rewritten = rewrite(json!([{ "name": "a" }]));
        let results: QueryResults<Book> = materialize(rewritten, Some(errors)).unwrap();
        assert!(results.has_any_errors());
        assert!(results.has_any_results());
    }
}
