use graphql_results::{detect, rewrite, ConnectionResults, PaginationType, Rewritten};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize, Debug)]
struct Item {
    id: u64,
    cursor: Option<String>,
}

fn materialize_connection(rewritten: Rewritten<Value>) -> ConnectionResults<Item> {
    graphql_results::materialize::materialize(rewritten, None).unwrap()
}

proptest! {
    #[test]
    fn edge_cursors_land_on_their_nodes(
        cursors in prop::collection::vec("[A-Za-z0-9+/=]{1,12}", 0..20)
    ) {
        let edges: Vec<Value> = cursors
            .iter()
            .enumerate()
            .map(|(id, cursor)| json!({ "cursor": cursor, "node": { "id": id } }))
            .collect();
        let node = json!({ "edges": edges });

        let results = materialize_connection(rewrite(node));
        prop_assert_eq!(results.len(), cursors.len());
        for (index, item) in results.iter().enumerate() {
            prop_assert_eq!(item.id, index as u64);
            prop_assert_eq!(item.cursor.as_deref(), Some(cursors[index].as_str()));
        }
    }

    #[test]
    fn bare_nodes_need_metadata(
        len in 0usize..10,
        with_page_info in any::<bool>(),
        with_total in any::<bool>()
    ) {
        let nodes: Vec<Value> = (0..len).map(|id| json!({ "id": id })).collect();
        let mut node = json!({ "nodes": nodes });
        if with_page_info {
            node["pageInfo"] = json!({ "hasNextPage": false });
        }
        if with_total {
            node["totalCount"] = json!(len);
        }

        let expected = if with_page_info || with_total {
            PaginationType::Connection
        } else {
            PaginationType::None
        };
        prop_assert_eq!(detect(&node), expected);
    }

    #[test]
    fn flat_arrays_are_left_alone(ids in prop::collection::vec(any::<u32>(), 0..20)) {
        let node: Value = ids.iter().map(|id| json!({ "id": id, "name": "n" })).collect();
        let rewritten = rewrite(node.clone());
        prop_assert_eq!(rewritten.pagination, Some(PaginationType::None));
        prop_assert_eq!(rewritten.node, node);
    }

    #[test]
    fn segment_flags_are_kept(next in any::<bool>(), previous in any::<bool>(), len in 0usize..10) {
        let items: Vec<Value> = (0..len).map(|id| json!({ "id": id })).collect();
        let node = json!({
            "items": items,
            "pageInfo": { "hasNextPage": next, "hasPreviousPage": previous }
        });

        let results: graphql_results::CollectionSegmentResults<Item> =
            graphql_results::materialize::materialize(rewrite(node), None).unwrap();
        let info = results.page_info().unwrap();
        prop_assert_eq!(info.has_next_page, Some(next));
        prop_assert_eq!(info.has_previous_page, Some(previous));
        prop_assert!(results.iter().all(|item| item.cursor.is_none()));
    }
}
