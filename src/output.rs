use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use graphql_results::{cursor, ConnectionResults, GraphQLError, PaginationType};

const MAX_CELL_WIDTH: usize = 60;

/// Global output format setting
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print flattened results as a table, or JSON in JSON mode
pub fn print_results(results: &ConnectionResults<Value>, pagination: Option<PaginationType>) {
    if is_json_output() {
        print_json(results);
        return;
    }

    if results.has_any_results() {
        println!("{}", results_table(results.results()));
    } else {
        println!("{}", "No results".bright_black());
    }

    println!("{}", summary_line(results, pagination));
}

/// Print GraphQL errors to stderr
pub fn print_errors(errors: &[GraphQLError]) {
    for error in errors {
        eprintln!("{} {error}", "GraphQL error:".red().bold());
    }
}

fn results_table(results: &[Value]) -> String {
    let columns = column_names(results);
    let mut builder = Builder::default();

    if columns.is_empty() {
        builder.push_record(["value"]);
        for value in results {
            builder.push_record([cell(value)]);
        }
    } else {
        builder.push_record(columns.iter().map(String::as_str));
        for value in results {
            builder.push_record(
                columns
                    .iter()
                    .map(|column| value.get(column).map(cell).unwrap_or_default()),
            );
        }
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Field names across all result objects, in first-seen order
fn column_names(results: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for value in results {
        if let Value::Object(map) = value {
            for key in map.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate(&text, MAX_CELL_WIDTH)
}

fn summary_line(results: &ConnectionResults<Value>, pagination: Option<PaginationType>) -> String {
    let mut parts = vec![format!("{} results", results.len())];

    if let Some(total) = results.total_count() {
        parts.push(format!("total {total}"));
    }
    if let Some(pagination) = pagination.filter(|p| p.is_paginated()) {
        parts.push(pagination.to_string());
    }
    if let Some(info) = results.page_info() {
        if let Some(next) = info.has_next_page {
            parts.push(format!("next page: {}", if next { "yes" } else { "no" }));
        }
        if let Some(end) = &info.end_cursor {
            match cursor::decode_index(end) {
                Some(index) => parts.push(format!("end cursor: {end} (offset {index})")),
                None => parts.push(format!("end cursor: {end}")),
            }
        }
    }

    parts.join(" · ").bright_black().to_string()
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 10), "a longe...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_column_names_first_seen_order() {
        let results = vec![json!({ "id": 1, "name": "a" }), json!({ "id": 2, "cursor": "x" })];
        assert_eq!(column_names(&results), vec!["id", "name", "cursor"]);
    }

    #[test]
    fn test_summary_line_mentions_page_state() {
        let results: ConnectionResults<Value> = ConnectionResults::new(
            vec![json!({ "id": 1 })],
            Some(4),
            Some(graphql_results::CursorPageInfo {
                end_cursor: Some("MA==".to_string()),
                has_next_page: Some(true),
                ..Default::default()
            }),
            None,
        );
        colored::control::set_override(false);
        let line = summary_line(&results, Some(PaginationType::Connection));
        assert_eq!(
            line,
            "1 results · total 4 · connection · next page: yes · end cursor: MA== (offset 0)"
        );
    }

    #[test]
    fn test_cell_formatting() {
        assert_eq!(cell(&json!("text")), "text");
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!({ "a": 1 })), r#"{"a":1}"#);
    }
}
