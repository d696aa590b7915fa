use colored::Colorize;
use serde_json::{json, Value};

use graphql_results::{GraphQLQueryResponse, JsonNode, Result, Rewritten};

use crate::cli::FlattenArgs;
use crate::output;

pub fn run(args: FlattenArgs) -> Result<()> {
    let payload = super::read_input(args.file.as_deref())?;

    let (summary, errors) = if args.bytes {
        flatten::<serde_json_bytes::Value>(&payload, args.operation.as_deref())?
    } else {
        flatten::<Value>(&payload, args.operation.as_deref())?
    };

    if output::is_json_output() {
        output::print_json(&summary);
        return Ok(());
    }

    if let Some(errors) = errors {
        eprintln!("{}", "GraphQL errors:".red().bold());
        eprintln!("{errors}");
    }
    eprintln!(
        "{}",
        format!(
            "operation: {} · pagination: {}",
            summary["operation"].as_str().unwrap_or("-"),
            summary["paginationType"].as_str().unwrap_or("-"),
        )
        .bright_black()
    );
    output::print_json(&summary["data"]);

    Ok(())
}

/// Rewrite one operation of a raw payload into a JSON summary, plus the raw
/// error content when the payload carried errors.
fn flatten<N: JsonNode>(payload: &str, operation: Option<&str>) -> Result<(Value, Option<String>)> {
    let response = GraphQLQueryResponse::<N>::from_json_str(payload)?;
    let selected = response.operation(operation)?.map(|(name, _)| name);
    let rewritten: Rewritten<N> = response.rewrite_operation(operation)?;

    let summary = json!({
        "operation": selected,
        "paginationType": rewritten.pagination,
        "totalCount": rewritten.total_count,
        "pageInfo": rewritten.page_info.as_ref().map(|info| info.to_node::<Value>()),
        "data": serde_json::to_value(&rewritten.node)?,
    });

    Ok((summary, response.error_content()))
}
