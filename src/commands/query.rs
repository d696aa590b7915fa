use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use graphql_results::{Config, ConnectionResults, Error, GraphQLClient, Result};

use crate::cli::QueryArgs;
use crate::output;

/// GraphQL `Name` grammar
const VARIABLE_NAME_PATTERN: &str = r"^[_A-Za-z][_0-9A-Za-z]*$";

fn variable_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VARIABLE_NAME_PATTERN).expect("variable name pattern is valid"))
}

/// Parse `name=value` pairs into a variables object. Values that are valid
/// JSON are used as such, anything else is sent as a string.
pub fn parse_variables(vars: &[String]) -> Result<Option<Value>> {
    if vars.is_empty() {
        return Ok(None);
    }

    let mut variables = Map::new();
    for var in vars {
        let (name, raw) = var
            .split_once('=')
            .ok_or_else(|| Error::InvalidVariable(var.clone()))?;
        let name = name.trim();
        if !variable_name_regex().is_match(name) {
            return Err(Error::InvalidVariable(var.clone()));
        }

        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        variables.insert(name.to_string(), value);
    }

    Ok(Some(Value::Object(variables)))
}

/// The `--endpoint` flag wins over `GQLR_ENDPOINT` and the config file.
fn build_client(config: &Config, endpoint: Option<&str>) -> Result<GraphQLClient> {
    let endpoint = config.endpoint_with_override(endpoint)?;
    Ok(GraphQLClient::from_config_at(config, &endpoint))
}

pub async fn run(config: &Config, args: QueryArgs) -> Result<()> {
    let query = match &args.query {
        Some(query) => query.clone(),
        None => super::read_input(args.file.as_deref())?,
    };
    let variables = parse_variables(&args.vars)?;

    let client = build_client(config, args.endpoint.as_deref())?;

    let response = client.execute(&query, variables.as_ref(), None).await?;

    if let Some(errors) = response.errors() {
        output::print_errors(errors);
    }

    let (results, pagination): (ConnectionResults<Value>, _) =
        response.load_with_pagination(args.operation.as_deref())?;
    output::print_results(&results, pagination);

    Ok(())
}
