use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::batch::BatchQueryResults;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resolve::TypedResults;
use crate::response::GraphQLQueryResponse;

pub struct GraphQLClient {
    http: Client,
    endpoint: String,
    authorization: Option<String>,
    headers: Vec<(String, String)>,
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a serde_json::Value>,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    operation_name: Option<&'a str>,
}

impl GraphQLClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            authorization: None,
            headers: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::from_config_at(config, &config.endpoint()?))
    }

    /// Uses the token and headers of `config` against an endpoint chosen by
    /// the caller.
    pub fn from_config_at(config: &Config, endpoint: &Url) -> Self {
        let mut client = Self::new(endpoint.as_str());
        if let Some(token) = config.token() {
            client = client.with_token(config.auth_scheme(), &token);
        }
        for (name, value) in &config.headers {
            client = client.with_header(name, value);
        }
        client
    }

    /// Sends `Authorization: <scheme> <token>`, or the bare token when the
    /// scheme is empty.
    pub fn with_token(mut self, scheme: &str, token: &str) -> Self {
        self.authorization = Some(if scheme.is_empty() {
            token.to_string()
        } else {
            format!("{scheme} {token}")
        });
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts a query and parses the `{ data, errors }` payload.
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<&serde_json::Value>,
        operation_name: Option<&str>,
    ) -> Result<GraphQLQueryResponse> {
        let request = GraphQLRequest {
            query,
            variables,
            operation_name,
        };

        debug!(endpoint = %self.endpoint, ?operation_name, "sending GraphQL request");

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(authorization) = &self.authorization {
            builder = builder.header("Authorization", authorization);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let body = response.text().await?;
        GraphQLQueryResponse::from_json_str(&body)
    }

    /// Executes a query and loads one operation's results as `R`. GraphQL
    /// errors are attached to the results rather than returned.
    pub async fn query_typed<R: TypedResults>(
        &self,
        query: &str,
        variables: Option<&serde_json::Value>,
        operation: Option<&str>,
    ) -> Result<R> {
        self.execute(query, variables, None)
            .await?
            .load_typed_results(operation)
    }

    /// Like [`query_typed`](Self::query_typed), but fails on any GraphQL error.
    pub async fn query_typed_strict<R: TypedResults>(
        &self,
        query: &str,
        variables: Option<&serde_json::Value>,
        operation: Option<&str>,
    ) -> Result<R> {
        let response = self.execute(query, variables, None).await?;

        if let Some(errors) = response.errors().filter(|errors| !errors.is_empty()) {
            return Err(Error::GraphQL {
                messages: errors.iter().map(ToString::to_string).collect(),
            });
        }

        response.load_typed_results(operation)
    }

    /// Executes a query with several top-level operations.
    pub async fn query_batch(
        &self,
        query: &str,
        variables: Option<&serde_json::Value>,
    ) -> Result<BatchQueryResults> {
        Ok(self.execute(query, variables, None).await?.into_batch())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body_skips_absent_fields() {
        let request = GraphQLRequest {
            query: "{ teams { nodes { id } } }",
            variables: None,
            operation_name: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "query": "{ teams { nodes { id } } }" })
        );
    }

    #[test]
    fn test_request_body_with_variables() {
        let variables = json!({ "first": 10 });
        let request = GraphQLRequest {
            query: "query Books($first: Int) { books(first: $first) { nodes { id } } }",
            variables: Some(&variables),
            operation_name: Some("Books"),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["variables"], json!({ "first": 10 }));
        assert_eq!(body["operationName"], json!("Books"));
    }

    #[test]
    fn test_token_formatting() {
        let client =
            GraphQLClient::new("https://api.example.com/graphql").with_token("Bearer", "abc");
        assert_eq!(client.authorization.as_deref(), Some("Bearer abc"));
        let client = GraphQLClient::new("https://api.example.com/graphql").with_token("", "abc");
        assert_eq!(client.authorization.as_deref(), Some("abc"));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            endpoint: Some("https://api.example.com/graphql".to_string()),
            token: Some("abc".to_string()),
            auth_scheme: None,
            headers: [("X-Client".to_string(), "gqlr".to_string())].into_iter().collect(),
        };
        if std::env::var("GQLR_ENDPOINT").is_ok() || std::env::var("GQLR_TOKEN").is_ok() {
            return;
        }
        let client = GraphQLClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/graphql");
        assert_eq!(client.authorization.as_deref(), Some("Bearer abc"));
        assert_eq!(client.headers, vec![("X-Client".to_string(), "gqlr".to_string())]);
    }
}
