use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "gqlr")]
#[command(about = "Run GraphQL queries and flatten paginated results", version)]
#[command(after_help = "EXAMPLES:
    gqlr query books.graphql --var first=10     Run a query file
    gqlr query -e '{ teams { nodes { id } } }'  Run an inline query
    gqlr flatten response.json                  Flatten a saved response
    gqlr init                                   Configure endpoint and token")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show debug logs and error causes
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a query against the configured endpoint
    #[command(after_help = "EXAMPLES:
    gqlr query books.graphql
    gqlr query books.graphql --var first=25 --var after='\"MjQ=\"'
    gqlr query -e '{ getBooks { items { name } totalCount } }' --json
    gqlr query batch.graphql --operation getAuthors")]
    Query(QueryArgs),
    /// Flatten a saved GraphQL response
    #[command(after_help = "EXAMPLES:
    gqlr flatten response.json
    cat response.json | gqlr flatten --operation getBooks
    gqlr flatten response.json --bytes")]
    Flatten(FlattenArgs),
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    gqlr init")]
    Init,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    gqlr completions bash > ~/.bash_completion.d/gqlr
    gqlr completions zsh > ~/.zfunc/_gqlr")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Clone)]
pub struct QueryArgs {
    /// File containing the query ("-" reads stdin)
    #[arg(required_unless_present = "query")]
    pub file: Option<PathBuf>,

    /// Inline query text
    #[arg(short = 'e', long = "execute", conflicts_with = "file")]
    pub query: Option<String>,

    /// Query variable as NAME=VALUE; VALUE is parsed as JSON when it can be
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Operation (top-level field) to show; defaults to the first one
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Endpoint URL, overriding the config file
    #[arg(long)]
    pub endpoint: Option<String>,
}

#[derive(Args, Clone)]
pub struct FlattenArgs {
    /// Response file; reads stdin when absent
    pub file: Option<PathBuf>,

    /// Operation (top-level field) to flatten; defaults to the first one
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Parse with the byte-string JSON backend
    #[arg(long)]
    pub bytes: bool,
}
