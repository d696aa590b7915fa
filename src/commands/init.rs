use std::io::{self, Write};

use url::Url;

use graphql_results::{Config, Error, Result};

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("gqlr Configuration");
    println!("==================\n");

    let endpoint = prompt("GraphQL endpoint URL: ")?;
    if endpoint.is_empty() {
        return Err(Error::MissingEndpoint);
    }
    Url::parse(&endpoint).map_err(|e| Error::InvalidUrl(format!("{endpoint}: {e}")))?;

    let token = prompt("API token [optional]: ")?;

    let config = Config {
        endpoint: Some(endpoint),
        token: Some(token).filter(|token| !token.is_empty()),
        ..Config::default()
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, config.to_toml()?).map_err(|e| Error::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'gqlr query'!");

    Ok(())
}
