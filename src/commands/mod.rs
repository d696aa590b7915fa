pub mod flatten;
pub mod init;
pub mod query;

use std::io::{self, Read};
use std::path::Path;

use graphql_results::{Error, Result};

/// Read a file, or stdin for `-` or no path
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                return Err(Error::FileNotFound(path.display().to_string()));
            }
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
