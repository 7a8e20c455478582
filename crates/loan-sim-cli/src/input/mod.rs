pub mod config;
pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Request from `--input`, else piped stdin, else None so flags apply.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(file::read_json(path)?)),
        None => stdin::read_stdin(),
    }
}
