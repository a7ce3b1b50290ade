//
//  redmine-cli
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output Formatting
//!
//! With `--json` every command prints Redmine's response unchanged, so the
//! output can be piped to `jq` or fed back into another tool call.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`write_json`] | Pretty-printed JSON on stdout |
//! | [`write_json_to`] | Pretty-printed JSON on any writer |
//! | [`extract`] | Typed view of one field of a response |

use std::io::Write;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Writes a value as pretty-printed JSON to stdout.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_json_to(&mut lock, value)
}

/// Writes a value as pretty-printed JSON followed by a newline.
///
/// # Example
///
/// ```rust
/// use redmine_cli::output::write_json_to;
///
/// let mut buffer = Vec::new();
/// write_json_to(&mut buffer, &serde_json::json!({"id": 1})).unwrap();
/// assert_eq!(String::from_utf8(buffer).unwrap(), "{\n  \"id\": 1\n}\n");
/// ```
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Deserializes the field `key` of a Redmine response.
///
/// Redmine wraps every payload under a root key (`issue`, `projects`, ...);
/// this unwraps it into the typed model used for table output.
///
/// # Errors
///
/// Returns an error naming the key when it is missing or has the wrong shape.
pub fn extract<T: DeserializeOwned>(response: &Value, key: &str) -> anyhow::Result<T> {
    let field = response
        .get(key)
        .with_context(|| format!("Unexpected response from Redmine: missing '{key}'"))?;
    serde_json::from_value(field.clone())
        .with_context(|| format!("Unexpected response from Redmine: invalid '{key}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_field() {
        let response = json!({"trackers": [{"id": 1}, {"id": 2}]});
        let ids: Vec<Value> = extract(&response, "trackers").unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_extract_missing_field() {
        let err = extract::<Value>(&json!({}), "issue").unwrap_err();
        assert!(err.to_string().contains("missing 'issue'"));
    }
}
