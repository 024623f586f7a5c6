//! JSON and text I/O for the CLI
//!
//! - Input: one JSON object via stdin
//! - Output: one JSON object, or plain trace lines, via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut content = String::new();
    io::stdin().lock().read_to_string(&mut content)?;
    parse_request(&content)
}

/// Parse a JSON request body
pub fn parse_request(content: &str) -> CliResult<Value> {
    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(content)?;
    Ok(value)
}

/// Success envelope
pub fn ok_envelope(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_envelope(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&ok_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&error_envelope(code, message))
}

/// Write plain text to stdout as is
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_multiline() {
        let value = parse_request("{\n  \"row_count\": 5\n}\n").unwrap();
        assert_eq!(value["row_count"], 5);
    }

    #[test]
    fn test_parse_request_empty() {
        assert!(parse_request("  \n").is_err());
    }

    #[test]
    fn test_envelopes() {
        let ok = ok_envelope(serde_json::json!({"estimated_size_mb": 2}));
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["data"]["estimated_size_mb"], 2);

        let err = error_envelope("IDX_CLI_IO_ERROR", "Empty input");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "IDX_CLI_IO_ERROR");
    }
}
