use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise JSON piped on stdin into `T`.
/// Returns None when stdin is a terminal or the pipe is empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    let request: T = serde_json::from_str(buffer.trim())
        .map_err(|e| format!("Failed to parse JSON from stdin: {}", e))?;
    Ok(Some(request))
}
