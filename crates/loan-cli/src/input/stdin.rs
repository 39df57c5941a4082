use loan_core::loan::LoanInput;
use std::io::{self, Read};

/// Attempt to read one loan input as JSON from piped stdin.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_loan_input() -> Result<Option<LoanInput>, Box<dyn std::error::Error>> {
    match read_raw()? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Attempt to read a JSON array of loan inputs from piped stdin.
pub fn read_loan_inputs() -> Result<Option<Vec<LoanInput>>, Box<dyn std::error::Error>> {
    match read_raw()? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn read_raw() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(trimmed.to_string()))
}
