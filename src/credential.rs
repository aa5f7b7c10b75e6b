use anyhow::Result;
use std::fmt;
use std::io::{BufRead, Write};

use crate::console::Console;

const API_KEY_HINT: &str = "Grab your Groq API key at https://groq.com\n";
const API_KEY_PROMPT: &str = "Enter your Groq API key: ";

/// API key held for the lifetime of the session. Never printed or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Asks the operator for an API key. `None` means input ended before one
/// was entered.
pub fn acquire<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<Credential>> {
    console.say(API_KEY_HINT)?;
    Ok(console.prompt(API_KEY_PROMPT)?.map(Credential::new))
}
