use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Line-oriented terminal wrapper. Generic over its streams so the chat flow
/// can be driven from scripted input in tests.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `prompt` without a newline and reads one trimmed line.
    /// Returns `None` once input is exhausted.
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;

        // Raw bytes so a stray non-UTF-8 line is decoded lossily instead of
        // ending the session.
        let mut line = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut line)
            .context("Failed to read stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}").context("Failed to write stdout")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
