use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::console::Console;

pub const EXIT_COMMAND: &str = "/exit";

const CHOICE_PROMPT: &str = "\nChoose a model by number (or type '/exit' to quit): ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionInput<'a> {
    Exit,
    Model(&'a ModelDescriptor),
    NotANumber,
    OutOfRange,
}

/// Resolves one line of input against `catalog`, whose entries are shown
/// with 1-based ordinals.
pub fn parse_selection<'a>(raw: &str, catalog: &'a ModelCatalog) -> SelectionInput<'a> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case(EXIT_COMMAND) {
        return SelectionInput::Exit;
    }
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return SelectionInput::NotANumber;
    }

    raw.parse::<usize>()
        .ok()
        .and_then(|ordinal| catalog.by_ordinal(ordinal))
        .map_or(SelectionInput::OutOfRange, SelectionInput::Model)
}

/// Lists the catalog and keeps asking until the operator picks a model.
/// Returns `None` when the operator types `/exit` or input runs out; the
/// caller decides what that means.
pub fn choose_model<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    catalog: &ModelCatalog,
) -> Result<Option<String>> {
    console.say("\nAvailable Groq Models:\n")?;
    for (idx, model) in catalog.iter().enumerate() {
        console.say(format!("{}. {}", idx + 1, model.id))?;
    }

    loop {
        let Some(choice) = console.prompt(CHOICE_PROMPT)? else {
            return Ok(None);
        };

        match parse_selection(&choice, catalog) {
            SelectionInput::Exit => return Ok(None),
            SelectionInput::Model(model) => {
                debug!(model = %model.id, "model selected");
                return Ok(Some(model.id.clone()));
            }
            SelectionInput::NotANumber => {
                console.say("Invalid input. Please enter a valid number.")?;
            }
            SelectionInput::OutOfRange => {
                console.say("Invalid choice. Please select a valid model number.")?;
            }
        }
    }
}
